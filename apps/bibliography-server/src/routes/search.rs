//! Search API route
//!
//! `GET /api/search?query=blake&fuzzy=false&page=1&page_size=20`
//!
//! The engine returns at most 50 ranked hits; `page` and `page_size` slice
//! that list. Failures inside the engine surface as an empty result list.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::run_blocking;
use crate::error::{AppError, Result};
use crate::search::{SearchResult, MAX_RESULTS};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/search", get(search))
}

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    /// Accepted and ignored
    pub fuzzy: Option<String>,
    /// 1-based results page (default: 1)
    pub page: Option<usize>,
    /// Results per page (default and maximum: 50)
    pub page_size: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total_results: usize,
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
}

impl SearchResponse {
    fn paginate(all: Vec<SearchResult>, page: Option<usize>, page_size: Option<usize>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let page_size = page_size.unwrap_or(MAX_RESULTS).clamp(1, MAX_RESULTS);
        let total_results = all.len();
        let total_pages = total_results.div_ceil(page_size);

        let results = all
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .collect();

        Self {
            results,
            total_results,
            total_pages,
            page,
            page_size,
        }
    }
}

/// Lenient boolean: true, 1, yes and on (any case) are true
fn parse_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "1" | "yes" | "on")
    )
}

async fn search(
    State(state): State<AppState>,
    params: std::result::Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<SearchResponse>> {
    let Query(params) = params?;
    let query = params
        .query
        .ok_or_else(|| AppError::BadRequest("Missing query parameter".to_string()))?;
    let fuzzy = parse_flag(params.fuzzy.as_deref());

    // May build the index on first use
    let results = run_blocking(move || Ok(state.search().search(&query, fuzzy))).await?;

    Ok(Json(SearchResponse::paginate(
        results,
        params.page,
        params.page_size,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hits(n: u64) -> Vec<SearchResult> {
        (1..=n)
            .map(|page| SearchResult {
                page,
                snippet: "...".to_string(),
                matched_line: String::new(),
            })
            .collect()
    }

    #[test]
    fn test_paginate_defaults() {
        let response = SearchResponse::paginate(hits(12), None, None);
        assert_eq!(response.results.len(), 12);
        assert_eq!(response.total_pages, 1);
        assert_eq!(response.page, 1);
        assert_eq!(response.page_size, MAX_RESULTS);
    }

    #[test]
    fn test_paginate_slices_pages() {
        let response = SearchResponse::paginate(hits(12), Some(3), Some(5));
        let pages: Vec<u64> = response.results.iter().map(|r| r.page).collect();
        assert_eq!(pages, vec![11, 12]);
        assert_eq!(response.total_results, 12);
        assert_eq!(response.total_pages, 3);
    }

    #[test]
    fn test_paginate_clamps_parameters() {
        let response = SearchResponse::paginate(hits(3), Some(0), Some(500));
        assert_eq!(response.page, 1);
        assert_eq!(response.page_size, MAX_RESULTS);

        let response = SearchResponse::paginate(hits(3), Some(9), Some(0));
        assert_eq!(response.page_size, 1);
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_paginate_empty() {
        let response = SearchResponse::paginate(Vec::new(), None, None);
        assert_eq!(response.total_results, 0);
        assert_eq!(response.total_pages, 0);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag(Some("true")));
        assert!(parse_flag(Some("1")));
        assert!(parse_flag(Some("Yes")));
        assert!(!parse_flag(Some("false")));
        assert!(!parse_flag(None));
    }
}
