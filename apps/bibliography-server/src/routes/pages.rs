//! Page endpoints
//!
//! - `GET /api/info`: page count, title and author
//! - `GET /api/page/:page`: page rendered as PNG
//! - `GET /api/page/:page/text`: text blocks with coordinates
//! - `GET /api/page/:page/links`: link rectangles and targets

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::run_blocking;
use crate::document::{DocumentInfo, PageLink, PageText};
use crate::error::{AppError, Result};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/info", get(get_info))
        .route("/page/:page", get(get_page))
        .route("/page/:page/text", get(get_page_text))
        .route("/page/:page/links", get(get_page_links))
}

#[derive(Serialize)]
pub struct LinksResponse {
    pub links: Vec<PageLink>,
}

/// Path segment holding the page number, kept raw so parsing is ours
type PageSegment = std::result::Result<Path<String>, PathRejection>;

/// Convert the raw path segment into a 1-based page number
///
/// Anything that is not a page of some document (zero, negative, too large
/// or not a number) is reported as out of range, same as numbers past the
/// end of the document.
fn page_number(segment: PageSegment) -> Result<usize> {
    let Path(raw) = segment?;
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|page| *page >= 1)
        .ok_or_else(|| AppError::NotFound("Page out of range".to_string()))
}

async fn get_info(State(state): State<AppState>) -> Result<Json<DocumentInfo>> {
    let document = state.document()?;
    let info = run_blocking(move || {
        document
            .info()
            .map_err(|e| AppError::failed(e, "Failed to get PDF information"))
    })
    .await?;
    Ok(Json(info))
}

async fn get_page(State(state): State<AppState>, page: PageSegment) -> Result<Response> {
    let page = page_number(page)?;
    let document = state.document()?;

    let png = run_blocking(move || {
        let message = format!("Failed to load page {}", page);
        document
            .check_page(page)
            .map_err(|e| AppError::failed(e, message.clone()))?;
        state
            .page_images()
            .get_or_try_insert_with(page, || document.render_page(page).map(Bytes::from))
            .map_err(|e| AppError::failed(e, message))
    })
    .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "max-age=3600"),
        ],
        png,
    )
        .into_response())
}

async fn get_page_text(
    State(state): State<AppState>,
    page: PageSegment,
) -> Result<Json<PageText>> {
    let page = page_number(page)?;
    let document = state.document()?;

    let text = run_blocking(move || {
        let message = format!("Failed to load text for page {}", page);
        document
            .check_page(page)
            .map_err(|e| AppError::failed(e, message.clone()))?;
        state
            .page_text()
            .get_or_try_insert_with(page, || document.structured_text(page).map(Arc::new))
            .map_err(|e| AppError::failed(e, message))
    })
    .await?;

    Ok(Json(PageText::clone(&text)))
}

async fn get_page_links(
    State(state): State<AppState>,
    page: PageSegment,
) -> Result<Json<LinksResponse>> {
    let page = page_number(page)?;
    let document = state.document()?;

    let links = run_blocking(move || {
        document
            .page_links(page)
            .map_err(|e| AppError::failed(e, format!("Failed to load links for page {}", page)))
    })
    .await?;

    Ok(Json(LinksResponse { links }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_number() {
        let segment = |raw: &str| -> PageSegment { Ok(Path(raw.to_string())) };

        assert_eq!(page_number(segment("1")).unwrap(), 1);
        assert_eq!(page_number(segment("250")).unwrap(), 250);
        for raw in ["0", "-3", "abc", "99999999999999999999999", ""] {
            assert!(
                matches!(page_number(segment(raw)), Err(AppError::NotFound(_))),
                "{}",
                raw
            );
        }
    }
}
