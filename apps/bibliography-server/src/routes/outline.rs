//! Bookmark endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::run_blocking;
use crate::error::{AppError, Result};
use crate::outline::{find_anchor, BookmarkNode};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bookmarks", get(get_bookmarks))
        .route("/anchor/:title", get(jump_to_anchor))
}

#[derive(Serialize)]
pub struct BookmarksResponse {
    pub bookmarks: Vec<BookmarkNode>,
}

#[derive(Serialize)]
pub struct AnchorResponse {
    pub page: i32,
}

async fn bookmark_tree(state: AppState) -> Result<Arc<Vec<BookmarkNode>>> {
    run_blocking(move || state.bookmarks()).await
}

/// GET /api/bookmarks
async fn get_bookmarks(State(state): State<AppState>) -> Result<Json<BookmarksResponse>> {
    let tree = bookmark_tree(state).await?;
    Ok(Json(BookmarksResponse {
        bookmarks: tree.as_ref().clone(),
    }))
}

/// GET /api/anchor/:title
///
/// Exact, case-sensitive match against bookmark titles.
async fn jump_to_anchor(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Json<AnchorResponse>> {
    let bookmarks = bookmark_tree(state).await?;
    find_anchor(&bookmarks, &title)
        .map(|page| Json(AnchorResponse { page }))
        .ok_or_else(|| AppError::NotFound("Anchor not found".to_string()))
}
