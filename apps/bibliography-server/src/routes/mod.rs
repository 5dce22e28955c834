//! Route modules for the bibliography server

use axum::Router;

use crate::error::{AppError, Result};
use crate::state::AppState;

pub mod health;
pub mod outline;
pub mod pages;
pub mod search;

/// Build the application router
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(pages::router())
        .merge(outline::router())
        .merge(search::router());

    Router::new()
        .nest("/api", api)
        .merge(health::router())
        .with_state(state)
}

/// Run MuPDF or tantivy work off the async runtime
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(format!("Blocking task failed: {}", e)))?
}
