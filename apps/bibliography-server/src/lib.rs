//! Bibliography Server Library
//!
//! Backend for the bibliography viewer: renders pages of a single PDF,
//! serves their text geometry and bookmark tree, and runs full-text search
//! over page contents. The server binary is in main.rs.
//!
//! # Modules
//!
//! - `document`: page rendering and text extraction behind `DocumentSource`
//! - `search`: tantivy index lifecycle and query engine
//! - `outline`: bookmark tree and anchor lookup
//! - `routes`: HTTP handlers

pub mod bootstrap;
pub mod config;
pub mod document;
pub mod error;
pub mod outline;
pub mod routes;
pub mod search;
pub mod state;

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;
