//! Full-text search over the document's pages
//!
//! ```text
//!   SearchEngine::search ──► IndexStore::ensure ──(absent)──► build from DocumentSource
//!          │                        │
//!          ▼                        ▼
//!   QueryParser (content)     tantivy directory (SEARCH_INDEX_DIR)
//!          │
//!          ▼
//!   TopDocs(50) ──► snippet + matched line
//! ```
//!
//! The index is built once per store lifetime and never checked against
//! the current document. Deleting the directory is the only way to force a
//! rebuild.

mod engine;
mod error;
mod schema;
mod snippet;
mod store;

pub use engine::{SearchEngine, SearchResult, MAX_RESULTS};
pub use error::{Result, SearchError};
pub use schema::{schema, IndexFields, PageRecord, CONTENT_FIELD, PAGE_FIELD};
pub use snippet::{make_snippet, matching_line, ELLIPSIS, SNIPPET_CHARS};
pub use store::{IndexStatus, IndexStore, DEFAULT_INDEX_DIR};
