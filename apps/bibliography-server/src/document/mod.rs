//! Document abstraction
//!
//! The served bibliography is reached through the [`DocumentSource`] trait.
//! [`PdfDocument`] implements it on top of MuPDF; [`MemoryDocument`] serves
//! pages from strings.
//!
//! ```text
//!   routes ──► PageCache ──► DocumentSource ◄── search::IndexStore
//!                                 │
//!                  ┌──────────────┴──────────────┐
//!                  ▼                             ▼
//!            PdfDocument                  MemoryDocument
//!      (MuPDF, fresh doc per op)          (in-memory pages)
//! ```

mod cache;
mod error;
mod memory;
mod pdf;
mod stext;
mod traits;
mod types;

pub use cache::{CacheStats, PageCache, DEFAULT_CAPACITY, DEFAULT_PINNED_PAGES};
pub use error::{DocumentError, DocumentResult, Result};
pub use memory::MemoryDocument;
pub use pdf::PdfDocument;
pub use traits::DocumentSource;
pub use types::{
    BBox, DocumentInfo, OutlineEntry, PageLink, PageText, TextBlock, TextLine, TextSpan,
    DEFAULT_TITLE,
};
