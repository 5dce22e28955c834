//! Document traits
//!
//! The seam between the HTTP/search layers and the rendering backend.

use super::error::{DocumentError, Result};
use super::types::{DocumentInfo, OutlineEntry, PageLink, PageText};

/// Read-only access to the pages of a single document
///
/// Page numbers are 1-based throughout. Implementations must return
/// [`DocumentError::PageOutOfRange`] for pages outside `1..=page_count()`.
/// Content is assumed stable for the lifetime of the process.
pub trait DocumentSource: Send + Sync {
    /// Number of pages
    fn page_count(&self) -> usize;

    /// Title, author and page count
    fn info(&self) -> Result<DocumentInfo>;

    /// Plain text of a page
    fn page_text(&self, page: usize) -> Result<String>;

    /// Render a page to PNG bytes
    fn render_page(&self, page: usize) -> Result<Vec<u8>>;

    /// Text blocks, lines and spans with bounding boxes
    fn structured_text(&self, page: usize) -> Result<PageText>;

    /// Links placed on a page
    fn page_links(&self, page: usize) -> Result<Vec<PageLink>>;

    /// Flat, depth-annotated outline in document order
    fn outline(&self) -> Result<Vec<OutlineEntry>>;

    /// Validate a 1-based page number
    fn check_page(&self, page: usize) -> Result<()> {
        let count = self.page_count();
        if page < 1 || page > count {
            return Err(DocumentError::PageOutOfRange(page, count));
        }
        Ok(())
    }
}
