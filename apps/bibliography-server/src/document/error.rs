//! Document error types
//!
//! Errors raised while opening, rendering or extracting text from the
//! bibliography PDF.

use thiserror::Error;

/// Document error type
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Document file could not be located
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Requested page is outside `1..=page_count`
    #[error("Page {0} out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// Failed to render a page
    #[error("Render error: {0}")]
    RenderError(String),

    /// Failed to extract text from a page
    #[error("Text extraction error: {0}")]
    TextExtractionError(String),

    /// MuPDF reported an error
    #[error("MuPDF error: {0}")]
    MuPdf(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Image encoding error
    #[error("Image error: {0}")]
    ImageError(String),
}

/// Result type alias for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Alias for Result
pub type DocumentResult<T> = Result<T>;

impl From<mupdf::Error> for DocumentError {
    fn from(err: mupdf::Error) -> Self {
        DocumentError::MuPdf(err.to_string())
    }
}

impl From<image::ImageError> for DocumentError {
    fn from(err: image::ImageError) -> Self {
        DocumentError::ImageError(err.to_string())
    }
}
