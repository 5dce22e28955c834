//! Core document types
//!
//! Wire shapes for document info, page text geometry, page links and the
//! flat outline read from the PDF.

use serde::{Deserialize, Serialize};

/// Title reported when the PDF carries no title metadata
pub const DEFAULT_TITLE: &str = "Bibliography Final Draft";

/// Bounding box `[x0, y0, x1, y1]` in PDF points
pub type BBox = [f32; 4];

/// Document-level information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub total_pages: usize,
    pub title: String,
    pub author: String,
}

/// Text geometry for a single page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    /// 1-based page number
    pub page: usize,
    pub width: f32,
    pub height: f32,
    pub blocks: Vec<TextBlock>,
}

/// A block of text lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBlock {
    pub bbox: BBox,
    pub lines: Vec<TextLine>,
}

/// A line of text spans
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLine {
    pub bbox: BBox,
    pub spans: Vec<TextSpan>,
}

/// A run of characters sharing the same font size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSpan {
    pub text: String,
    pub bbox: BBox,
    /// Font name, empty when the rendering backend does not report it
    pub font: String,
    pub size: f32,
    /// Font flags (bit 1 italic, bit 4 bold)
    pub flags: u32,
}

/// A clickable link on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLink {
    pub rect: BBox,
    /// External target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Internal target, 1-based
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// One entry of the flat outline, as read from the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Nesting depth, starting at 1 for top-level entries
    pub level: u32,
    pub title: String,
    /// 1-based target page, `-1` when the entry has no resolvable target
    pub page: i32,
}

impl OutlineEntry {
    pub fn new(level: u32, title: impl Into<String>, page: i32) -> Self {
        Self {
            level,
            title: title.into(),
            page,
        }
    }
}

/// Union of two bounding boxes
pub(crate) fn union_bbox(a: BBox, b: BBox) -> BBox {
    [a[0].min(b[0]), a[1].min(b[1]), a[2].max(b[2]), a[3].max(b[3])]
}
