//! In-memory document source
//!
//! Serves pages from a list of strings. Used by the test suites and the
//! search benchmarks in place of a real PDF. Renders are counted so
//! callers can observe whether a cache was hit.

use std::collections::HashSet;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::{DocumentError, Result};
use super::traits::DocumentSource;
use super::types::{DocumentInfo, OutlineEntry, PageLink, PageText, TextBlock, TextLine, TextSpan, DEFAULT_TITLE};

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const LINE_HEIGHT: f32 = 14.0;
const FONT_SIZE: f32 = 12.0;

/// Document held entirely in memory
pub struct MemoryDocument {
    pages: Vec<String>,
    title: Option<String>,
    author: Option<String>,
    outline: Vec<OutlineEntry>,
    links: Vec<(usize, PageLink)>,
    broken_pages: HashSet<usize>,
    renders: AtomicUsize,
    text_extractions: AtomicUsize,
}

impl MemoryDocument {
    /// Create a document with one string per page
    pub fn new<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: pages.into_iter().map(Into::into).collect(),
            title: None,
            author: None,
            outline: Vec::new(),
            links: Vec::new(),
            broken_pages: HashSet::new(),
            renders: AtomicUsize::new(0),
            text_extractions: AtomicUsize::new(0),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_outline(mut self, outline: Vec<OutlineEntry>) -> Self {
        self.outline = outline;
        self
    }

    /// Attach a link to a page
    pub fn with_link(mut self, page: usize, link: PageLink) -> Self {
        self.links.push((page, link));
        self
    }

    /// Make every operation on `page` fail, as a damaged page would
    pub fn with_broken_page(mut self, page: usize) -> Self {
        self.broken_pages.insert(page);
        self
    }

    /// Number of times `render_page` produced an image
    pub fn render_count(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }

    /// Number of times `structured_text` produced a result
    pub fn text_extraction_count(&self) -> usize {
        self.text_extractions.load(Ordering::SeqCst)
    }

    fn content(&self, page: usize) -> Result<&str> {
        self.check_page(page)?;
        if self.broken_pages.contains(&page) {
            return Err(DocumentError::TextExtractionError(format!(
                "page {} is damaged",
                page
            )));
        }
        Ok(&self.pages[page - 1])
    }
}

impl DocumentSource for MemoryDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn info(&self) -> Result<DocumentInfo> {
        Ok(DocumentInfo {
            total_pages: self.pages.len(),
            title: self.title.clone().unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            author: self.author.clone().unwrap_or_default(),
        })
    }

    fn page_text(&self, page: usize) -> Result<String> {
        self.content(page).map(str::to_string)
    }

    fn render_page(&self, page: usize) -> Result<Vec<u8>> {
        let content = self.content(page)?;

        // Shade encodes the page number so distinct pages differ
        let shade = (page % 256) as u8;
        let width = 8 + (content.len() % 8) as u32;
        let img = image::GrayImage::from_pixel(width, 8, image::Luma([shade]));

        let mut output = Vec::new();
        image::DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut output), image::ImageFormat::Png)?;

        self.renders.fetch_add(1, Ordering::SeqCst);
        Ok(output)
    }

    fn structured_text(&self, page: usize) -> Result<PageText> {
        let content = self.content(page)?;

        let mut lines = Vec::new();
        for (i, line) in content.lines().filter(|l| !l.is_empty()).enumerate() {
            let y0 = 72.0 + i as f32 * LINE_HEIGHT;
            let bbox = [72.0, y0, 72.0 + line.chars().count() as f32 * 6.0, y0 + FONT_SIZE];
            lines.push(TextLine {
                bbox,
                spans: vec![TextSpan {
                    text: line.to_string(),
                    bbox,
                    font: "Helvetica".to_string(),
                    size: FONT_SIZE,
                    flags: 0,
                }],
            });
        }

        let blocks = match (lines.first(), lines.last()) {
            (Some(first), Some(last)) => {
                let bbox = [72.0, first.bbox[1], PAGE_WIDTH - 72.0, last.bbox[3]];
                vec![TextBlock { bbox, lines }]
            }
            _ => Vec::new(),
        };

        self.text_extractions.fetch_add(1, Ordering::SeqCst);
        Ok(PageText {
            page,
            width: PAGE_WIDTH,
            height: PAGE_HEIGHT,
            blocks,
        })
    }

    fn page_links(&self, page: usize) -> Result<Vec<PageLink>> {
        self.content(page)?;
        Ok(self
            .links
            .iter()
            .filter(|(p, _)| *p == page)
            .map(|(_, link)| link.clone())
            .collect())
    }

    fn outline(&self) -> Result<Vec<OutlineEntry>> {
        Ok(self.outline.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_pages() {
        let doc = MemoryDocument::new(["one", "two"]);
        assert!(matches!(doc.page_text(0), Err(DocumentError::PageOutOfRange(0, 2))));
        assert!(matches!(doc.page_text(3), Err(DocumentError::PageOutOfRange(3, 2))));
        assert_eq!(doc.page_text(2).unwrap(), "two");
    }

    #[test]
    fn test_render_produces_png() {
        let doc = MemoryDocument::new(["page one"]);
        let bytes = doc.render_page(1).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.height(), 8);
        assert_eq!(doc.render_count(), 1);
    }

    #[test]
    fn test_structured_text_lines() {
        let doc = MemoryDocument::new(["First line\n\nSecond line"]);
        let text = doc.structured_text(1).unwrap();
        assert_eq!(text.blocks.len(), 1);
        assert_eq!(text.blocks[0].lines.len(), 2);
        assert_eq!(text.blocks[0].lines[1].spans[0].text, "Second line");
    }

    #[test]
    fn test_broken_page_fails() {
        let doc = MemoryDocument::new(["ok", "bad"]).with_broken_page(2);
        assert!(doc.page_text(1).is_ok());
        assert!(doc.page_text(2).is_err());
        assert!(doc.render_page(2).is_err());
    }

    #[test]
    fn test_default_info() {
        let doc = MemoryDocument::new(["a"]);
        let info = doc.info().unwrap();
        assert_eq!(info.total_pages, 1);
        assert_eq!(info.title, DEFAULT_TITLE);
        assert_eq!(info.author, "");
    }
}
