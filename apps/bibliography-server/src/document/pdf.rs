//! MuPDF-backed document source
//!
//! MuPDF documents are not thread-safe. `PdfDocument` keeps only the file
//! path and opens a fresh document for each operation, with access
//! serialized through a `parking_lot::Mutex`.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use mupdf::{Colorspace, Document, Matrix, MetadataName};
use parking_lot::Mutex;

use super::error::{DocumentError, Result};
use super::stext::extract_page_text;
use super::traits::DocumentSource;
use super::types::{DocumentInfo, OutlineEntry, PageLink, PageText, DEFAULT_TITLE};

/// The bibliography PDF on disk
pub struct PdfDocument {
    path: PathBuf,
    page_count: usize,
    /// Render scale (1.0 = 72 dpi)
    scale: f32,
    lock: Mutex<()>,
}

impl PdfDocument {
    /// Open a PDF and cache its page count
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(DocumentError::NotFound(path.display().to_string()));
        }

        let doc = Document::open(&*path.to_string_lossy())?;
        let page_count = doc.page_count()? as usize;

        tracing::info!("Opened {} ({} pages)", path.display(), page_count);

        Ok(Self {
            path,
            page_count,
            scale: 1.0,
            lock: Mutex::new(()),
        })
    }

    /// Set the render scale, clamped to 0.1..=4.0
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale.clamp(0.1, 4.0);
        self
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Execute a closure with a freshly opened document
    fn with_doc<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&Document) -> Result<R>,
    {
        let _guard = self.lock.lock();
        let doc = Document::open(&*self.path.to_string_lossy())?;
        f(&doc)
    }

    fn flatten_outline(outlines: &[mupdf::Outline], level: u32, out: &mut Vec<OutlineEntry>) {
        for outline in outlines {
            let page = outline.page.map(|p| p as i32 + 1).unwrap_or(-1);
            out.push(OutlineEntry::new(level, outline.title.clone(), page));
            Self::flatten_outline(&outline.down, level + 1, out);
        }
    }

    /// Encode an RGB pixmap without alpha as PNG
    ///
    /// Rows may be padded past `width * 3` bytes, so each row is cut to size.
    fn encode_png(pixmap: &mupdf::Pixmap) -> Result<Vec<u8>> {
        let width = pixmap.width() as u32;
        let height = pixmap.height() as u32;
        let samples = pixmap.samples();
        let row_len = width as usize * 3;
        let stride = samples.len() / (height as usize).max(1);

        if pixmap.n() != 3 || stride < row_len {
            return Err(DocumentError::ImageError(format!(
                "Unexpected pixmap layout: {} components, {} bytes per row",
                pixmap.n(),
                stride
            )));
        }

        let rgb: Vec<u8> = samples
            .chunks_exact(stride)
            .flat_map(|row| &row[..row_len])
            .copied()
            .collect();
        let img = image::RgbImage::from_raw(width, height, rgb)
            .ok_or_else(|| DocumentError::ImageError("Failed to create image buffer".to_string()))?;

        let mut output = Vec::new();
        img.write_to(&mut Cursor::new(&mut output), image::ImageFormat::Png)?;
        Ok(output)
    }
}

impl DocumentSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn info(&self) -> Result<DocumentInfo> {
        self.with_doc(|doc| {
            let get_meta = |name: MetadataName| -> Option<String> {
                doc.metadata(name).ok().filter(|s| !s.is_empty())
            };

            Ok(DocumentInfo {
                total_pages: self.page_count,
                title: get_meta(MetadataName::Title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                author: get_meta(MetadataName::Author).unwrap_or_default(),
            })
        })
    }

    fn page_text(&self, page: usize) -> Result<String> {
        self.check_page(page)?;
        self.with_doc(|doc| {
            let page = doc.load_page((page - 1) as i32)?;
            page.to_text()
                .map_err(|e| DocumentError::TextExtractionError(e.to_string()))
        })
    }

    fn render_page(&self, page: usize) -> Result<Vec<u8>> {
        self.check_page(page)?;
        self.with_doc(|doc| {
            let page = doc.load_page((page - 1) as i32)?;
            let matrix = Matrix::new_scale(self.scale, self.scale);
            let colorspace = Colorspace::device_rgb();
            let pixmap = page
                .to_pixmap(&matrix, &colorspace, false, true)
                .map_err(|e| DocumentError::RenderError(e.to_string()))?;
            Self::encode_png(&pixmap)
        })
    }

    fn structured_text(&self, page: usize) -> Result<PageText> {
        self.check_page(page)?;
        self.with_doc(|doc| {
            let mupdf_page = doc.load_page((page - 1) as i32)?;
            extract_page_text(&mupdf_page, page)
        })
    }

    fn page_links(&self, page: usize) -> Result<Vec<PageLink>> {
        self.check_page(page)?;
        self.with_doc(|doc| {
            let mupdf_page = doc.load_page((page - 1) as i32)?;
            let links = mupdf_page
                .links()?
                .map(|link| {
                    let rect = [link.bounds.x0, link.bounds.y0, link.bounds.x1, link.bounds.y1];
                    if is_external(&link.uri) {
                        PageLink {
                            rect,
                            uri: Some(link.uri),
                            page: None,
                        }
                    } else {
                        PageLink {
                            rect,
                            uri: None,
                            page: Some(link.page + 1),
                        }
                    }
                })
                .collect();
            Ok(links)
        })
    }

    fn outline(&self) -> Result<Vec<OutlineEntry>> {
        self.with_doc(|doc| {
            let outlines = doc.outlines()?;
            let mut flat = Vec::new();
            Self::flatten_outline(&outlines, 1, &mut flat);
            Ok(flat)
        })
    }
}

/// Links with a scheme point outside the document
fn is_external(uri: &str) -> bool {
    uri.contains("://") || uri.starts_with("mailto:")
}
