//! Structured Text Helpers
//!
//! Converts MuPDF structured text into the block/line/span geometry
//! served by `/api/page/{n}/text`.

use mupdf::{Page, TextPageOptions};

use super::error::Result;
use super::types::{union_bbox, BBox, PageText, TextBlock, TextLine, TextSpan};

/// Two characters belong to the same span when their sizes differ by less than this
const SIZE_EPSILON: f32 = 0.01;

/// Extract blocks, lines and spans from a page
///
/// MuPDF 0.5 does not expose per-character font names or flags, so spans
/// are split on font size changes and report an empty font with no flags.
pub fn extract_page_text(page: &Page, page_num: usize) -> Result<PageText> {
    let text_page = page.to_text_page(TextPageOptions::empty())?;
    let bounds = page.bounds()?;

    let mut blocks = Vec::new();

    for block in text_page.blocks() {
        let block_bounds = block.bounds();
        let mut lines = Vec::new();

        for line in block.lines() {
            let line_bounds = line.bounds();
            let mut spans: Vec<TextSpan> = Vec::new();

            for ch in line.chars() {
                let Some(c) = ch.char() else { continue };

                let quad = ch.quad();
                let char_bbox: BBox = [
                    quad.ul.x.min(quad.ll.x),
                    quad.ul.y.min(quad.ur.y),
                    quad.ur.x.max(quad.lr.x),
                    quad.ll.y.max(quad.lr.y),
                ];
                let size = ch.size();

                match spans.last_mut() {
                    Some(span) if (span.size - size).abs() < SIZE_EPSILON => {
                        span.text.push(c);
                        span.bbox = union_bbox(span.bbox, char_bbox);
                    }
                    _ => spans.push(TextSpan {
                        text: c.to_string(),
                        bbox: char_bbox,
                        font: String::new(),
                        size,
                        flags: 0,
                    }),
                }
            }

            lines.push(TextLine {
                bbox: [line_bounds.x0, line_bounds.y0, line_bounds.x1, line_bounds.y1],
                spans,
            });
        }

        // Image blocks carry no lines
        if lines.is_empty() {
            continue;
        }

        blocks.push(TextBlock {
            bbox: [block_bounds.x0, block_bounds.y0, block_bounds.x1, block_bounds.y1],
            lines,
        });
    }

    Ok(PageText {
        page: page_num,
        width: bounds.x1 - bounds.x0,
        height: bounds.y1 - bounds.y0,
        blocks,
    })
}
