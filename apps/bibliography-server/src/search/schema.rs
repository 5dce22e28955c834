//! Index schema and page records

use serde::{Deserialize, Serialize};
use tantivy::schema::{Field, Schema, Value, FAST, INDEXED, STORED, TEXT};
use tantivy::{doc, TantivyDocument};

use crate::document::{DocumentResult, DocumentSource};

pub const PAGE_FIELD: &str = "page";
pub const CONTENT_FIELD: &str = "content";

/// Field handles of the page index
#[derive(Debug, Clone, Copy)]
pub struct IndexFields {
    pub page: Field,
    pub content: Field,
}

impl IndexFields {
    /// Resolve fields from the schema of an opened index
    pub fn from_schema(schema: &Schema) -> tantivy::Result<Self> {
        Ok(Self {
            page: schema.get_field(PAGE_FIELD)?,
            content: schema.get_field(CONTENT_FIELD)?,
        })
    }
}

/// Build the page schema
///
/// `page` is stored and numerically queryable; `content` is stored and
/// tokenized with positions so phrase queries work.
pub fn schema() -> (Schema, IndexFields) {
    let mut builder = Schema::builder();
    let page = builder.add_u64_field(PAGE_FIELD, INDEXED | STORED | FAST);
    let content = builder.add_text_field(CONTENT_FIELD, TEXT | STORED);
    (builder.build(), IndexFields { page, content })
}

/// One page's text, the unit stored in the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub page: u64,
    pub content: String,
}

impl PageRecord {
    /// Read a page from the document
    pub fn read(source: &dyn DocumentSource, page: usize) -> DocumentResult<Self> {
        Ok(Self {
            page: page as u64,
            content: source.page_text(page)?,
        })
    }

    pub fn to_document(&self, fields: IndexFields) -> TantivyDocument {
        doc!(
            fields.page => self.page,
            fields.content => self.content.clone(),
        )
    }

    /// Rebuild a record from a stored document
    pub fn from_document(document: &TantivyDocument, fields: IndexFields) -> Option<Self> {
        let page = document.get_first(fields.page).and_then(|v| v.as_u64())?;
        let content = document
            .get_first(fields.content)
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();
        Some(Self { page, content })
    }
}
