//! Query engine
//!
//! Parses user queries with tantivy's query grammar against the `content`
//! field, ranks by BM25 and turns the top hits into [`SearchResult`]s.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::{Index, IndexReader, ReloadPolicy, TantivyDocument};

use super::error::{Result, SearchError};
use super::schema::{IndexFields, PageRecord};
use super::snippet::{make_snippet, matching_line};
use super::store::{IndexStatus, IndexStore};
use crate::document::DocumentSource;

/// Maximum number of results returned by a query
pub const MAX_RESULTS: usize = 50;

/// A ranked search hit
///
/// Serialized with the field names the viewer frontend reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub page: u64,
    /// First 200 characters of the page followed by "..."
    #[serde(rename = "content")]
    pub snippet: String,
    /// First line containing the raw query, or empty
    #[serde(rename = "line")]
    pub matched_line: String,
}

impl SearchResult {
    fn from_record(record: &PageRecord, query: &str) -> Self {
        Self {
            page: record.page,
            snippet: make_snippet(&record.content),
            matched_line: matching_line(&record.content, query),
        }
    }
}

/// An opened index with a reader
struct OpenIndex {
    index: Index,
    reader: IndexReader,
    fields: IndexFields,
}

/// Full-text search over the document's pages
pub struct SearchEngine {
    store: IndexStore,
    /// Needed only to build a missing index
    source: Option<Arc<dyn DocumentSource>>,
    opened: RwLock<Option<Arc<OpenIndex>>>,
}

impl SearchEngine {
    pub fn new(store: IndexStore, source: Option<Arc<dyn DocumentSource>>) -> Self {
        Self {
            store,
            source,
            opened: RwLock::new(None),
        }
    }

    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    /// Build the index if it is absent; returns whether search is ready
    pub fn ensure_index(&self) -> bool {
        match self.store.ensure(self.source.as_deref()) {
            Ok(status) => {
                self.forget_if_rebuilt(status);
                true
            }
            Err(e) => {
                tracing::warn!("Search index not ready: {}", e);
                false
            }
        }
    }

    /// Run a query, returning an empty list on any failure
    ///
    /// `fuzzy` is accepted for API compatibility and has no effect.
    pub fn search(&self, query: &str, fuzzy: bool) -> Vec<SearchResult> {
        match self.try_search(query, fuzzy) {
            Ok(results) => results,
            Err(e) if e.is_unavailable() => {
                tracing::warn!("Search unavailable: {}", e);
                Vec::new()
            }
            Err(e) => {
                tracing::error!("Search error for query {:?}: {}", query, e);
                Vec::new()
            }
        }
    }

    /// Run a query, reporting why it failed
    ///
    /// `Ok(vec![])` means the query ran and matched nothing.
    pub fn try_search(&self, query: &str, _fuzzy: bool) -> Result<Vec<SearchResult>> {
        let t0 = std::time::Instant::now();

        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let status = self.store.ensure(self.source.as_deref())?;
        self.forget_if_rebuilt(status);

        let opened = self.open_index()?;
        let parser = QueryParser::for_index(&opened.index, vec![opened.fields.content]);
        let parsed = parser
            .parse_query(query)
            .map_err(|e| SearchError::InvalidQuery(e.to_string()))?;

        let searcher = opened.reader.searcher();
        let top_docs = searcher.search(&parsed, &TopDocs::with_limit(MAX_RESULTS))?;

        let mut results = Vec::with_capacity(top_docs.len());
        for (_score, address) in top_docs {
            let document: TantivyDocument = searcher.doc(address)?;
            if let Some(record) = PageRecord::from_document(&document, opened.fields) {
                results.push(SearchResult::from_record(&record, query));
            }
        }

        tracing::debug!(
            "search q={:?} n={} elapsed={}ms",
            query,
            results.len(),
            t0.elapsed().as_millis()
        );
        Ok(results)
    }

    /// Number of page records in the index
    pub fn num_records(&self) -> Result<u64> {
        Ok(self.open_index()?.reader.searcher().num_docs())
    }

    fn forget_if_rebuilt(&self, status: IndexStatus) {
        if status == IndexStatus::Built {
            *self.opened.write() = None;
        }
    }

    /// Open the index lazily and keep the reader around
    fn open_index(&self) -> Result<Arc<OpenIndex>> {
        if let Some(opened) = self.opened.read().as_ref() {
            return Ok(Arc::clone(opened));
        }

        let mut slot = self.opened.write();
        if let Some(opened) = slot.as_ref() {
            return Ok(Arc::clone(opened));
        }

        let (index, fields) = self.store.open()?;
        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        let opened = Arc::new(OpenIndex {
            index,
            reader,
            fields,
        });
        *slot = Some(Arc::clone(&opened));
        Ok(opened)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryDocument;
    use crate::search::ELLIPSIS;
    use tempfile::TempDir;

    fn engine(temp_dir: &TempDir, pages: &[&str]) -> SearchEngine {
        let source: Arc<dyn DocumentSource> =
            Arc::new(MemoryDocument::new(pages.iter().copied()));
        SearchEngine::new(IndexStore::new(temp_dir.path().join("index")), Some(source))
    }

    #[test]
    fn test_search_finds_page() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(
            &temp_dir,
            &[
                "Preface\nScope of this bibliography",
                "Part I\nWilliam Blake, Songs of Innocence (1789)",
                "Part II\nCommentary on Milton",
            ],
        );

        let results = engine.search("Blake", false);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].page, 2);
        assert!(results[0].matched_line.to_lowercase().contains("blake"));
        assert!(results[0].snippet.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_bare_terms_are_ored() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(&temp_dir, &["Blake", "Milton", "Wordsworth"]);

        let mut pages: Vec<u64> = engine
            .search("blake milton", false)
            .iter()
            .map(|r| r.page)
            .collect();
        pages.sort_unstable();
        assert_eq!(pages, vec![1, 2]);
    }

    #[test]
    fn test_phrase_query_passes_through() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(
            &temp_dir,
            &["songs of innocence", "innocence and songs"],
        );

        let results = engine.search("\"songs of innocence\"", false);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].page, 1);
    }

    #[test]
    fn test_results_are_capped() {
        let temp_dir = TempDir::new().unwrap();
        let pages: Vec<String> = (1..=60).map(|i| format!("Blake entry {}", i)).collect();
        let page_refs: Vec<&str> = pages.iter().map(String::as_str).collect();
        let engine = engine(&temp_dir, &page_refs);

        assert_eq!(engine.search("blake", false).len(), MAX_RESULTS);
    }

    #[test]
    fn test_no_matches_is_ok_and_empty() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(&temp_dir, &["Blake"]);

        assert!(engine.try_search("Jerusalem", false).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_query_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(&temp_dir, &["Blake"]);

        let err = engine.try_search("nosuchfield:blake", false).unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery(_)));
        assert!(engine.search("nosuchfield:blake", false).is_empty());
    }

    #[test]
    fn test_search_without_index_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let engine = SearchEngine::new(IndexStore::new(temp_dir.path().join("index")), None);

        let err = engine.try_search("Blake", false).unwrap_err();
        assert!(err.is_unavailable());
        assert!(engine.search("Blake", false).is_empty());
    }

    #[test]
    fn test_fuzzy_flag_is_inert() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(&temp_dir, &["Blake", "Blaek"]);

        assert_eq!(engine.search("Blake", true), engine.search("Blake", false));
    }

    #[test]
    fn test_blank_query_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(&temp_dir, &["Blake"]);

        assert!(engine.try_search("   ", false).unwrap().is_empty());
        // Blank queries do not trigger a build
        assert!(!engine.store().exists());
    }

    #[test]
    fn test_index_survives_restart() {
        let temp_dir = TempDir::new().unwrap();
        {
            let engine = engine(&temp_dir, &["Blake"]);
            assert!(engine.ensure_index());
        }

        // A new engine without a document serves the existing store
        let engine = SearchEngine::new(IndexStore::new(temp_dir.path().join("index")), None);
        assert_eq!(engine.search("blake", false).len(), 1);
        assert_eq!(engine.num_records().unwrap(), 1);
    }
}
