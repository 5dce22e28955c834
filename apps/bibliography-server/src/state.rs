//! Application state management

use std::sync::{Arc, OnceLock};

use axum::body::Bytes;

use crate::config::Config;
use crate::document::{DocumentSource, PageCache, PageText};
use crate::error::{AppError, Result};
use crate::outline::{build_tree, BookmarkNode};
use crate::search::{IndexStore, SearchEngine};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    /// Absent when the PDF could not be found or downloaded
    document: Option<Arc<dyn DocumentSource>>,
    search: SearchEngine,
    page_images: PageCache<Bytes>,
    page_text: PageCache<Arc<PageText>>,
    bookmarks: OnceLock<Arc<Vec<BookmarkNode>>>,
}

impl AppState {
    /// Create the application state
    ///
    /// Nothing is read from the document here; the search index is built by
    /// [`SearchEngine::ensure_index`] or on the first query.
    pub fn new(config: Config, document: Option<Arc<dyn DocumentSource>>) -> Self {
        let store = IndexStore::new(config.search.index_dir.clone());
        let search = SearchEngine::new(store, document.clone());
        let page_images = PageCache::new(config.cache.page_capacity, config.cache.pinned_pages);
        let page_text = PageCache::new(config.cache.page_capacity, 0);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                document,
                search,
                page_images,
                page_text,
                bookmarks: OnceLock::new(),
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the document, or 503 if none is loaded
    pub fn document(&self) -> Result<Arc<dyn DocumentSource>> {
        self.inner
            .document
            .clone()
            .ok_or_else(|| AppError::ServiceUnavailable("PDF file not available".to_string()))
    }

    pub fn has_document(&self) -> bool {
        self.inner.document.is_some()
    }

    /// Get the search engine
    pub fn search(&self) -> &SearchEngine {
        &self.inner.search
    }

    /// Rendered PNGs by page
    pub fn page_images(&self) -> &PageCache<Bytes> {
        &self.inner.page_images
    }

    /// Text geometry by page
    pub fn page_text(&self) -> &PageCache<Arc<PageText>> {
        &self.inner.page_text
    }

    /// The bookmark tree, read from the document once
    ///
    /// Blocks on the rendering backend the first time; call from a blocking
    /// task. Failures are not cached.
    pub fn bookmarks(&self) -> Result<Arc<Vec<BookmarkNode>>> {
        if let Some(tree) = self.inner.bookmarks.get() {
            return Ok(Arc::clone(tree));
        }

        let document = self.document()?;
        let outline = document
            .outline()
            .map_err(|e| AppError::failed(e, "Failed to read bookmarks"))?;
        let tree = Arc::new(build_tree(&outline));
        tracing::debug!("Bookmark tree built ({} outline entries)", outline.len());

        Ok(Arc::clone(self.inner.bookmarks.get_or_init(|| tree)))
    }
}
