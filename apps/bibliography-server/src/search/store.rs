//! Index store lifecycle
//!
//! The index lives in a single directory. Its presence is the only thing
//! checked on startup: if the directory exists it is trusted as-is, without
//! comparing it against the current document. If it is absent, every page is
//! read and the index is written with one commit.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use tantivy::{Index, IndexWriter};

use super::error::{Result, SearchError};
use super::schema::{schema, IndexFields, PageRecord};
use crate::document::DocumentSource;

/// Writer memory budget
const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Default index location, suitable for ephemeral containers
pub const DEFAULT_INDEX_DIR: &str = "/tmp/indexdir";

/// Outcome of [`IndexStore::ensure`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    /// The directory already existed and was left untouched
    Existing,
    /// The index was built by this call
    Built,
}

/// On-disk search index for the document's pages
pub struct IndexStore {
    dir: PathBuf,
    /// Serializes builds so concurrent first searches run one build
    build_lock: Mutex<()>,
}

impl IndexStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            build_lock: Mutex::new(()),
        }
    }

    /// Index directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether the index directory exists
    pub fn exists(&self) -> bool {
        self.dir.exists()
    }

    /// Build the index if it is absent
    ///
    /// An existing directory is assumed valid. Building needs a document;
    /// without one an absent index is reported as unavailable.
    pub fn ensure(&self, source: Option<&dyn DocumentSource>) -> Result<IndexStatus> {
        let _guard = self.build_lock.lock();

        if self.exists() {
            return Ok(IndexStatus::Existing);
        }

        let source = source.ok_or_else(|| {
            SearchError::Unavailable("index is missing and no document is loaded".to_string())
        })?;
        self.build_locked(source)?;
        Ok(IndexStatus::Built)
    }

    /// Build the index if absent, logging failures
    ///
    /// Returns whether the index is ready. Safe to call repeatedly.
    pub fn ensure_index(&self, source: Option<&dyn DocumentSource>) -> bool {
        match self.ensure(source) {
            Ok(_) => true,
            Err(e @ SearchError::PermissionDenied { .. }) => {
                tracing::warn!("{}; search functionality will be disabled", e);
                false
            }
            Err(e) => {
                tracing::warn!("Search index not ready: {}", e);
                false
            }
        }
    }

    /// Rebuild the index from scratch
    ///
    /// Any existing index is removed first. Returns the number of pages indexed.
    pub fn build(&self, source: &dyn DocumentSource) -> Result<usize> {
        let _guard = self.build_lock.lock();
        if self.exists() {
            fs::remove_dir_all(&self.dir)?;
        }
        self.build_locked(source)
    }

    fn build_locked(&self, source: &dyn DocumentSource) -> Result<usize> {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            return Err(match e.kind() {
                ErrorKind::PermissionDenied => SearchError::PermissionDenied {
                    path: self.dir.clone(),
                    source: e,
                },
                _ => e.into(),
            });
        }

        match self.write_pages(source) {
            Ok(count) => {
                tracing::info!(
                    "Search index built successfully at {} ({} pages)",
                    self.dir.display(),
                    count
                );
                Ok(count)
            }
            Err(e) => {
                tracing::error!("Error building search index: {}", e);
                // Nothing was committed; drop the directory so the next call retries
                if let Err(cleanup) = fs::remove_dir_all(&self.dir) {
                    tracing::warn!(
                        "Failed to remove incomplete index at {}: {}",
                        self.dir.display(),
                        cleanup
                    );
                }
                Err(e)
            }
        }
    }

    fn write_pages(&self, source: &dyn DocumentSource) -> Result<usize> {
        let (schema, fields) = schema();
        let index = Index::create_in_dir(&self.dir, schema)?;
        let mut writer: IndexWriter = index.writer_with_num_threads(1, WRITER_HEAP_BYTES)?;

        let page_count = source.page_count();
        for page in 1..=page_count {
            let record = PageRecord::read(source, page)?;
            writer.add_document(record.to_document(fields))?;
        }

        // Single commit: all pages become visible together
        writer.commit()?;
        Ok(page_count)
    }

    /// Open the index and resolve its fields
    pub fn open(&self) -> Result<(Index, IndexFields)> {
        if !self.exists() {
            return Err(SearchError::Unavailable(format!(
                "no index at {}",
                self.dir.display()
            )));
        }
        let index = Index::open_in_dir(&self.dir)?;
        let fields = IndexFields::from_schema(&index.schema())?;
        Ok((index, fields))
    }

    /// Hex SHA-256 over the names, sizes and modification times of the index files
    ///
    /// Unchanged as long as nothing rewrites the store.
    pub fn fingerprint(&self) -> Result<String> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            let modified = metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_nanos())
                .unwrap_or(0);
            entries.push((
                entry.file_name().to_string_lossy().into_owned(),
                metadata.len(),
                modified,
            ));
        }
        entries.sort();

        let mut hasher = Sha256::new();
        for (name, len, modified) in entries {
            hasher.update(name.as_bytes());
            hasher.update(len.to_le_bytes());
            hasher.update(modified.to_le_bytes());
        }
        Ok(hex::encode(hasher.finalize()))
    }
}
