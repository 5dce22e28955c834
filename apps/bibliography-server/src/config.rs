//! Configuration management for the bibliography server

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::document::{DEFAULT_CAPACITY, DEFAULT_PINNED_PAGES};
use crate::search::DEFAULT_INDEX_DIR;

/// Where the bibliography is fetched from when it is missing locally
pub const DEFAULT_PDF_URL: &str = "https://github.com/blakearchive/william-blake-bibliography-viewer/raw/main/backend/Bibliography%20Final%20Draft.pdf";

/// Local file name of the bibliography
pub const DEFAULT_PDF_PATH: &str = "Bibliography Final Draft.pdf";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub document: DocumentConfig,
    pub search: SearchConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentConfig {
    pub path: PathBuf,
    /// Download source used when `path` does not exist
    pub url: String,
    /// Render scale, 1.0 = 72 dpi
    pub render_scale: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub index_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub page_capacity: usize,
    pub pinned_pages: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            document: DocumentConfig {
                path: PathBuf::from(DEFAULT_PDF_PATH),
                url: DEFAULT_PDF_URL.to_string(),
                render_scale: 1.0,
            },
            search: SearchConfig {
                index_dir: PathBuf::from(DEFAULT_INDEX_DIR),
            },
            cache: CacheConfig {
                page_capacity: DEFAULT_CAPACITY,
                pinned_pages: DEFAULT_PINNED_PAGES,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse(&lookup, "SERVER_PORT", defaults.server.port)?,
            },
            document: DocumentConfig {
                path: lookup("PDF_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.document.path),
                url: lookup("PDF_URL").unwrap_or(defaults.document.url),
                render_scale: parse(&lookup, "RENDER_SCALE", defaults.document.render_scale)?,
            },
            search: SearchConfig {
                index_dir: lookup("SEARCH_INDEX_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.search.index_dir),
            },
            cache: CacheConfig {
                page_capacity: parse(&lookup, "PAGE_CACHE_CAPACITY", defaults.cache.page_capacity)?,
                pinned_pages: parse(&lookup, "PINNED_PAGES", defaults.cache.pinned_pages)?,
            },
        })
    }
}

fn parse<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
