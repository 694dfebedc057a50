//! Reading located resources into raw bytes.

use crate::error::{Result, TemplateError};
use crate::resource::fetch::HttpFetcher;
use crate::resource::handle::{ResourceHandle, ResourceSource};
use std::fs;
use std::sync::Arc;

/// Supplies the raw bytes behind a handle.
pub trait ResourceReader: Send + Sync {
    fn read(&self, handle: &ResourceHandle) -> Result<Vec<u8>>;
}

/// Reads files from disk and fetches `http(s)` URLs.
#[derive(Debug, Clone, Default)]
pub struct SourceReader {
    fetcher: Arc<HttpFetcher>,
}

impl SourceReader {
    /// Create a reader that fetches remote sources with `fetcher`.
    pub fn new(fetcher: Arc<HttpFetcher>) -> Self {
        Self { fetcher }
    }
}

impl ResourceReader for SourceReader {
    fn read(&self, handle: &ResourceHandle) -> Result<Vec<u8>> {
        match handle.source() {
            ResourceSource::File(path) => fs::read(path).map_err(|source| TemplateError::Io {
                location: handle.location(),
                source,
            }),
            ResourceSource::Url(url) => self
                .fetcher
                .fetch(url.as_str())
                .map_err(|e| TemplateError::Fetch {
                    url: url.to_string(),
                    message: format!("{:#}", e),
                }),
        }
    }
}
