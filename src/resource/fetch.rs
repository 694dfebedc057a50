//! HTTP retrieval for `http(s)` template locations.
//!
//! Bytes are returned undecoded; the template's declared encoding is
//! applied later, exactly once, when it is compiled.

use anyhow::{bail, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::time::Duration;

/// Fetches template sources over HTTP/HTTPS.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a new HTTP fetcher with default 30-second timeout.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a new HTTP fetcher with custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .user_agent("tprov")
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            timeout,
        }
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check whether a URL exists with a HEAD request.
    ///
    /// `404 Not Found` and `410 Gone` mean absent; other non-success
    /// statuses and transport failures are errors.
    pub fn exists(&self, url: &str) -> Result<bool> {
        let response = self.client.head(url).send()?;
        let status = response.status();

        if status.is_success() {
            return Ok(true);
        }
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Ok(false);
        }
        bail!("HTTP {} probing {}", status, url);
    }

    /// Fetch the raw body of a template source.
    pub fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send()?;

        if !response.status().is_success() {
            bail!("HTTP {} fetching {}", response.status(), url);
        }

        Ok(response.bytes()?.to_vec())
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}
