//! Provider settings schema.
//!
//! These structs map to the YAML settings file format:
//!
//! ```yaml
//! template_path:
//!   - templates
//!   - shared/templates
//! default_encoding: UTF-8
//! http_timeout_secs: 30
//! cache:
//!   wait_timeout_ms: 5000
//!   check_modified: true
//! ```

use crate::encoding::{Encoding, EncodingDecoder};
use crate::error::{Result, TemplateError};
use crate::resource::SearchContext;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root settings structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Ordered template roots. `classpath:` entries are classpath-style;
    /// a single URL entry is an explicit location.
    pub template_path: Vec<String>,

    /// Encoding used when a request names none.
    #[serde(default = "default_encoding")]
    pub default_encoding: String,

    /// Timeout for `http(s)` template locations.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Artifact cache behavior.
    pub cache: CacheSettings,
}

/// Artifact cache settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Give up waiting for another caller's in-flight compile after this long.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_timeout_ms: Option<u64>,

    /// Reload a cached template when its file's modification time changes.
    #[serde(skip_serializing_if = "is_false")]
    pub check_modified: bool,
}

fn default_encoding() -> String {
    Encoding::Utf8.label().to_string()
}

fn default_http_timeout() -> u64 {
    30
}

fn is_false(v: &bool) -> bool {
    !v
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            template_path: Vec::new(),
            default_encoding: default_encoding(),
            http_timeout_secs: default_http_timeout(),
            cache: CacheSettings::default(),
        }
    }
}

impl ProviderConfig {
    /// Settings with the given template roots and every other value defaulted.
    pub fn with_template_path<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            template_path: entries.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Build the search context described by `template_path`.
    pub fn search_context(&self) -> Result<SearchContext> {
        SearchContext::from_template_path(&self.template_path)
    }

    /// Decoder for `default_encoding`.
    pub fn decoder(&self) -> Result<EncodingDecoder> {
        Encoding::for_label(&self.default_encoding)
            .map(EncodingDecoder::new)
            .ok_or_else(|| TemplateError::ConfigValidation {
                message: format!("Unknown default_encoding '{}'", self.default_encoding),
            })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn wait_timeout(&self) -> Option<Duration> {
        self.cache.wait_timeout_ms.map(Duration::from_millis)
    }

    /// Check every setting, reporting the first problem.
    pub fn validate(&self) -> Result<()> {
        self.search_context()?;
        self.decoder()?;
        if self.http_timeout_secs == 0 {
            return Err(TemplateError::ConfigValidation {
                message: "http_timeout_secs must be positive".to_string(),
            });
        }
        Ok(())
    }
}
