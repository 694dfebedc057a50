//! Error types for template resolution.
//!
//! This module defines [`TemplateError`], the error type shared by every
//! layer of the provider, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Absence is not an error until it reaches the caller: the provider caches
//!   it as a negative result and surfaces [`TemplateError::NotFound`].
//! - Content-time failures (decode, compile, IO, fetch) are transient. They
//!   are never cached and always reach the caller that triggered the load.
//! - Use `TemplateError::Other` for unexpected errors via `anyhow`.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Core error type for template resolution.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template name contains more than one locale placeholder, or an
    /// unterminated one.
    #[error("Malformed template name '{name}': {reason}")]
    MalformedName { name: String, reason: String },

    /// No locale candidate resolved under the search context.
    #[error(
        "Template not found: {name} (encoding {encoding}, tried: {})",
        .candidates.join(", ")
    )]
    NotFound {
        name: String,
        candidates: Vec<String>,
        encoding: String,
    },

    /// Byte content is not valid for the declared encoding.
    #[error("Invalid {encoding} byte sequence at offset {offset}")]
    Decode { encoding: String, offset: usize },

    /// Encoding label is not recognized.
    #[error("Unknown encoding: {label}")]
    UnknownEncoding { label: String },

    /// Resource was read and decoded but the compiler rejected it.
    #[error("Failed to compile {location}: {message}")]
    Compile { location: String, message: String },

    /// Resource vanished or became unreadable after being located.
    #[error("Failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// HTTP retrieval of an explicit location failed.
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// Gave up waiting for another caller's in-flight load.
    #[error("Timed out after {waited:?} waiting for {identity}")]
    Timeout { identity: String, waited: Duration },

    /// Another caller's in-flight load of the same identity failed.
    #[error("Load of {identity} failed in another caller: {message}")]
    LoadFailed { identity: String, message: String },

    /// Settings file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse settings file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Settings parsed but are not usable.
    #[error("Invalid configuration: {message}")]
    ConfigValidation { message: String },

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TemplateError {
    /// Whether a later lookup of the same identity may succeed.
    ///
    /// Transient errors are never cached; the next lookup loads from scratch.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Decode { .. }
            | Self::Compile { .. }
            | Self::Io { .. }
            | Self::Fetch { .. }
            | Self::Timeout { .. }
            | Self::LoadFailed { .. } => true,
            Self::MalformedName { .. }
            | Self::NotFound { .. }
            | Self::UnknownEncoding { .. }
            | Self::ConfigNotFound { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigValidation { .. }
            | Self::Other(_) => false,
        }
    }

    /// Whether this error means "no such template".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type alias for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;
