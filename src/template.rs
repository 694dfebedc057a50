//! Compiled template artifacts and the compiler boundary.
//!
//! Parsing template source into an executable form is delegated to a
//! [`TemplateCompiler`]. The provider only guarantees the compiler runs at
//! most once per identity and that its output is shared immutably.

use crate::cache::identity::Identity;
use crate::error::Result;
use chrono::{DateTime, Utc};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::time::SystemTime;

/// An immutable, compiled template.
///
/// Equality and hashing follow the identity it was compiled under, so two
/// lookups of the same resource and encoding compare equal.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    identity: Identity,
    source: String,
    fingerprint: String,
    loaded_at: DateTime<Utc>,
    modified: Option<SystemTime>,
}

impl CompiledTemplate {
    /// Wrap decoded source text compiled under `identity`.
    pub fn new(identity: Identity, source: impl Into<String>) -> Self {
        let fingerprint = identity.fingerprint();
        Self {
            identity,
            source: source.into(),
            fingerprint,
            loaded_at: Utc::now(),
            modified: None,
        }
    }

    /// Record the source's last-modified time, for reload checks.
    pub fn with_modified(mut self, modified: Option<SystemTime>) -> Self {
        self.modified = modified;
        self
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Decoded source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Stable hex digest of the identity.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Last-modified time of the source when it was read.
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }
}

impl PartialEq for CompiledTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for CompiledTemplate {}

impl Hash for CompiledTemplate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}

impl fmt::Display for CompiledTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}:{})",
            self.identity.kind(),
            self.identity.encoding(),
            self.identity.location()
        )
    }
}

/// Turns decoded source text into a compiled template.
///
/// Called only from inside the cache's loader, at most once per identity.
/// Failures must be reported as `TemplateError::Compile`.
pub trait TemplateCompiler: Send + Sync {
    fn compile(&self, identity: &Identity, text: String) -> Result<CompiledTemplate>;
}

/// Keeps decoded text as-is. Accepts any input.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCompiler;

impl TemplateCompiler for TextCompiler {
    fn compile(&self, identity: &Identity, text: String) -> Result<CompiledTemplate> {
        Ok(CompiledTemplate::new(identity.clone(), text))
    }
}
