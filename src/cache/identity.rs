//! Composite cache keys.

use crate::locale::Locale;
use crate::resource::SearchContext;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// Kind tag for compiled templates.
pub const TEMPLATE_KIND: &str = "template";

/// The location component of an identity.
///
/// Resolved locations and requested names never compare equal, even when
/// their text matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Target {
    /// Where a resource was found (path or URL).
    Resolved(String),
    /// A name that resolved nowhere, with the locale it was expanded for
    /// and the search context it was probed in. The locale is empty for
    /// names without a placeholder.
    Requested {
        name: String,
        locale: String,
        context: String,
    },
}

/// Cache key: (kind, encoding, location).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Identity {
    kind: String,
    encoding: String,
    target: Target,
}

impl Identity {
    /// Identity of a resource found at `location`.
    pub fn resolved(
        kind: impl Into<String>,
        encoding: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            encoding: encoding.into(),
            target: Target::Resolved(location.into()),
        }
    }

    /// Identity under which the absence of `name` is recorded.
    ///
    /// A name expands to different candidates per locale and may exist in
    /// one context but not another, so both are part of the key.
    pub fn requested(
        kind: impl Into<String>,
        encoding: impl Into<String>,
        name: impl Into<String>,
        locale: &Locale,
        context: &SearchContext,
    ) -> Self {
        Self {
            kind: kind.into(),
            encoding: encoding.into(),
            target: Target::Requested {
                name: name.into(),
                locale: locale.to_string(),
                context: context.to_string(),
            },
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// The resolved location or requested name.
    pub fn location(&self) -> &str {
        match &self.target {
            Target::Resolved(location) => location,
            Target::Requested { name, .. } => name,
        }
    }

    /// Hex digest of the identity; equal identities share a fingerprint.
    pub fn fingerprint(&self) -> String {
        let (tag, value, locale, context) = match &self.target {
            Target::Resolved(location) => ("resolved", location.as_str(), "", ""),
            Target::Requested {
                name,
                locale,
                context,
            } => ("requested", name.as_str(), locale.as_str(), context.as_str()),
        };
        let mut hasher = Sha256::new();
        let parts = [self.kind.as_str(), self.encoding.as_str(), tag, value, locale, context];
        for part in parts {
            hasher.update(part.as_bytes());
            hasher.update([0u8]);
        }
        hex::encode(&hasher.finalize()[..16])
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Target::Resolved(location) => {
                write!(f, "{}:{}:{}", self.kind, self.encoding, location)
            }
            Target::Requested {
                name,
                locale,
                context,
            } if locale.is_empty() => {
                write!(
                    f,
                    "{}:{}:{} (unresolved in {})",
                    self.kind, self.encoding, name, context
                )
            }
            Target::Requested {
                name,
                locale,
                context,
            } => {
                write!(
                    f,
                    "{}:{}:{} (unresolved for {} in {})",
                    self.kind, self.encoding, name, locale, context
                )
            }
        }
    }
}
