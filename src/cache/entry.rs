//! Cached values: compiled artifacts and recorded absences.

use crate::cache::identity::Identity;
use crate::error::TemplateError;
use crate::template::CompiledTemplate;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// A recorded "no such template" outcome.
///
/// Served on repeat lookups without probing storage again, until invalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Absence {
    /// Name as requested.
    pub name: String,
    /// Every candidate that was probed, in order.
    pub candidates: Vec<String>,
    /// Canonical encoding label of the request.
    pub encoding: String,
    /// When the absence was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl Absence {
    /// Record that no candidate of `name` resolved.
    pub fn new(
        name: impl Into<String>,
        candidates: Vec<String>,
        encoding: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            candidates,
            encoding: encoding.into(),
            recorded_at: Utc::now(),
        }
    }

    /// The error surfaced to callers.
    pub fn to_error(&self) -> TemplateError {
        TemplateError::NotFound {
            name: self.name.clone(),
            candidates: self.candidates.clone(),
            encoding: self.encoding.clone(),
        }
    }
}

/// What the cache holds for an identity.
#[derive(Debug, Clone)]
pub enum CachedValue {
    Artifact(Arc<CompiledTemplate>),
    Missing(Arc<Absence>),
}

impl CachedValue {
    /// The artifact, if this is not a recorded absence.
    pub fn artifact(&self) -> Option<&Arc<CompiledTemplate>> {
        match self {
            Self::Artifact(t) => Some(t),
            Self::Missing(_) => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing(_))
    }

    /// Convert to the caller-facing result.
    pub fn into_result(self) -> crate::error::Result<Arc<CompiledTemplate>> {
        match self {
            Self::Artifact(t) => Ok(t),
            Self::Missing(absence) => Err(absence.to_error()),
        }
    }

    /// Whether both values are the same cached allocation.
    pub fn same_as(&self, other: &CachedValue) -> bool {
        match (self, other) {
            (Self::Artifact(a), Self::Artifact(b)) => Arc::ptr_eq(a, b),
            (Self::Missing(a), Self::Missing(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Identity of the artifact; `None` for absences.
    pub fn identity(&self) -> Option<&Identity> {
        self.artifact().map(|t| t.identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::identity::TEMPLATE_KIND;

    #[test]
    fn absence_becomes_not_found() {
        let absence = Absence::new(
            "notexist{_en_GB}",
            vec!["notexist_en_GB".into(), "notexist_en".into(), "notexist".into()],
            "UTF-8",
        );
        let err = absence.to_error();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("notexist_en_GB"));
    }

    #[test]
    fn into_result_unwraps_artifact() {
        let id = Identity::resolved(TEMPLATE_KIND, "UTF-8", "/t/a.wm");
        let value = CachedValue::Artifact(Arc::new(CompiledTemplate::new(id.clone(), "x")));
        assert!(!value.is_missing());
        assert_eq!(value.identity(), Some(&id));
        assert_eq!(value.into_result().unwrap().source(), "x");
    }

    #[test]
    fn into_result_fails_for_missing() {
        let value = CachedValue::Missing(Arc::new(Absence::new("a", vec!["a".into()], "UTF-8")));
        assert!(value.is_missing());
        assert!(value.identity().is_none());
        assert!(value.into_result().is_err());
    }

    #[test]
    fn same_as_compares_allocations() {
        let absence = Arc::new(Absence::new("a", vec!["a".into()], "UTF-8"));
        let a = CachedValue::Missing(Arc::clone(&absence));
        let b = CachedValue::Missing(absence);
        let c = CachedValue::Missing(Arc::new(Absence::new("a", vec!["a".into()], "UTF-8")));
        assert!(a.same_as(&b));
        assert!(!a.same_as(&c));
    }
}
