//! Template artifact caching.
//!
//! This module provides the in-memory cache that sits between resolution
//! and compilation. Entries are keyed by [`Identity`] (kind, encoding,
//! location) rather than by requested name, since one name can resolve to
//! different locations and one location can be loaded under different
//! encodings.

pub mod entry;
pub mod identity;
pub mod store;

pub use entry::{Absence, CachedValue};
pub use identity::{Identity, Target, TEMPLATE_KIND};
pub use store::{ArtifactCache, CacheStats};
