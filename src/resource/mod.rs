//! Locating and reading template sources.
//!
//! A [`SearchContext`] says where candidate names may resolve:
//! - Filesystem roots (a leading separator is relative to the root)
//! - Classpath-style roots (a leading separator never resolves)
//! - One explicit base location (`file:`, `http:` or `https:` URL)
//!
//! # Resolution Order
//!
//! Roots are probed in configured order for each candidate; the first
//! readable match wins. No context variant resolves a name outside its roots.

pub mod context;
pub mod fetch;
pub mod handle;
pub mod locator;
pub mod reader;

pub use context::SearchContext;
pub use fetch::HttpFetcher;
pub use handle::{ResourceHandle, ResourceSource};
pub use locator::{ResourceLocator, SearchLocator};
pub use reader::{ResourceReader, SourceReader};
