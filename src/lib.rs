//! template-provider - Locale-aware template resolution with an artifact cache.
//!
//! A lookup takes a template name, a locale, an encoding label and a search
//! context. The name is expanded into locale candidates, the first candidate
//! that exists is read and decoded, and the compiled result is cached under
//! its (kind, encoding, location) identity. Names that resolve nowhere are
//! cached as absences.
//!
//! # Modules
//!
//! - [`cache`] - Identities and the at-most-one-load artifact cache
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Settings loading and validation
//! - [`encoding`] - Encoding labels and decoding
//! - [`error`] - Error types and result aliases
//! - [`locale`] - Locales and candidate name expansion
//! - [`provider`] - The lookup orchestrator
//! - [`resource`] - Search contexts, locating and reading sources
//! - [`template`] - Compiled artifacts and the compiler boundary
//!
//! # Example
//!
//! ```
//! use template_provider::{Locale, SearchContext, TemplateProvider};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join("short_en"), "hello").unwrap();
//! fs::write(temp.path().join("short"), "base").unwrap();
//!
//! let provider = TemplateProvider::new();
//! let context = SearchContext::filesystem([temp.path()]);
//! let locale = Locale::new("en", "GB", "");
//!
//! let template = provider.get("short{_en_GB}", &locale, "UTF-8", &context).unwrap();
//! assert_eq!(template.source(), "hello");
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod encoding;
pub mod error;
pub mod locale;
pub mod provider;
pub mod resource;
pub mod template;

pub use cache::{ArtifactCache, CacheStats, Identity};
pub use config::ProviderConfig;
pub use encoding::{Encoding, EncodingDecoder};
pub use error::{Result, TemplateError};
pub use locale::{Locale, LocaleVariantExpander};
pub use provider::TemplateProvider;
pub use resource::SearchContext;
pub use template::{CompiledTemplate, TemplateCompiler, TextCompiler};
