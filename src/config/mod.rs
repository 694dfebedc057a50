//! Provider settings.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//!
//! # Example
//!
//! ```
//! use template_provider::config::load_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let path = temp.path().join("tprov.yml");
//! fs::write(&path, "template_path: [templates]\ndefault_encoding: latin1").unwrap();
//!
//! let config = load_config(&path).unwrap();
//! assert_eq!(config.decoder().unwrap().default_encoding().label(), "ISO-8859-1");
//! ```

pub mod loader;
pub mod schema;

pub use loader::{find_config, load_config, parse_config, CONFIG_FILE_NAME};
pub use schema::{CacheSettings, ProviderConfig};
