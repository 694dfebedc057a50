//! Settings file discovery and loading.

use crate::config::schema::ProviderConfig;
use crate::error::{Result, TemplateError};
use crate::resource::context::{looks_like_url, CLASSPATH_PREFIX};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings file name looked up by [`find_config`].
pub const CONFIG_FILE_NAME: &str = "tprov.yml";

/// Find the nearest settings file by walking up from `start`.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load and validate a settings file.
///
/// Relative template roots are resolved against the file's directory.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParse` if the YAML is invalid.
/// Returns `ConfigValidation` if the settings are unusable.
pub fn load_config(path: &Path) -> Result<ProviderConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TemplateError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            TemplateError::Io {
                location: path.display().to_string(),
                source: e,
            }
        }
    })?;

    let mut config = parse_config(&content, path)?;
    if let Some(base) = path.parent() {
        config.template_path = config
            .template_path
            .iter()
            .map(|entry| anchor_entry(entry, base))
            .collect();
    }

    config.validate()?;
    tracing::debug!("Loaded settings from {}", path.display());
    Ok(config)
}

/// Parse YAML content into settings.
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, source_path: &Path) -> Result<ProviderConfig> {
    serde_yaml::from_str(content).map_err(|e| TemplateError::ConfigParse {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Resolve a relative directory entry against `base`, keeping its prefix.
fn anchor_entry(entry: &str, base: &Path) -> String {
    let (prefix, dir) = match entry.strip_prefix(CLASSPATH_PREFIX) {
        Some(dir) => (CLASSPATH_PREFIX, dir),
        None => ("", entry),
    };

    if looks_like_url(dir) || Path::new(dir).is_absolute() {
        return entry.to_string();
    }
    format!("{}{}", prefix, base.join(dir).display())
}
