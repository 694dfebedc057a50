//! Search context: where candidate names may resolve.

use crate::error::{Result, TemplateError};
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Prefix marking a classpath-style root in a template path entry.
pub const CLASSPATH_PREFIX: &str = "classpath:";

/// Where a candidate name may resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchContext {
    /// Ordered directories. A leading separator in a candidate is taken
    /// relative to each root.
    FilesystemRoots(Vec<PathBuf>),
    /// Ordered resource roots. Candidates that start with a separator never
    /// resolve, matching resource-loader lookup rules.
    ClasspathRoots(Vec<PathBuf>),
    /// A single base location; candidates are joined onto it.
    ExplicitLocation(Url),
}

impl SearchContext {
    /// Filesystem roots, probed in order.
    pub fn filesystem<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::FilesystemRoots(roots.into_iter().map(Into::into).collect())
    }

    /// Classpath-style roots, probed in order.
    pub fn classpath<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::ClasspathRoots(roots.into_iter().map(Into::into).collect())
    }

    /// An explicit base location.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValidation` if `location` is not a URL with a
    /// `file`, `http` or `https` scheme.
    pub fn explicit(location: &str) -> Result<Self> {
        let url = Url::parse(location).map_err(|e| TemplateError::ConfigValidation {
            message: format!("Invalid template location '{}': {}", location, e),
        })?;

        match url.scheme() {
            "file" | "http" | "https" => Ok(Self::ExplicitLocation(url)),
            other => Err(TemplateError::ConfigValidation {
                message: format!("Unsupported scheme '{}' in '{}'", other, location),
            }),
        }
    }

    /// Build a context from template path entries.
    ///
    /// `classpath:dir` entries are classpath-style roots, a single absolute
    /// URL is an explicit location, and anything else is a filesystem root.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValidation` for an empty path, for a path mixing root
    /// kinds, or for more than one explicit location.
    pub fn from_template_path(entries: &[String]) -> Result<Self> {
        let invalid = |message: String| TemplateError::ConfigValidation { message };

        if entries.is_empty() {
            return Err(invalid("Template path is empty".to_string()));
        }

        let urls: Vec<&String> = entries.iter().filter(|e| looks_like_url(e)).collect();
        if !urls.is_empty() {
            if entries.len() > 1 {
                return Err(invalid(
                    "An explicit template location cannot be combined with other roots"
                        .to_string(),
                ));
            }
            return Self::explicit(urls[0]);
        }

        let classpath = entries
            .iter()
            .filter(|e| e.starts_with(CLASSPATH_PREFIX))
            .count();
        match classpath {
            0 => Ok(Self::filesystem(entries)),
            n if n == entries.len() => Ok(Self::classpath(
                entries
                    .iter()
                    .map(|e| e.trim_start_matches(CLASSPATH_PREFIX)),
            )),
            _ => Err(invalid(
                "Template path mixes classpath and filesystem roots".to_string(),
            )),
        }
    }
}

/// Whether a path entry names a URL rather than a directory.
///
/// Single-letter schemes are treated as Windows drive letters.
pub(crate) fn looks_like_url(entry: &str) -> bool {
    !entry.starts_with(CLASSPATH_PREFIX)
        && entry
            .find(':')
            .is_some_and(|i| i > 1 && Url::parse(entry).is_ok())
}

impl fmt::Display for SearchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |roots: &[PathBuf], prefix: &str| {
            roots
                .iter()
                .map(|r| format!("{}{}", prefix, r.display()))
                .collect::<Vec<_>>()
                .join(";")
        };
        match self {
            Self::FilesystemRoots(roots) => f.write_str(&join(roots, "")),
            Self::ClasspathRoots(roots) => f.write_str(&join(roots, CLASSPATH_PREFIX)),
            Self::ExplicitLocation(url) => write!(f, "{}", url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn plain_entries_are_filesystem_roots() {
        let ctx = SearchContext::from_template_path(&entries(&["/a", "b/c"])).unwrap();
        assert_eq!(ctx, SearchContext::filesystem(["/a", "b/c"]));
    }

    #[test]
    fn classpath_entries_strip_prefix() {
        let ctx =
            SearchContext::from_template_path(&entries(&["classpath:res", "classpath:lib"]))
                .unwrap();
        assert_eq!(ctx, SearchContext::classpath(["res", "lib"]));
    }

    #[test]
    fn url_entry_is_explicit_location() {
        let ctx =
            SearchContext::from_template_path(&entries(&["https://example.com/t/"])).unwrap();
        assert!(matches!(ctx, SearchContext::ExplicitLocation(_)));
    }

    #[test]
    fn windows_drive_is_not_a_url() {
        let ctx = SearchContext::from_template_path(&entries(&["C:/templates"])).unwrap();
        assert!(matches!(ctx, SearchContext::FilesystemRoots(_)));
    }

    #[test]
    fn mixed_kinds_are_rejected() {
        let err = SearchContext::from_template_path(&entries(&["classpath:res", "/fs"]))
            .unwrap_err();
        assert!(matches!(err, TemplateError::ConfigValidation { .. }));

        let err = SearchContext::from_template_path(&entries(&["file:///t/", "/fs"]))
            .unwrap_err();
        assert!(matches!(err, TemplateError::ConfigValidation { .. }));
    }

    #[test]
    fn empty_path_is_rejected() {
        assert!(SearchContext::from_template_path(&[]).is_err());
    }

    #[test]
    fn explicit_rejects_unsupported_scheme() {
        assert!(SearchContext::explicit("ftp://example.com/t/").is_err());
        assert!(SearchContext::explicit("not a url").is_err());
    }

    #[test]
    fn display_lists_roots() {
        let ctx = SearchContext::classpath(["res"]);
        assert_eq!(ctx.to_string(), "classpath:res");
    }
}
