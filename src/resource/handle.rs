//! Resolved resource handles.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use url::Url;

/// Where a located resource's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceSource {
    /// A file on disk (from filesystem or classpath roots, or a `file:` URL).
    File(PathBuf),
    /// A remote `http(s)` URL.
    Url(Url),
}

/// A located, readable template source.
///
/// The handle owns no open stream; bytes are read once, when the template
/// is compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceHandle {
    candidate: String,
    source: ResourceSource,
}

impl ResourceHandle {
    /// A handle for a file on disk.
    pub fn file(candidate: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            candidate: candidate.into(),
            source: ResourceSource::File(path.into()),
        }
    }

    /// A handle for a remote URL.
    pub fn url(candidate: impl Into<String>, url: Url) -> Self {
        Self {
            candidate: candidate.into(),
            source: ResourceSource::Url(url),
        }
    }

    /// The candidate name that resolved to this resource.
    pub fn candidate(&self) -> &str {
        &self.candidate
    }

    /// Where the bytes come from.
    pub fn source(&self) -> &ResourceSource {
        &self.source
    }

    /// Path on disk, for file sources.
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            ResourceSource::File(path) => Some(path),
            ResourceSource::Url(_) => None,
        }
    }

    /// Stable textual location, used in diagnostics and cache identities.
    pub fn location(&self) -> String {
        match &self.source {
            ResourceSource::File(path) => path.display().to_string(),
            ResourceSource::Url(url) => url.to_string(),
        }
    }

    /// Last-modified time of a file source, if the filesystem reports one.
    pub fn modified(&self) -> Option<SystemTime> {
        self.path()
            .and_then(|p| fs::metadata(p).ok())
            .and_then(|m| m.modified().ok())
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.location())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_handle_reports_path_and_location() {
        let handle = ResourceHandle::file("a.wm", "/t/a.wm");
        assert_eq!(handle.candidate(), "a.wm");
        assert_eq!(handle.path(), Some(Path::new("/t/a.wm")));
        assert_eq!(handle.location(), "/t/a.wm");
    }

    #[test]
    fn url_handle_has_no_path() {
        let url = Url::parse("https://example.com/t/a.wm").unwrap();
        let handle = ResourceHandle::url("a.wm", url);
        assert!(handle.path().is_none());
        assert!(handle.modified().is_none());
        assert_eq!(handle.to_string(), "https://example.com/t/a.wm");
    }

    #[test]
    fn modified_reads_file_metadata() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.wm");
        fs::write(&path, "hello").unwrap();

        let handle = ResourceHandle::file("a.wm", &path);
        assert!(handle.modified().is_some());
    }
}
