//! Resolution of candidate names to resource handles.

use crate::error::{Result, TemplateError};
use crate::resource::context::SearchContext;
use crate::resource::fetch::HttpFetcher;
use crate::resource::handle::ResourceHandle;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// Resolves one candidate name under a search context.
///
/// Returns `Ok(None)` when the candidate does not exist; errors are reserved
/// for probes that could not be answered.
pub trait ResourceLocator: Send + Sync {
    fn locate(&self, candidate: &str, context: &SearchContext) -> Result<Option<ResourceHandle>>;
}

/// The default locator: directories on disk and `file`/`http(s)` URLs.
#[derive(Debug, Clone, Default)]
pub struct SearchLocator {
    fetcher: Arc<HttpFetcher>,
}

impl SearchLocator {
    /// Create a locator that probes remote locations with `fetcher`.
    pub fn new(fetcher: Arc<HttpFetcher>) -> Self {
        Self { fetcher }
    }

    fn locate_in_roots(
        &self,
        candidate: &str,
        roots: &[PathBuf],
        allow_leading_separator: bool,
    ) -> Option<ResourceHandle> {
        if !allow_leading_separator && candidate.starts_with(['/', '\\']) {
            tracing::debug!("Rejecting rooted resource name: {}", candidate);
            return None;
        }

        let relative = match relative_path(candidate) {
            Some(relative) => relative,
            None => {
                tracing::debug!("Rejecting name that escapes its root: {}", candidate);
                return None;
            }
        };

        roots
            .iter()
            .find_map(|root| find_under_root(root, &relative))
            .map(|path| ResourceHandle::file(candidate, path))
    }

    fn locate_at_url(&self, candidate: &str, base: &Url) -> Result<Option<ResourceHandle>> {
        let join = |reference: &str| {
            base.join(reference)
                .map_err(|e| TemplateError::MalformedName {
                    name: candidate.to_string(),
                    reason: format!("cannot be joined onto {}: {}", base, e),
                })
        };
        // Candidates resolve relative to the base's directory, never above it.
        let scope = join("./")?;
        let url = join(candidate.trim_start_matches(['/', '\\']))?;
        if !url.as_str().starts_with(scope.as_str()) || url == scope {
            tracing::debug!("Rejecting name that escapes {}: {}", scope, candidate);
            return Ok(None);
        }

        tracing::debug!("Probing {}", url);

        if url.scheme() == "file" {
            let found = url
                .to_file_path()
                .ok()
                .filter(|path| path.is_file())
                .map(|path| ResourceHandle::file(candidate, path));
            return Ok(found);
        }

        let exists = self
            .fetcher
            .exists(url.as_str())
            .map_err(|e| TemplateError::Fetch {
                url: url.to_string(),
                message: format!("{:#}", e),
            })?;

        Ok(exists.then(|| ResourceHandle::url(candidate, url)))
    }
}

impl ResourceLocator for SearchLocator {
    fn locate(&self, candidate: &str, context: &SearchContext) -> Result<Option<ResourceHandle>> {
        let found = match context {
            SearchContext::FilesystemRoots(roots) => self.locate_in_roots(candidate, roots, true),
            SearchContext::ClasspathRoots(roots) => self.locate_in_roots(candidate, roots, false),
            SearchContext::ExplicitLocation(base) => self.locate_at_url(candidate, base)?,
        };

        match &found {
            Some(handle) => tracing::debug!("Found {} at {}", candidate, handle),
            None => tracing::debug!("{} not found in {}", candidate, context),
        }
        Ok(found)
    }
}

/// Normalize a candidate into a relative path that stays inside its root.
///
/// Leading separators, `.` and empty segments are dropped. Returns `None`
/// if a `..` segment would climb above the root.
fn relative_path(candidate: &str) -> Option<PathBuf> {
    let mut parts: Vec<&str> = Vec::new();

    for segment in candidate.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            part => parts.push(part),
        }
    }

    if parts.is_empty() {
        return None;
    }

    let path: PathBuf = parts.iter().collect();
    // Reject drive prefixes and similar that would make `join` replace the root.
    if path.components().all(|c| matches!(c, Component::Normal(_))) {
        Some(path)
    } else {
        None
    }
}

/// Join `relative` onto `root` and return its canonical path if it is a
/// readable file that still lies under the root after resolving links.
fn find_under_root(root: &Path, relative: &Path) -> Option<PathBuf> {
    let path = root.join(relative);
    if !path.is_file() {
        return None;
    }

    let canonical_root = root.canonicalize().ok()?;
    let canonical = path.canonicalize().ok()?;
    if canonical.starts_with(&canonical_root) {
        Some(canonical)
    } else {
        tracing::debug!("{} resolves outside {}", path.display(), root.display());
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use httpmock::Method::HEAD;
    use std::fs;
    use tempfile::TempDir;

    fn setup_root(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for (name, content) in files {
            let path = temp.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        temp
    }

    #[test]
    fn finds_file_under_filesystem_root() {
        let temp = setup_root(&[("templates/include.wm", "x")]);
        let ctx = SearchContext::filesystem([temp.path()]);

        let handle = SearchLocator::default()
            .locate("templates/include.wm", &ctx)
            .unwrap()
            .unwrap();
        assert_eq!(handle.candidate(), "templates/include.wm");
        assert!(handle.location().ends_with("include.wm"));
    }

    #[test]
    fn filesystem_roots_treat_leading_separator_as_relative() {
        let temp = setup_root(&[("templates/include.wm", "x")]);
        let ctx = SearchContext::filesystem([temp.path()]);

        let found = SearchLocator::default()
            .locate("/templates/include.wm", &ctx)
            .unwrap();
        assert!(found.is_some());
    }

    #[test]
    fn classpath_roots_reject_leading_separator() {
        let temp = setup_root(&[("templates/include.wm", "x")]);
        let ctx = SearchContext::classpath([temp.path()]);
        let locator = SearchLocator::default();

        assert!(locator.locate("templates/include.wm", &ctx).unwrap().is_some());
        assert!(locator.locate("/templates/include.wm", &ctx).unwrap().is_none());
    }

    #[test]
    fn parent_segments_cannot_escape_root() {
        let outer = setup_root(&[("secret.wm", "x"), ("root/inner.wm", "y")]);
        let ctx = SearchContext::filesystem([outer.path().join("root")]);
        let locator = SearchLocator::default();

        assert!(locator.locate("../secret.wm", &ctx).unwrap().is_none());
        assert!(locator.locate("a/../../secret.wm", &ctx).unwrap().is_none());
        assert!(locator.locate("a/../inner.wm", &ctx).unwrap().is_some());
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_out_of_root_are_not_followed() {
        let outer = setup_root(&[("secret.wm", "x")]);
        let root = outer.path().join("root");
        fs::create_dir_all(&root).unwrap();
        std::os::unix::fs::symlink(outer.path().join("secret.wm"), root.join("link.wm"))
            .unwrap();

        let ctx = SearchContext::filesystem([&root]);
        assert!(SearchLocator::default()
            .locate("link.wm", &ctx)
            .unwrap()
            .is_none());
    }

    #[test]
    fn roots_are_probed_in_order() {
        let first = setup_root(&[("a.wm", "first")]);
        let second = setup_root(&[("a.wm", "second"), ("b.wm", "second")]);
        let ctx = SearchContext::filesystem([first.path(), second.path()]);
        let locator = SearchLocator::default();

        let a = locator.locate("a.wm", &ctx).unwrap().unwrap();
        assert_eq!(fs::read_to_string(a.path().unwrap()).unwrap(), "first");

        let b = locator.locate("b.wm", &ctx).unwrap().unwrap();
        assert_eq!(fs::read_to_string(b.path().unwrap()).unwrap(), "second");
    }

    #[test]
    fn directories_do_not_resolve() {
        let temp = setup_root(&[("dir/a.wm", "x")]);
        let ctx = SearchContext::filesystem([temp.path()]);
        assert!(SearchLocator::default().locate("dir", &ctx).unwrap().is_none());
    }

    #[test]
    fn file_url_location_resolves_relative_candidates() {
        let temp = setup_root(&[("t/page.wm", "x")]);
        let base = Url::from_directory_path(temp.path().join("t")).unwrap();
        let ctx = SearchContext::ExplicitLocation(base);
        let locator = SearchLocator::default();

        assert!(locator.locate("page.wm", &ctx).unwrap().is_some());
        assert!(locator.locate("other.wm", &ctx).unwrap().is_none());
    }

    #[test]
    fn url_location_keeps_candidates_under_base() {
        let temp = setup_root(&[("secret.wm", "x"), ("t/page.wm", "y")]);
        let base = Url::from_directory_path(temp.path().join("t")).unwrap();
        let ctx = SearchContext::ExplicitLocation(base);
        let locator = SearchLocator::default();

        assert!(locator.locate("../secret.wm", &ctx).unwrap().is_none());
        assert!(locator.locate("/page.wm", &ctx).unwrap().is_some());
    }

    #[test]
    fn http_location_probes_with_head() {
        let server = MockServer::start();
        let probe = server.mock(|when, then| {
            when.method(HEAD).path("/t/page.wm");
            then.status(200);
        });
        server.mock(|when, then| {
            when.method(HEAD).path("/t/missing.wm");
            then.status(404);
        });

        let ctx = SearchContext::explicit(&server.url("/t/")).unwrap();
        let locator = SearchLocator::default();

        let handle = locator.locate("page.wm", &ctx).unwrap().unwrap();
        assert!(handle.path().is_none());
        assert!(handle.location().ends_with("/t/page.wm"));
        probe.assert_calls(1);

        assert!(locator.locate("missing.wm", &ctx).unwrap().is_none());
    }

    #[test]
    fn relative_path_normalizes_segments() {
        assert_eq!(relative_path("/a/./b"), Some(PathBuf::from("a").join("b")));
        assert_eq!(relative_path("a/../b"), Some(PathBuf::from("b")));
        assert_eq!(relative_path(".."), None);
        assert_eq!(relative_path("/"), None);
    }
}
