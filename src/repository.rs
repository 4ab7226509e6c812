//! # Version-Control Backend
//!
//! This module defines the seam between the notification pipeline and the
//! Subversion client. Every storage primitive the pipeline needs is a method of
//! the `SvnOperations` trait:
//!
//! - **`checkout_empty`**: check out a repository directory at depth `empty`.
//! - **`update`**: bring one child of a sparse working copy up to date.
//! - **`commit`**: commit exactly one path under an explicit author.
//! - **`propget`**: read a versioned property (access lists, templates).
//!
//! In the main application `DefaultSvnOperations` wraps the system `svn`
//! command. Tests substitute implementations that record calls, serve files
//! from a plain directory, or fail on demand, so the pipeline can be exercised
//! without a Subversion installation.

use crate::error::Result;
use std::path::Path;

/// Trait for svn operations - allows mocking in tests
pub trait SvnOperations: Send + Sync {
    /// Check out `url` into `dest`, materializing no children.
    fn checkout_empty(&self, url: &str, dest: &Path) -> Result<()>;

    /// Update `path` inside a working copy, recursively when `recursive`.
    fn update(&self, path: &Path, recursive: bool) -> Result<()>;

    /// Commit `path` only.
    fn commit(&self, path: &Path, author: &str, message: &str) -> Result<()>;

    /// Read property `name` of `path`, `None` if unset.
    fn propget(&self, name: &str, path: &Path) -> Result<Option<String>>;
}

/// The default implementation of `SvnOperations`, which uses the system's
/// `svn` command.
pub struct DefaultSvnOperations;

impl SvnOperations for DefaultSvnOperations {
    fn checkout_empty(&self, url: &str, dest: &Path) -> Result<()> {
        crate::svn::checkout_empty(url, dest)
    }

    fn update(&self, path: &Path, recursive: bool) -> Result<()> {
        crate::svn::update(path, recursive)
    }

    fn commit(&self, path: &Path, author: &str, message: &str) -> Result<()> {
        crate::svn::commit(path, author, message)
    }

    fn propget(&self, name: &str, path: &Path) -> Result<Option<String>> {
        crate::svn::propget(name, path)
    }
}

/// Read a property from the document, falling back to its working copy root.
///
/// Properties are not inherited by `svn propget`, so deployments may set
/// access lists and templates either on a single page or on the directory
/// that holds it.
pub fn propget_with_fallback(
    svn: &dyn SvnOperations,
    name: &str,
    document: &Path,
    wc_root: &Path,
) -> Result<Option<String>> {
    if let Some(value) = svn.propget(name, document)? {
        return Ok(Some(value));
    }
    if document == wc_root {
        return Ok(None);
    }
    svn.propget(name, wc_root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// Mock svn operations for testing
    struct MockSvnOperations {
        props: HashMap<(String, PathBuf), String>,
        propget_calls: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl MockSvnOperations {
        fn new(props: Vec<(&str, &str, &str)>) -> Self {
            Self {
                props: props
                    .into_iter()
                    .map(|(n, p, v)| ((n.to_string(), PathBuf::from(p)), v.to_string()))
                    .collect(),
                propget_calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl SvnOperations for MockSvnOperations {
        fn checkout_empty(&self, _url: &str, _dest: &Path) -> Result<()> {
            Ok(())
        }

        fn update(&self, _path: &Path, _recursive: bool) -> Result<()> {
            Ok(())
        }

        fn commit(&self, _path: &Path, _author: &str, _message: &str) -> Result<()> {
            Ok(())
        }

        fn propget(&self, name: &str, path: &Path) -> Result<Option<String>> {
            self.propget_calls.lock().unwrap().push(path.to_path_buf());
            Ok(self
                .props
                .get(&(name.to_string(), path.to_path_buf()))
                .cloned())
        }
    }

    #[test]
    fn test_propget_prefers_document() {
        let svn = MockSvnOperations::new(vec![
            ("acl", "/wc/post.html", "alice"),
            ("acl", "/wc", "bob"),
        ]);
        let value =
            propget_with_fallback(&svn, "acl", Path::new("/wc/post.html"), Path::new("/wc"))
                .unwrap();
        assert_eq!(value.as_deref(), Some("alice"));
        assert_eq!(svn.propget_calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_propget_falls_back_to_root() {
        let svn = MockSvnOperations::new(vec![("acl", "/wc", "bob")]);
        let value =
            propget_with_fallback(&svn, "acl", Path::new("/wc/post.html"), Path::new("/wc"))
                .unwrap();
        assert_eq!(value.as_deref(), Some("bob"));
        assert_eq!(svn.propget_calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_propget_missing_everywhere() {
        let svn = MockSvnOperations::new(vec![]);
        let value =
            propget_with_fallback(&svn, "acl", Path::new("/wc/post.html"), Path::new("/wc"))
                .unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_propget_same_path_queried_once() {
        let svn = MockSvnOperations::new(vec![]);
        propget_with_fallback(&svn, "acl", Path::new("/wc"), Path::new("/wc")).unwrap();
        assert_eq!(svn.propget_calls.lock().unwrap().len(), 1);
    }
}
