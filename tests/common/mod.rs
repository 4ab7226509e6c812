//! Shared test utilities for pipeline and E2E tests.
//!
//! This module provides a fixture laying out a stand-in repository, a
//! working copy root and a lock file in one temporary directory, plus fake
//! `SvnOperations` and `SourceFetcher` implementations that record what the
//! pipeline asked of them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_page("post1", pages::POST);
//!     let svn = FakeSvn::new();
//!     // ... test code
//! }
//! ```

#![allow(dead_code)]

use assert_fs::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use svnmentions::config::Config;
use svnmentions::error::{Error, Result};
use svnmentions::fetch::SourceFetcher;
use svnmentions::repository::SvnOperations;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::pages;
    #[allow(unused_imports)]
    pub use super::{FakeFetcher, FakeSvn, Stage, TestFixture, ISSUER};
}

/// Origin of the site under test.
pub const ISSUER: &str = "https://example.com";

/// HTML documents for the stand-in repository.
pub mod pages {
    /// A page with the anchors mentions are merged under.
    pub const POST: &str = r#"<!DOCTYPE html>
<html><head><title>Post 1</title></head>
<body>
<article><p>First post.</p></article>
<section id="webmentions"><h2>Mentions</h2><div id="comments"></div></section>
</body></html>"#;

    /// A page without a place for mentions.
    pub const NO_ANCHORS: &str = "<html><body><p>Nothing here</p></body></html>";
}

/// Pipeline stage a `FakeSvn` can be told to fail at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Checkout,
    Update,
    Propget,
    Commit,
}

#[derive(Default)]
struct FakeState {
    /// Working copy root to repository directory.
    checkouts: HashMap<PathBuf, PathBuf>,
    /// (property, path relative to the repository directory) to value.
    props: HashMap<(String, String), String>,
    commits: Vec<(PathBuf, String, String)>,
    events: Vec<(String, String)>,
    fail_at: Option<Stage>,
}

/// Serves a plain directory as if it were a Subversion repository.
///
/// Checkout URLs are `file://` URLs naming the directory. Updates copy the
/// named child into the working copy and commits copy it back.
#[derive(Clone, Default)]
pub struct FakeSvn {
    state: Arc<Mutex<FakeState>>,
    checkout_delay: Duration,
}

impl FakeSvn {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep inside checkout, widening the critical section.
    pub fn with_checkout_delay(mut self, delay: Duration) -> Self {
        self.checkout_delay = delay;
        self
    }

    pub fn fail_at(&self, stage: Stage) {
        self.state.lock().unwrap().fail_at = Some(stage);
    }

    /// Set a property; `rel` is relative to the checked-out directory, `""`
    /// for the directory itself.
    pub fn set_prop(&self, name: &str, rel: &str, value: &str) {
        self.state
            .lock()
            .unwrap()
            .props
            .insert((name.to_string(), rel.to_string()), value.to_string());
    }

    /// (path, author, message) of every commit.
    pub fn commits(&self) -> Vec<(PathBuf, String, String)> {
        self.state.lock().unwrap().commits.clone()
    }

    /// (event, thread) pairs recorded at checkout and commit.
    pub fn events(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn boxed(&self) -> Box<dyn SvnOperations> {
        Box::new(self.clone())
    }

    fn check(&self, stage: Stage, path: &Path) -> Result<()> {
        if self.state.lock().unwrap().fail_at != Some(stage) {
            return Ok(());
        }
        let path = path.display().to_string();
        let stderr = format!("svn: E000000: injected {:?} failure", stage);
        Err(match stage {
            Stage::Checkout => Error::CheckoutFailed { url: path, stderr },
            Stage::Update => Error::UpdateFailed { path, stderr },
            Stage::Propget => Error::SvnCommand {
                command: "propget".to_string(),
                path,
                stderr,
            },
            Stage::Commit => Error::CommitFailed { path, stderr },
        })
    }

    fn record(&self, event: &str) {
        let thread = format!("{:?}", thread::current().id());
        self.state
            .lock()
            .unwrap()
            .events
            .push((event.to_string(), thread));
    }

    /// Working copy root and repository directory that contain `path`.
    fn locate(&self, path: &Path) -> Option<(PathBuf, PathBuf)> {
        let state = self.state.lock().unwrap();
        path.ancestors().find_map(|ancestor| {
            state
                .checkouts
                .get(ancestor)
                .map(|repo| (ancestor.to_path_buf(), repo.clone()))
        })
    }
}

fn copy_recursively(from: &Path, to: &Path) -> std::io::Result<()> {
    if from.is_dir() {
        fs::create_dir_all(to)?;
        for entry in fs::read_dir(from)? {
            let entry = entry?;
            copy_recursively(&entry.path(), &to.join(entry.file_name()))?;
        }
    } else {
        fs::copy(from, to)?;
    }
    Ok(())
}

impl SvnOperations for FakeSvn {
    fn checkout_empty(&self, url: &str, dest: &Path) -> Result<()> {
        self.record("checkout");
        self.check(Stage::Checkout, dest)?;
        thread::sleep(self.checkout_delay);
        let repo = url.strip_prefix("file://").unwrap_or(url);
        self.state
            .lock()
            .unwrap()
            .checkouts
            .insert(dest.to_path_buf(), PathBuf::from(repo));
        Ok(())
    }

    fn update(&self, path: &Path, _recursive: bool) -> Result<()> {
        self.check(Stage::Update, path)?;
        let (root, repo) = self.locate(path).ok_or_else(|| Error::UpdateFailed {
            path: path.display().to_string(),
            stderr: "svn: E155007: not a working copy".to_string(),
        })?;
        let rel = path.strip_prefix(&root).unwrap_or(path);
        let source = repo.join(rel);
        if source.exists() {
            copy_recursively(&source, path)?;
        }
        Ok(())
    }

    fn commit(&self, path: &Path, author: &str, message: &str) -> Result<()> {
        self.check(Stage::Commit, path)?;
        let (root, repo) = self.locate(path).ok_or_else(|| Error::CommitFailed {
            path: path.display().to_string(),
            stderr: "svn: E155007: not a working copy".to_string(),
        })?;
        let rel = path.strip_prefix(&root).unwrap_or(path).to_path_buf();
        fs::copy(path, repo.join(&rel))?;
        self.record("commit");
        self.state.lock().unwrap().commits.push((
            rel,
            author.to_string(),
            message.to_string(),
        ));
        Ok(())
    }

    fn propget(&self, name: &str, path: &Path) -> Result<Option<String>> {
        self.check(Stage::Propget, path)?;
        let rel = match self.locate(path) {
            Some((root, _)) => path
                .strip_prefix(&root)
                .unwrap_or(path)
                .to_string_lossy()
                .into_owned(),
            None => return Ok(None),
        };
        Ok(self
            .state
            .lock()
            .unwrap()
            .props
            .get(&(name.to_string(), rel))
            .cloned())
    }
}

/// Serves canned bodies for GET and PROPFIND.
#[derive(Clone, Default)]
pub struct FakeFetcher {
    pages: HashMap<String, String>,
    properties: HashMap<String, String>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    pub fn with_propfind(mut self, url: &str, xml: &str) -> Self {
        self.properties.insert(url.to_string(), xml.to_string());
        self
    }

    pub fn boxed(&self) -> Box<dyn SourceFetcher> {
        Box::new(self.clone())
    }
}

fn unreachable(url: &str) -> Error {
    Error::SourceUnreachable {
        url: url.to_string(),
        message: "connection refused".to_string(),
    }
}

impl SourceFetcher for FakeFetcher {
    fn get(&self, url: &str) -> Result<String> {
        self.pages.get(url).cloned().ok_or_else(|| unreachable(url))
    }

    fn propfind(&self, url: &str, _body: &str) -> Result<String> {
        self.properties
            .get(url)
            .cloned()
            .ok_or_else(|| unreachable(url))
    }
}

/// A temporary directory holding a stand-in repository (`repo/blog`), the
/// working copy root (`work`) and the lock file.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new fixture with empty repository and working copy roots.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("repo/blog")
            .create_dir_all()
            .expect("Failed to create repository directory");
        temp_dir
            .child("work")
            .create_dir_all()
            .expect("Failed to create work directory");
        Self { temp_dir }
    }

    /// Add a document to the repository.
    pub fn with_page(self, name: &str, html: &str) -> Self {
        self.temp_dir
            .child("repo/blog")
            .child(name)
            .write_str(html)
            .expect("Failed to write page");
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// The directory standing in for the repository's `blog` directory.
    pub fn repo(&self) -> PathBuf {
        self.temp_dir.path().join("repo/blog")
    }

    pub fn work(&self) -> PathBuf {
        self.temp_dir.path().join("work")
    }

    /// Current content of a repository document.
    pub fn page(&self, name: &str) -> String {
        fs::read_to_string(self.repo().join(name)).expect("Failed to read page")
    }

    /// Working copy directories left behind under the work root.
    pub fn leftovers(&self) -> Vec<PathBuf> {
        match fs::read_dir(self.work()) {
            Ok(entries) => entries.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Configuration publishing `repo/blog` at `https://example.com/blog`.
    pub fn config(&self) -> Config {
        Config {
            svn_parent_path: Some(self.repo().display().to_string()),
            svn_location_path: Some("/blog".to_string()),
            temp_root: Some(self.work()),
            lock_path: Some(self.temp_dir.path().join("svnmentions.lock")),
            ..Config::default()
        }
    }

    /// The same configuration as the JSON a web server passes in `CONTEXT`.
    pub fn context_json(&self) -> String {
        serde_json::json!({
            "SVNParentPath": self.repo().display().to_string(),
            "SVNLocationPath": "/blog",
            "TempRoot": self.work(),
            "LockPath": self.temp_dir.path().join("svnmentions.lock"),
        })
        .to_string()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Target URL of a document in the fixture repository.
pub fn target(name: &str) -> String {
    format!("{}/blog/{}", ISSUER, name)
}

/// Source page body linking to `target`.
pub fn linking_page(target: &str) -> String {
    format!(
        r#"<html><body><p>Reply to <a href="{}">a post</a>.</p></body></html>"#,
        target
    )
}
