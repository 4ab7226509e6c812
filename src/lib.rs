//! # SVNmentions
//!
//! A Webmention receiver that stores accepted mentions in the HTML documents
//! of a Subversion repository. Each notification becomes one small commit to
//! the page it mentions.
//!
//! ## Quick Example
//!
//! ```
//! use svnmentions::path;
//!
//! let target = path::resolve(
//!     "https://example.com/blog/post1",
//!     "https://example.com",
//!     "/blog",
//!     "/svn/repo/blog",
//! )
//! .unwrap();
//! assert_eq!(target.parent, "/svn/repo/blog");
//! assert_eq!(target.name, "/post1");
//! ```
//!
//! ## Core Concepts
//!
//! - **Requests (`request`, `response`)**: the decoded notification, the
//!   transport facts that go with it, and the status/body sent back.
//! - **Verification (`verify`, `fetch`, `embed`)**: proving the source really
//!   mentions the target and describing the embed that records it.
//! - **Storage (`repository`, `svn`, `working_copy`, `lock`)**: sparse
//!   per-request working copies checked out under one exclusive lock.
//! - **Transaction (`auth`, `merge`, `commit`, `pipeline`)**: access control,
//!   the idempotent insert into the document, and the commit.
//!
//! ## Execution Flow
//!
//! `pipeline::Receiver::receive` verifies the source, resolves the target to
//! a repository path, acquires a working copy, checks access, merges the
//! embed and commits. The working copy and the lock are released on every
//! exit path.

pub mod auth;
pub mod commit;
pub mod config;
pub mod defaults;
pub mod embed;
pub mod error;
pub mod fetch;
pub mod lock;
pub mod merge;
pub mod path;
pub mod pipeline;
pub mod repository;
pub mod request;
pub mod response;
pub mod svn;
pub mod verify;
pub mod working_copy;

#[cfg(test)]
mod path_proptest;
