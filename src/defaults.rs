//! Default values for svnmentions configuration.
//!
//! This module provides centralized default values used across the receiver,
//! ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Prefix of every per-request working directory.
pub const TEMP_PREFIX: &str = "svnmentions_";

/// Attempts made to find an unused working directory name.
pub const TEMP_ATTEMPTS: u32 = 10;

/// URL scheme and authority prepended to repository paths.
pub const SVN_URL_BASE: &str = "file://";

/// Author recorded on every commit.
pub const COMMIT_AUTHOR: &str = "SVNmention";

/// Commit log message template.
pub const COMMIT_MESSAGE: &str = "SVNmention received: ${source} -> ${target}";

/// Repository property holding the embed template for verified mentions.
pub const TEMPLATE_PROPERTY: &str = "svnmentions:template";

/// Repository property holding the embed template for local comments.
pub const COMMENT_TEMPLATE_PROPERTY: &str = "svnmentions:comment-template";

/// Document served when the target URL names a directory.
pub const INDEX_DOCUMENT: &str = "index.html";

/// Total time allowed for fetching a source.
pub const FETCH_TIMEOUT_MS: u64 = 4000;

/// Time allowed for connecting to a source.
pub const CONNECT_TIMEOUT_MS: u64 = 2000;

/// Redirects followed while fetching a source.
pub const MAX_REDIRECTS: u32 = 8;

/// Sentinel value in the access-control property that admits everyone.
pub const ANONYMOUS: &str = "anonymous";

/// Returns the lock file guarding the given repository root.
///
/// Each repository root gets its own lock file in the system temp directory,
/// so independent repositories do not serialize each other. This can be
/// overridden by the `LockPath` setting to force one global lock.
pub fn default_lock_path(repo_root: &str) -> PathBuf {
    std::env::temp_dir().join(format!("svnmentions-{}.lock", lock_file_stem(repo_root)))
}

/// Encode a repository root as a file name. ASCII letters, digits, `-` and
/// `.` are kept and every other byte becomes `_` plus two hex digits, so
/// distinct roots never share a name.
fn lock_file_stem(repo_root: &str) -> String {
    let mut stem = String::with_capacity(repo_root.len());
    for byte in repo_root.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'.' {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("_{:02x}", byte));
        }
    }
    stem
}
