//! Target URL to repository path resolution

use crate::error::{Error, Result};

/// Repository location of a target document.
///
/// `parent` never ends with a separator. `name` keeps the separator it was
/// split at, so `parent + name` is the full repository path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPath {
    pub parent: String,
    pub name: String,
}

impl TargetPath {
    /// The child name without any separators, suitable for joining onto a
    /// working copy root.
    pub fn leaf(&self) -> &str {
        self.name.trim_matches('/')
    }

    /// Whether the target URL named a directory (`.../post1/`).
    pub fn is_directory(&self) -> bool {
        self.name.ends_with('/')
    }

    /// The full repository path.
    pub fn full_path(&self) -> String {
        format!("{}{}", self.parent, self.name)
    }
}

/// Resolve a target URL to the repository path of the document it names.
///
/// The URL must start with `issuer`, followed by a path, a fragment or
/// nothing. The first occurrence of `url_prefix` in
/// the remaining path is replaced by `repo_root`, any fragment is dropped, and
/// the path is split at its last separator that is not the final character.
/// Paths with `.` or `..` segments are rejected.
pub fn resolve(
    target: &str,
    issuer: &str,
    url_prefix: &str,
    repo_root: &str,
) -> Result<TargetPath> {
    let location = target
        .strip_prefix(issuer)
        .filter(|rest| rest.is_empty() || rest.starts_with(['/', '#']))
        .ok_or_else(|| Error::InvalidTarget {
            message: format!("Target domain is not acceptable, must be in: {}", issuer),
        })?;

    let repo_path = location.replacen(url_prefix, repo_root, 1);
    let repo_path = match repo_path.find('#') {
        Some(fragment) => &repo_path[..fragment],
        None => repo_path.as_str(),
    };

    if repo_path.split('/').any(|segment| segment == "." || segment == "..") {
        return Err(Error::InvalidTarget {
            message: "Target path is not acceptable".to_string(),
        });
    }

    // Exclude a final slash so a directory keeps its own name as the child.
    let search = repo_path.strip_suffix('/').unwrap_or(repo_path);
    let split = match search.rfind('/') {
        Some(split) if split > 0 && !search[split..].trim_matches('/').is_empty() => split,
        _ => {
            return Err(Error::InvalidTarget {
                message: "Target path is not acceptable".to_string(),
            })
        }
    };

    let parent = repo_path[..split].trim_end_matches('/');
    if parent.is_empty() {
        return Err(Error::InvalidTarget {
            message: "Target path is not acceptable".to_string(),
        });
    }

    Ok(TargetPath {
        parent: parent.to_string(),
        name: repo_path[parent.len()..].to_string(),
    })
}
