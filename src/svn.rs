use std::path::Path;
use std::process::{Command, Output};

use crate::error::Error;
use log::debug;

/// Warning code svn reports when a property is not set on a path.
const PROPERTY_NOT_FOUND: &str = "W200017";

/// Run an `svn` subcommand non-interactively against one path.
fn run_svn(subcommand: &str, args: &[&str], path: &Path) -> std::io::Result<Output> {
    debug!("svn {} {} {}", subcommand, args.join(" "), path.display());
    Command::new("svn")
        .args([subcommand, "--non-interactive"])
        .args(args)
        .arg(path)
        .output()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

/// Check out `url` into `dest` with depth `empty`
///
/// Only the directory entry itself is materialized. Children are brought in
/// afterwards with [`update`].
pub fn checkout_empty(url: &str, dest: &Path) -> Result<(), Error> {
    debug!("svn checkout --depth empty {} {}", url, dest.display());
    let output = Command::new("svn")
        .args(["checkout", "--non-interactive", "--depth", "empty", url])
        .arg(dest)
        .output()
        .map_err(|e| Error::CheckoutFailed {
            url: url.to_string(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::CheckoutFailed {
            url: url.to_string(),
            stderr: stderr_of(&output),
        });
    }

    Ok(())
}

/// Update a single path of a sparse working copy
///
/// With `recursive` the path is brought in at depth `infinity`, which is what
/// a directory target needs. A file target is updated without a depth change.
pub fn update(path: &Path, recursive: bool) -> Result<(), Error> {
    let args: &[&str] = if recursive {
        &["--set-depth", "infinity"]
    } else {
        &[]
    };
    let output = run_svn("update", args, path).map_err(|e| Error::UpdateFailed {
        path: path.display().to_string(),
        stderr: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(Error::UpdateFailed {
            path: path.display().to_string(),
            stderr: stderr_of(&output),
        });
    }

    Ok(())
}

/// Commit exactly one path with the given author and log message
pub fn commit(path: &Path, author: &str, message: &str) -> Result<(), Error> {
    let output = run_svn("commit", &["--username", author, "-m", message], path).map_err(|e| {
        Error::CommitFailed {
            path: path.display().to_string(),
            stderr: e.to_string(),
        }
    })?;

    if !output.status.success() {
        return Err(Error::CommitFailed {
            path: path.display().to_string(),
            stderr: stderr_of(&output),
        });
    }

    Ok(())
}

/// Read a versioned property
///
/// Returns `None` when the property is not set on the path.
pub fn propget(name: &str, path: &Path) -> Result<Option<String>, Error> {
    let output = run_svn("propget", &[name], path).map_err(|e| Error::SvnCommand {
        command: format!("propget {}", name),
        path: path.display().to_string(),
        stderr: e.to_string(),
    })?;

    let stderr = stderr_of(&output);
    if !output.status.success() {
        if stderr.contains(PROPERTY_NOT_FOUND) {
            return Ok(None);
        }
        return Err(Error::SvnCommand {
            command: format!("propget {}", name),
            path: path.display().to_string(),
            stderr,
        });
    }

    Ok(parse_propget_output(&String::from_utf8_lossy(&output.stdout)))
}

/// Strip the newline svn appends to a single-target `propget`
pub fn parse_propget_output(stdout: &str) -> Option<String> {
    let value = stdout.strip_suffix('\n').unwrap_or(stdout);
    let value = value.strip_suffix('\r').unwrap_or(value);
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Build the checkout URL of a repository directory
pub fn repository_url(base: &str, repo_path: &str) -> String {
    format!("{}{}", base, repo_path)
}
