//! # CLI Command Implementations
//!
//! Each subcommand of the `svnmentions` binary is defined in its own file:
//!
//! - `cgi`: the default, one HTTP request through the CGI interface.
//! - `receive`: one notification from command-line flags.
//! - `metadata`: print the discovery document.
//!
//! Each command module contains an `Args` struct derived with `clap` and an
//! `execute` function that calls into the `svnmentions` library.

pub mod cgi;
pub mod metadata;
pub mod receive;

use anyhow::{Context, Result};
use std::path::Path;

use svnmentions::config::Config;

/// Load configuration from a YAML file if given, else from `CONTEXT`.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Config::from_env().context("Failed to load config from the environment"),
    }
}
