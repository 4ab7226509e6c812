//! # Endpoint Configuration
//!
//! This module defines the settings a deployment provides to the receiver and
//! the logic for loading them. Settings are loaded once per process, either
//! from the `CONTEXT` environment variable (a JSON object, the way the web
//! server hands context to the CGI program) or from a YAML file given on the
//! command line.
//!
//! The key names follow the Apache `mod_dav_svn` directives the deployment
//! already uses (`SVNParentPath`, `SVNLocationPath`), with the remaining keys in
//! the same PascalCase style. Unknown keys are ignored so that a shared
//! `CONTEXT` object can carry settings for other programs.
//!
//! Only `SVNParentPath` and `SVNLocationPath` are required; `validate` reports
//! a `Misconfigured` error naming the first one that is absent.

use crate::defaults;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the JSON configuration.
pub const CONTEXT_ENV: &str = "CONTEXT";

/// Receiver settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Config {
    /// Repository root that replaces `SVNLocationPath` in target paths.
    #[serde(rename = "SVNParentPath")]
    pub svn_parent_path: Option<String>,
    /// URL path prefix under which the repository is published.
    #[serde(rename = "SVNLocationPath")]
    pub svn_location_path: Option<String>,
    /// Origin targets must live under. Derived from the request host if unset.
    pub issuer: Option<String>,
    /// Prepended to repository paths to form checkout URLs.
    #[serde(rename = "SVNURLBase")]
    pub svn_url_base: String,
    /// Author recorded on commits.
    pub commit_author: String,
    /// Commit log message template (`${source}`, `${target}`, `${type}`).
    pub commit_message: String,
    /// Repository property listing who may send mentions. Open access if unset.
    pub access_property: Option<String>,
    /// Repository property holding the embed template for verified mentions.
    /// Repeats are only detected when the template's root element carries
    /// `${source_unsafe}` in `src` or `href`.
    pub template_property: String,
    /// Repository property holding the embed template for local comments.
    pub comment_template_property: String,
    /// Client identifier published in the discovery document.
    pub client_id: Option<String>,
    /// Human readable client name published in the discovery document.
    pub client_name: Option<String>,
    /// Answer `GET` with the discovery document instead of rejecting it.
    pub discovery: bool,
    /// Lock file guarding the checkout-merge-commit section.
    pub lock_path: Option<PathBuf>,
    /// Directory under which working copies are created.
    pub temp_root: Option<PathBuf>,
    /// Attempts made to find an unused working copy name.
    pub temp_attempts: u32,
    /// Total timeout for fetching a source.
    pub fetch_timeout_ms: u64,
    /// Redirects followed while fetching a source.
    pub max_redirects: u32,
    /// Document used when a target names a directory.
    pub index_document: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            svn_parent_path: None,
            svn_location_path: None,
            issuer: None,
            svn_url_base: defaults::SVN_URL_BASE.to_string(),
            commit_author: defaults::COMMIT_AUTHOR.to_string(),
            commit_message: defaults::COMMIT_MESSAGE.to_string(),
            access_property: None,
            template_property: defaults::TEMPLATE_PROPERTY.to_string(),
            comment_template_property: defaults::COMMENT_TEMPLATE_PROPERTY.to_string(),
            client_id: None,
            client_name: None,
            discovery: false,
            lock_path: None,
            temp_root: None,
            temp_attempts: defaults::TEMP_ATTEMPTS,
            fetch_timeout_ms: defaults::FETCH_TIMEOUT_MS,
            max_redirects: defaults::MAX_REDIRECTS,
            index_document: defaults::INDEX_DOCUMENT.to_string(),
        }
    }
}

impl Config {
    /// Parse the JSON object passed through `CONTEXT`.
    pub fn from_context_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Misconfigured {
            message: format!("invalid {} JSON: {}", CONTEXT_ENV, e),
        })
    }

    /// Load from the `CONTEXT` environment variable.
    pub fn from_env() -> Result<Self> {
        let json = std::env::var(CONTEXT_ENV).map_err(|_| Error::Misconfigured {
            message: format!("missing {}", CONTEXT_ENV),
        })?;
        Self::from_context_json(&json)
    }

    /// Parse a YAML configuration string.
    pub fn parse_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a YAML configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_yaml(&content)
    }

    /// Check that every required setting is present.
    pub fn validate(&self) -> Result<()> {
        self.repo_root()?;
        self.url_prefix()?;
        if self.temp_attempts == 0 {
            return Err(Error::Misconfigured {
                message: "TempAttempts must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// The configured repository root (`SVNParentPath`).
    pub fn repo_root(&self) -> Result<&str> {
        self.svn_parent_path
            .as_deref()
            .ok_or_else(|| Error::Misconfigured {
                message: "missing SVNParentPath".to_string(),
            })
    }

    /// The configured URL prefix (`SVNLocationPath`).
    pub fn url_prefix(&self) -> Result<&str> {
        self.svn_location_path
            .as_deref()
            .ok_or_else(|| Error::Misconfigured {
                message: "missing SVNLocationPath".to_string(),
            })
    }

    /// The lock file guarding commits against this repository root.
    pub fn lock_path(&self) -> Result<PathBuf> {
        match &self.lock_path {
            Some(path) => Ok(path.clone()),
            None => Ok(defaults::default_lock_path(self.repo_root()?)),
        }
    }

    /// The directory under which working copies are created.
    pub fn temp_root(&self) -> PathBuf {
        self.temp_root.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Repository property holding the template for the given embed kind.
    pub fn template_property_for(&self, kind: crate::embed::EmbedKind) -> &str {
        match kind {
            crate::embed::EmbedKind::Default => &self.template_property,
            crate::embed::EmbedKind::LocalComment => &self.comment_template_property,
        }
    }
}
