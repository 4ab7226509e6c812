//! Access control for mention targets
//!
//! When `AccessProperty` is configured, the named repository property on the
//! target document (or, failing that, on the working copy root) lists who may
//! send notifications for it, one identity per line. The special entry
//! `anonymous` admits unauthenticated callers and everyone else.

use std::path::Path;

use log::{debug, info};

use crate::config::Config;
use crate::defaults;
use crate::error::{Error, Result};
use crate::repository::{propget_with_fallback, SvnOperations};

/// Outcome of an access check that admitted the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// No access property is configured.
    Open,
    /// The caller is listed by name.
    Identity(String),
    /// The list admits anyone.
    Anonymous,
}

/// Decide whether `caller` may mention `document`.
pub fn check(
    svn: &dyn SvnOperations,
    config: &Config,
    document: &Path,
    wc_root: &Path,
    caller: Option<&str>,
) -> Result<AccessDecision> {
    let property = match &config.access_property {
        Some(property) => property,
        None => return Ok(AccessDecision::Open),
    };

    let identity = caller.unwrap_or(defaults::ANONYMOUS);
    let allowed = propget_with_fallback(svn, property, document, wc_root)?;
    let decision = allowed.as_deref().and_then(|list| decide(list, caller));

    match decision {
        Some(AccessDecision::Anonymous) => {
            info!(
                "anonymous access granted to {} for {}",
                identity,
                document.display()
            );
            Ok(AccessDecision::Anonymous)
        }
        Some(decision) => {
            info!("access granted to {} for {}", identity, document.display());
            Ok(decision)
        }
        None => {
            debug!(
                "{} not in {} of {} ({:?})",
                identity,
                property,
                document.display(),
                allowed
            );
            Err(Error::Forbidden {
                identity: identity.to_string(),
            })
        }
    }
}

/// Match the caller against a newline-separated access list.
pub fn decide(list: &str, caller: Option<&str>) -> Option<AccessDecision> {
    let entries: Vec<&str> = list
        .lines()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect();

    if let Some(caller) = caller {
        if entries.contains(&caller) {
            return Some(AccessDecision::Identity(caller.to_string()));
        }
    }
    if entries.contains(&defaults::ANONYMOUS) {
        return Some(AccessDecision::Anonymous);
    }
    None
}
