//! Source verification strategies
//!
//! A notification names its verification strategy in the `type` field. Each
//! strategy is one variant of `Verification` and lives in its own submodule:
//!
//! - `standard` (standard.rs) - fetch the source and look for the target
//! - `webdav` (webdav.rs) - read a WebDAV property listing mentioned targets
//! - `local-comment` (local_comment.rs) - comments posted to this site; no fetch
//!
//! Every strategy ends in an `EmbedDescriptor`. Adding a strategy means adding
//! a variant and a submodule, not branching inside an existing one.

pub mod local_comment;
pub mod standard;
pub mod webdav;

use crate::embed::EmbedDescriptor;
use crate::error::{Error, Result};
use crate::fetch::SourceFetcher;
use crate::request::{Notification, RequestContext};

/// Characters that may not appear in a source used inside an attribute.
const FORBIDDEN_SOURCE_CHARS: &[char] = &['"', '\'', '<', '>', '`', ' ', '\t', '\r', '\n'];

/// One verification strategy with the fields it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Standard { source: String },
    Webdav { source: String, property: String },
    LocalComment { content: String },
}

impl Verification {
    /// Select and populate the strategy named by the notification.
    pub fn from_notification(notification: &Notification) -> Result<Self> {
        let require_source = || {
            notification.source.clone().ok_or_else(|| Error::MissingField {
                field: "source".to_string(),
            })
        };

        match notification.type_name() {
            standard::TYPE_NAME => Ok(Verification::Standard {
                source: require_source()?,
            }),
            webdav::TYPE_NAME => Ok(Verification::Webdav {
                source: require_source()?,
                property: notification
                    .field("property")
                    .map(str::to_string)
                    .ok_or_else(|| Error::MissingField {
                        field: "property".to_string(),
                    })?,
            }),
            local_comment::TYPE_NAME => Ok(Verification::LocalComment {
                content: notification
                    .field("content")
                    .map(str::to_string)
                    .ok_or_else(|| Error::MissingField {
                        field: "content".to_string(),
                    })?,
            }),
            other => Err(Error::UnknownType {
                kind: other.to_string(),
            }),
        }
    }

    /// Name of the strategy as it appears in the `type` field.
    pub fn type_name(&self) -> &'static str {
        match self {
            Verification::Standard { .. } => standard::TYPE_NAME,
            Verification::Webdav { .. } => webdav::TYPE_NAME,
            Verification::LocalComment { .. } => local_comment::TYPE_NAME,
        }
    }

    /// The source URL, for strategies that have one.
    pub fn source(&self) -> Option<&str> {
        match self {
            Verification::Standard { source } | Verification::Webdav { source, .. } => {
                Some(source)
            }
            Verification::LocalComment { .. } => None,
        }
    }

    /// Verify that the notification is genuine and describe its embed.
    pub fn verify(
        &self,
        target: &str,
        context: &RequestContext,
        fetcher: &dyn SourceFetcher,
    ) -> Result<EmbedDescriptor> {
        match self {
            Verification::Standard { source } => standard::verify(source, target, fetcher),
            Verification::Webdav { source, property } => {
                webdav::verify(source, target, property, fetcher)
            }
            Verification::LocalComment { content } => Ok(local_comment::verify(content, context)),
        }
    }
}

/// Reject sources that equal the target or are not plain http(s) URLs.
pub fn check_source(source: &str, target: &str) -> Result<()> {
    if source == target {
        return Err(Error::SameSourceAndTarget);
    }

    let invalid = || Error::InvalidSource {
        source_url: source.to_string(),
    };
    if source.contains(FORBIDDEN_SOURCE_CHARS) {
        return Err(invalid());
    }
    let url = url::Url::parse(source).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    Ok(())
}
