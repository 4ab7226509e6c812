//! Inbound notification requests
//!
//! A `Notification` is the decoded form body of one Webmention `POST`. The
//! `RequestContext` carries what the transport knows about the request that
//! is not part of the body: the origin targets must live under and the
//! authenticated caller, if any. Both are built by the transport adapter and
//! passed explicitly into the pipeline.

use std::collections::BTreeMap;

use crate::defaults;
use crate::error::{Error, Result};

/// Verification strategy used when the request names none.
pub const DEFAULT_TYPE: &str = "standard";

/// Transport-level facts about one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Origin (`scheme://host[:port]`) every target must start with.
    pub issuer: String,
    /// Authenticated user, if the web server established one.
    pub caller: Option<String>,
}

impl RequestContext {
    pub fn new(issuer: impl Into<String>, caller: Option<String>) -> Self {
        Self {
            issuer: issuer.into(),
            caller: caller.filter(|c| !c.is_empty()),
        }
    }

    /// Derive the issuer from the `Host` header and whether TLS was used.
    pub fn from_host(host: &str, https: bool, caller: Option<String>) -> Self {
        let scheme = if https { "https" } else { "http" };
        Self::new(format!("{}://{}", scheme, host), caller)
    }

    /// The caller's identity, `anonymous` when unauthenticated.
    pub fn caller_identity(&self) -> &str {
        self.caller.as_deref().unwrap_or(defaults::ANONYMOUS)
    }
}

/// Decoded form fields of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub source: Option<String>,
    pub target: String,
    fields: BTreeMap<String, String>,
}

impl Notification {
    /// Decode an `application/x-www-form-urlencoded` body.
    pub fn from_form(body: &[u8]) -> Result<Self> {
        Self::from_pairs(
            url::form_urlencoded::parse(body).map(|(k, v)| (k.into_owned(), v.into_owned())),
        )
    }

    /// Build from decoded name/value pairs. The first value of a repeated
    /// field wins; empty values count as absent.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut fields = BTreeMap::new();
        for (name, value) in pairs {
            if !value.is_empty() {
                fields.entry(name).or_insert(value);
            }
        }

        let target = fields
            .remove("target")
            .ok_or_else(|| Error::MissingField {
                field: "target".to_string(),
            })?;
        let source = fields.remove("source");

        Ok(Self {
            source,
            target,
            fields,
        })
    }

    /// An extra, kind-specific field such as `content` or `property`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The requested verification strategy.
    pub fn type_name(&self) -> &str {
        self.field("type").unwrap_or(DEFAULT_TYPE)
    }
}
