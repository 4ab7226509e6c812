//! Outbound HTTP requests against notification sources.
//!
//! Verification needs exactly two kinds of request: a plain `GET` of the
//! source document and a WebDAV `PROPFIND`. Both go through the
//! `SourceFetcher` trait so verification can be tested without a network.

use std::time::Duration;

use log::debug;

use crate::config::Config;
use crate::defaults;
use crate::error::{Error, Result};

/// Request body asking for every property of the source resource.
pub const PROPFIND_ALLPROP: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<D:propfind xmlns:D="DAV:"><D:allprop/></D:propfind>"#;

/// Trait for source fetches - allows mocking in tests
pub trait SourceFetcher: Send + Sync {
    /// Fetch the source as HTML and return the body.
    fn get(&self, url: &str) -> Result<String>;

    /// Send a depth-0 `PROPFIND` with `body` and return the XML response.
    fn propfind(&self, url: &str, body: &str) -> Result<String>;
}

/// `SourceFetcher` backed by a `ureq` agent with bounded timeouts and
/// redirects.
pub struct UreqFetcher {
    agent: ureq::Agent,
}

impl UreqFetcher {
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_millis(config.fetch_timeout_ms))
            .timeout_connect(Duration::from_millis(defaults::CONNECT_TIMEOUT_MS))
            .redirects(config.max_redirects)
            .user_agent(concat!("svnmentions/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent }
    }
}

fn unreachable(url: &str, err: impl std::fmt::Display) -> Error {
    Error::SourceUnreachable {
        url: url.to_string(),
        message: err.to_string(),
    }
}

impl SourceFetcher for UreqFetcher {
    fn get(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let resp = self
            .agent
            .get(url)
            .set("Accept", "text/html")
            .call()
            .map_err(|e| unreachable(url, e))?;
        resp.into_string().map_err(|e| unreachable(url, e))
    }

    fn propfind(&self, url: &str, body: &str) -> Result<String> {
        debug!("PROPFIND {}", url);
        let resp = self
            .agent
            .request("PROPFIND", url)
            .set("Depth", "0")
            .set("Content-Type", "application/xml; charset=utf-8")
            .send_string(body)
            .map_err(|e| unreachable(url, e))?;
        resp.into_string().map_err(|e| unreachable(url, e))
    }
}
