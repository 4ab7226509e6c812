//! Responses to notification senders
//!
//! Every request ends in exactly one `Response`. Success is an empty `200`.
//! Failures map through `Error::status` and `Error::public_message`, so sender
//! faults echo their message while receiver faults stay generic. The
//! discovery document is the only non-text response.

use std::io::{self, Write};

use serde_json::json;

use crate::config::Config;
use crate::error::Error;

pub const TEXT_PLAIN: &str = "text/plain;charset=UTF-8";
pub const APPLICATION_JSON: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Response {
    /// Synchronous success.
    pub fn ok() -> Self {
        Self {
            status: 200,
            content_type: TEXT_PLAIN,
            body: String::new(),
        }
    }

    pub fn from_error(error: &Error) -> Self {
        Self {
            status: error.status(),
            content_type: TEXT_PLAIN,
            body: error.public_message(),
        }
    }

    /// Client metadata describing this endpoint.
    pub fn discovery(config: &Config, issuer: &str) -> Self {
        let document = discovery_document(config, issuer);
        Self {
            status: 200,
            content_type: APPLICATION_JSON,
            body: document.to_string(),
        }
    }

    pub fn reason(&self) -> &'static str {
        match self.status {
            200 => "OK",
            400 => "Bad Request",
            403 => "Forbidden",
            500 => "Internal Server Error",
            _ => "",
        }
    }

    /// Write the response in CGI form: `Status` and `Content-Type` headers,
    /// a blank line, then the body.
    pub fn write_cgi<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "Status: {} {}\r\n", self.status, self.reason())?;
        write!(out, "Content-Type: {}\r\n\r\n", self.content_type)?;
        out.write_all(self.body.as_bytes())?;
        out.flush()
    }
}

/// The client metadata JSON object.
pub fn discovery_document(config: &Config, issuer: &str) -> serde_json::Value {
    let issuer = config.issuer.as_deref().unwrap_or(issuer);
    json!({
        "client_id": config.client_id.as_deref().unwrap_or(issuer),
        "client_name": config.client_name.as_deref().unwrap_or("SVNmentions"),
        "client_uri": issuer,
    })
}
