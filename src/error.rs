//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `svnmentions` receiver. It uses the `thiserror` library to create a single
//! `Error` enum that covers every anticipated failure mode of a notification
//! transaction.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum that represents all possible errors. Each
//!   variant carries the context needed to log the failure server-side.
//!
//! - **`ErrorKind`**: Which party is at fault. Webmention distinguishes a
//!   sender fault (400), a receiver fault (500) and, for access control, a
//!   refusal (403). `Error::kind` performs the classification.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Sender errors carry messages that are safe to echo back to the caller.
//! Receiver errors are reported with a generic message while the detailed
//! cause goes to the log.

use thiserror::Error;

/// Which party a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller's request is unacceptable.
    Sender,
    /// The caller is not allowed to mention the target.
    Forbidden,
    /// The service or its environment failed.
    Receiver,
}

/// Main error type for svnmentions operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required request field was absent.
    #[error("Missing {field} field!")]
    MissingField { field: String },

    /// The request used an HTTP method the endpoint does not serve.
    #[error("Must send as POST!")]
    MethodNotAllowed { method: String },

    /// The request body could not be decoded.
    #[error("Unsupported request: {message}")]
    BadRequest { message: String },

    /// The `type` field named a strategy that does not exist.
    #[error("Unknown webmention type: {kind}")]
    UnknownType { kind: String },

    /// Source and target were identical.
    #[error("Source and target are the same!")]
    SameSourceAndTarget,

    /// The source is not an acceptable absolute http(s) URL.
    #[error("Source is not an acceptable URL: {source_url}")]
    InvalidSource { source_url: String },

    /// The target is outside the issuer or has no usable path.
    #[error("{message}")]
    InvalidTarget { message: String },

    /// The caller-supplied WebDAV property pattern did not compile.
    #[error("Invalid property pattern `{pattern}`: {message}")]
    InvalidPropertyPattern { pattern: String, message: String },

    /// Fetching the source failed.
    #[error("Could not fetch source `{url}`: {message}")]
    SourceUnreachable { url: String, message: String },

    /// The source response was not understood.
    #[error("Could not parse response from `{url}`: {message}")]
    SourceUnparseable { url: String, message: String },

    /// The source does not mention the target.
    #[error("Source `{source_url}` did not mention target `{target}`")]
    SourceNotVerified { source_url: String, target: String },

    /// The caller is not listed in the access-control property.
    #[error("Forbidden: {identity} may not mention this target")]
    Forbidden { identity: String },

    /// No temporary working directory could be created.
    #[error("Failed to create temporary directory: {message}")]
    ResourceExhausted { message: String },

    /// The concurrency gate could not be obtained.
    #[error("Failed to lock {path}: {message}")]
    LockUnavailable { path: String, message: String },

    /// `svn checkout` failed.
    #[error("Failed to checkout {url}: {stderr}")]
    CheckoutFailed { url: String, stderr: String },

    /// `svn update` failed.
    #[error("Failed to update {path}: {stderr}")]
    UpdateFailed { path: String, stderr: String },

    /// `svn commit` failed.
    #[error("Failed to commit {path}: {stderr}")]
    CommitFailed { path: String, stderr: String },

    /// Any other `svn` invocation failed.
    #[error("svn {command} failed for {path}: {stderr}")]
    SvnCommand {
        command: String,
        path: String,
        stderr: String,
    },

    /// The target document does not have the expected anchors.
    #[error("Target document {message}")]
    SchemaViolation { message: String },

    /// The deployment is missing required settings.
    #[error("Misconfigured endpoint: {message}")]
    Misconfigured { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Classify the error by the party at fault.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingField { .. }
            | Error::MethodNotAllowed { .. }
            | Error::BadRequest { .. }
            | Error::UnknownType { .. }
            | Error::SameSourceAndTarget
            | Error::InvalidSource { .. }
            | Error::InvalidTarget { .. }
            | Error::InvalidPropertyPattern { .. }
            | Error::SourceUnreachable { .. }
            | Error::SourceUnparseable { .. }
            | Error::SourceNotVerified { .. }
            | Error::UrlParse(_) => ErrorKind::Sender,
            Error::Forbidden { .. } => ErrorKind::Forbidden,
            Error::ResourceExhausted { .. }
            | Error::LockUnavailable { .. }
            | Error::CheckoutFailed { .. }
            | Error::UpdateFailed { .. }
            | Error::CommitFailed { .. }
            | Error::SvnCommand { .. }
            | Error::SchemaViolation { .. }
            | Error::Misconfigured { .. }
            | Error::Io(_)
            | Error::Json(_)
            | Error::Yaml(_) => ErrorKind::Receiver,
        }
    }

    /// HTTP status code for the error.
    pub fn status(&self) -> u16 {
        match self.kind() {
            ErrorKind::Sender => 400,
            ErrorKind::Forbidden => 403,
            ErrorKind::Receiver => 500,
        }
    }

    /// Message that may be shown to the caller.
    ///
    /// Receiver faults never leak paths or command output.
    pub fn public_message(&self) -> String {
        match self {
            Error::Misconfigured { .. } => "Misconfigured endpoint!".to_string(),
            Error::SchemaViolation { .. } => "Failed to add webmention".to_string(),
            Error::CommitFailed { .. } => "Failed to add webmention".to_string(),
            _ => match self.kind() {
                ErrorKind::Sender => self.to_string(),
                ErrorKind::Forbidden => "Forbidden".to_string(),
                ErrorKind::Receiver => String::new(),
            },
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
