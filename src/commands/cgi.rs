//! # CGI Command Implementation
//!
//! Handles one HTTP request passed in by the web server through the CGI
//! interface (RFC 3875). The request metadata comes from environment
//! variables, the form body from stdin, and the response goes to stdout as a
//! `Status` header, a `Content-Type` header and the body.
//!
//! Configuration is the JSON object in `CONTEXT`, unless `--config` names a
//! YAML file. Every failure, including a broken configuration, is answered
//! with a response; the command itself only fails if stdout is unwritable.

use anyhow::Result;
use clap::Args;
use log::error;
use std::env;
use std::io::{self, Read};
use std::path::PathBuf;

use svnmentions::config::Config;
use svnmentions::error::Error;
use svnmentions::pipeline::Receiver;
use svnmentions::request::{Notification, RequestContext};
use svnmentions::response::Response;

/// Media type of Webmention form bodies.
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Handle one request from the CGI environment
#[derive(Args, Debug, Default)]
pub struct CgiArgs {
    /// YAML configuration file used instead of the `CONTEXT` variable.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// The CGI meta-variables this endpoint reads.
#[derive(Debug, Clone, Default)]
pub struct CgiRequest {
    pub method: String,
    pub content_length: Option<usize>,
    pub content_type: Option<String>,
    pub host: Option<String>,
    pub https: bool,
    pub remote_user: Option<String>,
}

impl CgiRequest {
    pub fn from_env() -> Self {
        let var = |name: &str| env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            method: var("REQUEST_METHOD").unwrap_or_default(),
            content_length: var("CONTENT_LENGTH").and_then(|v| v.trim().parse().ok()),
            content_type: var("CONTENT_TYPE"),
            host: var("HTTP_HOST"),
            https: var("HTTPS").is_some_and(|v| !v.eq_ignore_ascii_case("off")),
            remote_user: var("REMOTE_USER"),
        }
    }

    fn context(&self) -> Result<RequestContext, Error> {
        let host = self.host.as_deref().ok_or_else(|| Error::BadRequest {
            message: "missing Host header".to_string(),
        })?;
        Ok(RequestContext::from_host(host, self.https, self.remote_user.clone()))
    }

    fn is_form(&self) -> bool {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .is_some_and(|ct| ct.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
    }
}

/// Execute the `cgi` command.
pub fn execute(args: CgiArgs) -> Result<()> {
    let request = CgiRequest::from_env();
    let config = match &args.config {
        Some(path) => Config::from_file(path),
        None => Config::from_env(),
    };

    let response = respond(&request, config, io::stdin().lock());
    response.write_cgi(&mut io::stdout().lock())?;
    Ok(())
}

/// Turn one request into its response.
pub fn respond<R: Read>(
    request: &CgiRequest,
    config: svnmentions::error::Result<Config>,
    body: R,
) -> Response {
    match handle(request, config, body) {
        Ok(response) => response,
        Err(e) => {
            if e.status() >= 500 {
                error!("{}", e);
            }
            Response::from_error(&e)
        }
    }
}

fn handle<R: Read>(
    request: &CgiRequest,
    config: svnmentions::error::Result<Config>,
    body: R,
) -> Result<Response, Error> {
    if request.method.eq_ignore_ascii_case("GET") {
        if let Ok(config) = &config {
            if config.discovery {
                let context = request.context()?;
                return Ok(Response::discovery(config, &context.issuer));
            }
        }
    }
    if !request.method.eq_ignore_ascii_case("POST") {
        return Err(Error::MethodNotAllowed {
            method: request.method.clone(),
        });
    }

    let receiver = Receiver::new(config?)?;

    if !request.is_form() {
        return Err(Error::BadRequest {
            message: format!("content type must be {}", FORM_CONTENT_TYPE),
        });
    }
    let form = read_body(body, request.content_length)?;
    let notification = Notification::from_form(&form)?;
    let context = request.context()?;

    Ok(receiver.handle(&context, &notification))
}

/// Read exactly `CONTENT_LENGTH` bytes, or to end of input if it is unset.
fn read_body<R: Read>(body: R, content_length: Option<usize>) -> Result<Vec<u8>, Error> {
    let mut form = Vec::new();
    match content_length {
        Some(length) => {
            body.take(length as u64).read_to_end(&mut form)?;
        }
        None => {
            let mut body = body;
            body.read_to_end(&mut form)?;
        }
    }
    Ok(form)
}
