//! # Receive Command Implementation
//!
//! Processes one notification given as command-line flags, the way the CGI
//! endpoint would process a form submission. Useful for replaying a mention
//! that failed, or for testing a deployment's templates and access lists
//! without a web server.

use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;

use svnmentions::merge::MergeOutcome;
use svnmentions::pipeline::Receiver;
use svnmentions::request::{Notification, RequestContext};

use super::load_config;

/// Process one notification given on the command line
#[derive(Args, Debug)]
pub struct ReceiveArgs {
    /// YAML configuration file. Defaults to the `CONTEXT` variable.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// URL of the document that mentions the target.
    #[arg(long)]
    pub source: Option<String>,

    /// URL of the mentioned document.
    #[arg(long)]
    pub target: String,

    /// Verification strategy: standard, webdav or local-comment.
    #[arg(long = "type", value_name = "TYPE")]
    pub kind: Option<String>,

    /// Comment text, for local comments.
    #[arg(long)]
    pub content: Option<String>,

    /// WebDAV property name pattern, for webdav verification.
    #[arg(long)]
    pub property: Option<String>,

    /// Origin the target must belong to, unless `Issuer` is configured.
    #[arg(long)]
    pub issuer: Option<String>,

    /// Identity to act as, as if authenticated by the web server.
    #[arg(long)]
    pub user: Option<String>,
}

/// Execute the `receive` command.
pub fn execute(args: ReceiveArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let issuer = match args.issuer.as_ref().or(config.issuer.as_ref()) {
        Some(issuer) => issuer.clone(),
        None => bail!("--issuer is required when Issuer is not configured"),
    };

    let fields = [
        ("source", args.source),
        ("target", Some(args.target)),
        ("type", args.kind),
        ("content", args.content),
        ("property", args.property),
    ];
    let notification = Notification::from_pairs(
        fields
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name.to_string(), v))),
    )?;
    let context = RequestContext::new(issuer, args.user);

    let receiver = Receiver::new(config)?;
    match receiver.receive(&context, &notification)? {
        MergeOutcome::Inserted => println!("Added mention to {}", notification.target),
        MergeOutcome::Duplicate => {
            println!("{} already has this mention", notification.target)
        }
    }
    Ok(())
}
