//! # Metadata Command Implementation
//!
//! Prints the client metadata document the endpoint serves for discovery
//! `GET` requests, so it can be published as a static file instead.

use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;

use svnmentions::response::discovery_document;

use super::load_config;

/// Print the client metadata document
#[derive(Args, Debug)]
pub struct MetadataArgs {
    /// YAML configuration file. Defaults to the `CONTEXT` variable.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Origin of the site, unless `Issuer` is configured.
    #[arg(long)]
    pub issuer: Option<String>,
}

/// Execute the `metadata` command.
pub fn execute(args: MetadataArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let issuer = match args.issuer.as_ref().or(config.issuer.as_ref()) {
        Some(issuer) => issuer.clone(),
        None => bail!("--issuer is required when Issuer is not configured"),
    };

    let document = discovery_document(&config, &issuer);
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
