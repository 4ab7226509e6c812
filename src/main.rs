//! # SVNmentions endpoint
//!
//! This is the binary entry point for the `svnmentions` receiver.
//!
//! Run without a subcommand it acts as a CGI program: the web server passes
//! the request through the environment and stdin and reads the response from
//! stdout. The subcommands exist for operating the endpoint by hand.
//!
//! The core application logic is defined in the `lib.rs` library crate, ensuring
//! that the binary is a thin wrapper around the reusable library functionality.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
