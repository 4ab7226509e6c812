//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// SVNmentions - Receive Webmentions into a Subversion repository
#[derive(Parser, Debug)]
#[command(name = "svnmentions")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute. Runs as a CGI program when omitted.
    #[command(subcommand)]
    command: Option<Commands>,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "info",
        env = "SVNMENTIONS_LOG"
    )]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Handle one request from the CGI environment
    Cgi(commands::cgi::CgiArgs),

    /// Process one notification given on the command line
    Receive(commands::receive::ReceiveArgs),

    /// Print the client metadata document
    Metadata(commands::metadata::MetadataArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Some(Commands::Cgi(args)) => commands::cgi::execute(args),
            Some(Commands::Receive(args)) => commands::receive::execute(args),
            Some(Commands::Metadata(args)) => commands::metadata::execute(args),
            None => commands::cgi::execute(commands::cgi::CgiArgs::default()),
        }
    }
}

/// Log to stderr, which the web server routes to its error log.
fn init_logging(level: &str) {
    let _ = env_logger::Builder::new()
        .parse_filters(level)
        .target(env_logger::Target::Stderr)
        .format_target(false)
        .try_init();
}
