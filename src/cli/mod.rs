//! Command line interface.
//!
//! [`Cli`] is the argument tree; each subcommand lives in its own module with
//! an `execute` method returning [`CliResult`].

pub mod common;
pub mod extract;
pub mod project;
pub mod scan;
pub mod tokens;
pub mod upload;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

pub use common::{CliError, CliResult, ExitCode};
pub use extract::ExtractArgs;
pub use project::ProjectArgs;
pub use scan::ScanArgs;
pub use tokens::TokensArgs;
pub use upload::UploadArgs;

/// Sketch Tokens - extract color and typography tokens from Sketch files
#[derive(Parser, Debug)]
#[command(name = "sketch-tokens", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage projects
    Project(ProjectArgs),
    /// Upload .sketch files and extract them
    Upload(UploadArgs),
    /// Mine an uploaded version and store its tokens
    Scan(ScanArgs),
    /// List stored tokens
    Tokens(TokensArgs),
    /// Extract a single archive
    Extract(ExtractArgs),
}

impl Command {
    /// Whether failures should be printed as a JSON status body.
    #[must_use]
    pub const fn wants_json(&self) -> bool {
        match self {
            Self::Project(_) => false,
            Self::Upload(args) => args.json,
            Self::Scan(args) => args.json,
            Self::Tokens(args) => args.json,
            Self::Extract(args) => args.json,
        }
    }

    /// Runs the command.
    pub async fn execute(&self, config: &Config) -> CliResult<()> {
        match self {
            Self::Project(args) => args.execute(config).await,
            Self::Upload(args) => args.execute(config).await,
            Self::Scan(args) => args.execute(config).await,
            Self::Tokens(args) => args.execute(config).await,
            Self::Extract(args) => args.execute().await,
        }
    }
}

impl Cli {
    /// Loads the configuration selected by `--config`.
    pub fn load_config(&self) -> CliResult<Config> {
        let loaded = match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        };
        loaded.map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))
    }
}
