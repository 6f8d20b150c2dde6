//! Sketch Tokens command line binary.
//!
//! Exit codes: 0 on success, 2 when extraction has not finished yet, 1 for
//! anything else. With `--json`, failures are printed to stdout as a
//! `{"code", "message"}` body.

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sketch_tokens::cli::{Cli, CliError, ExitCode};
use sketch_tokens::constants::APP_NAME;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine readable
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!("{} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

    let result = match cli.load_config() {
        Ok(config) => cli.command.execute(&config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        report(&e, cli.command.wants_json());
        std::process::exit(e.exit_code.code());
    }
    std::process::exit(ExitCode::Success.code());
}

fn report(err: &CliError, json: bool) {
    if json {
        match serde_json::to_string(&err.body) {
            Ok(line) => println!("{line}"),
            Err(_) => eprintln!("Error: {err}"),
        }
    } else {
        eprintln!("Error: {err}");
    }
}
