//! Standalone archive extraction.

use std::path::PathBuf;

use clap::Args;

use crate::archive::extract_archive;
use crate::cli::common::{print_json, CliError, CliResult};

/// Extract a zip archive with path checks
#[derive(Debug, Clone, Args)]
pub struct ExtractArgs {
    /// Archive to extract
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Destination directory
    #[arg(value_name = "DEST")]
    pub destination: PathBuf,

    /// Output the extraction report as JSON
    #[arg(long)]
    pub json: bool,
}

impl ExtractArgs {
    /// Execute the extract command
    pub async fn execute(&self) -> CliResult<()> {
        let report = extract_archive(self.archive.clone(), self.destination.clone())
            .await
            .map_err(|e| CliError::io(format!("Extraction failed: {e:#}")))?;

        if self.json {
            return print_json(&report);
        }

        println!(
            "Extracted {} to {}",
            self.archive.display(),
            self.destination.display()
        );
        println!(
            "  {} written, {} directories, {} skipped, {} failed",
            report.written, report.directories, report.skipped, report.failed
        );
        Ok(())
    }
}
