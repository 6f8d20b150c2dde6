//! Upload `.sketch` files into a project.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::archive::ProjectLayout;
use crate::cli::common::{open_store, print_json, CliResult};
use crate::config::Config;
use crate::models::ProjectId;
use crate::services::{UploadService, UploadedFile};

/// Upload Sketch files and extract them
#[derive(Debug, Clone, Args)]
pub struct UploadArgs {
    /// Project id
    #[arg(long, value_name = "N")]
    pub project: ProjectId,

    /// Acting user
    #[arg(long, value_name = "USER")]
    pub user: String,

    /// `.sketch` files to upload
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct UploadResponse {
    version: u32,
    directories: Vec<PathBuf>,
    written: usize,
    skipped: usize,
    failed: usize,
}

impl UploadArgs {
    /// Execute the upload command
    pub async fn execute(&self, config: &Config) -> CliResult<()> {
        let store = open_store(config).await?;
        let service = UploadService::new(&store, ProjectLayout::new(&config.paths.uploads_root));
        let files: Vec<UploadedFile> = self.files.iter().map(UploadedFile::from_path).collect();

        let outcome = service.ingest(self.project, &self.user, &files).await?;

        let response = UploadResponse {
            version: outcome.version,
            written: outcome.reports.iter().map(|r| r.written).sum(),
            skipped: outcome.reports.iter().map(|r| r.skipped).sum(),
            failed: outcome.reports.iter().map(|r| r.failed).sum(),
            directories: outcome.directories,
        };

        if self.json {
            return print_json(&response);
        }

        println!(
            "Uploaded {} file(s) as version {} of project {}.",
            files.len(),
            response.version,
            self.project
        );
        for dir in &response.directories {
            println!("  {}", dir.display());
        }
        if response.skipped > 0 || response.failed > 0 {
            println!(
                "Entries skipped: {}, failed: {}",
                response.skipped, response.failed
            );
        }
        Ok(())
    }
}
