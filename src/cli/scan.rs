//! Mine an uploaded version and synchronize its tokens.

use clap::Args;

use crate::archive::ProjectLayout;
use crate::cli::common::{open_store, print_json, CliResult};
use crate::config::Config;
use crate::mining::FormatMatcher;
use crate::models::ProjectId;
use crate::services::ScanService;

/// Extract design tokens from an uploaded version
#[derive(Debug, Clone, Args)]
pub struct ScanArgs {
    /// Project id
    #[arg(long, value_name = "N")]
    pub project: ProjectId,

    /// Acting user
    #[arg(long, value_name = "USER")]
    pub user: String,

    /// Version to scan (defaults to the latest upload)
    #[arg(long, value_name = "V")]
    pub version: Option<u32>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl ScanArgs {
    /// Execute the scan command
    pub async fn execute(&self, config: &Config) -> CliResult<()> {
        let store = open_store(config).await?;
        let service = ScanService::new(
            &store,
            ProjectLayout::new(&config.paths.uploads_root),
            FormatMatcher::new(&config.typography),
        );

        let report = service
            .scan(self.project, &self.user, self.version)
            .await?;

        if self.json {
            return print_json(&report);
        }

        let m = &report.mining;
        let s = &report.sync;
        println!(
            "Scanned version {} of project {} ({} document(s)).",
            report.version, report.project_id, m.documents
        );
        if m.unreadable_documents > 0 {
            println!("  Unreadable documents: {}", m.unreadable_documents);
        }
        println!(
            "  Colors:     {} asset(s), {} created, {} already stored, {} duplicate, {} discarded",
            m.color_assets, s.colors_created, s.colors_existing, m.duplicate_colors, m.discarded_colors
        );
        println!(
            "  Typography: {} style(s), {} created, {} updated, {} discarded",
            m.text_styles, s.typography_created, s.typography_updated, m.discarded_styles
        );
        if s.failures > 0 {
            println!("  Store failures: {}", s.failures);
        }
        Ok(())
    }
}
