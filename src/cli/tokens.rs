//! List stored tokens of a project.

use clap::Args;
use serde::Serialize;

use crate::cli::common::{open_store, print_json, CliError, CliResult};
use crate::config::Config;
use crate::models::{ColorToken, ProjectId, TypographyToken};
use crate::store::TokenStore;

/// List the tokens stored for a project
#[derive(Debug, Clone, Args)]
pub struct TokensArgs {
    /// Project id
    #[arg(long, value_name = "N")]
    pub project: ProjectId,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct TokensResponse {
    colors: Vec<ColorToken>,
    typography: Vec<TypographyToken>,
}

impl TokensArgs {
    /// Execute the tokens command
    pub async fn execute(&self, config: &Config) -> CliResult<()> {
        let store = open_store(config).await?;
        let load_error = |e: anyhow::Error| CliError::io(format!("Failed to read tokens: {e:#}"));

        let response = TokensResponse {
            colors: store.list_colors(self.project).await.map_err(load_error)?,
            typography: store
                .list_typography(self.project)
                .await
                .map_err(load_error)?,
        };

        if self.json {
            return print_json(&response);
        }

        if response.colors.is_empty() && response.typography.is_empty() {
            println!("No tokens stored for project {}.", self.project);
            return Ok(());
        }

        println!("Colors ({}):", response.colors.len());
        for color in &response.colors {
            let flag = if color.double_name { " (shared name)" } else { "" };
            println!("  {:<10} {:<30} {}{}", color.value, color.name, color.og_name, flag);
        }
        println!();
        println!("Typography ({}):", response.typography.len());
        for token in &response.typography {
            println!(
                "  {:<3} {:<20} base {:<6} min {:<6} weights {}{}",
                token.key.as_str(),
                token.family.as_deref().unwrap_or("-"),
                format_size(token.base_size),
                format_size(token.min_size),
                token.weight.join("/"),
                if token.has_italic { " italic" } else { "" }
            );
        }
        Ok(())
    }
}

fn format_size(size: Option<f64>) -> String {
    size.map_or_else(|| "-".to_string(), |s| s.to_string())
}
