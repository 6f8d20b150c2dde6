//! Project registration.

use clap::{Args, Subcommand};

use crate::cli::common::{open_store, CliError, CliResult};
use crate::config::Config;
use crate::models::ProjectId;

/// Manage projects in the token store
#[derive(Debug, Clone, Args)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub command: ProjectCommand,
}

/// Project subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum ProjectCommand {
    /// Register a project and its members
    Add(AddProjectArgs),
}

/// Register a project
#[derive(Debug, Clone, Args)]
pub struct AddProjectArgs {
    /// Project id
    #[arg(long, value_name = "N")]
    pub id: ProjectId,

    /// User allowed to upload and scan (repeatable)
    #[arg(long = "member", value_name = "USER")]
    pub members: Vec<String>,
}

impl ProjectArgs {
    /// Execute the project command
    pub async fn execute(&self, config: &Config) -> CliResult<()> {
        match &self.command {
            ProjectCommand::Add(args) => args.execute(config).await,
        }
    }
}

impl AddProjectArgs {
    /// Execute the add command
    pub async fn execute(&self, config: &Config) -> CliResult<()> {
        let store = open_store(config).await?;

        let added = store
            .add_project(self.id)
            .await
            .map_err(|e| CliError::io(format!("Failed to save store: {e:#}")))?;
        for member in &self.members {
            store
                .add_member(self.id, member)
                .await
                .map_err(|e| CliError::io(format!("Failed to add member: {e:#}")))?;
        }

        if added {
            println!("Project {} added.", self.id);
        } else {
            println!("Project {} already exists.", self.id);
        }
        if !self.members.is_empty() {
            println!("Members: {}", self.members.join(", "));
        }
        Ok(())
    }
}
