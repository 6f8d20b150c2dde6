//! Persistence ports for tokens and projects.
//!
//! The pipeline only talks to [`TokenStore`] and [`ProjectRegistry`]. Two
//! implementations ship with the crate: [`MemoryStore`] and the on-disk
//! [`JsonFileStore`]. Both keep their data in a [`StoreState`].
//!
//! Natural keys: colors match on `(project, value)`, typography tokens on
//! `(project, key)`.

pub mod json_file;
pub mod memory;

use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{ColorToken, ElementKey, ProjectId, TypographyToken};

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Token persistence.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Color token of `project` with hex `value`.
    async fn find_color(&self, project: ProjectId, value: &str) -> Result<Option<ColorToken>>;

    /// Inserts a color token. Fails if its natural key is taken.
    async fn create_color(&self, token: &ColorToken) -> Result<()>;

    /// Typography token of `project` for `key`.
    async fn find_typography(
        &self,
        project: ProjectId,
        key: ElementKey,
    ) -> Result<Option<TypographyToken>>;

    /// Inserts a typography token. Fails if its natural key is taken.
    async fn create_typography(&self, token: &TypographyToken) -> Result<()>;

    /// Replaces the stored typography token with the same natural key.
    async fn update_typography(&self, token: &TypographyToken) -> Result<()>;

    /// All color tokens of `project`, insertion order.
    async fn list_colors(&self, project: ProjectId) -> Result<Vec<ColorToken>>;

    /// All typography tokens of `project`, insertion order.
    async fn list_typography(&self, project: ProjectId) -> Result<Vec<TypographyToken>>;
}

/// Project lookup, membership and versioning.
#[async_trait]
pub trait ProjectRegistry: Send + Sync {
    /// Whether `project` is registered.
    async fn exists(&self, project: ProjectId) -> Result<bool>;

    /// Whether `user` may operate on `project`.
    async fn is_member(&self, project: ProjectId, user: &str) -> Result<bool>;

    /// Current version of `project`, `None` if unknown.
    async fn current_version(&self, project: ProjectId) -> Result<Option<u32>>;

    /// Bumps the version of `project` and returns the new value.
    async fn increment_version(&self, project: ProjectId) -> Result<u32>;
}

/// A registered project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Upload version, bumped on every upload
    pub version: u32,
    /// Users allowed to upload and scan
    #[serde(default)]
    pub members: Vec<String>,
}

/// Everything a store holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    /// Projects by id
    #[serde(default)]
    pub projects: BTreeMap<ProjectId, ProjectRecord>,
    /// Color tokens of all projects
    #[serde(default)]
    pub colors: Vec<ColorToken>,
    /// Typography tokens of all projects
    #[serde(default)]
    pub typography: Vec<TypographyToken>,
}

impl StoreState {
    /// Registers `project` at version 0. Returns false if it already exists.
    pub fn add_project(&mut self, project: ProjectId) -> bool {
        if self.projects.contains_key(&project) {
            return false;
        }
        self.projects.insert(
            project,
            ProjectRecord {
                version: 0,
                members: Vec::new(),
            },
        );
        true
    }

    /// Adds `user` to `project`.
    pub fn add_member(&mut self, project: ProjectId, user: &str) -> Result<()> {
        let record = self
            .projects
            .get_mut(&project)
            .ok_or_else(|| anyhow::anyhow!("Project {project} does not exist"))?;
        if !record.members.iter().any(|m| m == user) {
            record.members.push(user.to_string());
        }
        Ok(())
    }

    fn find_color(&self, project: ProjectId, value: &str) -> Option<&ColorToken> {
        self.colors
            .iter()
            .find(|c| c.project_id == project && c.value == value)
    }

    fn create_color(&mut self, token: &ColorToken) -> Result<()> {
        if self.find_color(token.project_id, &token.value).is_some() {
            anyhow::bail!(
                "Color {} already exists in project {}",
                token.value,
                token.project_id
            );
        }
        self.colors.push(token.clone());
        Ok(())
    }

    fn typography_index(&self, project: ProjectId, key: ElementKey) -> Option<usize> {
        self.typography
            .iter()
            .position(|t| t.project_id == project && t.key == key)
    }

    fn create_typography(&mut self, token: &TypographyToken) -> Result<()> {
        if self.typography_index(token.project_id, token.key).is_some() {
            anyhow::bail!(
                "Typography {} already exists in project {}",
                token.key,
                token.project_id
            );
        }
        self.typography.push(token.clone());
        Ok(())
    }

    fn update_typography(&mut self, token: &TypographyToken) -> Result<()> {
        let index = self
            .typography_index(token.project_id, token.key)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Typography {} does not exist in project {}",
                    token.key,
                    token.project_id
                )
            })?;
        self.typography[index] = token.clone();
        Ok(())
    }

    fn list_colors(&self, project: ProjectId) -> Vec<ColorToken> {
        self.colors
            .iter()
            .filter(|c| c.project_id == project)
            .cloned()
            .collect()
    }

    fn list_typography(&self, project: ProjectId) -> Vec<TypographyToken> {
        self.typography
            .iter()
            .filter(|t| t.project_id == project)
            .cloned()
            .collect()
    }

    fn is_member(&self, project: ProjectId, user: &str) -> bool {
        self.projects
            .get(&project)
            .is_some_and(|p| p.members.iter().any(|m| m == user))
    }

    fn increment_version(&mut self, project: ProjectId) -> Result<u32> {
        let record = self
            .projects
            .get_mut(&project)
            .ok_or_else(|| anyhow::anyhow!("Project {project} does not exist"))?;
        record.version += 1;
        Ok(record.version)
    }
}
