//! In-process store.

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ProjectRegistry, StoreState, TokenStore};
use crate::models::{ColorToken, ElementKey, ProjectId, TypographyToken};

/// Store kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `project` with `members`.
    #[must_use]
    pub fn with_project(project: ProjectId, members: &[&str]) -> Self {
        let mut state = StoreState::default();
        state.add_project(project);
        for member in members {
            // Project was just added
            let _ = state.add_member(project, member);
        }
        Self {
            state: RwLock::new(state),
        }
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> StoreState {
        self.state.read().await.clone()
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn find_color(&self, project: ProjectId, value: &str) -> Result<Option<ColorToken>> {
        Ok(self.state.read().await.find_color(project, value).cloned())
    }

    async fn create_color(&self, token: &ColorToken) -> Result<()> {
        self.state.write().await.create_color(token)
    }

    async fn find_typography(
        &self,
        project: ProjectId,
        key: ElementKey,
    ) -> Result<Option<TypographyToken>> {
        let state = self.state.read().await;
        Ok(state
            .typography_index(project, key)
            .map(|i| state.typography[i].clone()))
    }

    async fn create_typography(&self, token: &TypographyToken) -> Result<()> {
        self.state.write().await.create_typography(token)
    }

    async fn update_typography(&self, token: &TypographyToken) -> Result<()> {
        self.state.write().await.update_typography(token)
    }

    async fn list_colors(&self, project: ProjectId) -> Result<Vec<ColorToken>> {
        Ok(self.state.read().await.list_colors(project))
    }

    async fn list_typography(&self, project: ProjectId) -> Result<Vec<TypographyToken>> {
        Ok(self.state.read().await.list_typography(project))
    }
}

#[async_trait]
impl ProjectRegistry for MemoryStore {
    async fn exists(&self, project: ProjectId) -> Result<bool> {
        Ok(self.state.read().await.projects.contains_key(&project))
    }

    async fn is_member(&self, project: ProjectId, user: &str) -> Result<bool> {
        Ok(self.state.read().await.is_member(project, user))
    }

    async fn current_version(&self, project: ProjectId) -> Result<Option<u32>> {
        Ok(self
            .state
            .read()
            .await
            .projects
            .get(&project)
            .map(|p| p.version))
    }

    async fn increment_version(&self, project: ProjectId) -> Result<u32> {
        self.state.write().await.increment_version(project)
    }
}
