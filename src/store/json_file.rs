//! Store persisted as a single JSON document.
//!
//! Every mutation re-reads the file, applies the change and rewrites it
//! through a temporary sibling and a rename, so readers never observe a
//! half-written store and a handle never writes back a stale snapshot.
//! Reads are served from the state of the last open or mutation.
//! Processes writing concurrently are not coordinated beyond that.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::{ProjectRegistry, StoreState, TokenStore};
use crate::models::{ColorToken, ElementKey, ProjectId, TypographyToken};

/// Store backed by a JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: Mutex<StoreState>,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = Self::load(&path).await?;
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Registers `project`. Returns false if it already existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub async fn add_project(&self, project: ProjectId) -> Result<bool> {
        self.mutate(|s| Ok(s.add_project(project))).await
    }

    /// Adds `user` to the members of `project`.
    ///
    /// # Errors
    ///
    /// Returns an error if the project is unknown or the store cannot be written.
    pub async fn add_member(&self, project: ProjectId, user: &str) -> Result<()> {
        self.mutate(|s| s.add_member(project, user)).await
    }

    async fn load(path: &Path) -> Result<StoreState> {
        match tokio::fs::read(path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("Failed to parse store file: {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreState::default()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read store file: {}", path.display()))
            }
        }
    }

    async fn persist(&self, state: &StoreState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create store directory: {}", parent.display())
                })?;
            }
        }

        let content =
            serde_json::to_vec_pretty(state).context("Failed to serialize store to JSON")?;

        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, content)
            .await
            .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .with_context(|| format!("Failed to rename temp file to: {}", self.path.display()))?;

        debug!(path = %self.path.display(), "store saved");
        Ok(())
    }

    async fn mutate<T>(&self, f: impl FnOnce(&mut StoreState) -> Result<T> + Send) -> Result<T>
    where
        T: Send,
    {
        let mut state = self.state.lock().await;
        let mut next = Self::load(&self.path).await?;
        let value = f(&mut next)?;
        self.persist(&next).await?;
        *state = next;
        Ok(value)
    }
}

#[async_trait]
impl TokenStore for JsonFileStore {
    async fn find_color(&self, project: ProjectId, value: &str) -> Result<Option<ColorToken>> {
        Ok(self.state.lock().await.find_color(project, value).cloned())
    }

    async fn create_color(&self, token: &ColorToken) -> Result<()> {
        self.mutate(|s| s.create_color(token)).await
    }

    async fn find_typography(
        &self,
        project: ProjectId,
        key: ElementKey,
    ) -> Result<Option<TypographyToken>> {
        let state = self.state.lock().await;
        Ok(state
            .typography_index(project, key)
            .map(|i| state.typography[i].clone()))
    }

    async fn create_typography(&self, token: &TypographyToken) -> Result<()> {
        self.mutate(|s| s.create_typography(token)).await
    }

    async fn update_typography(&self, token: &TypographyToken) -> Result<()> {
        self.mutate(|s| s.update_typography(token)).await
    }

    async fn list_colors(&self, project: ProjectId) -> Result<Vec<ColorToken>> {
        Ok(self.state.lock().await.list_colors(project))
    }

    async fn list_typography(&self, project: ProjectId) -> Result<Vec<TypographyToken>> {
        Ok(self.state.lock().await.list_typography(project))
    }
}

#[async_trait]
impl ProjectRegistry for JsonFileStore {
    async fn exists(&self, project: ProjectId) -> Result<bool> {
        Ok(self.state.lock().await.projects.contains_key(&project))
    }

    async fn is_member(&self, project: ProjectId, user: &str) -> Result<bool> {
        Ok(self.state.lock().await.is_member(project, user))
    }

    async fn current_version(&self, project: ProjectId) -> Result<Option<u32>> {
        Ok(self
            .state
            .lock()
            .await
            .projects
            .get(&project)
            .map(|p| p.version))
    }

    async fn increment_version(&self, project: ProjectId) -> Result<u32> {
        self.mutate(|s| s.increment_version(project)).await
    }
}
