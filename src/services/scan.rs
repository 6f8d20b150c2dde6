//! Scan: mine an extracted version and synchronize its tokens.

use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;
use tracing::{debug, info};

use super::PipelineError;
use crate::archive::{extraction_status, ExtractionStatus, ProjectLayout};
use crate::mining::{load_documents, mine, FormatMatcher, MiningReport};
use crate::models::ProjectId;
use crate::store::{ProjectRegistry, TokenStore};
use crate::sync::{SyncReport, TokenSynchronizer};

/// Outcome of one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub project_id: ProjectId,
    pub version: u32,
    /// Extraction directories mined, sorted
    pub directories: Vec<PathBuf>,
    pub mining: MiningReport,
    pub sync: SyncReport,
}

/// Mines extracted documents and writes the tokens to the store.
pub struct ScanService<'a, S: TokenStore + ProjectRegistry + ?Sized> {
    store: &'a S,
    layout: ProjectLayout,
    matcher: FormatMatcher,
}

impl<'a, S: TokenStore + ProjectRegistry + ?Sized> ScanService<'a, S> {
    #[must_use]
    pub fn new(store: &'a S, layout: ProjectLayout, matcher: FormatMatcher) -> Self {
        Self {
            store,
            layout,
            matcher,
        }
    }

    /// Scans `version` of `project`, or its current version when `None`.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::ProjectNotFound`] for an unknown project
    /// - [`PipelineError::Forbidden`] if `user` is not a member
    /// - [`PipelineError::NotReady`] if nothing was uploaded for the version
    ///   or any of its archives is still being extracted
    /// - [`PipelineError::Internal`] for store or filesystem failures
    pub async fn scan(
        &self,
        project: ProjectId,
        user: &str,
        version: Option<u32>,
    ) -> Result<ScanReport, PipelineError> {
        let Some(current) = self.store.current_version(project).await? else {
            return Err(PipelineError::ProjectNotFound(project));
        };
        if !self.store.is_member(project, user).await? {
            return Err(PipelineError::Forbidden {
                project,
                user: user.to_string(),
            });
        }

        let version = version.unwrap_or(current);
        let directories = self.ready_directories(project, version).await?;

        let (documents, unreadable) = load_documents(&directories).await;
        let mut mined = mine(project, &documents, &self.matcher);
        mined.report.unreadable_documents = unreadable;

        let sync = TokenSynchronizer::new(self.store)
            .sync(&mined.colors, &mined.typography)
            .await;

        info!(
            project_id = project,
            version,
            documents = mined.report.documents,
            colors = mined.colors.len(),
            typography = mined.typography.len(),
            "scan finished"
        );

        Ok(ScanReport {
            project_id: project,
            version,
            directories,
            mining: mined.report,
            sync,
        })
    }

    /// Sorted extraction directories of a version, all of them complete.
    async fn ready_directories(
        &self,
        project: ProjectId,
        version: u32,
    ) -> Result<Vec<PathBuf>, PipelineError> {
        let not_ready = || PipelineError::NotReady { project, version };

        let unzip_dir = self.layout.unzip_dir(project, version);
        let mut entries = match tokio::fs::read_dir(&unzip_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_ready()),
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("Failed to list {}", unzip_dir.display()))
                    .into())
            }
        };

        let mut directories = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("Failed to list {}", unzip_dir.display()))?
        {
            if entry.file_type().await.is_ok_and(|t| t.is_dir()) {
                directories.push(entry.path());
            }
        }
        directories.sort();

        if directories.is_empty() {
            return Err(not_ready());
        }

        for dir in &directories {
            match extraction_status(dir).await? {
                ExtractionStatus::Complete(_) => {}
                status => {
                    debug!(directory = %dir.display(), ?status, "extraction not finished");
                    return Err(not_ready());
                }
            }
        }

        Ok(directories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_nothing_uploaded_is_not_ready() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStore::with_project(1, &["ada"]);
        let service = ScanService::new(&store, ProjectLayout::new(temp.path()), FormatMatcher::default());

        let err = service.scan(1, "ada", None).await.unwrap_err();

        assert!(matches!(err, PipelineError::NotReady { project: 1, version: 0 }));
        assert_eq!(err.code(), 0);
    }

    #[tokio::test]
    async fn test_directory_without_marker_is_not_ready() {
        let temp = TempDir::new().unwrap();
        let layout = ProjectLayout::new(temp.path());
        std::fs::create_dir_all(layout.unzip_dir(1, 1).join("design")).unwrap();
        let store = MemoryStore::with_project(1, &["ada"]);
        let service = ScanService::new(&store, layout, FormatMatcher::default());

        let err = service.scan(1, "ada", Some(1)).await.unwrap_err();

        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_membership_gate() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStore::with_project(1, &["ada"]);
        let service = ScanService::new(&store, ProjectLayout::new(temp.path()), FormatMatcher::default());

        assert_eq!(service.scan(1, "eve", None).await.unwrap_err().code(), 2);
        assert!(matches!(
            service.scan(4, "ada", None).await.unwrap_err(),
            PipelineError::ProjectNotFound(4)
        ));
    }
}
