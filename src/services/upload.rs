//! Upload ingestion: gatekeeping, staging and extraction.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Context;
use tracing::{error, info, warn};

use super::PipelineError;
use crate::archive::{
    extract_all, has_sketch_extension, normalize_archive_name, staged_archive_name,
    validate_filename, ExtractionReport, ProjectLayout,
};
use crate::models::ProjectId;
use crate::store::ProjectRegistry;

/// A file handed over by the uploader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Name the uploader gave the file, e.g. `Brand Kit.sketch`
    pub original_name: String,
    /// Where the bytes currently live
    pub path: PathBuf,
}

impl UploadedFile {
    /// Uses the file name of `path` as the original name.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let original_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            original_name,
            path,
        }
    }
}

/// Result of a successful ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    /// Version the files were stored under
    pub version: u32,
    /// Extraction directories, in upload order
    pub directories: Vec<PathBuf>,
    /// One report per archive, in upload order
    pub reports: Vec<ExtractionReport>,
}

/// Accepts `.sketch` uploads for a project.
pub struct UploadService<'a, R: ProjectRegistry + ?Sized> {
    registry: &'a R,
    layout: ProjectLayout,
}

impl<'a, R: ProjectRegistry + ?Sized> UploadService<'a, R> {
    #[must_use]
    pub fn new(registry: &'a R, layout: ProjectLayout) -> Self {
        Self { registry, layout }
    }

    /// Validates, stages and extracts `files` as a new version of `project`.
    ///
    /// Nothing is written and the version is left alone unless every file
    /// passes validation. Archives are extracted concurrently; the call
    /// returns once all of them are done.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::ProjectNotFound`] for an unknown project
    /// - [`PipelineError::Forbidden`] if `user` is not a member
    /// - [`PipelineError::UploadRejected`] for an empty upload, a bad name, a
    ///   non-`.sketch` file or two files that would share an extraction
    ///   directory
    /// - [`PipelineError::Internal`] if staging or an extraction fails
    pub async fn ingest(
        &self,
        project: ProjectId,
        user: &str,
        files: &[UploadedFile],
    ) -> Result<UploadOutcome, PipelineError> {
        if !self.registry.exists(project).await? {
            return Err(PipelineError::ProjectNotFound(project));
        }
        if !self.registry.is_member(project, user).await? {
            return Err(PipelineError::Forbidden {
                project,
                user: user.to_string(),
            });
        }

        self.validate(files).await?;

        let version = self.registry.increment_version(project).await?;
        info!(project_id = project, version, files = files.len(), "ingesting upload");

        let sketch_dir = self.layout.sketch_dir(project, version);
        tokio::fs::create_dir_all(&sketch_dir)
            .await
            .with_context(|| format!("Failed to create {}", sketch_dir.display()))?;

        let mut jobs = Vec::with_capacity(files.len());
        for file in files {
            let staged = self
                .layout
                .staged_archive(project, version, &file.original_name);
            tokio::fs::copy(&file.path, &staged).await.with_context(|| {
                format!(
                    "Failed to stage {} at {}",
                    file.path.display(),
                    staged.display()
                )
            })?;
            let destination = self.layout.extraction_dir(
                project,
                version,
                &staged_archive_name(&file.original_name),
            );
            jobs.push((staged, destination));
        }

        let directories: Vec<PathBuf> = jobs.iter().map(|(_, dst)| dst.clone()).collect();
        let results = extract_all(jobs).await;

        let mut reports = Vec::with_capacity(results.len());
        let mut first_error = None;
        for (result, dir) in results.into_iter().zip(&directories) {
            match result {
                Ok(report) => reports.push(report),
                Err(e) => {
                    error!(directory = %dir.display(), error = ?e, "extraction failed");
                    first_error.get_or_insert(e);
                }
            }
        }
        if let Some(e) = first_error {
            return Err(PipelineError::Internal(e));
        }

        Ok(UploadOutcome {
            version,
            directories,
            reports,
        })
    }

    async fn validate(&self, files: &[UploadedFile]) -> Result<(), PipelineError> {
        if files.is_empty() {
            return Err(PipelineError::UploadRejected("no files uploaded".to_string()));
        }

        let mut targets = HashSet::new();
        for file in files {
            validate_filename(&file.original_name)
                .map_err(|e| PipelineError::UploadRejected(e.to_string()))?;

            if !has_sketch_extension(&file.original_name) {
                warn!(file = %file.original_name, "rejecting non-sketch upload");
                return Err(PipelineError::UploadRejected(format!(
                    "'{}' is not a .sketch file",
                    file.original_name
                )));
            }

            let readable = tokio::fs::metadata(&file.path)
                .await
                .is_ok_and(|m| m.is_file());
            if !readable {
                return Err(PipelineError::UploadRejected(format!(
                    "'{}' cannot be read",
                    file.path.display()
                )));
            }

            // Each archive needs its own staging file and extraction directory
            let target = normalize_archive_name(&staged_archive_name(&file.original_name));
            if !targets.insert(target.clone()) {
                return Err(PipelineError::UploadRejected(format!(
                    "'{}' collides with another upload named '{target}'",
                    file.original_name
                )));
            }
        }
        Ok(())
    }
}
