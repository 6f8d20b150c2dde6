//! On-disk layout of uploaded and extracted archives.
//!
//! ```text
//! <root>/projects/{project}/{version}/sketch/{name}.zip
//! <root>/projects/{project}/{version}/unzip/{normalized name}/...
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::constants::{SKETCH_DIR, SKETCH_EXTENSION, UNZIP_DIR};
use crate::models::ProjectId;

/// Error returned for an upload file name that cannot be staged safely.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvalidFileName(pub String);

/// Validates an uploaded file name before it is used as a path component.
///
/// Rejects empty names, path separators, `..` and hidden files.
pub fn validate_filename(filename: &str) -> Result<&str, InvalidFileName> {
    if filename.is_empty() {
        return Err(InvalidFileName("Filename cannot be empty".to_string()));
    }

    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(InvalidFileName(format!(
            "Invalid filename '{filename}': path traversal not allowed"
        )));
    }

    if filename.starts_with('.') {
        return Err(InvalidFileName(format!(
            "Invalid filename '{filename}': hidden files not allowed"
        )));
    }

    Ok(filename)
}

/// Whether `filename` carries the `.sketch` extension.
#[must_use]
pub fn has_sketch_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .is_some_and(|ext| ext == SKETCH_EXTENSION)
}

/// Staged archive file name: the part before the first `.sketch`, plus `.zip`.
#[must_use]
pub fn staged_archive_name(original_name: &str) -> String {
    let stem = original_name
        .split(".sketch")
        .next()
        .unwrap_or(original_name);
    format!("{stem}.zip")
}

/// Extraction directory name for a staged archive.
///
/// Takes the part before the first `.zip`, lower-cases it and replaces
/// spaces with underscores: `My Design.zip` -> `my_design`.
#[must_use]
pub fn normalize_archive_name(archive_file_name: &str) -> String {
    archive_file_name
        .split(".zip")
        .next()
        .unwrap_or(archive_file_name)
        .to_lowercase()
        .replace(' ', "_")
}

/// Path builder for one uploads tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    /// Creates a layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `projects/{project}/{version}`
    #[must_use]
    pub fn version_dir(&self, project: ProjectId, version: u32) -> PathBuf {
        self.root
            .join("projects")
            .join(project.to_string())
            .join(version.to_string())
    }

    /// `projects/{project}/{version}/sketch`
    #[must_use]
    pub fn sketch_dir(&self, project: ProjectId, version: u32) -> PathBuf {
        self.version_dir(project, version).join(SKETCH_DIR)
    }

    /// `projects/{project}/{version}/unzip`
    #[must_use]
    pub fn unzip_dir(&self, project: ProjectId, version: u32) -> PathBuf {
        self.version_dir(project, version).join(UNZIP_DIR)
    }

    /// Where an uploaded `.sketch` file is staged.
    #[must_use]
    pub fn staged_archive(&self, project: ProjectId, version: u32, original_name: &str) -> PathBuf {
        self.sketch_dir(project, version)
            .join(staged_archive_name(original_name))
    }

    /// Where a staged archive is extracted.
    #[must_use]
    pub fn extraction_dir(&self, project: ProjectId, version: u32, archive_file_name: &str) -> PathBuf {
        self.unzip_dir(project, version)
            .join(normalize_archive_name(archive_file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_filename_valid() {
        assert!(validate_filename("design.sketch").is_ok());
        assert!(validate_filename("My Design v2.sketch").is_ok());
    }

    #[test]
    fn test_validate_filename_path_traversal() {
        assert!(validate_filename("../secret.sketch").is_err());
        assert!(validate_filename("foo/bar.sketch").is_err());
        assert!(validate_filename("foo\\bar.sketch").is_err());
        assert!(validate_filename("..").is_err());
    }

    #[test]
    fn test_validate_filename_hidden_and_empty() {
        assert!(validate_filename(".hidden.sketch").is_err());
        assert!(validate_filename("").is_err());
    }

    #[test]
    fn test_has_sketch_extension() {
        assert!(has_sketch_extension("design.sketch"));
        assert!(!has_sketch_extension("design.zip"));
        assert!(!has_sketch_extension("design.SKETCH"));
        assert!(!has_sketch_extension("sketch"));
    }

    #[test]
    fn test_staged_archive_name() {
        assert_eq!(staged_archive_name("Design.sketch"), "Design.zip");
        assert_eq!(staged_archive_name("a.sketch.sketch"), "a.zip");
    }

    #[test]
    fn test_normalize_archive_name() {
        assert_eq!(normalize_archive_name("My Design File.zip"), "my_design_file");
        assert_eq!(normalize_archive_name("UPPER.zip"), "upper");
        assert_eq!(normalize_archive_name("no-extension"), "no-extension");
    }

    #[test]
    fn test_layout_paths() {
        let layout = ProjectLayout::new("/data/uploads");
        assert_eq!(
            layout.staged_archive(7, 3, "Brand Kit.sketch"),
            PathBuf::from("/data/uploads/projects/7/3/sketch/Brand Kit.zip")
        );
        assert_eq!(
            layout.extraction_dir(7, 3, "Brand Kit.zip"),
            PathBuf::from("/data/uploads/projects/7/3/unzip/brand_kit")
        );
    }
}
