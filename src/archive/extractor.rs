//! Streaming zip extraction with zip-slip protection.
//!
//! Every entry is resolved against the destination before anything is
//! written. Entries that would land outside the destination are skipped and
//! logged; entries that cannot be read or written are logged and counted as
//! failed. Neither aborts the archive.
//!
//! Once the last entry is processed an [`EXTRACTION_MARKER`] file holding
//! the [`ExtractionReport`] is written atomically into the destination. Its
//! presence is the readiness signal for mining.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use zip::ZipArchive;

use crate::constants::EXTRACTION_MARKER;

/// Outcome counters for one archive.
///
/// `written + directories + skipped + failed == total` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Source archive
    pub archive: PathBuf,
    /// Destination root
    pub destination: PathBuf,
    /// Entry count declared by the archive
    pub total: usize,
    /// Files written
    pub written: usize,
    /// Directory entries created
    pub directories: usize,
    /// Entries rejected by the path check
    pub skipped: usize,
    /// Entries that could not be read or written
    pub failed: usize,
    /// RFC 3339 completion time
    pub completed_at: String,
}

impl ExtractionReport {
    /// Entries processed so far, successfully or not.
    #[must_use]
    pub const fn processed(&self) -> usize {
        self.written + self.directories + self.skipped + self.failed
    }
}

/// State of an extraction directory as seen by the mining phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionStatus {
    /// Directory does not exist
    Missing,
    /// Directory exists but the completion marker does not
    InProgress,
    /// Marker present
    Complete(ExtractionReport),
}

impl ExtractionStatus {
    /// Whether mining may read this directory.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }
}

/// Resolves an archive entry name against `destination`.
///
/// Works lexically on `/` and `\` separated segments. Returns `None` when the
/// entry is absolute, names a drive, climbs above `destination`, or resolves
/// to `destination` itself.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use sketch_tokens::archive::resolve_entry_path;
///
/// let dst = Path::new("/dst");
/// assert_eq!(resolve_entry_path(dst, "a/b.json"), Some(dst.join("a").join("b.json")));
/// assert_eq!(resolve_entry_path(dst, "a/../b.json"), Some(dst.join("b.json")));
/// assert_eq!(resolve_entry_path(dst, "a/../../etc/passwd"), None);
/// ```
#[must_use]
pub fn resolve_entry_path(destination: &Path, entry_name: &str) -> Option<PathBuf> {
    if entry_name.starts_with(['/', '\\']) || has_drive_prefix(entry_name) {
        return None;
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in entry_name.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        return None;
    }

    let mut resolved = destination.to_path_buf();
    resolved.extend(segments);
    Some(resolved)
}

/// `C:...` style names.
fn has_drive_prefix(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Extracts `archive` into `destination`, blocking the current thread.
///
/// # Errors
///
/// Returns an error only if the archive itself cannot be opened or the
/// completion marker cannot be written. Per-entry problems are counted in
/// the report.
pub fn extract_archive_blocking(archive: &Path, destination: &Path) -> Result<ExtractionReport> {
    let file = File::open(archive)
        .with_context(|| format!("Failed to open archive {}", archive.display()))?;
    let mut zip = ZipArchive::new(file)
        .with_context(|| format!("Failed to read zip directory of {}", archive.display()))?;

    fs::create_dir_all(destination).with_context(|| {
        format!(
            "Failed to create extraction directory {}",
            destination.display()
        )
    })?;

    let mut report = ExtractionReport {
        archive: archive.to_path_buf(),
        destination: destination.to_path_buf(),
        total: zip.len(),
        written: 0,
        directories: 0,
        skipped: 0,
        failed: 0,
        completed_at: String::new(),
    };

    debug!(archive = %archive.display(), entries = report.total, "extracting archive");

    for index in 0..report.total {
        let mut entry = match zip.by_index(index) {
            Ok(entry) => entry,
            Err(e) => {
                error!(archive = %archive.display(), index, error = %e, "cannot open zip entry");
                report.failed += 1;
                continue;
            }
        };

        let name = entry.name().to_string();
        let Some(target) = resolve_entry_path(destination, &name) else {
            warn!(entry = %name, "ignoring maliciously crafted path in zip file");
            report.skipped += 1;
            continue;
        };

        if target == destination.join(EXTRACTION_MARKER) {
            warn!(entry = %name, "ignoring entry that shadows the extraction marker");
            report.skipped += 1;
            continue;
        }

        if entry.is_dir() {
            match fs::create_dir_all(&target) {
                Ok(()) => report.directories += 1,
                Err(e) => {
                    error!(entry = %name, error = %e, "cannot create directory");
                    report.failed += 1;
                }
            }
            continue;
        }

        match write_entry(&mut entry, &target) {
            Ok(bytes) => {
                debug!(entry = %name, bytes, "extracted");
                report.written += 1;
            }
            Err(e) => {
                error!(entry = %name, error = %e, "cannot extract entry");
                report.failed += 1;
            }
        }
    }

    if report.processed() != report.total {
        anyhow::bail!(
            "Processed {} of {} entries in {}",
            report.processed(),
            report.total,
            archive.display()
        );
    }

    report.completed_at = chrono::Utc::now().to_rfc3339();
    write_marker(&report)?;

    info!(
        archive = %archive.display(),
        written = report.written,
        skipped = report.skipped,
        failed = report.failed,
        "archive extracted"
    );

    Ok(report)
}

fn write_entry(entry: &mut impl io::Read, target: &Path) -> io::Result<u64> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(File::create(target)?);
    let bytes = io::copy(entry, &mut out)?;
    out.flush()?;
    Ok(bytes)
}

fn write_marker(report: &ExtractionReport) -> Result<()> {
    let marker = report.destination.join(EXTRACTION_MARKER);
    let temp = marker.with_extension("json.tmp");
    let content =
        serde_json::to_vec_pretty(report).context("Failed to serialize extraction report")?;

    fs::write(&temp, content)
        .with_context(|| format!("Failed to write {}", temp.display()))?;
    fs::rename(&temp, &marker)
        .with_context(|| format!("Failed to rename {} to {}", temp.display(), marker.display()))?;
    Ok(())
}

/// Extracts one archive on the blocking pool.
///
/// Resolves once every entry has been written or skipped.
pub async fn extract_archive(archive: PathBuf, destination: PathBuf) -> Result<ExtractionReport> {
    tokio::task::spawn_blocking(move || extract_archive_blocking(&archive, &destination))
        .await
        .context("Extraction task panicked")?
}

/// Extracts several archives concurrently.
///
/// Each job is an `(archive, destination)` pair. Results come back in job
/// order once every extraction has finished.
pub async fn extract_all(jobs: Vec<(PathBuf, PathBuf)>) -> Vec<Result<ExtractionReport>> {
    let handles: Vec<_> = jobs
        .into_iter()
        .map(|(archive, destination)| tokio::spawn(extract_archive(archive, destination)))
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(match handle.await {
            Ok(result) => result,
            Err(e) => Err(anyhow::anyhow!("Extraction task failed: {e}")),
        });
    }
    results
}

/// Reads the extraction state of `destination`.
///
/// # Errors
///
/// Returns an error if the marker exists but cannot be read or parsed.
pub async fn extraction_status(destination: &Path) -> Result<ExtractionStatus> {
    if !tokio::fs::try_exists(destination).await.unwrap_or(false) {
        return Ok(ExtractionStatus::Missing);
    }

    let marker = destination.join(EXTRACTION_MARKER);
    if !tokio::fs::try_exists(&marker).await.unwrap_or(false) {
        return Ok(ExtractionStatus::InProgress);
    }

    let content = tokio::fs::read(&marker)
        .await
        .with_context(|| format!("Failed to read {}", marker.display()))?;
    let report: ExtractionReport = serde_json::from_slice(&content)
        .with_context(|| format!("Failed to parse {}", marker.display()))?;
    Ok(ExtractionStatus::Complete(report))
}
