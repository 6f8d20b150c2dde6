//! Caller-facing pipeline errors and their stable status codes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ProjectId;

/// Failures surfaced to whoever drives the pipeline.
///
/// Per-entry problems (bad zip entries, malformed assets, store write
/// failures for a single token) never show up here; they are logged and
/// counted in the reports.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Extraction of the requested version has not finished yet. Retryable.
    #[error("Extraction of project {project} version {version} is not finished yet")]
    NotReady { project: ProjectId, version: u32 },

    #[error("Upload rejected: {0}")]
    UploadRejected(String),

    #[error("User '{user}' is not a member of project {project}")]
    Forbidden { project: ProjectId, user: String },

    #[error("Project {0} not found")]
    ProjectNotFound(ProjectId),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PipelineError {
    /// Stable numeric code.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::NotReady { .. } => 0,
            Self::UploadRejected(_) => 1,
            Self::Forbidden { .. } => 2,
            Self::ProjectNotFound(_) | Self::Internal(_) => 3,
        }
    }

    /// HTTP-equivalent status.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::NotReady { .. } => 202,
            Self::UploadRejected(_) | Self::Forbidden { .. } => 403,
            Self::ProjectNotFound(_) => 404,
            Self::Internal(_) => 500,
        }
    }

    /// Whether retrying the same request later may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::NotReady { .. })
    }

    /// JSON body for this error.
    #[must_use]
    pub fn body(&self) -> StatusBody {
        StatusBody {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

/// `{ "code": .., "message": .. }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBody {
    pub code: u8,
    pub message: String,
}
