//! Shared plumbing for command handlers: exit codes, errors and output.

use serde::Serialize;

use crate::config::Config;
use crate::services::{PipelineError, StatusBody};
use crate::store::JsonFileStore;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    Error = 1,
    /// Extraction still running, retry later
    NotReady = 2,
}

impl ExitCode {
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Error reported by a command handler.
#[derive(Debug)]
pub struct CliError {
    /// Human readable message
    pub message: String,
    pub exit_code: ExitCode,
    /// Body printed in `--json` mode
    pub body: StatusBody,
}

/// Result alias for command handlers.
pub type CliResult<T> = Result<T, CliError>;

/// Status code for input the command refuses, shared with rejected uploads.
const REJECTED_CODE: u8 = 1;

/// Status code for filesystem and store failures.
const INTERNAL_CODE: u8 = 3;

impl CliError {
    /// Filesystem or store failure.
    pub fn io(message: impl Into<String>) -> Self {
        Self::with_code(INTERNAL_CODE, message.into())
    }

    /// Bad arguments or configuration.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_code(REJECTED_CODE, message.into())
    }

    fn with_code(code: u8, message: String) -> Self {
        Self {
            body: StatusBody {
                code,
                message: message.clone(),
            },
            message,
            exit_code: ExitCode::Error,
        }
    }
}

impl From<PipelineError> for CliError {
    fn from(err: PipelineError) -> Self {
        let exit_code = if err.is_retryable() {
            ExitCode::NotReady
        } else {
            ExitCode::Error
        };
        Self {
            message: err.to_string(),
            exit_code,
            body: err.body(),
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Opens the token store configured in `config`.
pub async fn open_store(config: &Config) -> CliResult<JsonFileStore> {
    let path = config.paths.store_path();
    JsonFileStore::open(&path)
        .await
        .map_err(|e| CliError::io(format!("Failed to open store {}: {e:#}", path.display())))
}

/// Prints `value` as one line of JSON.
pub fn print_json(value: &impl Serialize) -> CliResult<()> {
    let line = serde_json::to_string(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{line}");
    Ok(())
}
