//! Caller-facing error taxonomy.
//!
//! Every phase of the pipeline reports through one error type so the
//! single caller boundary receives a message naming exactly which phase
//! failed. None of these are retried by the core; retry policy belongs
//! to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by provisioning, script compilation and execution.
#[derive(Debug, Error)]
pub enum AdvkitError {
    /// Missing or malformed caller configuration (installation reference,
    /// required path). Fatal, no retry.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The target host's OS family or version cannot run the tool.
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// The project file could not be read or parsed.
    #[error("Failed to read project file {path}: {reason}")]
    ProjectRead { path: PathBuf, reason: String },

    /// The requested build configuration is absent from the project file.
    #[error("Build configuration \"{0}\" was not found in the project file")]
    BuildConfigurationNotFound(String),

    /// A provisioning step (download, extract, register) failed. Partial
    /// install state is rolled back before this surfaces.
    #[error("Installation failed while {step}: {reason}")]
    InstallationFailed { step: String, reason: String },

    /// Process launch or I/O failure while executing the command script.
    #[error("Execution failed: {0}")]
    Execution(String),
}

impl AdvkitError {
    /// Create an `InstallationFailed` error for a named provisioning step.
    pub fn install_step(step: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::InstallationFailed {
            step: step.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias used across the workspace.
pub type AdvkitResult<T> = Result<T, AdvkitError>;
