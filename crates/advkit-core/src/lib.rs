//! Core domain types and port definitions for advkit.
//!
//! This crate carries the vocabulary shared by every adapter: build
//! parameters and their resolved form, the command script emitted for the
//! packaging tool, installation references, the provisioning manifest and
//! the error taxonomy. It also defines the port traits (`HostExecutor`,
//! `LogSink`) that hide whether the target execution host is local or
//! remote.
//!
//! # Design Rules
//!
//! - No process/filesystem implementation details in any signature
//! - Ports express intent, not mechanism
//! - Value types are immutable; specialization derives new instances

pub mod cleanup;
pub mod envvars;
pub mod error;
pub mod installation;
pub mod manifest;
pub mod params;
pub mod ports;
pub mod script;
pub mod tool;
pub mod version;

// Re-export commonly used types for convenience
pub use cleanup::CleanupGuard;
pub use envvars::EnvVars;
pub use error::{AdvkitError, AdvkitResult};
pub use installation::{InstallationRegistry, ToolInstallation};
pub use manifest::{LicenseKey, ProvisioningManifest};
pub use params::{BuildParameters, ResolvedBuildContext};
pub use ports::{
    BufferSink, ExecutionResult, HostError, HostExecutor, LogSink, ProcessSpec, StdoutSink,
};
pub use script::CommandScript;
pub use version::VersionNumber;
