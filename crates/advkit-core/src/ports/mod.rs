//! Port definitions (trait abstractions) for the execution host.
//!
//! Ports define what the core expects from infrastructure without saying
//! how it is provided. The host running the packaging tool may be the
//! local machine or a remote agent behind an RPC channel; everything the
//! core needs from it goes through `HostExecutor`.
//!
//! # Design Rules
//!
//! - No `tokio::process`/`std::fs` types in any signature
//! - A small fixed operation set; adding an op is a design decision
//! - Calls are blocking from the core's point of view and are never
//!   overlapped for a single provisioning/build operation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

use crate::envvars::EnvVars;

/// Errors crossing the host boundary.
///
/// Implementation details (I/O kinds, RPC transport) are flattened to
/// strings; callers map these into the `AdvkitError` taxonomy with
/// phase-specific context.
#[derive(Debug, Error)]
pub enum HostError {
    /// Filesystem or transport I/O failed on the host.
    #[error("Host I/O error: {0}")]
    Io(String),

    /// A process could not be launched on the host.
    #[error("Failed to launch {program}: {reason}")]
    Launch { program: String, reason: String },

    /// The host cannot answer the requested system property.
    #[error("System property unavailable: {0}")]
    PropertyUnavailable(String),
}

/// What to run on the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
    pub env: Option<EnvVars>,
    /// Indexes into `args` that must never appear in logs (secrets).
    pub masked_args: Vec<usize>,
}

impl ProcessSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append an argument that is masked in any logged command line.
    #[must_use]
    pub fn masked_arg(mut self, arg: impl Into<String>) -> Self {
        self.masked_args.push(self.args.len());
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn env(mut self, env: EnvVars) -> Self {
        self.env = Some(env);
        self
    }

    /// Command line for log output, with masked arguments censored.
    pub fn display_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for (i, arg) in self.args.iter().enumerate() {
            line.push(' ');
            if self.masked_args.contains(&i) {
                line.push_str("******");
            } else {
                line.push_str(arg);
            }
        }
        line
    }
}

/// Outcome of a finished process: exit code plus captured combined output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub output: String,
}

impl ExecutionResult {
    pub const fn new(exit_code: i32, output: String) -> Self {
        Self { exit_code, output }
    }

    /// Exit code zero is the only accepted success signal.
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes units of work on the target host, hiding whether the host is
/// local or remote.
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait HostExecutor: Send + Sync {
    /// Read a named system property ("os.name", "os.version", ...).
    async fn read_system_property(&self, name: &str) -> Result<String, HostError>;

    async fn path_exists(&self, path: &Path) -> Result<bool, HostError>;

    /// Run a process to completion, capturing combined stdout/stderr.
    async fn run_process(&self, spec: ProcessSpec) -> Result<ExecutionResult, HostError>;

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, HostError>;

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), HostError>;

    /// Delete a file or directory tree. Deleting a missing path is not an
    /// error.
    async fn delete_tree(&self, path: &Path) -> Result<(), HostError>;

    /// Create a uniquely named temporary directory on the host.
    async fn create_temp_dir(&self, prefix: &str) -> Result<PathBuf, HostError>;

    /// Version stamped into an executable's version resource, if any.
    async fn file_version(&self, path: &Path) -> Result<Option<String>, HostError>;
}

/// Sink for the captured output of tool invocations.
pub trait LogSink: Send + Sync {
    fn append(&self, text: &str);

    fn append_line(&self, text: &str) {
        self.append(text);
        self.append("\n");
    }
}

/// Forwards output to the process's stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn append(&self, text: &str) {
        print!("{text}");
    }
}

/// Collects output in memory; used by tests and by callers that report
/// the full log after the fact.
#[derive(Debug, Default)]
pub struct BufferSink {
    buffer: Mutex<String>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.buffer.lock().map(|b| b.clone()).unwrap_or_default()
    }
}

impl LogSink for BufferSink {
    fn append(&self, text: &str) {
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.push_str(text);
        }
    }
}
