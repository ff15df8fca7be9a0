//! Script executor: serialize, invoke, capture, clean up.
//!
//! The tool reads its command script from a file in a two-byte encoding:
//! UTF-16LE with a byte-order mark, a literal `;aic` header line, one
//! command per line, CRLF terminated. The transient script file is
//! removed on every exit path.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use advkit_core::tool::AIC_HEADER;
use advkit_core::{
    AdvkitError, AdvkitResult, CleanupGuard, CommandScript, EnvVars, ExecutionResult, HostExecutor,
    LogSink, ProcessSpec,
};

static SCRIPT_FILE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Runs a compiled command script through the provisioned binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptExecutor;

impl ScriptExecutor {
    pub const fn new() -> Self {
        Self
    }

    /// Execute `script` against `aip_path` using the tool at `com_path`.
    /// Success means exit code zero; a nonzero exit is reported in the
    /// returned result, not as an error.
    pub async fn run(
        &self,
        host: &Arc<dyn HostExecutor>,
        com_path: &Path,
        aip_path: &Path,
        script: &CommandScript,
        work_dir: &Path,
        env: &EnvVars,
        sink: &dyn LogSink,
    ) -> AdvkitResult<ExecutionResult> {
        // The tool is a native Windows binary; fail before touching the
        // filesystem when the host cannot run it.
        let os_name = host
            .read_system_property("os.name")
            .await
            .map_err(|e| AdvkitError::Execution(e.to_string()))?;
        if !os_name.to_lowercase().contains("windows") {
            return Err(AdvkitError::UnsupportedPlatform(format!(
                "the packaging tool cannot execute on \"{os_name}\""
            )));
        }

        // The guard covers every exit path, including a partially
        // written file and cancellation while the tool runs.
        let script_file = transient_script_path(work_dir);
        let guard = CleanupGuard::new(Arc::clone(host), script_file.clone());
        if let Err(e) = host.write_file(&script_file, &encode_script(script)).await {
            let _ = guard.finish().await;
            return Err(AdvkitError::Execution(format!(
                "failed to write the command script file: {e}"
            )));
        }
        debug!(path = %script_file.display(), lines = script.len(), "command script written");

        let spec = ProcessSpec::new(com_path)
            .arg("/execute")
            .arg(aip_path.display().to_string())
            .arg(script_file.display().to_string())
            .current_dir(work_dir)
            .env(env.clone());
        let run = host.run_process(spec).await;

        // The delete only surfaces as the error when it is the sole
        // failure.
        let deleted = guard.finish().await;

        let outcome = run.map_err(|e| AdvkitError::Execution(e.to_string()))?;
        sink.append(&outcome.output);
        deleted.map_err(|e| {
            AdvkitError::Execution(format!("failed to delete the command script file: {e}"))
        })?;
        Ok(outcome)
    }
}

/// A uniquely named transient path for the script file inside `work_dir`.
fn transient_script_path(work_dir: &Path) -> PathBuf {
    let seq = SCRIPT_FILE_SEQ.fetch_add(1, Ordering::Relaxed);
    work_dir.join(format!("aic-{}-{seq}.aic", std::process::id()))
}

/// Serialize the script in the tool's encoding: UTF-16LE with BOM, the
/// `;aic` header first, CRLF after every line.
fn encode_script(script: &CommandScript) -> Vec<u8> {
    let mut text = String::from(AIC_HEADER);
    text.push_str("\r\n");
    for line in script.lines() {
        text.push_str(line);
        text.push_str("\r\n");
    }

    let mut bytes = Vec::with_capacity(2 + text.len() * 2);
    bytes.extend_from_slice(&[0xFF, 0xFE]);
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}
