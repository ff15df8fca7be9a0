//! Local implementation of the `HostExecutor` port.
//!
//! Runs everything on the machine this process lives on. System
//! properties come from `sysinfo` with an environment-variable fallback,
//! files go through `tokio::fs`, processes through `tokio::process` with
//! combined stdout/stderr capture.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use sysinfo::System;
use tokio::io::AsyncReadExt;
use tracing::debug;

use advkit_core::ports::{ExecutionResult, HostError, HostExecutor, ProcessSpec};

/// `HostExecutor` backed by the local machine.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalHost;

impl LocalHost {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HostExecutor for LocalHost {
    async fn read_system_property(&self, name: &str) -> Result<String, HostError> {
        match name {
            "os.name" => System::name(),
            "os.version" => System::os_version(),
            // Anything else falls back to the process environment
            other => std::env::var(other).ok(),
        }
        .ok_or_else(|| HostError::PropertyUnavailable(name.to_string()))
    }

    async fn path_exists(&self, path: &Path) -> Result<bool, HostError> {
        Ok(tokio::fs::try_exists(path)
            .await
            .map_err(|e| HostError::Io(e.to_string()))?)
    }

    async fn run_process(&self, spec: ProcessSpec) -> Result<ExecutionResult, HostError> {
        debug!(command = %spec.display_line(), "launching process");

        let mut command = tokio::process::Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &spec.current_dir {
            command.current_dir(dir);
        }
        if let Some(env) = &spec.env {
            for (name, value) in env.iter() {
                command.env(name, value);
            }
        }

        let mut child = command.spawn().map_err(|e| HostError::Launch {
            program: spec.program.display().to_string(),
            reason: e.to_string(),
        })?;

        // Drain both pipes concurrently before waiting; reading them one
        // after the other deadlocks once a chatty tool fills the other
        // pipe's buffer.
        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();
        let (stdout, stderr) = tokio::join!(drain_pipe(stdout_pipe), drain_pipe(stderr_pipe));
        let stdout = stdout.map_err(|e| HostError::Io(e.to_string()))?;
        let stderr = stderr.map_err(|e| HostError::Io(e.to_string()))?;
        let status = child
            .wait()
            .await
            .map_err(|e| HostError::Io(e.to_string()))?;

        let mut output = String::from_utf8_lossy(&stdout).into_owned();
        output.push_str(&String::from_utf8_lossy(&stderr));
        Ok(ExecutionResult::new(status.code().unwrap_or(-1), output))
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, HostError> {
        tokio::fs::read(path)
            .await
            .map_err(|e| HostError::Io(format!("{}: {e}", path.display())))
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), HostError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| HostError::Io(format!("{}: {e}", parent.display())))?;
        }
        tokio::fs::write(path, contents)
            .await
            .map_err(|e| HostError::Io(format!("{}: {e}", path.display())))
    }

    async fn delete_tree(&self, path: &Path) -> Result<(), HostError> {
        let meta = match tokio::fs::symlink_metadata(path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(HostError::Io(format!("{}: {e}", path.display()))),
        };
        let result = if meta.is_dir() {
            tokio::fs::remove_dir_all(path).await
        } else {
            tokio::fs::remove_file(path).await
        };
        result.map_err(|e| HostError::Io(format!("{}: {e}", path.display())))
    }

    async fn create_temp_dir(&self, prefix: &str) -> Result<PathBuf, HostError> {
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir()
            .map_err(|e| HostError::Io(e.to_string()))?;
        // Ownership of the directory passes to the caller, who removes it
        // through delete_tree.
        Ok(dir.keep())
    }

    #[cfg(windows)]
    async fn file_version(&self, path: &Path) -> Result<Option<String>, HostError> {
        let spec = ProcessSpec::new("powershell.exe")
            .arg("-NoProfile")
            .arg("-Command")
            .arg(format!(
                "(Get-Item '{}').VersionInfo.FileVersion",
                path.display()
            ));
        let result = self.run_process(spec).await?;
        if !result.success() {
            return Ok(None);
        }
        let version = result.output.trim().to_string();
        Ok(if version.is_empty() { None } else { Some(version) })
    }

    /// Version resources are a PE concept; there is nothing to read on
    /// other platforms.
    #[cfg(not(windows))]
    async fn file_version(&self, _path: &Path) -> Result<Option<String>, HostError> {
        Ok(None)
    }
}

async fn drain_pipe<R>(pipe: Option<R>) -> std::io::Result<Vec<u8>>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use advkit_core::EnvVars;

    #[tokio::test]
    async fn reads_os_name_property() {
        let host = LocalHost::new();
        let name = host.read_system_property("os.name").await.unwrap();
        assert!(!name.is_empty());
    }

    #[tokio::test]
    async fn unknown_property_is_unavailable() {
        let host = LocalHost::new();
        let err = host
            .read_system_property("ADVKIT_NO_SUCH_PROPERTY")
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::PropertyUnavailable(_)));
    }

    #[tokio::test]
    async fn captures_exit_code_and_combined_output() {
        let host = LocalHost::new();
        let spec = ProcessSpec::new("/bin/sh")
            .arg("-c")
            .arg("echo out; echo err >&2; exit 3");
        let result = host.run_process(spec).await.unwrap();
        assert_eq!(result.exit_code, 3);
        assert!(result.output.contains("out"));
        assert!(result.output.contains("err"));
    }

    #[tokio::test]
    async fn stderr_heavy_child_does_not_stall_capture() {
        let host = LocalHost::new();
        // 256 KiB to stderr, well past the pipe buffer, while stdout is
        // still open
        let spec = ProcessSpec::new("/bin/sh")
            .arg("-c")
            .arg("yes e | head -c 262144 >&2; echo done");
        let result = tokio::time::timeout(
            std::time::Duration::from_secs(30),
            host.run_process(spec),
        )
        .await
        .expect("capture stalled on a stderr-heavy child")
        .unwrap();
        assert!(result.success());
        assert!(result.output.contains("done"));
        assert!(result.output.len() >= 262_144);
    }

    #[tokio::test]
    async fn process_sees_supplied_environment() {
        let host = LocalHost::new();
        let mut env = EnvVars::new();
        env.set("ADVKIT_MARKER", "value-42");
        let spec = ProcessSpec::new("/bin/sh")
            .arg("-c")
            .arg("printf %s \"$ADVKIT_MARKER\"")
            .env(env);
        let result = host.run_process(spec).await.unwrap();
        assert_eq!(result.output, "value-42");
    }

    #[tokio::test]
    async fn missing_program_is_a_launch_error() {
        let host = LocalHost::new();
        let err = host
            .run_process(ProcessSpec::new("/no/such/binary"))
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::Launch { .. }));
    }

    #[tokio::test]
    async fn write_creates_parents_and_roundtrips() {
        let host = LocalHost::new();
        let root = host.create_temp_dir("advkit-test").await.unwrap();
        let file = root.join("nested/dir/file.bin");

        host.write_file(&file, b"payload").await.unwrap();
        assert!(host.path_exists(&file).await.unwrap());
        assert_eq!(host.read_file(&file).await.unwrap(), b"payload");

        host.delete_tree(&root).await.unwrap();
        assert!(!host.path_exists(&root).await.unwrap());
    }

    #[tokio::test]
    async fn deleting_a_missing_path_is_fine() {
        let host = LocalHost::new();
        host.delete_tree(Path::new("/tmp/advkit-definitely-missing"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn file_version_is_none_off_windows() {
        let host = LocalHost::new();
        let version = host.file_version(Path::new("/bin/sh")).await.unwrap();
        assert_eq!(version, None);
    }
}
