//! End-to-end execution through the local host adapter, using a stand-in
//! tool binary. Unix only; the stand-in is a shell script.

#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use advkit_build::{LocalHost, ScriptExecutor};
use advkit_core::ports::{ExecutionResult, HostError, HostExecutor, ProcessSpec};
use advkit_core::{BufferSink, CommandScript, EnvVars};

/// Forwards everything to the local machine but reports a Windows
/// identity, so the executor's platform gate lets the run proceed.
struct WindowsReporting(LocalHost);

#[async_trait]
impl HostExecutor for WindowsReporting {
    async fn read_system_property(&self, name: &str) -> Result<String, HostError> {
        match name {
            "os.name" => Ok("Windows Server 2022".to_string()),
            "os.version" => Ok("10.0".to_string()),
            other => self.0.read_system_property(other).await,
        }
    }

    async fn path_exists(&self, path: &Path) -> Result<bool, HostError> {
        self.0.path_exists(path).await
    }

    async fn run_process(&self, spec: ProcessSpec) -> Result<ExecutionResult, HostError> {
        self.0.run_process(spec).await
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, HostError> {
        self.0.read_file(path).await
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), HostError> {
        self.0.write_file(path, contents).await
    }

    async fn delete_tree(&self, path: &Path) -> Result<(), HostError> {
        self.0.delete_tree(path).await
    }

    async fn create_temp_dir(&self, prefix: &str) -> Result<PathBuf, HostError> {
        self.0.create_temp_dir(prefix).await
    }

    async fn file_version(&self, path: &Path) -> Result<Option<String>, HostError> {
        self.0.file_version(path).await
    }
}

/// A script that mimics the tool's `/execute` surface: prints its
/// arguments, checks the script file exists, exits with `FAKE_TOOL_EXIT`.
fn install_fake_tool(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-tool.sh");
    std::fs::write(
        &path,
        "#!/bin/sh\n\
         echo \"mode=$1 project=$2\"\n\
         test -f \"$3\" || { echo 'script file missing' >&2; exit 9; }\n\
         exit \"${FAKE_TOOL_EXIT:-0}\"\n",
    )
    .unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[tokio::test]
async fn runs_tool_and_removes_transient_script() {
    let work = tempfile::tempdir().unwrap();
    let tool = install_fake_tool(work.path());
    let host: Arc<dyn HostExecutor> = Arc::new(WindowsReporting(LocalHost::new()));
    let sink = BufferSink::new();

    let script: CommandScript = ["ResetSig", "Build -buildslist \"Release\""]
        .into_iter()
        .collect();
    let result = ScriptExecutor::new()
        .run(
            &host,
            &tool,
            &work.path().join("demo.aip"),
            &script,
            work.path(),
            &EnvVars::new(),
            &sink,
        )
        .await
        .unwrap();

    assert!(result.success());
    assert!(sink.contents().contains("mode=/execute"));
    assert!(sink.contents().contains("demo.aip"));

    // Only the stand-in tool remains in the working directory
    let leftovers: Vec<_> = std::fs::read_dir(work.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, ["fake-tool.sh"]);
}

#[tokio::test]
async fn tool_failure_is_reported_and_script_still_removed() {
    let work = tempfile::tempdir().unwrap();
    let tool = install_fake_tool(work.path());
    let host: Arc<dyn HostExecutor> = Arc::new(WindowsReporting(LocalHost::new()));
    let sink = BufferSink::new();

    let mut env = EnvVars::new();
    env.set("FAKE_TOOL_EXIT", "4");
    let script: CommandScript = ["Build -buildslist \"Release\""].into_iter().collect();
    let result = ScriptExecutor::new()
        .run(
            &host,
            &tool,
            &work.path().join("demo.aip"),
            &script,
            work.path(),
            &env,
            &sink,
        )
        .await
        .unwrap();

    assert_eq!(result.exit_code, 4);
    let leftovers: Vec<_> = std::fs::read_dir(work.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, ["fake-tool.sh"]);
}

#[tokio::test]
async fn bare_local_host_refuses_to_execute() {
    let work = tempfile::tempdir().unwrap();
    let tool = install_fake_tool(work.path());
    let script: CommandScript = ["Build -buildslist \"\""].into_iter().collect();

    let host: Arc<dyn HostExecutor> = Arc::new(LocalHost::new());
    let err = ScriptExecutor::new()
        .run(
            &host,
            &tool,
            &work.path().join("demo.aip"),
            &script,
            work.path(),
            &EnvVars::new(),
            &BufferSink::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        advkit_core::AdvkitError::UnsupportedPlatform(_)
    ));
}
