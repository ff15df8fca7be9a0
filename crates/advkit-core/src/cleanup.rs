//! Deferred, disarmable cleanup of host paths.
//!
//! A guard deletes its path when finished unless disarmed first.
//! Disarming is the commit: it runs only after the guarded step has
//! fully succeeded. `finish` deletes inline and reports the outcome.
//! If the owning future is dropped before `finish` (task cancellation),
//! `Drop` hands the delete to the runtime instead, so cancellation
//! cannot leak the guarded path.

use std::path::PathBuf;
use std::sync::Arc;

use crate::ports::{HostError, HostExecutor};

pub struct CleanupGuard {
    host: Option<Arc<dyn HostExecutor>>,
    path: PathBuf,
    armed: bool,
}

impl CleanupGuard {
    pub fn new(host: Arc<dyn HostExecutor>, path: PathBuf) -> Self {
        Self {
            host: Some(host),
            path,
            armed: true,
        }
    }

    /// Cancel the pending delete. The commit point of the guarded step.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Delete now and report the outcome. A disarmed guard does nothing.
    pub async fn finish(mut self) -> Result<(), HostError> {
        let Some(host) = self.host.take() else {
            return Ok(());
        };
        if !self.armed {
            return Ok(());
        }
        host.delete_tree(&self.path).await
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        // `finish` takes the host, so this only fires when the owning
        // future was dropped mid-flight.
        let Some(host) = self.host.take() else { return };
        if !self.armed {
            return;
        }
        let path = std::mem::take(&mut self.path);
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                let _ = host.delete_tree(&path).await;
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{ExecutionResult, ProcessSpec};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;

    /// Records delete_tree calls; every other operation is inert.
    #[derive(Default)]
    struct RecordingHost {
        deleted: Mutex<Vec<PathBuf>>,
    }

    impl RecordingHost {
        fn deleted(&self) -> Vec<PathBuf> {
            self.deleted.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HostExecutor for RecordingHost {
        async fn read_system_property(&self, name: &str) -> Result<String, HostError> {
            Err(HostError::PropertyUnavailable(name.to_string()))
        }

        async fn path_exists(&self, _path: &Path) -> Result<bool, HostError> {
            Ok(false)
        }

        async fn run_process(&self, spec: ProcessSpec) -> Result<ExecutionResult, HostError> {
            Err(HostError::Launch {
                program: spec.program.display().to_string(),
                reason: "recording host".to_string(),
            })
        }

        async fn read_file(&self, path: &Path) -> Result<Vec<u8>, HostError> {
            Err(HostError::Io(path.display().to_string()))
        }

        async fn write_file(&self, _path: &Path, _contents: &[u8]) -> Result<(), HostError> {
            Ok(())
        }

        async fn delete_tree(&self, path: &Path) -> Result<(), HostError> {
            self.deleted.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }

        async fn create_temp_dir(&self, prefix: &str) -> Result<PathBuf, HostError> {
            Ok(PathBuf::from(format!("/tmp/{prefix}")))
        }

        async fn file_version(&self, _path: &Path) -> Result<Option<String>, HostError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn finish_deletes_when_armed() {
        let host = Arc::new(RecordingHost::default());
        let dyn_host: Arc<dyn HostExecutor> = host.clone();

        CleanupGuard::new(dyn_host, PathBuf::from("/work/partial"))
            .finish()
            .await
            .unwrap();
        assert_eq!(host.deleted(), [PathBuf::from("/work/partial")]);
    }

    #[tokio::test]
    async fn disarmed_guard_leaves_the_path() {
        let host = Arc::new(RecordingHost::default());
        let dyn_host: Arc<dyn HostExecutor> = host.clone();

        let mut guard = CleanupGuard::new(dyn_host, PathBuf::from("/work/committed"));
        guard.disarm();
        guard.finish().await.unwrap();
        assert!(host.deleted().is_empty());
    }

    #[tokio::test]
    async fn dropped_guard_deletes_in_background() {
        let host = Arc::new(RecordingHost::default());
        let dyn_host: Arc<dyn HostExecutor> = host.clone();

        drop(CleanupGuard::new(dyn_host, PathBuf::from("/work/transient")));
        // Give the spawned delete a chance to run
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
        assert_eq!(host.deleted(), [PathBuf::from("/work/transient")]);
    }

    #[tokio::test]
    async fn dropped_disarmed_guard_stays_quiet() {
        let host = Arc::new(RecordingHost::default());
        let dyn_host: Arc<dyn HostExecutor> = host.clone();

        let mut guard = CleanupGuard::new(dyn_host, PathBuf::from("/work/kept"));
        guard.disarm();
        drop(guard);
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
        assert!(host.deleted().is_empty());
    }
}
