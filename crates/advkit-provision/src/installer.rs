//! Transactional tool installation on a target host.
//!
//! `ensure_installed` walks the states `NotInstalled -> Downloading ->
//! Extracted -> Registered -> Ready`, short-circuiting straight to
//! `Ready` when the expected binary is already present. Any failure
//! between download and successful extraction rolls the install root
//! back, so a half-installed directory never survives.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use advkit_core::tool::{MIN_WINDOWS_VERSION, REGISTER_CI_SWITCH_VERSION, TOOL_COM, tool_com_path};
use advkit_core::{
    AdvkitError, AdvkitResult, CleanupGuard, HostExecutor, LogSink, ProcessSpec,
    ProvisioningManifest, ToolInstallation, VersionNumber,
};

use crate::fetch::RemoteFetcher;

/// Environment variable that overrides the distribution download URL.
pub const DOWNLOAD_URL_ENV_OVERRIDE: &str = "ADVINST_DOWNLOAD_URL";

const DOWNLOAD_FILE_NAME: &str = "advinst.msi";

fn default_download_url(version: &str) -> String {
    format!("https://www.advancedinstaller.com/downloads/{version}/advinst.msi")
}

/// Ensures a specific tool version is installed, licensed and registered
/// on a target host. Safe to call once per build; a second call with an
/// unchanged manifest finds the binary in place and skips download and
/// extraction.
pub struct ProvisioningManager {
    fetcher: Arc<dyn RemoteFetcher>,
}

impl ProvisioningManager {
    pub fn new(fetcher: Arc<dyn RemoteFetcher>) -> Self {
        Self { fetcher }
    }

    /// Make `manifest.version` available under `installation`'s home on
    /// `host` and return the absolute path of the command-line binary.
    pub async fn ensure_installed(
        &self,
        installation: &ToolInstallation,
        manifest: &ProvisioningManifest,
        host: &Arc<dyn HostExecutor>,
        sink: &dyn LogSink,
    ) -> AdvkitResult<PathBuf> {
        self.check_platform(host.as_ref()).await?;

        if installation.home().is_empty() {
            return Err(AdvkitError::Configuration(
                "installation has no home directory configured".to_string(),
            ));
        }
        let install_root = PathBuf::from(installation.home());
        let com_path = tool_com_path(&install_root);

        let up_to_date = host
            .path_exists(&com_path)
            .await
            .map_err(|e| AdvkitError::install_step("checking the installed binary", e))?;

        if up_to_date {
            debug!(path = %com_path.display(), "tool already installed");
        } else {
            self.install(manifest, &install_root, &com_path, host, sink)
                .await?;
        }

        self.register(manifest, &com_path, host.as_ref(), sink)
            .await?;
        Ok(com_path)
    }

    /// Reject hosts outside the supported OS family or below the minimum
    /// OS version.
    async fn check_platform(&self, host: &dyn HostExecutor) -> AdvkitResult<()> {
        let os_name = host
            .read_system_property("os.name")
            .await
            .map_err(|e| AdvkitError::install_step("querying the host OS", e))?;
        if !os_name.to_lowercase().contains("windows") {
            return Err(AdvkitError::UnsupportedPlatform(format!(
                "the packaging tool only runs on Windows, host reports \"{os_name}\""
            )));
        }

        let os_version = host
            .read_system_property("os.version")
            .await
            .map_err(|e| AdvkitError::install_step("querying the host OS version", e))?;
        let minimum = VersionNumber::parse(MIN_WINDOWS_VERSION);
        if minimum.is_newer_than(&VersionNumber::parse(&os_version)) {
            return Err(AdvkitError::UnsupportedPlatform(format!(
                "Windows {os_version} is below the minimum supported version {MIN_WINDOWS_VERSION}"
            )));
        }
        Ok(())
    }

    async fn install(
        &self,
        manifest: &ProvisioningManifest,
        install_root: &Path,
        com_path: &Path,
        host: &Arc<dyn HostExecutor>,
        sink: &dyn LogSink,
    ) -> AdvkitResult<()> {
        if manifest.version.is_empty() {
            return Err(AdvkitError::Configuration(
                "no tool version configured for provisioning".to_string(),
            ));
        }
        let url = resolve_download_url(manifest);
        info!(version = %manifest.version, url = %url, "installing packaging tool");
        sink.append_line(&format!(
            "Installing Advanced Installer {} from {} into {}",
            manifest.version,
            url,
            install_root.display()
        ));

        let temp_dir = host
            .create_temp_dir("advinst-dld")
            .await
            .map_err(|e| AdvkitError::install_step("creating the download directory", e))?;

        // Arm rollback of the install root before any bytes land; disarm
        // only after extraction has fully succeeded. The temp download
        // directory is removed regardless of outcome. Cleanup is
        // best-effort and never masks the primary error.
        let mut root_guard = CleanupGuard::new(Arc::clone(host), install_root.to_path_buf());
        let result = self
            .download_and_extract(&url, &temp_dir, install_root, com_path, host.as_ref(), sink)
            .await;
        if result.is_ok() {
            root_guard.disarm();
        } else {
            debug!(path = %install_root.display(), "rolling back install root");
        }
        let _ = root_guard.finish().await;
        let _ = CleanupGuard::new(Arc::clone(host), temp_dir).finish().await;
        result
    }

    async fn download_and_extract(
        &self,
        url: &str,
        temp_dir: &Path,
        install_root: &Path,
        com_path: &Path,
        host: &dyn HostExecutor,
        sink: &dyn LogSink,
    ) -> AdvkitResult<()> {
        let archive_path = temp_dir.join(DOWNLOAD_FILE_NAME);

        let bytes = self.fetcher.fetch_bytes(url).await.map_err(|e| {
            AdvkitError::install_step("downloading the distribution archive", e)
        })?;
        host.write_file(&archive_path, &bytes)
            .await
            .map_err(|e| AdvkitError::install_step("writing the distribution archive", e))?;

        sink.append_line(&format!(
            "Extracting {} into {}",
            archive_path.display(),
            install_root.display()
        ));
        let extract = ProcessSpec::new("msiexec.exe")
            .arg("/a")
            .arg(archive_path.display().to_string())
            .arg(format!("TARGETDIR={}", install_root.display()))
            .arg("/qn");
        let outcome = host
            .run_process(extract)
            .await
            .map_err(|e| AdvkitError::install_step("extracting the distribution archive", e))?;
        sink.append(&outcome.output);
        if !outcome.success() {
            return Err(AdvkitError::install_step(
                "extracting the distribution archive",
                format!("msiexec exited with code {}", outcome.exit_code),
            ));
        }

        let installed = host
            .path_exists(com_path)
            .await
            .map_err(|e| AdvkitError::install_step("verifying the installed binary", e))?;
        if !installed {
            return Err(AdvkitError::install_step(
                "verifying the installed binary",
                format!("{} not found after extraction", com_path.display()),
            ));
        }
        Ok(())
    }

    /// Run the tool's registration commands. Re-running either command on
    /// an already-registered install is harmless.
    async fn register(
        &self,
        manifest: &ProvisioningManifest,
        com_path: &Path,
        host: &dyn HostExecutor,
        sink: &dyn LogSink,
    ) -> AdvkitResult<()> {
        if let Some(license) = &manifest.license_key {
            let switch = self.register_switch(com_path, host).await;
            let spec = ProcessSpec::new(com_path)
                .arg(switch)
                .masked_arg(license.expose());
            sink.append_line(&spec.display_line());
            let outcome = host
                .run_process(spec)
                .await
                .map_err(|e| AdvkitError::install_step("registering the license", e))?;
            sink.append(&outcome.output);
            if !outcome.success() {
                return Err(AdvkitError::install_step(
                    "registering the license",
                    format!("{TOOL_COM} exited with code {}", outcome.exit_code),
                ));
            }
        }

        if manifest.register_com {
            let spec = ProcessSpec::new(com_path).arg("/REGSERVER");
            sink.append_line(&spec.display_line());
            let outcome = host
                .run_process(spec)
                .await
                .map_err(|e| AdvkitError::install_step("registering the COM server", e))?;
            sink.append(&outcome.output);
            if !outcome.success() {
                return Err(AdvkitError::install_step(
                    "registering the COM server",
                    format!("{TOOL_COM} exited with code {}", outcome.exit_code),
                ));
            }
        }
        Ok(())
    }

    /// Older binaries only understand `/Register`; newer ones expect
    /// `/RegisterCI`. When the file version cannot be read, assume a
    /// current binary.
    async fn register_switch(&self, com_path: &Path, host: &dyn HostExecutor) -> &'static str {
        let file_version = host.file_version(com_path).await.ok().flatten();
        let use_ci = file_version.is_none_or(|v| {
            let switch_over = VersionNumber::parse(REGISTER_CI_SWITCH_VERSION);
            !switch_over.is_newer_than(&VersionNumber::parse(&v))
        });
        if use_ci { "/RegisterCI" } else { "/Register" }
    }
}

/// Resolve where to download from: the environment override wins, then
/// the manifest's explicit URL, then the version-templated default.
fn resolve_download_url(manifest: &ProvisioningManifest) -> String {
    if let Ok(url) = std::env::var(DOWNLOAD_URL_ENV_OVERRIDE) {
        if !url.is_empty() {
            return url;
        }
    }
    manifest
        .download_url
        .clone()
        .unwrap_or_else(|| default_download_url(&manifest.version))
}
