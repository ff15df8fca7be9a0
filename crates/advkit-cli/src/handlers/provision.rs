//! `advkit provision`: make a tool version available on this host.

use std::sync::Arc;

use advkit_build::LocalHost;
use advkit_core::{
    EnvVars, HostExecutor, LicenseKey, ProvisioningManifest, StdoutSink, ToolInstallation,
};
use advkit_provision::{HttpFetcher, ProvisioningManager};

use crate::cli::ProvisionArgs;

pub async fn execute(args: ProvisionArgs) -> anyhow::Result<()> {
    let env = EnvVars::from_process_env();
    let installation = ToolInstallation::new("default", args.home).for_environment(&env);

    let mut manifest = ProvisioningManifest::new(args.version).with_register_com(args.register_com);
    if let Some(key) = args.license {
        manifest = manifest.with_license_key(LicenseKey::new(key));
    }
    if let Some(url) = args.download_url {
        manifest = manifest.with_download_url(url);
    }

    let fetcher = Arc::new(HttpFetcher::new());
    super::warn_if_deprecated(fetcher.as_ref(), &manifest.version).await;

    let host: Arc<dyn HostExecutor> = Arc::new(LocalHost::new());
    let com_path = ProvisioningManager::new(fetcher)
        .ensure_installed(&installation, &manifest, &host, &StdoutSink)
        .await?;
    println!("Tool ready at {}", com_path.display());
    Ok(())
}
