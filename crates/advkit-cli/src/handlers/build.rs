//! `advkit build`: the full pipeline. Resolve the installation, make
//! sure the tool is present, read the project, compile the command
//! script and run it.

use std::sync::Arc;

use anyhow::{Context, bail};

use advkit_build::{AipReader, LocalHost, ScriptExecutor, compile, resolve};
use advkit_core::{
    BuildParameters, EnvVars, HostExecutor, InstallationRegistry, LicenseKey, ProvisioningManifest,
    StdoutSink, ToolInstallation,
};
use advkit_provision::{HttpFetcher, ProvisioningManager};

use crate::cli::BuildArgs;
use crate::job::JobFile;

pub async fn execute(args: BuildArgs) -> anyhow::Result<()> {
    let job = assemble_job(&args)?;

    let env = EnvVars::from_process_env().overlay(&parse_vars(&args.vars)?);
    let workspace = match args.workspace {
        Some(dir) => dir,
        None => std::env::current_dir().context("determining the working directory")?,
    };

    let registry = InstallationRegistry::new();
    registry.replace(job.installations);
    let installation = select_installation(&registry, &job.build.installation)?;

    let host: Arc<dyn HostExecutor> = Arc::new(LocalHost::new());
    let installation = installation
        .for_environment(&env)
        .for_host(host.as_ref())
        .await;

    let com_path = match &job.manifest {
        Some(manifest) => {
            let fetcher = Arc::new(HttpFetcher::new());
            super::warn_if_deprecated(fetcher.as_ref(), &manifest.version).await;
            ProvisioningManager::new(fetcher)
                .ensure_installed(&installation, manifest, &host, &StdoutSink)
                .await?
        }
        None => {
            let com_path = installation.tool_com_path();
            if !host.path_exists(&com_path).await? {
                bail!(
                    "installation \"{}\" has no tool at {}; pass --version to provision it",
                    installation.name(),
                    com_path.display()
                );
            }
            com_path
        }
    };

    let ctx = resolve(&job.build, &env, &workspace)?;
    if !host.path_exists(&ctx.aip_path).await? {
        bail!("project file not found: {}", ctx.aip_path.display());
    }
    let project = AipReader::load(host.as_ref(), &ctx.aip_path).await?;
    if !project.is_valid_project() {
        bail!(
            "{} is not an Advanced Installer project",
            ctx.aip_path.display()
        );
    }

    let script = compile(&ctx, &project)?;
    let result = ScriptExecutor::new()
        .run(
            &host,
            &com_path,
            &ctx.aip_path,
            &script,
            &workspace,
            &ctx.env,
            &StdoutSink,
        )
        .await?;
    if !result.success() {
        bail!("tool exited with code {}", result.exit_code);
    }
    Ok(())
}

/// Either the JSON job file, or an equivalent job assembled from flags.
fn assemble_job(args: &BuildArgs) -> anyhow::Result<JobFile> {
    if let Some(path) = &args.job {
        return JobFile::load(path);
    }

    // clap enforces presence of --aip and --home when --job is absent
    let (Some(aip), Some(home)) = (&args.aip, &args.home) else {
        bail!("either --job or both --aip and --home are required");
    };
    let build = BuildParameters::new(aip)
        .with_build_name(&args.build_name)
        .with_output_folder(&args.output_folder)
        .with_output_name(&args.output_name)
        .with_skip_digital_signature(args.skip_signing)
        .with_extra_commands(&args.extra_commands)
        .with_installation("default");
    let manifest = args.version.as_ref().map(|version| {
        let mut manifest = ProvisioningManifest::new(version);
        if let Some(key) = &args.license {
            manifest = manifest.with_license_key(LicenseKey::new(key));
        }
        manifest
    });
    Ok(JobFile {
        installations: vec![ToolInstallation::new("default", home)],
        build,
        manifest,
    })
}

fn select_installation(
    registry: &InstallationRegistry,
    name: &str,
) -> anyhow::Result<ToolInstallation> {
    if name.is_empty() {
        let mut snapshot = registry.snapshot();
        if snapshot.len() == 1 {
            return Ok(snapshot.remove(0));
        }
        bail!("the job does not say which tool installation to use");
    }
    registry
        .find(name)
        .with_context(|| format!("no tool installation named \"{name}\" is configured"))
}

/// Parse repeated `NAME=VALUE` flags into a variable set.
fn parse_vars(pairs: &[String]) -> anyhow::Result<EnvVars> {
    let mut vars = EnvVars::new();
    for pair in pairs {
        let Some((name, value)) = pair.split_once('=') else {
            bail!("--var takes NAME=VALUE, got \"{pair}\"");
        };
        vars.set(name, value);
    }
    Ok(vars)
}
