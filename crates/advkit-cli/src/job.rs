//! JSON job file: everything a pipeline step needs in one document.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use advkit_core::{BuildParameters, ProvisioningManifest, ToolInstallation};

/// A build job as checked into the pipeline: the configured tool
/// installations, the build parameters and an optional provisioning
/// manifest for hosts that do not have the tool yet.
#[derive(Debug, Deserialize)]
pub struct JobFile {
    #[serde(default)]
    pub installations: Vec<ToolInstallation>,
    pub build: BuildParameters,
    #[serde(default)]
    pub manifest: Option<ProvisioningManifest>,
}

impl JobFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading job file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing job file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_job_document() {
        let json = r#"{
            "installations": [
                {"name": "default", "home": "${CI_TOOLS}/advinst"}
            ],
            "build": {
                "aip_path": "installer/demo.aip",
                "build_name": "Release",
                "output_folder": "dist",
                "skip_digital_signature": true,
                "installation": "default"
            },
            "manifest": {"version": "22.9", "register_com": false}
        }"#;
        let job: JobFile = serde_json::from_str(json).unwrap();
        assert_eq!(job.installations.len(), 1);
        assert_eq!(job.build.build_name, "Release");
        assert!(job.build.skip_digital_signature);
        assert_eq!(job.manifest.unwrap().version, "22.9");
    }

    #[test]
    fn minimal_job_needs_only_the_project_path() {
        let json = r#"{"build": {"aip_path": "demo.aip"}}"#;
        let job: JobFile = serde_json::from_str(json).unwrap();
        assert!(job.installations.is_empty());
        assert!(job.manifest.is_none());
        assert_eq!(job.build.aip_path, "demo.aip");
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = JobFile::load(Path::new("/no/such/job.json")).unwrap_err();
        assert!(err.to_string().contains("/no/such/job.json"));
    }
}
