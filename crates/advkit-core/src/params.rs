//! Build parameters as supplied by the caller, and their resolved form.
//!
//! `BuildParameters` fields are raw template values: any of them may
//! contain `${VAR}` macros and relative paths. The script compiler turns
//! them into a `ResolvedBuildContext` where every macro is expanded and
//! every path is absolute (or explicitly unset). Both types are immutable
//! once constructed.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::envvars::EnvVars;

/// Unresolved, user-supplied build parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildParameters {
    /// Path to the project file, absolute or workspace-relative.
    pub aip_path: String,
    /// Build configuration to run; empty means "all configurations".
    #[serde(default)]
    pub build_name: String,
    /// Output folder for the result package; empty means tool default.
    #[serde(default)]
    pub output_folder: String,
    /// File name of the result package; empty means tool default.
    #[serde(default)]
    pub output_name: String,
    /// Skip the digital signature step.
    #[serde(default)]
    pub skip_digital_signature: bool,
    /// Free-form extra tool commands, one per line, passed through verbatim.
    #[serde(default)]
    pub extra_commands: String,
    /// Name of the tool installation to build with.
    #[serde(default)]
    pub installation: String,
}

impl BuildParameters {
    /// Create parameters with the required project path.
    pub fn new(aip_path: impl Into<String>) -> Self {
        Self {
            aip_path: aip_path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_build_name(mut self, name: impl Into<String>) -> Self {
        self.build_name = name.into();
        self
    }

    #[must_use]
    pub fn with_output_folder(mut self, folder: impl Into<String>) -> Self {
        self.output_folder = folder.into();
        self
    }

    #[must_use]
    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = name.into();
        self
    }

    #[must_use]
    pub const fn with_skip_digital_signature(mut self, skip: bool) -> Self {
        self.skip_digital_signature = skip;
        self
    }

    #[must_use]
    pub fn with_extra_commands(mut self, commands: impl Into<String>) -> Self {
        self.extra_commands = commands.into();
        self
    }

    #[must_use]
    pub fn with_installation(mut self, name: impl Into<String>) -> Self {
        self.installation = name.into();
        self
    }
}

/// Macro-expanded, absolute-path build parameters plus the environment
/// snapshot they were resolved against.
///
/// Invariant: no field contains an unexpanded macro the environment could
/// have resolved; `aip_path` and `output_folder` are absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBuildContext {
    pub aip_path: PathBuf,
    pub build_name: String,
    pub output_folder: Option<PathBuf>,
    pub output_name: String,
    pub skip_digital_signature: bool,
    /// Non-blank extra command lines, original order preserved.
    pub extra_commands: Vec<String>,
    /// The snapshot used for resolution, kept for the executor's process
    /// environment.
    pub env: EnvVars,
}
