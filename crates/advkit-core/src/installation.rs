//! Tool installation references and the process-wide registry.
//!
//! A `ToolInstallation` names a tool home directory. The home is symbolic
//! until specialized: `for_environment` expands macros against a variable
//! set, `for_host` expands them against the target host's own properties.
//! Both return a new instance; an installation is never mutated.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::envvars::EnvVars;
use crate::ports::HostExecutor;
use crate::tool;

/// A named reference to a tool home directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInstallation {
    name: String,
    home: String,
    #[serde(default)]
    properties: Vec<(String, String)>,
}

impl ToolInstallation {
    pub fn new(name: impl Into<String>, home: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            home: home.into(),
            properties: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_properties(mut self, properties: Vec<(String, String)>) -> Self {
        self.properties = properties;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn home(&self) -> &str {
        &self.home
    }

    pub fn properties(&self) -> &[(String, String)] {
        &self.properties
    }

    /// Host-local path of the command-line binary under this home.
    pub fn tool_com_path(&self) -> PathBuf {
        tool::tool_com_path(Path::new(&self.home))
    }

    /// Derive a copy with macros in the home expanded against `env`.
    #[must_use]
    pub fn for_environment(&self, env: &EnvVars) -> Self {
        Self {
            name: self.name.clone(),
            home: env.expand(&self.home),
            properties: self.properties.clone(),
        }
    }

    /// Derive a copy with macros in the home expanded against the target
    /// host's system properties. Properties the host cannot answer stay
    /// verbatim.
    pub async fn for_host(&self, host: &dyn HostExecutor) -> Self {
        let mut vars = EnvVars::new();
        for name in EnvVars::macro_names(&self.home) {
            if let Ok(value) = host.read_system_property(&name).await {
                vars.set(name, value);
            }
        }
        self.for_environment(&vars)
    }
}

/// Process-wide, copy-on-write list of configured installations.
///
/// Readers get a snapshot, never the live backing storage. Writers
/// replace the whole collection atomically under the single lock.
#[derive(Debug, Default)]
pub struct InstallationRegistry {
    installations: RwLock<Vec<ToolInstallation>>,
}

impl InstallationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// An owned copy of the current collection.
    pub fn snapshot(&self) -> Vec<ToolInstallation> {
        self.installations
            .read()
            .map(|list| list.clone())
            .unwrap_or_default()
    }

    /// Replace the whole collection. The single mutation point.
    pub fn replace(&self, installations: Vec<ToolInstallation>) {
        if let Ok(mut list) = self.installations.write() {
            *list = installations;
        }
    }

    pub fn find(&self, name: &str) -> Option<ToolInstallation> {
        self.installations
            .read()
            .ok()
            .and_then(|list| list.iter().find(|i| i.name() == name).cloned())
    }
}
