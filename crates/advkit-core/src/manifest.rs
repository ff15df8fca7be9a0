//! Provisioning manifest: what one provisioning run should produce.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A license secret. `Debug` is redacted; the raw value is only
/// reachable through [`LicenseKey::expose`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LicenseKey(String);

impl LicenseKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw secret, for handing to the registration process.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LicenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LicenseKey(******)")
    }
}

impl From<String> for LicenseKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Drives a single provisioning run for one tool version on one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningManifest {
    /// Tool version to make available, e.g. "22.9".
    pub version: String,
    /// License to register after install; `None` leaves the tool in
    /// trial mode.
    #[serde(default)]
    pub license_key: Option<LicenseKey>,
    /// Also run the COM registration command after install.
    #[serde(default)]
    pub register_com: bool,
    /// Explicit download URL, overriding the version-templated default.
    #[serde(default)]
    pub download_url: Option<String>,
}

impl ProvisioningManifest {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            license_key: None,
            register_com: false,
            download_url: None,
        }
    }

    #[must_use]
    pub fn with_license_key(mut self, key: LicenseKey) -> Self {
        self.license_key = Some(key);
        self
    }

    #[must_use]
    pub const fn with_register_com(mut self, register: bool) -> Self {
        self.register_com = register;
        self
    }

    #[must_use]
    pub fn with_download_url(mut self, url: impl Into<String>) -> Self {
        self.download_url = Some(url.into());
        self
    }
}
