//! Tool provisioning lifecycle.
//!
//! Makes a specific version of the packaging tool available, licensed and
//! ready to run on a target host: OS gating, download, archive
//! extraction, license registration and version-deprecation policy.
//! Idempotent per host; partial installs are rolled back.

pub mod fetch;
pub mod installer;
pub mod versions;

pub use fetch::{FetchError, HttpFetcher, RemoteFetcher};
pub use installer::{DOWNLOAD_URL_ENV_OVERRIDE, ProvisioningManager};
pub use versions::{
    DEFAULT_RECENCY_WINDOW_MONTHS, ReleaseEntry, UPDATES_FEED_URL, VersionPolicy,
};
