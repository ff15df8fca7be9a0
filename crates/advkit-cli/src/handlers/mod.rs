//! Command handlers. Each submodule owns one subcommand end to end.

pub mod build;
pub mod check_updates;
pub mod provision;

use advkit_provision::{RemoteFetcher, VersionPolicy};
use tracing::warn;

/// Non-blocking deprecation check: warn and move on. A feed that cannot
/// be fetched allows everything.
pub(crate) async fn warn_if_deprecated(fetcher: &dyn RemoteFetcher, version: &str) {
    let policy = VersionPolicy::fetch(fetcher).await;
    if policy.is_deprecated(version) {
        let minimum = policy.minimum_allowed_version().unwrap_or("unknown");
        warn!(version, minimum, "tool version is deprecated");
        println!(
            "Warning: Advanced Installer {version} is deprecated; \
             the oldest still-supported version is {minimum}."
        );
    }
}
