//! `advkit check-updates`: report what the vendor feed says.

use advkit_provision::{HttpFetcher, UPDATES_FEED_URL, VersionPolicy};

use crate::cli::CheckUpdatesArgs;

pub async fn execute(args: CheckUpdatesArgs) -> anyhow::Result<()> {
    let fetcher = HttpFetcher::new();
    let policy = VersionPolicy::fetch_from(&fetcher, UPDATES_FEED_URL, args.window_months).await;

    if policy.allowed().is_empty() {
        println!("Release feed unavailable or empty; no version is deprecated.");
        return Ok(());
    }

    println!("Versions inside the {}-month window:", args.window_months);
    for entry in policy.allowed() {
        println!("  {}  (released {})", entry.product_version, entry.release_date);
    }
    if let Some(minimum) = policy.minimum_allowed_version() {
        println!("Oldest still-supported version: {minimum}");
    }

    if let Some(version) = args.version {
        if policy.is_deprecated(&version) {
            println!("Version {version} is deprecated.");
        } else {
            println!("Version {version} is supported.");
        }
    }
    Ok(())
}
