//! Release feed and version-deprecation policy.
//!
//! The vendor publishes an INI-sectioned feed of releases, one section
//! per release with `ProductVersion` and `ReleaseDate` (day/month/year)
//! fields, ordered newest-first. A release is allowed while its date is
//! inside the trailing recency window; the last retained row is therefore
//! the oldest version still allowed. A feed that cannot be fetched or
//! parsed yields an empty policy that allows everything, so deprecation
//! checking never blocks provisioning.

use chrono::{Months, NaiveDate, Utc};
use tracing::{debug, warn};

use advkit_core::VersionNumber;

use crate::fetch::RemoteFetcher;

/// Where the vendor publishes the release feed.
pub const UPDATES_FEED_URL: &str = "https://www.advancedinstaller.com/downloads/updates.ini";

/// Default trailing window within which a release is still current.
pub const DEFAULT_RECENCY_WINDOW_MONTHS: u32 = 24;

const FEED_DATE_FORMAT: &str = "%d/%m/%Y";

/// One row of the release feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseEntry {
    pub product_version: String,
    pub release_date: NaiveDate,
}

/// The set of releases still inside the recency window.
#[derive(Debug, Clone, Default)]
pub struct VersionPolicy {
    allowed: Vec<ReleaseEntry>,
}

impl VersionPolicy {
    /// Fetch the vendor feed with the default URL and window.
    pub async fn fetch(fetcher: &dyn RemoteFetcher) -> Self {
        Self::fetch_from(fetcher, UPDATES_FEED_URL, DEFAULT_RECENCY_WINDOW_MONTHS).await
    }

    /// Fetch a feed from `url`, keeping entries inside `window_months`.
    /// Network or parse failure degrades to an empty policy.
    pub async fn fetch_from(fetcher: &dyn RemoteFetcher, url: &str, window_months: u32) -> Self {
        match fetcher.fetch_bytes(url).await {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes);
                Self::from_feed_text(&text, Utc::now().date_naive(), window_months)
            }
            Err(e) => {
                warn!("Could not fetch release feed from {url}: {e}; allowing all versions");
                Self::default()
            }
        }
    }

    /// Build a policy from raw feed text. Entries whose release date is on
    /// or after `now - window_months` are retained, in feed order.
    pub fn from_feed_text(text: &str, now: NaiveDate, window_months: u32) -> Self {
        let Some(cutoff) = now.checked_sub_months(Months::new(window_months)) else {
            return Self::default();
        };

        let allowed = parse_feed(text)
            .into_iter()
            .filter(|entry| entry.release_date >= cutoff)
            .collect::<Vec<_>>();
        debug!(
            retained = allowed.len(),
            cutoff = %cutoff,
            "release feed filtered"
        );
        Self { allowed }
    }

    /// Retained releases, in feed order (newest first).
    pub fn allowed(&self) -> &[ReleaseEntry] {
        &self.allowed
    }

    /// The oldest version still inside the window; `None` when the feed
    /// is empty (no enforcement).
    pub fn minimum_allowed_version(&self) -> Option<&str> {
        self.allowed
            .last()
            .map(|entry| entry.product_version.as_str())
    }

    /// True iff the minimum allowed version is strictly newer than
    /// `version`. With an empty feed nothing is deprecated.
    pub fn is_deprecated(&self, version: &str) -> bool {
        self.minimum_allowed_version().is_some_and(|minimum| {
            VersionNumber::parse(minimum).is_newer_than(&VersionNumber::parse(version))
        })
    }
}

/// Parse the INI-sectioned feed. Sections keep feed order; rows missing
/// either field are skipped.
fn parse_feed(text: &str) -> Vec<ReleaseEntry> {
    let mut entries = Vec::new();
    let mut version: Option<String> = None;
    let mut date: Option<NaiveDate> = None;

    let mut flush = |version: &mut Option<String>, date: &mut Option<NaiveDate>| {
        let (v, d) = (version.take(), date.take());
        if let (Some(v), Some(d)) = (v, d) {
            entries.push(ReleaseEntry {
                product_version: v,
                release_date: d,
            });
        }
    };

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') {
            flush(&mut version, &mut date);
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim();
            match key.trim() {
                "ProductVersion" => version = Some(value.to_string()),
                "ReleaseDate" => {
                    date = NaiveDate::parse_from_str(value, FEED_DATE_FORMAT).ok();
                }
                _ => {}
            }
        }
    }
    flush(&mut version, &mut date);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const FEED: &str = "\
[19.0]
ProductVersion = 10.0
ReleaseDate = 01/01/2024

[18.0]
ProductVersion = 9.0
ReleaseDate = 01/01/2020
";

    #[test]
    fn window_keeps_only_recent_entries() {
        // 24 months back from 01/06/2024 cuts off everything before 01/06/2022
        let policy = VersionPolicy::from_feed_text(FEED, date(2024, 6, 1), 24);
        assert_eq!(policy.minimum_allowed_version(), Some("10.0"));
        assert!(policy.is_deprecated("9.0"));
        assert!(!policy.is_deprecated("10.0"));
    }

    #[test]
    fn empty_feed_allows_everything() {
        let policy = VersionPolicy::from_feed_text("", date(2024, 6, 1), 24);
        assert_eq!(policy.minimum_allowed_version(), None);
        assert!(!policy.is_deprecated("1.0"));
    }

    #[test]
    fn last_retained_entry_is_the_minimum() {
        let feed = "\
[a]
ProductVersion = 12.0
ReleaseDate = 01/05/2024
[b]
ProductVersion = 11.0
ReleaseDate = 01/01/2024
[c]
ProductVersion = 10.0
ReleaseDate = 01/06/2023
";
        let policy = VersionPolicy::from_feed_text(feed, date(2024, 6, 1), 24);
        assert_eq!(policy.minimum_allowed_version(), Some("10.0"));
    }

    #[test]
    fn deprecation_is_monotonic() {
        let policy = VersionPolicy::from_feed_text(FEED, date(2024, 6, 1), 24);
        // is_deprecated("9.5") holds, so every older version is deprecated too
        for older in ["9.4", "9.0", "8.99", "1.0"] {
            assert!(policy.is_deprecated(older), "{older} should be deprecated");
        }
    }

    #[test]
    fn rows_missing_fields_are_skipped() {
        let feed = "\
[broken]
ProductVersion = 13.0
[ok]
ProductVersion = 12.5
ReleaseDate = 02/6/2024
";
        let policy = VersionPolicy::from_feed_text(feed, date(2024, 6, 3), 24);
        assert_eq!(policy.minimum_allowed_version(), Some("12.5"));
    }
}
