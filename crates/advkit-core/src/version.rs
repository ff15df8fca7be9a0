//! Dot-separated numeric version comparison.
//!
//! The packaging tool versions its releases as plain numeric tuples
//! ("14.6", "22.9.1"). Comparison is left-to-right over the numeric
//! components with missing components treated as zero. Pre-release tags
//! are not part of the scheme; trailing non-digit text in a component is
//! ignored rather than rejected.

use std::cmp::Ordering;
use std::fmt;

/// An ordered tool version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionNumber {
    components: Vec<u64>,
    raw: String,
}

impl VersionNumber {
    /// Parse a version string. Tolerant: each dot-separated component
    /// contributes its leading digits, anything unparsable counts as zero.
    pub fn parse(raw: &str) -> Self {
        let components = raw
            .trim()
            .trim_start_matches('v')
            .split('.')
            .map(|part| {
                let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
                digits.parse().unwrap_or(0)
            })
            .collect();
        Self {
            components,
            raw: raw.trim().to_string(),
        }
    }

    /// True iff `self` sorts strictly after `other`.
    pub fn is_newer_than(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Greater
    }

    /// The original version text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Ord for VersionNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for i in 0..len {
            let a = self.components.get(i).copied().unwrap_or(0);
            let b = other.components.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for VersionNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
