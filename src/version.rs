//! Total-order version comparison over arbitrary registry tags
//!
//! Release tags parse through semver and order by the usual rules
//! (segment-wise numeric comparison, pre-release < release). Tags that do
//! not parse — build hashes, date stamps, whatever a registry publishes —
//! fall back to an opaque string compared byte-wise, so every pair of tags
//! has a stable, transitive ordering and comparison never fails.

use std::cmp::Ordering;
use std::fmt;

/// A version tag normalized into a totally ordered value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparableVersion {
    /// Parsed as a conventional release version
    Release(semver::Version),
    /// Did not parse; ordered by raw string comparison
    Opaque(String),
}

impl ComparableVersion {
    /// Parse a tag string into a comparable value. Never fails.
    ///
    /// A single leading `v` is stripped, and short numeric forms are padded
    /// (`1.2` parses as `1.2.0`) so conventional tags still order
    /// numerically.
    pub fn parse(tag: &str) -> Self {
        let trimmed = tag.trim();
        let stripped = trimmed.strip_prefix('v').unwrap_or(trimmed);

        if let Ok(v) = semver::Version::parse(stripped) {
            return ComparableVersion::Release(v);
        }
        if let Some(v) = parse_padded(stripped) {
            return ComparableVersion::Release(v);
        }
        ComparableVersion::Opaque(trimmed.to_string())
    }

    /// Whether this parsed as a conventional release version
    pub fn is_release(&self) -> bool {
        matches!(self, ComparableVersion::Release(_))
    }
}

/// Pad one- or two-segment numeric cores (`1`, `1.2`) to full semver,
/// keeping any pre-release/build suffix intact.
fn parse_padded(s: &str) -> Option<semver::Version> {
    let split_at = s.find(['-', '+']).unwrap_or(s.len());
    let (core, suffix) = s.split_at(split_at);

    let segments: Vec<&str> = core.split('.').collect();
    if segments.len() > 2
        || segments
            .iter()
            .any(|seg| seg.is_empty() || !seg.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    let padded = match segments.len() {
        1 => format!("{}.0.0{}", core, suffix),
        2 => format!("{}.0{}", core, suffix),
        _ => return None,
    };
    semver::Version::parse(&padded).ok()
}

impl Ord for ComparableVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        use ComparableVersion::{Opaque, Release};
        match (self, other) {
            (Release(a), Release(b)) => a.cmp(b),
            (Opaque(a), Opaque(b)) => a.cmp(b),
            // Conventional releases outrank opaque tags
            (Release(_), Opaque(_)) => Ordering::Greater,
            (Opaque(_), Release(_)) => Ordering::Less,
        }
    }
}

impl PartialOrd for ComparableVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ComparableVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparableVersion::Release(v) => write!(f, "{}", v),
            ComparableVersion::Opaque(s) => write!(f, "{}", s),
        }
    }
}
