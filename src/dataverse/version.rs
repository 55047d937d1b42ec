use super::model::{DatasetVersion, VersionState};
use std::collections::HashSet;

/// `(major, minor)` pair; the derived ordering compares major first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionNumber {
    pub major: u32,
    pub minor: u32,
}

impl VersionNumber {
    pub const FIRST: VersionNumber = VersionNumber { major: 1, minor: 0 };

    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// True for every version after 1.0; those must agree with their
    /// published predecessors.
    pub fn follows_first(self) -> bool {
        self > Self::FIRST
    }
}

impl std::fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Keeps released and deaccessioned versions, newest first.
pub fn released_or_deaccessioned(versions: Vec<DatasetVersion>) -> Vec<DatasetVersion> {
    let mut kept: Vec<DatasetVersion> = versions
        .into_iter()
        .filter(|v| {
            matches!(
                v.version_state,
                VersionState::Released | VersionState::Deaccessioned
            )
        })
        .collect();
    kept.sort_by(|a, b| b.version().cmp(&a.version()));
    kept
}

/// First version number that occurs more than once, if any.
pub fn find_duplicate_version(versions: &[DatasetVersion]) -> Option<VersionNumber> {
    let mut seen = HashSet::new();
    versions
        .iter()
        .map(DatasetVersion::version)
        .find(|version| !seen.insert(*version))
}
