//! Branch to platform-version tables.

use serde::Deserialize;

/// The declared platform-version endpoints of a branch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionRange {
    /// Oldest supported platform version (e.g. "4.8").
    pub min: String,

    /// Newest supported platform version (e.g. "4.11").
    pub max: String,
}

impl VersionRange {
    /// Creates a range from its two endpoints.
    pub fn new(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Returns the generation endpoints, always `[min, max]`.
    ///
    /// Endpoints are not compared numerically; a range declared with the
    /// newer version as `min` still yields `min` first.
    #[must_use]
    pub fn endpoints(&self) -> [&str; 2] {
        [&self.min, &self.max]
    }
}

/// A single `[[branches]]` entry as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BranchEntry {
    /// Branch name (e.g. "release-v1.5").
    pub name: String,

    /// Oldest supported platform version.
    pub min: String,

    /// Newest supported platform version.
    pub max: String,
}

/// Ordered mapping from branch name to its [`VersionRange`].
///
/// Iteration follows declaration order. Inserting an existing branch
/// replaces its range in place; new branches are appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<BranchEntry>")]
pub struct BranchVersionTable {
    entries: Vec<(String, VersionRange)>,
}

impl From<Vec<BranchEntry>> for BranchVersionTable {
    fn from(entries: Vec<BranchEntry>) -> Self {
        let mut table = Self::default();
        for entry in entries {
            table.insert(entry.name, VersionRange::new(entry.min, entry.max));
        }
        table
    }
}

impl BranchVersionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the range for `branch`.
    pub fn insert(&mut self, branch: impl Into<String>, range: VersionRange) {
        let branch = branch.into();
        match self.entries.iter_mut().find(|(name, _)| *name == branch) {
            Some((_, existing)) => *existing = range,
            None => self.entries.push((branch, range)),
        }
    }

    /// Returns the range declared for `branch`.
    #[must_use]
    pub fn get(&self, branch: &str) -> Option<&VersionRange> {
        self.entries
            .iter()
            .find(|(name, _)| name == branch)
            .map(|(_, range)| range)
    }

    /// Iterates over `(branch, range)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VersionRange)> {
        self.entries
            .iter()
            .map(|(name, range)| (name.as_str(), range))
    }

    /// Iterates over branch names in declaration order.
    pub fn branches(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Number of branches in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no branches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a copy of this table with `overrides` layered on top.
    ///
    /// `self` is left untouched.
    #[must_use]
    pub fn merge(&self, overrides: &BranchVersionTable) -> BranchVersionTable {
        let mut merged = self.clone();
        for (branch, range) in overrides.iter() {
            merged.insert(branch, range.clone());
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> BranchVersionTable {
        let mut table = BranchVersionTable::new();
        table.insert("release-v1.4", VersionRange::new("4.6", "4.11"));
        table.insert("release-v1.5", VersionRange::new("4.8", "4.11"));
        table.insert("release-next", VersionRange::new("4.8", "4.11"));
        table
    }

    #[test]
    fn merge_keeps_every_key_and_prefers_overrides() {
        let base = defaults();
        let mut overrides = BranchVersionTable::new();
        overrides.insert("release-v1.5", VersionRange::new("4.9", "4.12"));
        overrides.insert("release-v1.6", VersionRange::new("4.8", "4.11"));

        let merged = base.merge(&overrides);

        let branches: Vec<_> = merged.branches().collect();
        assert_eq!(
            branches,
            ["release-v1.4", "release-v1.5", "release-next", "release-v1.6"]
        );
        assert_eq!(
            merged.get("release-v1.5"),
            Some(&VersionRange::new("4.9", "4.12"))
        );
        assert_eq!(
            merged.get("release-v1.4"),
            Some(&VersionRange::new("4.6", "4.11"))
        );
    }

    #[test]
    fn merge_leaves_base_untouched() {
        let base = defaults();
        let before = base.clone();
        let mut overrides = BranchVersionTable::new();
        overrides.insert("release-v1.4", VersionRange::new("4.10", "4.12"));

        let _ = base.merge(&overrides);

        assert_eq!(base, before);
    }

    #[test]
    fn merge_with_empty_overrides_is_identity() {
        let base = defaults();
        assert_eq!(base.merge(&BranchVersionTable::new()), base);
    }

    #[test]
    fn endpoints_follow_declaration_order() {
        let range = VersionRange::new("4.11", "4.8");
        assert_eq!(range.endpoints(), ["4.11", "4.8"]);
    }

    #[test]
    fn duplicate_entries_keep_first_position() {
        let table = BranchVersionTable::from(vec![
            BranchEntry {
                name: "a".to_string(),
                min: "1".to_string(),
                max: "2".to_string(),
            },
            BranchEntry {
                name: "b".to_string(),
                min: "1".to_string(),
                max: "2".to_string(),
            },
            BranchEntry {
                name: "a".to_string(),
                min: "3".to_string(),
                max: "4".to_string(),
            },
        ]);

        let branches: Vec<_> = table.branches().collect();
        assert_eq!(branches, ["a", "b"]);
        assert_eq!(table.get("a"), Some(&VersionRange::new("3", "4")));
    }
}
