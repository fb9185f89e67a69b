//! Per-repository synthesis results.

/// What was generated for a single repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryResult {
    /// Repository full name.
    pub repository: String,

    /// Manifests written, one per matrix cell.
    pub cells_generated: usize,

    /// Stale manifests removed before regeneration.
    pub stale_manifests_removed: usize,

    /// Mirroring mapping files written, one per branch.
    pub mapping_files_written: usize,
}
