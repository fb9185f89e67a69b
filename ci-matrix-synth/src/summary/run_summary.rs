//! Run summary types.

use super::result::RepositoryResult;
use crate::publish::PublishStatus;

/// Summary of a complete run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of repositories processed.
    pub repositories_processed: usize,

    /// Number of manifests generated.
    pub cells_generated: usize,

    /// Number of stale manifests removed.
    pub stale_manifests_removed: usize,

    /// Number of mirroring mapping files written.
    pub mapping_files_written: usize,

    /// Number of periodic job files patched with a Slack reporter.
    pub reporters_injected: usize,

    /// Outcome of publishing, if it ran.
    pub publish: Option<PublishStatus>,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the summary with a repository result.
    pub fn record_repository(&mut self, result: &RepositoryResult) {
        self.repositories_processed += 1;
        self.cells_generated += result.cells_generated;
        self.stale_manifests_removed += result.stale_manifests_removed;
        self.mapping_files_written += result.mapping_files_written;
    }
}
