//! Run summary types.

mod result;
mod run_summary;

pub use result::RepositoryResult;
pub use run_summary::RunSummary;
