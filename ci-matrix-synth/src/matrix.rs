//! Repository × branch × platform-version matrix expansion.

use crate::config::{BranchVersionTable, RepositorySpec, Settings};
use crate::naming::variant;

/// One (repository, branch, platform-version) combination to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixCell {
    /// Repository organization.
    pub org: String,

    /// Repository short name.
    pub repo: String,

    /// Branch the manifest is generated for.
    pub branch: String,

    /// Platform version of this cell.
    pub version: String,

    /// Newest platform version declared for the branch.
    pub max_version: String,

    /// Name images of this branch are promoted under.
    pub promotion_alias: String,
}

impl MatrixCell {
    /// Whether promotion is disabled; only the branch's newest version promotes.
    #[must_use]
    pub fn disabled(&self) -> bool {
        self.version != self.max_version
    }

    /// Version with its dots removed, used in job and file names.
    #[must_use]
    pub fn variant(&self) -> String {
        variant(&self.version)
    }
}

/// The branch table and cells generated for one repository.
#[derive(Debug, Clone)]
pub struct Matrix {
    /// Default branches merged with the repository's additional branches.
    pub branches: BranchVersionTable,

    /// Cells in generation order.
    pub cells: Vec<MatrixCell>,
}

impl Matrix {
    /// Cells belonging to `branch`, in generation order.
    pub fn cells_for<'a>(&'a self, branch: &'a str) -> impl Iterator<Item = &'a MatrixCell> + 'a {
        self.cells.iter().filter(move |cell| cell.branch == branch)
    }
}

/// Expands the matrix for a repository.
///
/// The repository's additional branches are merged into a copy of
/// `defaults`. Each branch contributes its `min` cell followed by its `max`
/// cell, in table order.
#[must_use]
pub fn expand(spec: &RepositorySpec, defaults: &BranchVersionTable, settings: &Settings) -> Matrix {
    let branches = defaults.merge(spec.additional_branches());

    let cells = branches
        .iter()
        .flat_map(|(branch, range)| {
            let alias = promotion_alias(branch, settings);
            range.endpoints().map(|version| MatrixCell {
                org: spec.org().to_string(),
                repo: spec.repo().to_string(),
                branch: branch.to_string(),
                version: version.to_string(),
                max_version: range.max.clone(),
                promotion_alias: alias.clone(),
            })
        })
        .collect();

    Matrix { branches, cells }
}

/// Name images of `branch` are promoted under.
///
/// The floating branch maps to the nightly alias; other branches replace
/// `release` with `knative` (`release-v1.5` becomes `knative-v1.5`).
#[must_use]
pub fn promotion_alias(branch: &str, settings: &Settings) -> String {
    if branch == settings.floating_branch {
        settings.nightly_alias.clone()
    } else {
        branch.replace("release", "knative")
    }
}
