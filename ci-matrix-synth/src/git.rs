//! Git working trees.

use crate::command::{run_command, CommandError};
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

/// A working tree whose checked-out branch can be switched.
///
/// The synthesis driver owns the tree for the duration of a repository's
/// processing; every checkout completes before discovery reads the tree.
pub trait WorkingTree {
    /// Root directory of the checked-out tree.
    fn path(&self) -> &Path;

    /// Switches the tree to `branch`.
    fn checkout(&mut self, branch: &str) -> impl Future<Output = Result<(), CommandError>> + Send;
}

/// A working tree backed by a local git clone.
#[derive(Debug, Clone)]
pub struct GitWorkingTree {
    path: PathBuf,
}

impl GitWorkingTree {
    /// Wraps an existing clone at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Mirrors the repository at `url` into `path` and checks out `branch`.
    ///
    /// `path` must be an existing, empty directory. A mirror clone fetches
    /// every branch, so later checkouts need no network access.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if any git command fails.
    pub async fn clone_mirror(url: &Url, path: &Path, branch: &str) -> Result<Self, CommandError> {
        info!(url = %url, path = %path.display(), "Cloning repository");

        let git_dir = path.join(".git").to_string_lossy().to_string();
        run_command(
            "git",
            &["clone", "--mirror", url.as_str(), git_dir.as_str()],
            path,
        )
        .await?;
        run_command("git", &["config", "--bool", "core.bare", "false"], path).await?;

        let mut tree = Self::open(path);
        tree.checkout(branch).await?;
        Ok(tree)
    }

    /// Runs `git <args>` in the tree.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if the command fails.
    pub async fn git(&self, args: &[&str]) -> Result<(), CommandError> {
        run_command("git", args, &self.path).await.map(|_| ())
    }
}

impl WorkingTree for GitWorkingTree {
    fn path(&self) -> &Path {
        &self.path
    }

    async fn checkout(&mut self, branch: &str) -> Result<(), CommandError> {
        debug!(path = %self.path.display(), branch, "Checking out branch");
        self.git(&["checkout", branch]).await
    }
}

/// Clone URL of `org/name` under `base`, e.g. `https://github.com/org/name.git`.
///
/// # Errors
///
/// Returns [`url::ParseError`] if the joined URL is invalid.
pub fn clone_url(base: &Url, full_name: &str) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(&format!("{full_name}.git"))
}
