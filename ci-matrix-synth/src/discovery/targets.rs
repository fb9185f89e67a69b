//! Makefile test target discovery.

use crate::config::RepositorySpec;
use crate::discovery::DiscoveryError;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Build file scanned for test targets.
pub const MAKEFILE: &str = "Makefile";

/// Discovers the e2e test targets declared in the tree's root Makefile.
///
/// Order and duplicates follow the Makefile. A missing Makefile yields no
/// targets.
///
/// # Errors
///
/// Returns [`DiscoveryError::IoError`] if the Makefile exists but cannot be read.
pub fn discover_test_targets(
    tree: &Path,
    spec: &RepositorySpec,
) -> Result<Vec<String>, DiscoveryError> {
    let path = tree.join(MAKEFILE);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No Makefile, skipping test discovery");
            return Ok(Vec::new());
        }
        Err(e) => return Err(DiscoveryError::IoError { path, source: e }),
    };

    let candidates = candidate_lines(&content);
    debug!(?candidates, "Candidate test targets");

    Ok(filter_targets(spec, candidates))
}

/// Lines mentioning `test` followed somewhere later by a colon.
fn candidate_lines(content: &str) -> Vec<&str> {
    content
        .lines()
        .filter(|line| {
            line.find("test")
                .is_some_and(|start| line[start + "test".len()..].contains(':'))
        })
        .collect()
}

/// Strips the rule suffix and keeps the candidates matching the repository's e2e patterns.
fn filter_targets(spec: &RepositorySpec, candidates: Vec<&str>) -> Vec<String> {
    candidates
        .into_iter()
        .map(clean_target)
        .filter(|target| !target.is_empty())
        .filter(|target| spec.is_e2e_target(target))
        .map(str::to_string)
        .collect()
}

/// Strips trailing tabs, then spaces, then colons.
fn clean_target(line: &str) -> &str {
    line.trim_end_matches('\t')
        .trim_end_matches(' ')
        .trim_end_matches(':')
}
