//! Slack reporter injection into generated periodic jobs.
//!
//! The orchestration repository's tooling generates Prow job files from the
//! rendered manifests. Periodic job files are then patched textually: every
//! agent marker line is replaced by a block that reports job results to the
//! repository's Slack channel.

mod error;
mod renderer;

pub use error::ReporterError;
pub use renderer::{
    create_handlebars_registry, ReporterRenderer, AGENT_MARKER, REPORTED_JOB_STATES,
    SLACK_REPORT_TEMPLATE,
};

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Injects the reporter block for `channel` into every periodic job file in `jobs_dir`.
///
/// Returns the number of files that contained the marker. A missing jobs
/// directory patches nothing.
///
/// # Errors
///
/// Returns [`ReporterError`] if rendering fails or a job file cannot be
/// read or written.
pub fn inject_reporter(
    renderer: &ReporterRenderer,
    jobs_dir: &Path,
    channel: &str,
) -> Result<usize, ReporterError> {
    let files = periodic_job_files(jobs_dir)?;
    if files.is_empty() {
        warn!(dir = %jobs_dir.display(), "No periodic job files found");
        return Ok(0);
    }

    let block = renderer.render(channel)?;
    let mut patched = 0;

    for path in &files {
        let io_error = |source: std::io::Error| ReporterError::IoError {
            path: path.display().to_string(),
            source,
        };

        let content = std::fs::read_to_string(path).map_err(io_error)?;
        if !content.contains(AGENT_MARKER) {
            debug!(path = %path.display(), "No agent marker in job file");
            continue;
        }

        std::fs::write(path, content.replace(AGENT_MARKER, &block)).map_err(io_error)?;
        info!(path = %path.display(), channel, "Added Slack reporter");
        patched += 1;
    }

    Ok(patched)
}

/// Files in `jobs_dir` whose name contains `periodics`, sorted by path.
fn periodic_job_files(jobs_dir: &Path) -> Result<Vec<PathBuf>, ReporterError> {
    let entries = match std::fs::read_dir(jobs_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(ReporterError::IoError {
                path: jobs_dir.display().to_string(),
                source: e,
            })
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ReporterError::IoError {
            path: jobs_dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() && entry.file_name().to_string_lossy().contains("periodics") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
