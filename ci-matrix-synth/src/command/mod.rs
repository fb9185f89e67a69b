//! External command execution.
//!
//! Commands run to completion before the caller continues. There are no
//! retries or timeouts; a non-zero exit is reported with the captured output.

mod error;

pub use error::CommandError;

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Captured output of a successful command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Captured standard output.
    pub stdout: String,

    /// Captured standard error.
    pub stderr: String,
}

/// Runs `program` with `args` in `cwd` and waits for it to exit.
///
/// # Errors
///
/// Returns [`CommandError::Spawn`] if the program cannot be started and
/// [`CommandError::Failed`] if it exits unsuccessfully.
pub async fn run_command(
    program: &str,
    args: &[&str],
    cwd: &Path,
) -> Result<CommandOutput, CommandError> {
    let command = display_command(program, args);
    debug!(command = %command, cwd = %cwd.display(), "Running command");

    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| CommandError::Spawn {
            command: command.clone(),
            source: e,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if !output.status.success() {
        return Err(CommandError::Failed {
            command,
            status: output.status,
            stdout,
            stderr,
        });
    }

    debug!(command = %command, "Command succeeded");
    Ok(CommandOutput { stdout, stderr })
}

fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn formats_command_line() {
        assert_eq!(
            display_command("git", &["checkout", "release-next"]),
            "git checkout release-next"
        );
        assert_eq!(display_command("make", &[]), "make");
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let temp = TempDir::new().unwrap();
        let result = run_command("ci-matrix-synth-no-such-program", &[], temp.path()).await;
        assert!(matches!(result, Err(CommandError::Spawn { .. })));
    }
}
