//! CLI for the CI matrix synthesizer.
//!
//! This tool generates ci-operator configuration for every configured
//! repository, branch and platform version, then optionally publishes the
//! result to a fork of the orchestration repository.

use ci_matrix_synth::{
    PublishConfig, PublishStatus, PullRequestConfig, RunSummary, Runner, RunnerConfig,
    RunnerError,
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// CI Matrix Synthesizer - Generate CI manifests for a repository x branch x platform-version matrix.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the synthesis configuration file.
    #[arg(long, default_value = "ci-matrix.toml")]
    config: PathBuf,

    /// Directory repositories are cloned into.
    #[arg(long, default_value = ".")]
    workdir: PathBuf,

    /// Reuse existing working trees instead of cloning fresh mirrors.
    #[arg(long)]
    no_clone: bool,

    /// Skip the orchestration repository's tooling and reporter injection.
    #[arg(long)]
    skip_normalize: bool,

    /// Git URL of the fork to push generated changes to.
    #[arg(long)]
    release_remote: Option<String>,

    /// Branch pushed to the fork.
    #[arg(long, default_value = "sync-serverless-ci")]
    publish_branch: String,

    /// GitHub Personal Access Token used to open the pull request.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Owner of the fork; required to open a pull request.
    #[arg(long)]
    fork_owner: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    init_tracing();

    // Parse arguments
    let args = Args::parse();

    // Run the main logic
    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::from(0)
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let mut config = RunnerConfig::new(args.config, args.workdir)
        .with_clone(!args.no_clone)
        .with_normalize(!args.skip_normalize);

    if let Some(remote) = args.release_remote {
        let mut publish = PublishConfig::new(remote).with_branch(args.publish_branch);
        match (args.github_token, args.fork_owner) {
            (Some(token), Some(fork_owner)) => {
                publish = publish.with_pull_request(PullRequestConfig { token, fork_owner });
            }
            (None, Some(_)) => warn!("--fork-owner given without a GitHub token, only pushing"),
            _ => {}
        }
        config = config.with_publish(publish);
    }

    let runner = Runner::new(config)?;
    runner.run().await
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!("  Repositories processed: {}", summary.repositories_processed);
    println!("  Manifests generated: {}", summary.cells_generated);
    println!(
        "  Stale manifests removed: {}",
        summary.stale_manifests_removed
    );
    println!("  Mapping files written: {}", summary.mapping_files_written);
    println!("  Reporters injected: {}", summary.reporters_injected);

    match &summary.publish {
        None => println!("  Publish: skipped"),
        Some(status @ PublishStatus::PullRequestOpened { .. }) => println!(
            "  Publish: {} ({})",
            status.as_str(),
            status.url().unwrap_or_default()
        ),
        Some(status) => println!("  Publish: {}", status.as_str()),
    }
}
