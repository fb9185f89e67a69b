#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod command;
pub mod config;
pub mod discovery;
pub mod git;
pub mod manifest;
pub mod matrix;
pub mod naming;
pub mod publish;
pub mod reporter;
pub mod runner;
pub mod summary;

pub use command::{run_command, CommandError, CommandOutput};
pub use config::{
    load_config, BranchVersionTable, ConfigError, RepositorySpec, Settings, SynthConfig,
    VersionRange,
};
pub use discovery::{
    discover_images, discover_test_targets, ensure_unique_names, DiscoveryError, Image,
};
pub use git::{clone_url, GitWorkingTree, WorkingTree};
pub use manifest::{
    remove_stale_manifests, write_file, ManifestError, ManifestRenderer, MirroringMapping,
    ReleaseLayout,
};
pub use matrix::{expand, Matrix, MatrixCell};
pub use naming::{normalize, ImageName};
pub use publish::{publish, PublishConfig, PublishError, PublishStatus, PullRequestConfig};
pub use reporter::{inject_reporter, ReporterError, ReporterRenderer};
pub use runner::{generate_repository, Runner, RunnerConfig, RunnerError};
pub use summary::{RepositoryResult, RunSummary};
