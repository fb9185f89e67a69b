//! Typed document model of a ci-operator configuration.
//!
//! Field order matches the normalized key order produced by the
//! orchestration repository's tooling, so encoding is stable.

use serde::Serialize;
use std::collections::BTreeMap;

/// A complete ci-operator configuration for one matrix cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CiOperatorConfig {
    pub base_images: BTreeMap<String, ImageStreamTagReference>,
    pub build_root: BuildRoot,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageBuild>,
    pub promotion: Promotion,
    pub releases: Releases,
    pub resources: BTreeMap<String, ResourceRequirements>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tests: Vec<TestConfig>,
    pub zz_generated_metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageStreamTagReference {
    pub name: String,
    pub namespace: String,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildRoot {
    pub project_image: ProjectImage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectImage {
    pub dockerfile_path: String,
}

/// An image built from a Dockerfile in the repository.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageBuild {
    pub dockerfile_path: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Promotion {
    pub additional_images: BTreeMap<String, String>,
    pub disabled: bool,
    pub name: String,
    pub namespace: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Releases {
    pub initial: Release,
    pub latest: Release,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Release {
    pub integration: Integration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Integration {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub include_built_images: bool,
    pub name: String,
    pub namespace: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceRequirements {
    pub requests: ResourceList,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceList {
    pub cpu: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
}

/// A test job. Continuous variants carry a `cron` schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestConfig {
    #[serde(rename = "as")]
    pub name: String,
    pub cluster_claim: ClusterClaim,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cron: Option<String>,
    pub steps: MultiStageTest,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterClaim {
    pub architecture: String,
    pub cloud: String,
    pub owner: String,
    pub product: String,
    pub timeout: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiStageTest {
    pub test: Vec<TestStep>,
    pub workflow: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestStep {
    #[serde(rename = "as")]
    pub name: String,
    pub cli: String,
    pub commands: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<StepDependency>,
    pub from: String,
    pub resources: ResourceRequirements,
    pub timeout: String,
}

/// Exposes a built image to a test step through an environment variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepDependency {
    pub env: String,
    pub name: String,
}

/// Keys the file for the orchestration repository's tooling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub branch: String,
    pub org: String,
    pub repo: String,
    pub variant: String,
}
