//! Organization-wide settings shared by every repository.

use serde::Deserialize;

/// Fixed values that apply to every rendered manifest and mirroring line.
///
/// Every key is optional in the configuration file; missing keys fall back
/// to the values used by the OpenShift Serverless CI setup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
    /// CI orchestration repository in "org/name" format.
    pub release_repository: String,

    /// Default branch of the orchestration repository.
    pub release_branch: String,

    /// Base URL used to clone repositories.
    pub github_url: String,

    /// Registry images are promoted to.
    pub registry: String,

    /// Namespace within [`Self::registry`] used for promotion.
    pub registry_namespace: String,

    /// Registry (including organization) images are mirrored to.
    pub mirror_registry: String,

    /// Branch that tracks upstream main.
    pub floating_branch: String,

    /// Promotion alias used for [`Self::floating_branch`].
    pub nightly_alias: String,

    /// Cron schedule attached to continuous test variants.
    pub periodic_cron: String,

    /// Root of runtime image build contexts, relative to the repository root.
    pub images_path: String,

    /// Root of test image build contexts, relative to the repository root.
    pub test_images_path: String,

    /// Context tag prepended to test image names.
    pub test_image_context: String,

    /// Directory holding the build root Dockerfile.
    pub build_image_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            release_repository: "openshift/release".to_string(),
            release_branch: "master".to_string(),
            github_url: "https://github.com/".to_string(),
            registry: "registry.ci.openshift.org".to_string(),
            registry_namespace: "openshift".to_string(),
            mirror_registry: "quay.io/openshift-knative".to_string(),
            floating_branch: "release-next".to_string(),
            nightly_alias: "knative-nightly".to_string(),
            periodic_cron: "0 5 * * 2,6".to_string(),
            images_path: "openshift/ci-operator/knative-images".to_string(),
            test_images_path: "openshift/ci-operator/knative-test-images".to_string(),
            test_image_context: "test-".to_string(),
            build_image_path: "openshift/ci-operator/build-image".to_string(),
        }
    }
}
