//! Manifest renderer.

use crate::config::Settings;
use crate::discovery::Image;
use crate::manifest::model::{
    BuildRoot, CiOperatorConfig, ClusterClaim, ImageBuild, ImageStreamTagReference, Integration,
    Metadata, MultiStageTest, ProjectImage, Promotion, Release, Releases, ResourceList,
    ResourceRequirements, StepDependency, TestConfig, TestStep,
};
use crate::manifest::ManifestError;
use crate::matrix::MatrixCell;
use std::collections::BTreeMap;

/// First line of every generated manifest.
pub const GENERATED_HEADER: &str = "# Generated by ci-matrix-synth";

const PLATFORM_NAMESPACE: &str = "ocp";
const CONTINUOUS_SUFFIX: &str = "-continuous";

/// Renders ci-operator configurations for matrix cells.
///
/// Rendering is a pure function of the cell, its test targets and its
/// images: identical inputs always encode to identical bytes.
#[derive(Debug, Clone)]
pub struct ManifestRenderer {
    settings: Settings,
}

impl ManifestRenderer {
    /// Creates a renderer using the organization-wide settings.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Settings the renderer was created with.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Builds the document model for a cell.
    ///
    /// `images` must list runtime images before test images; that order is
    /// kept for both the image builds and every test step's dependencies.
    #[must_use]
    pub fn render(&self, cell: &MatrixCell, targets: &[String], images: &[Image]) -> CiOperatorConfig {
        let dependencies: Vec<StepDependency> = images
            .iter()
            .map(|image| StepDependency {
                env: image.dependency_id.clone(),
                name: image.name.clone(),
            })
            .collect();

        // Triggered variants first, then their continuous duplicates.
        let triggered = targets
            .iter()
            .map(|target| self.test(cell, target, None, &dependencies));
        let continuous = targets.iter().map(|target| {
            self.test(
                cell,
                target,
                Some(self.settings.periodic_cron.clone()),
                &dependencies,
            )
        });
        let tests = triggered.chain(continuous).collect();

        CiOperatorConfig {
            base_images: BTreeMap::from([(
                "base".to_string(),
                ImageStreamTagReference {
                    name: cell.version.clone(),
                    namespace: PLATFORM_NAMESPACE.to_string(),
                    tag: "base".to_string(),
                },
            )]),
            build_root: BuildRoot {
                project_image: ProjectImage {
                    dockerfile_path: format!("{}/Dockerfile", self.settings.build_image_path),
                },
            },
            images: images
                .iter()
                .map(|image| ImageBuild {
                    dockerfile_path: image.dockerfile_path(),
                    to: image.name.clone(),
                })
                .collect(),
            promotion: Promotion {
                additional_images: BTreeMap::from([(
                    format!("{}-src", cell.repo),
                    "src".to_string(),
                )]),
                disabled: cell.disabled(),
                name: cell.promotion_alias.clone(),
                namespace: self.settings.registry_namespace.clone(),
            },
            releases: Releases {
                initial: Release {
                    integration: Integration {
                        include_built_images: false,
                        name: cell.version.clone(),
                        namespace: PLATFORM_NAMESPACE.to_string(),
                    },
                },
                latest: Release {
                    integration: Integration {
                        include_built_images: true,
                        name: cell.version.clone(),
                        namespace: PLATFORM_NAMESPACE.to_string(),
                    },
                },
            },
            resources: BTreeMap::from([(
                "*".to_string(),
                ResourceRequirements {
                    requests: ResourceList {
                        cpu: "500m".to_string(),
                        memory: Some("1Gi".to_string()),
                    },
                },
            )]),
            tests,
            zz_generated_metadata: Metadata {
                branch: cell.branch.clone(),
                org: cell.org.clone(),
                repo: cell.repo.clone(),
                variant: cell.variant(),
            },
        }
    }

    fn test(
        &self,
        cell: &MatrixCell,
        target: &str,
        cron: Option<String>,
        dependencies: &[StepDependency],
    ) -> TestConfig {
        let suffix = if cron.is_some() { CONTINUOUS_SUFFIX } else { "" };
        TestConfig {
            name: format!("{target}-aws-ocp-{}{suffix}", cell.variant()),
            cluster_claim: ClusterClaim {
                architecture: "amd64".to_string(),
                cloud: "aws".to_string(),
                owner: "openshift-ci".to_string(),
                product: PLATFORM_NAMESPACE.to_string(),
                timeout: "1h0m0s".to_string(),
                version: cell.version.clone(),
            },
            cron,
            steps: MultiStageTest {
                test: vec![TestStep {
                    name: "test".to_string(),
                    cli: "latest".to_string(),
                    commands: format!("make {target}"),
                    dependencies: dependencies.to_vec(),
                    from: "src".to_string(),
                    resources: ResourceRequirements {
                        requests: ResourceList {
                            cpu: "100m".to_string(),
                            memory: None,
                        },
                    },
                    timeout: "4h0m0s".to_string(),
                }],
                workflow: "generic-claim".to_string(),
            },
        }
    }

    /// Encodes a document to manifest text, header included.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::EncodeError`] if serialization fails.
    pub fn encode(&self, config: &CiOperatorConfig) -> Result<String, ManifestError> {
        let body = serde_yaml::to_string(config).map_err(|e| ManifestError::EncodeError {
            org: config.zz_generated_metadata.org.clone(),
            repo: config.zz_generated_metadata.repo.clone(),
            branch: config.zz_generated_metadata.branch.clone(),
            version: config.zz_generated_metadata.variant.clone(),
            source: e,
        })?;
        Ok(format!("{GENERATED_HEADER}\n{body}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_yaml::Value;

    fn cell(version: &str) -> MatrixCell {
        MatrixCell {
            org: "openshift".to_string(),
            repo: "knative-eventing".to_string(),
            branch: "release-v1.5".to_string(),
            version: version.to_string(),
            max_version: "4.11".to_string(),
            promotion_alias: "knative-v1.5".to_string(),
        }
    }

    fn image(name: &str, dependency_id: &str, path: &str) -> Image {
        Image {
            name: name.to_string(),
            dependency_id: dependency_id.to_string(),
            path: path.to_string(),
        }
    }

    fn images() -> Vec<Image> {
        vec![
            image(
                "knative-eventing-broker",
                "KNATIVE_EVENTING_BROKER",
                "openshift/ci-operator/knative-images/broker",
            ),
            image(
                "knative-eventing-test-heartbeats",
                "KNATIVE_EVENTING_TEST_HEARTBEATS",
                "openshift/ci-operator/knative-test-images/heartbeats",
            ),
        ]
    }

    fn targets() -> Vec<String> {
        vec!["test-e2e".to_string(), "test-conformance".to_string()]
    }

    fn renderer() -> ManifestRenderer {
        ManifestRenderer::new(Settings::default())
    }

    #[test]
    fn renders_two_variants_per_target() {
        let config = renderer().render(&cell("4.11"), &targets(), &images());

        let names: Vec<_> = config.tests.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "test-e2e-aws-ocp-411",
                "test-conformance-aws-ocp-411",
                "test-e2e-aws-ocp-411-continuous",
                "test-conformance-aws-ocp-411-continuous",
            ]
        );
        assert!(config.tests[..2].iter().all(|t| t.cron.is_none()));
        assert!(config.tests[2..]
            .iter()
            .all(|t| t.cron.as_deref() == Some("0 5 * * 2,6")));

        let triggered = &config.tests[0];
        let continuous = &config.tests[2];
        assert_eq!(triggered.cluster_claim, continuous.cluster_claim);
        assert_eq!(triggered.steps, continuous.steps);
        assert_eq!(triggered.steps.test[0].commands, "make test-e2e");
    }

    #[test]
    fn dependencies_follow_image_order() {
        let config = renderer().render(&cell("4.11"), &targets(), &images());

        let deps: Vec<_> = config.tests[0].steps.test[0]
            .dependencies
            .iter()
            .map(|d| (d.env.as_str(), d.name.as_str()))
            .collect();
        assert_eq!(
            deps,
            [
                ("KNATIVE_EVENTING_BROKER", "knative-eventing-broker"),
                (
                    "KNATIVE_EVENTING_TEST_HEARTBEATS",
                    "knative-eventing-test-heartbeats"
                ),
            ]
        );
        assert_eq!(
            config.images[1].dockerfile_path,
            "openshift/ci-operator/knative-test-images/heartbeats/Dockerfile"
        );
    }

    #[test]
    fn disabled_unless_max_version() {
        let renderer = renderer();
        assert!(renderer.render(&cell("4.8"), &targets(), &images()).promotion.disabled);
        assert!(!renderer.render(&cell("4.11"), &targets(), &images()).promotion.disabled);
    }

    #[test]
    fn no_targets_omits_tests_field() {
        let renderer = renderer();
        let config = renderer.render(&cell("4.11"), &[], &[]);
        let text = renderer.encode(&config).unwrap();

        let doc: Value = serde_yaml::from_str(&text).unwrap();
        assert!(doc.get("tests").is_none());
        assert!(doc.get("images").is_none());
        assert!(doc.get("promotion").is_some());
    }

    #[test]
    fn encodes_expected_document() {
        let renderer = renderer();
        let config = renderer.render(&cell("4.8"), &targets()[..1], &images()[..1]);
        let text = renderer.encode(&config).unwrap();

        assert!(text.starts_with("# Generated by ci-matrix-synth\n"));
        let doc: Value = serde_yaml::from_str(&text).unwrap();

        assert_eq!(doc["base_images"]["base"]["name"], Value::from("4.8"));
        assert_eq!(
            doc["build_root"]["project_image"]["dockerfile_path"],
            Value::from("openshift/ci-operator/build-image/Dockerfile")
        );
        assert_eq!(doc["images"][0]["to"], Value::from("knative-eventing-broker"));
        assert_eq!(
            doc["promotion"]["additional_images"]["knative-eventing-src"],
            Value::from("src")
        );
        assert_eq!(doc["promotion"]["disabled"], Value::from(true));
        assert_eq!(doc["promotion"]["name"], Value::from("knative-v1.5"));
        assert_eq!(doc["promotion"]["namespace"], Value::from("openshift"));
        assert!(doc["releases"]["initial"]["integration"]
            .get("include_built_images")
            .is_none());
        assert_eq!(
            doc["releases"]["latest"]["integration"]["include_built_images"],
            Value::from(true)
        );
        assert_eq!(doc["resources"]["*"]["requests"]["memory"], Value::from("1Gi"));

        let test = &doc["tests"][0];
        assert_eq!(test["as"], Value::from("test-e2e-aws-ocp-48"));
        assert_eq!(test["cluster_claim"]["version"], Value::from("4.8"));
        assert!(test.get("cron").is_none());
        assert_eq!(test["steps"]["workflow"], Value::from("generic-claim"));
        assert_eq!(
            test["steps"]["test"][0]["dependencies"][0]["env"],
            Value::from("KNATIVE_EVENTING_BROKER")
        );
        assert_eq!(doc["tests"][1]["cron"], Value::from("0 5 * * 2,6"));

        let metadata = &doc["zz_generated_metadata"];
        assert_eq!(metadata["branch"], Value::from("release-v1.5"));
        assert_eq!(metadata["org"], Value::from("openshift"));
        assert_eq!(metadata["repo"], Value::from("knative-eventing"));
        assert_eq!(metadata["variant"], Value::from("48"));
    }

    #[test]
    fn encoding_is_deterministic() {
        let renderer = renderer();
        let first = renderer
            .encode(&renderer.render(&cell("4.11"), &targets(), &images()))
            .unwrap();
        let second = renderer
            .encode(&renderer.render(&cell("4.11"), &targets(), &images()))
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn keys_are_in_normalized_order() {
        let renderer = renderer();
        let text = renderer
            .encode(&renderer.render(&cell("4.11"), &targets(), &images()))
            .unwrap();

        let top_level: Vec<_> = text
            .lines()
            .filter(|line| !line.starts_with(['#', ' ', '-']))
            .filter_map(|line| line.split(':').next())
            .collect();
        assert_eq!(
            top_level,
            [
                "base_images",
                "build_root",
                "images",
                "promotion",
                "releases",
                "resources",
                "tests",
                "zz_generated_metadata"
            ]
        );
    }
}
