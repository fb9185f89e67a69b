use std::fs;
use std::path::Path;

use ci_matrix_synth::{run_command, Runner, RunnerConfig};
use indoc::indoc;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const CONFIG: &str = indoc! {r##"
    [[branches]]
    name = "release-v1.5"
    min = "4.8"
    max = "4.11"

    [[repositories]]
    name = "openshift/knative-eventing"
    e2e.match = [".*e2e$"]
    e2e.reporter.slack.channel = "#knative-eventing-ci"

    [[repositories]]
    name = "openshift-knative/eventing-kafka-broker"
    e2e.match = [".*e2e$"]
"##};

/// Stands in for the orchestration repository's tooling. `jobs` creates one
/// periodics file per repository unless it exists; `ci-operator-config`
/// logs how many job files already carry a reporter.
const RELEASE_MAKEFILE: &str = indoc! {"
    EVENTING := ci-operator/jobs/openshift/knative-eventing
    KAFKA := ci-operator/jobs/openshift-knative/eventing-kafka-broker

    .PHONY: jobs ci-operator-config

    jobs:
    \techo jobs >> make.log
    \tmkdir -p $(EVENTING) $(KAFKA)
    \ttest -f $(EVENTING)/periodics.yaml || printf 'periodics:\\n- agent: kubernetes\\n  cron: 0 5 * * 2,6\\n' > $(EVENTING)/periodics.yaml
    \ttest -f $(KAFKA)/periodics.yaml || printf 'periodics:\\n- agent: kubernetes\\n  cron: 0 5 * * 2,6\\n' > $(KAFKA)/periodics.yaml

    ci-operator-config:
    \techo \"ci-operator-config $$(grep -rl reporter_config ci-operator/jobs | wc -l | tr -d ' ')\" >> make.log
"};

async fn git(dir: &Path, args: &[&str]) {
    run_command("git", args, dir).await.unwrap();
}

/// Creates a repository with a single commit on `branch`.
async fn init_source_tree(dir: &Path, branch: &str) {
    fs::create_dir_all(dir).unwrap();
    git(dir, &["init", "--quiet"]).await;
    git(dir, &["checkout", "--quiet", "-b", branch]).await;
    fs::write(dir.join("Makefile"), "test-e2e:\n\t./test/e2e-tests.sh\n").unwrap();
    git(dir, &["add", "."]).await;
    git(
        dir,
        &[
            "-c",
            "user.name=ci",
            "-c",
            "user.email=ci@example.com",
            "commit",
            "--quiet",
            "-m",
            "initial",
        ],
    )
    .await;
}

#[tokio::test]
async fn normalize_runs_tooling_around_reporter_injection() {
    let temp = TempDir::new().unwrap();
    let workdir = temp.path().join("work");
    let config_path = temp.path().join("ci-matrix.toml");
    fs::write(&config_path, CONFIG).unwrap();

    init_source_tree(&workdir.join("openshift/knative-eventing"), "release-v1.5").await;
    init_source_tree(
        &workdir.join("openshift-knative/eventing-kafka-broker"),
        "release-v1.5",
    )
    .await;
    let release = workdir.join("openshift/release");
    fs::create_dir_all(&release).unwrap();
    fs::write(release.join("Makefile"), RELEASE_MAKEFILE).unwrap();

    let config = RunnerConfig::new(config_path, workdir).with_clone(false);
    let summary = Runner::new(config).unwrap().run().await.unwrap();

    assert_eq!(summary.repositories_processed, 2);
    assert_eq!(summary.cells_generated, 4);
    assert_eq!(summary.reporters_injected, 1);
    assert!(summary.publish.is_none());

    // The first reformat sees no reporter, the second sees the injected one.
    assert_eq!(
        fs::read_to_string(release.join("make.log")).unwrap(),
        "jobs\nci-operator-config 0\nci-operator-config 1\njobs\n"
    );

    let eventing = fs::read_to_string(
        release.join("ci-operator/jobs/openshift/knative-eventing/periodics.yaml"),
    )
    .unwrap();
    assert!(eventing.contains("channel: '#knative-eventing-ci'"));
    assert!(!eventing.contains("- agent: kubernetes\n  cron"));

    let kafka = fs::read_to_string(
        release.join("ci-operator/jobs/openshift-knative/eventing-kafka-broker/periodics.yaml"),
    )
    .unwrap();
    assert!(!kafka.contains("reporter_config"));
}

#[tokio::test]
async fn skip_normalize_leaves_tooling_alone() {
    let temp = TempDir::new().unwrap();
    let workdir = temp.path().join("work");
    let config_path = temp.path().join("ci-matrix.toml");
    fs::write(&config_path, CONFIG).unwrap();

    init_source_tree(&workdir.join("openshift/knative-eventing"), "release-v1.5").await;
    init_source_tree(
        &workdir.join("openshift-knative/eventing-kafka-broker"),
        "release-v1.5",
    )
    .await;
    let release = workdir.join("openshift/release");
    fs::create_dir_all(&release).unwrap();
    fs::write(release.join("Makefile"), RELEASE_MAKEFILE).unwrap();

    let config = RunnerConfig::new(config_path, workdir)
        .with_clone(false)
        .with_normalize(false);
    let summary = Runner::new(config).unwrap().run().await.unwrap();

    assert_eq!(summary.cells_generated, 4);
    assert_eq!(summary.reporters_injected, 0);
    assert!(!release.join("make.log").exists());
    assert!(release
        .join("ci-operator/config/openshift/knative-eventing/openshift-knative-eventing-release-v1.5__411.yaml")
        .exists());
}
