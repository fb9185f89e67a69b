//! Manifest generation for a single repository.

use crate::config::{RepositorySpec, SynthConfig};
use crate::discovery::{discover_images, discover_test_targets, ensure_unique_names, Image};
use crate::git::WorkingTree;
use crate::manifest::{
    remove_stale_manifests, write_file, ManifestRenderer, MirroringMapping, ReleaseLayout,
};
use crate::matrix::{expand, MatrixCell};
use crate::runner::RunnerError;
use crate::summary::RepositoryResult;
use tracing::{debug, info, info_span, Instrument};

/// Generates every manifest and mirroring mapping of a repository.
///
/// Stale manifests of every supported branch are removed first. Each cell
/// then checks `tree` out at its branch, discovers test targets and images,
/// and writes its manifest. One mapping file is written per branch.
///
/// # Errors
///
/// Returns [`RunnerError`] on the first checkout, discovery or write
/// failure. Files written before the failure are kept.
pub async fn generate_repository<T: WorkingTree>(
    spec: &RepositorySpec,
    config: &SynthConfig,
    tree: &mut T,
    layout: &ReleaseLayout,
    renderer: &ManifestRenderer,
) -> Result<RepositoryResult, RunnerError> {
    let full_name = spec.full_name();
    let span = info_span!("repository", repository = %full_name);

    async {
        let settings = &config.settings;
        let matrix = expand(spec, &config.branches, settings);
        let config_dir = layout.config_dir(spec.org(), spec.repo());
        let mut result = RepositoryResult {
            repository: full_name.clone(),
            ..Default::default()
        };

        for branch in matrix.branches.branches() {
            result.stale_manifests_removed +=
                remove_stale_manifests(&config_dir, spec.org(), spec.repo(), branch)?;
        }

        for branch in matrix.branches.branches() {
            let mut mapping: Option<MirroringMapping> = None;

            for cell in matrix.cells_for(branch) {
                tree.checkout(&cell.branch).await?;
                let images = generate_cell(spec, cell, tree, layout, renderer).await?;
                result.cells_generated += 1;

                mapping
                    .get_or_insert_with(|| {
                        MirroringMapping::new(cell.promotion_alias.as_str(), spec.repo())
                    })
                    .extend(&images, settings);
            }

            if let Some(mapping) = mapping {
                write_file(&layout.mapping_path(&mapping), &mapping.to_text())?;
                debug!(
                    file = %mapping.file_name(),
                    entries = mapping.entries().len(),
                    "Wrote mirroring mapping"
                );
                result.mapping_files_written += 1;
            }
        }

        info!(
            cells = result.cells_generated,
            removed = result.stale_manifests_removed,
            "Generated repository manifests"
        );
        Ok::<_, RunnerError>(result)
    }
    .instrument(span)
    .await
}

/// Renders and writes the manifest of one cell from the checked-out tree.
///
/// Returns the cell's images, runtime images first.
async fn generate_cell<T: WorkingTree>(
    spec: &RepositorySpec,
    cell: &MatrixCell,
    tree: &T,
    layout: &ReleaseLayout,
    renderer: &ManifestRenderer,
) -> Result<Vec<Image>, RunnerError> {
    let span = info_span!("cell", branch = %cell.branch, version = %cell.version);

    async {
        let settings = renderer.settings();
        let targets = discover_test_targets(tree.path(), spec)?;
        debug!(?targets, "Matching targets");

        let mut images = discover_images(
            tree.path(),
            &settings.images_path,
            spec.image_prefix(),
            "",
        )?;
        let test_images = discover_images(
            tree.path(),
            &settings.test_images_path,
            spec.image_prefix(),
            &settings.test_image_context,
        )?;
        images.extend(test_images);
        ensure_unique_names(&images)?;

        let document = renderer.render(cell, &targets, &images);
        let path = layout.manifest_path(cell);
        write_file(&path, &renderer.encode(&document)?)?;

        info!(
            tests = targets.len(),
            images = images.len(),
            disabled = cell.disabled(),
            path = %path.display(),
            "Wrote manifest"
        );
        Ok::<_, RunnerError>(images)
    }
    .instrument(span)
    .await
}
