//! Image name normalization.

/// Normalized identifiers for an image build context.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageName {
    /// Image tag name, e.g. `knative-eventing-broker`.
    pub name: String,

    /// Identifier referencing the image in a test step, e.g. `KNATIVE_EVENTING_BROKER`.
    pub dependency_id: String,
}

/// Builds the image name and dependency identifier for a build context.
///
/// `context` is empty for runtime images and a tag such as `test-` for test
/// images. Name collisions are not detected here.
#[must_use]
pub fn normalize(prefix: &str, context: &str, basename: &str) -> ImageName {
    let raw = format!("{prefix}-{context}{basename}");
    ImageName {
        name: raw.to_lowercase().replace('_', "-"),
        dependency_id: raw.to_uppercase().replace('-', "_"),
    }
}

/// Version with its dots removed, e.g. `4.11` becomes `411`.
#[must_use]
pub fn variant(version: &str) -> String {
    version.replace('.', "")
}
