//! Discovery of test targets and image build contexts in a checked-out tree.
//!
//! Both discoverers are tolerant of absent inputs: a tree without a Makefile
//! has no tests, and a tree without an image root has no images.

mod error;
mod images;
mod targets;

pub use error::DiscoveryError;
pub use images::{discover_images, ensure_unique_names, Image};
pub use targets::{discover_test_targets, MAKEFILE};
