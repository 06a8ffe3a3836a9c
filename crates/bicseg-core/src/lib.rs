// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Core shared types for BIC-based feature-sequence segmentation.

pub mod diagnostics;
pub mod error;
pub mod feature_matrix;
pub mod results;

pub use diagnostics::{DIAGNOSTICS_SCHEMA_VERSION, Diagnostics};
pub use error::BicSegError;
pub use feature_matrix::{DTypeView, FeatureMatrixView, FeatureWindow, MatrixLayout};
pub use results::{SegmentationResult, validate_boundaries};

/// Core namespace placeholder.
pub fn crate_name() -> &'static str {
    "bicseg-core"
}
