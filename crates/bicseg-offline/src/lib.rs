// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Offline three-phase BIC segmentation of buffered feature sequences.
//!
//! The detector partitions a feature matrix into maximal contiguous frame
//! runs that each fit a single diagonal-covariance Gaussian, using the
//! Bayesian Information Criterion to decide where one model stops
//! explaining the data. Everything operates on frame indices; mapping
//! frames to timestamps is the caller's concern.

pub mod gaussian;
pub mod search;
pub mod segmenter;

pub use search::{ChangeScan, change_search};
pub use segmenter::{BicSegConfig, BicSegmenter};

/// Offline detector namespace placeholder.
pub fn crate_name() -> &'static str {
    let _ = bicseg_core::crate_name();
    "bicseg-offline"
}
