// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::{BicSegError, Diagnostics};

/// Validates a boundary list against a frame count.
///
/// Boundaries must be strictly ascending frame indices, each below
/// `n_frames`.
pub fn validate_boundaries(n_frames: usize, boundaries: &[usize]) -> Result<(), BicSegError> {
    let mut previous: Option<usize> = None;
    for &boundary in boundaries {
        if boundary >= n_frames {
            return Err(BicSegError::invalid_input(format!(
                "boundary {boundary} is out of range for n_frames={n_frames}"
            )));
        }
        if let Some(previous) = previous {
            if boundary <= previous {
                return Err(BicSegError::invalid_input(format!(
                    "boundaries must be strictly ascending: {previous} followed by {boundary}"
                )));
            }
        }
        previous = Some(boundary);
    }
    Ok(())
}

/// Final output of a segmentation run.
///
/// `boundaries` and `scores` are parallel: `scores[k]` is the BIC
/// differential accepted for `boundaries[k]`. `bic_trace` carries the
/// coarse pass's per-candidate differentials for diagnostics.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentationResult {
    pub n_frames: usize,
    pub boundaries: Vec<usize>,
    pub scores: Vec<f64>,
    pub bic_trace: Vec<f64>,
    pub diagnostics: Diagnostics,
}

impl SegmentationResult {
    /// Constructs a validated result.
    pub fn new(
        n_frames: usize,
        boundaries: Vec<usize>,
        scores: Vec<f64>,
        bic_trace: Vec<f64>,
        diagnostics: Diagnostics,
    ) -> Result<Self, BicSegError> {
        validate_boundaries(n_frames, &boundaries)?;

        if boundaries.len() != scores.len() {
            return Err(BicSegError::invalid_input(format!(
                "boundaries/scores length mismatch: {} boundaries, {} scores",
                boundaries.len(),
                scores.len()
            )));
        }
        if let Some(score) = scores.iter().find(|score| !score.is_finite()) {
            return Err(BicSegError::numerical_issue(format!(
                "boundary scores must be finite; got {score}"
            )));
        }

        Ok(Self {
            n_frames,
            boundaries,
            scores,
            bic_trace,
            diagnostics,
        })
    }

    /// Number of segments implied by the boundary list.
    pub fn segment_count(&self) -> usize {
        self.boundaries.len() + 1
    }

    /// Inclusive frame spans covering `0..=n_frames-1`.
    ///
    /// A boundary at frame `b` ends its segment at `b`; the next segment
    /// starts at `b + 1`.
    pub fn segment_spans(&self) -> Vec<(usize, usize)> {
        let mut spans = Vec::with_capacity(self.segment_count());
        let mut start = 0usize;
        for &boundary in &self.boundaries {
            spans.push((start, boundary));
            start = boundary + 1;
        }
        if start < self.n_frames {
            spans.push((start, self.n_frames - 1));
        }
        spans
    }
}
