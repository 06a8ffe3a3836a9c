// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::gaussian::split_delta;
use crate::search::change_search;
use bicseg_core::{BicSegError, Diagnostics, FeatureMatrixView, SegmentationResult};
use std::borrow::Cow;
use std::time::Instant;

const DEFAULT_COARSE_SIZE: usize = 1000;
const DEFAULT_COARSE_INC: usize = 300;
const DEFAULT_FINE_SIZE: usize = 600;
const DEFAULT_FINE_INC: usize = 50;
const DEFAULT_PENALTY_WEIGHT: f64 = 1.5;

/// Configuration for [`BicSegmenter`].
///
/// `coarse_size`/`coarse_inc` drive the first pass, `fine_size`/`fine_inc`
/// the local refinement pass, and `penalty_weight` scales the BIC
/// model-complexity penalty in every differential.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct BicSegConfig {
    pub coarse_size: usize,
    pub coarse_inc: usize,
    pub fine_size: usize,
    pub fine_inc: usize,
    pub penalty_weight: f64,
}

impl Default for BicSegConfig {
    fn default() -> Self {
        Self {
            coarse_size: DEFAULT_COARSE_SIZE,
            coarse_inc: DEFAULT_COARSE_INC,
            fine_size: DEFAULT_FINE_SIZE,
            fine_inc: DEFAULT_FINE_INC,
            penalty_weight: DEFAULT_PENALTY_WEIGHT,
        }
    }
}

impl BicSegConfig {
    pub fn validate(&self) -> Result<(), BicSegError> {
        if self.coarse_size < 2 {
            return Err(BicSegError::invalid_input(format!(
                "BicSegConfig.coarse_size must be >= 2; got {}",
                self.coarse_size
            )));
        }
        if self.fine_size < 2 {
            return Err(BicSegError::invalid_input(format!(
                "BicSegConfig.fine_size must be >= 2; got {}",
                self.fine_size
            )));
        }
        if self.coarse_inc == 0 {
            return Err(BicSegError::invalid_input(
                "BicSegConfig.coarse_inc must be >= 1; got 0",
            ));
        }
        if self.fine_inc == 0 {
            return Err(BicSegError::invalid_input(
                "BicSegConfig.fine_inc must be >= 1; got 0",
            ));
        }
        if !self.penalty_weight.is_finite() || self.penalty_weight < 0.0 {
            return Err(BicSegError::invalid_input(format!(
                "BicSegConfig.penalty_weight must be finite and >= 0.0; got {}",
                self.penalty_weight
            )));
        }
        Ok(())
    }
}

#[derive(Default)]
struct CoarseOutcome {
    boundaries: Vec<usize>,
    scores: Vec<f64>,
    trace: Vec<f64>,
    windows_scanned: usize,
}

#[derive(Default)]
struct RefineStats {
    refined: usize,
    removed: usize,
}

/// Three-phase BIC segmenter over a buffered feature matrix.
///
/// The first pass scans growing windows for change points at a coarse
/// step, the second re-scans a local window around each accepted boundary
/// at a fine step, and the third deletes boundaries whose split is not
/// statistically justified against the running segment.
#[derive(Clone, Debug)]
pub struct BicSegmenter {
    config: BicSegConfig,
}

impl BicSegmenter {
    pub fn new(config: BicSegConfig) -> Result<Self, BicSegError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BicSegConfig {
        &self.config
    }

    /// Segments the matrix into maximal homogeneous frame runs.
    ///
    /// Fails with [`BicSegError::InsufficientData`] when the matrix holds
    /// fewer than two frames; every other degenerate case resolves to "no
    /// boundary" rather than an error.
    pub fn segment(
        &self,
        features: &FeatureMatrixView<'_>,
    ) -> Result<SegmentationResult, BicSegError> {
        self.config.validate()?;

        let n = features.n_frames;
        if n < 2 {
            return Err(BicSegError::insufficient_data(format!(
                "cannot segment fewer than 2 frames; got n_frames={n}"
            )));
        }

        let started_at = Instant::now();
        let mut notes = vec![format!(
            "coarse_size={}, coarse_inc={}, fine_size={}, fine_inc={}, penalty_weight={}",
            self.config.coarse_size,
            self.config.coarse_inc,
            self.config.fine_size,
            self.config.fine_inc,
            self.config.penalty_weight
        )];
        let mut warnings = vec![];
        if self.config.fine_size >= n {
            warnings.push(format!(
                "fine_size={} spans the whole matrix (n_frames={n}); refinement windows clamp",
                self.config.fine_size
            ));
        }

        let coarse = self.coarse_pass(features)?;
        let mut boundaries = coarse.boundaries;
        let mut scores = coarse.scores;
        notes.push(format!(
            "coarse: boundaries={}, windows_scanned={}",
            boundaries.len(),
            coarse.windows_scanned
        ));

        let refine = self.refine_pass(features, &mut boundaries, &mut scores)?;
        debug_assert_eq!(boundaries.len(), scores.len());
        notes.push(format!(
            "refine: refined={}, removed={}",
            refine.refined, refine.removed
        ));

        let validated_removed = self.validate_pass(features, &mut boundaries, &mut scores)?;
        debug_assert_eq!(boundaries.len(), scores.len());
        notes.push(format!("validate: removed={validated_removed}"));
        notes.push(format!("final_change_count={}", boundaries.len()));

        let runtime_ms = u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX);
        let diagnostics = Diagnostics {
            n_features: features.n_features,
            n_frames: n,
            runtime_ms: Some(runtime_ms),
            notes,
            warnings,
            algorithm: Cow::Borrowed("bic_three_phase"),
            cost_model: Cow::Borrowed("gaussian_diag_logdet"),
            ..Diagnostics::default()
        };

        SegmentationResult::new(n, boundaries, scores, coarse.trace, diagnostics)
    }

    /// First pass: scan growing windows for change points.
    ///
    /// A window with no accepted split is extended by `coarse_size` rather
    /// than abandoned; an accepted split restarts the scan just past the
    /// boundary, skipping `coarse_inc` frames so the same change is not
    /// re-detected. The trace keeps each accepted window's differentials
    /// up to the winning candidate, plus the whole trace of the final
    /// window when it reaches the last frame without a split.
    fn coarse_pass(&self, x: &FeatureMatrixView<'_>) -> Result<CoarseOutcome, BicSegError> {
        let n = x.n_frames;
        let mut out = CoarseOutcome::default();

        let mut curr = 0usize;
        // Exclusive end of the chunk scanned so far.
        let mut chunk_end = 0usize;
        while chunk_end < n {
            chunk_end = chunk_end.saturating_add(self.config.coarse_size).min(n);
            let end = chunk_end - 1;

            let window = x.frame_window(curr, end);
            let scan = change_search(
                &window,
                self.config.coarse_inc,
                curr,
                self.config.penalty_weight,
            )?;
            out.windows_scanned += 1;

            match (scan.boundary, scan.best_step) {
                (Some(boundary), Some(best_step)) => {
                    out.boundaries.push(boundary);
                    out.scores.push(scan.d_min);
                    out.trace.extend_from_slice(&scan.trace[..=best_step]);
                    curr = boundary.saturating_add(self.config.coarse_inc);
                    chunk_end = curr;
                }
                _ => {
                    if end == n - 1 {
                        out.trace.extend_from_slice(&scan.trace);
                    }
                }
            }
        }

        Ok(out)
    }

    /// Second pass: re-scan a local window around each boundary.
    ///
    /// A fresh split strictly between the neighboring boundaries replaces
    /// the boundary in place; a split outside that open interval deletes
    /// it, and the element shifted into the same position is examined
    /// next. A scan with no split leaves the coarse boundary untouched.
    fn refine_pass(
        &self,
        x: &FeatureMatrixView<'_>,
        boundaries: &mut Vec<usize>,
        scores: &mut Vec<f64>,
    ) -> Result<RefineStats, BicSegError> {
        let n = x.n_frames;
        let half = self.config.fine_size / 2;
        let mut stats = RefineStats::default();

        let mut idx = 0usize;
        while idx < boundaries.len() {
            let start = boundaries[idx].saturating_sub(half);
            let end = start
                .saturating_add(self.config.fine_size - 1)
                .min(n - 1);

            let window = x.frame_window(start, end);
            let scan = change_search(
                &window,
                self.config.fine_inc,
                start,
                self.config.penalty_weight,
            )?;

            let Some(refined) = scan.boundary else {
                idx += 1;
                continue;
            };

            let prev = if idx == 0 { 0 } else { boundaries[idx - 1] };
            let next = if idx + 1 >= boundaries.len() {
                n - 1
            } else {
                boundaries[idx + 1]
            };

            if prev < refined && refined < next {
                if refined != boundaries[idx] {
                    boundaries[idx] = refined;
                    scores[idx] = scan.d_min;
                    stats.refined += 1;
                }
                idx += 1;
            } else {
                boundaries.remove(idx);
                scores.remove(idx);
                stats.removed += 1;
            }
        }

        Ok(stats)
    }

    /// Third pass: delete boundaries that do not justify a split of the
    /// running segment. The first and last boundaries are never removed.
    fn validate_pass(
        &self,
        x: &FeatureMatrixView<'_>,
        boundaries: &mut Vec<usize>,
        scores: &mut Vec<f64>,
    ) -> Result<usize, BicSegError> {
        if boundaries.is_empty() {
            return Ok(0);
        }

        let mut removed = 0usize;
        let mut curr_seg = 0usize;
        let mut idx = 1usize;
        while idx + 1 < boundaries.len() {
            let end = boundaries[idx + 1];
            let window = x.frame_window(curr_seg, end);
            let offset = boundaries[idx] - boundaries[idx - 1];

            let delta = split_delta(&window, offset, self.config.penalty_weight);
            if !delta.is_finite() {
                return Err(BicSegError::numerical_issue(format!(
                    "non-finite validation differential at boundary {}: {delta}",
                    boundaries[idx]
                )));
            }

            if delta > 0.0 {
                boundaries.remove(idx);
                scores.remove(idx);
                removed += 1;
            } else {
                curr_seg = boundaries[idx] + 1;
                idx += 1;
            }
        }

        Ok(removed)
    }
}
