// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use bicseg_core::FeatureWindow;

/// Variances at or below this threshold are treated as degenerate.
pub const VARIANCE_THRESHOLD: f64 = 1e-5;

/// Log-variance contribution substituted for degenerate variances.
///
/// The per-feature variance is algebraically non-negative but the one-pass
/// estimate can come out at or below zero for constant features; the floor
/// keeps single-frame and constant windows scoreable instead of feeding
/// `-inf` into the differential.
pub const LOG_VARIANCE_FLOOR: f64 = -5.0;

/// Estimates `log(det(Sigma))` for the diagonal covariance of a window.
///
/// Off-diagonal covariance is ignored: the determinant of a diagonal
/// covariance is the product of the per-feature variances, so its log is
/// the sum of their logs. Each variance comes from a one-pass
/// sum/sum-of-squares accumulation over the window's frames.
///
/// An empty window scores `0.0`, the sum over no features.
pub fn log_det(window: &FeatureWindow) -> f64 {
    let m = window.n_frames();
    if window.is_empty() {
        return 0.0;
    }

    let z = 1.0 / m as f64;
    let zz = z * z;
    let mut logd = 0.0;
    for feature in 0..window.n_features() {
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for &value in window.feature_row(feature) {
            sum += value;
            sum_sq += value * value;
        }
        let diag_cov = sum_sq * z - sum * sum * zz;
        logd += if diag_cov > VARIANCE_THRESHOLD {
            diag_cov.ln()
        } else {
            LOG_VARIANCE_FLOOR
        };
    }
    logd
}

/// Model-complexity penalty for splitting a window of `n_frames` frames:
/// `weight * 2*n_features * ln(n_frames)`.
pub fn complexity_penalty(n_features: usize, n_frames: usize, weight: f64) -> f64 {
    weight * (2 * n_features) as f64 * (n_frames as f64).ln()
}

/// Signed BIC differential for splitting `window` after in-window frame
/// `shift`: the left part covers `[0, shift]`, the right part
/// `[shift+1, M-1]`.
///
/// `whole` is `log_det(window)`, passed in so a scan evaluates it once.
/// A non-positive value means the two-model explanation fits better than
/// one; a positive value means the split costs more than it explains.
pub fn split_score(window: &FeatureWindow, shift: usize, whole: f64, penalty: f64) -> f64 {
    let m = window.n_frames();
    let n1 = shift + 1;
    let n2 = m.saturating_sub(n1);

    let left = window.frames(0, shift);
    let right = window.frames(shift + 1, m.saturating_sub(1));
    let s1 = log_det(&left);
    let s2 = log_det(&right);

    0.5 * (n1 as f64 * s1 + n2 as f64 * s2 - m as f64 * whole + penalty)
}

/// One-shot split validity test: the same differential as
/// [`split_score`], recomputing the whole-window log-determinant itself
/// and deriving the penalty from the window's own frame count.
pub fn split_delta(window: &FeatureWindow, shift: usize, penalty_weight: f64) -> f64 {
    let penalty = complexity_penalty(window.n_features(), window.n_frames(), penalty_weight);
    split_score(window, shift, log_det(window), penalty)
}
