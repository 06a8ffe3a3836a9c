// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::gaussian::{complexity_penalty, log_det, split_score};
use bicseg_core::{BicSegError, FeatureWindow};

/// Outcome of one BIC change scan over a window.
#[derive(Clone, Debug, PartialEq)]
pub struct ChangeScan {
    /// Absolute frame index of the best split, or `None` when no candidate
    /// was scanned or the minimal differential stayed positive.
    pub boundary: Option<usize>,
    /// Minimal scanned differential; `f64::MAX` when nothing was scanned.
    pub d_min: f64,
    /// Differential of every scanned candidate, in scan order.
    pub trace: Vec<f64>,
    /// Index into `trace` of the minimal differential (first-seen on ties).
    pub best_step: Option<usize>,
}

impl ChangeScan {
    fn empty() -> Self {
        Self {
            boundary: None,
            d_min: f64::MAX,
            trace: vec![],
            best_step: None,
        }
    }
}

/// Scans `window` for the split minimizing the BIC differential.
///
/// Candidates run at `shift = inc-1, 2*inc-1, ...` while at least `inc`
/// frames remain on the right, so any returned split leaves both parts
/// non-degenerate. `origin` is the window's absolute start frame, used to
/// translate the winning in-window shift. A window too small for any
/// candidate (`M < 2*inc`) yields an empty scan.
///
/// A positive minimal differential means splitting anywhere costs more
/// than it explains; the whole window is one segment and `boundary` is
/// `None` regardless of where the numeric minimum fell.
pub fn change_search(
    window: &FeatureWindow,
    inc: usize,
    origin: usize,
    penalty_weight: f64,
) -> Result<ChangeScan, BicSegError> {
    if inc == 0 || window.is_empty() {
        return Ok(ChangeScan::empty());
    }

    let m = window.n_frames();
    let penalty = complexity_penalty(window.n_features(), m, penalty_weight);
    let whole = log_det(window);

    let mut scan = ChangeScan::empty();
    scan.trace.reserve(m / inc);

    let mut best_shift = 0usize;
    let mut shift = inc - 1;
    while shift + inc < m {
        let d = split_score(window, shift, whole, penalty);
        if !d.is_finite() {
            return Err(BicSegError::numerical_issue(format!(
                "non-finite differential at shift={shift} in a window of {m} frames: {d}"
            )));
        }
        scan.trace.push(d);

        if d < scan.d_min {
            scan.d_min = d;
            scan.best_step = Some(scan.trace.len() - 1);
            best_shift = shift;
        }
        shift += inc;
    }

    if scan.best_step.is_some() && scan.d_min <= 0.0 {
        scan.boundary = Some(origin + best_shift);
    }
    Ok(scan)
}
