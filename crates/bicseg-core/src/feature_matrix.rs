// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::BicSegError;

/// Borrowed numeric data view over either f32 or f64 values.
#[derive(Clone, Copy, Debug)]
pub enum DTypeView<'a> {
    F32(&'a [f32]),
    F64(&'a [f64]),
}

impl DTypeView<'_> {
    fn len(&self) -> usize {
        match self {
            Self::F32(slice) => slice.len(),
            Self::F64(slice) => slice.len(),
        }
    }

    fn get(&self, index: usize) -> f64 {
        match self {
            Self::F32(slice) => f64::from(slice[index]),
            Self::F64(slice) => slice[index],
        }
    }
}

/// Memory layout of the underlying buffer.
///
/// `FeatureMajor` keeps each feature's frames contiguous (row = feature);
/// `FrameMajor` keeps each frame's features contiguous (row = frame).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatrixLayout {
    FeatureMajor,
    FrameMajor,
}

/// Zero-copy view over a feature matrix of `n_features` rows by
/// `n_frames` columns.
///
/// The view validates shape and finiteness once at construction so the
/// scoring code can index without further checks. A view with a single
/// frame is valid data; the two-frame minimum for segmentation is a run
/// precondition checked by the detector, not a view invariant.
#[derive(Clone, Copy, Debug)]
pub struct FeatureMatrixView<'a> {
    pub values: DTypeView<'a>,
    pub n_features: usize,
    pub n_frames: usize,
    pub layout: MatrixLayout,
}

impl<'a> FeatureMatrixView<'a> {
    /// Constructs a validated `FeatureMatrixView`.
    pub fn new(
        values: DTypeView<'a>,
        n_features: usize,
        n_frames: usize,
        layout: MatrixLayout,
    ) -> Result<Self, BicSegError> {
        if n_features == 0 {
            return Err(BicSegError::invalid_input("n_features must be >= 1"));
        }
        if n_frames == 0 {
            return Err(BicSegError::invalid_input("n_frames must be >= 1"));
        }

        let expected_len = n_features.checked_mul(n_frames).ok_or_else(|| {
            BicSegError::invalid_input("n_features*n_frames overflow while validating shape")
        })?;
        let value_len = values.len();
        if value_len != expected_len {
            return Err(BicSegError::invalid_input(format!(
                "value length mismatch: got {value_len}, expected {expected_len} \
                 (n_features={n_features}, n_frames={n_frames})"
            )));
        }

        let non_finite = match values {
            DTypeView::F32(slice) => slice
                .iter()
                .position(|v| !v.is_finite())
                .map(|idx| (idx, f64::from(slice[idx]))),
            DTypeView::F64(slice) => slice
                .iter()
                .position(|v| !v.is_finite())
                .map(|idx| (idx, slice[idx])),
        };
        if let Some((idx, value)) = non_finite {
            return Err(BicSegError::invalid_input(format!(
                "values must be finite: index {idx} has {value}"
            )));
        }

        Ok(Self {
            values,
            n_features,
            n_frames,
            layout,
        })
    }

    /// Convenience constructor for f32-backed data.
    pub fn from_f32(
        values: &'a [f32],
        n_features: usize,
        n_frames: usize,
        layout: MatrixLayout,
    ) -> Result<Self, BicSegError> {
        Self::new(DTypeView::F32(values), n_features, n_frames, layout)
    }

    /// Convenience constructor for f64-backed data.
    pub fn from_f64(
        values: &'a [f64],
        n_features: usize,
        n_frames: usize,
        layout: MatrixLayout,
    ) -> Result<Self, BicSegError> {
        Self::new(DTypeView::F64(values), n_features, n_frames, layout)
    }

    /// Reads one value, converting to f64.
    pub fn value(&self, feature: usize, frame: usize) -> f64 {
        let index = match self.layout {
            MatrixLayout::FeatureMajor => feature * self.n_frames + frame,
            MatrixLayout::FrameMajor => frame * self.n_features + feature,
        };
        self.values.get(index)
    }

    /// Copies the inclusive feature range `[i0, i1]` and frame range
    /// `[j0, j1]` into an owned window.
    ///
    /// Ranges are clamped to the matrix bounds; an inverted or fully
    /// out-of-range request yields an empty window rather than an error, so
    /// callers can treat "no data to score" uniformly.
    pub fn window(&self, i0: usize, i1: usize, j0: usize, j1: usize) -> FeatureWindow {
        if i0 >= self.n_features || j0 >= self.n_frames || i1 < i0 || j1 < j0 {
            return FeatureWindow::empty();
        }
        let i1 = i1.min(self.n_features - 1);
        let j1 = j1.min(self.n_frames - 1);

        let n_features = i1 - i0 + 1;
        let n_frames = j1 - j0 + 1;
        let mut values = Vec::with_capacity(n_features * n_frames);
        for feature in i0..=i1 {
            for frame in j0..=j1 {
                values.push(self.value(feature, frame));
            }
        }

        FeatureWindow {
            values,
            n_features,
            n_frames,
        }
    }

    /// Copies the inclusive frame range `[j0, j1]` across all features.
    pub fn frame_window(&self, j0: usize, j1: usize) -> FeatureWindow {
        self.window(0, self.n_features.saturating_sub(1), j0, j1)
    }
}

/// Owned feature-major sub-matrix used as a short-lived scoring buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureWindow {
    values: Vec<f64>,
    n_features: usize,
    n_frames: usize,
}

impl FeatureWindow {
    /// The zero-size window; scoreable but carries no evidence.
    pub fn empty() -> Self {
        Self {
            values: vec![],
            n_features: 0,
            n_frames: 0,
        }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_frames(&self) -> usize {
        self.n_frames
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value(&self, feature: usize, frame: usize) -> f64 {
        self.values[feature * self.n_frames + frame]
    }

    /// One feature's frames as a contiguous slice.
    pub fn feature_row(&self, feature: usize) -> &[f64] {
        let start = feature * self.n_frames;
        &self.values[start..start + self.n_frames]
    }

    /// Copies the inclusive frame range `[j0, j1]` of this window, with the
    /// same clamping/empty semantics as [`FeatureMatrixView::window`].
    pub fn frames(&self, j0: usize, j1: usize) -> FeatureWindow {
        if j0 >= self.n_frames || j1 < j0 {
            return FeatureWindow::empty();
        }
        let j1 = j1.min(self.n_frames - 1);

        let n_frames = j1 - j0 + 1;
        let mut values = Vec::with_capacity(self.n_features * n_frames);
        for feature in 0..self.n_features {
            let row = self.feature_row(feature);
            values.extend_from_slice(&row[j0..=j1]);
        }

        FeatureWindow {
            values,
            n_features: self.n_features,
            n_frames,
        }
    }
}
