// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use bicseg_core::{FeatureMatrixView, MatrixLayout, validate_boundaries};
use bicseg_offline::{BicSegConfig, BicSegmenter, change_search};
use bicseg_offline::gaussian::log_det;
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

const MIN_PROPTEST_CASES: u32 = 1000;

fn proptest_cases() -> u32 {
    std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .map(|parsed| parsed.max(MIN_PROPTEST_CASES))
        .unwrap_or(MIN_PROPTEST_CASES)
}

fn univariate(values: &[f64]) -> FeatureMatrixView<'_> {
    FeatureMatrixView::from_f64(values, 1, values.len(), MatrixLayout::FeatureMajor)
        .expect("generated view should be valid")
}

fn config_strategy() -> impl Strategy<Value = BicSegConfig> {
    (4usize..40, 1usize..6, 4usize..40, 1usize..6, 0.5f64..3.0).prop_map(
        |(coarse_size, coarse_inc, fine_size, fine_inc, penalty_weight)| BicSegConfig {
            coarse_size,
            coarse_inc,
            fine_size,
            fine_inc,
            penalty_weight,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: proptest_cases(),
        max_shrink_iters: 1024,
        failure_persistence: Some(Box::new(FileFailurePersistence::Direct("proptest-regressions/tests/proptest_invariants.txt"))),
        .. ProptestConfig::default()
    })]

    #[test]
    fn segmentation_output_respects_the_result_contract(
        values in prop::collection::vec(-50.0f64..50.0, 24..96),
        config in config_strategy(),
    ) {
        let n = values.len();
        let view = univariate(&values);
        let segmenter = BicSegmenter::new(config).expect("generated config should be valid");

        let result = segmenter
            .segment(&view)
            .expect("segmentation of finite input should succeed");

        validate_boundaries(n, &result.boundaries).expect("boundary contract must hold");
        prop_assert_eq!(result.boundaries.len(), result.scores.len());
        prop_assert!(result.scores.iter().all(|score| score.is_finite()));
        prop_assert!(result.scores.iter().all(|&score| score <= 0.0));
        prop_assert_eq!(result.n_frames, n);
    }

    #[test]
    fn segmentation_is_deterministic(
        values in prop::collection::vec(-10.0f64..10.0, 24..72),
        config in config_strategy(),
    ) {
        let view = univariate(&values);
        let segmenter = BicSegmenter::new(config).expect("generated config should be valid");

        let first = segmenter.segment(&view).expect("first run should succeed");
        let second = segmenter.segment(&view).expect("second run should succeed");

        prop_assert_eq!(&first.boundaries, &second.boundaries);
        prop_assert_eq!(&first.bic_trace, &second.bic_trace);
        let first_bits: Vec<u64> = first.scores.iter().map(|s| s.to_bits()).collect();
        let second_bits: Vec<u64> = second.scores.iter().map(|s| s.to_bits()).collect();
        prop_assert_eq!(first_bits, second_bits);
    }

    #[test]
    fn change_scan_split_and_trace_respect_their_bounds(
        values in prop::collection::vec(-50.0f64..50.0, 4..80),
        inc in 1usize..8,
        origin in 0usize..500,
        weight in 0.5f64..3.0,
    ) {
        let view = univariate(&values);
        let m = values.len();
        let window = view.frame_window(0, m - 1);

        let scan = change_search(&window, inc, origin, weight)
            .expect("scan of finite input should succeed");

        let expected_candidates = if m >= 2 * inc { (m - 2 * inc) / inc + 1 } else { 0 };
        prop_assert_eq!(scan.trace.len(), expected_candidates);

        if let Some(boundary) = scan.boundary {
            prop_assert!(boundary >= origin + inc - 1);
            prop_assert!(boundary <= origin + m - inc - 1);
            prop_assert!(scan.d_min <= 0.0);
        }
        if expected_candidates == 0 {
            prop_assert_eq!(scan.boundary, None);
            prop_assert_eq!(scan.d_min, f64::MAX);
        }
    }

    #[test]
    fn log_det_is_invariant_to_frame_reordering(
        raw in prop::collection::vec(-20i32..=20, 2..64),
        rotation in 0usize..64,
    ) {
        // Integer-valued frames keep the sum and sum-of-squares exact, so
        // reordering cannot even perturb the accumulation round-off.
        let values: Vec<f64> = raw.iter().map(|&v| f64::from(v)).collect();
        let m = values.len();
        let mut rotated = values.clone();
        rotated.rotate_left(rotation % m);
        let mut reversed = values.clone();
        reversed.reverse();

        let base = log_det(&univariate(&values).frame_window(0, m - 1));
        let after_rotation = log_det(&univariate(&rotated).frame_window(0, m - 1));
        let after_reversal = log_det(&univariate(&reversed).frame_window(0, m - 1));

        prop_assert_eq!(base.to_bits(), after_rotation.to_bits());
        prop_assert_eq!(base.to_bits(), after_reversal.to_bits());
    }

    #[test]
    fn homogeneous_constant_input_never_produces_boundaries(
        value in -25.0f64..25.0,
        n in 24usize..128,
        config in config_strategy(),
    ) {
        let values = vec![value; n];
        let view = univariate(&values);
        let segmenter = BicSegmenter::new(config).expect("generated config should be valid");

        let result = segmenter.segment(&view).expect("segment should succeed");
        prop_assert!(result.boundaries.is_empty());
        prop_assert!(result.scores.is_empty());
    }
}
