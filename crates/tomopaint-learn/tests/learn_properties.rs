//! Property tests over the weighting and prediction invariants.

use ndarray::Array2;
use proptest::prelude::*;

use tomopaint_core::config::ForestParams;
use tomopaint_core::traits::IClassifier;
use tomopaint_learn::{balanced_class_weights, RandomForestStrategy};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Weighted counts sum back to the total: for each present class,
    /// weight(c) * count(c) = n_total / n_present_classes.
    #[test]
    fn balanced_weights_redistribute_total_mass(
        classes in proptest::collection::vec(0u32..5, 1..200)
    ) {
        let weights = balanced_class_weights(&classes);
        let mut counts = vec![0usize; weights.len()];
        for &c in &classes {
            counts[c as usize] += 1;
        }
        let present = counts.iter().filter(|&&c| c > 0).count();
        let expected = classes.len() as f64 / present as f64;
        for (c, &count) in counts.iter().enumerate() {
            if count > 0 {
                let mass = weights[c] * count as f64;
                prop_assert!((mass - expected).abs() < 1e-9);
            } else {
                prop_assert_eq!(weights[c], 0.0);
            }
        }
    }

    /// Forest predictions always land inside the trained class space.
    #[test]
    fn forest_predictions_stay_in_class_space(
        classes in proptest::collection::vec(0u32..3, 4..40),
        queries in proptest::collection::vec(-10.0f32..10.0, 1..20),
    ) {
        let n = classes.len();
        let features = Array2::from_shape_fn((n, 2), |(row, col)| {
            classes[row] as f32 * 2.0 + (row + col) as f32 * 0.01
        });
        let weights = balanced_class_weights(&classes);
        let strategy = RandomForestStrategy::new(ForestParams {
            n_estimators: 5,
            max_depth: 4,
            max_samples: 0.5,
            min_samples_leaf: 1,
            seed: Some(9),
        });
        let model = strategy.fit(features.view(), &classes, &weights).unwrap();

        let query_rows = queries.len();
        let flat: Vec<f32> = queries.iter().flat_map(|&v| [v, -v]).collect();
        let query_features = Array2::from_shape_vec((query_rows, 2), flat).unwrap();
        for class in model.predict(query_features.view()) {
            prop_assert!((class as usize) < model.num_classes());
        }
    }
}
