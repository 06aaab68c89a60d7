//! Property tests over masks and histogram alignment.

use proptest::prelude::*;

use tomopaint_core::labels::ClassHistogram;
use tomopaint_core::volume::{SpatialMask, VolumeShape};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A clamped mask always fits the volume, and clamping is idempotent.
    #[test]
    fn clamped_masks_fit_the_volume(
        z in 1usize..32, y in 1usize..32, x in 1usize..32,
        z0 in 0usize..48, z1 in 0usize..48,
        y0 in 0usize..48, y1 in 0usize..48,
        x0 in 0usize..48, x1 in 0usize..48,
    ) {
        let shape = VolumeShape::new(z, y, x);
        let mask = SpatialMask::new(
            z0.min(z1)..z0.max(z1),
            y0.min(y1)..y0.max(y1),
            x0.min(x1)..x0.max(x1),
        );
        let clamped = mask.clamp_to(shape);
        prop_assert!(clamped.check_within(shape).is_ok());
        prop_assert_eq!(clamped.clamp_to(shape), clamped);
    }

    /// Alignment always carries class 0, keeps both count vectors on the
    /// shared axis, and preserves each side's totals.
    #[test]
    fn histogram_alignment_preserves_totals(
        painting in proptest::collection::vec(0i32..6, 0..200),
        prediction in proptest::collection::vec(1i32..6, 0..200),
    ) {
        let a = ClassHistogram::from_labels(painting.iter().copied());
        let b = ClassHistogram::from_labels(prediction.iter().copied());
        let aligned = ClassHistogram::align(&a, &b);

        prop_assert!(aligned.labels.contains(&0));
        prop_assert_eq!(aligned.labels.len(), aligned.painting_counts.len());
        prop_assert_eq!(aligned.labels.len(), aligned.prediction_counts.len());
        prop_assert_eq!(
            aligned.painting_counts.iter().sum::<u64>(),
            painting.len() as u64
        );
        prop_assert_eq!(
            aligned.prediction_counts.iter().sum::<u64>(),
            prediction.len() as u64
        );
    }
}
