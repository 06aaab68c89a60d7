//! Property tests over scope resolution.

use proptest::prelude::*;

use tomopaint_core::volume::{RegionScope, ViewRect, VolumeShape};
use tomopaint_features::resolve;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Whatever the view, the resolved mask fits inside the volume.
    #[test]
    fn resolved_masks_stay_in_bounds(
        z in 1usize..16, y in 1usize..32, x in 1usize..32,
        plane in 0usize..24,
        min_y in 0usize..40, height in 0usize..40,
        min_x in 0usize..40, width in 0usize..40,
    ) {
        let shape = VolumeShape::new(z, y, x);
        let rect = ViewRect::new(min_y, min_x, min_y + height, min_x + width).unwrap();
        let mask = resolve(&RegionScope::CurrentView { plane, rect }, shape);
        prop_assert!(mask.check_within(shape).is_ok());
        prop_assert!(mask.z.len() <= 1);
    }

    /// Whole-volume scope covers every voxel exactly once.
    #[test]
    fn whole_volume_covers_everything(z in 1usize..16, y in 1usize..32, x in 1usize..32) {
        let shape = VolumeShape::new(z, y, x);
        let mask = resolve(&RegionScope::WholeVolume, shape);
        prop_assert_eq!(mask.num_voxels(), shape.num_voxels());
        prop_assert_eq!(mask.shape(), shape);
    }
}
