//! Property tests: region write→read round trips at arbitrary offsets.

use ndarray::Array3;
use proptest::prelude::*;
use tempfile::TempDir;

use tomopaint_store::ChunkedArray;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_region_roundtrip(
        oz in 0usize..6, oy in 0usize..6, ox in 0usize..6,
        dz in 1usize..4, dy in 1usize..4, dx in 1usize..4,
        value in -100i32..100,
    ) {
        let tmp = TempDir::new().unwrap();
        let array =
            ChunkedArray::<i32>::open_or_create(tmp.path().join("a"), &[10, 10, 10], &[3, 3, 3])
                .unwrap();

        let block = Array3::from_elem((dz, dy, dx), value);
        array.write_region(&[oz, oy, ox], block.view().into_dyn()).unwrap();

        let back = array
            .read_region(&[oz..oz + dz, oy..oy + dy, ox..ox + dx])
            .unwrap();
        prop_assert!(back.iter().all(|&v| v == value));

        // Nothing outside the written region is disturbed.
        let full = array.read_region(&[0..10, 0..10, 0..10]).unwrap();
        let written: usize = dz * dy * dx;
        let nonzero = full.iter().filter(|&&v| v != 0).count();
        prop_assert!(nonzero <= written);
    }
}
