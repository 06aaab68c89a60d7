//! Background estimation over a dataset with a known distance
//! distribution.

use std::sync::Arc;

use ndarray::{Array3, Array4};
use tempfile::TempDir;

use tomopaint_core::config::TomopaintConfig;
use tomopaint_core::traits::{ILabelStore, NullStatusSink};
use tomopaint_engine::AnnotationEngine;
use tomopaint_store::{ChunkedArray, VolumeDataset};

const SHAPE: [usize; 3] = [4, 6, 6];

/// One-dimensional embedding holding each voxel's flat index. The median
/// over 144 voxels is 71.5, so the two voxels at indices 71 and 72 sit
/// closest to it (distance 0.5 each); the 1st-percentile threshold lands
/// between them and the next pair.
fn build_dataset(tmp: &TempDir) -> Arc<VolumeDataset> {
    let config = TomopaintConfig::default();
    let root = tmp.path();
    let [z, y, x] = SHAPE;

    let image = Array3::<f32>::zeros((z, y, x));
    let image_array = ChunkedArray::<f32>::open_or_create(
        root.join(&config.store.image_key),
        &[z, y, x],
        &[z, y, x],
    )
    .unwrap();
    image_array.write_region(&[0, 0, 0], image.view().into_dyn()).unwrap();

    for (key, dim) in [(&config.store.intensity_key, 1), (&config.store.embedding_key, 1)] {
        let data = Array4::from_shape_fn((z, y, x, dim), |(iz, iy, ix, _)| {
            (iz * y * x + iy * x + ix) as f32
        });
        let array = ChunkedArray::<f32>::open_or_create(
            root.join(key),
            &[z, y, x, dim],
            &[z, y, x, dim],
        )
        .unwrap();
        array.write_region(&[0, 0, 0, 0], data.view().into_dyn()).unwrap();
    }

    Arc::new(VolumeDataset::open(root, &config.store).unwrap())
}

#[test]
fn estimation_paints_the_most_median_like_voxels() {
    let tmp = TempDir::new().unwrap();
    let dataset = build_dataset(&tmp);
    let engine =
        AnnotationEngine::new(dataset, TomopaintConfig::default(), Arc::new(NullStatusSink))
            .unwrap();

    let report = engine.estimate_background().unwrap();
    assert_eq!(report.voxels_labeled, 2);
    assert!(report.threshold > 0.5 && report.threshold < 1.5, "threshold {}", report.threshold);

    // Flat indices 71 and 72 in a (4, 6, 6) volume.
    let painting = engine.dataset().painting().read_all().unwrap();
    assert_eq!(painting[[1, 5, 5]], 1);
    assert_eq!(painting[[2, 0, 0]], 1);

    let histogram = engine.dataset().painting().class_histogram().unwrap();
    assert_eq!(histogram.count(1), 2);
    assert_eq!(histogram.labeled_total(), 2);
}

#[test]
fn estimation_overwrites_prior_paint_below_threshold() {
    let tmp = TempDir::new().unwrap();
    let dataset = build_dataset(&tmp);
    let engine =
        AnnotationEngine::new(dataset, TomopaintConfig::default(), Arc::new(NullStatusSink))
            .unwrap();

    engine.paint(&[[1, 5, 5]], 4).unwrap();
    engine.estimate_background().unwrap();

    let painting = engine.dataset().painting().read_all().unwrap();
    assert_eq!(painting[[1, 5, 5]], 1, "estimation reclaims below-threshold voxels");
}

#[test]
fn repeated_estimation_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let dataset = build_dataset(&tmp);
    let engine =
        AnnotationEngine::new(dataset, TomopaintConfig::default(), Arc::new(NullStatusSink))
            .unwrap();

    let first = engine.estimate_background().unwrap();
    let second = engine.estimate_background().unwrap();
    assert_eq!(first.voxels_labeled, second.voxels_labeled);

    let histogram = engine.dataset().painting().class_histogram().unwrap();
    assert_eq!(histogram.count(1), 2);
}
