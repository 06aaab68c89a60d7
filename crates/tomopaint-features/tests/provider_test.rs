//! Feature provider: concatenation width, selection errors.

use std::sync::Arc;

use ndarray::Array4;

use tomopaint_core::errors::{FeatureError, TomoError};
use tomopaint_core::labels::FeatureSelection;
use tomopaint_core::volume::{RegionScope, SpatialMask, ViewRect, VolumeShape};
use tomopaint_features::{resolve, FeatureProvider, MemoryFeatureArray};

fn provider(intensity_dim: usize, embedding_dim: usize) -> FeatureProvider {
    let intensity = Array4::from_elem((4, 10, 10, intensity_dim), 1.0f32);
    let embedding = Array4::from_elem((4, 10, 10, embedding_dim), 2.0f32);
    FeatureProvider::new(
        Arc::new(MemoryFeatureArray::new(intensity)),
        Arc::new(MemoryFeatureArray::new(embedding)),
    )
}

#[test]
fn concatenated_width_is_sum_of_dims() {
    let provider = provider(8, 32);
    let mask = SpatialMask::full(VolumeShape::new(4, 10, 10));
    let features = provider.fetch(&mask, FeatureSelection::ALL).unwrap();
    assert_eq!(features.dim(), (400, 40));
    // Intensity columns first, embedding columns after.
    assert_eq!(features[[0, 0]], 1.0);
    assert_eq!(features[[0, 8]], 2.0);
}

#[test]
fn single_set_selection_uses_that_set_only() {
    let provider = provider(8, 32);
    let mask = SpatialMask::full(VolumeShape::new(4, 10, 10));
    let features = provider.fetch(&mask, FeatureSelection::EMBEDDING_ONLY).unwrap();
    assert_eq!(features.dim(), (400, 32));
    assert_eq!(provider.total_dim(FeatureSelection::EMBEDDING_ONLY), 32);
}

#[test]
fn empty_selection_is_a_configuration_error() {
    let provider = provider(8, 32);
    let mask = SpatialMask::full(VolumeShape::new(4, 10, 10));
    let none = FeatureSelection { intensity: false, embedding: false };
    let err = provider.fetch(&mask, none).unwrap_err();
    assert!(matches!(err, TomoError::Feature(FeatureError::NoFeatureSetSelected)));
}

#[test]
fn view_scope_fetches_one_plane() {
    let provider = provider(4, 4);
    let rect = ViewRect::new(2, 2, 6, 8).unwrap();
    let mask = resolve(
        &RegionScope::CurrentView { plane: 1, rect },
        VolumeShape::new(4, 10, 10),
    );
    let features = provider.fetch(&mask, FeatureSelection::ALL).unwrap();
    assert_eq!(features.dim(), (24, 8));
}
