//! Feature fetching across the two precomputed feature sets.

use std::sync::Arc;

use ndarray::{concatenate, Array2, Axis};
use tracing::debug;

use tomopaint_core::errors::{FeatureError, StoreError, TomoResult};
use tomopaint_core::labels::{FeatureSelection, FeatureSetId};
use tomopaint_core::traits::IFeatureArray;
use tomopaint_core::volume::SpatialMask;

/// Fetches per-voxel features over a mask, concatenating the selected
/// sets along the feature axis. Both sets share the volume's spatial
/// shape; that invariant is validated when the dataset is opened, not
/// re-checked per call.
pub struct FeatureProvider {
    intensity: Arc<dyn IFeatureArray>,
    embedding: Arc<dyn IFeatureArray>,
}

impl FeatureProvider {
    pub fn new(intensity: Arc<dyn IFeatureArray>, embedding: Arc<dyn IFeatureArray>) -> Self {
        Self { intensity, embedding }
    }

    fn set(&self, id: FeatureSetId) -> &dyn IFeatureArray {
        match id {
            FeatureSetId::Intensity => self.intensity.as_ref(),
            FeatureSetId::Embedding => self.embedding.as_ref(),
        }
    }

    /// Combined feature width for a selection.
    pub fn total_dim(&self, selection: FeatureSelection) -> usize {
        selection.sets().iter().map(|&s| self.set(s).feature_dim()).sum()
    }

    /// Features over `mask`: shape `(voxels_in_mask, total_feature_dim)`.
    ///
    /// Errors with [`FeatureError::NoFeatureSetSelected`] when the
    /// selection is empty; that is a configuration error, not a skip.
    pub fn fetch(
        &self,
        mask: &SpatialMask,
        selection: FeatureSelection,
    ) -> TomoResult<Array2<f32>> {
        let sets = selection.sets();
        if sets.is_empty() {
            return Err(FeatureError::NoFeatureSetSelected.into());
        }

        let mut parts = Vec::with_capacity(sets.len());
        for id in &sets {
            parts.push(self.set(*id).read_flat(mask)?);
        }
        let views: Vec<_> = parts.iter().map(Array2::view).collect();
        let combined = concatenate(Axis(1), &views).map_err(|e| StoreError::ShapeMismatch {
            expected: "matching row counts across feature sets".to_string(),
            actual: e.to_string(),
        })?;
        debug!(mask = %mask, rows = combined.nrows(), dim = combined.ncols(), "features fetched");
        Ok(combined)
    }
}
