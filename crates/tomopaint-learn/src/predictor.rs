//! Dense volume prediction: classify every voxel, shift back into the
//! reserved label space, reshape to the volume.

use ndarray::{Array3, ArrayView2};
use tracing::debug;

use tomopaint_core::errors::{LearnError, TomoResult};
use tomopaint_core::traits::IFittedModel;
use tomopaint_core::volume::VolumeShape;

/// Predict a label for every row of `features` and reshape to `shape`.
///
/// Output labels are `class + 1`, so they land in `[1, K]` for a K-class
/// model; label 0 stays reserved for unlabeled voxels and is never
/// produced here.
pub fn predict_volume(
    model: &dyn IFittedModel,
    features: ArrayView2<'_, f32>,
    shape: VolumeShape,
) -> TomoResult<Array3<i32>> {
    if features.nrows() != shape.num_voxels() {
        return Err(LearnError::DimensionMismatch {
            labels: features.nrows(),
            samples: shape.num_voxels(),
        }
        .into());
    }

    let classes = model.predict(features);
    let labels: Vec<i32> = classes.into_iter().map(|c| c as i32 + 1).collect();
    debug!(voxels = labels.len(), classes = model.num_classes(), "predicted volume");

    let volume = Array3::from_shape_vec((shape.z, shape.y, shape.x), labels)
        .map_err(|_| LearnError::DimensionMismatch {
            labels: shape.num_voxels(),
            samples: features.nrows(),
        })?;
    Ok(volume)
}
