//! In-memory feature array, for hosts that compute features on the fly
//! and for tests.

use ndarray::{s, Array2, Array4};

use tomopaint_core::errors::{StoreError, TomoResult};
use tomopaint_core::traits::IFeatureArray;
use tomopaint_core::volume::{SpatialMask, VolumeShape};

/// A (Z, Y, X, F) feature volume held in memory.
pub struct MemoryFeatureArray {
    data: Array4<f32>,
    spatial: VolumeShape,
}

impl MemoryFeatureArray {
    pub fn new(data: Array4<f32>) -> Self {
        let spatial = VolumeShape::new(data.shape()[0], data.shape()[1], data.shape()[2]);
        Self { data, spatial }
    }
}

impl IFeatureArray for MemoryFeatureArray {
    fn spatial_shape(&self) -> VolumeShape {
        self.spatial
    }

    fn feature_dim(&self) -> usize {
        self.data.shape()[3]
    }

    fn read_flat(&self, mask: &SpatialMask) -> TomoResult<Array2<f32>> {
        mask.check_within(self.spatial)?;
        let dim = self.feature_dim();
        let block = self
            .data
            .slice(s![mask.z.clone(), mask.y.clone(), mask.x.clone(), ..])
            .to_owned();
        let rows = mask.num_voxels();
        block
            .into_shape_with_order((rows, dim))
            .map_err(|e| StoreError::ShapeMismatch {
                expected: format!("({rows}, {dim})"),
                actual: e.to_string(),
            })
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    #[test]
    fn read_flat_flattens_in_c_order() {
        // Feature value encodes the flat voxel index, so row i must hold i.
        let shape = (2, 3, 4, 2);
        let data = Array4::from_shape_fn(shape, |(z, y, x, f)| {
            let flat = (z * 3 * 4 + y * 4 + x) as f32;
            flat * 10.0 + f as f32
        });
        let arr = MemoryFeatureArray::new(data);
        let mask = SpatialMask::full(arr.spatial_shape());
        let flat = arr.read_flat(&mask).unwrap();
        assert_eq!(flat.dim(), (24, 2));
        for i in 0..24 {
            assert_eq!(flat[[i, 0]], i as f32 * 10.0);
            assert_eq!(flat[[i, 1]], i as f32 * 10.0 + 1.0);
        }
    }
}
