//! Label array behind the single writer-exclusion lock.
//!
//! Paint strokes, prediction write-back, and background estimation all
//! mutate label arrays through this type, so two mutation sources can
//! never interleave inside one operation.

use std::collections::HashMap;
use std::ops::Range;
use std::path::PathBuf;

use ndarray::{Array3, Ix3};
use parking_lot::RwLock;
use tracing::debug;

use tomopaint_core::errors::{StoreError, TomoResult};
use tomopaint_core::labels::ClassHistogram;
use tomopaint_core::traits::ILabelStore;
use tomopaint_core::volume::{SpatialMask, VolumeShape};

use crate::chunked::ChunkedArray;

pub struct LabelStore {
    array: RwLock<ChunkedArray<i32>>,
    shape: VolumeShape,
}

impl LabelStore {
    /// Open a label array, creating it on first access.
    pub fn open_or_create(
        dir: impl Into<PathBuf>,
        shape: VolumeShape,
        chunk_edge: usize,
    ) -> Result<Self, StoreError> {
        let chunks: Vec<usize> = shape
            .as_array()
            .iter()
            .map(|&len| chunk_edge.min(len).max(1))
            .collect();
        let array = ChunkedArray::open_or_create(dir, &shape.as_array(), &chunks)?;
        Ok(Self { array: RwLock::new(array), shape })
    }

    fn mask_region(mask: &SpatialMask) -> [Range<usize>; 3] {
        [mask.z.clone(), mask.y.clone(), mask.x.clone()]
    }
}

impl ILabelStore for LabelStore {
    fn shape(&self) -> VolumeShape {
        self.shape
    }

    fn read_region(&self, mask: &SpatialMask) -> TomoResult<Array3<i32>> {
        mask.check_within(self.shape)?;
        let array = self.array.read();
        let region = Self::mask_region(mask);
        let data = array.read_region(&region)?;
        let data = data.into_dimensionality::<Ix3>().map_err(|e| StoreError::ShapeMismatch {
            expected: "3-dimensional label array".to_string(),
            actual: e.to_string(),
        })?;
        Ok(data)
    }

    fn write_voxel(&self, z: usize, y: usize, x: usize, label: i32) -> TomoResult<()> {
        self.write_voxels(&[[z, y, x]], label)
    }

    fn write_voxels(&self, voxels: &[[usize; 3]], label: i32) -> TomoResult<()> {
        let array = self.array.write();
        let chunks = array.chunk_shape().to_vec();
        // Group voxels by owning chunk so each chunk file is
        // read-modify-written once per batch, not once per voxel.
        let mut by_chunk: HashMap<[usize; 3], Vec<[usize; 3]>> = HashMap::new();
        for &v in voxels {
            if !self.shape.contains(v[0], v[1], v[2]) {
                return Err(StoreError::ShapeMismatch {
                    expected: self.shape.to_string(),
                    actual: format!("voxel {v:?}"),
                }
                .into());
            }
            let key = [v[0] / chunks[0], v[1] / chunks[1], v[2] / chunks[2]];
            by_chunk.entry(key).or_default().push(v);
        }
        for (chunk_idx, group) in by_chunk {
            let origin: Vec<usize> =
                chunk_idx.iter().zip(&chunks).map(|(&i, &c)| i * c).collect();
            let extent: Vec<Range<usize>> = origin
                .iter()
                .zip(&chunks)
                .zip(self.shape.as_array())
                .map(|((&o, &c), len)| o..(o + c).min(len))
                .collect();
            let mut block = array.read_region(&extent)?;
            for v in group {
                block[[v[0] - origin[0], v[1] - origin[1], v[2] - origin[2]]] = label;
            }
            array.write_region(&origin, block.view())?;
        }
        Ok(())
    }

    fn replace_all(&self, labels: &Array3<i32>) -> TomoResult<()> {
        let actual = VolumeShape::from([labels.shape()[0], labels.shape()[1], labels.shape()[2]]);
        if actual != self.shape {
            return Err(StoreError::ShapeMismatch {
                expected: self.shape.to_string(),
                actual: actual.to_string(),
            }
            .into());
        }
        let array = self.array.write();
        array.write_region(&[0, 0, 0], labels.view().into_dyn())?;
        debug!(shape = %self.shape, "label array replaced");
        Ok(())
    }

    fn class_histogram(&self) -> TomoResult<ClassHistogram> {
        let all = self.read_all()?;
        Ok(ClassHistogram::from_labels(all.iter().copied()))
    }
}
