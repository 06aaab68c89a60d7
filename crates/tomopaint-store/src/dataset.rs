//! The dataset bundle: one root directory holding the read-only image and
//! feature arrays plus the two mutable label arrays.

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ndarray::Array2;
use tracing::info;

use tomopaint_core::config::StoreConfig;
use tomopaint_core::errors::{FeatureError, StoreError, TomoResult};
use tomopaint_core::labels::FeatureSetId;
use tomopaint_core::traits::IFeatureArray;
use tomopaint_core::volume::{SpatialMask, VolumeShape};

use crate::chunked::ChunkedArray;
use crate::label_store::LabelStore;

/// One read-only precomputed feature array, (Z, Y, X, F).
pub struct FeatureArray {
    array: ChunkedArray<f32>,
    spatial: VolumeShape,
    dim: usize,
}

impl FeatureArray {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let array = ChunkedArray::open(dir)?;
        let shape = array.shape();
        if shape.len() != 4 {
            return Err(StoreError::MetadataInvalid {
                path: array.path().display().to_string(),
                reason: format!("feature array must be 4-dimensional, got rank {}", shape.len()),
            });
        }
        let spatial = VolumeShape::new(shape[0], shape[1], shape[2]);
        let dim = shape[3];
        Ok(Self { array, spatial, dim })
    }
}

impl IFeatureArray for FeatureArray {
    fn spatial_shape(&self) -> VolumeShape {
        self.spatial
    }

    fn feature_dim(&self) -> usize {
        self.dim
    }

    fn read_flat(&self, mask: &SpatialMask) -> TomoResult<Array2<f32>> {
        mask.check_within(self.spatial)?;
        let region: [Range<usize>; 4] =
            [mask.z.clone(), mask.y.clone(), mask.x.clone(), 0..self.dim];
        let block = self.array.read_region(&region)?;
        let rows = mask.num_voxels();
        let flat = block
            .into_shape_with_order((rows, self.dim))
            .map_err(|e| StoreError::ShapeMismatch {
                expected: format!("({rows}, {})", self.dim),
                actual: e.to_string(),
            })?;
        Ok(flat)
    }
}

/// All arrays of one annotation session under a single root path.
///
/// Image and features are loaded once and never mutated; painting persists
/// across sessions; prediction is derived and fully recomputed each cycle.
pub struct VolumeDataset {
    root: PathBuf,
    shape: VolumeShape,
    image: ChunkedArray<f32>,
    intensity: Arc<FeatureArray>,
    embedding: Arc<FeatureArray>,
    painting: Arc<LabelStore>,
    prediction: Arc<LabelStore>,
}

impl VolumeDataset {
    /// Open a dataset root. The image and feature arrays must exist;
    /// painting and prediction label arrays are created on first access.
    pub fn open(root: impl Into<PathBuf>, config: &StoreConfig) -> TomoResult<Self> {
        let root = root.into();
        let image = ChunkedArray::<f32>::open(root.join(&config.image_key))?;
        if image.shape().len() != 3 {
            return Err(StoreError::MetadataInvalid {
                path: image.path().display().to_string(),
                reason: format!("image must be 3-dimensional, got rank {}", image.shape().len()),
            }
            .into());
        }
        let shape = VolumeShape::from([image.shape()[0], image.shape()[1], image.shape()[2]]);

        let intensity = FeatureArray::open(root.join(&config.intensity_key))?;
        let embedding = FeatureArray::open(root.join(&config.embedding_key))?;
        for (set, arr) in [
            (FeatureSetId::Intensity, &intensity),
            (FeatureSetId::Embedding, &embedding),
        ] {
            if arr.spatial_shape() != shape {
                return Err(FeatureError::SpatialShapeMismatch {
                    set: set.to_string(),
                    expected: shape.to_string(),
                    actual: arr.spatial_shape().to_string(),
                }
                .into());
            }
        }

        let painting = LabelStore::open_or_create(
            root.join(&config.painting_key),
            shape,
            config.chunk_edge,
        )?;
        let prediction = LabelStore::open_or_create(
            root.join(&config.prediction_key),
            shape,
            config.chunk_edge,
        )?;

        info!(
            root = %root.display(),
            shape = %shape,
            intensity_dim = intensity.feature_dim(),
            embedding_dim = embedding.feature_dim(),
            "dataset opened"
        );
        Ok(Self {
            root,
            shape,
            image,
            intensity: Arc::new(intensity),
            embedding: Arc::new(embedding),
            painting: Arc::new(painting),
            prediction: Arc::new(prediction),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn shape(&self) -> VolumeShape {
        self.shape
    }

    pub fn image(&self) -> &ChunkedArray<f32> {
        &self.image
    }

    pub fn feature_set(&self, set: FeatureSetId) -> Arc<FeatureArray> {
        match set {
            FeatureSetId::Intensity => Arc::clone(&self.intensity),
            FeatureSetId::Embedding => Arc::clone(&self.embedding),
        }
    }

    pub fn painting(&self) -> Arc<LabelStore> {
        Arc::clone(&self.painting)
    }

    pub fn prediction(&self) -> Arc<LabelStore> {
        Arc::clone(&self.prediction)
    }
}
