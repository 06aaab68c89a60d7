//! Seam traits between the subsystems.

use ndarray::{Array2, Array3, ArrayView2};

use crate::errors::TomoResult;
use crate::labels::{AlignedHistograms, ClassHistogram};
use crate::volume::{SpatialMask, VolumeShape};

/// Mutable label array under a single writer-exclusion contract.
///
/// Every mutation source (paint brush, prediction write-back, background
/// estimation) goes through an implementation of this trait; the
/// implementation serializes writers so concurrent mutation sources
/// cannot interleave within one operation.
pub trait ILabelStore: Send + Sync {
    fn shape(&self) -> VolumeShape;

    /// Read the labels covered by `mask`, shaped like the mask extent.
    fn read_region(&self, mask: &SpatialMask) -> TomoResult<Array3<i32>>;

    /// Read the whole label volume.
    fn read_all(&self) -> TomoResult<Array3<i32>> {
        self.read_region(&SpatialMask::full(self.shape()))
    }

    /// Write one voxel's label.
    fn write_voxel(&self, z: usize, y: usize, x: usize, label: i32) -> TomoResult<()>;

    /// Write the same label into a batch of voxels under one lock hold.
    fn write_voxels(&self, voxels: &[[usize; 3]], label: i32) -> TomoResult<()>;

    /// Overwrite the whole array. The prediction labels are replaced
    /// wholesale on each completed cycle, never patched incrementally.
    fn replace_all(&self, labels: &Array3<i32>) -> TomoResult<()>;

    /// Per-class voxel counts over the whole array.
    fn class_histogram(&self) -> TomoResult<ClassHistogram>;
}

/// One precomputed per-voxel feature set, read-only.
pub trait IFeatureArray: Send + Sync {
    /// Spatial shape; must equal the volume's shape (validated at open).
    fn spatial_shape(&self) -> VolumeShape;

    /// Feature vector length per voxel.
    fn feature_dim(&self) -> usize;

    /// Features over `mask` with spatial axes flattened in C order:
    /// shape `(voxels_in_mask, feature_dim)`.
    fn read_flat(&self, mask: &SpatialMask) -> TomoResult<Array2<f32>>;
}

/// A fitted classifier. Opaque to the orchestrator, replaced atomically
/// on each successful fit; lives only in process memory.
pub trait IFittedModel: std::fmt::Debug + Send + Sync {
    /// Number of classes in the 0-based training class space.
    fn num_classes(&self) -> usize;

    /// Per-row 0-based class index. Deterministic for a fixed model.
    fn predict(&self, features: ArrayView2<'_, f32>) -> Vec<u32>;
}

/// Uniform classifier strategy contract: adding an algorithm never
/// touches the orchestrator.
pub trait IClassifier: Send + Sync {
    /// Fit on already-filtered rows: `classes` are 0-based (label 0 never
    /// reaches a strategy), `class_weights[c]` is the balanced weight for
    /// class `c`.
    fn fit(
        &self,
        features: ArrayView2<'_, f32>,
        classes: &[u32],
        class_weights: &[f64],
    ) -> TomoResult<Box<dyn IFittedModel>>;
}

/// Where the engine reports progress: a status line plus the aligned
/// class-distribution datasets. Rendering is the host's concern.
pub trait IStatusSink: Send + Sync {
    fn set_status(&self, text: &str);
    fn update_histograms(&self, histograms: &AlignedHistograms);
}

/// No-op sink for tests and headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStatusSink;

impl IStatusSink for NullStatusSink {
    fn set_status(&self, _text: &str) {}
    fn update_histograms(&self, _histograms: &AlignedHistograms) {}
}
