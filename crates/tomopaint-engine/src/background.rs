//! Background estimation: voxels whose embedding sits unusually close to
//! the volume-wide median embedding are painted as background.
//!
//! The distance threshold is a low percentile of the distance
//! distribution, so only the most median-like voxels are labeled; the
//! percentile is configurable and deliberately conservative.

use std::sync::atomic::Ordering;

use ndarray::Array2;
use rayon::prelude::*;
use tracing::info;

use tomopaint_core::constants::LABEL_BACKGROUND;
use tomopaint_core::errors::{EngineError, TomoResult};
use tomopaint_core::labels::FeatureSetId;
use tomopaint_core::traits::{IFeatureArray, ILabelStore};
use tomopaint_core::volume::SpatialMask;

use crate::engine::{AnnotationEngine, EngineCore};

/// Outcome of one estimation pass.
#[derive(Debug, Clone, Copy)]
pub struct BackgroundReport {
    /// Voxels painted with the background label.
    pub voxels_labeled: usize,
    /// Distance below which a voxel counts as background.
    pub threshold: f32,
}

impl AnnotationEngine {
    /// Estimate background labels from the embedding features and paint
    /// them. At most one estimation runs at a time; a second call while
    /// one is in flight errors with
    /// [`EngineError::EstimationInProgress`]. On success the painted
    /// labels restart the debounce window like any brush stroke.
    pub fn estimate_background(&self) -> TomoResult<BackgroundReport> {
        let report = self.core().estimate_background()?;
        self.trigger_refit();
        Ok(report)
    }
}

impl EngineCore {
    pub(crate) fn estimate_background(&self) -> TomoResult<BackgroundReport> {
        if self.estimating.swap(true, Ordering::SeqCst) {
            return Err(EngineError::EstimationInProgress.into());
        }
        let result = self.estimate_background_inner();
        self.estimating.store(false, Ordering::SeqCst);
        result
    }

    fn estimate_background_inner(&self) -> TomoResult<BackgroundReport> {
        self.sink.set_status("Estimating background ...");
        let shape = self.dataset.shape();
        let embedding = self.dataset.feature_set(FeatureSetId::Embedding);
        let flat = embedding.read_flat(&SpatialMask::full(shape))?;

        let median = column_medians(&flat);
        let distances: Vec<f32> = (0..flat.nrows())
            .into_par_iter()
            .map(|i| {
                flat.row(i)
                    .iter()
                    .zip(&median)
                    .map(|(&v, &m)| {
                        let d = v - m;
                        d * d
                    })
                    .sum::<f32>()
                    .sqrt()
            })
            .collect();

        let threshold = percentile(&distances, self.config.background_percentile);
        let voxels: Vec<[usize; 3]> = distances
            .iter()
            .enumerate()
            .filter(|(_, &d)| d < threshold)
            .map(|(flat_idx, _)| unflatten(flat_idx, shape.y, shape.x))
            .collect();

        log_distance_stats(&distances, threshold);
        info!(voxels = voxels.len(), "painting background voxels");
        self.dataset.painting().write_voxels(&voxels, LABEL_BACKGROUND)?;
        self.sink.set_status("Ready");
        Ok(BackgroundReport { voxels_labeled: voxels.len(), threshold })
    }
}

fn unflatten(flat: usize, y_len: usize, x_len: usize) -> [usize; 3] {
    let x = flat % x_len;
    let rest = flat / x_len;
    [rest / y_len, rest % y_len, x]
}

fn column_medians(flat: &Array2<f32>) -> Vec<f32> {
    (0..flat.ncols())
        .into_par_iter()
        .map(|col| {
            let mut values: Vec<f32> = flat.column(col).to_vec();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let n = values.len();
            if n == 0 {
                0.0
            } else if n % 2 == 1 {
                values[n / 2]
            } else {
                (values[n / 2 - 1] + values[n / 2]) / 2.0
            }
        })
        .collect()
}

/// Linear-interpolation percentile over an unsorted sample, `p` in
/// [0, 100].
fn percentile(values: &[f32], p: f64) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = (rank - lo as f64) as f32;
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }
}

fn log_distance_stats(distances: &[f32], threshold: f32) {
    if distances.is_empty() {
        return;
    }
    let min = distances.iter().cloned().fold(f32::INFINITY, f32::min);
    let max = distances.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let mean = distances.iter().sum::<f32>() / distances.len() as f32;
    let median = percentile(distances, 50.0);
    info!(min, max, mean, median, threshold, "embedding distance distribution");
}
