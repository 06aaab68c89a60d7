//! Training orchestration: label filtering, class-space shift, balanced
//! weights, strategy dispatch.

use std::sync::Arc;

use ndarray::{Array3, ArrayView2, Axis};
use tracing::info;

use tomopaint_core::config::LearnConfig;
use tomopaint_core::errors::{LearnError, TomoResult};
use tomopaint_core::labels::ClassifierKind;
use tomopaint_core::traits::{IClassifier, IFittedModel};

use crate::boost::GradientBoostStrategy;
use crate::forest::RandomForestStrategy;
use crate::weights::balanced_class_weights;

/// Build the classifier strategy for `kind` from the configured
/// hyperparameters.
pub fn strategy_for(kind: ClassifierKind, config: &LearnConfig) -> Box<dyn IClassifier> {
    match kind {
        ClassifierKind::RandomForest => {
            Box::new(RandomForestStrategy::new(config.forest.clone()))
        }
        ClassifierKind::GradientBoost => {
            Box::new(GradientBoostStrategy::new(config.boost.clone()))
        }
    }
}

/// Turns a (features, painted labels) pair into a fitted model.
///
/// Labels use the reserved space: 0 is unlabeled and is dropped, labels
/// `>= 1` are shifted down by one into the 0-based class space the
/// strategies train in. The predictor shifts back on the way out.
pub struct Trainer {
    config: LearnConfig,
}

impl Trainer {
    pub fn new(config: LearnConfig) -> Self {
        Self { config }
    }

    /// Fit `kind` on the labeled subset of `features`.
    ///
    /// `labels` is flattened in C order and must line up row-for-row with
    /// `features`. Returns `Ok(None)` when no voxel is labeled yet; a
    /// half-painted volume is a normal state, not an error.
    pub fn fit(
        &self,
        kind: ClassifierKind,
        features: ArrayView2<'_, f32>,
        labels: &Array3<i32>,
    ) -> TomoResult<Option<Arc<dyn IFittedModel>>> {
        if labels.len() != features.nrows() {
            return Err(LearnError::DimensionMismatch {
                labels: labels.len(),
                samples: features.nrows(),
            }
            .into());
        }

        let mut rows: Vec<usize> = Vec::new();
        let mut classes: Vec<u32> = Vec::new();
        let flat = labels.iter().copied();
        for (row, label) in flat.enumerate() {
            if label > 0 {
                rows.push(row);
                classes.push((label - 1) as u32);
            }
        }

        if rows.is_empty() {
            info!("no labeled voxels, skipping fit");
            return Ok(None);
        }

        let class_weights = balanced_class_weights(&classes);
        let selected = features.select(Axis(0), &rows);
        info!(
            classifier = %kind,
            rows = rows.len(),
            classes = class_weights.len(),
            "fitting classifier"
        );

        let strategy = strategy_for(kind, &self.config);
        let model = strategy.fit(selected.view(), &classes, &class_weights)?;
        Ok(Some(Arc::from(model)))
    }
}
