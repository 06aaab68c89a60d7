//! Variant A: bagged ensemble of bounded-depth trees.
//!
//! Each tree sees a small bootstrap subsample of the training rows; class
//! weights enter the gini computation directly. Trees are fit in parallel
//! and vote at prediction time.

use ndarray::{ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

use tomopaint_core::config::ForestParams;
use tomopaint_core::errors::{LearnError, TomoResult};
use tomopaint_core::traits::{IClassifier, IFittedModel};

use crate::tree::{DecisionTree, TreeParams};
use crate::weights::per_sample_weights;

pub struct RandomForestStrategy {
    params: ForestParams,
}

impl RandomForestStrategy {
    pub fn new(params: ForestParams) -> Self {
        Self { params }
    }

    fn validate(&self) -> Result<(), LearnError> {
        if self.params.n_estimators == 0 {
            return Err(LearnError::InvalidParams { reason: "n_estimators must be > 0".into() });
        }
        if !(self.params.max_samples > 0.0 && self.params.max_samples <= 1.0) {
            return Err(LearnError::InvalidParams {
                reason: format!("max_samples {} not in (0, 1]", self.params.max_samples),
            });
        }
        if self.params.min_samples_leaf == 0 {
            return Err(LearnError::InvalidParams {
                reason: "min_samples_leaf must be >= 1".into(),
            });
        }
        Ok(())
    }
}

impl IClassifier for RandomForestStrategy {
    fn fit(
        &self,
        features: ArrayView2<'_, f32>,
        classes: &[u32],
        class_weights: &[f64],
    ) -> TomoResult<Box<dyn IFittedModel>> {
        self.validate()?;
        if features.ncols() == 0 {
            return Err(LearnError::EmptyFeatureDim.into());
        }

        let n = classes.len();
        let num_classes = class_weights.len();
        let subsample = ((n as f64 * self.params.max_samples).ceil() as usize).clamp(1, n);
        let tree_params = TreeParams {
            max_depth: self.params.max_depth,
            min_samples_leaf: self.params.min_samples_leaf,
        };
        let base_seed = self.params.seed.unwrap_or_else(|| rand::thread_rng().gen());

        let trees: Vec<DecisionTree> = (0..self.params.n_estimators)
            .into_par_iter()
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(t as u64));
                let sample: Vec<usize> = (0..subsample).map(|_| rng.gen_range(0..n)).collect();
                let sub_features = features.select(Axis(0), &sample);
                let sub_classes: Vec<u32> = sample.iter().map(|&i| classes[i]).collect();
                let sub_weights = per_sample_weights(&sub_classes, class_weights);
                DecisionTree::fit(
                    sub_features.view(),
                    &sub_classes,
                    &sub_weights,
                    num_classes,
                    &tree_params,
                )
            })
            .collect();

        debug!(
            trees = trees.len(),
            rows = n,
            subsample,
            classes = num_classes,
            "random forest fitted"
        );
        Ok(Box::new(FittedForest { trees, num_classes }))
    }
}

#[derive(Debug)]
struct FittedForest {
    trees: Vec<DecisionTree>,
    num_classes: usize,
}

impl IFittedModel for FittedForest {
    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn predict(&self, features: ArrayView2<'_, f32>) -> Vec<u32> {
        (0..features.nrows())
            .into_par_iter()
            .map(|i| {
                let row = features.row(i);
                let owned;
                let row: &[f32] = match row.as_slice() {
                    Some(s) => s,
                    None => {
                        owned = row.to_vec();
                        &owned
                    }
                };
                let mut votes = vec![0u32; self.num_classes.max(1)];
                for tree in &self.trees {
                    votes[tree.predict_row(row) as usize] += 1;
                }
                argmax_u32(&votes)
            })
            .collect()
    }
}

fn argmax_u32(values: &[u32]) -> u32 {
    let mut best = 0usize;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best as u32
}
