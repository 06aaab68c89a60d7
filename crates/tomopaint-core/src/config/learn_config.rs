use serde::{Deserialize, Serialize};

use super::defaults;

/// Random forest hyperparameters (variant A).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    /// Number of trees in the ensemble.
    pub n_estimators: usize,
    /// Depth bound for every tree.
    pub max_depth: usize,
    /// Fraction of the training rows bootstrapped per tree, in (0, 1].
    pub max_samples: f64,
    /// Minimum rows a leaf may hold.
    pub min_samples_leaf: usize,
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: defaults::DEFAULT_FOREST_TREES,
            max_depth: defaults::DEFAULT_FOREST_MAX_DEPTH,
            max_samples: defaults::DEFAULT_FOREST_SUBSAMPLE,
            min_samples_leaf: defaults::DEFAULT_MIN_SAMPLES_LEAF,
            seed: None,
        }
    }
}

/// Gradient boosting hyperparameters (variant B).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostParams {
    /// Number of boosting rounds.
    pub n_estimators: usize,
    /// Shrinkage applied to each round's contribution, in (0, 1].
    pub learning_rate: f64,
    /// Depth of each regression tree.
    pub max_depth: usize,
}

impl Default for BoostParams {
    fn default() -> Self {
        Self {
            n_estimators: defaults::DEFAULT_BOOST_ROUNDS,
            learning_rate: defaults::DEFAULT_BOOST_LEARNING_RATE,
            max_depth: defaults::DEFAULT_BOOST_MAX_DEPTH,
        }
    }
}

/// Trainer configuration: hyperparameters for both classifier variants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnConfig {
    pub forest: ForestParams,
    pub boost: BoostParams,
}
