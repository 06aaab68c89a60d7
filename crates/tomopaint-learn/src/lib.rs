//! # tomopaint-learn
//!
//! The train/predict half of the annotation engine: balanced class
//! weights, two classifier strategies behind a uniform contract, and the
//! dense volume predictor.
//!
//! Every strategy works in a 0-based class space; label 0 (unlabeled)
//! never reaches this crate's strategies, and predictor output is shifted
//! back into the reserved label space (+1) so 0 is never produced.

mod boost;
mod forest;
mod predictor;
mod trainer;
mod tree;
mod weights;

pub use boost::GradientBoostStrategy;
pub use forest::RandomForestStrategy;
pub use predictor::predict_volume;
pub use trainer::{strategy_for, Trainer};
pub use tree::{DecisionTree, TreeParams};
pub use weights::{balanced_class_weights, per_sample_weights};
