//! Variant B: gradient-boosted shallow trees.
//!
//! Multiclass softmax objective. Each round fits one regression tree per
//! class to the gradient/hessian of the weighted log loss; leaf values are
//! Newton steps `-G / (H + lambda)`, shrunk by the learning rate. Sample
//! weights (derived from the balanced class weights) scale both gradient
//! and hessian.

use ndarray::ArrayView2;
use rayon::prelude::*;
use tracing::debug;

use tomopaint_core::config::BoostParams;
use tomopaint_core::errors::{LearnError, TomoResult};
use tomopaint_core::traits::{IClassifier, IFittedModel};

use crate::weights::per_sample_weights;

/// L2 regularization on leaf weights.
const LAMBDA: f64 = 1.0;
/// Hessian floor to keep Newton steps finite on saturated probabilities.
const MIN_HESSIAN: f64 = 1e-12;

pub struct GradientBoostStrategy {
    params: BoostParams,
}

impl GradientBoostStrategy {
    pub fn new(params: BoostParams) -> Self {
        Self { params }
    }

    fn validate(&self) -> Result<(), LearnError> {
        if self.params.n_estimators == 0 {
            return Err(LearnError::InvalidParams { reason: "n_estimators must be > 0".into() });
        }
        if !(self.params.learning_rate > 0.0 && self.params.learning_rate <= 1.0) {
            return Err(LearnError::InvalidParams {
                reason: format!("learning_rate {} not in (0, 1]", self.params.learning_rate),
            });
        }
        if self.params.max_depth == 0 {
            return Err(LearnError::InvalidParams { reason: "max_depth must be >= 1".into() });
        }
        Ok(())
    }
}

impl IClassifier for GradientBoostStrategy {
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
        let k = class_weights.len().max(1);
        let sample_weights = per_sample_weights(classes, class_weights);
        let lr = self.params.learning_rate;

        // scores[i * k + c]: running boosted score of row i for class c.
        let mut scores = vec![0.0f64; n * k];
        let mut rounds: Vec<Vec<RegressionTree>> = Vec::with_capacity(self.params.n_estimators);

        for _round in 0..self.params.n_estimators {
            let probs = softmax_rows(&scores, n, k);

            let class_trees: Vec<RegressionTree> = (0..k)
                .into_par_iter()
                .map(|c| {
                    let mut grad = vec![0.0f64; n];
                    let mut hess = vec![0.0f64; n];
                    for i in 0..n {
                        let p = probs[i * k + c];
                        let y = if classes[i] as usize == c { 1.0 } else { 0.0 };
                        grad[i] = sample_weights[i] * (p - y);
                        hess[i] = (sample_weights[i] * p * (1.0 - p)).max(MIN_HESSIAN);
                    }
                    RegressionTree::fit(features, &grad, &hess, self.params.max_depth)
                })
                .collect();

            for (c, tree) in class_trees.iter().enumerate() {
                for i in 0..n {
                    let row = row_slice(features, i);
                    scores[i * k + c] += lr * tree.predict_row(&row);
                }
            }
            rounds.push(class_trees);
        }

        debug!(rounds = rounds.len(), rows = n, classes = k, "gradient boost fitted");
        Ok(Box::new(FittedBoost { rounds, num_classes: k, learning_rate: lr }))
    }
}

#[derive(Debug)]
struct FittedBoost {
    rounds: Vec<Vec<RegressionTree>>,
    num_classes: usize,
    learning_rate: f64,
}

impl IFittedModel for FittedBoost {
    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn predict(&self, features: ArrayView2<'_, f32>) -> Vec<u32> {
        let k = self.num_classes;
        (0..features.nrows())
            .into_par_iter()
            .map(|i| {
                let row = row_slice(features, i);
                let mut scores = vec![0.0f64; k];
                for round in &self.rounds {
                    for (c, tree) in round.iter().enumerate() {
                        scores[c] += self.learning_rate * tree.predict_row(&row);
                    }
                }
                let mut best = 0usize;
                for (c, &s) in scores.iter().enumerate() {
                    if s > scores[best] {
                        best = c;
                    }
                }
                best as u32
            })
            .collect()
    }
}

fn row_slice(features: ArrayView2<'_, f32>, i: usize) -> Vec<f32> {
    features.row(i).to_vec()
}

fn softmax_rows(scores: &[f64], n: usize, k: usize) -> Vec<f64> {
    let mut probs = vec![0.0f64; n * k];
    for i in 0..n {
        let row = &scores[i * k..(i + 1) * k];
        let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mut sum = 0.0;
        for c in 0..k {
            let e = (row[c] - max).exp();
            probs[i * k + c] = e;
            sum += e;
        }
        for c in 0..k {
            probs[i * k + c] /= sum;
        }
    }
    probs
}

// ── Regression tree on gradient/hessian sums ─────────────────────────────

#[derive(Debug, Clone)]
enum RegNode {
    Split { feature: usize, threshold: f32, left: usize, right: usize },
    Leaf { value: f64 },
}

/// A shallow regression tree fit to (gradient, hessian) pairs. Split gain
/// and leaf weights follow the second-order objective:
/// leaf = -G / (H + lambda), gain = sum of child objectives minus parent.
#[derive(Debug, Clone)]
struct RegressionTree {
    nodes: Vec<RegNode>,
}

impl RegressionTree {
    fn fit(features: ArrayView2<'_, f32>, grad: &[f64], hess: &[f64], max_depth: usize) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        let indices: Vec<usize> = (0..grad.len()).collect();
        tree.build(features, grad, hess, indices, 0, max_depth);
        tree
    }

    fn predict_row(&self, row: &[f32]) -> f64 {
        let mut node = 0usize;
        loop {
            match &self.nodes[node] {
                RegNode::Leaf { value } => return *value,
                RegNode::Split { feature, threshold, left, right } => {
                    node = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    fn build(
        &mut self,
        features: ArrayView2<'_, f32>,
        grad: &[f64],
        hess: &[f64],
        indices: Vec<usize>,
        depth: usize,
        max_depth: usize,
    ) -> usize {
        let g: f64 = indices.iter().map(|&i| grad[i]).sum();
        let h: f64 = indices.iter().map(|&i| hess[i]).sum();
        let leaf_value = -g / (h + LAMBDA);

        if depth >= max_depth || indices.len() < 2 {
            return self.push(RegNode::Leaf { value: leaf_value });
        }

        let Some((feature, threshold)) = best_gain_split(features, grad, hess, &indices, g, h)
        else {
            return self.push(RegNode::Leaf { value: leaf_value });
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| features[[i, feature]] <= threshold);
        if left_idx.is_empty() || right_idx.is_empty() {
            return self.push(RegNode::Leaf { value: leaf_value });
        }

        let node = self.push(RegNode::Leaf { value: leaf_value });
        let left = self.build(features, grad, hess, left_idx, depth + 1, max_depth);
        let right = self.build(features, grad, hess, right_idx, depth + 1, max_depth);
        self.nodes[node] = RegNode::Split { feature, threshold, left, right };
        node
    }

    fn push(&mut self, node: RegNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }
}

fn objective(g: f64, h: f64) -> f64 {
    (g * g) / (h + LAMBDA)
}

/// Best split by gain over a sorted sweep per feature. Returns `None`
/// when no split improves on the parent objective.
fn best_gain_split(
    features: ArrayView2<'_, f32>,
    grad: &[f64],
    hess: &[f64],
    indices: &[usize],
    total_g: f64,
    total_h: f64,
) -> Option<(usize, f32)> {
    let parent = objective(total_g, total_h);
    let mut best: Option<(f64, usize, f32)> = None;
    let mut order: Vec<usize> = indices.to_vec();

    for feature in 0..features.ncols() {
        order.sort_by(|&a, &b| {
            features[[a, feature]]
                .partial_cmp(&features[[b, feature]])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut left_g = 0.0f64;
        let mut left_h = 0.0f64;
        for window in 0..order.len() - 1 {
            let i = order[window];
            left_g += grad[i];
            left_h += hess[i];

            let value = features[[i, feature]];
            let next_value = features[[order[window + 1], feature]];
            if next_value <= value {
                continue;
            }

            let gain = 0.5
                * (objective(left_g, left_h)
                    + objective(total_g - left_g, total_h - left_h)
                    - parent);
            if gain > 0.0 && best.as_ref().map_or(true, |(b, _, _)| gain > *b) {
                best = Some((gain, feature, (value + next_value) / 2.0));
            }
        }
    }
    best.map(|(_, feature, threshold)| (feature, threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn regression_tree_fits_step_gradient() {
        // Negative gradients left of 5, positive right: the tree should
        // produce a positive step left, negative right.
        let features = array![[0.0], [1.0], [8.0], [9.0]];
        let grad = [-1.0, -1.0, 1.0, 1.0];
        let hess = [1.0, 1.0, 1.0, 1.0];
        let tree = RegressionTree::fit(features.view(), &grad, &hess, 2);
        assert!(tree.predict_row(&[0.5]) > 0.0);
        assert!(tree.predict_row(&[8.5]) < 0.0);
    }

    #[test]
    fn softmax_rows_sum_to_one() {
        let probs = softmax_rows(&[1.0, 2.0, 3.0, 0.0, 0.0, 0.0], 2, 3);
        let row0: f64 = probs[0..3].iter().sum();
        let row1: f64 = probs[3..6].iter().sum();
        assert!((row0 - 1.0).abs() < 1e-12);
        assert!((row1 - 1.0).abs() < 1e-12);
        assert!((probs[3] - 1.0 / 3.0).abs() < 1e-12);
    }
}
