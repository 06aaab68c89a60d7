//! Weighted CART classification tree: gini impurity, midpoint thresholds,
//! weighted-majority leaves.

use ndarray::ArrayView2;

/// Stopping parameters for a single tree.
#[derive(Debug, Clone)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_leaf: usize,
}

#[derive(Debug, Clone)]
enum Node {
    Split { feature: usize, threshold: f32, left: usize, right: usize },
    Leaf { class: u32 },
}

/// A fitted classification tree over a 0-based class space.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Fit on `features` (rows) with per-sample weights. `num_classes`
    /// sizes the class accumulators; every entry of `classes` must be
    /// below it.
    pub fn fit<'a>(
        features: ArrayView2<'a, f32>,
        classes: &'a [u32],
        sample_weights: &'a [f64],
        num_classes: usize,
        params: &'a TreeParams,
    ) -> Self {
        debug_assert_eq!(features.nrows(), classes.len());
        debug_assert_eq!(classes.len(), sample_weights.len());
        let mut tree = Self { nodes: Vec::new() };
        let builder = Builder { features, classes, sample_weights, num_classes, params };
        let indices: Vec<usize> = (0..classes.len()).collect();
        tree.build(&builder, indices, 0);
        tree
    }

    /// Class index for one feature row.
    pub fn predict_row(&self, row: &[f32]) -> u32 {
        let mut node = 0usize;
        loop {
            match &self.nodes[node] {
                Node::Leaf { class } => return *class,
                Node::Split { feature, threshold, left, right } => {
                    node = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn build(&mut self, b: &Builder<'_>, indices: Vec<usize>, depth: usize) -> usize {
        let class_sums = b.class_weight_sums(&indices);
        let majority = argmax(&class_sums);

        let pure = class_sums.iter().filter(|&&w| w > 0.0).count() <= 1;
        if pure
            || depth >= b.params.max_depth
            || indices.len() < 2 * b.params.min_samples_leaf
        {
            return self.push(Node::Leaf { class: majority });
        }

        let Some(split) = b.find_best_split(&indices) else {
            return self.push(Node::Leaf { class: majority });
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| b.features[[i, split.feature]] <= split.threshold);
        if left_idx.len() < b.params.min_samples_leaf
            || right_idx.len() < b.params.min_samples_leaf
        {
            return self.push(Node::Leaf { class: majority });
        }

        let node = self.push(Node::Leaf { class: majority });
        let left = self.build(b, left_idx, depth + 1);
        let right = self.build(b, right_idx, depth + 1);
        self.nodes[node] =
            Node::Split { feature: split.feature, threshold: split.threshold, left, right };
        node
    }

    fn push(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }
}

struct SplitCandidate {
    feature: usize,
    threshold: f32,
}

struct Builder<'a> {
    features: ArrayView2<'a, f32>,
    classes: &'a [u32],
    sample_weights: &'a [f64],
    num_classes: usize,
    params: &'a TreeParams,
}

impl Builder<'_> {
    fn class_weight_sums(&self, indices: &[usize]) -> Vec<f64> {
        let mut sums = vec![0.0; self.num_classes];
        for &i in indices {
            sums[self.classes[i] as usize] += self.sample_weights[i];
        }
        sums
    }

    /// Best (feature, threshold) by weighted gini, via a single sorted
    /// sweep per feature with running per-class weight sums.
    fn find_best_split(&self, indices: &[usize]) -> Option<SplitCandidate> {
        if indices.len() < 2 {
            return None;
        }
        let total_sums = self.class_weight_sums(indices);
        let total_weight: f64 = total_sums.iter().sum();
        if total_weight <= 0.0 {
            return None;
        }

        let mut best: Option<(f64, SplitCandidate)> = None;
        let mut order: Vec<usize> = indices.to_vec();

        for feature in 0..self.features.ncols() {
            order.sort_by(|&a, &b| {
                self.features[[a, feature]]
                    .partial_cmp(&self.features[[b, feature]])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let mut left_sums = vec![0.0f64; self.num_classes];
            let mut left_weight = 0.0f64;
            for window in 0..order.len() - 1 {
                let i = order[window];
                left_sums[self.classes[i] as usize] += self.sample_weights[i];
                left_weight += self.sample_weights[i];

                let value = self.features[[i, feature]];
                let next_value = self.features[[order[window + 1], feature]];
                if next_value <= value {
                    // No threshold separates equal values.
                    continue;
                }

                let right_weight = total_weight - left_weight;
                if left_weight <= 0.0 || right_weight <= 0.0 {
                    continue;
                }
                let left_gini = gini(&left_sums, left_weight);
                let right_gini = gini_complement(&total_sums, &left_sums, right_weight);
                let weighted = (left_weight * left_gini + right_weight * right_gini)
                    / total_weight;

                if best.as_ref().map_or(true, |(score, _)| weighted < *score) {
                    best = Some((
                        weighted,
                        SplitCandidate { feature, threshold: (value + next_value) / 2.0 },
                    ));
                }
            }
        }
        best.map(|(_, candidate)| candidate)
    }
}

fn gini(class_sums: &[f64], total: f64) -> f64 {
    1.0 - class_sums.iter().map(|&w| (w / total) * (w / total)).sum::<f64>()
}

fn gini_complement(total_sums: &[f64], left_sums: &[f64], right_total: f64) -> f64 {
    let sum_sq: f64 = total_sums
        .iter()
        .zip(left_sums)
        .map(|(&t, &l)| {
            let w = t - l;
            (w / right_total) * (w / right_total)
        })
        .sum();
    1.0 - sum_sq
}

fn argmax(values: &[f64]) -> u32 {
    let mut best = 0usize;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn params() -> TreeParams {
        TreeParams { max_depth: 4, min_samples_leaf: 1 }
    }

    #[test]
    fn separable_data_splits_cleanly() {
        let features = array![[0.0, 1.0], [1.0, 1.0], [8.0, 1.0], [9.0, 1.0]];
        let classes = [0u32, 0, 1, 1];
        let weights = [1.0; 4];
        let tree = DecisionTree::fit(features.view(), &classes, &weights, 2, &params());

        assert_eq!(tree.predict_row(&[0.5, 1.0]), 0);
        assert_eq!(tree.predict_row(&[8.5, 1.0]), 1);
    }

    #[test]
    fn single_class_is_a_leaf() {
        let features = array![[0.0], [1.0], [2.0]];
        let classes = [1u32, 1, 1];
        let weights = [1.0; 3];
        let tree = DecisionTree::fit(features.view(), &classes, &weights, 2, &params());
        assert_eq!(tree.num_nodes(), 1);
        assert_eq!(tree.predict_row(&[5.0]), 1);
    }

    #[test]
    fn depth_bound_is_honored() {
        // Alternating classes on one axis force many splits; depth 1
        // allows exactly one.
        let features = array![[0.0], [1.0], [2.0], [3.0], [4.0], [5.0], [6.0], [7.0]];
        let classes = [0u32, 1, 0, 1, 0, 1, 0, 1];
        let weights = [1.0; 8];
        let shallow = TreeParams { max_depth: 1, min_samples_leaf: 1 };
        let tree = DecisionTree::fit(features.view(), &classes, &weights, 2, &shallow);
        assert!(tree.num_nodes() <= 3);
    }

    #[test]
    fn class_weights_shift_the_majority() {
        // Identical features, conflicting classes: the heavier class wins.
        let features = array![[1.0], [1.0], [1.0]];
        let classes = [0u32, 0, 1];
        let weights = [1.0, 1.0, 5.0];
        let tree = DecisionTree::fit(features.view(), &classes, &weights, 2, &params());
        assert_eq!(tree.predict_row(&[1.0]), 1);
    }
}
