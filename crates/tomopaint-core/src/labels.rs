//! Label semantics, classifier selection, and class histograms.
//!
//! Label values: 0 = unlabeled, 1 = background class, N > 1 = class N-1.
//! The classifier itself works in a 0-based class space with label 0
//! excluded; the +1/-1 shift happens at the trainer/predictor boundary.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The two alternative classifier strategies (spec variants A and B).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassifierKind {
    /// Ensemble of bounded-depth decision trees with per-tree subsampling.
    RandomForest,
    /// Gradient-boosted shallow trees with per-sample weights.
    GradientBoost,
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RandomForest => write!(f, "random forest"),
            Self::GradientBoost => write!(f, "gradient boost"),
        }
    }
}

/// One of the two independently precomputed feature sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureSetId {
    /// Multiscale intensity features computed from the image itself.
    Intensity,
    /// Learned embedding features from an external model.
    Embedding,
}

impl fmt::Display for FeatureSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intensity => write!(f, "intensity"),
            Self::Embedding => write!(f, "embedding"),
        }
    }
}

/// Which feature sets participate in training/prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSelection {
    pub intensity: bool,
    pub embedding: bool,
}

impl FeatureSelection {
    pub const EMBEDDING_ONLY: Self = Self { intensity: false, embedding: true };
    pub const ALL: Self = Self { intensity: true, embedding: true };

    pub fn any(&self) -> bool {
        self.intensity || self.embedding
    }

    /// Selected set ids, in concatenation order.
    pub fn sets(&self) -> Vec<FeatureSetId> {
        let mut out = Vec::with_capacity(2);
        if self.intensity {
            out.push(FeatureSetId::Intensity);
        }
        if self.embedding {
            out.push(FeatureSetId::Embedding);
        }
        out
    }
}

impl Default for FeatureSelection {
    fn default() -> Self {
        Self::EMBEDDING_ONLY
    }
}

/// Per-class voxel counts over a label array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassHistogram {
    counts: BTreeMap<i32, u64>,
}

impl ClassHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count labels from a flat iterator of label values.
    pub fn from_labels<I: IntoIterator<Item = i32>>(labels: I) -> Self {
        let mut counts = BTreeMap::new();
        for label in labels {
            *counts.entry(label).or_insert(0u64) += 1;
        }
        Self { counts }
    }

    pub fn add(&mut self, label: i32, count: u64) {
        *self.counts.entry(label).or_insert(0) += count;
    }

    pub fn count(&self, label: i32) -> u64 {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    pub fn labels(&self) -> impl Iterator<Item = i32> + '_ {
        self.counts.keys().copied()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of voxels carrying a real annotation (label > 0).
    pub fn labeled_total(&self) -> u64 {
        self.counts
            .iter()
            .filter(|(label, _)| **label > 0)
            .map(|(_, count)| *count)
            .sum()
    }

    /// Align two histograms onto the union of their class axes, zero-filling
    /// gaps. Class 0 is always present even when neither side observed it,
    /// so downstream consumers get a stable leading row.
    pub fn align(painting: &Self, prediction: &Self) -> AlignedHistograms {
        let mut labels: Vec<i32> = painting
            .counts
            .keys()
            .chain(prediction.counts.keys())
            .copied()
            .collect();
        labels.push(0);
        labels.sort_unstable();
        labels.dedup();

        let painting_counts = labels.iter().map(|l| painting.count(*l)).collect();
        let prediction_counts = labels.iter().map(|l| prediction.count(*l)).collect();
        AlignedHistograms { labels, painting_counts, prediction_counts }
    }
}

/// Painting and prediction counts on a shared class axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedHistograms {
    pub labels: Vec<i32>,
    pub painting_counts: Vec<u64>,
    pub prediction_counts: Vec<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_counts_labels() {
        let h = ClassHistogram::from_labels([0, 0, 1, 2, 2, 2]);
        assert_eq!(h.count(0), 2);
        assert_eq!(h.count(2), 3);
        assert_eq!(h.total(), 6);
        assert_eq!(h.labeled_total(), 4);
    }

    #[test]
    fn align_unions_classes_and_forces_zero() {
        let painting = ClassHistogram::from_labels([1, 1, 3]);
        let prediction = ClassHistogram::from_labels([1, 2, 2]);
        let aligned = ClassHistogram::align(&painting, &prediction);
        assert_eq!(aligned.labels, vec![0, 1, 2, 3]);
        assert_eq!(aligned.painting_counts, vec![0, 2, 0, 1]);
        assert_eq!(aligned.prediction_counts, vec![0, 1, 2, 0]);
    }

    #[test]
    fn selection_sets_in_concat_order() {
        assert_eq!(
            FeatureSelection::ALL.sets(),
            vec![FeatureSetId::Intensity, FeatureSetId::Embedding]
        );
        assert!(!FeatureSelection { intensity: false, embedding: false }.any());
    }
}
