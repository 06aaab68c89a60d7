//! Balanced class weights: inverse class frequency.

/// Per-class weights for 0-based `classes`, indexed by class id up to the
/// highest observed class.
///
/// The balanced scheme gives each present class
/// `n_total / (n_present_classes * count(c))`; a class id with no samples
/// gets weight 0 (it can never be drawn, the slot only exists to keep the
/// vector indexable by class id).
pub fn balanced_class_weights(classes: &[u32]) -> Vec<f64> {
    let Some(&max_class) = classes.iter().max() else {
        return Vec::new();
    };
    let mut counts = vec![0usize; max_class as usize + 1];
    for &c in classes {
        counts[c as usize] += 1;
    }
    let n_total = classes.len() as f64;
    let n_present = counts.iter().filter(|&&c| c > 0).count() as f64;
    counts
        .iter()
        .map(|&count| {
            if count == 0 {
                0.0
            } else {
                n_total / (n_present * count as f64)
            }
        })
        .collect()
}

/// Map each sample's class to its class weight.
pub fn per_sample_weights(classes: &[u32], class_weights: &[f64]) -> Vec<f64> {
    classes.iter().map(|&c| class_weights[c as usize]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_weights_match_reference_distribution() {
        // Labels [1,1,2,2,2,3] after the -1 shift: [0,0,1,1,1,2].
        // weight(c) = 6 / (3 * count(c)).
        let weights = balanced_class_weights(&[0, 0, 1, 1, 1, 2]);
        assert_eq!(weights.len(), 3);
        assert!((weights[0] - 1.0).abs() < 1e-12);
        assert!((weights[1] - 2.0 / 3.0).abs() < 1e-12);
        assert!((weights[2] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn weights_normalize_to_total() {
        // sum over classes of weight(c) * count(c) == n_total.
        let classes = [0u32, 0, 1, 1, 1, 2];
        let weights = balanced_class_weights(&classes);
        let counts = [2.0, 3.0, 1.0];
        let sum: f64 = weights.iter().zip(counts).map(|(w, c)| w * c).sum();
        assert!((sum - 6.0).abs() < 1e-12);
    }

    #[test]
    fn absent_class_gets_zero_weight() {
        // Only classes 0 and 2 present.
        let weights = balanced_class_weights(&[0, 2, 2]);
        assert_eq!(weights.len(), 3);
        assert!(weights[1] == 0.0);
        assert!((weights[0] - 3.0 / 2.0).abs() < 1e-12);
        assert!((weights[2] - 3.0 / 4.0).abs() < 1e-12);
    }

    #[test]
    fn per_sample_maps_class_weight() {
        let classes = [0u32, 1, 0];
        let class_weights = [0.5, 2.0];
        assert_eq!(per_sample_weights(&classes, &class_weights), vec![0.5, 2.0, 0.5]);
    }

    #[test]
    fn empty_input_yields_empty_weights() {
        assert!(balanced_class_weights(&[]).is_empty());
    }
}
