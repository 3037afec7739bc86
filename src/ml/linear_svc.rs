//! One-vs-rest max-margin linear classifier for sparse text features.
//!
//! Hinge-loss SGD with L2 decay, trained per class against the rest. All
//! randomness comes from the seeded generator in the options, so repeated
//! runs produce identical models.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::SparseRow;

/// Training options for the max-margin classifier.
#[derive(Debug, Clone)]
pub struct LinearSvcOptions {
    /// Passes over the shuffled training set.
    pub epochs: usize,
    /// SGD step size.
    pub learning_rate: f32,
    /// L2 weight decay applied once per epoch.
    pub l2: f32,
    /// RNG seed for shuffling.
    pub seed: u64,
}

impl Default for LinearSvcOptions {
    fn default() -> Self {
        Self {
            epochs: 40,
            learning_rate: 0.5,
            l2: 1e-4,
            seed: 13,
        }
    }
}

/// Fitted one-vs-rest linear model.
pub struct LinearSvcModel {
    /// Class labels, index-aligned with the weight rows.
    pub classes: Vec<String>,
    weights: Vec<f32>,
    bias: Vec<f32>,
    dim: usize,
}

impl LinearSvcModel {
    /// Per-class decision scores for one feature row.
    pub fn decision_scores(&self, row: &SparseRow) -> Vec<f32> {
        let mut scores = Vec::with_capacity(self.classes.len());
        for class in 0..self.classes.len() {
            let base = class * self.dim;
            let mut sum = self.bias[class];
            for &(index, value) in row {
                sum += self.weights[base + index] * value;
            }
            scores.push(sum);
        }
        scores
    }

    /// Index of the highest-scoring class.
    pub fn predict_class_index(&self, row: &SparseRow) -> usize {
        let scores = self.decision_scores(row);
        let mut best = 0usize;
        let mut best_val = f32::NEG_INFINITY;
        for (index, &score) in scores.iter().enumerate() {
            if score > best_val {
                best_val = score;
                best = index;
            }
        }
        best
    }
}

/// Train a one-vs-rest hinge-loss linear classifier.
pub fn train_linear_svc(
    x: &[SparseRow],
    y: &[usize],
    classes: Vec<String>,
    dim: usize,
    options: &LinearSvcOptions,
) -> Result<LinearSvcModel, String> {
    if x.is_empty() || y.is_empty() {
        return Err("Empty training set".to_string());
    }
    if x.len() != y.len() {
        return Err("Mismatched training inputs/labels".to_string());
    }
    let n_classes = classes.len();
    if n_classes < 2 {
        return Err("Need at least two classes".to_string());
    }
    if let Some(&bad) = y.iter().find(|&&label| label >= n_classes) {
        return Err(format!("Label index {bad} out of range"));
    }

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut weights = vec![0.0f32; n_classes * dim];
    let mut bias = vec![0.0f32; n_classes];
    let mut indices: Vec<usize> = (0..x.len()).collect();
    let lr = options.learning_rate;
    let decay = 1.0 - options.learning_rate * options.l2.max(0.0);

    for _epoch in 0..options.epochs {
        indices.shuffle(&mut rng);
        for &sample in &indices {
            let row = &x[sample];
            let truth = y[sample];
            for class in 0..n_classes {
                let target = if class == truth { 1.0f32 } else { -1.0f32 };
                let base = class * dim;
                let mut score = bias[class];
                for &(index, value) in row {
                    score += weights[base + index] * value;
                }
                // Hinge: update only when the margin is violated.
                if target * score < 1.0 {
                    for &(index, value) in row {
                        weights[base + index] += lr * target * value;
                    }
                    bias[class] += lr * target;
                }
            }
        }
        if decay < 1.0 {
            for weight in &mut weights {
                *weight *= decay;
            }
        }
    }

    Ok(LinearSvcModel {
        classes,
        weights,
        bias,
        dim,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_dataset() -> (Vec<SparseRow>, Vec<usize>, Vec<String>) {
        // Two well-separated directions in a 4-dim space.
        let x = vec![
            vec![(0, 1.0), (1, 0.2)],
            vec![(0, 0.9), (1, 0.1)],
            vec![(0, 0.8)],
            vec![(2, 1.0), (3, 0.2)],
            vec![(2, 0.9)],
            vec![(3, 1.0)],
        ];
        let y = vec![0, 0, 0, 1, 1, 1];
        let classes = vec!["left".to_string(), "right".to_string()];
        (x, y, classes)
    }

    #[test]
    fn separates_a_toy_problem() {
        let (x, y, classes) = toy_dataset();
        let model = train_linear_svc(&x, &y, classes, 4, &LinearSvcOptions::default()).unwrap();
        assert_eq!(model.predict_class_index(&vec![(0, 1.0)]), 0);
        assert_eq!(model.predict_class_index(&vec![(2, 0.7), (3, 0.5)]), 1);
    }

    #[test]
    fn training_is_deterministic() {
        let (x, y, classes) = toy_dataset();
        let options = LinearSvcOptions::default();
        let a = train_linear_svc(&x, &y, classes.clone(), 4, &options).unwrap();
        let b = train_linear_svc(&x, &y, classes, 4, &options).unwrap();
        assert_eq!(a.weights, b.weights);
        assert_eq!(a.bias, b.bias);
    }

    #[test]
    fn rejects_mismatched_inputs() {
        let (x, _, classes) = toy_dataset();
        let err = train_linear_svc(&x, &[0], classes, 4, &LinearSvcOptions::default());
        assert!(err.is_err());
    }
}
