//! Multinomial logistic regression for sparse text features.
//!
//! Minibatch softmax SGD with optional inverse-frequency class balancing and
//! a generous epoch cap. Sentiment sets are heavily skewed toward positive
//! reviews, so balancing is on by default.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::{SparseRow, softmax};

/// Training options for the logistic classifier.
#[derive(Debug, Clone)]
pub struct LogRegOptions {
    /// Passes over the shuffled training set.
    pub epochs: usize,
    /// SGD step size.
    pub learning_rate: f32,
    /// L2 regularization strength.
    pub l2: f32,
    /// Minibatch size.
    pub batch_size: usize,
    /// RNG seed for shuffling.
    pub seed: u64,
    /// Weight classes by inverse frequency.
    pub balance_classes: bool,
}

impl Default for LogRegOptions {
    fn default() -> Self {
        Self {
            epochs: 300,
            learning_rate: 0.5,
            l2: 1e-4,
            batch_size: 64,
            seed: 13,
            balance_classes: true,
        }
    }
}

/// Fitted multinomial logistic model.
pub struct LogRegModel {
    /// Class labels, index-aligned with the weight rows.
    pub classes: Vec<String>,
    weights: Vec<f32>,
    bias: Vec<f32>,
    dim: usize,
}

impl LogRegModel {
    /// Class probabilities for one feature row.
    pub fn predict_proba(&self, row: &SparseRow) -> Vec<f32> {
        let mut logits = vec![0.0f32; self.classes.len()];
        for (class, logit) in logits.iter_mut().enumerate() {
            let base = class * self.dim;
            let mut sum = self.bias[class];
            for &(index, value) in row {
                sum += self.weights[base + index] * value;
            }
            *logit = sum;
        }
        softmax(&logits)
    }

    /// Index of the most probable class.
    pub fn predict_class_index(&self, row: &SparseRow) -> usize {
        let proba = self.predict_proba(row);
        let mut best = 0usize;
        let mut best_val = f32::NEG_INFINITY;
        for (index, &p) in proba.iter().enumerate() {
            if p > best_val {
                best_val = p;
                best = index;
            }
        }
        best
    }
}

/// Train a multinomial logistic regression classifier.
pub fn train_logreg(
    x: &[SparseRow],
    y: &[usize],
    classes: Vec<String>,
    dim: usize,
    options: &LogRegOptions,
) -> Result<LogRegModel, String> {
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

    let class_weights = if options.balance_classes {
        let mut counts = vec![0f32; n_classes];
        for &label in y {
            counts[label] += 1.0;
        }
        let total: f32 = counts.iter().sum();
        counts
            .into_iter()
            .map(|count| {
                if count == 0.0 {
                    0.0
                } else {
                    total / (n_classes as f32 * count)
                }
            })
            .collect()
    } else {
        vec![1.0; n_classes]
    };

    let mut indices: Vec<usize> = (0..x.len()).collect();
    let batch_size = options.batch_size.max(1);
    let lr = options.learning_rate;
    let l2 = options.l2.max(0.0);

    for _epoch in 0..options.epochs {
        indices.shuffle(&mut rng);
        for chunk in indices.chunks(batch_size) {
            let mut grad_w = vec![0.0f32; weights.len()];
            let mut grad_b = vec![0.0f32; bias.len()];
            let mut batch_weight = 0.0f32;
            for &sample in chunk {
                let row = &x[sample];
                let truth = y[sample];
                let weight = class_weights[truth];
                if weight == 0.0 {
                    continue;
                }
                let mut logits = vec![0.0f32; n_classes];
                for (class, logit) in logits.iter_mut().enumerate() {
                    let base = class * dim;
                    let mut sum = bias[class];
                    for &(index, value) in row {
                        sum += weights[base + index] * value;
                    }
                    *logit = sum;
                }
                let probs = softmax(&logits);
                for class in 0..n_classes {
                    let diff = probs[class] - if class == truth { 1.0 } else { 0.0 };
                    let base = class * dim;
                    for &(index, value) in row {
                        grad_w[base + index] += diff * value * weight;
                    }
                    grad_b[class] += diff * weight;
                }
                batch_weight += weight;
            }
            if batch_weight == 0.0 {
                continue;
            }
            let inv = 1.0 / batch_weight;
            for class in 0..n_classes {
                let base = class * dim;
                for index in 0..dim {
                    let flat = base + index;
                    let l2_term = l2 * weights[flat];
                    weights[flat] -= lr * (grad_w[flat] * inv + l2_term);
                }
                bias[class] -= lr * grad_b[class] * inv;
            }
        }
    }

    Ok(LogRegModel {
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
        let x = vec![
            vec![(0, 1.0)],
            vec![(0, 0.8), (1, 0.1)],
            vec![(0, 0.9)],
            vec![(1, 1.0)],
            vec![(1, 0.9), (0, 0.1)],
            vec![(1, 0.8)],
        ];
        let y = vec![0, 0, 0, 1, 1, 1];
        let classes = vec!["Negative".to_string(), "Positive".to_string()];
        (x, y, classes)
    }

    #[test]
    fn probabilities_sum_to_one() {
        let (x, y, classes) = toy_dataset();
        let model = train_logreg(&x, &y, classes, 2, &LogRegOptions::default()).unwrap();
        let proba = model.predict_proba(&vec![(0, 1.0)]);
        let sum: f32 = proba.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn separates_a_toy_problem() {
        let (x, y, classes) = toy_dataset();
        let model = train_logreg(&x, &y, classes, 2, &LogRegOptions::default()).unwrap();
        assert_eq!(model.predict_class_index(&vec![(0, 1.0)]), 0);
        assert_eq!(model.predict_class_index(&vec![(1, 1.0)]), 1);
    }

    #[test]
    fn balanced_weights_lift_minority_classes() {
        // 5:1 imbalance; the minority example still wins on its own feature.
        let x = vec![
            vec![(0, 1.0)],
            vec![(0, 1.0)],
            vec![(0, 0.9)],
            vec![(0, 0.8)],
            vec![(0, 1.0)],
            vec![(1, 1.0)],
        ];
        let y = vec![0, 0, 0, 0, 0, 1];
        let classes = vec!["Positive".to_string(), "Negative".to_string()];
        let model = train_logreg(&x, &y, classes, 2, &LogRegOptions::default()).unwrap();
        assert_eq!(model.predict_class_index(&vec![(1, 1.0)]), 1);
    }

    #[test]
    fn training_is_deterministic() {
        let (x, y, classes) = toy_dataset();
        let options = LogRegOptions::default();
        let a = train_logreg(&x, &y, classes.clone(), 2, &options).unwrap();
        let b = train_logreg(&x, &y, classes, 2, &options).unwrap();
        assert_eq!(a.weights, b.weights);
        assert_eq!(a.bias, b.bias);
    }
}
