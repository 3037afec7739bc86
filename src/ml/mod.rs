//! Machine learning building blocks for the labeling pipeline.
//!
//! Each target label gets an independent (vectorizer, classifier) pair
//! trained on its own few-shot sample. A pair is absent when the sample has
//! fewer than two distinct labels; absent models predict empty strings and
//! leave the rest of the pipeline to its fallbacks.

pub mod linear_svc;
pub mod logreg;
pub mod tfidf;

use linear_svc::{LinearSvcModel, LinearSvcOptions, train_linear_svc};
use logreg::{LogRegModel, LogRegOptions, train_logreg};
use tfidf::TfidfVectorizer;

/// Sparse feature row: (vocabulary index, weight) pairs sorted by index.
pub type SparseRow = Vec<(usize, f32)>;

/// Compute a numerically-stable softmax for a set of logits.
pub fn softmax(raw: &[f32]) -> Vec<f32> {
    if raw.is_empty() {
        return Vec::new();
    }
    let max = raw.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = raw.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 {
        return vec![1.0 / raw.len() as f32; raw.len()];
    }
    exps.into_iter().map(|v| v / sum).collect()
}

enum Classifier {
    MaxMargin(LinearSvcModel),
    Logistic(LogRegModel),
}

impl Classifier {
    fn predict_class_index(&self, row: &SparseRow) -> usize {
        match self {
            Classifier::MaxMargin(model) => model.predict_class_index(row),
            Classifier::Logistic(model) => model.predict_class_index(row),
        }
    }

    fn classes(&self) -> &[String] {
        match self {
            Classifier::MaxMargin(model) => &model.classes,
            Classifier::Logistic(model) => &model.classes,
        }
    }
}

/// A fitted (vectorizer, classifier) pair for one target label.
pub struct FewShotClassifier {
    vectorizer: TfidfVectorizer,
    classifier: Classifier,
}

impl FewShotClassifier {
    /// Fit the max-margin (hinge-loss) pair used for subtheme labels.
    ///
    /// Returns `Ok(None)` when fewer than two distinct labels are present;
    /// callers must treat that as "always predict empty for this target".
    pub fn fit_max_margin(
        texts: &[String],
        labels: &[String],
        seed: u64,
    ) -> Result<Option<Self>, String> {
        let Some((classes, y)) = index_labels(labels) else {
            return Ok(None);
        };
        let mut vectorizer = TfidfVectorizer::new();
        let x = vectorizer.fit_transform(texts);
        let options = LinearSvcOptions {
            seed,
            ..LinearSvcOptions::default()
        };
        let model = train_linear_svc(&x, &y, classes, vectorizer.vocabulary_size(), &options)?;
        Ok(Some(Self {
            vectorizer,
            classifier: Classifier::MaxMargin(model),
        }))
    }

    /// Fit the class-balanced logistic pair used for sentiment labels.
    ///
    /// Same absent-model contract as [`FewShotClassifier::fit_max_margin`].
    pub fn fit_logistic(
        texts: &[String],
        labels: &[String],
        seed: u64,
    ) -> Result<Option<Self>, String> {
        let Some((classes, y)) = index_labels(labels) else {
            return Ok(None);
        };
        let mut vectorizer = TfidfVectorizer::new();
        let x = vectorizer.fit_transform(texts);
        let options = LogRegOptions {
            seed,
            ..LogRegOptions::default()
        };
        let model = train_logreg(&x, &y, classes, vectorizer.vocabulary_size(), &options)?;
        Ok(Some(Self {
            vectorizer,
            classifier: Classifier::Logistic(model),
        }))
    }

    /// Predict one label string per input text.
    pub fn predict(&self, texts: &[String]) -> Vec<String> {
        let rows = self.vectorizer.transform(texts);
        let classes = self.classifier.classes();
        rows.iter()
            .map(|row| classes[self.classifier.predict_class_index(row)].clone())
            .collect()
    }
}

/// Predict with an optional model: absent models yield empty labels.
pub fn predict_or_empty(model: Option<&FewShotClassifier>, texts: &[String]) -> Vec<String> {
    match model {
        Some(model) => model.predict(texts),
        None => vec![String::new(); texts.len()],
    }
}

/// Map labels to sorted distinct classes and per-row class indices.
///
/// Returns `None` when fewer than two distinct labels exist.
fn index_labels(labels: &[String]) -> Option<(Vec<String>, Vec<usize>)> {
    let mut classes: Vec<String> = labels.to_vec();
    classes.sort();
    classes.dedup();
    if classes.len() < 2 {
        return None;
    }
    let y = labels
        .iter()
        .map(|label| {
            classes
                .binary_search(label)
                .expect("every label is in the class list")
        })
        .collect();
    Some((classes, y))
}
