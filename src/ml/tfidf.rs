//! TF-IDF vectorization over 1–2-gram word/emoji tokens.
//!
//! The vocabulary is frozen at fit time; transform simply ignores terms it
//! has never seen. Vocabulary indices are assigned over the sorted term list
//! so repeated fits on the same documents produce identical features.

use std::collections::{HashMap, HashSet};

use crate::text::{ngrams, tokenize};

use super::SparseRow;

/// TF-IDF vectorizer with smoothed idf and L2-normalized rows.
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Create an unfitted vectorizer.
    pub fn new() -> Self {
        Self {
            vocabulary: HashMap::new(),
            idf: Vec::new(),
        }
    }

    /// Learn the vocabulary and idf weights from the training documents.
    pub fn fit(&mut self, documents: &[String]) {
        let n_docs = documents.len();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        for doc in documents {
            let terms: HashSet<String> = ngrams(&tokenize(doc)).into_iter().collect();
            for term in terms {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let mut terms: Vec<(String, usize)> = doc_freq.into_iter().collect();
        terms.sort_by(|a, b| a.0.cmp(&b.0));

        self.vocabulary = HashMap::with_capacity(terms.len());
        self.idf = Vec::with_capacity(terms.len());
        for (index, (term, df)) in terms.into_iter().enumerate() {
            self.vocabulary.insert(term, index);
            let idf = ((1.0 + n_docs as f32) / (1.0 + df as f32)).ln() + 1.0;
            self.idf.push(idf);
        }
    }

    /// Fit on the documents and return their feature rows.
    pub fn fit_transform(&mut self, documents: &[String]) -> Vec<SparseRow> {
        self.fit(documents);
        self.transform(documents)
    }

    /// Transform documents using the frozen vocabulary.
    ///
    /// Terms absent from the vocabulary are ignored; rows are L2-normalized
    /// so classifier updates see comparable magnitudes regardless of review
    /// length.
    pub fn transform(&self, documents: &[String]) -> Vec<SparseRow> {
        documents
            .iter()
            .map(|doc| {
                let mut counts: HashMap<usize, f32> = HashMap::new();
                for term in ngrams(&tokenize(doc)) {
                    if let Some(&index) = self.vocabulary.get(&term) {
                        *counts.entry(index).or_insert(0.0) += 1.0;
                    }
                }
                let mut row: SparseRow = counts
                    .into_iter()
                    .map(|(index, tf)| (index, tf * self.idf[index]))
                    .collect();
                row.sort_by_key(|&(index, _)| index);
                let norm: f32 = row.iter().map(|&(_, v)| v * v).sum::<f32>().sqrt();
                if norm > 0.0 {
                    for (_, value) in &mut row {
                        *value /= norm;
                    }
                }
                row
            })
            .collect()
    }

    /// Number of learned vocabulary terms.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}
