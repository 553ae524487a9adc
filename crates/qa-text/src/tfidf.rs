//! Term-frequency / inverse-document-frequency vectorizer.
//!
//! Weights are raw counts times the smoothed idf `ln((1 + n) / (1 + df)) + 1`;
//! every vector is L2-normalized, so cosine similarity is a sparse dot product.

use std::collections::{BTreeMap, HashMap};

use qa_core::config::LexicalConfig;

use crate::analyzer::TermAnalyzer;

/// A sparse, L2-normalized feature vector sorted by feature id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f32)>,
}

impl SparseVector {
    fn from_weights(weights: BTreeMap<usize, f32>) -> Self {
        let norm = weights.values().map(|w| w * w).sum::<f32>().sqrt();
        if norm == 0.0 {
            return Self::default();
        }
        Self { entries: weights.into_iter().map(|(id, w)| (id, w / norm)).collect() }
    }

    pub fn is_zero(&self) -> bool { self.entries.is_empty() }

    /// Dot product; both operands are normalized so this is their cosine.
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j, mut sum) = (0usize, 0usize, 0.0f32);
        while i < self.entries.len() && j < other.entries.len() {
            let (a, wa) = self.entries[i];
            let (b, wb) = other.entries[j];
            match a.cmp(&b) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Fitted vocabulary and idf weights.
#[derive(Clone)]
pub struct TfidfVectorizer {
    analyzer: TermAnalyzer,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Fit on `documents` (already normalized) and return the vectorizer with
    /// one row per document.
    pub fn fit_transform(documents: &[String], config: &LexicalConfig) -> (Self, Vec<SparseVector>) {
        let analyzer = TermAnalyzer::new(&config.stop_words, config.ngram_range);
        let doc_terms: Vec<Vec<String>> = documents.iter().map(|d| analyzer.terms(d)).collect();

        let mut df: HashMap<&str, usize> = HashMap::new();
        let mut tf: HashMap<&str, usize> = HashMap::new();
        for terms in &doc_terms {
            let mut seen: Vec<&str> = Vec::with_capacity(terms.len());
            for term in terms {
                *tf.entry(term.as_str()).or_default() += 1;
                if !seen.contains(&term.as_str()) {
                    seen.push(term.as_str());
                }
            }
            for term in seen {
                *df.entry(term).or_default() += 1;
            }
        }

        let n_docs = documents.len();
        // A one-question corpus must keep its own vocabulary, hence the floor of 1.
        let max_doc_count = ((config.max_df as f64 * n_docs as f64).floor() as usize).max(1);
        let mut kept: Vec<&str> = df
            .iter()
            .filter(|&(_, &count)| count >= config.min_df && count <= max_doc_count)
            .map(|(term, _)| *term)
            .collect();

        if kept.len() > config.max_features {
            kept.sort_by(|a, b| tf[b].cmp(&tf[a]).then_with(|| a.cmp(b)));
            kept.truncate(config.max_features);
        }
        kept.sort_unstable();

        let vocabulary: HashMap<String, usize> =
            kept.iter().enumerate().map(|(id, term)| (term.to_string(), id)).collect();
        let idf: Vec<f32> = kept
            .iter()
            .map(|term| (((1 + n_docs) as f64 / (1 + df[term]) as f64).ln() + 1.0) as f32)
            .collect();

        let vectorizer = Self { analyzer, vocabulary, idf };
        let rows = doc_terms.iter().map(|terms| vectorizer.weigh(terms)).collect();
        (vectorizer, rows)
    }

    /// Project normalized text into the fitted space. Unknown terms are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        self.weigh(&self.analyzer.terms(text))
    }

    fn weigh(&self, terms: &[String]) -> SparseVector {
        let mut counts: BTreeMap<usize, f32> = BTreeMap::new();
        for term in terms {
            if let Some(&id) = self.vocabulary.get(term) {
                *counts.entry(id).or_default() += 1.0;
            }
        }
        for (id, count) in counts.iter_mut() {
            *count *= self.idf[*id];
        }
        SparseVector::from_weights(counts)
    }

    pub fn vocabulary_len(&self) -> usize { self.vocabulary.len() }

    pub fn contains(&self, term: &str) -> bool { self.vocabulary.contains_key(term) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LexicalConfig {
        LexicalConfig { stop_words: Vec::new(), ..LexicalConfig::default() }
    }

    fn docs(texts: &[&str]) -> Vec<String> { texts.iter().map(|t| t.to_string()).collect() }

    #[test]
    fn near_universal_terms_are_dropped() {
        let (v, _) = TfidfVectorizer::fit_transform(&docs(&["hoc may", "hoc sau", "hoc tang cuong"]), &config());
        assert!(!v.contains("hoc"), "present in every document");
        assert!(v.contains("may"));
        assert!(v.contains("hoc may"));
    }

    #[test]
    fn single_document_keeps_its_vocabulary() {
        let (v, rows) = TfidfVectorizer::fit_transform(&docs(&["tri tue nhan tao"]), &config());
        assert_eq!(v.vocabulary_len(), 7);
        assert!((rows[0].dot(&rows[0]) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn vocabulary_cap_keeps_most_frequent_terms() {
        let cfg = LexicalConfig { max_features: 1, ngram_range: (1, 1), ..config() };
        let (v, _) = TfidfVectorizer::fit_transform(&docs(&["mot mot hai", "ba", "bon"]), &cfg);
        assert_eq!(v.vocabulary_len(), 1);
        assert!(v.contains("mot"));
    }

    #[test]
    fn unknown_text_projects_to_zero() {
        let (v, _) = TfidfVectorizer::fit_transform(&docs(&["alpha beta", "gamma"]), &config());
        assert!(v.transform("delta epsilon").is_zero());
    }

    #[test]
    fn rarer_terms_weigh_more() {
        let (v, _) = TfidfVectorizer::fit_transform(&docs(&["a b", "a c", "d e"]), &config());
        let common = v.transform("a");
        let rare = v.transform("b");
        let both = v.transform("a b");
        assert!(both.dot(&rare) > both.dot(&common));
    }
}
