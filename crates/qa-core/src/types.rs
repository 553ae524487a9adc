//! Domain types shared by the lexical and semantic engines.

use serde::{Deserialize, Serialize};

use crate::corpus::Corpus;

/// Indicates which engine produced a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    Lexical,
    Semantic,
}

/// A corpus position and its similarity to the query. Higher is better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredIndex {
    pub index: usize,
    pub score: f32,
}

/// The surface returned by both engines.
///
/// `score` is a cosine similarity (TF-IDF space or embedding space), never a
/// probability. `matched_question` is the stored original, not its
/// normalized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub answer: String,
    pub matched_question: String,
    pub score: f32,
    pub source: MatchSource,
}

impl MatchResult {
    /// Resolve a scored corpus position into its question/answer texts.
    ///
    /// Returns `None` when `hit.index` is outside the corpus.
    pub fn from_corpus(corpus: &Corpus, hit: ScoredIndex, source: MatchSource) -> Option<Self> {
        let (question, answer) = corpus.get(hit.index)?;
        Some(Self {
            answer: answer.to_string(),
            matched_question: question.to_string(),
            score: hit.score,
            source,
        })
    }
}
