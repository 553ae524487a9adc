use std::path::Path;

use tracing::{debug, info, warn};

use qa_core::config::LexicalConfig;
use qa_core::error::{Error, Result};
use qa_core::retrieval::top_k;
use qa_core::traits::QuestionMatcher;
use qa_core::types::{MatchResult, MatchSource, ScoredIndex};
use qa_core::{load_corpus, Corpus};

use crate::normalize::normalize;
use crate::tfidf::{SparseVector, TfidfVectorizer};

/// The fitted vectorizer plus one row per corpus question. Read-only.
pub struct LexicalIndex {
    vectorizer: TfidfVectorizer,
    rows: Vec<SparseVector>,
}

impl LexicalIndex {
    pub fn build(normalized_questions: &[String], config: &LexicalConfig) -> Self {
        let (vectorizer, rows) = TfidfVectorizer::fit_transform(normalized_questions, config);
        Self { vectorizer, rows }
    }

    pub fn vocabulary_len(&self) -> usize { self.vectorizer.vocabulary_len() }

    /// Cosine similarity of `normalized_query` against every row, or `None`
    /// when the query has no known terms.
    pub fn scores(&self, normalized_query: &str) -> Option<Vec<f32>> {
        let q = self.vectorizer.transform(normalized_query);
        if q.is_zero() {
            return None;
        }
        Some(self.rows.iter().map(|row| row.dot(&q)).collect())
    }
}

#[derive(Default)]
enum State {
    #[default]
    Unbuilt,
    Loaded { corpus: Corpus, normalized: Vec<String> },
    Trained { corpus: Corpus, normalized: Vec<String>, index: LexicalIndex },
}

/// TF-IDF question matcher with a hard similarity floor.
///
/// Lifecycle: `load` → `train` → any number of `find`/`answer` calls. Queries
/// take `&self` and never touch the index, so a trained engine can be shared
/// between threads.
pub struct LexicalEngine {
    config: LexicalConfig,
    state: State,
}

impl LexicalEngine {
    pub fn new(config: LexicalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, state: State::Unbuilt })
    }

    pub fn config(&self) -> &LexicalConfig { &self.config }

    /// Store the corpus and precompute normalized questions. Replaces any
    /// previous corpus; on failure the engine is left unbuilt.
    pub fn load(&mut self, corpus: Corpus) -> Result<()> {
        self.state = State::Unbuilt;
        if corpus.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let normalized = corpus.questions().iter().map(|q| normalize(q)).collect();
        debug!(pairs = corpus.len(), "lexical engine loaded corpus");
        self.state = State::Loaded { corpus, normalized };
        Ok(())
    }

    /// Read the corpus with the CSV loader, then [`Self::load`] it.
    pub fn load_path(&mut self, path: &Path) -> Result<()> {
        self.state = State::Unbuilt;
        let corpus = load_corpus(path)?;
        self.load(corpus)
    }

    pub fn train(&mut self) -> Result<()> {
        let (corpus, normalized) = match std::mem::take(&mut self.state) {
            State::Unbuilt => return Err(Error::NotLoaded),
            State::Loaded { corpus, normalized } | State::Trained { corpus, normalized, .. } => (corpus, normalized),
        };
        let index = LexicalIndex::build(&normalized, &self.config);
        if index.vocabulary_len() == 0 {
            warn!("lexical vocabulary is empty; every query will fall back");
        }
        info!(questions = corpus.len(), vocabulary = index.vocabulary_len(), "trained lexical index");
        self.state = State::Trained { corpus, normalized, index };
        Ok(())
    }

    pub fn is_loaded(&self) -> bool { !matches!(self.state, State::Unbuilt) }

    pub fn is_trained(&self) -> bool { matches!(self.state, State::Trained { .. }) }

    pub fn vocabulary_len(&self) -> Option<usize> {
        match &self.state {
            State::Trained { index, .. } => Some(index.vocabulary_len()),
            _ => None,
        }
    }

    /// Up to `top_k` matches scoring at least the similarity threshold, best
    /// first, ties in corpus order. Empty when nothing clears the threshold or
    /// the query has no usable terms.
    pub fn find(&self, query: &str, top_k_count: usize) -> Result<Vec<MatchResult>> {
        let State::Trained { corpus, index, .. } = &self.state else {
            return Err(Error::NotTrained);
        };
        let normalized = normalize(query);
        if normalized.is_empty() {
            return Ok(Vec::new());
        }
        let Some(scores) = index.scores(&normalized) else {
            debug!(query = %normalized, "query shares no terms with the vocabulary");
            return Ok(Vec::new());
        };
        let hits = top_k(&scores, top_k_count, self.config.similarity_threshold);
        Ok(resolve(corpus, &hits))
    }

    /// The best answer, or the configured fallback when nothing matches.
    pub fn answer(&self, query: &str) -> String {
        match self.find(query, 1) {
            Ok(mut hits) if !hits.is_empty() => {
                let best = hits.remove(0);
                debug!(score = best.score, matched = %best.matched_question, "lexical answer");
                best.answer
            }
            Ok(_) => self.config.fallback_answer.clone(),
            Err(e) => {
                warn!(error = %e, "lexical answer requested before training");
                self.config.fallback_answer.clone()
            }
        }
    }
}

fn resolve(corpus: &Corpus, hits: &[ScoredIndex]) -> Vec<MatchResult> {
    hits.iter()
        .filter_map(|hit| MatchResult::from_corpus(corpus, *hit, MatchSource::Lexical))
        .collect()
}

impl QuestionMatcher for LexicalEngine {
    fn corpus(&self) -> Result<&Corpus> {
        match &self.state {
            State::Unbuilt => Err(Error::NotLoaded),
            State::Loaded { corpus, .. } | State::Trained { corpus, .. } => Ok(corpus),
        }
    }

    fn best_match(&self, query: &str) -> Result<Option<MatchResult>> {
        Ok(self.find(query, 1)?.into_iter().next())
    }
}
