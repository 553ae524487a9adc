use std::path::{Path, PathBuf};

use tracing::{debug, info};

use qa_core::config::SemanticConfig;
use qa_core::error::{Error, Result};
use qa_core::traits::{Encoder, QuestionMatcher};
use qa_core::types::{MatchResult, MatchSource, ScoredIndex};
use qa_core::{load_corpus, Corpus, Response};
use qa_embed::load_encoder;

use crate::index::EmbeddingIndex;

struct Ready {
    encoder: Box<dyn Encoder>,
    corpus: Corpus,
    index: EmbeddingIndex,
}

/// Embedding-space question matcher.
///
/// `initialize` loads the encoder and corpus and encodes every question once;
/// it is idempotent and leaves the engine uninitialized on failure. Queries
/// always produce a best match and never apply a threshold; grading the
/// score is left to [`SemanticEngine::answer`].
pub struct SemanticEngine {
    config: SemanticConfig,
    corpus_path: PathBuf,
    ready: Option<Ready>,
}

impl SemanticEngine {
    pub fn new(config: SemanticConfig, corpus_path: impl Into<PathBuf>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, corpus_path: corpus_path.into(), ready: None })
    }

    pub fn config(&self) -> &SemanticConfig { &self.config }

    pub fn corpus_path(&self) -> &Path { &self.corpus_path }

    /// Load the configured encoder and the corpus, then encode the corpus.
    pub fn initialize(&mut self) -> Result<()> {
        if self.ready.is_some() {
            return Ok(());
        }
        let encoder = load_encoder(&self.config).map_err(|e| Error::ModelLoad(format!("{e:#}")))?;
        let corpus = load_corpus(&self.corpus_path)?;
        self.initialize_with(encoder, corpus)
    }

    /// Initialize from an already-loaded encoder and corpus.
    pub fn initialize_with(&mut self, encoder: Box<dyn Encoder>, corpus: Corpus) -> Result<()> {
        if self.ready.is_some() {
            return Ok(());
        }
        if corpus.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let index = EmbeddingIndex::build(encoder.as_ref(), corpus.questions(), self.config.batch_size, self.config.show_progress)
            .map_err(|e| Error::Encoder(format!("{e:#}")))?;
        info!(questions = corpus.len(), encoder = encoder.name(), "semantic engine ready");
        self.ready = Some(Ready { encoder, corpus, index });
        Ok(())
    }

    pub fn is_initialized(&self) -> bool { self.ready.is_some() }

    /// Name and dimension of the loaded encoder.
    pub fn encoder_info(&self) -> Option<(&str, usize)> {
        self.ready.as_ref().map(|r| (r.encoder.name(), r.index.dim()))
    }

    fn ready(&self) -> Result<&Ready> {
        self.ready.as_ref().ok_or(Error::NotInitialized)
    }

    /// The single closest corpus question and its raw cosine similarity.
    ///
    /// A failing encoder fails only this query.
    pub fn find(&self, query: &str) -> Result<ScoredIndex> {
        let ready = self.ready()?;
        let embedding = ready.encoder.embed(query).map_err(|e| Error::Encoder(format!("{e:#}")))?;
        if embedding.len() != ready.index.dim() {
            return Err(Error::Encoder(format!(
                "query embedding has dimension {}, index has {}",
                embedding.len(),
                ready.index.dim()
            )));
        }
        let best = ready
            .index
            .nearest(&embedding)
            .ok_or_else(|| Error::Encoder("query embedding has no comparable similarity".into()))?;
        debug!(index = best.index, score = best.score, "semantic best match");
        Ok(best)
    }

    /// Find the best match and shape it with the confidence policy.
    pub fn answer(&self, query: &str) -> Result<Response> {
        let best = self.find(query)?;
        let corpus = &self.ready()?.corpus;
        let (question, answer) = corpus.get(best.index).ok_or(Error::EmptyCorpus)?;
        Ok(self.config.confidence.respond(best.score, question, answer))
    }
}

impl QuestionMatcher for SemanticEngine {
    fn corpus(&self) -> Result<&Corpus> {
        Ok(&self.ready()?.corpus)
    }

    fn best_match(&self, query: &str) -> Result<Option<MatchResult>> {
        let best = self.find(query)?;
        Ok(MatchResult::from_corpus(&self.ready()?.corpus, best, MatchSource::Semantic))
    }
}
