//! qa-bot
//!
//! Engine selection and answer shaping on top of the two matchers. A
//! [`Chatbot`] is built once (the expensive step) and then answers any number
//! of queries through `&self`; hosts memoize it however suits them.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use qa_core::config::Settings;
use qa_core::traits::QuestionMatcher;
use qa_core::{ConfidencePolicy, ConfidenceTier};
use qa_text::LexicalEngine;
use qa_vector::SemanticEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Lexical,
    Semantic,
}

impl FromStr for EngineKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "lexical" | "tfidf" | "tf-idf" => Ok(Self::Lexical),
            "semantic" | "embedding" => Ok(Self::Semantic),
            other => Err(anyhow!("unknown engine '{other}' (expected lexical or semantic)")),
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexical => f.write_str("lexical"),
            Self::Semantic => f.write_str("semantic"),
        }
    }
}

/// How a best match is turned into text.
#[derive(Debug, Clone)]
pub enum AnswerPolicy {
    /// The matcher already applied a hard floor; answer verbatim or fall back.
    Threshold { fallback: String },
    /// Grade the best match by confidence tier.
    Tiered(ConfidencePolicy),
}

/// One reply to a user query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub score: Option<f32>,
    /// Empty when nothing was matched or the match was not trusted.
    pub matched_question: String,
    pub tier: Option<ConfidenceTier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub engine: EngineKind,
    pub questions: usize,
    pub index: String,
}

pub struct Chatbot {
    kind: EngineKind,
    matcher: Box<dyn QuestionMatcher>,
    policy: AnswerPolicy,
    index_description: String,
}

impl Chatbot {
    /// Load the corpus at `corpus_path` and build the chosen engine.
    pub fn build(kind: EngineKind, settings: &Settings, corpus_path: &Path) -> Result<Self> {
        info!(engine = %kind, corpus = %corpus_path.display(), "building chatbot");
        match kind {
            EngineKind::Lexical => {
                let mut engine = LexicalEngine::new(settings.lexical.clone())?;
                engine.load_path(corpus_path)?;
                engine.train()?;
                Ok(Self::lexical(engine))
            }
            EngineKind::Semantic => {
                let mut engine = SemanticEngine::new(settings.semantic.clone(), corpus_path)?;
                engine.initialize()?;
                Ok(Self::semantic(engine))
            }
        }
    }

    pub fn lexical(engine: LexicalEngine) -> Self {
        let fallback = engine.config().fallback_answer.clone();
        let index_description = format!("tf-idf vocabulary of {} terms", engine.vocabulary_len().unwrap_or(0));
        Self::from_matcher(EngineKind::Lexical, Box::new(engine), AnswerPolicy::Threshold { fallback }, index_description)
    }

    pub fn semantic(engine: SemanticEngine) -> Self {
        let policy = AnswerPolicy::Tiered(engine.config().confidence);
        let index_description = match engine.encoder_info() {
            Some((name, dim)) => format!("{name} embeddings ({dim} dims)"),
            None => "uninitialized".to_string(),
        };
        Self::from_matcher(EngineKind::Semantic, Box::new(engine), policy, index_description)
    }

    /// Wrap any prebuilt matcher.
    pub fn from_matcher(
        kind: EngineKind,
        matcher: Box<dyn QuestionMatcher>,
        policy: AnswerPolicy,
        index_description: String,
    ) -> Self {
        Self { kind, matcher, policy, index_description }
    }

    pub fn kind(&self) -> EngineKind { self.kind }

    pub fn reply(&self, query: &str) -> qa_core::Result<Reply> {
        let best = self.matcher.best_match(query)?;
        let reply = match (&self.policy, best) {
            (AnswerPolicy::Threshold { fallback }, None) => {
                Reply { text: fallback.clone(), score: None, matched_question: String::new(), tier: None }
            }
            (AnswerPolicy::Threshold { .. }, Some(m)) => {
                Reply { text: m.answer, score: Some(m.score), matched_question: m.matched_question, tier: None }
            }
            (AnswerPolicy::Tiered(policy), Some(m)) => {
                let r = policy.respond(m.score, &m.matched_question, &m.answer);
                Reply { text: r.text, score: Some(r.score), matched_question: r.matched_question, tier: Some(r.tier) }
            }
            (AnswerPolicy::Tiered(policy), None) => {
                let r = policy.respond(0.0, "", "");
                Reply { text: r.text, score: None, matched_question: String::new(), tier: Some(r.tier) }
            }
        };
        debug!(engine = %self.kind, score = ?reply.score, matched = %reply.matched_question, "reply");
        Ok(reply)
    }

    pub fn stats(&self) -> qa_core::Result<Stats> {
        Ok(Stats {
            engine: self.kind,
            questions: self.matcher.corpus()?.len(),
            index: self.index_description.clone(),
        })
    }
}
