//! qa-core
//!
//! Shared vocabulary for the question-matching engines: corpus loading,
//! configuration, the error taxonomy, retrieval helpers and the
//! confidence-tiered responder.

pub mod config;
pub mod corpus;
pub mod error;
pub mod responder;
pub mod retrieval;
pub mod traits;
pub mod types;

pub use corpus::{load_corpus, Corpus};
pub use error::{Error, Result};
pub use responder::{respond, ConfidencePolicy, ConfidenceTier, Response};
pub use types::{MatchResult, ScoredIndex};
