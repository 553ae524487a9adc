//! qa-vector
//!
//! Dense-embedding question matching: the in-memory [`EmbeddingIndex`] and
//! the confidence-graded [`SemanticEngine`].

pub mod engine;
pub mod index;

pub use engine::SemanticEngine;
pub use index::EmbeddingIndex;
