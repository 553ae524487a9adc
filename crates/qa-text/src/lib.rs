//! qa-text
//!
//! Lexical question matching: Unicode normalization, a tantivy-tokenized
//! TF-IDF vectorizer and the thresholded [`LexicalEngine`].

pub mod analyzer;
pub mod engine;
pub mod normalize;
pub mod tfidf;

pub use engine::{LexicalEngine, LexicalIndex};
pub use normalize::normalize;
pub use tfidf::{SparseVector, TfidfVectorizer};
