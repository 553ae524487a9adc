//! Ranking helpers shared by both engines.

use std::cmp::Ordering;

use crate::types::ScoredIndex;

/// Cosine similarity of two dense vectors.
///
/// A zero-norm operand yields `0.0`. The value is not clamped.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must share a dimension");
    let mut dot = 0.0f32;
    let mut na = 0.0f32;
    let mut nb = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na.sqrt() * nb.sqrt())
}

/// Descending by score, then ascending by corpus position.
fn rank(a: &ScoredIndex, b: &ScoredIndex) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then(a.index.cmp(&b.index))
}

/// The `k` best entries of `scores` whose score is at least `min_score`.
///
/// Ties keep corpus order. NaN scores never qualify.
pub fn top_k(scores: &[f32], k: usize, min_score: f32) -> Vec<ScoredIndex> {
    if k == 0 {
        return Vec::new();
    }
    let mut hits: Vec<ScoredIndex> = scores
        .iter()
        .enumerate()
        .filter(|(_, s)| **s >= min_score)
        .map(|(index, &score)| ScoredIndex { index, score })
        .collect();
    hits.sort_by(rank);
    hits.truncate(k);
    hits
}

/// The single best entry, first position winning ties. NaN scores are
/// skipped; `None` when no score is comparable.
pub fn arg_max(scores: &[f32]) -> Option<ScoredIndex> {
    let mut best: Option<ScoredIndex> = None;
    for (index, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        if best.map_or(true, |b| score > b.score) {
            best = Some(ScoredIndex { index, score });
        }
    }
    best
}
