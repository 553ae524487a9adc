use anyhow::{ensure, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use qa_core::retrieval::{arg_max, cosine_similarity};
use qa_core::traits::Encoder;
use qa_core::types::ScoredIndex;

/// One embedding per corpus question, computed once. Read-only.
#[derive(Debug, Clone)]
pub struct EmbeddingIndex {
    rows: Vec<Vec<f32>>,
    dim: usize,
}

impl EmbeddingIndex {
    /// Encode `questions` in batches of `batch_size`.
    pub fn build(encoder: &dyn Encoder, questions: &[String], batch_size: usize, show_progress: bool) -> Result<Self> {
        let dim = encoder.dim();
        let pb = if show_progress { ProgressBar::new(questions.len() as u64) } else { ProgressBar::hidden() };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} questions ({percent}%)")?
                .progress_chars("#>-"),
        );

        let mut rows = Vec::with_capacity(questions.len());
        for batch in questions.chunks(batch_size.max(1)) {
            let embeddings = encoder.embed_batch(batch)?;
            ensure!(
                embeddings.len() == batch.len(),
                "encoder returned {} vectors for {} texts",
                embeddings.len(),
                batch.len()
            );
            for e in &embeddings {
                ensure!(e.len() == dim, "embedding dimension {} != encoder dimension {}", e.len(), dim);
            }
            rows.extend(embeddings);
            pb.inc(batch.len() as u64);
        }
        pb.finish_and_clear();
        info!(questions = rows.len(), dim, encoder = encoder.name(), "encoded corpus questions");
        Ok(Self { rows, dim })
    }

    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn dim(&self) -> usize { self.dim }

    /// Cosine similarity of `query` against every row.
    pub fn scores(&self, query: &[f32]) -> Vec<f32> {
        self.rows.iter().map(|row| cosine_similarity(row, query)).collect()
    }

    /// The best-scoring row; first row wins ties. `None` for an empty index or
    /// when every similarity is NaN.
    pub fn nearest(&self, query: &[f32]) -> Option<ScoredIndex> {
        arg_max(&self.scores(query))
    }
}
