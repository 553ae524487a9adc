use crate::corpus::Corpus;
use crate::error::Result;
use crate::types::MatchResult;

/// A sentence encoder mapping texts to fixed-length dense vectors.
pub trait Encoder: Send + Sync {
    /// Stable identifier of the underlying model.
    fn name(&self) -> &str;
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;

    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| anyhow::anyhow!("encoder returned no vector for a single input"))
    }
}

/// The retrieval shape both engines share: one query in, the best match out.
///
/// Implementations differ in how the score is produced and whether a weak
/// best match is reported at all; callers decide how to present it.
pub trait QuestionMatcher: Send + Sync {
    fn corpus(&self) -> Result<&Corpus>;
    fn best_match(&self, query: &str) -> Result<Option<MatchResult>>;
}
