//! qa-embed
//!
//! Sentence encoders behind [`qa_core::traits::Encoder`]: a candle BERT
//! encoder for real checkpoints and a hashing encoder for offline use.

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

use qa_core::config::{expand_path, SemanticConfig};
use qa_core::traits::Encoder;

pub mod bert;
pub mod device;
pub mod hashing;
pub mod pool;
pub mod tokenize;

pub use bert::{resolve_model_files, BertEncoder, ModelFiles};
pub use hashing::HashingEncoder;
pub use pool::masked_mean_l2;

/// Dimension used by [`HashingEncoder`] when it stands in for the real model.
pub const FAKE_EMBEDDING_DIM: usize = 384;

/// `APP_USE_FAKE_EMBEDDINGS=1|true` forces the hashing encoder.
pub fn fake_embeddings_requested() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Build the encoder described by `config`.
pub fn load_encoder(config: &SemanticConfig) -> Result<Box<dyn Encoder>> {
    if config.use_fake || fake_embeddings_requested() {
        info!("using hashing encoder");
        return Ok(Box::new(HashingEncoder::new(FAKE_EMBEDDING_DIM)));
    }
    let model_dir: Option<PathBuf> = config.model_dir.as_deref().map(expand_path);
    Ok(Box::new(BertEncoder::load(&config.model, model_dir.as_deref(), config.max_len)?))
}
