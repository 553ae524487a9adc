use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use hf_hub::{api::sync::Api, Repo, RepoType};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use qa_core::traits::Encoder;

use crate::device::select_device;
use crate::pool::masked_mean_l2;
use crate::tokenize::{prepare_tokenizer, tokenize_batch};

/// On-disk artifacts of a sentence-transformers BERT checkpoint.
#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: PathBuf,
}

/// Sentence encoder: BERT forward pass, mean pooling over real tokens, L2 norm.
pub struct BertEncoder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    name: String,
    dim: usize,
    max_len: usize,
    pad_id: u32,
}

impl BertEncoder {
    /// Load `model` from `model_dir` (or `APP_MODEL_DIR`/`MODEL_DIR`), falling
    /// back to the Hugging Face hub cache.
    pub fn load(model: &str, model_dir: Option<&Path>, max_len: usize) -> Result<Self> {
        let files = resolve_model_files(model, model_dir)?;
        Self::from_files(model, &files, max_len)
    }

    pub fn from_files(name: &str, files: &ModelFiles, max_len: usize) -> Result<Self> {
        let device = select_device();
        info!(model = name, "loading sentence encoder");

        let mut tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", files.tokenizer.display(), e))?;
        let pad_id = prepare_tokenizer(&mut tokenizer, max_len)?;

        let config_text = std::fs::read_to_string(&files.config)
            .with_context(|| format!("Failed to read {}", files.config.display()))?;
        let config: BertConfig = serde_json::from_str(&config_text).context("Failed to parse model config")?;
        let raw: serde_json::Value = serde_json::from_str(&config_text)?;
        let dim = raw
            .get("hidden_size")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| anyhow!("model config has no hidden_size"))? as usize;

        let vb = load_weights(&files.weights, &device)?;
        let model = BertModel::load(vb, &config).context("Failed to build BERT model")?;
        info!(model = name, dim, "sentence encoder ready");

        Ok(Self { model, tokenizer, device, name: name.to_string(), dim, max_len, pad_id })
    }

    fn forward(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let (input_ids, attention_mask) =
            tokenize_batch(&self.tokenizer, texts, self.pad_id, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled: Tensor = masked_mean_l2(&hidden, &attention_mask)?;
        Ok(pooled.to_device(&Device::Cpu)?.to_vec2::<f32>()?)
    }
}

impl Encoder for BertEncoder {
    fn name(&self) -> &str { &self.name }
    fn dim(&self) -> usize { self.dim }
    fn max_len(&self) -> usize { self.max_len }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let start = Instant::now();
        let out = self.forward(texts)?;
        let elapsed = start.elapsed();
        if elapsed.as_millis() > 100 * texts.len() as u128 {
            warn!(?elapsed, batch = texts.len(), "slow embedding");
        } else {
            debug!(?elapsed, batch = texts.len(), "embedded batch");
        }
        Ok(out)
    }
}

fn load_weights(path: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let is_safetensors = path.extension().and_then(|e| e.to_str()) == Some("safetensors");
    if is_safetensors {
        // SAFETY: the weights file is not modified while the model is alive.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[path], DType::F32, device) }
            .with_context(|| format!("Failed to map {}", path.display()))?;
        Ok(vb)
    } else {
        let weights = candle_core::pickle::read_all(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let weights_map: HashMap<String, Tensor> = weights.into_iter().collect();
        Ok(VarBuilder::from_tensors(weights_map, DType::F32, device))
    }
}

/// Locate model files: explicit directory, then `APP_MODEL_DIR`/`MODEL_DIR`,
/// then the hub repository named `model`.
pub fn resolve_model_files(model: &str, model_dir: Option<&Path>) -> Result<ModelFiles> {
    if let Some(dir) = model_dir {
        return local_model_files(dir);
    }
    for var in ["APP_MODEL_DIR", "MODEL_DIR"] {
        if let Ok(dir) = std::env::var(var) {
            let p = PathBuf::from(&dir);
            if p.exists() {
                info!(dir = %p.display(), "using {var}");
                return local_model_files(&p);
            }
        }
    }
    hub_model_files(model)
}

fn local_model_files(dir: &Path) -> Result<ModelFiles> {
    let config = dir.join("config.json");
    let tokenizer = dir.join("tokenizer.json");
    for required in [&config, &tokenizer] {
        if !required.exists() {
            return Err(anyhow!("Model file missing: {}", required.display()));
        }
    }
    let weights = ["model.safetensors", "pytorch_model.bin"]
        .iter()
        .map(|f| dir.join(f))
        .find(|p| p.exists())
        .ok_or_else(|| anyhow!("No model weights under {}", dir.display()))?;
    Ok(ModelFiles { config, tokenizer, weights })
}

fn hub_model_files(model: &str) -> Result<ModelFiles> {
    info!(model, "fetching encoder from the Hugging Face hub");
    let api = Api::new().context("Failed to create HuggingFace API client")?;
    let repo = api.repo(Repo::new(model.to_string(), RepoType::Model));
    let config = repo.get("config.json").context("Failed to download model config")?;
    let tokenizer = repo.get("tokenizer.json").context("Failed to download tokenizer")?;
    let weights = repo
        .get("model.safetensors")
        .or_else(|_| repo.get("pytorch_model.bin"))
        .context("Failed to download model weights")?;
    Ok(ModelFiles { config, tokenizer, weights })
}
