use anyhow::{anyhow, Result};
use candle_core::{Device, Tensor};
use tokenizers::{Tokenizer, TruncationParams};

/// Prepare a loaded tokenizer for batch encoding and return its pad id.
///
/// Built-in padding is disabled (batches are padded by [`tokenize_batch`])
/// and truncation is set to `max_len` tokens including special tokens, so a
/// long input keeps its closing `[SEP]`/`</s>`.
pub fn prepare_tokenizer(tokenizer: &mut Tokenizer, max_len: usize) -> Result<u32> {
    let pad_id = tokenizer
        .get_padding()
        .map(|p| p.pad_id)
        .or_else(|| tokenizer.token_to_id("<pad>"))
        .or_else(|| tokenizer.token_to_id("[PAD]"))
        .unwrap_or(0);
    tokenizer.with_padding(None);
    tokenizer
        .with_truncation(Some(TruncationParams { max_length: max_len, ..TruncationParams::default() }))
        .map_err(|e| anyhow!("Failed to set truncation to {max_len} tokens: {e}"))?;
    Ok(pad_id)
}

/// Tokenize a batch and right-pad to the longest sequence. Returns
/// `(input_ids, attention_mask)`, both `[B, T]` u32.
pub fn tokenize_batch(
    tokenizer: &Tokenizer,
    texts: &[String],
    pad_id: u32,
    device: &Device,
) -> Result<(Tensor, Tensor)> {
    let inputs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let encodings = tokenizer
        .encode_batch(inputs, true)
        .map_err(|e| anyhow!("Tokenization failed: {}", e))?;

    let seq_len = encodings.iter().map(|enc| enc.get_ids().len()).max().unwrap_or(0).max(1);
    let batch = encodings.len();
    let mut flat_ids = Vec::with_capacity(batch * seq_len);
    let mut flat_mask = Vec::with_capacity(batch * seq_len);
    for enc in &encodings {
        let pad = seq_len - enc.get_ids().len();
        flat_ids.extend_from_slice(enc.get_ids());
        flat_ids.extend(std::iter::repeat(pad_id).take(pad));
        flat_mask.extend_from_slice(enc.get_attention_mask());
        flat_mask.extend(std::iter::repeat(0).take(pad));
    }

    let input_ids = Tensor::from_vec(flat_ids, (batch, seq_len), device)?;
    let attention_mask = Tensor::from_vec(flat_mask, (batch, seq_len), device)?;
    Ok((input_ids, attention_mask))
}
