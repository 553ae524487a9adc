use anyhow::{ensure, Result};
use candle_core::{DType, Tensor};

/// Mean of `hidden` `[B, T, H]` over positions where `attention_mask` `[B, T]`
/// is set, then L2-normalized per row. Returns `[B, H]`.
pub fn masked_mean_l2(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    let dims = hidden.dims();
    ensure!(dims.len() == 3, "hidden shape must be [B,T,H], got {:?}", dims);
    let (batch, hidden_dim) = (dims[0], dims[2]);

    let mask = attention_mask.to_device(hidden.device())?.to_dtype(hidden.dtype())?;
    let mask_broadcast = mask.unsqueeze(2)?.broadcast_as(hidden.shape())?;
    let sum = (hidden * &mask_broadcast)?.sum(1)?;
    let lengths = mask.sum(1)?.unsqueeze(1)?.to_dtype(sum.dtype())?;
    let eps_val = match hidden.dtype() { DType::F16 => 1e-6f64, _ => 1e-12f64 };
    let mean = sum.broadcast_div(&lengths.clamp(eps_val, f64::MAX)?)?;

    let norm = mean.sqr()?.sum_keepdim(1)?.sqrt()?;
    let norm = (norm + eps_val)?;
    let out = mean.broadcast_div(&norm)?;
    ensure!(out.dims() == [batch, hidden_dim].as_slice(), "pooled shape {:?}", out.dims());
    Ok(out)
}
