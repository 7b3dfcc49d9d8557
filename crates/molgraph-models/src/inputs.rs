//! Tagged input kinds.
//!
//! Whether an input needs an embedding layer is decided once, at
//! configuration time, instead of being re-inferred from tensor shapes:
//! an `Index` input is a column of categorical ids (atomic numbers, bond
//! types) that gets an embedding, a `Feature` input already has a
//! feature dimension and passes through.

use candle_core::{DType, Result, Tensor};
use candle_nn::{embedding, Embedding, Module, VarBuilder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputKind {
    /// Raw feature vectors of width `dim`, used as-is.
    Feature { dim: usize },
    /// Categorical ids below `vocab`, embedded to `embed_dim`.
    Index { vocab: usize, embed_dim: usize },
}

impl InputKind {
    /// Feature width after encoding.
    pub fn encoded_dim(&self) -> usize {
        match self {
            InputKind::Feature { dim } => *dim,
            InputKind::Index { embed_dim, .. } => *embed_dim,
        }
    }
}

/// The encoder a given [InputKind] translates to.
#[derive(Debug)]
pub enum InputEncoder {
    Passthrough,
    Embed(Embedding),
}

impl InputEncoder {
    pub fn load(vb: VarBuilder, kind: InputKind) -> Result<Self> {
        match kind {
            InputKind::Feature { .. } => Ok(InputEncoder::Passthrough),
            InputKind::Index { vocab, embed_dim } => {
                Ok(InputEncoder::Embed(embedding(vocab, embed_dim, vb)?))
            }
        }
    }

    /// Accepts `[N]` or `[N, 1]` id tensors for the embedding case and
    /// `[N, F]` feature tensors for the passthrough case.
    pub fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        match self {
            InputEncoder::Passthrough => Ok(xs.clone()),
            InputEncoder::Embed(embedding) => {
                let ids = if xs.rank() == 2 {
                    xs.squeeze(1)?
                } else {
                    xs.clone()
                };
                embedding.forward(&ids.to_dtype(DType::U32)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    #[test]
    fn test_index_input_embeds() -> Result<()> {
        let vb = VarBuilder::zeros(DType::F32, &Device::Cpu);
        let kind = InputKind::Index {
            vocab: 10,
            embed_dim: 4,
        };
        let encoder = InputEncoder::load(vb, kind)?;
        let ids = Tensor::new(&[1u32, 3, 7], &Device::Cpu)?;
        let out = encoder.forward(&ids)?;
        assert_eq!(out.dims(), [3, 4]);
        assert_eq!(kind.encoded_dim(), 4);
        Ok(())
    }

    #[test]
    fn test_feature_input_passes_through() -> Result<()> {
        let vb = VarBuilder::zeros(DType::F32, &Device::Cpu);
        let encoder = InputEncoder::load(vb, InputKind::Feature { dim: 3 })?;
        let xs = Tensor::zeros((5, 3), DType::F32, &Device::Cpu)?;
        let out = encoder.forward(&xs)?;
        assert_eq!(out.dims(), [5, 3]);
        Ok(())
    }
}
