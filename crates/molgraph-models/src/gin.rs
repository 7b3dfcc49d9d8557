//! Graph isomorphism network (Xu et al.) for node-labelled graphs.

use crate::activation::Act;
use crate::config::GinConfig;
use crate::inputs::InputEncoder;
use crate::message::{aggregate_edges, edge_endpoints, gather_nodes, Aggregate};
use crate::mlp::Mlp;
use crate::pooling::PoolingNodes;
use candle_core::{bail, Result, Tensor};
use candle_nn::{Dropout, VarBuilder};

/// One GIN update: `h' = mlp((1 + eps) * h + sum of neighbor h)`.
#[derive(Debug)]
pub struct GinConv {
    mlp: Mlp,
    eps: f64,
}

impl GinConv {
    pub fn load(vb: VarBuilder, in_dim: usize, cfg: &GinConfig) -> Result<Self> {
        Ok(GinConv {
            mlp: Mlp::load(vb.pp("mlp"), in_dim, &cfg.gin_mlp)?,
            eps: cfg.eps,
        })
    }

    pub fn forward(&self, h: &Tensor, src: &Tensor, dst: &Tensor) -> Result<Tensor> {
        let messages = gather_nodes(h, src)?;
        let aggregated = aggregate_edges(&messages, dst, h.dim(0)?, Aggregate::Sum)?;
        let scaled = (h * (1.0 + self.eps))?;
        self.mlp.forward(&(scaled + aggregated)?)
    }
}

/// The full model: node encoding, `depth` residual GIN blocks, pooled
/// readout summed over every depth (jumping knowledge), output head.
#[derive(Debug)]
pub struct Gin {
    encoder: InputEncoder,
    convs: Vec<GinConv>,
    dropout: Option<Dropout>,
    pooling: PoolingNodes,
    output_mlp: Mlp,
    output_activation: Act,
}

impl Gin {
    pub fn load(vb: VarBuilder, cfg: &GinConfig) -> Result<Self> {
        let width = cfg.node_input.encoded_dim();
        let Some(block_out) = cfg.gin_mlp.out_dim() else {
            bail!("gin mlp config has no layers");
        };
        if block_out != width {
            bail!(
                "gin mlp output width {block_out} must match the encoded node width {width} for residual addition"
            );
        }
        let encoder = InputEncoder::load(vb.pp("node_embedding"), cfg.node_input)?;
        let mut convs = Vec::with_capacity(cfg.depth);
        for i in 0..cfg.depth {
            convs.push(GinConv::load(vb.pp(format!("conv_{i}")), width, cfg)?);
        }
        let output_mlp = Mlp::load(vb.pp("output_mlp"), width, &cfg.output_mlp)?;
        Ok(Gin {
            encoder,
            convs,
            dropout: cfg.dropout.map(|rate| Dropout::new(rate as f32)),
            pooling: PoolingNodes::new(cfg.pooling),
            output_mlp,
            output_activation: cfg.output_activation,
        })
    }

    /// `node_input` is `[N]`/`[N, 1]` ids or `[N, F]` features depending
    /// on the configured input kind; `edge_index` is `[E, 2]`. Returns
    /// `[1, output_width]`.
    pub fn forward_t(&self, node_input: &Tensor, edge_index: &Tensor, train: bool) -> Result<Tensor> {
        let (src, dst) = edge_endpoints(edge_index)?;
        let mut h = self.encoder.forward(node_input)?;
        let mut readout = self.pooling.forward(&h)?;
        for conv in &self.convs {
            let mut update = conv.forward(&h, &src, &dst)?;
            if let Some(dropout) = &self.dropout {
                update = dropout.forward(&update, train)?;
            }
            h = (h + update)?;
            readout = (readout + self.pooling.forward(&h)?)?;
        }
        let out = self.output_mlp.forward(&readout)?;
        self.output_activation.forward(&out)
    }

    pub fn forward(&self, node_input: &Tensor, edge_index: &Tensor) -> Result<Tensor> {
        self.forward_t(node_input, edge_index, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GinConfigUpdate;
    use crate::inputs::InputKind;
    use crate::mlp::MlpConfig;
    use candle_core::{DType, Device};

    fn small_config() -> GinConfig {
        GinConfig::with_update(&GinConfigUpdate {
            node_input: Some(InputKind::Index {
                vocab: 10,
                embed_dim: 8,
            }),
            depth: Some(2),
            gin_mlp: Some(MlpConfig::uniform(&[8, 8], Act::Relu)),
            output_mlp: Some(MlpConfig::uniform(&[4, 2], Act::Linear)),
            output_activation: Some(Act::Softmax),
            ..Default::default()
        })
    }

    #[test]
    fn test_forward_shape() -> Result<()> {
        let device = Device::Cpu;
        let vb = VarBuilder::zeros(DType::F32, &device);
        let gin = Gin::load(vb, &small_config())?;
        // a triangle, both directions per edge
        let nodes = Tensor::new(&[1u32, 2, 3], &device)?;
        let edge_index = Tensor::new(
            &[[0u32, 1], [1, 0], [1, 2], [2, 1], [2, 0], [0, 2]],
            &device,
        )?;
        let out = gin.forward(&nodes, &edge_index)?;
        assert_eq!(out.dims(), [1, 2]);
        // softmax head
        let total = out.sum_all()?.to_scalar::<f32>()?;
        assert!((total - 1.0).abs() < 1e-5);
        Ok(())
    }

    #[test]
    fn test_residual_width_mismatch_rejected() {
        let mut cfg = small_config();
        cfg.gin_mlp = MlpConfig::uniform(&[8, 4], Act::Relu);
        let vb = VarBuilder::zeros(DType::F32, &Device::Cpu);
        assert!(Gin::load(vb, &cfg).is_err());
    }
}
