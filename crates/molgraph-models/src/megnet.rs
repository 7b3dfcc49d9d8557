//! MEGNet-style graph network (Chen et al., "Graph Networks as a
//! Universal Machine Learning Framework for Molecules and Crystals").
//!
//! Each block updates edges from their endpoints and the graph state,
//! nodes from their incident edges and the state, and the state from
//! both means. Blocks are wrapped with residual additions; the readout
//! runs set2set over nodes and edges (or plain pooling) and concatenates
//! the state before the output head.

use crate::config::MegnetConfig;
use crate::inputs::InputEncoder;
use crate::message::{aggregate_edges, edge_endpoints, gather_nodes, Aggregate};
use crate::mlp::Mlp;
use crate::pooling::{PoolingMethod, PoolingNodes, Set2Set};
use candle_core::{bail, Module, Result, Tensor};
use candle_nn::{linear, Dropout, Linear, VarBuilder};

#[derive(Debug)]
pub struct MegnetBlock {
    phi_e: Mlp,
    phi_v: Mlp,
    phi_u: Mlp,
}

impl MegnetBlock {
    /// `dims` are the incoming (node, edge, state) widths; every update
    /// network ends on the block MLP's last width.
    pub fn load(vb: VarBuilder, dims: (usize, usize, usize), cfg: &MegnetConfig) -> Result<Self> {
        let (v, e, u) = dims;
        let out = cfg.block_mlp.out_dim().unwrap_or(0);
        let phi_e = Mlp::load(vb.pp("phi_e"), e + 2 * v + u, &cfg.block_mlp)?;
        let phi_v = Mlp::load(vb.pp("phi_v"), v + out + u, &cfg.block_mlp)?;
        let phi_u = Mlp::load(vb.pp("phi_u"), u + 2 * out, &cfg.block_mlp)?;
        Ok(MegnetBlock {
            phi_e,
            phi_v,
            phi_u,
        })
    }

    /// `h`: `[N, V]`, `e`: `[E, F]`, `u`: `[1, U]`; endpoint columns from
    /// [edge_endpoints]. Returns the updated (nodes, edges, state).
    pub fn forward(
        &self,
        h: &Tensor,
        e: &Tensor,
        u: &Tensor,
        src: &Tensor,
        dst: &Tensor,
    ) -> Result<(Tensor, Tensor, Tensor)> {
        let node_count = h.dim(0)?;
        let edge_count = e.dim(0)?;
        let state_width = u.dim(1)?;

        let h_src = gather_nodes(h, src)?;
        let h_dst = gather_nodes(h, dst)?;
        let u_per_edge = u.broadcast_as((edge_count, state_width))?;
        let e_new = self
            .phi_e
            .forward(&Tensor::cat(&[e, &h_src, &h_dst, &u_per_edge], 1)?)?;

        let aggregated = aggregate_edges(&e_new, dst, node_count, Aggregate::Mean)?;
        let u_per_node = u.broadcast_as((node_count, state_width))?;
        let v_new = self
            .phi_v
            .forward(&Tensor::cat(&[h, &aggregated, &u_per_node], 1)?)?;

        let mean_e = e_new.mean_keepdim(0)?;
        let mean_v = v_new.mean_keepdim(0)?;
        let u_new = self.phi_u.forward(&Tensor::cat(&[u, &mean_e, &mean_v], 1)?)?;

        Ok((v_new, e_new, u_new))
    }
}

#[derive(Debug)]
enum Readout {
    Set2Set {
        node_proj: Linear,
        edge_proj: Linear,
        nodes: Set2Set,
        edges: Set2Set,
    },
    Pooling(PoolingNodes),
}

#[derive(Debug)]
struct BlockUnit {
    // feed-forward in front of every block after the first, kgcnn's has_ff
    ff: Option<(Mlp, Mlp, Mlp)>,
    block: MegnetBlock,
}

#[derive(Debug)]
pub struct Megnet {
    node_encoder: InputEncoder,
    edge_encoder: InputEncoder,
    state_encoder: InputEncoder,
    node_ff: Mlp,
    edge_ff: Mlp,
    state_ff: Mlp,
    blocks: Vec<BlockUnit>,
    dropout: Option<Dropout>,
    readout: Readout,
    output_mlp: Mlp,
}

impl Megnet {
    pub fn load(vb: VarBuilder, cfg: &MegnetConfig) -> Result<Self> {
        let (Some(v), Some(e), Some(u)) = (
            cfg.node_ff.out_dim(),
            cfg.edge_ff.out_dim(),
            cfg.state_ff.out_dim(),
        ) else {
            bail!("megnet feed-forward configs need at least one layer");
        };
        let Some(block_out) = cfg.block_mlp.out_dim() else {
            bail!("megnet block mlp config has no layers");
        };
        if block_out != v || block_out != e || block_out != u {
            bail!(
                "megnet block output width {block_out} must match the feed-forward widths ({v}, {e}, {u}) for residual addition"
            );
        }

        let node_encoder = InputEncoder::load(vb.pp("node_embedding"), cfg.node_input)?;
        let edge_encoder = InputEncoder::load(vb.pp("edge_embedding"), cfg.edge_input)?;
        let state_encoder = InputEncoder::load(vb.pp("state_embedding"), cfg.state_input)?;
        let node_ff = Mlp::load(vb.pp("node_ff"), cfg.node_input.encoded_dim(), &cfg.node_ff)?;
        let edge_ff = Mlp::load(vb.pp("edge_ff"), cfg.edge_input.encoded_dim(), &cfg.edge_ff)?;
        let state_ff = Mlp::load(
            vb.pp("state_ff"),
            cfg.state_input.encoded_dim(),
            &cfg.state_ff,
        )?;

        let mut blocks = Vec::with_capacity(cfg.blocks);
        for i in 0..cfg.blocks {
            let vb = vb.pp(format!("block_{i}"));
            let ff = if cfg.has_ff && i > 0 {
                Some((
                    Mlp::load(vb.pp("node_ff"), v, &cfg.node_ff)?,
                    Mlp::load(vb.pp("edge_ff"), e, &cfg.edge_ff)?,
                    Mlp::load(vb.pp("state_ff"), u, &cfg.state_ff)?,
                ))
            } else {
                None
            };
            blocks.push(BlockUnit {
                ff,
                block: MegnetBlock::load(vb.pp("megnet"), (v, e, u), cfg)?,
            });
        }

        let (readout, readout_width) = match &cfg.set2set {
            Some(s2s) => {
                let node_proj = linear(v, s2s.channels, vb.pp("node_proj"))?;
                let edge_proj = linear(e, s2s.channels, vb.pp("edge_proj"))?;
                let nodes = Set2Set::load(vb.pp("set2set_nodes"), s2s)?;
                let edges = Set2Set::load(vb.pp("set2set_edges"), s2s)?;
                (
                    Readout::Set2Set {
                        node_proj,
                        edge_proj,
                        nodes,
                        edges,
                    },
                    4 * s2s.channels + u,
                )
            }
            None => (
                Readout::Pooling(PoolingNodes::new(PoolingMethod::Sum)),
                v + e + u,
            ),
        };
        let output_mlp = Mlp::load(vb.pp("output_mlp"), readout_width, &cfg.output_mlp)?;

        Ok(Megnet {
            node_encoder,
            edge_encoder,
            state_encoder,
            node_ff,
            edge_ff,
            state_ff,
            blocks,
            dropout: cfg.dropout.map(|rate| Dropout::new(rate as f32)),
            readout,
            output_mlp,
        })
    }

    fn drop(&self, xs: Tensor, train: bool) -> Result<Tensor> {
        match &self.dropout {
            Some(dropout) => dropout.forward(&xs, train),
            None => Ok(xs),
        }
    }

    /// `nodes` and `edges` follow their configured input kinds,
    /// `edge_index` is `[E, 2]`, `state` is `[1, S]` features or a `[1]`
    /// id. Returns `[1, output_width]`.
    pub fn forward_t(
        &self,
        nodes: &Tensor,
        edges: &Tensor,
        edge_index: &Tensor,
        state: &Tensor,
        train: bool,
    ) -> Result<Tensor> {
        let (src, dst) = edge_endpoints(edge_index)?;
        let mut vp = self.node_ff.forward(&self.node_encoder.forward(nodes)?)?;
        let mut ep = self.edge_ff.forward(&self.edge_encoder.forward(edges)?)?;
        let mut up = self.state_ff.forward(&self.state_encoder.forward(state)?)?;

        for unit in &self.blocks {
            let (v2, e2, u2) = match &unit.ff {
                Some((node_ff, edge_ff, state_ff)) => (
                    node_ff.forward(&vp)?,
                    edge_ff.forward(&ep)?,
                    state_ff.forward(&up)?,
                ),
                None => (vp.clone(), ep.clone(), up.clone()),
            };
            let (v3, e3, u3) = unit.block.forward(&v2, &e2, &u2, &src, &dst)?;
            let v3 = self.drop(v3, train)?;
            let e3 = self.drop(e3, train)?;
            let u3 = self.drop(u3, train)?;
            vp = (vp + v3)?;
            ep = (ep + e3)?;
            up = (up + u3)?;
        }

        let (pooled_nodes, pooled_edges) = match &self.readout {
            Readout::Set2Set {
                node_proj,
                edge_proj,
                nodes,
                edges,
            } => (
                nodes.forward(&node_proj.forward(&vp)?)?,
                edges.forward(&edge_proj.forward(&ep)?)?,
            ),
            Readout::Pooling(pooling) => (pooling.forward(&vp)?, pooling.forward(&ep)?),
        };
        let final_vec = Tensor::cat(&[&pooled_nodes, &pooled_edges, &up], 1)?;
        let final_vec = self.drop(final_vec, train)?;
        self.output_mlp.forward(&final_vec)
    }

    pub fn forward(
        &self,
        nodes: &Tensor,
        edges: &Tensor,
        edge_index: &Tensor,
        state: &Tensor,
    ) -> Result<Tensor> {
        self.forward_t(nodes, edges, edge_index, state, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::Act;
    use crate::config::MegnetConfigUpdate;
    use crate::inputs::InputKind;
    use crate::mlp::MlpConfig;
    use crate::pooling::Set2SetConfig;
    use candle_core::{DType, Device};

    fn small_config() -> MegnetConfig {
        MegnetConfig::with_update(&MegnetConfigUpdate {
            node_input: Some(InputKind::Index {
                vocab: 10,
                embed_dim: 8,
            }),
            edge_input: Some(InputKind::Feature { dim: 1 }),
            state_input: Some(InputKind::Feature { dim: 2 }),
            blocks: Some(2),
            node_ff: Some(MlpConfig::uniform(&[8, 4], Act::Softplus2)),
            edge_ff: Some(MlpConfig::uniform(&[8, 4], Act::Softplus2)),
            state_ff: Some(MlpConfig::uniform(&[8, 4], Act::Softplus2)),
            block_mlp: Some(MlpConfig::uniform(&[8, 4, 4], Act::Softplus2)),
            set2set: Some(Some(Set2SetConfig {
                channels: 4,
                iterations: 2,
            })),
            output_mlp: Some(MlpConfig::uniform(&[4, 1], Act::Linear)),
            ..Default::default()
        })
    }

    fn sample_inputs(device: &Device) -> Result<(Tensor, Tensor, Tensor, Tensor)> {
        let nodes = Tensor::new(&[6u32, 8, 1], device)?;
        let edge_index = Tensor::new(&[[0u32, 1], [1, 0], [1, 2], [2, 1]], device)?;
        let edges = Tensor::new(&[[1.0f32], [1.0], [2.0], [2.0]], device)?;
        let state = Tensor::new(&[[0.5f32, -0.5]], device)?;
        Ok((nodes, edges, edge_index, state))
    }

    #[test]
    fn test_forward_shape_with_set2set() -> Result<()> {
        let device = Device::Cpu;
        let vb = VarBuilder::zeros(DType::F32, &device);
        let model = Megnet::load(vb, &small_config())?;
        let (nodes, edges, edge_index, state) = sample_inputs(&device)?;
        let out = model.forward(&nodes, &edges, &edge_index, &state)?;
        assert_eq!(out.dims(), [1, 1]);
        Ok(())
    }

    #[test]
    fn test_forward_shape_with_sum_pooling() -> Result<()> {
        let device = Device::Cpu;
        let mut cfg = small_config();
        cfg.set2set = None;
        let vb = VarBuilder::zeros(DType::F32, &device);
        let model = Megnet::load(vb, &cfg)?;
        let (nodes, edges, edge_index, state) = sample_inputs(&device)?;
        let out = model.forward(&nodes, &edges, &edge_index, &state)?;
        assert_eq!(out.dims(), [1, 1]);
        Ok(())
    }

    #[test]
    fn test_block_width_mismatch_rejected() {
        let mut cfg = small_config();
        cfg.block_mlp = MlpConfig::uniform(&[8, 2], Act::Softplus2);
        let vb = VarBuilder::zeros(DType::F32, &Device::Cpu);
        assert!(Megnet::load(vb, &cfg).is_err());
    }
}
