//! Model configuration.
//!
//! Two layers of merging exist. Raw JSON argument maps use
//! [merge_config], a shallow overlay where an override value replaces a
//! default value wholesale (nested maps included; this is a documented
//! shallow-merge policy, not a deep merge). Typed configs use explicit
//! `*Update` structs of optional fields with override-if-present
//! semantics per field, which preserves the same shallow behavior.

use crate::activation::Act;
use crate::inputs::InputKind;
use crate::mlp::MlpConfig;
use crate::pooling::{PoolingMethod, Set2SetConfig};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Shallow overlay of two optional JSON maps. The result starts empty,
/// takes every default key, then every override key; the override wins
/// on collisions. Inputs are not mutated.
pub fn merge_config(
    default: Option<&Map<String, Value>>,
    user: Option<&Map<String, Value>>,
) -> Map<String, Value> {
    let mut out = Map::new();
    if let Some(default) = default {
        out.extend(default.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    if let Some(user) = user {
        out.extend(user.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    out
}

macro_rules! apply_if_present {
    ($update:expr, $cfg:expr, $($field:ident),+ $(,)?) => {
        $(if let Some(value) = $update.$field.clone() {
            $cfg.$field = value;
        })+
    };
}

/// Hyperparameters of the [crate::Gin] model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GinConfig {
    pub node_input: InputKind,
    /// Number of message-passing blocks.
    pub depth: usize,
    /// Per-block update MLP. The last width must equal the encoded node
    /// width, so the residual additions line up.
    pub gin_mlp: MlpConfig,
    /// Initial-self weight: blocks compute mlp((1 + eps) * h + sum).
    pub eps: f64,
    pub dropout: Option<f64>,
    pub pooling: PoolingMethod,
    pub output_mlp: MlpConfig,
    pub output_activation: Act,
}

impl Default for GinConfig {
    fn default() -> Self {
        GinConfig {
            node_input: InputKind::Index {
                vocab: 95,
                embed_dim: 64,
            },
            depth: 3,
            gin_mlp: MlpConfig::uniform(&[64, 64], Act::Relu),
            eps: 0.0,
            dropout: None,
            pooling: PoolingMethod::Sum,
            output_mlp: MlpConfig {
                units: vec![64, 32, 1],
                activation: vec![Act::Relu, Act::Relu, Act::Linear],
                use_bias: vec![true, true, true],
            },
            output_activation: Act::Linear,
        }
    }
}

/// Partial [GinConfig]: every present field replaces the default whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GinConfigUpdate {
    pub node_input: Option<InputKind>,
    pub depth: Option<usize>,
    pub gin_mlp: Option<MlpConfig>,
    pub eps: Option<f64>,
    pub dropout: Option<Option<f64>>,
    pub pooling: Option<PoolingMethod>,
    pub output_mlp: Option<MlpConfig>,
    pub output_activation: Option<Act>,
}

impl GinConfig {
    pub fn with_update(update: &GinConfigUpdate) -> Self {
        let mut cfg = GinConfig::default();
        apply_if_present!(
            update, cfg, node_input, depth, gin_mlp, eps, dropout, pooling, output_mlp,
            output_activation,
        );
        cfg
    }
}

/// Hyperparameters of the [crate::Megnet] model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MegnetConfig {
    pub node_input: InputKind,
    pub edge_input: InputKind,
    pub state_input: InputKind,
    pub blocks: usize,
    /// Feed-forward stacks in front of the first block and, when
    /// `has_ff`, in front of every later block.
    pub node_ff: MlpConfig,
    pub edge_ff: MlpConfig,
    pub state_ff: MlpConfig,
    pub has_ff: bool,
    /// Update networks inside each block; all three must end on the
    /// feed-forward width so the residual additions line up.
    pub block_mlp: MlpConfig,
    pub dropout: Option<f64>,
    /// Set2set readout on nodes and edges; plain sum pooling when None.
    pub set2set: Option<Set2SetConfig>,
    pub output_mlp: MlpConfig,
}

impl Default for MegnetConfig {
    fn default() -> Self {
        MegnetConfig {
            node_input: InputKind::Index {
                vocab: 95,
                embed_dim: 64,
            },
            edge_input: InputKind::Index {
                vocab: 5,
                embed_dim: 64,
            },
            state_input: InputKind::Feature { dim: 2 },
            blocks: 3,
            node_ff: MlpConfig::uniform(&[64, 32], Act::Softplus2),
            edge_ff: MlpConfig::uniform(&[64, 32], Act::Softplus2),
            state_ff: MlpConfig::uniform(&[64, 32], Act::Softplus2),
            has_ff: true,
            block_mlp: MlpConfig::uniform(&[64, 32, 32], Act::Softplus2),
            dropout: None,
            set2set: Some(Set2SetConfig::default()),
            output_mlp: MlpConfig {
                units: vec![32, 16, 1],
                activation: vec![Act::Softplus2, Act::Softplus2, Act::Linear],
                use_bias: vec![true, true, true],
            },
        }
    }
}

/// Partial [MegnetConfig] with override-if-present fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MegnetConfigUpdate {
    pub node_input: Option<InputKind>,
    pub edge_input: Option<InputKind>,
    pub state_input: Option<InputKind>,
    pub blocks: Option<usize>,
    pub node_ff: Option<MlpConfig>,
    pub edge_ff: Option<MlpConfig>,
    pub state_ff: Option<MlpConfig>,
    pub has_ff: Option<bool>,
    pub block_mlp: Option<MlpConfig>,
    pub dropout: Option<Option<f64>>,
    pub set2set: Option<Option<Set2SetConfig>>,
    pub output_mlp: Option<MlpConfig>,
}

impl MegnetConfig {
    pub fn with_update(update: &MegnetConfigUpdate) -> Self {
        let mut cfg = MegnetConfig::default();
        apply_if_present!(
            update, cfg, node_input, edge_input, state_input, blocks, node_ff, edge_ff, state_ff,
            has_ff, block_mlp, dropout, set2set, output_mlp,
        );
        cfg
    }
}
