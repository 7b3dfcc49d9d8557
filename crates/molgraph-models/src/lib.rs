//! molgraph-models
//!
//! Graph neural network models on candle:
//! - GIN (graph isomorphism network) for node-labelled graphs
//! - MEGNet-style blocks with node/edge/state updates
//! plus the building blocks they share (MLP stacks, graph pooling,
//! set2set readout) and the layered config-merge utilities.
pub mod activation;
pub mod config;
pub mod gin;
pub mod inputs;
pub mod megnet;
pub mod message;
pub mod mlp;
pub mod pooling;

pub use activation::Act;
pub use config::{merge_config, GinConfig, GinConfigUpdate, MegnetConfig, MegnetConfigUpdate};
pub use gin::{Gin, GinConv};
pub use inputs::{InputEncoder, InputKind};
pub use megnet::{Megnet, MegnetBlock};
pub use mlp::{Mlp, MlpConfig};
pub use pooling::{PoolingMethod, PoolingNodes, Set2Set, Set2SetConfig};
