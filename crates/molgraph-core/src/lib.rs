//! molgraph-core
//!
//! Graph data model for molecular machine learning:
//! - element symbol <-> atomic number table
//! - bonds and bond orders
//! - per-molecule graph samples with symmetrized edge lists
//! - conversion of a graph sample into candle tensors
pub mod bonds;
pub mod elements;
pub mod graph;
pub mod tensor;

mod error;

pub use bonds::{Bond, BondOrder};
pub use elements::{atomic_number, element_symbol, ELEMENT_COUNT};
pub use error::CoreError;
pub use graph::{symmetrize_bonds, Atom, EdgeSource, Edges, GraphSample};
pub use tensor::GraphTensors;
