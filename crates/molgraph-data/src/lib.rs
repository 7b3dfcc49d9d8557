//! molgraph-data
//!
//! Dataset loaders that turn chemistry file formats into graph samples:
//! - multi-molecule xyz reader/writer
//! - mol-block/sdf reader and writer
//! - external structure inference (xyz -> mol-block) behind a trait
//! - in-memory datasets (quantum-mechanics xyz sets, TU benchmark sets)
//! - a registry-driven dataset descriptor deserializer
pub mod convert;
pub mod dataset;
pub mod mol;
pub mod serial;
pub mod xyz;

mod error;

pub use convert::{OpenBabel, StructureInference};
pub use dataset::{DatasetOp, GraphDataset};
pub use dataset::qm::{QmDataset, QmDatasetConfig};
pub use dataset::tu::{TuDataset, TuDatasetConfig};
pub use error::{DataError, DataResult};
pub use serial::{deserialize, DatasetDescriptor, DatasetRegistry};
