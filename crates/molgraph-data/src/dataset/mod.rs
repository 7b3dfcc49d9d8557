//! In-memory graph datasets.
//!
//! A dataset owns one [GraphSample] per graph and is populated in two
//! stages: `prepare_data` persists an intermediate structured form next
//! to the raw file (idempotent unless `overwrite`), `read_in_memory`
//! loads the persisted form into arrays.

pub mod qm;
pub mod tu;

use crate::error::DataResult;
use molgraph_core::GraphSample;
use serde_json::Value;
use tracing::warn;

/// A post-construction operation named by a dataset descriptor.
///
/// Descriptors carry method names as strings; they are resolved into
/// this enum once, at parse time. Names nobody recognizes are kept as
/// [DatasetOp::Unknown] and skipped with a warning rather than aborting
/// the run, so one bad serialization entry cannot take down a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetOp {
    PrepareData { overwrite: bool },
    ReadInMemory,
    Unknown(String),
}

impl DatasetOp {
    pub fn from_entry(method: &str, kwargs: &Value) -> DatasetOp {
        match method {
            "prepare_data" => {
                let overwrite = kwargs
                    .get("overwrite")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                DatasetOp::PrepareData { overwrite }
            }
            "read_in_memory" => DatasetOp::ReadInMemory,
            other => DatasetOp::Unknown(other.to_string()),
        }
    }
}

pub trait GraphDataset: std::fmt::Debug {
    fn dataset_name(&self) -> &str;

    /// Loaded graphs, one entry per graph. Empty before `read_in_memory`.
    fn graphs(&self) -> &[GraphSample];

    fn len(&self) -> usize {
        self.graphs().len()
    }

    fn is_empty(&self) -> bool {
        self.graphs().is_empty()
    }

    /// Pre-compute and persist intermediate structure information.
    fn prepare_data(&mut self, overwrite: bool) -> DataResult<()>;

    /// Load raw plus persisted intermediate files into memory.
    fn read_in_memory(&mut self) -> DataResult<()>;

    fn apply(&mut self, op: &DatasetOp) -> DataResult<()> {
        match op {
            DatasetOp::PrepareData { overwrite } => self.prepare_data(*overwrite),
            DatasetOp::ReadInMemory => self.read_in_memory(),
            DatasetOp::Unknown(name) => {
                warn!(
                    dataset = self.dataset_name(),
                    method = %name,
                    "dataset does not have this method, skipping"
                );
                Ok(())
            }
        }
    }
}
