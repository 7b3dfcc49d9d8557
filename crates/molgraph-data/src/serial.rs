//! Dataset descriptor deserialization.
//!
//! A descriptor is either a bare class name or a mapping
//! `{"class_name": .., "config": {..}, "methods": [{name: kwargs}, ..]}`.
//! Resolution goes through an explicit [DatasetRegistry] value instead
//! of a global table; descriptor method names become [DatasetOp]s that
//! run in the literal given order.

use crate::dataset::qm::{QmDataset, QmDatasetConfig};
use crate::dataset::tu::{TuDataset, TuDatasetConfig};
use crate::dataset::{DatasetOp, GraphDataset};
use crate::error::{DataError, DataResult};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DatasetDescriptor {
    /// Just a class name, empty config, no methods.
    Name(String),
    Full {
        class_name: String,
        #[serde(default)]
        config: Map<String, Value>,
        #[serde(default)]
        methods: Vec<Map<String, Value>>,
    },
}

type DatasetBuilder = Box<dyn Fn(&Map<String, Value>) -> DataResult<Box<dyn GraphDataset>>>;

/// Maps descriptor class names to constructor closures.
///
/// Built once at startup and passed to [deserialize]; `fallback` covers
/// names outside the built-in set (the per-dataset-name convention of a
/// larger installation). A name neither registered nor resolved by the
/// fallback is a hard [DataError::UnknownDataset].
#[derive(Default)]
pub struct DatasetRegistry {
    builders: HashMap<String, DatasetBuilder>,
    fallback: Option<Box<dyn Fn(&str, &Map<String, Value>) -> Option<Box<dyn GraphDataset>>>>,
}

impl DatasetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in dataset types under their molgraph
    /// names and the historical kgcnn aliases.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for name in ["QmDataset", "QMDataset"] {
            registry.register(name, |config| {
                let config: QmDatasetConfig =
                    serde_json::from_value(Value::Object(config.clone()))?;
                Ok(Box::new(QmDataset::new(config)))
            });
        }
        for name in ["TuDataset", "GraphTUDataset"] {
            registry.register(name, |config| {
                let config: TuDatasetConfig =
                    serde_json::from_value(Value::Object(config.clone()))?;
                Ok(Box::new(TuDataset::new(config)))
            });
        }
        registry
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        builder: impl Fn(&Map<String, Value>) -> DataResult<Box<dyn GraphDataset>> + 'static,
    ) {
        self.builders.insert(name.into(), Box::new(builder));
    }

    pub fn set_fallback(
        &mut self,
        fallback: impl Fn(&str, &Map<String, Value>) -> Option<Box<dyn GraphDataset>> + 'static,
    ) {
        self.fallback = Some(Box::new(fallback));
    }

    pub fn build(
        &self,
        class_name: &str,
        config: &Map<String, Value>,
    ) -> DataResult<Box<dyn GraphDataset>> {
        if let Some(builder) = self.builders.get(class_name) {
            return builder(config);
        }
        if let Some(fallback) = &self.fallback {
            if let Some(dataset) = fallback(class_name, config) {
                return Ok(dataset);
            }
        }
        Err(DataError::UnknownDataset(class_name.to_string()))
    }
}

/// Instantiate the dataset a descriptor names and run its method list in
/// order. Unknown method names are skipped with a warning (see
/// [DatasetOp]); an unresolvable class name is fatal.
pub fn deserialize(
    registry: &DatasetRegistry,
    descriptor: &DatasetDescriptor,
) -> DataResult<Box<dyn GraphDataset>> {
    let empty = Map::new();
    let (class_name, config, methods): (&str, &Map<String, Value>, &[Map<String, Value>]) =
        match descriptor {
            DatasetDescriptor::Name(name) => (name, &empty, &[]),
            DatasetDescriptor::Full {
                class_name,
                config,
                methods,
            } => (class_name, config, methods),
        };

    let mut dataset = registry.build(class_name, config)?;
    for entry in methods {
        for (method, kwargs) in entry {
            let op = DatasetOp::from_entry(method, kwargs);
            dataset.apply(&op)?;
        }
    }
    Ok(dataset)
}
