//! Quantum-mechanics style datasets: one xyz file with many molecules,
//! optionally accompanied by a pre-computed sdf with bonding information.

use crate::convert::{OpenBabel, StructureInference};
use crate::dataset::GraphDataset;
use crate::error::{DataError, DataResult};
use crate::mol::{read_sdf_file, write_mol_blocks_to_sdf};
use crate::xyz::{read_xyz_file, write_xyz_str};
use molgraph_core::{symmetrize_bonds, EdgeSource, GraphSample};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Constructor arguments, deserializable from a descriptor's `config`.
/// Every field is optional so a bare-name descriptor can construct an
/// empty dataset; a missing file name only errors once a file operation
/// needs it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QmDatasetConfig {
    /// Name of the `.xyz` file to read.
    #[serde(default)]
    pub file_name: Option<String>,
    /// Directory containing all dataset files. Defaults to the current
    /// directory.
    #[serde(default)]
    pub data_directory: Option<PathBuf>,
    #[serde(default)]
    pub dataset_name: Option<String>,
}

#[derive(Debug)]
pub struct QmDataset {
    data_directory: PathBuf,
    dataset_name: String,
    file_name: Option<String>,
    graphs: Vec<GraphSample>,
    inference: Box<dyn StructureInference>,
    // set when prepare_data generated the sdf cache in this process, so
    // read_in_memory can tag the edges as inferred rather than file-given
    wrote_cache: bool,
}

impl QmDataset {
    pub fn new(config: QmDatasetConfig) -> Self {
        let dataset_name = config
            .dataset_name
            .or_else(|| {
                config.file_name.as_deref().map(|file_name| {
                    file_name
                        .rsplit_once('.')
                        .map(|(stem, _)| stem.to_string())
                        .unwrap_or_else(|| file_name.to_string())
                })
            })
            .unwrap_or_else(|| "unnamed".to_string());
        QmDataset {
            data_directory: config.data_directory.unwrap_or_else(|| PathBuf::from(".")),
            dataset_name,
            file_name: config.file_name,
            graphs: Vec::new(),
            inference: Box::new(OpenBabel::default()),
            wrote_cache: false,
        }
    }

    /// Swap out the structure-inference tool, mainly for tests.
    pub fn with_inference(mut self, inference: Box<dyn StructureInference>) -> Self {
        self.inference = inference;
        self
    }

    fn file_name(&self) -> DataResult<&str> {
        self.file_name
            .as_deref()
            .ok_or(DataError::MissingField("file_name"))
    }

    fn xyz_path(&self) -> DataResult<PathBuf> {
        Ok(self.data_directory.join(self.file_name()?))
    }

    /// The sdf cache sits next to the xyz file, same stem.
    fn sdf_path(&self) -> DataResult<PathBuf> {
        let file_name = self.file_name()?;
        let stem = file_name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(file_name);
        Ok(self.data_directory.join(format!("{stem}.sdf")))
    }

    fn attach_edges(&mut self, sdf_path: &Path) -> DataResult<()> {
        let mol_blocks = read_sdf_file(sdf_path)?;
        if mol_blocks.len() != self.graphs.len() {
            warn!(
                dataset = self.dataset_name,
                sdf = mol_blocks.len(),
                xyz = self.graphs.len(),
                "structure file molecule count does not match xyz, ignoring bonds"
            );
            return Ok(());
        }
        let source = if self.wrote_cache {
            EdgeSource::Inferred
        } else {
            EdgeSource::FromFile
        };
        for (graph, block) in self.graphs.iter_mut().zip(&mol_blocks) {
            graph.set_edges(symmetrize_bonds(&block.bonds, source));
        }
        Ok(())
    }
}

impl GraphDataset for QmDataset {
    fn dataset_name(&self) -> &str {
        &self.dataset_name
    }

    fn graphs(&self) -> &[GraphSample] {
        &self.graphs
    }

    /// Run structure inference over every molecule and persist the
    /// resulting mol blocks as an sdf cache. Skipped when the cache
    /// already exists and `overwrite` is false. An unavailable inference
    /// tool is not fatal; the dataset then stays node-only.
    fn prepare_data(&mut self, overwrite: bool) -> DataResult<()> {
        let sdf_path = self.sdf_path()?;
        if sdf_path.exists() && !overwrite {
            info!(
                dataset = self.dataset_name,
                path = %sdf_path.display(),
                "found pre-computed structure file"
            );
            return Ok(());
        }

        let molecules = read_xyz_file(self.xyz_path()?)?;
        let mut blocks = Vec::with_capacity(molecules.len());
        for molecule in &molecules {
            match self.inference.infer(&write_xyz_str(molecule, "")) {
                Ok(block) => blocks.push(block),
                Err(e) => {
                    warn!(
                        dataset = self.dataset_name,
                        error = %e,
                        "structure inference unavailable, continuing without bonds"
                    );
                    return Ok(());
                }
            }
        }
        write_mol_blocks_to_sdf(&blocks, &sdf_path)?;
        self.wrote_cache = true;
        Ok(())
    }

    /// Parse the xyz file into node arrays and, when the sdf cache
    /// exists, the mol blocks into symmetrized edge arrays.
    fn read_in_memory(&mut self) -> DataResult<()> {
        let molecules = read_xyz_file(self.xyz_path()?)?;
        self.graphs = molecules
            .iter()
            .map(|atoms| GraphSample::from_atoms(atoms))
            .collect::<Result<Vec<_>, _>>()?;

        let sdf_path = self.sdf_path()?;
        if !sdf_path.exists() {
            warn!(
                dataset = self.dataset_name,
                "can not load structure file, dataset has node information only"
            );
            return Ok(());
        }
        self.attach_edges(&sdf_path)
    }
}
