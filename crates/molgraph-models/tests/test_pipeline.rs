//! End-to-end check: parse molecule files into graphs, convert to
//! tensors, and run them through a small MEGNet model.

use anyhow::Result;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use molgraph_data::dataset::qm::{QmDataset, QmDatasetConfig};
use molgraph_data::dataset::GraphDataset;
use molgraph_models::{
    Act, InputKind, Megnet, MegnetConfig, MegnetConfigUpdate, MlpConfig, Set2SetConfig,
};

fn small_megnet_config() -> MegnetConfig {
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

#[test]
fn test_qm_files_through_megnet() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(
        dir.path().join("mols.xyz"),
        molgraph_test_data::TestFile::qm_xyz_01().contents(),
    )?;
    std::fs::write(
        dir.path().join("mols.sdf"),
        molgraph_test_data::TestFile::qm_sdf_01().contents(),
    )?;

    let mut dataset = QmDataset::new(QmDatasetConfig {
        file_name: Some("mols.xyz".to_string()),
        data_directory: Some(dir.path().to_path_buf()),
        dataset_name: None,
    });
    dataset.read_in_memory()?;
    assert_eq!(dataset.len(), 2);

    let device = Device::Cpu;
    let vb = VarBuilder::zeros(DType::F32, &device);
    let model = Megnet::load(vb, &small_megnet_config())?;

    for graph in dataset.graphs() {
        let tensors = graph.to_tensors(&device)?;
        let edge_index = tensors.edge_index.expect("fixture sdf provides bonds");
        let edge_attributes = tensors.edge_attributes.expect("fixture sdf provides bonds");
        // node count and a zero placeholder as the graph state
        let state = Tensor::new(&[[graph.node_count() as f32, 0.0]], &device)?;
        let out = model.forward(&tensors.node_number, &edge_attributes, &edge_index, &state)?;
        assert_eq!(out.dims(), [1, 1]);
    }
    Ok(())
}
