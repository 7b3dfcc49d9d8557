//! Conversion of a [GraphSample] into candle tensors.
//!
//! Shapes follow the usual single-graph message-passing layout:
//! - node_number: `[N]` u32
//! - node_coordinates: `[N, 3]` f32 (absent for non-geometric graphs)
//! - edge_index: `[E, 2]` u32 (absent when no structure info exists)
//! - edge_attributes: `[E, 1]` f32

use crate::graph::GraphSample;
use candle_core::{Device, Result, Tensor};

#[derive(Debug)]
pub struct GraphTensors {
    pub node_number: Tensor,
    pub node_coordinates: Option<Tensor>,
    pub edge_index: Option<Tensor>,
    pub edge_attributes: Option<Tensor>,
}

impl GraphSample {
    pub fn to_tensors(&self, device: &Device) -> Result<GraphTensors> {
        let n = self.node_count();
        let node_number = Tensor::from_iter(self.node_number.iter().copied(), device)?;

        let node_coordinates = match &self.node_coordinates {
            Some(coords) => {
                let mut coord_data = vec![0f32; n * 3];
                for (i, xyz) in coords.iter().enumerate() {
                    for (j, v) in xyz.iter().enumerate() {
                        coord_data[i * 3 + j] = *v as f32;
                    }
                }
                Some(Tensor::from_vec(coord_data, (n, 3), device)?)
            }
            None => None,
        };

        let (edge_index, edge_attributes) = match &self.edges {
            Some(edges) => {
                let e = edges.len();
                let flat: Vec<u32> = edges.indices.iter().flatten().copied().collect();
                let index = Tensor::from_vec(flat, (e, 2), device)?;
                let attrs: Vec<f32> = edges.attributes.iter().map(|a| *a as f32).collect();
                let attributes = Tensor::from_vec(attrs, (e, 1), device)?;
                (Some(index), Some(attributes))
            }
            None => (None, None),
        };

        Ok(GraphTensors {
            node_number,
            node_coordinates,
            edge_index,
            edge_attributes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bonds::{Bond, BondOrder};
    use crate::graph::{symmetrize_bonds, Atom, EdgeSource};

    #[test]
    fn test_to_tensors_shapes() -> Result<()> {
        let atoms = vec![
            Atom::new("C", 0.0, 0.0, 0.0),
            Atom::new("O", 1.2, 0.0, 0.0),
        ];
        let mut sample = GraphSample::from_atoms(&atoms).unwrap();
        sample.set_edges(symmetrize_bonds(
            &[Bond::new(0, 1, BondOrder::Double)],
            EdgeSource::FromFile,
        ));

        let t = sample.to_tensors(&Device::Cpu)?;
        assert_eq!(t.node_number.dims(), [2]);
        assert_eq!(t.node_coordinates.as_ref().unwrap().dims(), [2, 3]);
        assert_eq!(t.edge_index.as_ref().unwrap().dims(), [2, 2]);
        assert_eq!(t.edge_attributes.as_ref().unwrap().dims(), [2, 1]);

        let numbers = t.node_number.to_vec1::<u32>()?;
        assert_eq!(numbers, vec![6, 8]);
        Ok(())
    }

    #[test]
    fn test_to_tensors_without_edges() -> Result<()> {
        let atoms = vec![Atom::new("H", 0.0, 0.0, 0.0)];
        let sample = GraphSample::from_atoms(&atoms).unwrap();
        let t = sample.to_tensors(&Device::Cpu)?;
        assert!(t.edge_index.is_none());
        assert!(t.edge_attributes.is_none());
        Ok(())
    }
}
