use crate::bonds::Bond;
use crate::elements::atomic_number;
use crate::CoreError;

/// A single atom record as read from an xyz or mol file.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub symbol: String,
    pub coords: [f64; 3],
}

impl Atom {
    pub fn new(symbol: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Atom {
            symbol: symbol.into(),
            coords: [x, y, z],
        }
    }
}

/// Where a graph's edge information came from.
///
/// `FromFile` with zero edges means the structure is known and has no
/// bonds; a missing or failed structure-inference step leaves the sample
/// without an [Edges] value at all. The two outcomes are deliberately
/// kept distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeSource {
    /// Bonds were read from a structure file on disk.
    FromFile,
    /// Bonds were produced by the external structure-inference tool.
    Inferred,
}

/// Directed edge lists for one graph.
///
/// One row per directed edge; undirected bonds are stored in both
/// directions (see [symmetrize_bonds]).
#[derive(Debug, Clone, PartialEq)]
pub struct Edges {
    pub indices: Vec<[u32; 2]>,
    pub attributes: Vec<f64>,
    pub source: EdgeSource,
}

impl Edges {
    pub fn len(&self) -> usize {
        self.indices.len()
    }
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// One molecule/graph worth of arrays.
///
/// `node_number` holds atomic numbers for molecular data and categorical
/// node labels for plain benchmark graphs; symbol and coordinate arrays
/// only exist for molecular sources. All present node arrays share the
/// same length (one entry per atom).
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSample {
    pub node_number: Vec<u32>,
    pub node_symbol: Option<Vec<String>>,
    pub node_coordinates: Option<Vec<[f64; 3]>>,
    pub edges: Option<Edges>,
    pub label: Option<Vec<f64>>,
}

impl GraphSample {
    /// A bare graph with categorical node labels and no geometry.
    pub fn from_node_labels(node_number: Vec<u32>) -> Self {
        GraphSample {
            node_number,
            node_symbol: None,
            node_coordinates: None,
            edges: None,
            label: None,
        }
    }

    /// Assemble node arrays from parsed atom records. Fails on an
    /// element symbol outside the lookup table.
    pub fn from_atoms(atoms: &[Atom]) -> Result<Self, CoreError> {
        let node_number = atoms
            .iter()
            .map(|a| atomic_number(&a.symbol))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(GraphSample {
            node_number,
            node_symbol: Some(atoms.iter().map(|a| a.symbol.clone()).collect()),
            node_coordinates: Some(atoms.iter().map(|a| a.coords).collect()),
            edges: None,
            label: None,
        })
    }

    pub fn node_count(&self) -> usize {
        self.node_number.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.as_ref().map_or(0, |e| e.len())
    }

    pub fn set_edges(&mut self, edges: Edges) {
        self.edges = Some(edges);
    }
}

/// Expand an undirected bond list into directed edge arrays.
///
/// Message-passing layers need a directed edge per ordered node pair, so
/// every bond (a, b) contributes both (a, b) and (b, a), each carrying
/// the bond order as its attribute. The result has exactly twice as many
/// rows as `bonds`. Bond indices are already 0-based here; the file
/// readers convert from the 1-based file convention.
pub fn symmetrize_bonds(bonds: &[Bond], source: EdgeSource) -> Edges {
    let mut indices = Vec::with_capacity(bonds.len() * 2);
    let mut attributes = Vec::with_capacity(bonds.len() * 2);
    for bond in bonds {
        let (a, b) = bond.get_atom_indices();
        let attr = bond.get_order().as_f64();
        indices.push([a, b]);
        attributes.push(attr);
        indices.push([b, a]);
        attributes.push(attr);
    }
    Edges {
        indices,
        attributes,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bonds::BondOrder;

    fn water() -> Vec<Atom> {
        vec![
            Atom::new("O", 0.0, 0.0, 0.1173),
            Atom::new("H", 0.0, 0.7572, -0.4692),
            Atom::new("H", 0.0, -0.7572, -0.4692),
        ]
    }

    #[test]
    fn test_from_atoms() {
        let sample = GraphSample::from_atoms(&water()).unwrap();
        assert_eq!(sample.node_count(), 3);
        assert_eq!(sample.node_number, vec![8, 1, 1]);
        let coords = sample.node_coordinates.as_ref().unwrap();
        assert_eq!(coords[1][1], 0.7572);
        assert!(sample.edges.is_none());
    }

    #[test]
    fn test_from_atoms_unknown_symbol() {
        let atoms = vec![Atom::new("Qq", 0.0, 0.0, 0.0)];
        assert!(GraphSample::from_atoms(&atoms).is_err());
    }

    #[test]
    fn test_symmetrize_doubles_rows() {
        let bonds = vec![
            Bond::new(0, 1, BondOrder::Single),
            Bond::new(0, 2, BondOrder::Single),
            Bond::new(1, 3, BondOrder::Double),
        ];
        let edges = symmetrize_bonds(&bonds, EdgeSource::FromFile);
        assert_eq!(edges.len(), 6);
        // every (a, b) has its (b, a) with the same attribute
        for (row, attr) in edges.indices.iter().zip(&edges.attributes) {
            let reverse = [row[1], row[0]];
            let pos = edges
                .indices
                .iter()
                .position(|r| *r == reverse)
                .expect("reverse edge present");
            assert_eq!(edges.attributes[pos], *attr);
        }
    }

    #[test]
    fn test_symmetrize_empty_is_from_file() {
        let edges = symmetrize_bonds(&[], EdgeSource::FromFile);
        assert!(edges.is_empty());
        assert_eq!(edges.source, EdgeSource::FromFile);
    }
}
