//! Mol-block (ctab) and sdf reading/writing.
//!
//! Only the subset the datasets consume: three header lines, a counts
//! line, the atom block (`x y z symbol`) and the bond block
//! (`a b order`, atom indices 1-based). Everything after the bond block
//! (`M  END`, property lists) is ignored. An sdf file is a sequence of
//! mol blocks joined by `$$$$` lines.

use crate::error::{DataError, DataResult};
use molgraph_core::{Atom, Bond, BondOrder};
use std::fs;
use std::path::Path;

/// One parsed mol block. Bond indices are 0-based here.
#[derive(Debug, Clone, PartialEq)]
pub struct MolBlock {
    pub title: String,
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
}

/// Parse a single mol block. Line numbers in errors are relative to the
/// start of the block.
pub fn parse_mol_block(text: &str) -> DataResult<MolBlock> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < 4 {
        return Err(DataError::format(
            lines.len(),
            "mol block ended before the counts line",
        ));
    }
    let title = lines[0].trim().to_string();

    let counts_fields: Vec<&str> = lines[3].split_whitespace().collect();
    if counts_fields.len() < 2 {
        return Err(DataError::format(4, "counts line needs atom and bond counts"));
    }
    let atom_count: usize = counts_fields[0]
        .parse()
        .map_err(|_| DataError::format(4, format!("invalid atom count {:?}", counts_fields[0])))?;
    let bond_count: usize = counts_fields[1]
        .parse()
        .map_err(|_| DataError::format(4, format!("invalid bond count {:?}", counts_fields[1])))?;

    let atom_block_end = 4 + atom_count;
    let bond_block_end = atom_block_end + bond_count;
    if lines.len() < bond_block_end {
        return Err(DataError::format(
            4,
            format!(
                "counts line declares {atom_count} atoms and {bond_count} bonds but the block has {} lines",
                lines.len()
            ),
        ));
    }

    let mut atoms = Vec::with_capacity(atom_count);
    for (offset, line) in lines[4..atom_block_end].iter().enumerate() {
        atoms.push(parse_mol_atom_line(4 + offset + 1, line)?);
    }

    let mut bonds = Vec::with_capacity(bond_count);
    for (offset, line) in lines[atom_block_end..bond_block_end].iter().enumerate() {
        bonds.push(parse_mol_bond_line(
            atom_block_end + offset + 1,
            line,
            atom_count,
        )?);
    }

    Ok(MolBlock {
        title,
        atoms,
        bonds,
    })
}

fn parse_mol_atom_line(line_number: usize, line: &str) -> DataResult<Atom> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(DataError::format(
            line_number,
            format!("expected 'x y z symbol', got {:?}", line.trim_end()),
        ));
    }
    let mut coords = [0f64; 3];
    for (slot, field) in coords.iter_mut().zip(&fields[..3]) {
        *slot = field.parse().map_err(|_| {
            DataError::format(line_number, format!("invalid coordinate {field:?}"))
        })?;
    }
    Ok(Atom {
        symbol: fields[3].to_string(),
        coords,
    })
}

fn parse_mol_bond_line(line_number: usize, line: &str, atom_count: usize) -> DataResult<Bond> {
    let fields: Vec<i64> = line
        .split_whitespace()
        .map_while(|f| f.parse().ok())
        .collect();
    if fields.len() < 3 {
        return Err(DataError::format(
            line_number,
            format!(
                "bond line needs at least 3 integer fields, got {:?}",
                line.trim_end()
            ),
        ));
    }
    let (a, b, order) = (fields[0], fields[1], fields[2]);
    for index in [a, b] {
        if index < 1 || index as usize > atom_count {
            return Err(DataError::format(
                line_number,
                format!("bond references atom {index} outside 1..={atom_count}"),
            ));
        }
    }
    // file indices are 1-based
    Ok(Bond::new(
        a as u32 - 1,
        b as u32 - 1,
        BondOrder::from_order(order)?,
    ))
}

/// Split sdf text into its mol-block strings.
pub fn split_sdf_str(text: &str) -> Vec<String> {
    text.split("$$$$")
        .map(|block| block.trim_matches('\n'))
        .filter(|block| !block.trim().is_empty())
        .map(|block| block.to_string())
        .collect()
}

/// Read and parse every mol block in an sdf file.
pub fn read_sdf_file(path: impl AsRef<Path>) -> DataResult<Vec<MolBlock>> {
    let text = fs::read_to_string(path)?;
    split_sdf_str(&text).iter().map(|b| parse_mol_block(b)).collect()
}

/// Write raw mol-block strings to an sdf file, `$$$$`-separated.
pub fn write_mol_blocks_to_sdf(blocks: &[String], path: impl AsRef<Path>) -> DataResult<()> {
    let mut out = String::new();
    for block in blocks {
        out.push_str(block.trim_end_matches('\n'));
        out.push_str("\n$$$$\n");
    }
    fs::write(path, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER_BLOCK: &str = "Water\n molgraph\n\n  3  2  0  0  0  0  0  0  0  0999 V2000\n    0.0000    0.0000    0.1173 O   0  0\n    0.0000    0.7572   -0.4692 H   0  0\n    0.0000   -0.7572   -0.4692 H   0  0\n  1  2  1  0\n  1  3  1  0\nM  END\n";

    #[test]
    fn test_parse_water_block() {
        let block = parse_mol_block(WATER_BLOCK).unwrap();
        assert_eq!(block.title, "Water");
        assert_eq!(block.atoms.len(), 3);
        assert_eq!(block.bonds.len(), 2);
        assert_eq!(block.atoms[0].symbol, "O");
        // indices converted to 0-based
        assert_eq!(block.bonds[0].get_atom_indices(), (0, 1));
        assert_eq!(block.bonds[0].get_order(), BondOrder::Single);
    }

    #[test]
    fn test_short_bond_line_reports_line() {
        let text = "T\n\n\n  2  1  0\n    0.0 0.0 0.0 C\n    1.0 0.0 0.0 O\n  1\nM  END\n";
        let err = parse_mol_block(text).unwrap_err();
        match err {
            DataError::Format { line, .. } => assert_eq!(line, 7),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bond_index_out_of_range() {
        let text = "T\n\n\n  1  1  0\n    0.0 0.0 0.0 C\n  1  4  1\n";
        assert!(parse_mol_block(text).is_err());
    }

    #[test]
    fn test_sdf_split_and_join() {
        let blocks = vec![WATER_BLOCK.to_string(), WATER_BLOCK.to_string()];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("two.sdf");
        write_mol_blocks_to_sdf(&blocks, &path).unwrap();
        let parsed = read_sdf_file(&path).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0], parsed[1]);
    }
}
