//! Multi-molecule xyz reader and writer.
//!
//! Per molecule: a line with the atom count, a comment line, then one
//! `symbol x y z` line per atom. Consecutive molecules are concatenated.
//! Trailing whitespace and variable float precision are tolerated.

use crate::error::{DataError, DataResult};
use molgraph_core::Atom;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Parse every molecule in a concatenated xyz text.
pub fn parse_xyz_str(text: &str) -> DataResult<Vec<Vec<Atom>>> {
    let mut molecules = Vec::new();
    let mut lines = text.lines().enumerate();

    while let Some((count_idx, raw)) = lines.next() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let declared: usize = line.parse().map_err(|_| {
            DataError::format(count_idx + 1, format!("expected atom count, got {line:?}"))
        })?;
        // comment line, ignored
        lines.next();

        let mut atoms = Vec::with_capacity(declared);
        for _ in 0..declared {
            let Some((atom_idx, atom_line)) = lines.next() else {
                return Err(DataError::format(
                    count_idx + 1,
                    format!(
                        "declared {declared} atoms but file ended after {}",
                        atoms.len()
                    ),
                ));
            };
            atoms.push(parse_atom_line(atom_idx + 1, atom_line)?);
        }
        molecules.push(atoms);
    }
    Ok(molecules)
}

fn parse_atom_line(line_number: usize, line: &str) -> DataResult<Atom> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(DataError::format(
            line_number,
            format!("expected 'symbol x y z', got {:?}", line.trim_end()),
        ));
    }
    let mut coords = [0f64; 3];
    for (slot, field) in coords.iter_mut().zip(&fields[1..4]) {
        *slot = field.parse().map_err(|_| {
            DataError::format(line_number, format!("invalid coordinate {field:?}"))
        })?;
    }
    Ok(Atom {
        symbol: fields[0].to_string(),
        coords,
    })
}

pub fn read_xyz_file(path: impl AsRef<Path>) -> DataResult<Vec<Vec<Atom>>> {
    let text = fs::read_to_string(path)?;
    parse_xyz_str(&text)
}

/// Serialize one molecule back to xyz text. Used to feed the structure
/// inference tool and for round-tripping.
pub fn write_xyz_str(atoms: &[Atom], comment: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", atoms.len());
    let _ = writeln!(out, "{comment}");
    for atom in atoms {
        let _ = writeln!(
            out,
            "{} {:.10} {:.10} {:.10}",
            atom.symbol, atom.coords[0], atom.coords[1], atom.coords[2]
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_MOLECULES: &str = "3\nWater\nO 0.0 0.0 0.1173\nH 0.0 0.7572 -0.4692\nH 0.0 -0.7572 -0.4692\n2\nHydrogen\nH 0.0 0.0 0.0\nH 0.0 0.0 0.74\n";

    #[test]
    fn test_parse_two_molecules() {
        let molecules = parse_xyz_str(TWO_MOLECULES).unwrap();
        assert_eq!(molecules.len(), 2);
        assert_eq!(molecules[0].len(), 3);
        assert_eq!(molecules[1].len(), 2);
        assert_eq!(molecules[0][0].symbol, "O");
        assert_eq!(molecules[1][1].coords[2], 0.74);
    }

    #[test]
    fn test_parse_tolerates_trailing_whitespace() {
        let text = "1 \ncomment\nC 1.0 2.0 3.0   \n\n";
        let molecules = parse_xyz_str(text).unwrap();
        assert_eq!(molecules[0][0].coords, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_atom_count_mismatch_reports_line() {
        // declares 3 atoms, supplies 2
        let text = "3\ncomment\nO 0.0 0.0 0.0\nH 0.0 0.0 1.0\n";
        let err = parse_xyz_str(text).unwrap_err();
        match err {
            DataError::Format { line, .. } => assert_eq!(line, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_atom_line_reports_line() {
        let text = "2\ncomment\nO 0.0 0.0 0.0\nH 0.0\n";
        let err = parse_xyz_str(text).unwrap_err();
        match err {
            DataError::Format { line, .. } => assert_eq!(line, 4),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_xyz_file_fixture() {
        let (path, _guard) = molgraph_test_data::TestFile::qm_xyz_01()
            .create_temp()
            .unwrap();
        let molecules = read_xyz_file(&path).unwrap();
        assert_eq!(molecules.len(), 2);
        assert_eq!(molecules[0][0].symbol, "O");
        assert_eq!(molecules[1].len(), 5);
    }

    #[test]
    fn test_round_trip() {
        let molecules = parse_xyz_str(TWO_MOLECULES).unwrap();
        let text = write_xyz_str(&molecules[0], "Water");
        let reparsed = parse_xyz_str(&text).unwrap();
        assert_eq!(reparsed.len(), 1);
        for (a, b) in molecules[0].iter().zip(&reparsed[0]) {
            assert_eq!(a.symbol, b.symbol);
            for (x, y) in a.coords.iter().zip(&b.coords) {
                assert!((x - y).abs() < 1e-9);
            }
        }
    }
}
