//! Element symbol <-> atomic number lookup.
//!
//! Covers Z = 1..=119 (hydrogen through ununennium), which is what the
//! quantum-chemistry file formats we read can reference.

use crate::CoreError;

/// Number of elements in the lookup table.
pub const ELEMENT_COUNT: usize = 119;

#[rustfmt::skip]
const SYMBOLS: [&str; ELEMENT_COUNT] = [
    "H",  "He", "Li", "Be", "B",  "C",  "N",  "O",  "F",  "Ne",
    "Na", "Mg", "Al", "Si", "P",  "S",  "Cl", "Ar", "K",  "Ca",
    "Sc", "Ti", "V",  "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn",
    "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y",  "Zr",
    "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn",
    "Sb", "Te", "I",  "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd",
    "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb",
    "Lu", "Hf", "Ta", "W",  "Re", "Os", "Ir", "Pt", "Au", "Hg",
    "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th",
    "Pa", "U",  "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm",
    "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds",
    "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og", "Uue",
];

/// Atomic number for an element symbol, e.g. `"C"` -> 6.
pub fn atomic_number(symbol: &str) -> Result<u32, CoreError> {
    SYMBOLS
        .iter()
        .position(|&s| s == symbol)
        .map(|i| (i + 1) as u32)
        .ok_or_else(|| CoreError::UnknownElement(symbol.to_string()))
}

/// Element symbol for an atomic number, e.g. 6 -> `"C"`.
pub fn element_symbol(number: u32) -> Option<&'static str> {
    if number == 0 {
        return None;
    }
    SYMBOLS.get(number as usize - 1).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_symbols() {
        assert_eq!(atomic_number("H").unwrap(), 1);
        assert_eq!(atomic_number("C").unwrap(), 6);
        assert_eq!(atomic_number("Og").unwrap(), 118);
        assert_eq!(atomic_number("Uue").unwrap(), 119);
    }

    #[test]
    fn test_unknown_symbol_is_an_error() {
        let err = atomic_number("Xx").unwrap_err();
        assert!(err.to_string().contains("Xx"));
    }

    #[test]
    fn test_lookup_is_a_bijection() {
        for z in 1..=ELEMENT_COUNT as u32 {
            let symbol = element_symbol(z).unwrap();
            assert_eq!(atomic_number(symbol).unwrap(), z);
        }
        assert!(element_symbol(0).is_none());
        assert!(element_symbol(120).is_none());
    }
}
