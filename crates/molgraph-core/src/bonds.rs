use crate::CoreError;

/// Bond
///
/// An undirected chemical bond between two 0-indexed atoms of type
/// [BondOrder].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bond {
    atom1: u32,
    atom2: u32,
    order: BondOrder,
}

impl Bond {
    pub fn new(atom1: u32, atom2: u32, order: BondOrder) -> Self {
        Bond {
            atom1,
            atom2,
            order,
        }
    }
    pub fn get_atom_indices(&self) -> (u32, u32) {
        (self.atom1, self.atom2)
    }
    pub fn get_order(&self) -> BondOrder {
        self.order
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// BondOrder
///
/// Bond order convention follows the mol-block bond type field.
/// Orders above 4 (aromatic and delocalized variants in some writers)
/// are folded into [BondOrder::Quadruple].
pub enum BondOrder {
    /// Used if the actual type is unknown
    Unset,
    /// Single bond
    Single,
    /// Double bond
    Double,
    /// Triple bond
    Triple,
    /// A quadruple bond
    Quadruple,
}

impl BondOrder {
    pub fn from_order(order: i64) -> Result<BondOrder, CoreError> {
        match order {
            0 => Ok(BondOrder::Unset),
            1 => Ok(BondOrder::Single),
            2 => Ok(BondOrder::Double),
            3 => Ok(BondOrder::Triple),
            4 | 5 | 6 => Ok(BondOrder::Quadruple),
            _ => Err(CoreError::UnknownBondOrder(order)),
        }
    }
    /// Numeric value used as the per-edge attribute.
    pub fn as_f64(&self) -> f64 {
        *self as u8 as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_conversion() {
        assert_eq!(BondOrder::from_order(1).unwrap(), BondOrder::Single);
        assert_eq!(BondOrder::from_order(6).unwrap(), BondOrder::Quadruple);
        assert!(BondOrder::from_order(9).is_err());
        assert_eq!(BondOrder::Double.as_f64(), 2.0);
    }
}
