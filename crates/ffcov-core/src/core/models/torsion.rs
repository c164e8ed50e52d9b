use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// An ordered 4-tuple of atom indices describing one dihedral.
///
/// Two descriptors refer to the same physical torsion if they are equal or if one is the
/// exact reverse of the other. No other permutation is considered equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Torsion([usize; 4]);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("a torsion needs exactly 4 atom indices, found {0}")]
pub struct InvalidTorsionLength(pub usize);

impl Torsion {
    pub const fn new(atoms: [usize; 4]) -> Self {
        Self(atoms)
    }

    /// Returns the descriptor with its atom order reversed.
    pub fn reversed(&self) -> Self {
        let [a, b, c, d] = self.0;
        Self([d, c, b, a])
    }

    /// Checks whether `other` describes the same physical torsion.
    ///
    /// # Arguments
    ///
    /// * `other` - The descriptor to compare against.
    ///
    /// # Return
    ///
    /// Returns `true` if `other` equals this descriptor or its reversal.
    pub fn is_equivalent(&self, other: &Torsion) -> bool {
        self == other || self.reversed() == *other
    }
}

impl From<[usize; 4]> for Torsion {
    fn from(atoms: [usize; 4]) -> Self {
        Self(atoms)
    }
}

impl TryFrom<&[usize]> for Torsion {
    type Error = InvalidTorsionLength;

    fn try_from(atoms: &[usize]) -> Result<Self, Self::Error> {
        <[usize; 4]>::try_from(atoms)
            .map(Self)
            .map_err(|_| InvalidTorsionLength(atoms.len()))
    }
}

impl fmt::Display for Torsion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "({a}, {b}, {c}, {d})")
    }
}
