use super::ids::ParameterId;
use super::torsion::Torsion;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("torsion {0} is listed more than once")]
pub struct DuplicateTorsion(pub Torsion);

/// The parameter assignments of a single molecule: one entry per proper torsion.
///
/// Many torsions may share a parameter, but a table never holds two descriptors that
/// refer to the same physical torsion. Iteration follows descriptor order, so every
/// consumer sees the same sequence for the same molecule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    entries: BTreeMap<Torsion, ParameterId>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from descriptor/parameter pairs.
    ///
    /// # Arguments
    ///
    /// * `pairs` - The assignments, in any order.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateTorsion`] if two pairs describe the same physical torsion,
    /// either verbatim or reversed.
    pub fn from_pairs<I, P>(pairs: I) -> Result<Self, DuplicateTorsion>
    where
        I: IntoIterator<Item = (Torsion, P)>,
        P: Into<ParameterId>,
    {
        let mut table = Self::new();
        for (torsion, parameter) in pairs {
            table.insert(torsion, parameter)?;
        }
        Ok(table)
    }

    pub fn insert(
        &mut self,
        torsion: Torsion,
        parameter: impl Into<ParameterId>,
    ) -> Result<(), DuplicateTorsion> {
        if self.get_equivalent(&torsion).is_some() {
            return Err(DuplicateTorsion(torsion));
        }
        self.entries.insert(torsion, parameter.into());
        Ok(())
    }

    pub fn get(&self, torsion: &Torsion) -> Option<&ParameterId> {
        self.entries.get(torsion)
    }

    /// Looks up the entry for the physical torsion `torsion` describes, whichever
    /// direction the table stores it in.
    pub fn get_equivalent(&self, torsion: &Torsion) -> Option<(&Torsion, &ParameterId)> {
        self.entries
            .get_key_value(torsion)
            .or_else(|| self.entries.get_key_value(&torsion.reversed()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Torsion, &ParameterId)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The distinct parameters assigned anywhere in the molecule.
    pub fn parameter_ids(&self) -> BTreeSet<&str> {
        self.entries.values().map(String::as_str).collect()
    }

    /// Checks whether both tables enumerate the same physical torsions.
    pub fn covers_same_torsions(&self, other: &LabelTable) -> bool {
        self.len() == other.len()
            && self
                .entries
                .keys()
                .all(|torsion| other.get_equivalent(torsion).is_some())
    }
}

impl<'a> IntoIterator for &'a LabelTable {
    type Item = (&'a Torsion, &'a ParameterId);
    type IntoIter = std::collections::btree_map::Iter<'a, Torsion, ParameterId>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
