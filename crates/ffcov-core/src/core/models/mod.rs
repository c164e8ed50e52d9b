//! Immutable value types describing records, torsions and parameter assignments.

pub mod ids;
pub mod labels;
pub mod record;
pub mod torsion;
