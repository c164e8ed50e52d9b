use super::ids::{RecordId, Smiles};
use super::torsion::Torsion;

/// One calculation record: an identifier, the molecule it was computed on, and the
/// dihedral it scanned when it is a torsion drive.
///
/// Records are immutable once constructed; the builder-style `with_*` methods consume
/// and return the record so they can only be used while assembling it.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RecordId,
    molecule: Smiles,
    target: Option<Torsion>,
    score: Option<f64>,
}

impl Record {
    pub fn new(id: impl Into<RecordId>, molecule: impl Into<Smiles>) -> Self {
        Self {
            id: id.into(),
            molecule: molecule.into(),
            target: None,
            score: None,
        }
    }

    pub fn with_target(mut self, target: Torsion) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn molecule(&self) -> &str {
        &self.molecule
    }

    /// The scanned dihedral, present only for torsion-drive records.
    pub fn target(&self) -> Option<Torsion> {
        self.target
    }

    /// The score attached from a score table, if the record came from one.
    pub fn score(&self) -> Option<f64> {
        self.score
    }

    /// Checks whether `torsion` is this record's scanned dihedral, in either direction.
    pub fn targets(&self, torsion: &Torsion) -> bool {
        self.target.is_some_and(|target| target.is_equivalent(torsion))
    }
}
