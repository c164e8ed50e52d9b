/// Identifier of a calculation record, as issued by the archive that produced it.
pub type RecordId = String;

/// Identifier of a force-field torsion parameter (e.g. `t17`).
pub type ParameterId = String;

/// Canonical atom-mapped molecule string, used both as the labeler input and as the
/// deduplication key for molecules.
pub type Smiles = String;
