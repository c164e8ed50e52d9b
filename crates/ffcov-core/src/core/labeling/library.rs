use super::{LabelError, Labeler};
use crate::core::io::error::LoadError;
use crate::core::models::ids::{ParameterId, Smiles};
use crate::core::models::labels::LabelTable;
use crate::core::models::torsion::Torsion;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLibrary {
    forcefield: String,
    molecules: BTreeMap<Smiles, Vec<RawAssignment>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAssignment {
    atoms: Vec<usize>,
    parameter: ParameterId,
}

/// Precomputed proper-torsion label tables for one force field.
///
/// The on-disk layout is JSON:
///
/// ```json
/// {
///   "forcefield": "openff-2.1.0.offxml",
///   "molecules": {
///     "[H:5][C:1]([H:6])([H:7])[C:2]...": [
///       {"atoms": [4, 0, 1, 7], "parameter": "t2"}
///     ]
///   }
/// }
/// ```
///
/// A molecule with an empty assignment list has no proper torsions; a molecule missing
/// from the library cannot be labeled.
#[derive(Debug, Clone, Default)]
pub struct LabelLibrary {
    forcefield: String,
    tables: HashMap<Smiles, Arc<LabelTable>>,
}

impl LabelLibrary {
    pub fn new(forcefield: impl Into<String>) -> Self {
        Self {
            forcefield: forcefield.into(),
            tables: HashMap::new(),
        }
    }

    /// Loads a library and checks it was generated with `forcefield`.
    ///
    /// # Arguments
    ///
    /// * `path` - The JSON label library.
    /// * `forcefield` - The force-field token the analysis was configured with.
    ///
    /// # Errors
    ///
    /// Returns [`LabelError::Load`] if the file cannot be read or is malformed, and
    /// [`LabelError::ForcefieldMismatch`] if it belongs to a different force field.
    pub fn load(path: &Path, forcefield: &str) -> Result<Self, LabelError> {
        let source = path.to_string_lossy().to_string();
        debug!("Loading label library from {}", source);
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: source.clone(),
            source: e,
        })?;
        Self::from_json_str(&content, &source, forcefield)
    }

    pub fn from_json_str(
        content: &str,
        source: &str,
        forcefield: &str,
    ) -> Result<Self, LabelError> {
        let raw: RawLibrary = serde_json::from_str(content).map_err(|e| LoadError::Json {
            path: source.to_string(),
            source: e,
        })?;

        if raw.forcefield != forcefield {
            return Err(LabelError::ForcefieldMismatch {
                path: source.to_string(),
                expected: forcefield.to_string(),
                found: raw.forcefield,
            });
        }

        let mut library = Self::new(raw.forcefield);
        for (molecule, assignments) in raw.molecules {
            let table = build_table(&molecule, assignments, source)?;
            trace!("{} torsions labeled for {}", table.len(), molecule);
            library.insert(molecule, table);
        }

        debug!(
            "Label library for '{}' holds {} molecules",
            library.forcefield,
            library.len()
        );
        Ok(library)
    }

    pub fn insert(&mut self, molecule: impl Into<Smiles>, table: LabelTable) {
        self.tables.insert(molecule.into(), Arc::new(table));
    }

    pub fn forcefield(&self) -> &str {
        &self.forcefield
    }

    pub fn contains(&self, molecule: &str) -> bool {
        self.tables.contains_key(molecule)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

fn build_table(
    molecule: &str,
    assignments: Vec<RawAssignment>,
    source: &str,
) -> Result<LabelTable, LoadError> {
    let malformed = |message: String| LoadError::Malformed {
        path: source.to_string(),
        location: format!("molecule '{molecule}'"),
        message,
    };

    let mut table = LabelTable::new();
    for assignment in assignments {
        let torsion = Torsion::try_from(assignment.atoms.as_slice())
            .map_err(|e| malformed(e.to_string()))?;
        table
            .insert(torsion, assignment.parameter)
            .map_err(|e| malformed(e.to_string()))?;
    }
    Ok(table)
}

impl Labeler for LabelLibrary {
    fn label(&self, molecule: &str) -> Result<Arc<LabelTable>, LabelError> {
        self.tables
            .get(molecule)
            .cloned()
            .ok_or_else(|| LabelError::UnknownMolecule(molecule.to_string()))
    }
}
