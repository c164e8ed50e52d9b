use super::error::LoadError;
use crate::core::models::ids::{RecordId, Smiles};
use crate::core::models::torsion::Torsion;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, trace};

#[derive(Debug, Deserialize)]
struct RawDataset {
    entries: BTreeMap<String, Vec<RawEntry>>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    record_id: RawRecordId,
    cmiles: Smiles,
    #[serde(default)]
    dihedrals: Option<Vec<Vec<usize>>>,
}

/// QCArchive record IDs show up both as strings and as bare integers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRecordId {
    Text(String),
    Number(u64),
}

impl From<RawRecordId> for RecordId {
    fn from(raw: RawRecordId) -> Self {
        match raw {
            RawRecordId::Text(s) => s,
            RawRecordId::Number(n) => n.to_string(),
        }
    }
}

/// One dataset entry: a record ID, its molecule and, for torsion drives, the scanned
/// dihedral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetEntry {
    pub record_id: RecordId,
    pub cmiles: Smiles,
    pub dihedral: Option<Torsion>,
}

/// A flattened result collection in the QCSubmit JSON layout.
///
/// Entries from every server are concatenated, servers in name order and entries in
/// file order. Record identifiers are unique across the whole collection.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    source: String,
    entries: Vec<DatasetEntry>,
    index: HashMap<RecordId, usize>,
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let source = path.to_string_lossy().to_string();
        debug!("Loading dataset from {}", source);
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: source.clone(),
            source: e,
        })?;
        Self::from_json_str(&content, &source)
    }

    /// Parses a dataset from JSON text, naming it `source` in error messages.
    ///
    /// Only the first dihedral of a torsion-drive entry is kept.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Json`] for invalid JSON, [`LoadError::Malformed`] for a
    /// dihedral list that is empty or holds a dihedral without exactly four atoms, and
    /// [`LoadError::DuplicateRecord`] when a record identifier repeats.
    pub fn from_json_str(content: &str, source: &str) -> Result<Self, LoadError> {
        let raw: RawDataset = serde_json::from_str(content).map_err(|e| LoadError::Json {
            path: source.to_string(),
            source: e,
        })?;

        let mut dataset = Self {
            source: source.to_string(),
            ..Self::default()
        };
        for (server, raw_entries) in raw.entries {
            trace!("Reading {} entries from server {}", raw_entries.len(), server);
            for raw_entry in raw_entries {
                let entry = convert_entry(raw_entry, source)?;
                dataset.push(entry)?;
            }
        }

        debug!(
            "Loaded {} dataset entries ({} torsion drives) from {}",
            dataset.len(),
            dataset.entries.iter().filter(|e| e.dihedral.is_some()).count(),
            source
        );
        Ok(dataset)
    }

    fn push(&mut self, entry: DatasetEntry) -> Result<(), LoadError> {
        if self.index.contains_key(&entry.record_id) {
            return Err(LoadError::DuplicateRecord {
                path: self.source.clone(),
                id: entry.record_id,
            });
        }
        self.index.insert(entry.record_id.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    pub fn get(&self, record_id: &str) -> Option<&DatasetEntry> {
        self.index.get(record_id).map(|&i| &self.entries[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &DatasetEntry> {
        self.entries.iter()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn convert_entry(raw: RawEntry, source: &str) -> Result<DatasetEntry, LoadError> {
    let record_id: RecordId = raw.record_id.into();
    let malformed = |message: String| LoadError::Malformed {
        path: source.to_string(),
        location: format!("record '{record_id}'"),
        message,
    };

    let dihedral = match raw.dihedrals {
        None => None,
        Some(dihedrals) => {
            let first = dihedrals
                .first()
                .ok_or_else(|| malformed("torsion drive lists no dihedrals".to_string()))?;
            let torsion = Torsion::try_from(first.as_slice())
                .map_err(|e| malformed(e.to_string()))?;
            Some(torsion)
        }
    };

    Ok(DatasetEntry {
        record_id,
        cmiles: raw.cmiles,
        dihedral,
    })
}
