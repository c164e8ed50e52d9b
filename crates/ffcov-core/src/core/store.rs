use crate::core::io::dataset::Dataset;
use crate::core::io::error::LoadError;
use crate::core::io::scores::ScoreTable;
use crate::core::models::ids::RecordId;
use crate::core::models::record::Record;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::info;

const IN_MEMORY_SOURCE: &str = "<memory>";

/// Where the records of an analysis come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSources {
    /// The dataset supplying every record's molecule and dihedral.
    pub dataset_path: PathBuf,
    /// Optional score table. When present, only its rows become records.
    pub scores_path: Option<PathBuf>,
}

/// The immutable collection of records an analysis runs over.
///
/// Records keep their load order and identifiers are unique. The store is fully
/// materialized before any analysis starts, so no input file stays open while records
/// are labeled.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    index: HashMap<RecordId, usize>,
}

impl RecordStore {
    /// Loads the records described by `sources`.
    ///
    /// # Arguments
    ///
    /// * `sources` - The dataset path and the optional score table path.
    ///
    /// # Return
    ///
    /// Every dataset entry as a record when no score table is given, otherwise one record
    /// per score row joined with its dataset entry.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if either source cannot be read or is malformed, or if a
    /// scored record has no dataset entry.
    pub fn load(sources: &RecordSources) -> Result<Self, LoadError> {
        let dataset = Dataset::load(&sources.dataset_path)?;
        let store = match &sources.scores_path {
            Some(scores_path) => {
                let scores = ScoreTable::load(scores_path)?;
                Self::join_scores(&scores, &dataset)?
            }
            None => Self::from_dataset(&dataset)?,
        };
        info!(
            records = store.len(),
            dataset_entries = dataset.len(),
            "Record store ready."
        );
        Ok(store)
    }

    /// Turns every dataset entry into a record.
    pub fn from_dataset(dataset: &Dataset) -> Result<Self, LoadError> {
        let mut store = Self::default();
        for entry in dataset.iter() {
            let mut record = Record::new(entry.record_id.clone(), entry.cmiles.clone());
            if let Some(dihedral) = entry.dihedral {
                record = record.with_target(dihedral);
            }
            store.push(record, dataset.source())?;
        }
        Ok(store)
    }

    /// Builds one record per score row, taking molecule and dihedral from the dataset.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::MissingRecord`] for the first score row whose record ID has no
    /// dataset entry. Mismatched joins are never skipped silently.
    pub fn join_scores(scores: &ScoreTable, dataset: &Dataset) -> Result<Self, LoadError> {
        let mut store = Self::default();
        for row in scores.rows() {
            let entry = dataset
                .get(&row.record_id)
                .ok_or_else(|| LoadError::MissingRecord {
                    id: row.record_id.clone(),
                    referenced_by: scores.source().to_string(),
                    path: dataset.source().to_string(),
                })?;
            let mut record =
                Record::new(row.record_id.clone(), entry.cmiles.clone()).with_score(row.score);
            if let Some(dihedral) = entry.dihedral {
                record = record.with_target(dihedral);
            }
            store.push(record, scores.source())?;
        }
        Ok(store)
    }

    /// Builds a store from records assembled in memory.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Result<Self, LoadError> {
        let mut store = Self::default();
        for record in records {
            store.push(record, IN_MEMORY_SOURCE)?;
        }
        Ok(store)
    }

    fn push(&mut self, record: Record, source: &str) -> Result<(), LoadError> {
        if self.index.contains_key(record.id()) {
            return Err(LoadError::DuplicateRecord {
                path: source.to_string(),
                id: record.id().to_string(),
            });
        }
        self.index.insert(record.id().to_string(), self.records.len());
        self.records.push(record);
        Ok(())
    }

    pub fn get(&self, record_id: &str) -> Option<&Record> {
        self.index.get(record_id).map(|&i| &self.records[i])
    }

    pub fn molecule(&self, record_id: &str) -> Option<&str> {
        self.get(record_id).map(Record::molecule)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
