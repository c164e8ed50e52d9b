use super::error::LoadError;
use crate::core::models::ids::RecordId;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// One row of a score table.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRow {
    pub record_id: RecordId,
    pub score: f64,
}

/// A two-column `record_id, score` table, e.g. per-record errors from a benchmark.
///
/// The first line is a header and is skipped regardless of its content. Row order is
/// preserved, and record identifiers are unique within the table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreTable {
    source: String,
    rows: Vec<ScoreRow>,
}

impl ScoreTable {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let source = path.to_string_lossy().to_string();
        debug!("Loading score table from {}", source);
        let file = std::fs::File::open(path).map_err(|e| LoadError::Io {
            path: source.clone(),
            source: e,
        })?;
        Self::read_from(file, &source)
    }

    /// Parses a score table from `reader`, naming it `source` in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Malformed`] for rows without exactly two columns, with an empty
    /// record identifier, or with a score that is not a number, and
    /// [`LoadError::DuplicateRecord`] when a record identifier repeats.
    pub fn read_from(reader: impl Read, source: &str) -> Result<Self, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        let mut seen = HashSet::new();
        for result in reader.records() {
            let row = result.map_err(|e| LoadError::Csv {
                path: source.to_string(),
                source: e,
            })?;
            let line = row.position().map_or(0, |p| p.line());
            let malformed = |message: String| LoadError::Malformed {
                path: source.to_string(),
                location: format!("line {line}"),
                message,
            };

            if row.len() != 2 {
                return Err(malformed(format!(
                    "expected 2 columns (record_id, score), found {}",
                    row.len()
                )));
            }
            let record_id = &row[0];
            if record_id.is_empty() {
                return Err(malformed("empty record identifier".to_string()));
            }
            let score: f64 = row[1]
                .parse()
                .map_err(|_| malformed(format!("invalid score '{}'", &row[1])))?;

            if !seen.insert(record_id.to_string()) {
                return Err(LoadError::DuplicateRecord {
                    path: source.to_string(),
                    id: record_id.to_string(),
                });
            }
            rows.push(ScoreRow {
                record_id: record_id.to_string(),
                score,
            });
        }

        debug!("Read {} score rows from {}", rows.len(), source);
        Ok(Self {
            source: source.to_string(),
            rows,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn rows(&self) -> &[ScoreRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
