use crate::core::models::ids::RecordId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("JSON parsing error for '{path}': {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Malformed input in '{path}' at {location}: {message}")]
    Malformed {
        path: String,
        location: String,
        message: String,
    },
    #[error("Duplicate record ID '{id}' in '{path}'")]
    DuplicateRecord { path: String, id: RecordId },
    #[error("Record '{id}' referenced by '{referenced_by}' has no entry in '{path}'")]
    MissingRecord {
        id: RecordId,
        referenced_by: String,
        path: String,
    },
}
