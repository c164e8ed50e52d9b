use super::config::ConfigError;
use crate::core::io::error::LoadError;
use crate::core::labeling::LabelError;
use crate::core::models::ids::RecordId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to load input: {source}")]
    Load {
        #[from]
        source: LoadError,
    },

    #[error("Failed to set up labeler: {source}")]
    LabelerSetup {
        #[from]
        source: LabelError,
    },

    #[error("Failed to label record '{record_id}': {source}")]
    Labeling {
        record_id: RecordId,
        #[source]
        source: LabelError,
    },

    #[error("Record '{record_id}' has no score; a score table is required for this analysis")]
    MissingScore { record_id: RecordId },

    #[error("Record '{record_id}' is labeled with different torsions by the two force fields")]
    MismatchedEnvironments { record_id: RecordId },
}
