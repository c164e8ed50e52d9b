use super::PreparedLabeler;
use crate::core::store::RecordStore;
use crate::engine::blame::{self, BlameTable};
use crate::engine::config::AnalysisConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use tracing::{info, instrument};

/// Credits each scored record's score to the parameters its molecule uses.
///
/// # Errors
///
/// Fails with [`EngineError::Config`] when no score table is configured.
#[instrument(skip_all, name = "blame_workflow")]
pub fn run(config: &AnalysisConfig, reporter: &ProgressReporter) -> Result<BlameTable, EngineError> {
    config.require_scores()?;

    let (records, labeler) = reporter.phase("Loading Inputs", || {
        let records = RecordStore::load(&config.sources)?;
        let labeler = PreparedLabeler::load(&config.labels, config.cache_labels)?;
        Ok::<_, EngineError>((records, labeler))
    })?;

    let table = reporter.phase("Assigning Scores", || {
        blame::assign_scores(&records, &labeler, reporter)
    })?;
    labeler.log_cache_stats();

    info!(parameters = table.len(), "Blame workflow complete.");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::ConfigError;
    use crate::workflows::fixtures::*;
    use tempfile::tempdir;

    #[test]
    fn averages_scores_per_parameter() {
        let dir = tempdir().unwrap();
        let scores = "record_id,dde\nA,1.0\nB,2.0\nC,-4.0\n";
        let config = builder(dir.path())
            .scores_path(Some(write(dir.path(), "dde.csv", scores)))
            .build()
            .unwrap();
        let table = run(&config, &ProgressReporter::new()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("t1").unwrap().mean(), Some(1.5));
        assert_eq!(table.get("t2").unwrap().mean(), Some(-4.0));
    }

    #[test]
    fn requires_a_score_table() {
        let dir = tempdir().unwrap();
        let config = builder(dir.path()).build().unwrap();
        assert!(matches!(
            run(&config, &ProgressReporter::new()),
            Err(EngineError::Config(ConfigError::MissingParameter("scores_path")))
        ));
    }
}
