use super::PreparedLabeler;
use crate::core::store::RecordStore;
use crate::engine::config::AnalysisConfig;
use crate::engine::coverage::{self, CoverageTable};
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageReport {
    pub table: CoverageTable,
    pub record_count: usize,
}

/// Runs the coverage analysis.
///
/// Covers every dataset record, or only the scored records when the configuration names
/// a score table.
#[instrument(skip_all, name = "coverage_workflow")]
pub fn run(
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
) -> Result<CoverageReport, EngineError> {
    let (records, labeler) = reporter.phase("Loading Inputs", || {
        let records = RecordStore::load(&config.sources)?;
        let labeler = PreparedLabeler::load(&config.labels, config.cache_labels)?;
        Ok::<_, EngineError>((records, labeler))
    })?;

    let table = reporter.phase("Aggregating Coverage", || {
        coverage::aggregate(&records, &labeler, reporter)
    })?;
    labeler.log_cache_stats();

    info!(
        parameters = table.len(),
        records = records.len(),
        "Coverage workflow complete."
    );
    Ok(CoverageReport {
        table,
        record_count: records.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::error::LoadError;
    use crate::engine::progress::Progress;
    use crate::workflows::fixtures::*;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[test]
    fn covers_the_whole_dataset() {
        let dir = tempdir().unwrap();
        let config = builder(dir.path()).build().unwrap();
        let report = run(&config, &ProgressReporter::new()).unwrap();

        assert_eq!(report.record_count, 3);
        let t1 = report.table.get("t1").unwrap();
        assert_eq!(t1.environment_count, 2);
        assert_eq!(t1.record_count(), 2);
        assert_eq!(t1.molecule_count(), 1);
        assert_eq!(t1.target_matches, 2);
        let t2 = report.table.get("t2").unwrap();
        assert_eq!(t2.environment_count, 1);
        assert_eq!(t2.target_matches, 0);
    }

    #[test]
    fn score_table_restricts_the_records() {
        let dir = tempdir().unwrap();
        let config = builder(dir.path())
            .scores_path(Some(write(dir.path(), "dde.csv", SCORES)))
            .build()
            .unwrap();
        let report = run(&config, &ProgressReporter::new()).unwrap();
        assert_eq!(report.record_count, 2);
        assert_eq!(report.table.get("t1").unwrap().environment_count, 1);
    }

    #[test]
    fn cache_does_not_change_results() {
        let dir = tempdir().unwrap();
        let cached = run(
            &builder(dir.path()).build().unwrap(),
            &ProgressReporter::new(),
        )
        .unwrap();
        let direct = run(
            &builder(dir.path()).cache_labels(false).build().unwrap(),
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_eq!(cached, direct);
    }

    #[test]
    fn reports_phases_and_task_progress() {
        let dir = tempdir().unwrap();
        let config = builder(dir.path()).build().unwrap();
        let events: Mutex<Vec<Progress>> = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|e: Progress| {
            events.lock().unwrap().push(e);
        }));
        run(&config, &reporter).unwrap();
        drop(reporter);

        let events = events.into_inner().unwrap();
        assert_eq!(
            events.first(),
            Some(&Progress::PhaseStart {
                name: "Loading Inputs"
            })
        );
        let increments = events
            .iter()
            .filter(|e| **e == Progress::TaskIncrement)
            .count();
        assert_eq!(increments, 3);
        assert_eq!(events.last(), Some(&Progress::PhaseFinish));
    }

    #[test]
    fn missing_dataset_is_a_load_error() {
        let dir = tempdir().unwrap();
        let config = builder(dir.path())
            .dataset_path(PathBuf::from("/nonexistent/td.json"))
            .build()
            .unwrap();
        let result = run(&config, &ProgressReporter::new());
        assert!(matches!(
            result,
            Err(EngineError::Load {
                source: LoadError::Io { .. }
            })
        ));
    }
}
