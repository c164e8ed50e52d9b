use super::PreparedLabeler;
use crate::core::store::RecordStore;
use crate::engine::config::AnalysisConfig;
use crate::engine::error::EngineError;
use crate::engine::moved::{self, Reassignment};
use crate::engine::progress::ProgressReporter;
use tracing::{info, instrument};

/// Lists every torsion whose parameter changes between the primary and the comparison
/// force field.
///
/// # Errors
///
/// Fails with [`EngineError::Config`] when no comparison label library is configured.
#[instrument(skip_all, name = "reassignment_workflow")]
pub fn run(
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<Reassignment>, EngineError> {
    let comparison = config.require_comparison_labels()?;

    let (records, before, after) = reporter.phase("Loading Inputs", || {
        let records = RecordStore::load(&config.sources)?;
        let before = PreparedLabeler::load(&config.labels, config.cache_labels)?;
        let after = PreparedLabeler::load(comparison, config.cache_labels)?;
        Ok::<_, EngineError>((records, before, after))
    })?;
    info!(
        from = before.forcefield(),
        to = after.forcefield(),
        "Comparing force fields."
    );

    let reassignments = reporter.phase("Comparing Assignments", || {
        moved::find_reassignments(&records, &before, &after, reporter)
    })?;
    before.log_cache_stats();
    after.log_cache_stats();

    info!(
        reassignments = reassignments.len(),
        "Reassignment workflow complete."
    );
    Ok(reassignments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::ConfigError;
    use crate::workflows::fixtures::*;
    use tempfile::tempdir;

    #[test]
    fn finds_reassigned_torsions() {
        let dir = tempdir().unwrap();
        let next = next_labels(dir.path());
        let config = builder(dir.path())
            .comparison_labels(next.library_path, next.forcefield)
            .build()
            .unwrap();
        let moved = run(&config, &ProgressReporter::new()).unwrap();
        let lines: Vec<String> = moved.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec!["A (0, 1, 2, 3) t1 => t1a", "B (0, 1, 2, 3) t1 => t1a"]
        );
    }

    #[test]
    fn requires_comparison_labels() {
        let dir = tempdir().unwrap();
        let config = builder(dir.path()).build().unwrap();
        assert!(matches!(
            run(&config, &ProgressReporter::new()),
            Err(EngineError::Config(ConfigError::MissingParameter("comparison_labels")))
        ));
    }
}
