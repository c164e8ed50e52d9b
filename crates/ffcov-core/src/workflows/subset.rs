use super::PreparedLabeler;
use crate::core::io::subset::load_subset;
use crate::core::store::RecordStore;
use crate::engine::config::AnalysisConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::subset::{self, SubsetReport};
use tracing::{info, instrument, warn};

/// Partitions the scored records by whether their molecule uses a parameter of the
/// configured subset.
///
/// # Errors
///
/// Fails with [`EngineError::Config`] when no score table or subset file is configured.
#[instrument(skip_all, name = "subset_workflow")]
pub fn run(
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
) -> Result<SubsetReport, EngineError> {
    config.require_scores()?;
    let subset_path = config.require_subset()?;

    let (records, labeler, parameters) = reporter.phase("Loading Inputs", || {
        let parameters = load_subset(subset_path)?;
        let records = RecordStore::load(&config.sources)?;
        let labeler = PreparedLabeler::load(&config.labels, config.cache_labels)?;
        Ok::<_, EngineError>((records, labeler, parameters))
    })?;
    if parameters.is_empty() {
        let message = "Parameter subset is empty; every record will be classified as out.";
        warn!("{}", message);
        reporter.report(Progress::Message(message.to_string()));
    }

    let report = reporter.phase("Classifying Records", || {
        subset::classify(&records, &labeler, &parameters, reporter)
    })?;
    labeler.log_cache_stats();

    info!(
        in_count = report.in_count(),
        out_count = report.out_count(),
        "Subset workflow complete."
    );
    Ok(report)
}
