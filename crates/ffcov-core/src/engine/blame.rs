use crate::core::labeling::Labeler;
use crate::core::models::ids::ParameterId;
use crate::core::models::labels::LabelTable;
use crate::core::models::record::Record;
use crate::core::store::RecordStore;
use crate::core::utils::ordering::natural_cmp;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::collections::BTreeMap;
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Running total of the scores assigned to one parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreSummary {
    pub count: usize,
    pub sum: f64,
}

impl ScoreSummary {
    pub fn add(&mut self, score: f64) {
        self.count += 1;
        self.sum += score;
    }

    pub fn merge(&mut self, other: ScoreSummary) {
        self.count += other.count;
        self.sum += other.sum;
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Scores credited to each parameter used by at least one scored record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlameTable {
    parameters: BTreeMap<ParameterId, ScoreSummary>,
}

impl BlameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, parameter: &str) -> Option<&ScoreSummary> {
        self.parameters.get(parameter)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParameterId, &ScoreSummary)> {
        self.parameters.iter()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn merge(&mut self, other: BlameTable) {
        for (parameter, summary) in other.parameters {
            self.parameters.entry(parameter).or_default().merge(summary);
        }
    }

    /// Parameters in natural identifier order (`t2` before `t10`).
    pub fn ranked(&self) -> Vec<(&ParameterId, &ScoreSummary)> {
        let mut ranked: Vec<_> = self.parameters.iter().collect();
        ranked.sort_by(|(a, _), (b, _)| natural_cmp(a, b));
        ranked
    }
}

/// Credits `score` once to every distinct parameter of the molecule.
pub fn record_blame(score: f64, labels: &LabelTable) -> BlameTable {
    let mut table = BlameTable::new();
    for parameter in labels.parameter_ids() {
        table
            .parameters
            .entry(parameter.to_string())
            .or_default()
            .add(score);
    }
    table
}

fn require_score(record: &Record) -> Result<f64, EngineError> {
    record.score().ok_or_else(|| EngineError::MissingScore {
        record_id: record.id().to_string(),
    })
}

/// Assigns every record's score to the parameters used in its molecule.
///
/// A parameter used by several torsions of the same molecule still receives the record's
/// score once.
///
/// # Errors
///
/// Returns [`EngineError::MissingScore`] if any record carries no score, and
/// [`EngineError::Labeling`] if a molecule cannot be labeled.
#[instrument(skip_all, name = "blame_task")]
pub fn assign_scores<L: Labeler + ?Sized>(
    records: &RecordStore,
    labeler: &L,
    reporter: &ProgressReporter,
) -> Result<BlameTable, EngineError> {
    info!(records = records.len(), "Assigning record scores to parameters.");
    reporter.report(Progress::TaskStart {
        total_steps: records.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = records.as_slice().iter();

    #[cfg(feature = "parallel")]
    let iterator = records.as_slice().par_iter();

    let contributions: Vec<BlameTable> = iterator
        .map(|record| {
            let score = require_score(record)?;
            let labels = labeler
                .label(record.molecule())
                .map_err(|source| EngineError::Labeling {
                    record_id: record.id().to_string(),
                    source,
                })?;
            reporter.report(Progress::TaskIncrement);
            Ok(record_blame(score, &labels))
        })
        .collect::<Result<_, EngineError>>()?;

    let mut table = BlameTable::new();
    for contribution in contributions {
        table.merge(contribution);
    }

    reporter.report(Progress::TaskFinish);
    info!(parameters = table.len(), "Score assignment complete.");
    Ok(table)
}
