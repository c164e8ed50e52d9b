use crate::core::labeling::Labeler;
use crate::core::models::ids::{ParameterId, RecordId};
use crate::core::models::labels::LabelTable;
use crate::core::models::torsion::Torsion;
use crate::core::store::RecordStore;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::fmt;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A torsion whose parameter changes between two force fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    pub record_id: RecordId,
    /// The descriptor as enumerated by the first force field.
    pub torsion: Torsion,
    pub from: ParameterId,
    pub to: ParameterId,
}

impl fmt::Display for Reassignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} => {}",
            self.record_id, self.torsion, self.from, self.to
        )
    }
}

/// Lists the torsions of one molecule whose parameter differs between `before` and
/// `after`, in `before`'s descriptor order.
///
/// # Errors
///
/// Returns [`EngineError::MismatchedEnvironments`] when the two tables do not enumerate
/// the same physical torsions.
pub fn compare_tables(
    record_id: &str,
    before: &LabelTable,
    after: &LabelTable,
) -> Result<Vec<Reassignment>, EngineError> {
    if !before.covers_same_torsions(after) {
        return Err(EngineError::MismatchedEnvironments {
            record_id: record_id.to_string(),
        });
    }

    let mut moved = Vec::new();
    for (torsion, from) in before {
        let (_, to) = after
            .get_equivalent(torsion)
            .ok_or_else(|| EngineError::MismatchedEnvironments {
                record_id: record_id.to_string(),
            })?;
        if from != to {
            moved.push(Reassignment {
                record_id: record_id.to_string(),
                torsion: *torsion,
                from: from.clone(),
                to: to.clone(),
            });
        }
    }
    Ok(moved)
}

/// Labels every record with both force fields and collects the torsions whose parameter
/// changed, in record order and then descriptor order.
///
/// # Errors
///
/// Returns [`EngineError::Labeling`] if either labeler fails on a record, and
/// [`EngineError::MismatchedEnvironments`] if the two force fields disagree on which
/// torsions a molecule has.
#[instrument(skip_all, name = "reassignment_task")]
pub fn find_reassignments<B, A>(
    records: &RecordStore,
    before: &B,
    after: &A,
    reporter: &ProgressReporter,
) -> Result<Vec<Reassignment>, EngineError>
where
    B: Labeler + ?Sized,
    A: Labeler + ?Sized,
{
    info!(records = records.len(), "Comparing parameter assignments.");
    reporter.report(Progress::TaskStart {
        total_steps: records.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = records.as_slice().iter();

    #[cfg(feature = "parallel")]
    let iterator = records.as_slice().par_iter();

    let per_record: Vec<Vec<Reassignment>> = iterator
        .map(|record| {
            let labeling_failed = |source| EngineError::Labeling {
                record_id: record.id().to_string(),
                source,
            };
            let old = before.label(record.molecule()).map_err(labeling_failed)?;
            let new = after.label(record.molecule()).map_err(labeling_failed)?;
            let moved = compare_tables(record.id(), &old, &new)?;
            if !moved.is_empty() {
                debug!(record = record.id(), moved = moved.len(), "Parameters reassigned.");
            }
            reporter.report(Progress::TaskIncrement);
            Ok(moved)
        })
        .collect::<Result<_, EngineError>>()?;

    let reassignments: Vec<Reassignment> = per_record.into_iter().flatten().collect();

    reporter.report(Progress::TaskFinish);
    info!(
        reassignments = reassignments.len(),
        "Assignment comparison complete."
    );
    Ok(reassignments)
}
