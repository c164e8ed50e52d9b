use crate::core::labeling::Labeler;
use crate::core::models::ids::{ParameterId, RecordId};
use crate::core::models::labels::LabelTable;
use crate::core::store::RecordStore;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::collections::BTreeSet;
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    /// At least one torsion of the molecule uses a parameter from the subset.
    In,
    /// No torsion uses a subset parameter, including molecules with no torsions at all.
    Out,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRecord {
    pub record_id: RecordId,
    pub score: Option<f64>,
}

/// The two partitions of a classified record set, each in record-store order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubsetReport {
    pub in_set: Vec<ClassifiedRecord>,
    pub out_set: Vec<ClassifiedRecord>,
}

impl SubsetReport {
    pub fn in_count(&self) -> usize {
        self.in_set.len()
    }

    pub fn out_count(&self) -> usize {
        self.out_set.len()
    }

    pub fn total(&self) -> usize {
        self.in_count() + self.out_count()
    }
}

/// Decides whether a molecule's label table touches the parameter subset.
///
/// The target dihedral plays no part here; only the set of parameters assigned anywhere
/// in the molecule matters.
pub fn classify_record(labels: &LabelTable, subset: &BTreeSet<ParameterId>) -> Membership {
    let touches_subset = labels
        .parameter_ids()
        .into_iter()
        .any(|parameter| subset.contains(parameter));
    if touches_subset {
        Membership::In
    } else {
        Membership::Out
    }
}

/// Partitions every record by whether its molecule uses a parameter from `subset`.
///
/// Every record lands in exactly one partition, so `in_count + out_count` always equals
/// the number of records. An empty subset puts every record in the out partition.
///
/// # Errors
///
/// Returns [`EngineError::Labeling`] for the first record whose molecule cannot be
/// labeled.
#[instrument(skip_all, name = "subset_classification_task", fields(subset_size = subset.len()))]
pub fn classify<L: Labeler + ?Sized>(
    records: &RecordStore,
    labeler: &L,
    subset: &BTreeSet<ParameterId>,
    reporter: &ProgressReporter,
) -> Result<SubsetReport, EngineError> {
    info!(records = records.len(), "Classifying records against parameter subset.");
    reporter.report(Progress::TaskStart {
        total_steps: records.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = records.as_slice().iter();

    #[cfg(feature = "parallel")]
    let iterator = records.as_slice().par_iter();

    let verdicts: Vec<(ClassifiedRecord, Membership)> = iterator
        .map(|record| {
            let labels = labeler
                .label(record.molecule())
                .map_err(|source| EngineError::Labeling {
                    record_id: record.id().to_string(),
                    source,
                })?;
            reporter.report(Progress::TaskIncrement);
            let classified = ClassifiedRecord {
                record_id: record.id().to_string(),
                score: record.score(),
            };
            Ok((classified, classify_record(&labels, subset)))
        })
        .collect::<Result<_, EngineError>>()?;

    let mut report = SubsetReport::default();
    for (classified, membership) in verdicts {
        match membership {
            Membership::In => report.in_set.push(classified),
            Membership::Out => report.out_set.push(classified),
        }
    }

    reporter.report(Progress::TaskFinish);
    info!(
        in_count = report.in_count(),
        out_count = report.out_count(),
        "Subset classification complete."
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::labeling::library::LabelLibrary;
    use crate::core::models::record::Record;
    use crate::core::models::torsion::Torsion;

    fn subset(ids: &[&str]) -> BTreeSet<ParameterId> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn single(parameter: &str) -> LabelTable {
        LabelTable::from_pairs([(Torsion::new([0, 1, 2, 3]), parameter)]).unwrap()
    }

    fn scenario() -> (RecordStore, LabelLibrary) {
        let mut library = LabelLibrary::new("ff");
        library.insert("mol-ab", single("t1"));
        library.insert("mol-c", single("t2"));
        let store = RecordStore::from_records([
            Record::new("A", "mol-ab").with_target(Torsion::new([0, 1, 2, 3])),
            Record::new("B", "mol-ab").with_score(0.5),
            Record::new("C", "mol-c").with_score(1.5),
        ])
        .unwrap();
        (store, library)
    }

    fn record_ids(records: &[ClassifiedRecord]) -> Vec<&str> {
        records.iter().map(|r| r.record_id.as_str()).collect()
    }

    #[test]
    fn scenario_partitions_records_by_subset() {
        let (store, library) = scenario();
        let report =
            classify(&store, &library, &subset(&["t1"]), &ProgressReporter::new()).unwrap();
        assert_eq!(report.in_count(), 2);
        assert_eq!(report.out_count(), 1);
        assert_eq!(record_ids(&report.in_set), vec!["A", "B"]);
        assert_eq!(record_ids(&report.out_set), vec!["C"]);
        assert_eq!(report.out_set[0].score, Some(1.5));
    }

    #[test]
    fn empty_subset_puts_everything_out() {
        let (store, library) = scenario();
        let report = classify(&store, &library, &subset(&[]), &ProgressReporter::new()).unwrap();
        assert_eq!(report.in_count(), 0);
        assert_eq!(report.out_count(), store.len());
    }

    #[test]
    fn totals_always_match_record_count() {
        let (store, library) = scenario();
        for ids in [&["t1"][..], &["t2"], &["t1", "t2"], &["t99"], &[]] {
            let report = classify(&store, &library, &subset(ids), &ProgressReporter::new())
                .unwrap();
            assert_eq!(report.total(), store.len());
        }
    }

    #[test]
    fn molecule_without_torsions_is_out() {
        assert_eq!(
            classify_record(&LabelTable::new(), &subset(&["t1"])),
            Membership::Out
        );
    }

    #[test]
    fn any_single_shared_parameter_is_enough() {
        let labels = LabelTable::from_pairs([
            (Torsion::new([0, 1, 2, 3]), "t4"),
            (Torsion::new([1, 2, 3, 4]), "t17"),
            (Torsion::new([2, 3, 4, 5]), "t4"),
        ])
        .unwrap();
        assert_eq!(classify_record(&labels, &subset(&["t17", "t99"])), Membership::In);
        assert_eq!(classify_record(&labels, &subset(&["t1", "t44"])), Membership::Out);
    }

    #[test]
    fn unlabeled_molecule_aborts_classification() {
        let (_, library) = scenario();
        let store = RecordStore::from_records([Record::new("Z", "unknown")]).unwrap();
        let result = classify(&store, &library, &subset(&["t1"]), &ProgressReporter::new());
        assert!(matches!(result, Err(EngineError::Labeling { record_id, .. }) if record_id == "Z"));
    }
}
