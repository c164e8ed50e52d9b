use crate::core::labeling::Labeler;
use crate::core::models::ids::{ParameterId, RecordId, Smiles};
use crate::core::models::labels::LabelTable;
use crate::core::models::record::Record;
use crate::core::store::RecordStore;
use crate::core::utils::ordering::natural_cmp;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, instrument, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// How a single torsion parameter is exercised by a set of records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterStatistics {
    /// Every torsion assigned to the parameter, counted once per occurrence.
    pub environment_count: usize,
    /// Records whose molecule has at least one torsion assigned to the parameter.
    pub records: BTreeSet<RecordId>,
    /// Distinct molecules with at least one torsion assigned to the parameter.
    pub molecules: BTreeSet<Smiles>,
    /// Records whose scanned dihedral is one of the torsions assigned to the parameter.
    pub target_matches: usize,
}

impl ParameterStatistics {
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn molecule_count(&self) -> usize {
        self.molecules.len()
    }

    /// Folds the statistics of a disjoint set of records into `self`.
    pub fn merge(&mut self, other: ParameterStatistics) {
        self.environment_count += other.environment_count;
        self.records.extend(other.records);
        self.molecules.extend(other.molecules);
        self.target_matches += other.target_matches;
    }
}

/// Per-parameter statistics for every parameter assigned at least once.
///
/// Parameters are stored by identifier, so two tables built from the same records are
/// equal no matter in which order the records were processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageTable {
    parameters: BTreeMap<ParameterId, ParameterStatistics>,
}

impl CoverageTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, parameter: &str) -> Option<&ParameterStatistics> {
        self.parameters.get(parameter)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParameterId, &ParameterStatistics)> {
        self.parameters.iter()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Total torsions labeled across all parameters.
    pub fn total_environments(&self) -> usize {
        self.parameters.values().map(|s| s.environment_count).sum()
    }

    /// Combines the contributions of two disjoint sets of records.
    pub fn merge(&mut self, other: CoverageTable) {
        for (parameter, stats) in other.parameters {
            self.parameters.entry(parameter).or_default().merge(stats);
        }
    }

    /// Parameters in report order: most environments first.
    ///
    /// Equal environment counts are ordered by natural parameter ID (`t2` before `t10`),
    /// never by discovery order. The result is independent of record order.
    pub fn ranked(&self) -> Vec<(&ParameterId, &ParameterStatistics)> {
        let mut ranked: Vec<_> = self.parameters.iter().collect();
        ranked.sort_by(|(id_a, a), (id_b, b)| {
            b.environment_count
                .cmp(&a.environment_count)
                .then_with(|| natural_cmp(id_a, id_b))
        });
        ranked
    }
}

/// Computes what a single record adds to the coverage table.
///
/// # Arguments
///
/// * `record` - The record being processed.
/// * `labels` - The label table of the record's molecule.
///
/// # Return
///
/// A table holding one entry per parameter in `labels`, crediting `record` and its
/// molecule, counting every torsion, and counting a target match where the record's
/// dihedral (in either direction) is assigned to the parameter.
pub fn record_contribution(record: &Record, labels: &LabelTable) -> CoverageTable {
    let mut table = CoverageTable::new();
    for (torsion, parameter) in labels {
        let stats = table.parameters.entry(parameter.clone()).or_default();
        stats.environment_count += 1;
        stats.records.insert(record.id().to_string());
        stats.molecules.insert(record.molecule().to_string());
        if record.targets(torsion) {
            trace!(
                record = record.id(),
                %torsion,
                parameter = parameter.as_str(),
                "Target dihedral matched."
            );
            stats.target_matches += 1;
        }
    }
    table
}

/// Builds the coverage table for every record in `records`.
///
/// The labeler is called once per record. Records are processed in parallel when the
/// `parallel` feature is enabled; the result does not depend on processing order.
///
/// # Errors
///
/// Returns [`EngineError::Labeling`] for the first record whose molecule cannot be
/// labeled. No partial table is returned.
#[instrument(skip_all, name = "coverage_task")]
pub fn aggregate<L: Labeler + ?Sized>(
    records: &RecordStore,
    labeler: &L,
    reporter: &ProgressReporter,
) -> Result<CoverageTable, EngineError> {
    info!(records = records.len(), "Aggregating parameter coverage.");
    reporter.report(Progress::TaskStart {
        total_steps: records.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = records.as_slice().iter();

    #[cfg(feature = "parallel")]
    let iterator = records.as_slice().par_iter();

    let contributions: Vec<CoverageTable> = iterator
        .map(|record| {
            let labels = labeler
                .label(record.molecule())
                .map_err(|source| EngineError::Labeling {
                    record_id: record.id().to_string(),
                    source,
                })?;
            reporter.report(Progress::TaskIncrement);
            Ok(record_contribution(record, &labels))
        })
        .collect::<Result<_, EngineError>>()?;

    let mut table = CoverageTable::new();
    for contribution in contributions {
        table.merge(contribution);
    }

    reporter.report(Progress::TaskFinish);
    info!(
        parameters = table.len(),
        environments = table.total_environments(),
        "Coverage aggregation complete."
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::labeling::library::LabelLibrary;
    use crate::core::labeling::LabelError;
    use crate::core::models::torsion::Torsion;

    fn t(atoms: [usize; 4]) -> Torsion {
        Torsion::new(atoms)
    }

    fn table(pairs: &[([usize; 4], &str)]) -> LabelTable {
        LabelTable::from_pairs(pairs.iter().map(|(atoms, p)| (t(*atoms), *p))).unwrap()
    }

    fn ids(set: &BTreeSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    /// Records A and B share a molecule labeled t1, C has a molecule labeled t2.
    fn scenario(a_target: [usize; 4], b_target: [usize; 4]) -> (RecordStore, LabelLibrary) {
        let mut library = LabelLibrary::new("ff");
        library.insert("mol-ab", table(&[([0, 1, 2, 3], "t1")]));
        library.insert("mol-c", table(&[([0, 1, 2, 3], "t2")]));
        let store = RecordStore::from_records([
            Record::new("A", "mol-ab").with_target(t(a_target)),
            Record::new("B", "mol-ab").with_target(t(b_target)),
            Record::new("C", "mol-c"),
        ])
        .unwrap();
        (store, library)
    }

    #[test]
    fn scenario_counts_exact_and_reversed_target_matches() {
        let (store, library) = scenario([0, 1, 2, 3], [3, 2, 1, 0]);
        let coverage = aggregate(&store, &library, &ProgressReporter::new()).unwrap();

        assert_eq!(coverage.len(), 2);
        let t1 = coverage.get("t1").unwrap();
        assert_eq!(t1.environment_count, 2);
        assert_eq!(ids(&t1.records), vec!["A", "B"]);
        assert_eq!(ids(&t1.molecules), vec!["mol-ab"]);
        assert_eq!(t1.target_matches, 2);

        let t2 = coverage.get("t2").unwrap();
        assert_eq!(t2.environment_count, 1);
        assert_eq!(ids(&t2.records), vec!["C"]);
        assert_eq!(t2.target_matches, 0);
    }

    #[test]
    fn pre_reversed_targets_give_identical_statistics() {
        let (store, library) = scenario([0, 1, 2, 3], [3, 2, 1, 0]);
        let (reversed_store, _) = scenario([3, 2, 1, 0], [0, 1, 2, 3]);
        let reporter = ProgressReporter::new();
        assert_eq!(
            aggregate(&store, &library, &reporter).unwrap(),
            aggregate(&reversed_store, &library, &reporter).unwrap()
        );
    }

    #[test]
    fn environments_count_every_occurrence_records_count_once() {
        let mut library = LabelLibrary::new("ff");
        library.insert(
            "butane",
            table(&[
                ([0, 1, 2, 3], "t1"),
                ([4, 0, 1, 2], "t1"),
                ([5, 0, 1, 2], "t1"),
                ([1, 2, 3, 6], "t3"),
            ]),
        );
        let store = RecordStore::from_records([
            Record::new("1", "butane").with_target(t([2, 1, 0, 5])),
            Record::new("2", "butane").with_target(t([0, 1, 2, 4])),
        ])
        .unwrap();

        let coverage = aggregate(&store, &library, &ProgressReporter::new()).unwrap();
        let t1 = coverage.get("t1").unwrap();
        assert_eq!(t1.environment_count, 6);
        assert_eq!(t1.record_count(), 2);
        assert_eq!(t1.molecule_count(), 1);
        assert_eq!(t1.target_matches, 1);
        assert_eq!(coverage.get("t3").unwrap().environment_count, 2);
        assert_eq!(coverage.total_environments(), 8);
    }

    #[test]
    fn count_invariants_hold_for_every_parameter() {
        let mut library = LabelLibrary::new("ff");
        library.insert("m1", table(&[([0, 1, 2, 3], "t1"), ([1, 2, 3, 4], "t2")]));
        library.insert("m2", table(&[([0, 1, 2, 3], "t2"), ([1, 2, 3, 4], "t2")]));
        library.insert("m3", table(&[]));
        let store = RecordStore::from_records([
            Record::new("a", "m1").with_target(t([4, 3, 2, 1])),
            Record::new("b", "m2").with_target(t([1, 2, 3, 4])),
            Record::new("c", "m2"),
            Record::new("d", "m3"),
        ])
        .unwrap();

        let coverage = aggregate(&store, &library, &ProgressReporter::new()).unwrap();
        for (_, stats) in coverage.iter() {
            assert!(stats.environment_count >= 1);
            assert!(stats.record_count() <= stats.environment_count);
            assert!(stats.target_matches <= stats.record_count());
            assert!(stats.molecule_count() <= stats.record_count());
        }
        assert_eq!(coverage.get("t2").unwrap().target_matches, 2);
        assert_eq!(coverage.len(), 2);
    }

    #[test]
    fn record_order_does_not_change_result() {
        let (store, library) = scenario([0, 1, 2, 3], [0, 1, 2, 3]);
        let reversed =
            RecordStore::from_records(store.as_slice().iter().rev().cloned()).unwrap();
        let reporter = ProgressReporter::new();
        let first = aggregate(&store, &library, &reporter).unwrap();
        assert_eq!(first, aggregate(&reversed, &library, &reporter).unwrap());
        assert_eq!(first, aggregate(&store, &library, &reporter).unwrap());
    }

    #[test]
    fn merge_of_contributions_matches_aggregate() {
        let (store, library) = scenario([0, 1, 2, 3], [3, 2, 1, 0]);
        let mut merged = CoverageTable::new();
        for record in store.iter() {
            let labels = library.label(record.molecule()).unwrap();
            merged.merge(record_contribution(record, &labels));
        }
        assert_eq!(
            merged,
            aggregate(&store, &library, &ProgressReporter::new()).unwrap()
        );
    }

    #[test]
    fn ranked_sorts_by_environments_then_natural_id() {
        let mut library = LabelLibrary::new("ff");
        library.insert(
            "m",
            table(&[
                ([0, 1, 2, 3], "t10"),
                ([1, 2, 3, 4], "t2"),
                ([2, 3, 4, 5], "t44"),
                ([3, 4, 5, 6], "t44"),
            ]),
        );
        let store = RecordStore::from_records([Record::new("r", "m")]).unwrap();
        let coverage = aggregate(&store, &library, &ProgressReporter::new()).unwrap();
        let order: Vec<_> = coverage.ranked().into_iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(order, vec!["t44", "t2", "t10"]);
    }

    #[test]
    fn unlabeled_molecule_aborts_aggregation() {
        let (_, library) = scenario([0, 1, 2, 3], [0, 1, 2, 3]);
        let store = RecordStore::from_records([
            Record::new("A", "mol-ab"),
            Record::new("X", "unknown"),
        ])
        .unwrap();
        let result = aggregate(&store, &library, &ProgressReporter::new());
        assert!(matches!(
            result,
            Err(EngineError::Labeling { record_id, source: LabelError::UnknownMolecule(_) })
                if record_id == "X"
        ));
    }

    #[test]
    fn empty_store_gives_empty_table() {
        let store = RecordStore::default();
        let library = LabelLibrary::new("ff");
        let coverage = aggregate(&store, &library, &ProgressReporter::new()).unwrap();
        assert!(coverage.is_empty());
        assert!(coverage.ranked().is_empty());
    }
}
