use super::{LabelError, Labeler};
use crate::core::models::ids::Smiles;
use crate::core::models::labels::LabelTable;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Memoizes a labeler by canonical molecule string.
///
/// Datasets routinely hold many records per molecule, and labeling is pure, so each
/// distinct molecule is labeled once. Safe to share across worker threads. Two workers
/// missing on the same molecule at once may both call the inner labeler; the first
/// stored table wins.
#[derive(Debug)]
pub struct CachedLabeler<L> {
    inner: L,
    cache: RwLock<HashMap<Smiles, Arc<LabelTable>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

impl<L: Labeler> CachedLabeler<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self
                .cache
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .len(),
        }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

impl<L: Labeler> Labeler for CachedLabeler<L> {
    fn label(&self, molecule: &str) -> Result<Arc<LabelTable>, LabelError> {
        let cached = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(molecule)
            .cloned();
        if let Some(table) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(table);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let table = self.inner.label(molecule)?;
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Ok(cache
            .entry(molecule.to_string())
            .or_insert(table)
            .clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::torsion::Torsion;

    #[derive(Default)]
    struct CountingLabeler {
        calls: AtomicUsize,
    }

    impl Labeler for CountingLabeler {
        fn label(&self, molecule: &str) -> Result<Arc<LabelTable>, LabelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if molecule == "bad" {
                return Err(LabelError::UnknownMolecule(molecule.to_string()));
            }
            let table = LabelTable::from_pairs([(Torsion::new([0, 1, 2, 3]), molecule)]).unwrap();
            Ok(Arc::new(table))
        }
    }

    #[test]
    fn repeated_molecules_hit_the_cache() {
        let labeler = CachedLabeler::new(CountingLabeler::default());
        let first = labeler.label("t1").unwrap();
        let second = labeler.label("t1").unwrap();
        labeler.label("t2").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(labeler.inner().calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            labeler.stats(),
            CacheStats {
                hits: 1,
                misses: 2,
                entries: 2
            }
        );
    }

    #[test]
    fn failures_are_not_cached() {
        let labeler = CachedLabeler::new(CountingLabeler::default());
        assert!(labeler.label("bad").is_err());
        assert!(labeler.label("bad").is_err());
        assert_eq!(labeler.inner().calls.load(Ordering::SeqCst), 2);
        assert_eq!(labeler.stats().entries, 0);
    }

    #[test]
    fn cache_is_shared_across_threads() {
        let labeler = CachedLabeler::new(CountingLabeler::default());
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..10 {
                        labeler.label("shared").unwrap();
                    }
                });
            }
        });
        let stats = labeler.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits + stats.misses, 40);
    }
}
