//! # Workflows Module
//!
//! End-to-end analyses. Each workflow takes an [`AnalysisConfig`], loads the records and
//! label libraries it needs, runs one engine task and returns a report value; formatting
//! is left to the caller.
//!
//! ## Architecture
//!
//! - **Coverage** ([`coverage`]) - Per-parameter statistics over the dataset or a scored subset of it
//! - **Subset** ([`subset`]) - In/out partition of scored records against a parameter subset
//! - **Blame** ([`blame`]) - Mean score per parameter
//! - **Reassignment** ([`moved`]) - Parameter changes between two force fields

pub mod blame;
pub mod coverage;
pub mod moved;
pub mod subset;

use crate::core::labeling::cache::CachedLabeler;
use crate::core::labeling::library::LabelLibrary;
use crate::core::labeling::{LabelError, Labeler};
use crate::core::models::labels::LabelTable;
use crate::engine::config::LabelSource;
use std::sync::Arc;
use tracing::{debug, info};

/// A loaded label library, optionally behind the label cache.
#[derive(Debug)]
pub enum PreparedLabeler {
    Direct(LabelLibrary),
    Cached(CachedLabeler<LabelLibrary>),
}

impl PreparedLabeler {
    pub fn load(source: &LabelSource, cache: bool) -> Result<Self, LabelError> {
        let library = LabelLibrary::load(&source.library_path, &source.forcefield)?;
        info!(
            forcefield = library.forcefield(),
            molecules = library.len(),
            cached = cache,
            "Label library loaded."
        );
        Ok(if cache {
            Self::Cached(CachedLabeler::new(library))
        } else {
            Self::Direct(library)
        })
    }

    pub fn forcefield(&self) -> &str {
        match self {
            Self::Direct(library) => library.forcefield(),
            Self::Cached(cached) => cached.inner().forcefield(),
        }
    }

    pub fn log_cache_stats(&self) {
        if let Self::Cached(cached) = self {
            let stats = cached.stats();
            debug!(
                forcefield = self.forcefield(),
                hits = stats.hits,
                misses = stats.misses,
                entries = stats.entries,
                "Label cache statistics."
            );
        }
    }
}

impl Labeler for PreparedLabeler {
    fn label(&self, molecule: &str) -> Result<Arc<LabelTable>, LabelError> {
        match self {
            Self::Direct(library) => library.label(molecule),
            Self::Cached(cached) => cached.label(molecule),
        }
    }
}
