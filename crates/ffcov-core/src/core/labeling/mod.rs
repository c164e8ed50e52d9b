//! The labeling contract and its implementations.
//!
//! A [`Labeler`] maps a molecule to the parameter assigned to each of its proper torsions.
//! Labeling is treated as a pure function: the same molecule always yields the same
//! [`LabelTable`], which is what makes caching and parallel record loops safe.
//!
//! - [`library::LabelLibrary`] serves precomputed label tables for one force field.
//! - [`cache::CachedLabeler`] memoizes any labeler by canonical molecule string.

pub mod cache;
pub mod library;

use crate::core::io::error::LoadError;
use crate::core::models::ids::Smiles;
use crate::core::models::labels::LabelTable;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LabelError {
    #[error("No label table available for molecule '{0}'")]
    UnknownMolecule(Smiles),

    #[error(
        "Label library '{path}' was generated with force field '{found}', but '{expected}' was requested"
    )]
    ForcefieldMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("Invalid label library: {0}")]
    Load(#[from] LoadError),
}

/// Assigns force-field parameters to the proper torsions of a molecule.
///
/// Implementations must enumerate every proper torsion exactly once and index atoms the
/// same way the dataset indexes its scanned dihedrals; otherwise target matching is
/// meaningless.
pub trait Labeler: Send + Sync {
    /// Labels `molecule`, a canonical atom-mapped molecule string.
    ///
    /// # Errors
    ///
    /// Returns a [`LabelError`] if the molecule cannot be labeled. Callers treat this as
    /// fatal for the whole analysis.
    fn label(&self, molecule: &str) -> Result<Arc<LabelTable>, LabelError>;
}

impl<L: Labeler + ?Sized> Labeler for &L {
    fn label(&self, molecule: &str) -> Result<Arc<LabelTable>, LabelError> {
        (**self).label(molecule)
    }
}

impl<L: Labeler + ?Sized> Labeler for Box<L> {
    fn label(&self, molecule: &str) -> Result<Arc<LabelTable>, LabelError> {
        (**self).label(molecule)
    }
}
