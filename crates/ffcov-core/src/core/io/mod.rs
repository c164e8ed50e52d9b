//! Loaders for the external inputs of an analysis.
//!
//! Every loader has a path-based entry point and a reader/string-based one, so the
//! parsing logic can be exercised without touching the filesystem. Errors always carry
//! the name of the source they came from.

pub mod dataset;
pub mod error;
pub mod scores;
pub mod subset;
