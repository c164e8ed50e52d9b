//! # Engine Module
//!
//! The analyses proper. Each analysis is a per-record reduction: a record is labeled, its
//! contribution is computed in isolation, and contributions are merged. Because merging is
//! associative and commutative, the record loop runs on rayon when the `parallel` feature
//! is enabled and produces exactly the same result as a sequential run.
//!
//! ## Architecture
//!
//! - **Coverage** ([`coverage`]) - Per-parameter environment, record, molecule and target counts
//! - **Subset Classification** ([`subset`]) - In/out partition of records against a parameter subset
//! - **Blame** ([`blame`]) - Mean record score per parameter
//! - **Reassignment** ([`moved`]) - Torsions whose parameter changes between two force fields
//! - **Configuration** ([`config`]) - Analysis inputs and their builder
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Engine error type

pub mod blame;
pub mod config;
pub mod coverage;
pub mod error;
pub mod moved;
pub mod progress;
pub mod subset;
