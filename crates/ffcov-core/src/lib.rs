//! # ffcov Core Library
//!
//! Measures how the torsion parameters of a force field cover a corpus of
//! quantum-chemistry calculation records.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture so that each concern can be tested on its
//! own and swapped without touching the others.
//!
//! - **[`core`]: The Foundation.** Immutable data models (`Record`, `Torsion`, `LabelTable`),
//!   the `RecordStore`, loaders for score tables, datasets and parameter subsets, and the
//!   [`Labeler`](core::labeling::Labeler) contract through which molecules are mapped to
//!   parameter assignments.
//!
//! - **[`engine`]: The Logic Core.** Per-record reductions and their merge functions: the
//!   coverage aggregator, the subset classifier, score blame and parameter reassignment.
//!   Record loops run on rayon when the `parallel` feature is enabled.
//!
//! - **[`workflows`]: The Public API.** Ties configuration, input loading, labeling and the
//!   engine together into complete analyses with progress reporting.

pub mod core;
pub mod engine;
pub mod workflows;
