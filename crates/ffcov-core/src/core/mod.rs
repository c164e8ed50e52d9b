//! # Core Module
//!
//! Data models, input loading and the labeling contract shared by every analysis.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Records, torsion descriptors and label tables
//! - **File I/O** ([`io`]) - Score tables, QCSubmit-style datasets and parameter subsets
//! - **Record Store** ([`store`]) - The validated, immutable record collection
//! - **Labeling** ([`labeling`]) - The labeler contract plus library-backed and caching adapters
//! - **Utilities** ([`utils`]) - Ordering helpers for parameter identifiers
//!
//! Atoms are opaque integer indices and parameters are opaque string identifiers throughout;
//! no chemistry is interpreted here.

pub mod io;
pub mod labeling;
pub mod models;
pub mod store;
pub mod utils;
