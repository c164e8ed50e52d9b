//! Configuration layering for the CLI: defaults, then the TOML file, then `-S` overrides,
//! then command-line flags.

pub mod builder;
pub mod defaults;
pub mod file;

pub use builder::{CommandInputs, build_config};
