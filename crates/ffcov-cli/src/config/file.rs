use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileInputsConfig {
    pub dataset: Option<PathBuf>,
    pub scores: Option<PathBuf>,
    pub subset: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileLabelsConfig {
    pub library: Option<PathBuf>,
    pub forcefield: Option<String>,
    pub cache: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileCompareLabelsConfig {
    pub library: Option<PathBuf>,
    pub forcefield: Option<String>,
}

/// The TOML configuration file. Every key is optional; command-line flags win.
///
/// ```toml
/// [inputs]
/// dataset = "sage-td.json"
/// scores = "dde.csv"
///
/// [labels]
/// library = "labels-2.1.0.json"
/// forcefield = "openff-2.1.0.offxml"
///
/// [compare-labels]
/// library = "labels-2.2.0.json"
/// forcefield = "openff-2.2.0.offxml"
/// ```
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub inputs: Option<FileInputsConfig>,
    pub labels: Option<FileLabelsConfig>,
    pub compare_labels: Option<FileCompareLabelsConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
