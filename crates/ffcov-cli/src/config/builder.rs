use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use crate::cli::InputArgs;
use crate::error::{CliError, Result};
use ffcov::engine::config::{AnalysisConfig, AnalysisConfigBuilder};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Inputs only some subcommands accept on the command line.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandInputs<'a> {
    pub subset: Option<&'a Path>,
    pub compare_labels: Option<&'a Path>,
    pub compare_forcefield: Option<&'a str>,
}

pub fn build_config(args: &InputArgs, extra: CommandInputs<'_>) -> Result<AnalysisConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let inputs_file = file_config.inputs.take().unwrap_or_default();
    let labels_file = file_config.labels.take().unwrap_or_default();

    let dataset_path = require(
        args.dataset.clone().or(inputs_file.dataset),
        "inputs.dataset",
        "--dataset",
    )?;
    let library_path = require(
        args.labels.clone().or(labels_file.library),
        "labels.library",
        "--labels",
    )?;
    let forcefield = args
        .forcefield
        .clone()
        .or(labels_file.forcefield)
        .unwrap_or(defaults.forcefield);
    let cache_labels = if args.no_cache {
        false
    } else {
        labels_file.cache.unwrap_or(defaults.cache_labels)
    };

    let mut builder = AnalysisConfigBuilder::new()
        .dataset_path(dataset_path)
        .scores_path(args.scores.clone().or(inputs_file.scores))
        .subset_path(extra.subset.map(Path::to_path_buf).or(inputs_file.subset))
        .labels(library_path, forcefield)
        .cache_labels(cache_labels);

    let compare_file = file_config.compare_labels.take().unwrap_or_default();
    let compare_library = extra
        .compare_labels
        .map(Path::to_path_buf)
        .or(compare_file.library);
    if let Some(compare_library) = compare_library {
        let compare_forcefield = require(
            extra
                .compare_forcefield
                .map(str::to_string)
                .or(compare_file.forcefield),
            "compare-labels.forcefield",
            "--compare-forcefield",
        )?;
        builder = builder.comparison_labels(compare_library, compare_forcefield);
    }

    let config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;
    debug!("Resolved analysis configuration: {:?}", config);
    Ok(config)
}

fn require<T>(value: Option<T>, key: &str, flag: &str) -> Result<T> {
    value.ok_or_else(|| {
        CliError::Config(format!(
            "A value for '{}' is required either in the config file or via {}.",
            key, flag
        ))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "inputs.dataset" => {
                config.inputs.get_or_insert_with(Default::default).dataset =
                    Some(PathBuf::from(value_str));
            }
            "inputs.scores" => {
                config.inputs.get_or_insert_with(Default::default).scores =
                    Some(PathBuf::from(value_str));
            }
            "inputs.subset" => {
                config.inputs.get_or_insert_with(Default::default).subset =
                    Some(PathBuf::from(value_str));
            }
            "labels.library" => {
                config.labels.get_or_insert_with(Default::default).library =
                    Some(PathBuf::from(value_str));
            }
            "labels.forcefield" => {
                config.labels.get_or_insert_with(Default::default).forcefield =
                    Some(value_str.to_string());
            }
            "labels.cache" => {
                config.labels.get_or_insert_with(Default::default).cache =
                    Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!(
                            "Invalid boolean value for {}: {}",
                            key, value_str
                        ))
                    })?);
            }
            "compare-labels.library" => {
                config
                    .compare_labels
                    .get_or_insert_with(Default::default)
                    .library = Some(PathBuf::from(value_str));
            }
            "compare-labels.forcefield" => {
                config
                    .compare_labels
                    .get_or_insert_with(Default::default)
                    .forcefield = Some(value_str.to_string());
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
