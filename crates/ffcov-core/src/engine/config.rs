use crate::core::store::RecordSources;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// A label library together with the force field it must have been generated with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSource {
    pub library_path: PathBuf,
    pub forcefield: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub sources: RecordSources,
    pub labels: LabelSource,
    /// Second force field, used only by the reassignment analysis.
    pub comparison_labels: Option<LabelSource>,
    /// Parameter subset, used only by the subset classification.
    pub subset_path: Option<PathBuf>,
    pub cache_labels: bool,
}

impl AnalysisConfig {
    pub fn require_scores(&self) -> Result<&PathBuf, ConfigError> {
        self.sources
            .scores_path
            .as_ref()
            .ok_or(ConfigError::MissingParameter("scores_path"))
    }

    pub fn require_subset(&self) -> Result<&PathBuf, ConfigError> {
        self.subset_path
            .as_ref()
            .ok_or(ConfigError::MissingParameter("subset_path"))
    }

    pub fn require_comparison_labels(&self) -> Result<&LabelSource, ConfigError> {
        self.comparison_labels
            .as_ref()
            .ok_or(ConfigError::MissingParameter("comparison_labels"))
    }
}

#[derive(Default)]
pub struct AnalysisConfigBuilder {
    dataset_path: Option<PathBuf>,
    scores_path: Option<PathBuf>,
    labels: Option<LabelSource>,
    comparison_labels: Option<LabelSource>,
    subset_path: Option<PathBuf>,
    cache_labels: Option<bool>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dataset_path(mut self, path: PathBuf) -> Self {
        self.dataset_path = Some(path);
        self
    }
    pub fn scores_path(mut self, path: Option<PathBuf>) -> Self {
        self.scores_path = path;
        self
    }
    pub fn labels(mut self, library_path: PathBuf, forcefield: impl Into<String>) -> Self {
        self.labels = Some(LabelSource {
            library_path,
            forcefield: forcefield.into(),
        });
        self
    }
    pub fn comparison_labels(
        mut self,
        library_path: PathBuf,
        forcefield: impl Into<String>,
    ) -> Self {
        self.comparison_labels = Some(LabelSource {
            library_path,
            forcefield: forcefield.into(),
        });
        self
    }
    pub fn subset_path(mut self, path: Option<PathBuf>) -> Self {
        self.subset_path = path;
        self
    }
    pub fn cache_labels(mut self, enabled: bool) -> Self {
        self.cache_labels = Some(enabled);
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let sources = RecordSources {
            dataset_path: self
                .dataset_path
                .ok_or(ConfigError::MissingParameter("dataset_path"))?,
            scores_path: self.scores_path,
        };
        Ok(AnalysisConfig {
            sources,
            labels: self.labels.ok_or(ConfigError::MissingParameter("labels"))?,
            comparison_labels: self.comparison_labels,
            subset_path: self.subset_path,
            cache_labels: self.cache_labels.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::new()
            .dataset_path(PathBuf::from("td.json"))
            .labels(PathBuf::from("labels.json"), "openff-2.1.0.offxml")
    }

    #[test]
    fn builder_applies_defaults() {
        let config = minimal().build().unwrap();
        assert_eq!(config.sources.dataset_path, PathBuf::from("td.json"));
        assert_eq!(config.sources.scores_path, None);
        assert_eq!(config.labels.forcefield, "openff-2.1.0.offxml");
        assert!(config.cache_labels);
        assert!(config.comparison_labels.is_none());
    }

    #[test]
    fn builder_requires_dataset_and_labels() {
        let missing_dataset = AnalysisConfigBuilder::new()
            .labels(PathBuf::from("labels.json"), "ff")
            .build();
        assert_eq!(
            missing_dataset,
            Err(ConfigError::MissingParameter("dataset_path"))
        );

        let missing_labels = AnalysisConfigBuilder::new()
            .dataset_path(PathBuf::from("td.json"))
            .build();
        assert_eq!(missing_labels, Err(ConfigError::MissingParameter("labels")));
    }

    #[test]
    fn require_helpers_report_missing_inputs() {
        let config = minimal().cache_labels(false).build().unwrap();
        assert!(!config.cache_labels);
        assert_eq!(
            config.require_scores(),
            Err(ConfigError::MissingParameter("scores_path"))
        );
        assert_eq!(
            config.require_subset(),
            Err(ConfigError::MissingParameter("subset_path"))
        );
        assert_eq!(
            config.require_comparison_labels(),
            Err(ConfigError::MissingParameter("comparison_labels"))
        );

        let config = minimal()
            .scores_path(Some(PathBuf::from("dde.csv")))
            .subset_path(Some(PathBuf::from("subset.in")))
            .comparison_labels(PathBuf::from("labels-2.json"), "ff2")
            .build()
            .unwrap();
        assert_eq!(config.require_scores(), Ok(&PathBuf::from("dde.csv")));
        assert_eq!(config.require_subset(), Ok(&PathBuf::from("subset.in")));
        assert_eq!(config.require_comparison_labels().unwrap().forcefield, "ff2");
    }
}
