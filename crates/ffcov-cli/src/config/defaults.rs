use crate::cli::ReportFormat;

pub struct DefaultsConfig {
    pub forcefield: String,
    pub cache_labels: bool,
    pub format: ReportFormat,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            forcefield: "openff-2.1.0.offxml".to_string(),
            cache_labels: true,
            format: ReportFormat::Table,
        }
    }
}
