use std::path::PathBuf;

/// Which rule kinds to drop while extracting.
///
/// The two switches compose independently. With both off, records pass
/// through untouched and are not labelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Drop records with a non-empty `alert` name
    pub exclude_alert_rules: bool,
    /// Drop records with a non-empty `record` name
    pub exclude_recording_rules: bool,
}

impl FilterOptions {
    pub fn new(exclude_alert_rules: bool, exclude_recording_rules: bool) -> Self {
        Self {
            exclude_alert_rules,
            exclude_recording_rules,
        }
    }

    /// True when at least one kind is excluded.
    pub fn is_active(&self) -> bool {
        self.exclude_alert_rules || self.exclude_recording_rules
    }
}

/// Where rule resources are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    /// List every PrometheusRule through the Kubernetes API
    Cluster,
    /// Read exported manifests from a file or directory
    Manifests(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Rule kinds to exclude
    pub filter: FilterOptions,
    /// Directory receiving one `<namespace>.yaml` per namespace
    pub output_dir: PathBuf,
    /// Create `output_dir` when it does not exist
    pub create_output_dir: bool,
    /// Input boundary to read from
    pub source: SourceConfig,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            filter: FilterOptions::default(),
            output_dir: PathBuf::from("."),
            create_output_dir: false,
            source: SourceConfig::Cluster,
        }
    }
}
