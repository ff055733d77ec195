//! # Rule Sources
//!
//! Where PrometheusRule resources come from: the cluster API or exported manifests.

pub mod cluster;
pub mod manifest;

pub use cluster::ClusterSource;
pub use manifest::ManifestSource;

use crate::errors::ExtractError;
use crate::rules::PrometheusRule;
use async_trait::async_trait;

/// Bulk listing of every PrometheusRule the run should consider.
#[async_trait]
pub trait RuleSource: Send + Sync {
    /// Fetch all resources across all namespaces.
    ///
    /// Implementations validate each resource so that every returned rule is
    /// either alerting or recording.
    async fn list(&self) -> Result<Vec<PrometheusRule>, ExtractError>;

    /// Human readable description for logs.
    fn describe(&self) -> String;
}

/// Fixed set of resources, mainly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    resources: Vec<PrometheusRule>,
}

impl StaticSource {
    pub fn new(resources: Vec<PrometheusRule>) -> Self {
        Self { resources }
    }
}

#[async_trait]
impl RuleSource for StaticSource {
    async fn list(&self) -> Result<Vec<PrometheusRule>, ExtractError> {
        for resource in &self.resources {
            resource.validate()?;
        }
        Ok(self.resources.clone())
    }

    fn describe(&self) -> String {
        format!("{} in-memory resources", self.resources.len())
    }
}
