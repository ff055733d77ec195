//! Reads PrometheusRule resources from exported manifests, e.g. the output of
//! `kubectl get prometheusrules -A -o yaml`.

use super::RuleSource;
use crate::errors::ExtractError;
use crate::rules::{KIND, LIST_KIND, PrometheusRule};
use async_trait::async_trait;
use serde::Deserialize;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Namespace assumed for resources exported without one.
const DEFAULT_NAMESPACE: &str = "default";

/// A manifest file, or a directory walked recursively for `.yaml`, `.yml` and `.json` files.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    path: PathBuf,
}

impl ManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load every resource under the configured path.
    ///
    /// Directory entries are visited in file name order.
    pub fn load(&self) -> Result<Vec<PrometheusRule>, ExtractError> {
        if !self.path.exists() {
            return Err(ExtractError::FileNotFound(self.path.clone()));
        }

        if self.path.is_file() {
            return load_file(&self.path);
        }

        let mut resources = Vec::new();
        for entry in WalkDir::new(&self.path).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type().is_file() && is_manifest(path) {
                resources.extend(load_file(path)?);
            }
        }
        Ok(resources)
    }
}

#[async_trait]
impl RuleSource for ManifestSource {
    async fn list(&self) -> Result<Vec<PrometheusRule>, ExtractError> {
        self.load()
    }

    fn describe(&self) -> String {
        format!("manifests at {}", self.path.display())
    }
}

fn is_manifest(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml") | Some("json")
    )
}

fn load_file(path: &Path) -> Result<Vec<PrometheusRule>, ExtractError> {
    let content = fs::read_to_string(path)?;
    let resources = parse_manifests(&content)?;
    debug!(
        "loaded [{}] PrometheusRule resources from [{}]",
        resources.len(),
        path.display()
    );
    Ok(resources)
}

/// Parse a (possibly multi-document) YAML or JSON stream.
///
/// Accepts single `PrometheusRule` objects, `PrometheusRuleList` and generic
/// `List` wrappers. Objects of any other kind are skipped.
pub fn parse_manifests(content: &str) -> Result<Vec<PrometheusRule>, ExtractError> {
    let mut resources = Vec::new();
    for document in serde_yaml::Deserializer::from_str(content) {
        let value = Value::deserialize(document)?;
        collect_resources(value, false, &mut resources)?;
    }
    Ok(resources)
}

fn collect_resources(
    value: Value,
    in_rule_list: bool,
    resources: &mut Vec<PrometheusRule>,
) -> Result<(), ExtractError> {
    if value.is_null() {
        return Ok(());
    }

    let kind = value.get("kind").and_then(Value::as_str).map(str::to_owned);
    match kind.as_deref() {
        Some(KIND) => resources.push(into_resource(value)?),
        // Items of a typed list come back from the API server without a kind
        None if in_rule_list => resources.push(into_resource(value)?),
        Some(list_kind @ (LIST_KIND | "List")) => {
            let typed = list_kind == LIST_KIND;
            if let Some(Value::Sequence(items)) = value.get("items").cloned() {
                for item in items {
                    collect_resources(item, typed, resources)?;
                }
            }
        }
        other => debug!("skipping manifest of kind [{}]", other.unwrap_or("<none>")),
    }
    Ok(())
}

fn into_resource(value: Value) -> Result<PrometheusRule, ExtractError> {
    let mut resource: PrometheusRule = serde_yaml::from_value(value)?;
    if resource.metadata.namespace.is_empty() {
        resource.metadata.namespace = DEFAULT_NAMESPACE.to_string();
    }
    resource.validate()?;
    Ok(resource)
}
