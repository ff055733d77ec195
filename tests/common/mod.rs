// Common test utilities
#![allow(dead_code)]

use promrule_extract::output::{DocumentSink, NamespaceDocument};
use promrule_extract::{ExtractError, PrometheusRule, Rule, RuleGroup};
use std::path::PathBuf;

pub fn resource(namespace: &str, name: &str, groups: Vec<RuleGroup>) -> PrometheusRule {
    PrometheusRule::new(namespace, name, groups)
}

/// One alert and one recording rule in group `g1` of namespace `ns1`.
pub fn mixed_resource() -> PrometheusRule {
    resource(
        "ns1",
        "mixed",
        vec![RuleGroup::new(
            "g1",
            vec![
                Rule::alerting("HighErrorRate", "rate(errors[5m]) > 1").with_label("severity", "page"),
                Rule::recording("job:errors:rate5m", "sum by (job) (rate(errors[5m]))"),
            ],
        )],
    )
}

/// Keeps documents in memory, optionally failing on one namespace.
#[derive(Default)]
pub struct MemorySink {
    pub documents: Vec<NamespaceDocument>,
    pub fail_on: Option<String>,
}

impl DocumentSink for MemorySink {
    fn write(&mut self, document: &NamespaceDocument) -> Result<PathBuf, ExtractError> {
        if self.fail_on.as_deref() == Some(document.namespace.as_str()) {
            return Err(ExtractError::Internal(format!(
                "refusing to write {}",
                document.namespace
            )));
        }
        self.documents.push(document.clone());
        Ok(PathBuf::from(document.file_name()?))
    }
}
