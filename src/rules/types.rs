use crate::errors::ExtractError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const API_GROUP: &str = "monitoring.coreos.com";
pub const API_VERSION: &str = "monitoring.coreos.com/v1";
pub const KIND: &str = "PrometheusRule";
pub const LIST_KIND: &str = "PrometheusRuleList";

/// Label stamped with the namespace a filtered rule came from.
pub const NAMESPACE_LABEL: &str = "rule-namespace";
/// Label stamped with the group a filtered rule came from.
pub const GROUP_LABEL: &str = "rule-group";

pub type Labels = BTreeMap<String, String>;

/// Whether a rule raises alerts or precomputes a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Alerting,
    Recording,
}

/// Rule expression. Carried through untouched; the CRD allows int or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleExpr {
    Int(i64),
    Text(String),
}

impl Default for RuleExpr {
    fn default() -> Self {
        RuleExpr::Text(String::new())
    }
}

impl From<&str> for RuleExpr {
    fn from(value: &str) -> Self {
        RuleExpr::Text(value.to_string())
    }
}

/// A single alerting or recording rule.
///
/// Exactly one of `alert` and `record` is non-empty; [`Rule::kind`] reports
/// which. Fields other than the name and labels are opaque to extraction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub record: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alert: String,
    #[serde(default)]
    pub expr: RuleExpr,
    #[serde(rename = "for", default, skip_serializing_if = "Option::is_none")]
    pub for_duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_firing_for: Option<String>,
    #[serde(default, skip_serializing_if = "map_is_empty")]
    pub labels: Option<Labels>,
    #[serde(default, skip_serializing_if = "map_is_empty")]
    pub annotations: Option<BTreeMap<String, String>>,
    /// Fields this tool does not interpret
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Rule {
    pub fn alerting(name: impl Into<String>, expr: impl Into<RuleExpr>) -> Self {
        Self {
            alert: name.into(),
            expr: expr.into(),
            ..Default::default()
        }
    }

    pub fn recording(name: impl Into<String>, expr: impl Into<RuleExpr>) -> Self {
        Self {
            record: name.into(),
            expr: expr.into(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels
            .get_or_insert_with(Labels::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn is_alerting(&self) -> bool {
        !self.alert.is_empty()
    }

    pub fn is_recording(&self) -> bool {
        !self.record.is_empty()
    }

    /// Kind of this rule, or `None` if both or neither name is set.
    pub fn kind(&self) -> Option<RuleKind> {
        match (self.is_alerting(), self.is_recording()) {
            (true, false) => Some(RuleKind::Alerting),
            (false, true) => Some(RuleKind::Recording),
            _ => None,
        }
    }

    /// Name of the alert or recorded series.
    pub fn name(&self) -> &str {
        if self.is_alerting() {
            &self.alert
        } else {
            &self.record
        }
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.as_ref()?.get(key).map(String::as_str)
    }
}

impl From<i64> for RuleExpr {
    fn from(value: i64) -> Self {
        RuleExpr::Int(value)
    }
}

impl From<String> for RuleExpr {
    fn from(value: String) -> Self {
        RuleExpr::Text(value)
    }
}

/// A named, ordered collection of rules evaluated together.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuleGroup {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    /// `limit`, `partial_response_strategy`, `query_offset` and anything newer
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RuleGroup {
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            rules,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PrometheusRuleSpec {
    #[serde(default)]
    pub groups: Vec<RuleGroup>,
}

/// A `monitoring.coreos.com/v1` PrometheusRule resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrometheusRule {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMetadata,
    #[serde(default)]
    pub spec: PrometheusRuleSpec,
}

impl PrometheusRule {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        groups: Vec<RuleGroup>,
    ) -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            metadata: ObjectMetadata {
                name: name.into(),
                namespace: namespace.into(),
            },
            spec: PrometheusRuleSpec { groups },
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }

    pub fn groups(&self) -> &[RuleGroup] {
        &self.spec.groups
    }

    /// Check that every rule is either alerting or recording, never both or neither.
    pub fn validate(&self) -> Result<(), ExtractError> {
        for group in self.groups() {
            for (index, rule) in group.rules.iter().enumerate() {
                if rule.kind().is_none() {
                    let reason = if rule.is_alerting() {
                        format!(
                            "rule #{index} sets both alert [{}] and record [{}]",
                            rule.alert, rule.record
                        )
                    } else {
                        format!("rule #{index} sets neither alert nor record")
                    };
                    return Err(ExtractError::InvalidRule {
                        namespace: self.namespace().to_string(),
                        resource: self.name().to_string(),
                        group: group.name.clone(),
                        reason,
                    });
                }
            }
        }
        Ok(())
    }
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_kind() -> String {
    KIND.to_string()
}

fn map_is_empty(map: &Option<BTreeMap<String, String>>) -> bool {
    map.as_ref().is_none_or(BTreeMap::is_empty)
}
