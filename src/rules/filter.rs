//! # Rule Filtering
//!
//! Drops rules by kind and stamps survivors with where they came from.

use super::types::{GROUP_LABEL, Labels, NAMESPACE_LABEL, Rule};
use crate::config::FilterOptions;

/// Filter `rules` by kind, labelling every survivor with its namespace and group.
///
/// When no exclusion is active the rules come back untouched: no copy is
/// made and no labels are added, so callers must pass validated rules.
/// Otherwise rules that are neither alerting nor recording (or both) are
/// dropped too, and each kept rule gets `rule-namespace` and `rule-group`,
/// replacing any value already there.
pub fn filter_rules(
    rules: Vec<Rule>,
    options: FilterOptions,
    namespace: &str,
    group_name: &str,
) -> Vec<Rule> {
    if !options.is_active() {
        return rules;
    }

    rules
        .into_iter()
        .filter(|rule| rule.kind().is_some())
        .filter(|rule| !(options.exclude_alert_rules && rule.is_alerting()))
        .filter(|rule| !(options.exclude_recording_rules && rule.is_recording()))
        .map(|mut rule| {
            let labels = rule.labels.get_or_insert_with(Labels::new);
            labels.insert(NAMESPACE_LABEL.to_string(), namespace.to_string());
            labels.insert(GROUP_LABEL.to_string(), group_name.to_string());
            rule
        })
        .collect()
}
