//! # Namespace Aggregation
//!
//! Folds the groups of many PrometheusRule resources into one bucket per
//! namespace, merging groups that share a name.

use super::filter::filter_rules;
use super::observer::AggregationObserver;
use super::types::{PrometheusRule, RuleGroup};
use crate::config::FilterOptions;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Merged groups of one namespace, keyed by group name.
pub type NamespaceBucket = BTreeMap<String, RuleGroup>;

/// Outcome of inserting a group into a [`RuleIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// First group with this name in the namespace
    Added,
    /// Rules appended to an existing group of the same name
    Merged,
}

/// Namespace → group name → merged group.
///
/// Namespaces and group names iterate in sorted order. Rules inside a merged
/// group keep the order in which they were inserted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleIndex {
    namespaces: BTreeMap<String, NamespaceBucket>,
}

impl RuleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// Number of namespaces holding at least one group.
    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(String::as_str)
    }

    pub fn bucket(&self, namespace: &str) -> Option<&NamespaceBucket> {
        self.namespaces.get(namespace)
    }

    pub fn group(&self, namespace: &str, group: &str) -> Option<&RuleGroup> {
        self.bucket(namespace)?.get(group)
    }

    /// Insert `group` under `namespace`, appending its rules if the name is taken.
    ///
    /// The first group inserted under a name keeps its non-rule fields.
    /// Empty groups must be rejected by the caller; the index never holds one.
    pub fn upsert(&mut self, namespace: &str, group: RuleGroup) -> Upsert {
        let bucket = self.namespaces.entry(namespace.to_string()).or_default();
        match bucket.entry(group.name.clone()) {
            Entry::Occupied(mut existing) => {
                existing.get_mut().rules.extend(group.rules);
                Upsert::Merged
            }
            Entry::Vacant(slot) => {
                slot.insert(group);
                Upsert::Added
            }
        }
    }
}

impl IntoIterator for RuleIndex {
    type Item = (String, NamespaceBucket);
    type IntoIter = std::collections::btree_map::IntoIter<String, NamespaceBucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.namespaces.into_iter()
    }
}

/// Filter and merge the groups of every resource in `sources`.
///
/// Resources are visited in the order given and their groups in declaration
/// order, so a merged group lists earlier resources' rules first. Groups that
/// lose every rule to filtering are dropped, and a namespace with no
/// surviving group is absent from the result.
///
/// Rules are expected to have passed [`PrometheusRule::validate`]; with no
/// exclusion active they are copied through as-is.
pub fn aggregate<'a, I, O>(sources: I, options: FilterOptions, observer: &mut O) -> RuleIndex
where
    I: IntoIterator<Item = &'a PrometheusRule>,
    O: AggregationObserver + ?Sized,
{
    let mut index = RuleIndex::new();

    for resource in sources {
        let namespace = resource.namespace();
        for group in resource.groups() {
            observer.group_processed(namespace, &group.name);

            let mut filtered = group.clone();
            filtered.rules = filter_rules(
                std::mem::take(&mut filtered.rules),
                options,
                namespace,
                &group.name,
            );
            if filtered.rules.is_empty() {
                observer.group_skipped(namespace, &group.name);
                continue;
            }

            let count = filtered.rules.len();
            match index.upsert(namespace, filtered) {
                Upsert::Added => observer.group_added(namespace, &group.name, count),
                Upsert::Merged => observer.group_merged(namespace, &group.name, count),
            }
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::observer::NoopObserver;
    use crate::rules::types::{GROUP_LABEL, NAMESPACE_LABEL, Rule};

    #[derive(Default)]
    struct EventLog(Vec<String>);

    impl AggregationObserver for EventLog {
        fn group_processed(&mut self, namespace: &str, group: &str) {
            self.0.push(format!("processed {namespace}/{group}"));
        }
        fn group_skipped(&mut self, namespace: &str, group: &str) {
            self.0.push(format!("skipped {namespace}/{group}"));
        }
        fn group_added(&mut self, namespace: &str, group: &str, rules: usize) {
            self.0.push(format!("added {namespace}/{group} {rules}"));
        }
        fn group_merged(&mut self, namespace: &str, group: &str, rules: usize) {
            self.0.push(format!("merged {namespace}/{group} {rules}"));
        }
    }

    fn resource(namespace: &str, name: &str, groups: Vec<RuleGroup>) -> PrometheusRule {
        PrometheusRule::new(namespace, name, groups)
    }

    fn names(group: &RuleGroup) -> Vec<&str> {
        group.rules.iter().map(Rule::name).collect()
    }

    #[test]
    fn test_empty_input_yields_empty_index() {
        let sources: Vec<PrometheusRule> = Vec::new();
        let index = aggregate(&sources, FilterOptions::default(), &mut NoopObserver);
        assert!(index.is_empty());
    }

    #[test]
    fn test_both_kinds_kept_without_labels() {
        let sources = vec![resource(
            "ns1",
            "r1",
            vec![RuleGroup::new(
                "g1",
                vec![Rule::alerting("A", "up == 0"), Rule::recording("r:sum", "sum(x)")],
            )],
        )];
        let index = aggregate(&sources, FilterOptions::default(), &mut NoopObserver);

        let group = index.group("ns1", "g1").unwrap();
        assert_eq!(names(group), vec!["A", "r:sum"]);
        assert!(group.rules.iter().all(|r| r.labels.is_none()));
    }

    #[test]
    fn test_exclude_alerts_labels_remaining_rules() {
        let sources = vec![resource(
            "ns1",
            "r1",
            vec![RuleGroup::new(
                "g1",
                vec![Rule::alerting("A", "up == 0"), Rule::recording("r:sum", "sum(x)")],
            )],
        )];
        let index = aggregate(&sources, FilterOptions::new(true, false), &mut NoopObserver);

        let group = index.group("ns1", "g1").unwrap();
        assert_eq!(names(group), vec!["r:sum"]);
        assert_eq!(group.rules[0].label(NAMESPACE_LABEL), Some("ns1"));
        assert_eq!(group.rules[0].label(GROUP_LABEL), Some("g1"));
    }

    #[test]
    fn test_same_group_across_resources_is_concatenated_in_source_order() {
        let a = resource("ns1", "a", vec![RuleGroup::new("g1", vec![Rule::alerting("FromA", "1")])]);
        let b = resource("ns1", "b", vec![RuleGroup::new("g1", vec![Rule::alerting("FromB", "1")])]);

        let ab = aggregate([&a, &b], FilterOptions::default(), &mut NoopObserver);
        assert_eq!(names(ab.group("ns1", "g1").unwrap()), vec!["FromA", "FromB"]);

        let ba = aggregate([&b, &a], FilterOptions::default(), &mut NoopObserver);
        assert_eq!(names(ba.group("ns1", "g1").unwrap()), vec!["FromB", "FromA"]);
    }

    #[test]
    fn test_fully_filtered_group_produces_no_namespace() {
        let sources = vec![resource(
            "ns1",
            "r1",
            vec![RuleGroup::new("g1", vec![Rule::alerting("A", "1")])],
        )];
        let mut log = EventLog::default();
        let index = aggregate(&sources, FilterOptions::new(true, false), &mut log);

        assert!(index.is_empty());
        assert_eq!(log.0, vec!["processed ns1/g1", "skipped ns1/g1"]);
    }

    #[test]
    fn test_bucket_paths_new_namespace_new_group_repeated_group() {
        let first = resource(
            "ns1",
            "first",
            vec![RuleGroup::new("g1", vec![Rule::recording("one", "1")])],
        );
        let second = resource(
            "ns1",
            "second",
            vec![
                RuleGroup::new("g2", vec![Rule::recording("two", "2")]),
                RuleGroup::new("g1", vec![Rule::recording("three", "3")]),
            ],
        );
        let other = resource(
            "ns2",
            "other",
            vec![RuleGroup::new("g1", vec![Rule::recording("four", "4")])],
        );

        let mut log = EventLog::default();
        let index = aggregate([&first, &second, &other], FilterOptions::default(), &mut log);

        assert_eq!(
            log.0,
            vec![
                "processed ns1/g1",
                "added ns1/g1 1",
                "processed ns1/g2",
                "added ns1/g2 1",
                "processed ns1/g1",
                "merged ns1/g1 1",
                "processed ns2/g1",
                "added ns2/g1 1",
            ]
        );
        assert_eq!(index.len(), 2);
        assert_eq!(names(index.group("ns1", "g1").unwrap()), vec!["one", "three"]);
        assert_eq!(names(index.group("ns1", "g2").unwrap()), vec!["two"]);
        assert_eq!(names(index.group("ns2", "g1").unwrap()), vec!["four"]);
    }

    #[test]
    fn test_namespace_with_only_empty_groups_is_absent() {
        let kept = resource("kept", "r", vec![RuleGroup::new("g", vec![Rule::recording("r", "1")])]);
        let dropped = resource(
            "dropped",
            "r",
            vec![
                RuleGroup::new("g1", vec![Rule::alerting("A", "1")]),
                RuleGroup::new("g2", vec![]),
            ],
        );
        let index = aggregate([&kept, &dropped], FilterOptions::new(true, false), &mut NoopObserver);

        assert_eq!(index.namespaces().collect::<Vec<_>>(), vec!["kept"]);
    }

    #[test]
    fn test_merge_keeps_first_group_settings() {
        let mut first = RuleGroup::new("g", vec![Rule::recording("a", "1")]);
        first.interval = Some("30s".to_string());
        let mut second = RuleGroup::new("g", vec![Rule::recording("b", "1")]);
        second.interval = Some("1m".to_string());

        let a = resource("ns", "a", vec![first]);
        let b = resource("ns", "b", vec![second]);
        let index = aggregate([&a, &b], FilterOptions::default(), &mut NoopObserver);

        let group = index.group("ns", "g").unwrap();
        assert_eq!(group.interval.as_deref(), Some("30s"));
        assert_eq!(names(group), vec!["a", "b"]);
    }

    #[test]
    fn test_merged_group_keeps_settings_and_filtered_rules() {
        let mut group = RuleGroup::new("g", vec![Rule::alerting("A", "1"), Rule::recording("b", "1")]);
        group.interval = Some("15s".to_string());
        group.extra.insert("limit".to_string(), serde_json::json!(5));
        let sources = vec![resource("ns", "r", vec![group])];

        let index = aggregate(&sources, FilterOptions::new(true, false), &mut NoopObserver);

        let merged = index.group("ns", "g").unwrap();
        assert_eq!(names(merged), vec!["b"]);
        assert_eq!(merged.interval.as_deref(), Some("15s"));
        assert_eq!(merged.extra.get("limit"), Some(&serde_json::json!(5)));
    }

    #[test]
    fn test_sources_are_not_mutated() {
        let sources = vec![resource(
            "ns",
            "r",
            vec![RuleGroup::new("g", vec![Rule::recording("a", "1")])],
        )];
        let before = sources.clone();
        let _ = aggregate(&sources, FilterOptions::new(true, false), &mut NoopObserver);
        assert_eq!(sources, before);
    }
}
