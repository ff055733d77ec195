use tracing::info;

/// Hooks called by [`aggregate`](super::aggregate::aggregate) as it folds groups.
///
/// All methods default to doing nothing so implementors only override what
/// they care about.
pub trait AggregationObserver {
    /// A group is about to be filtered.
    fn group_processed(&mut self, _namespace: &str, _group: &str) {}

    /// A group had no rules left after filtering and was dropped.
    fn group_skipped(&mut self, _namespace: &str, _group: &str) {}

    /// A group name was seen for the first time in its namespace.
    fn group_added(&mut self, _namespace: &str, _group: &str, _rules: usize) {}

    /// Rules were appended to a group already present in the namespace.
    fn group_merged(&mut self, _namespace: &str, _group: &str, _rules: usize) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl AggregationObserver for NoopObserver {}

/// Observer that reports progress through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl AggregationObserver for TracingObserver {
    fn group_processed(&mut self, namespace: &str, group: &str) {
        info!(namespace = %namespace, "processing [{group}] group");
    }

    fn group_skipped(&mut self, namespace: &str, group: &str) {
        info!(
            namespace = %namespace,
            "no rules are left in [{group}] group after filtering; skipping"
        );
    }

    fn group_added(&mut self, namespace: &str, group: &str, rules: usize) {
        info!("[{group}] group with [{rules}] rules is added to [{namespace}] namespace");
    }

    fn group_merged(&mut self, namespace: &str, group: &str, rules: usize) {
        info!("[{rules}] rules are merged into [{group}] group of [{namespace}] namespace");
    }
}
