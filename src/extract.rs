//! # Extraction Pipeline
//!
//! Lists resources, merges them per namespace and writes one document for each.

use crate::config::FilterOptions;
use crate::errors::ExtractError;
use crate::output::{DocumentSink, NamespaceDocument};
use crate::rules::{AggregationObserver, RuleIndex, TracingObserver, aggregate};
use crate::source::RuleSource;
use std::path::PathBuf;
use tracing::info;

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Resources returned by the source
    pub resources: usize,
    /// Documents written, one per namespace
    pub namespaces: usize,
    /// Groups written across all documents
    pub groups: usize,
    /// Locations reported by the sink, in namespace order
    pub written: Vec<PathBuf>,
}

pub struct Extractor<O: AggregationObserver = TracingObserver> {
    options: FilterOptions,
    observer: O,
}

impl Extractor<TracingObserver> {
    pub fn new(options: FilterOptions) -> Self {
        Self::with_observer(options, TracingObserver)
    }
}

impl<O: AggregationObserver> Extractor<O> {
    pub fn with_observer(options: FilterOptions, observer: O) -> Self {
        Self { options, observer }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Fetch from `source` and merge, without writing anything.
    pub async fn collect(
        &mut self,
        source: &dyn RuleSource,
    ) -> Result<(usize, RuleIndex), ExtractError> {
        let resources = source.list().await?;
        info!(
            "found [{}] PrometheusRule resources in {}",
            resources.len(),
            source.describe()
        );
        let index = aggregate(&resources, self.options, &mut self.observer);
        Ok((resources.len(), index))
    }

    /// Run the whole pipeline.
    ///
    /// Stops at the first failed write; documents already written stay in place.
    pub async fn run(
        &mut self,
        source: &dyn RuleSource,
        sink: &mut dyn DocumentSink,
    ) -> Result<ExtractSummary, ExtractError> {
        let (resources, index) = self.collect(source).await?;
        let mut summary = ExtractSummary {
            resources,
            ..Default::default()
        };

        for (namespace, bucket) in index {
            let document = NamespaceDocument::new(namespace, bucket);
            let location = sink.write(&document)?;
            summary.namespaces += 1;
            summary.groups += document.groups.len();
            summary.written.push(location);
        }

        Ok(summary)
    }
}
