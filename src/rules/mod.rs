pub mod types;
pub mod filter;
pub mod observer;
pub mod aggregate;

// Re-export commonly used types
pub use types::*;
pub use filter::filter_rules;
pub use observer::{AggregationObserver, NoopObserver, TracingObserver};
pub use aggregate::{NamespaceBucket, RuleIndex, Upsert, aggregate};
