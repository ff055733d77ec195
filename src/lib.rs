pub mod config;
pub mod errors;
pub mod extract;
pub mod output;
pub mod rules;
pub mod source;

// Re-export commonly used types
pub use config::{ExtractConfig, FilterOptions, SourceConfig};
pub use errors::ExtractError;
pub use extract::{ExtractSummary, Extractor};
pub use rules::types::*;
