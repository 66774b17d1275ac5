//! Context aggregation — relevance-ranked, token-budgeted windows over
//! the analyzed repository.

pub mod aggregator;
pub mod tokens;

pub use aggregator::{
    ContextAggregator, ContextOptions, ContextWindow, CrossFileReferences, FileContext,
    FileRelationships, ReferenceLine, TruncationPolicy,
};
pub use tokens::{estimate_tokens, query_terms};
