//! Dependency graph module — the structural backbone of the engine.
//!
//! Provides the graph data model, the petgraph-backed engine, the
//! four-pass builder, and read-only architectural analytics.

pub mod analysis;
pub mod builder;
pub mod engine;
pub mod resolver;
pub mod types;

pub use analysis::{ArchitectureMetrics, CouplingMetrics, ImpactAnalysis};
pub use builder::{build_graph, build_symbol_table};
pub use engine::CodeGraph;
pub use resolver::{LexicalResolver, Resolution, SymbolResolver};
pub use types::{
    node_id, EdgeData, EdgeKind, EdgeSnapshot, GraphSnapshot, GraphStats, NodeData, NodeKind,
};
