//! # repograph
//!
//! Repository knowledge-graph engine: parse a batch of source files into
//! structural summaries, link them into a cross-file dependency and symbol
//! graph, answer architectural queries, and assemble token-budgeted context
//! windows for downstream consumers.
//!
//! ## Key properties
//!
//! - **Batch in, data out**: input is an in-memory list of `(path, content)`
//!   pairs; outputs are plain serializable structures. No I/O, no network.
//! - **Total parsing**: a file that cannot be parsed degrades to an empty
//!   analysis instead of failing the batch.
//! - **Heuristic linking**: call/reference resolution is name-based and
//!   deliberately approximate — unresolved names drop silently.
//! - **Deterministic**: the same batch always produces the same node ids,
//!   edges, and windows.
//!
//! ## Quick start
//!
//! ```rust
//! use repograph::{AnalysisSession, SourceFile};
//!
//! let session = AnalysisSession::build(vec![
//!     SourceFile::new("a.ts", "import { greet } from './b';\nexport function main() { greet(); }\n"),
//!     SourceFile::new("b.ts", "export function greet() {}\n"),
//! ]).unwrap();
//!
//! assert_eq!(session.graph().imports_of("a.ts"), vec!["b.ts"]);
//! let window = session.context().by_query("greet");
//! assert_eq!(window.files[0].path, "b.ts");
//! ```

pub mod context;
pub mod error;
pub mod graph;
pub mod parser;
pub mod symbols;

// Re-exports for convenience
pub use context::{
    ContextAggregator, ContextOptions, ContextWindow, CrossFileReferences, FileContext,
    FileRelationships, TruncationPolicy,
};
pub use error::{EngineError, Result};
pub use graph::{
    ArchitectureMetrics, CodeGraph, CouplingMetrics, GraphSnapshot, GraphStats, ImpactAnalysis,
};
pub use parser::{parse_file, FileAnalysis, Language};
pub use symbols::{SymbolTable, SymbolTableEntry};

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// One input file: repo-relative forward-slash path plus full content.
/// Immutable for the session's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Language derived from the path's extension.
    pub fn language(&self) -> Language {
        Language::from_path(&self.path)
    }
}

/// One fully analyzed batch: the files, their per-file analyses, the
/// dependency graph, and the symbol table.
///
/// The session is caller-owned and self-contained — build one per
/// analysis run, query it, drop it. Nothing persists across sessions.
#[derive(Debug)]
pub struct AnalysisSession {
    files: Vec<SourceFile>,
    by_path: HashMap<String, usize>,
    analyses: Vec<FileAnalysis>,
    graph: CodeGraph,
    symbol_table: SymbolTable,
}

impl AnalysisSession {
    /// Parse every file and fold the batch into one graph plus symbol
    /// table. Per-file parsing runs in parallel; graph construction is
    /// sequential over the complete analysis list.
    ///
    /// Fails only on caller-contract violations — a duplicate or empty
    /// path in the batch. Everything else degrades per file.
    pub fn build(batch: Vec<SourceFile>) -> Result<Self> {
        validate_batch(&batch)?;

        let analyses: Vec<FileAnalysis> = batch
            .par_iter()
            .map(|file| parser::parse_file(&file.path, &file.content))
            .collect();
        let (graph, symbol_table) = graph::builder::build(&analyses);

        let by_path = batch
            .iter()
            .enumerate()
            .map(|(idx, file)| (file.path.clone(), idx))
            .collect();

        info!(
            files = batch.len(),
            symbols = symbol_table.len(),
            "analysis session built"
        );
        Ok(Self {
            files: batch,
            by_path,
            analyses,
            graph,
            symbol_table,
        })
    }

    /// The batch, in input order.
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn file(&self, path: &str) -> Option<&SourceFile> {
        self.by_path.get(path).map(|&idx| &self.files[idx])
    }

    /// Per-file analyses, matching [`Self::files`] order.
    pub fn analyses(&self) -> &[FileAnalysis] {
        &self.analyses
    }

    pub fn analysis(&self, path: &str) -> Option<&FileAnalysis> {
        self.by_path.get(path).map(|&idx| &self.analyses[idx])
    }

    pub fn graph(&self) -> &CodeGraph {
        &self.graph
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.symbol_table
    }

    /// Context aggregator with default options.
    pub fn context(&self) -> ContextAggregator<'_> {
        ContextAggregator::new(self)
    }

    /// Context aggregator with an explicit budget and truncation policy.
    pub fn context_with(&self, options: ContextOptions) -> ContextAggregator<'_> {
        ContextAggregator::with_options(self, options)
    }
}

/// Duplicate and unusable paths are the only conditions that fail a
/// build; an inconsistent graph is worse than no graph.
fn validate_batch(batch: &[SourceFile]) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(batch.len());
    for file in batch {
        if file.path.trim().is_empty() {
            return Err(EngineError::InvalidPath(file.path.clone()));
        }
        if !seen.insert(file.path.as_str()) {
            return Err(EngineError::DuplicatePath(file.path.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_and_query_a_small_batch() {
        let session = AnalysisSession::build(vec![
            SourceFile::new("a.ts", "import { g } from './b';\nexport function f() { g(); }\n"),
            SourceFile::new("b.ts", "export function g() {}\n"),
        ])
        .unwrap();

        assert_eq!(session.files().len(), 2);
        assert_eq!(
            session.file("b.ts").map(|f| f.language()),
            Some(Language::TypeScript)
        );
        assert_eq!(session.analysis("a.ts").map(|a| a.functions.len()), Some(1));
        assert!(session.analysis("missing.ts").is_none());
        assert_eq!(session.graph().imports_of("a.ts"), vec!["b.ts"]);
        assert!(session.symbol_table().get("b.ts", "g").is_some());
    }

    #[test]
    fn duplicate_paths_fail_fast() {
        let err = AnalysisSession::build(vec![
            SourceFile::new("a.ts", "export const x = 1;\n"),
            SourceFile::new("a.ts", "export const y = 2;\n"),
        ])
        .unwrap_err();
        assert!(matches!(err, EngineError::DuplicatePath(path) if path == "a.ts"));
    }

    #[test]
    fn blank_paths_fail_fast() {
        let err = AnalysisSession::build(vec![SourceFile::new("  ", "x")]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPath(_)));
    }

    #[test]
    fn empty_batch_builds_an_empty_session() {
        let session = AnalysisSession::build(Vec::new()).unwrap();
        assert!(session.files().is_empty());
        assert_eq!(session.graph().node_count(), 0);
        assert!(session.symbol_table().is_empty());
        assert!(session.context().by_query("anything").is_empty());
    }
}
