//! Graph data model: typed nodes, weighted edges, and the plain snapshot
//! shape handed to consumers.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::parser::{Language, Span, SymbolKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Function,
    Class,
    Variable,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Function => "function",
            NodeKind::Class => "class",
            NodeKind::Variable => "variable",
        }
    }
}

impl From<SymbolKind> for NodeKind {
    fn from(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Function => NodeKind::Function,
            SymbolKind::Class => NodeKind::Class,
            SymbolKind::Variable => NodeKind::Variable,
        }
    }
}

/// Deterministic node id: `kind:path` for files, `kind:path:name` for
/// symbols. Identical batches produce identical ids.
pub fn node_id(kind: NodeKind, path: &str, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{}:{}:{}", kind.as_str(), path, name),
        None => format!("{}:{}", kind.as_str(), path),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeData {
    pub id: String,
    pub kind: NodeKind,
    /// Owning file path; for file nodes, the path itself.
    pub path: String,
    /// Symbol name; absent on file nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Cyclomatic estimate; function nodes only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<u32>,
}

impl NodeData {
    pub fn file(path: &str, language: Language) -> Self {
        Self {
            id: node_id(NodeKind::File, path, None),
            kind: NodeKind::File,
            path: path.to_string(),
            name: None,
            language: Some(language),
            span: None,
            complexity: None,
        }
    }

    pub fn symbol(
        kind: NodeKind,
        path: &str,
        name: &str,
        span: Span,
        complexity: Option<u32>,
    ) -> Self {
        Self {
            id: node_id(kind, path, Some(name)),
            kind,
            path: path.to_string(),
            name: Some(name.to_string()),
            language: None,
            span: Some(span),
            complexity,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// File depends on file.
    Imports,
    /// Symbol invokes symbol.
    Calls,
    /// Class inherits from class.
    Extends,
    /// Symbol mentions symbol without calling it.
    References,
    /// File defines symbol.
    Exports,
}

impl EdgeKind {
    /// Relationship strength used by traversal scoring. References are
    /// weaker than structural edges.
    pub fn weight(self) -> f32 {
        match self {
            EdgeKind::References => 0.5,
            _ => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EdgeKind::Imports => "imports",
            EdgeKind::Calls => "calls",
            EdgeKind::Extends => "extends",
            EdgeKind::References => "references",
            EdgeKind::Exports => "exports",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeData {
    pub kind: EdgeKind,
    pub weight: f32,
}

impl EdgeData {
    pub fn new(kind: EdgeKind) -> Self {
        Self {
            kind,
            weight: kind.weight(),
        }
    }
}

/// One edge in a [`GraphSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeSnapshot {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
    pub weight: f32,
}

/// Plain-data view of the whole graph. Nodes and adjacency are sorted by
/// id, edges keep insertion order, so two builds of the same batch
/// serialize identically.
#[derive(Debug, Clone, Serialize)]
pub struct GraphSnapshot {
    pub nodes: BTreeMap<String, NodeData>,
    pub edges: Vec<EdgeSnapshot>,
    pub adjacency: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub file_count: usize,
    pub symbol_count: usize,
    pub unique_symbol_names: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_ids_are_deterministic() {
        assert_eq!(
            node_id(NodeKind::File, "src/a.ts", None),
            "file:src/a.ts"
        );
        assert_eq!(
            node_id(NodeKind::Function, "src/a.ts", Some("run")),
            "function:src/a.ts:run"
        );
    }

    #[test]
    fn reference_edges_are_weaker() {
        assert_eq!(EdgeData::new(EdgeKind::References).weight, 0.5);
        assert_eq!(EdgeData::new(EdgeKind::Calls).weight, 1.0);
        assert_eq!(EdgeData::new(EdgeKind::Imports).weight, 1.0);
    }
}
