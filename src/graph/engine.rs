//! The in-memory code graph.
//!
//! Petgraph holds the topology; side indexes map deterministic string ids,
//! file paths, and `(path, name)` symbol pairs back to node indices so
//! queries never scan the whole graph.

use std::collections::{BTreeMap, HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::parser::{Language, Span};

use super::types::{
    EdgeData, EdgeKind, EdgeSnapshot, GraphSnapshot, GraphStats, NodeData, NodeKind,
};

#[derive(Debug, Default)]
pub struct CodeGraph {
    pub(crate) graph: DiGraph<NodeData, EdgeData>,
    pub(crate) id_index: HashMap<String, NodeIndex>,
    pub(crate) file_index: HashMap<String, NodeIndex>,
    pub(crate) symbol_index: HashMap<(String, String), NodeIndex>,
}

impl CodeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Construction ───

    /// Add a file node, reusing the existing node on repeat adds.
    pub(crate) fn add_file(&mut self, path: &str, language: Language) -> NodeIndex {
        if let Some(&idx) = self.file_index.get(path) {
            return idx;
        }
        let data = NodeData::file(path, language);
        let id = data.id.clone();
        let idx = self.graph.add_node(data);
        self.id_index.insert(id, idx);
        self.file_index.insert(path.to_string(), idx);
        idx
    }

    /// Add a symbol node. The first `(path, name)` definition wins and
    /// repeat adds return it unchanged.
    pub(crate) fn add_symbol(
        &mut self,
        kind: NodeKind,
        path: &str,
        name: &str,
        span: Span,
        complexity: Option<u32>,
    ) -> NodeIndex {
        let key = (path.to_string(), name.to_string());
        if let Some(&idx) = self.symbol_index.get(&key) {
            return idx;
        }
        let data = NodeData::symbol(kind, path, name, span, complexity);
        let id = data.id.clone();
        let idx = self.graph.add_node(data);
        self.id_index.insert(id, idx);
        self.symbol_index.insert(key, idx);
        idx
    }

    pub(crate) fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, kind: EdgeKind) {
        self.graph.add_edge(from, to, EdgeData::new(kind));
    }

    pub(crate) fn file_idx(&self, path: &str) -> Option<NodeIndex> {
        self.file_index.get(path).copied()
    }

    pub(crate) fn symbol_idx(&self, path: &str, name: &str) -> Option<NodeIndex> {
        self.symbol_index
            .get(&(path.to_string(), name.to_string()))
            .copied()
    }

    // ─── Lookup ───

    pub fn node(&self, id: &str) -> Option<&NodeData> {
        self.id_index.get(id).map(|&idx| &self.graph[idx])
    }

    pub fn symbol_node(&self, path: &str, name: &str) -> Option<&NodeData> {
        self.symbol_idx(path, name).map(|idx| &self.graph[idx])
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// File nodes in insertion order, which follows batch input order.
    pub fn files(&self) -> Vec<&NodeData> {
        self.graph
            .node_indices()
            .map(|idx| &self.graph[idx])
            .filter(|node| node.is_file())
            .collect()
    }

    /// Symbol nodes of one file, in definition order.
    pub fn symbols_in_file(&self, path: &str) -> Vec<&NodeData> {
        self.graph
            .node_indices()
            .map(|idx| &self.graph[idx])
            .filter(|node| !node.is_file() && node.path == path)
            .collect()
    }

    // ─── File dependency walks ───

    /// Paths of files this file imports, in edge insertion order.
    pub fn imports_of(&self, path: &str) -> Vec<String> {
        self.file_neighbors(path, Direction::Outgoing)
    }

    /// Paths of files importing this file, in edge insertion order.
    pub fn importers_of(&self, path: &str) -> Vec<String> {
        self.file_neighbors(path, Direction::Incoming)
    }

    fn file_neighbors(&self, path: &str, direction: Direction) -> Vec<String> {
        let Some(idx) = self.file_idx(path) else {
            return Vec::new();
        };
        let mut paths: Vec<String> = self
            .graph
            .edges_directed(idx, direction)
            .filter(|edge| edge.weight().kind == EdgeKind::Imports)
            .map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                self.graph[other].path.clone()
            })
            .collect();
        // petgraph yields most-recent-first; present in insertion order
        paths.reverse();
        paths
    }

    // ─── Aggregates ───

    pub fn stats(&self) -> GraphStats {
        let mut file_count = 0;
        let mut symbol_count = 0;
        let mut names = HashSet::new();

        for node in self.graph.node_weights() {
            if node.is_file() {
                file_count += 1;
            } else {
                symbol_count += 1;
                if let Some(name) = &node.name {
                    names.insert(name.as_str());
                }
            }
        }

        GraphStats {
            total_nodes: file_count + symbol_count,
            total_edges: self.graph.edge_count(),
            file_count,
            symbol_count,
            unique_symbol_names: names.len(),
        }
    }

    /// Detach a plain-data snapshot of the whole graph.
    pub fn snapshot(&self) -> GraphSnapshot {
        let nodes: BTreeMap<String, NodeData> = self
            .graph
            .node_weights()
            .map(|node| (node.id.clone(), node.clone()))
            .collect();

        let edges: Vec<EdgeSnapshot> = self
            .graph
            .edge_references()
            .map(|edge| EdgeSnapshot {
                from: self.graph[edge.source()].id.clone(),
                to: self.graph[edge.target()].id.clone(),
                kind: edge.weight().kind,
                weight: edge.weight().weight,
            })
            .collect();

        let mut adjacency: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for edge in &edges {
            adjacency
                .entry(edge.from.clone())
                .or_default()
                .push(edge.to.clone());
        }

        GraphSnapshot {
            nodes,
            edges,
            adjacency,
        }
    }
}
