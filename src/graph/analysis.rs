//! Read-only architectural analytics over a built graph.
//!
//! All walks here follow `Imports` edges between file nodes only. Symbol
//! edges never participate, so metrics stay stable regardless of how much
//! symbol detail the parsers extracted.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;

use super::engine::CodeGraph;
use super::types::{EdgeKind, NodeKind};

/// Files affected when the target file changes, split by distance.
#[derive(Debug, Clone, Serialize)]
pub struct ImpactAnalysis {
    pub target: String,
    /// Files importing the target directly.
    pub direct_impact: Vec<String>,
    /// Files reaching the target through one or more intermediaries.
    pub indirect_impact: Vec<String>,
    pub total_impact: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CouplingMetrics {
    /// Incoming dependencies: how many files import this one.
    pub afferent: usize,
    /// Outgoing dependencies: how many files this one imports.
    pub efferent: usize,
    /// `efferent / (afferent + efferent)`, zero for isolated files.
    pub instability: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArchitectureMetrics {
    pub total_files: usize,
    pub total_functions: usize,
    pub total_classes: usize,
    pub average_complexity: f64,
    /// Longest import chain in the repository, counted in edges.
    pub max_dependency_depth: usize,
    pub circular_dependency_count: usize,
}

impl CodeGraph {
    /// Import cycles among files. Each cycle lists the participating
    /// paths in walk order. Detection is single-pass: a component already
    /// visited from an earlier root is not re-entered, so overlapping
    /// cycles report once per DFS discovery.
    pub fn find_circular_dependencies(&self) -> Vec<Vec<String>> {
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut cycles: Vec<Vec<String>> = Vec::new();

        let roots: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&idx| self.graph[idx].is_file())
            .collect();
        for root in roots {
            if !visited.contains(&root) {
                let mut stack = Vec::new();
                let mut on_stack = HashSet::new();
                self.cycle_dfs(root, &mut visited, &mut stack, &mut on_stack, &mut cycles);
            }
        }
        cycles
    }

    fn cycle_dfs(
        &self,
        node: NodeIndex,
        visited: &mut HashSet<NodeIndex>,
        stack: &mut Vec<NodeIndex>,
        on_stack: &mut HashSet<NodeIndex>,
        cycles: &mut Vec<Vec<String>>,
    ) {
        visited.insert(node);
        stack.push(node);
        on_stack.insert(node);

        for neighbor in self.import_neighbors(node, Direction::Outgoing) {
            if on_stack.contains(&neighbor) {
                // Back edge: the stack suffix from the neighbor is a cycle.
                if let Some(pos) = stack.iter().position(|&n| n == neighbor) {
                    let cycle = stack[pos..]
                        .iter()
                        .map(|&n| self.graph[n].path.clone())
                        .collect();
                    cycles.push(cycle);
                }
            } else if !visited.contains(&neighbor) {
                self.cycle_dfs(neighbor, visited, stack, on_stack, cycles);
            }
        }

        stack.pop();
        on_stack.remove(&node);
    }

    /// Breadth-first walk of reverse imports from `path`. Every affected
    /// file is classified at its shallowest depth.
    pub fn impact_analysis(&self, path: &str) -> ImpactAnalysis {
        let mut direct = Vec::new();
        let mut indirect = Vec::new();

        if let Some(start) = self.file_idx(path) {
            let mut depths: HashMap<NodeIndex, usize> = HashMap::new();
            let mut queue = VecDeque::new();
            depths.insert(start, 0);
            queue.push_back(start);

            while let Some(node) = queue.pop_front() {
                let depth = depths[&node];
                for importer in self.import_neighbors(node, Direction::Incoming) {
                    if depths.contains_key(&importer) {
                        continue;
                    }
                    depths.insert(importer, depth + 1);
                    queue.push_back(importer);
                    let importer_path = self.graph[importer].path.clone();
                    if depth + 1 == 1 {
                        direct.push(importer_path);
                    } else {
                        indirect.push(importer_path);
                    }
                }
            }
        }

        let total_impact = direct.len() + indirect.len();
        ImpactAnalysis {
            target: path.to_string(),
            direct_impact: direct,
            indirect_impact: indirect,
            total_impact,
        }
    }

    pub fn file_coupling(&self, path: &str) -> CouplingMetrics {
        let afferent = self.importers_of(path).len();
        let efferent = self.imports_of(path).len();
        let instability = if afferent + efferent == 0 {
            0.0
        } else {
            efferent as f64 / (afferent + efferent) as f64
        };
        CouplingMetrics {
            afferent,
            efferent,
            instability,
        }
    }

    pub fn architecture_metrics(&self) -> ArchitectureMetrics {
        let mut total_files = 0;
        let mut total_functions = 0;
        let mut total_classes = 0;
        let mut complexity_sum = 0u64;

        for node in self.graph.node_weights() {
            match node.kind {
                NodeKind::File => total_files += 1,
                NodeKind::Function => {
                    total_functions += 1;
                    complexity_sum += u64::from(node.complexity.unwrap_or(1));
                }
                NodeKind::Class => total_classes += 1,
                NodeKind::Variable => {}
            }
        }
        let average_complexity = if total_functions == 0 {
            0.0
        } else {
            complexity_sum as f64 / total_functions as f64
        };

        let max_dependency_depth = self
            .graph
            .node_indices()
            .filter(|&idx| self.graph[idx].is_file())
            .map(|idx| {
                let mut visited = HashSet::new();
                self.chain_depth(idx, &mut visited)
            })
            .max()
            .unwrap_or(0);

        ArchitectureMetrics {
            total_files,
            total_functions,
            total_classes,
            average_complexity,
            max_dependency_depth,
            circular_dependency_count: self.find_circular_dependencies().len(),
        }
    }

    fn chain_depth(&self, node: NodeIndex, visited: &mut HashSet<NodeIndex>) -> usize {
        visited.insert(node);
        let mut deepest = 0;
        for neighbor in self.import_neighbors(node, Direction::Outgoing) {
            if !visited.contains(&neighbor) {
                deepest = deepest.max(1 + self.chain_depth(neighbor, visited));
            }
        }
        deepest
    }

    /// Import-edge neighbors in edge insertion order.
    fn import_neighbors(&self, node: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> = self
            .graph
            .edges_directed(node, direction)
            .filter(|edge| edge.weight().kind == EdgeKind::Imports)
            .map(|edge| match direction {
                Direction::Outgoing => edge.target(),
                Direction::Incoming => edge.source(),
            })
            .collect();
        neighbors.reverse();
        neighbors
    }
}
