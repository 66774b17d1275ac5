//! Four-pass graph construction over a batch of file analyses.
//!
//! Pass order matters: every node exists before any edge is attached, and
//! import resolution feeds the name resolver used by the later passes.
//! Unresolved imports, callees, and superclasses drop silently — partial
//! knowledge of a repository is the normal case, not an error.

use std::collections::{HashMap, HashSet};

use petgraph::graph::NodeIndex;
use tracing::{debug, info};

use crate::parser::{FileAnalysis, FunctionInfo, SymbolKind};
use crate::symbols::{SymbolKey, SymbolTable};

use super::engine::CodeGraph;
use super::resolver::{resolve_import, LexicalResolver, SymbolResolver};
use super::types::{EdgeKind, NodeKind};

/// Build only the graph.
pub fn build_graph(analyses: &[FileAnalysis]) -> CodeGraph {
    build(analyses).0
}

/// Build only the symbol table.
pub fn build_symbol_table(analyses: &[FileAnalysis]) -> SymbolTable {
    build(analyses).1
}

pub(crate) fn build(analyses: &[FileAnalysis]) -> (CodeGraph, SymbolTable) {
    let mut state = BuildState::default();

    state.add_nodes(analyses);
    let resolved_imports = state.add_import_edges(analyses);
    state.add_usage_edges(analyses, &resolved_imports);
    state.add_inheritance_edges(analyses, &resolved_imports);

    info!(
        nodes = state.graph.node_count(),
        edges = state.graph.edge_count(),
        symbols = state.table.len(),
        "graph build complete"
    );
    (state.graph, state.table)
}

#[derive(Default)]
struct BuildState {
    graph: CodeGraph,
    table: SymbolTable,
    seen_edges: HashSet<(NodeIndex, NodeIndex, EdgeKind)>,
}

/// A resolved call or reference waiting to be applied, queued so table
/// mutation happens after the resolver's borrow ends.
struct PendingUse {
    from: NodeIndex,
    key: SymbolKey,
    kind: EdgeKind,
    line: usize,
    user: String,
    via_import: bool,
}

impl BuildState {
    /// Add an edge unless the same `(from, to, kind)` triple exists.
    fn edge(&mut self, from: NodeIndex, to: NodeIndex, kind: EdgeKind) {
        if self.seen_edges.insert((from, to, kind)) {
            self.graph.add_edge(from, to, kind);
        }
    }

    // ─── Pass 1: nodes and symbol table entries ───

    fn add_nodes(&mut self, analyses: &[FileAnalysis]) {
        for analysis in analyses {
            let file_idx = self.graph.add_file(&analysis.path, analysis.language);

            for func in &analysis.functions {
                let idx = self.graph.add_symbol(
                    NodeKind::Function,
                    &analysis.path,
                    &func.name,
                    func.span,
                    Some(func.complexity),
                );
                self.edge(file_idx, idx, EdgeKind::Exports);
                self.table.insert(
                    &analysis.path,
                    &func.name,
                    SymbolKind::Function,
                    func.scope,
                );
            }
            for class in &analysis.classes {
                let idx = self.graph.add_symbol(
                    NodeKind::Class,
                    &analysis.path,
                    &class.name,
                    class.span,
                    None,
                );
                self.edge(file_idx, idx, EdgeKind::Exports);
                self.table.insert(
                    &analysis.path,
                    &class.name,
                    SymbolKind::Class,
                    class.scope,
                );
            }
            for var in &analysis.variables {
                let idx = self.graph.add_symbol(
                    NodeKind::Variable,
                    &analysis.path,
                    &var.name,
                    var.span,
                    None,
                );
                self.edge(file_idx, idx, EdgeKind::Exports);
                self.table.insert(
                    &analysis.path,
                    &var.name,
                    SymbolKind::Variable,
                    var.scope,
                );
            }
        }
        debug!(files = analyses.len(), "node pass complete");
    }

    // ─── Pass 2: import edges ───

    /// Returns the resolved internal import targets per file, in import
    /// declaration order, for the name resolver.
    fn add_import_edges(&mut self, analyses: &[FileAnalysis]) -> HashMap<String, Vec<String>> {
        let known: HashSet<String> = analyses.iter().map(|a| a.path.clone()).collect();
        let mut resolved_by_file: HashMap<String, Vec<String>> = HashMap::new();
        let mut dropped = 0usize;

        for analysis in analyses {
            let Some(file_idx) = self.graph.file_idx(&analysis.path) else {
                continue;
            };
            for import in &analysis.imports {
                if import.external {
                    continue;
                }
                let Some(target) = resolve_import(&analysis.path, &import.specifier, &known)
                else {
                    dropped += 1;
                    continue;
                };
                let Some(target_idx) = self.graph.file_idx(&target) else {
                    continue;
                };
                self.edge(file_idx, target_idx, EdgeKind::Imports);

                let targets = resolved_by_file.entry(analysis.path.clone()).or_default();
                if !targets.contains(&target) {
                    targets.push(target.clone());
                }
                // Named imports of known symbols mark the importer.
                for name in &import.names {
                    if self.table.get(&target, name).is_some() {
                        self.table
                            .record_import(&SymbolKey::new(target.clone(), name), &analysis.path);
                    }
                }
            }
        }
        debug!(dropped, "import pass complete");
        resolved_by_file
    }

    // ─── Pass 3: call and reference edges ───

    fn add_usage_edges(
        &mut self,
        analyses: &[FileAnalysis],
        resolved_imports: &HashMap<String, Vec<String>>,
    ) {
        let mut pending: Vec<PendingUse> = Vec::new();
        {
            let resolver = LexicalResolver::new(&self.table, resolved_imports);
            for analysis in analyses {
                for func in &analysis.functions {
                    let Some(source) = self.graph.symbol_idx(&analysis.path, &func.name) else {
                        continue;
                    };
                    queue_uses(&resolver, &analysis.path, source, func, &mut pending);
                }
                // Method bodies attach their edges to the owning class node.
                for class in &analysis.classes {
                    let Some(source) = self.graph.symbol_idx(&analysis.path, &class.name) else {
                        continue;
                    };
                    for method in &class.methods {
                        queue_uses(&resolver, &analysis.path, source, method, &mut pending);
                    }
                }
            }
        }

        let applied = pending.len();
        for usage in pending {
            let Some(target) = self.graph.symbol_idx(&usage.key.file, &usage.key.name) else {
                continue;
            };
            self.edge(usage.from, target, usage.kind);
            self.table.record_usage(&usage.key, &usage.user, usage.line);
            if usage.via_import {
                self.table.record_import(&usage.key, &usage.user);
            }
        }
        debug!(resolved = applied, "usage pass complete");
    }

    // ─── Pass 4: inheritance edges ───

    fn add_inheritance_edges(
        &mut self,
        analyses: &[FileAnalysis],
        resolved_imports: &HashMap<String, Vec<String>>,
    ) {
        let mut pending: Vec<(NodeIndex, SymbolKey)> = Vec::new();
        {
            let resolver = LexicalResolver::new(&self.table, resolved_imports);
            for analysis in analyses {
                for class in &analysis.classes {
                    let Some(superclass) = &class.superclass else {
                        continue;
                    };
                    let Some(source) = self.graph.symbol_idx(&analysis.path, &class.name) else {
                        continue;
                    };
                    if let Some(resolution) = resolver.resolve(&analysis.path, superclass) {
                        pending.push((source, resolution.key));
                    }
                }
            }
        }

        for (source, key) in pending {
            if let Some(target) = self.graph.symbol_idx(&key.file, &key.name) {
                self.edge(source, target, EdgeKind::Extends);
            }
        }
        debug!("inheritance pass complete");
    }
}

fn queue_uses(
    resolver: &dyn SymbolResolver,
    path: &str,
    source: NodeIndex,
    func: &FunctionInfo,
    pending: &mut Vec<PendingUse>,
) {
    for call in &func.calls {
        if let Some(resolution) = resolver.resolve(path, &call.callee) {
            pending.push(PendingUse {
                from: source,
                key: resolution.key,
                kind: EdgeKind::Calls,
                line: call.line,
                user: path.to_string(),
                via_import: resolution.via_import,
            });
        }
    }
    for reference in &func.references {
        if let Some(resolution) = resolver.resolve(path, &reference.name) {
            pending.push(PendingUse {
                from: source,
                key: resolution.key,
                kind: EdgeKind::References,
                line: reference.line,
                user: path.to_string(),
                via_import: resolution.via_import,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_file;

    fn analyze(files: &[(&str, &str)]) -> Vec<FileAnalysis> {
        files
            .iter()
            .map(|(path, content)| parse_file(path, content))
            .collect()
    }

    #[test]
    fn named_import_wires_files_and_symbols() {
        let analyses = analyze(&[
            (
                "a.ts",
                "import { helper } from './b';\nexport function main() { helper(); }\n",
            ),
            ("b.ts", "export function helper() { return 1; }\n"),
        ]);
        let (graph, table) = build(&analyses);

        // two files, two functions
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.imports_of("a.ts"), vec!["b.ts"]);

        let snapshot = graph.snapshot();
        let kinds: Vec<_> = snapshot
            .edges
            .iter()
            .map(|e| (e.from.as_str(), e.to.as_str(), e.kind))
            .collect();
        assert!(kinds.contains(&("file:a.ts", "function:a.ts:main", EdgeKind::Exports)));
        assert!(kinds.contains(&("file:a.ts", "file:b.ts", EdgeKind::Imports)));
        assert!(kinds.contains(&(
            "function:a.ts:main",
            "function:b.ts:helper",
            EdgeKind::Calls
        )));

        let helper = table.get("b.ts", "helper").unwrap();
        assert_eq!(helper.imported_in, vec!["a.ts"]);
        assert_eq!(helper.usages.len(), 1);
        assert_eq!(helper.usages[0].file, "a.ts");
    }

    #[test]
    fn side_effect_import_still_resolves_callees() {
        let analyses = analyze(&[
            (
                "a.ts",
                "import './b';\nexport function main() { return helper(); }\n",
            ),
            ("b.ts", "export function helper() { return 1; }\n"),
        ]);
        let (graph, table) = build(&analyses);

        assert_eq!(graph.imports_of("a.ts"), vec!["b.ts"]);
        let snapshot = graph.snapshot();
        assert!(snapshot.edges.iter().any(|e| {
            e.from == "function:a.ts:main"
                && e.to == "function:b.ts:helper"
                && e.kind == EdgeKind::Calls
        }));
        // resolution through the import records the importer
        let helper = table.get("b.ts", "helper").unwrap();
        assert_eq!(helper.imported_in, vec!["a.ts"]);
    }

    #[test]
    fn repeated_imports_produce_one_edge() {
        let analyses = analyze(&[
            (
                "a.ts",
                "import './b';\nimport { helper } from './b';\nexport function main() { helper(); }\n",
            ),
            ("b.ts", "export function helper() {}\n"),
        ]);
        let (graph, _) = build(&analyses);

        let snapshot = graph.snapshot();
        let import_edges = snapshot
            .edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Imports)
            .count();
        assert_eq!(import_edges, 1);
    }

    #[test]
    fn extends_resolves_through_imports() {
        let analyses = analyze(&[
            (
                "sub.ts",
                "import { Base } from './base';\nexport class Sub extends Base {}\n",
            ),
            ("base.ts", "export class Base {}\n"),
        ]);
        let (graph, _) = build(&analyses);

        let snapshot = graph.snapshot();
        assert!(snapshot.edges.iter().any(|e| {
            e.from == "class:sub.ts:Sub"
                && e.to == "class:base.ts:Base"
                && e.kind == EdgeKind::Extends
        }));
    }

    #[test]
    fn unresolved_names_drop_without_edges() {
        let analyses = analyze(&[(
            "a.ts",
            "import { gone } from './missing';\nexport function main() { console.log(1); fetch('x'); }\n",
        )]);
        let (graph, table) = build(&analyses);

        // one file node plus one function node, export edge only
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.imports_of("a.ts").is_empty());
        assert!(table.lookup("gone").is_none());
    }

    #[test]
    fn free_references_become_weak_edges() {
        let analyses = analyze(&[(
            "a.ts",
            "export const registry = 1;\nexport function main() { return registry; }\n",
        )]);
        let (graph, table) = build(&analyses);

        let snapshot = graph.snapshot();
        let reference = snapshot
            .edges
            .iter()
            .find(|e| e.kind == EdgeKind::References)
            .unwrap();
        assert_eq!(reference.from, "function:a.ts:main");
        assert_eq!(reference.to, "variable:a.ts:registry");
        assert_eq!(reference.weight, 0.5);

        let entry = table.get("a.ts", "registry").unwrap();
        assert_eq!(entry.usages.len(), 1);
        // same-file resolution is not an import
        assert!(entry.imported_in.is_empty());
    }

    #[test]
    fn method_calls_attach_to_the_class_node() {
        let analyses = analyze(&[(
            "svc.ts",
            "export function send() {}\nexport class Service {\n  flush() { send(); }\n}\n",
        )]);
        let (graph, _) = build(&analyses);

        let snapshot = graph.snapshot();
        assert!(snapshot.edges.iter().any(|e| {
            e.from == "class:svc.ts:Service"
                && e.to == "function:svc.ts:send"
                && e.kind == EdgeKind::Calls
        }));
    }
}
