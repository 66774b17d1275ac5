//! Token-budgeted context window assembly.
//!
//! Three retrieval modes share one packing rule: candidates arrive in
//! relevance order and are added whole until the next file would push the
//! window past its token budget. Files are never split. Under the default
//! truncation policy the top candidate is exempt from the budget check,
//! so a matching query always yields at least one file.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;

use crate::symbols::SymbolTableEntry;
use crate::{AnalysisSession, SourceFile};

use super::tokens::{estimate_tokens, query_terms};

/// Score added per term occurrence in file content.
const CONTENT_WEIGHT: f32 = 10.0;
/// Score added per term matching the file path.
const PATH_WEIGHT: f32 = 50.0;
/// Score added per term matching a declared function or class name.
const SYMBOL_WEIGHT: f32 = 30.0;

const DEFAULT_TOKEN_BUDGET: usize = 8_000;

/// What happens when the highest-ranked candidate alone exceeds the
/// budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationPolicy {
    /// Include the top candidate even over budget, so a non-empty
    /// candidate list always yields a non-empty window.
    AlwaysIncludeTop,
    /// Treat the budget as absolute; an oversized top candidate yields
    /// an empty window.
    Strict,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ContextOptions {
    pub token_budget: usize,
    pub truncation: TruncationPolicy,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            token_budget: DEFAULT_TOKEN_BUDGET,
            truncation: TruncationPolicy::AlwaysIncludeTop,
        }
    }
}

/// How one window file relates to the rest of the repository.
#[derive(Debug, Clone, Serialize)]
pub struct FileRelationships {
    /// Resolved internal files this one imports.
    pub imports: Vec<String>,
    /// Export names declared by this file.
    pub exports: Vec<String>,
    /// Files importing this one.
    pub dependents: Vec<String>,
}

/// One file packed into a window, with full content.
#[derive(Debug, Clone, Serialize)]
pub struct FileContext {
    pub path: String,
    pub content: String,
    pub relevance_score: f32,
    pub relationships: FileRelationships,
}

/// A relevance-ranked, token-budgeted subset of the repository.
#[derive(Debug, Clone, Serialize)]
pub struct ContextWindow {
    pub files: Vec<FileContext>,
    pub total_tokens: usize,
    /// Symbol names that drove the selection: query matches, or the
    /// declared symbols of the seed files.
    pub relevant_symbols: Vec<String>,
    /// Union of the included files' resolved imports, first-seen order.
    pub dependencies: Vec<String>,
}

impl ContextWindow {
    fn empty() -> Self {
        Self {
            files: Vec::new(),
            total_tokens: 0,
            relevant_symbols: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn paths(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.path.as_str()).collect()
    }
}

/// One line of an importing file that mentions a symbol name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceLine {
    pub file: String,
    pub line: usize,
    /// The matching line, trimmed.
    pub text: String,
}

/// A symbol's table entry plus a textual scan of its importers. The scan
/// is substring-based, not scope-aware, so it can over-report.
#[derive(Debug, Clone, Serialize)]
pub struct CrossFileReferences {
    pub symbol: Option<SymbolTableEntry>,
    pub references: Vec<ReferenceLine>,
}

struct Candidate<'a> {
    file: &'a SourceFile,
    score: f32,
    /// Symbol names this candidate contributes to the window.
    symbols: Vec<String>,
}

/// Assembles context windows over a built session. Borrowing keeps the
/// aggregator cheap to construct per request.
pub struct ContextAggregator<'a> {
    session: &'a AnalysisSession,
    options: ContextOptions,
}

impl<'a> ContextAggregator<'a> {
    pub fn new(session: &'a AnalysisSession) -> Self {
        Self::with_options(session, ContextOptions::default())
    }

    pub fn with_options(session: &'a AnalysisSession, options: ContextOptions) -> Self {
        Self { session, options }
    }

    pub fn options(&self) -> ContextOptions {
        self.options
    }

    // ─── Query-driven retrieval ───

    /// Rank every file against the query terms and pack the best ones.
    /// Files that match no term are not candidates at all.
    pub fn by_query(&self, query: &str) -> ContextWindow {
        let terms = query_terms(query);
        if terms.is_empty() {
            return ContextWindow::empty();
        }

        let mut candidates: Vec<Candidate<'_>> = Vec::new();
        for file in self.session.files() {
            let (score, symbols) = self.score_file(file, &terms);
            if score > 0.0 {
                candidates.push(Candidate {
                    file,
                    score,
                    symbols,
                });
            }
        }
        // Stable sort: ties keep batch input order.
        candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        self.pack(candidates)
    }

    fn score_file(&self, file: &SourceFile, terms: &[String]) -> (f32, Vec<String>) {
        let content = file.content.to_lowercase();
        let path = file.path.to_lowercase();
        let declared: Vec<&str> = self
            .session
            .analysis(&file.path)
            .map(|analysis| {
                analysis
                    .functions
                    .iter()
                    .map(|f| f.name.as_str())
                    .chain(analysis.classes.iter().map(|c| c.name.as_str()))
                    .collect()
            })
            .unwrap_or_default();

        let mut score = 0.0;
        let mut matched = Vec::new();
        for term in terms {
            score += CONTENT_WEIGHT * content.matches(term.as_str()).count() as f32;
            if path.contains(term.as_str()) {
                score += PATH_WEIGHT;
            }
            let mut term_hit = false;
            for name in &declared {
                if name.to_lowercase().contains(term.as_str()) {
                    term_hit = true;
                    if !matched.iter().any(|m| m == name) {
                        matched.push((*name).to_string());
                    }
                }
            }
            if term_hit {
                score += SYMBOL_WEIGHT;
            }
        }
        (score, matched)
    }

    // ─── File-radius retrieval ───

    /// The seed file plus its neighborhood: direct imports at radius 1,
    /// dependents as well at radius 2 and beyond. An unknown seed yields
    /// an empty window.
    pub fn around_file(&self, path: &str, radius: usize) -> ContextWindow {
        let Some(seed) = self.session.file(path) else {
            return ContextWindow::empty();
        };

        let mut candidates = vec![Candidate {
            file: seed,
            score: 1.0,
            symbols: self.declared_names(path),
        }];
        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(path.to_string());

        if radius >= 1 {
            for dep in self.session.graph().imports_of(path) {
                if !seen.insert(dep.clone()) {
                    continue;
                }
                if let Some(file) = self.session.file(&dep) {
                    candidates.push(Candidate {
                        file,
                        score: 0.8,
                        symbols: Vec::new(),
                    });
                }
            }
        }
        if radius > 1 {
            for dependent in self.session.graph().importers_of(path) {
                if !seen.insert(dependent.clone()) {
                    continue;
                }
                if let Some(file) = self.session.file(&dependent) {
                    candidates.push(Candidate {
                        file,
                        score: 0.6,
                        symbols: Vec::new(),
                    });
                }
            }
        }
        self.pack(candidates)
    }

    // ─── Multi-file retrieval ───

    /// Every named file, in caller order, plus each one's direct
    /// dependencies. Duplicates and unknown paths are skipped.
    pub fn for_refactor(&self, paths: &[&str]) -> ContextWindow {
        let mut candidates: Vec<Candidate<'_>> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for path in paths {
            let Some(file) = self.session.file(path) else {
                continue;
            };
            if !seen.insert(file.path.clone()) {
                continue;
            }
            candidates.push(Candidate {
                file,
                score: 1.0,
                symbols: self.declared_names(path),
            });
        }

        let members: Vec<String> = candidates.iter().map(|c| c.file.path.clone()).collect();
        for member in &members {
            for dep in self.session.graph().imports_of(member) {
                if !seen.insert(dep.clone()) {
                    continue;
                }
                if let Some(file) = self.session.file(&dep) {
                    candidates.push(Candidate {
                        file,
                        score: 0.5,
                        symbols: Vec::new(),
                    });
                }
            }
        }
        self.pack(candidates)
    }

    // ─── Cross-file reference lookup ───

    /// The first table entry for `name` plus every line of every
    /// importing file that contains the name.
    pub fn cross_file_references(&self, name: &str) -> CrossFileReferences {
        let Some(entry) = self.session.symbol_table().lookup(name) else {
            return CrossFileReferences {
                symbol: None,
                references: Vec::new(),
            };
        };

        let mut references = Vec::new();
        for importer in &entry.imported_in {
            let Some(file) = self.session.file(importer) else {
                continue;
            };
            for (idx, text) in file.content.lines().enumerate() {
                if text.contains(name) {
                    references.push(ReferenceLine {
                        file: importer.clone(),
                        line: idx + 1,
                        text: text.trim().to_string(),
                    });
                }
            }
        }
        CrossFileReferences {
            symbol: Some(entry.clone()),
            references,
        }
    }

    // ─── Packing ───

    /// Greedy whole-file packing in candidate order. Stops at the first
    /// candidate that would exceed the budget; the first candidate skips
    /// the check under [`TruncationPolicy::AlwaysIncludeTop`].
    fn pack(&self, candidates: Vec<Candidate<'_>>) -> ContextWindow {
        let budget = self.options.token_budget;
        let mut files = Vec::new();
        let mut total_tokens = 0usize;
        let mut relevant_symbols: Vec<String> = Vec::new();

        for (position, candidate) in candidates.into_iter().enumerate() {
            let tokens = estimate_tokens(&candidate.file.content);
            let unconditional =
                position == 0 && self.options.truncation == TruncationPolicy::AlwaysIncludeTop;
            if !unconditional && total_tokens + tokens > budget {
                break;
            }
            total_tokens += tokens;
            for name in candidate.symbols {
                if !relevant_symbols.contains(&name) {
                    relevant_symbols.push(name);
                }
            }
            files.push(self.file_context(candidate.file, candidate.score));
        }

        let mut dependencies: Vec<String> = Vec::new();
        for file in &files {
            for dep in &file.relationships.imports {
                if !dependencies.contains(dep) {
                    dependencies.push(dep.clone());
                }
            }
        }

        ContextWindow {
            files,
            total_tokens,
            relevant_symbols,
            dependencies,
        }
    }

    fn file_context(&self, file: &SourceFile, relevance_score: f32) -> FileContext {
        let graph = self.session.graph();
        let exports = self
            .session
            .analysis(&file.path)
            .map(|analysis| analysis.exports.iter().map(|e| e.name.clone()).collect())
            .unwrap_or_default();
        FileContext {
            path: file.path.clone(),
            content: file.content.clone(),
            relevance_score,
            relationships: FileRelationships {
                imports: graph.imports_of(&file.path),
                exports,
                dependents: graph.importers_of(&file.path),
            },
        }
    }

    fn declared_names(&self, path: &str) -> Vec<String> {
        self.session
            .analysis(path)
            .map(|analysis| analysis.symbols().map(|(name, _)| name.to_string()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnalysisSession, SourceFile};

    fn session(files: &[(&str, &str)]) -> AnalysisSession {
        let batch = files
            .iter()
            .map(|(path, content)| SourceFile::new(*path, *content))
            .collect();
        AnalysisSession::build(batch).expect("valid batch")
    }

    fn options(token_budget: usize, truncation: TruncationPolicy) -> ContextOptions {
        ContextOptions {
            token_budget,
            truncation,
        }
    }

    #[test]
    fn path_match_outranks_body_occurrences() {
        let session = session(&[
            ("notes.ts", "// the parser lives elsewhere\nexport const parser = 1;\n"),
            ("parser.ts", "export const table = 1;\n"),
        ]);
        let window = session.context().by_query("parser");

        // 50 for the path beats 10 + 10 for two body occurrences
        assert_eq!(window.paths(), vec!["parser.ts", "notes.ts"]);
        assert!(window.files[0].relevance_score > window.files[1].relevance_score);
    }

    #[test]
    fn symbol_match_scores_and_is_reported() {
        let session = session(&[
            ("api.ts", "export function fetchUsers() {}\n"),
            ("misc.ts", "export const other = 1;\n"),
        ]);
        let window = session.context().by_query("fetch");

        assert_eq!(window.paths(), vec!["api.ts"]);
        assert_eq!(window.relevant_symbols, vec!["fetchUsers"]);
    }

    #[test]
    fn no_matching_terms_means_empty_window() {
        let session = session(&[("a.ts", "export const x = 1;\n")]);
        assert!(session.context().by_query("zebra").is_empty());
        assert!(session.context().by_query("of an it").is_empty());
    }

    #[test]
    fn packing_stops_before_exceeding_budget() {
        // ~25 tokens per file: padding comments keep sizes predictable.
        let filler = format!("export const value = 1; // {}\n", "p".repeat(70));
        let session = session(&[
            ("value/a.ts", filler.as_str()),
            ("value/b.ts", filler.as_str()),
            ("value/c.ts", filler.as_str()),
        ]);
        let per_file = estimate_tokens(&filler);

        let aggregator = session
            .context_with(options(per_file * 2, TruncationPolicy::AlwaysIncludeTop));
        let window = aggregator.by_query("value");

        assert_eq!(window.files.len(), 2);
        assert_eq!(window.total_tokens, per_file * 2);
        assert!(window.total_tokens <= aggregator.options().token_budget);
    }

    #[test]
    fn top_file_is_included_even_over_budget() {
        let session = session(&[
            ("big.ts", "export function target() { return 'target target target'; }\n"),
            ("small.ts", "// target\n"),
        ]);
        let window = session
            .context_with(options(1, TruncationPolicy::AlwaysIncludeTop))
            .by_query("target");

        // exactly the top file, nothing else
        assert_eq!(window.paths(), vec!["big.ts"]);
        assert!(window.total_tokens > 1);
    }

    #[test]
    fn strict_policy_returns_nothing_over_budget() {
        let session = session(&[(
            "big.ts",
            "export function target() { return 'target target target'; }\n",
        )]);
        let window = session
            .context_with(options(1, TruncationPolicy::Strict))
            .by_query("target");
        assert!(window.is_empty());
        assert_eq!(window.total_tokens, 0);
    }

    #[test]
    fn around_file_walks_imports_then_dependents() {
        let session = session(&[
            ("app.ts", "import { load } from './lib';\nexport function run() { load(); }\n"),
            ("lib.ts", "export function load() {}\n"),
            ("main.ts", "import { run } from './app';\nrun();\n"),
        ]);

        let near = session.context().around_file("app.ts", 1);
        assert_eq!(near.paths(), vec!["app.ts", "lib.ts"]);
        assert_eq!(near.files[0].relevance_score, 1.0);
        assert_eq!(near.files[1].relevance_score, 0.8);
        // seed symbols drive the window
        assert_eq!(near.relevant_symbols, vec!["run"]);

        let wide = session.context().around_file("app.ts", 2);
        assert_eq!(wide.paths(), vec!["app.ts", "lib.ts", "main.ts"]);
        assert_eq!(wide.files[2].relevance_score, 0.6);

        assert!(session.context().around_file("ghost.ts", 1).is_empty());
    }

    #[test]
    fn around_file_reports_relationships() {
        let session = session(&[
            ("app.ts", "import { load } from './lib';\nexport function run() { load(); }\n"),
            ("lib.ts", "export function load() {}\n"),
            ("main.ts", "import { run } from './app';\nrun();\n"),
        ]);
        let window = session.context().around_file("app.ts", 1);

        let app = &window.files[0];
        assert_eq!(app.relationships.imports, vec!["lib.ts"]);
        assert_eq!(app.relationships.exports, vec!["run"]);
        assert_eq!(app.relationships.dependents, vec!["main.ts"]);
        assert_eq!(window.dependencies, vec!["lib.ts"]);
    }

    #[test]
    fn refactor_set_keeps_caller_order_and_skips_duplicates() {
        let session = session(&[
            ("a.ts", "import './shared';\nexport function fa() {}\n"),
            ("b.ts", "import './shared';\nexport function fb() {}\n"),
            ("shared.ts", "export function helper() {}\n"),
        ]);
        let window = session
            .context()
            .for_refactor(&["b.ts", "a.ts", "b.ts", "missing.ts"]);

        assert_eq!(window.paths(), vec!["b.ts", "a.ts", "shared.ts"]);
        assert_eq!(window.files[0].relevance_score, 1.0);
        assert_eq!(window.files[1].relevance_score, 1.0);
        assert_eq!(window.files[2].relevance_score, 0.5);
        assert_eq!(window.relevant_symbols, vec!["fb", "fa"]);
    }

    #[test]
    fn cross_file_references_scan_importer_lines() {
        let session = session(&[
            (
                "user.ts",
                "import { fetchUser } from './api';\nexport function show(id) {\n  return fetchUser(id);\n}\n",
            ),
            ("api.ts", "export function fetchUser(id) { return id; }\n"),
        ]);
        let refs = session.context().cross_file_references("fetchUser");

        let entry = refs.symbol.expect("symbol exists");
        assert_eq!(entry.file, "api.ts");
        assert_eq!(entry.imported_in, vec!["user.ts"]);

        let lines: Vec<usize> = refs.references.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![1, 3]);
        assert!(refs.references.iter().all(|r| r.file == "user.ts"));
        assert!(refs.references[1].text.contains("fetchUser(id)"));

        let missing = session.context().cross_file_references("nothing");
        assert!(missing.symbol.is_none());
        assert!(missing.references.is_empty());
    }
}
