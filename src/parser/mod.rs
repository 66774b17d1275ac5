//! Source parsing front door.
//!
//! [`parse_file`] dispatches on the file extension: the JS/TS family goes
//! through the tree-sitter grammar front end, everything else through the
//! line heuristic. Parsing is total — a file that defeats both front ends
//! still yields an empty [`FileAnalysis`] rather than an error.

mod grammar;
mod heuristic;
pub mod language;
pub mod types;

pub use language::{Language, ParseStrategy};
pub use types::{
    CallSite, ClassInfo, ExportDecl, ExportKind, FileAnalysis, FunctionInfo, ImportDecl,
    ReferenceSite, Span, SymbolKind, SymbolScope, VariableInfo,
};

/// Parse one file into its normalized structural analysis.
pub fn parse_file(path: &str, content: &str) -> FileAnalysis {
    let language = Language::from_path(path);
    match language.strategy() {
        ParseStrategy::Grammar => grammar::parse(path, content, language),
        ParseStrategy::Heuristic => heuristic::parse(path, content, language),
    }
}

/// A specifier is external unless it starts with `.` or `/`.
pub(crate) fn is_external_specifier(specifier: &str) -> bool {
    !(specifier.starts_with('.') || specifier.starts_with('/'))
}
