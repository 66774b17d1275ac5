//! Normalized structural output of the source parser.
//!
//! Both front ends (grammar and heuristic) produce the same [`FileAnalysis`]
//! shape, so the graph builder never needs to know how a file was parsed.

use serde::{Deserialize, Serialize};

use super::Language;

/// 1-based, inclusive line range of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start_line: usize,
    pub end_line: usize,
}

impl Span {
    pub fn new(start_line: usize, end_line: usize) -> Self {
        Self {
            start_line,
            end_line,
        }
    }

    pub fn line(line: usize) -> Self {
        Self::new(line, line)
    }
}

/// Whether a symbol is declared at file top level or nested inside
/// another declaration (class methods and properties).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolScope {
    Global,
    Local,
}

/// The three symbol families the graph models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Class,
    Variable,
}

/// A call site inside a function body. One entry per distinct callee
/// name, carrying the line it was first seen on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    pub callee: String,
    pub line: usize,
}

/// A free-variable use: an identifier read inside a function body that
/// is not bound by the function itself (parameters, locals, nested
/// declarations) and is not already counted as a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSite {
    pub name: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    pub params: Vec<String>,
    pub span: Span,
    pub scope: SymbolScope,
    /// Branch count plus one. Minimum 1 for a straight-line body.
    pub complexity: u32,
    pub calls: Vec<CallSite>,
    pub references: Vec<ReferenceSite>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    pub span: Span,
    pub scope: SymbolScope,
    /// Bare superclass name as written at the declaration site.
    pub superclass: Option<String>,
    pub methods: Vec<FunctionInfo>,
    pub properties: Vec<VariableInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableInfo {
    pub name: String,
    pub span: Span,
    pub scope: SymbolScope,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDecl {
    /// Module specifier exactly as written in the source.
    pub specifier: String,
    /// Imported names, using the exporting module's names (the name
    /// before any `as` rebinding). Empty for side-effect imports.
    pub names: Vec<String>,
    /// True when the specifier does not start with `.` or `/`.
    pub external: bool,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Named,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDecl {
    pub name: String,
    pub kind: ExportKind,
    pub line: usize,
}

/// Structural summary of one source file. Parsing never fails: files
/// that cannot be analyzed at all come back as [`FileAnalysis::empty`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub path: String,
    pub language: Language,
    pub imports: Vec<ImportDecl>,
    pub exports: Vec<ExportDecl>,
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
    pub variables: Vec<VariableInfo>,
}

impl FileAnalysis {
    pub fn empty(path: &str, language: Language) -> Self {
        Self {
            path: path.to_string(),
            language,
            imports: Vec::new(),
            exports: Vec::new(),
            functions: Vec::new(),
            classes: Vec::new(),
            variables: Vec::new(),
        }
    }

    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
            && self.exports.is_empty()
            && self.functions.is_empty()
            && self.classes.is_empty()
            && self.variables.is_empty()
    }

    /// Every top-level declaration as `(name, kind)`, in declaration order
    /// within each family.
    pub fn symbols(&self) -> impl Iterator<Item = (&str, SymbolKind)> {
        self.functions
            .iter()
            .map(|f| (f.name.as_str(), SymbolKind::Function))
            .chain(
                self.classes
                    .iter()
                    .map(|c| (c.name.as_str(), SymbolKind::Class)),
            )
            .chain(
                self.variables
                    .iter()
                    .map(|v| (v.name.as_str(), SymbolKind::Variable)),
            )
    }

    /// Call sites of every top-level function and every class method.
    pub fn calls(&self) -> impl Iterator<Item = &CallSite> {
        self.functions
            .iter()
            .flat_map(|f| f.calls.iter())
            .chain(
                self.classes
                    .iter()
                    .flat_map(|c| c.methods.iter())
                    .flat_map(|m| m.calls.iter()),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn func(name: &str, calls: &[&str]) -> FunctionInfo {
        FunctionInfo {
            name: name.into(),
            params: vec![],
            span: Span::line(1),
            scope: SymbolScope::Global,
            complexity: 1,
            calls: calls
                .iter()
                .map(|c| CallSite {
                    callee: (*c).into(),
                    line: 2,
                })
                .collect(),
            references: vec![],
        }
    }

    #[test]
    fn symbols_iterates_all_families() {
        let mut analysis = FileAnalysis::empty("a.ts", Language::TypeScript);
        analysis.functions.push(func("f", &[]));
        analysis.classes.push(ClassInfo {
            name: "C".into(),
            span: Span::new(3, 9),
            scope: SymbolScope::Global,
            superclass: None,
            methods: vec![func("m", &["g"])],
            properties: vec![],
        });
        analysis.variables.push(VariableInfo {
            name: "V".into(),
            span: Span::line(11),
            scope: SymbolScope::Global,
        });

        let names: Vec<_> = analysis.symbols().collect();
        assert_eq!(
            names,
            vec![
                ("f", SymbolKind::Function),
                ("C", SymbolKind::Class),
                ("V", SymbolKind::Variable),
            ]
        );
        assert!(!analysis.is_empty());
    }

    #[test]
    fn calls_includes_method_bodies() {
        let mut analysis = FileAnalysis::empty("a.ts", Language::TypeScript);
        analysis.functions.push(func("f", &["x"]));
        analysis.classes.push(ClassInfo {
            name: "C".into(),
            span: Span::new(3, 9),
            scope: SymbolScope::Global,
            superclass: None,
            methods: vec![func("m", &["y", "z"])],
            properties: vec![],
        });

        let callees: Vec<_> = analysis.calls().map(|c| c.callee.as_str()).collect();
        assert_eq!(callees, vec!["x", "y", "z"]);
    }
}
