//! Language identification and parse-strategy selection.
//!
//! Languages are recognized purely by file extension. The JavaScript/TypeScript
//! family gets a full grammar parse; every other recognized language (and any
//! unknown extension) goes through the line-heuristic front end, so no input
//! file is ever rejected for its language.

use serde::{Deserialize, Serialize};

/// How files of a language are analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStrategy {
    /// Tree-sitter grammar parse with full AST extraction.
    Grammar,
    /// Line-scanning extraction of declarations and imports.
    Heuristic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    TypeScript,
    Tsx,
    Python,
    Rust,
    Go,
    Java,
    Ruby,
    CSharp,
    C,
    Cpp,
    Unknown,
}

/// Extension table, lowercase. Anything not listed maps to [`Language::Unknown`].
const EXTENSIONS: &[(&str, Language)] = &[
    ("js", Language::JavaScript),
    ("jsx", Language::JavaScript),
    ("mjs", Language::JavaScript),
    ("cjs", Language::JavaScript),
    ("ts", Language::TypeScript),
    ("mts", Language::TypeScript),
    ("cts", Language::TypeScript),
    ("tsx", Language::Tsx),
    ("py", Language::Python),
    ("rs", Language::Rust),
    ("go", Language::Go),
    ("java", Language::Java),
    ("rb", Language::Ruby),
    ("cs", Language::CSharp),
    ("c", Language::C),
    ("h", Language::C),
    ("cpp", Language::Cpp),
    ("cc", Language::Cpp),
    ("cxx", Language::Cpp),
    ("hpp", Language::Cpp),
];

impl Language {
    /// Identify a language from a repo-relative path.
    pub fn from_path(path: &str) -> Self {
        std::path::Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| Self::from_extension(&ext.to_ascii_lowercase()))
            .unwrap_or(Language::Unknown)
    }

    pub fn from_extension(ext: &str) -> Self {
        EXTENSIONS
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, lang)| *lang)
            .unwrap_or(Language::Unknown)
    }

    pub fn strategy(self) -> ParseStrategy {
        match self {
            Language::JavaScript | Language::TypeScript | Language::Tsx => ParseStrategy::Grammar,
            _ => ParseStrategy::Heuristic,
        }
    }

    /// Tree-sitter grammar for [`ParseStrategy::Grammar`] languages.
    pub(crate) fn grammar(self) -> Option<tree_sitter::Language> {
        match self {
            Language::JavaScript => Some(tree_sitter_javascript::LANGUAGE.into()),
            Language::TypeScript => Some(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
            Language::Tsx => Some(tree_sitter_typescript::LANGUAGE_TSX.into()),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Tsx => "tsx",
            Language::Python => "python",
            Language::Rust => "rust",
            Language::Go => "go",
            Language::Java => "java",
            Language::Ruby => "ruby",
            Language::CSharp => "csharp",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
