//! Import-path and bare-name resolution.
//!
//! Path resolution turns import specifiers into known repo-relative file
//! paths. Name resolution turns bare callee/reference names into symbol
//! table keys from the viewpoint of the file using them.

use std::collections::{HashMap, HashSet};

use crate::symbols::{SymbolKey, SymbolTable};

/// Suffixes tried, in order, after the literal path misses.
const IMPORT_SUFFIXES: &[&str] = &[".ts", ".js", ".tsx", ".jsx", "/index.ts", "/index.js"];

/// Resolve an import specifier against the batch's file set. Relative
/// specifiers join the importer's directory; absolute ones are taken from
/// the repo root. Unresolvable specifiers yield `None`.
pub(crate) fn resolve_import(
    importer: &str,
    specifier: &str,
    files: &HashSet<String>,
) -> Option<String> {
    let base = if specifier.starts_with('.') {
        join_relative(importer, specifier)
    } else {
        specifier.trim_start_matches('/').to_string()
    };
    if files.contains(&base) {
        return Some(base);
    }
    for suffix in IMPORT_SUFFIXES {
        let candidate = format!("{base}{suffix}");
        if files.contains(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Join a relative specifier to the importer's directory, normalizing
/// `.` and `..` segments. `..` past the repo root is dropped.
pub(crate) fn join_relative(importer: &str, specifier: &str) -> String {
    let mut segments: Vec<&str> = importer.split('/').collect();
    segments.pop();
    for part in specifier.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// A resolved bare name: the symbol's table key plus whether resolution
/// went through an import rather than the file's own declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub key: SymbolKey,
    pub via_import: bool,
}

/// Name resolution viewpoint used when attaching call and reference edges.
pub trait SymbolResolver {
    fn resolve(&self, from_file: &str, name: &str) -> Option<Resolution>;
}

/// Own-file declarations first, then resolved imports in declaration
/// order. Names that match nothing stay unresolved and the caller drops
/// them silently.
pub struct LexicalResolver<'a> {
    table: &'a SymbolTable,
    /// Resolved internal import targets per file, in declaration order.
    imports: &'a HashMap<String, Vec<String>>,
}

impl<'a> LexicalResolver<'a> {
    pub fn new(table: &'a SymbolTable, imports: &'a HashMap<String, Vec<String>>) -> Self {
        Self { table, imports }
    }
}

impl SymbolResolver for LexicalResolver<'_> {
    fn resolve(&self, from_file: &str, name: &str) -> Option<Resolution> {
        if self.table.get(from_file, name).is_some() {
            return Some(Resolution {
                key: SymbolKey::new(from_file, name),
                via_import: false,
            });
        }
        for target in self.imports.get(from_file).into_iter().flatten() {
            if self.table.get(target, name).is_some() {
                return Some(Resolution {
                    key: SymbolKey::new(target, name),
                    via_import: true,
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{SymbolKind, SymbolScope};

    fn file_set(paths: &[&str]) -> HashSet<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn joins_relative_segments() {
        assert_eq!(join_relative("src/a.ts", "./b"), "src/b");
        assert_eq!(join_relative("src/deep/a.ts", "../b"), "src/b");
        assert_eq!(join_relative("src/deep/a.ts", "../../b"), "b");
        assert_eq!(join_relative("a.ts", "./b"), "b");
        // `..` past the root clamps instead of escaping
        assert_eq!(join_relative("a.ts", "../../b"), "b");
    }

    #[test]
    fn literal_match_wins_before_suffixes() {
        let files = file_set(&["src/b", "src/b.ts"]);
        assert_eq!(
            resolve_import("src/a.ts", "./b", &files),
            Some("src/b".to_string())
        );
    }

    #[test]
    fn suffixes_try_in_fixed_order() {
        let files = file_set(&["src/b.js", "src/b.tsx"]);
        assert_eq!(
            resolve_import("src/a.ts", "./b", &files),
            Some("src/b.js".to_string())
        );

        let index_only = file_set(&["src/lib/index.ts"]);
        assert_eq!(
            resolve_import("src/a.ts", "./lib", &index_only),
            Some("src/lib/index.ts".to_string())
        );
    }

    #[test]
    fn absolute_specifiers_start_at_repo_root() {
        let files = file_set(&["src/util.ts"]);
        assert_eq!(
            resolve_import("deep/nested/a.ts", "/src/util.ts", &files),
            Some("src/util.ts".to_string())
        );
    }

    #[test]
    fn unknown_paths_stay_unresolved() {
        let files = file_set(&["src/b.ts"]);
        assert_eq!(resolve_import("src/a.ts", "./missing", &files), None);
    }

    #[test]
    fn own_file_shadows_imports() {
        let mut table = SymbolTable::new();
        table.insert("a.ts", "run", SymbolKind::Function, SymbolScope::Global);
        table.insert("b.ts", "run", SymbolKind::Function, SymbolScope::Global);
        let mut imports = HashMap::new();
        imports.insert("a.ts".to_string(), vec!["b.ts".to_string()]);

        let resolver = LexicalResolver::new(&table, &imports);
        let hit = resolver.resolve("a.ts", "run").unwrap();
        assert_eq!(hit.key, SymbolKey::new("a.ts", "run"));
        assert!(!hit.via_import);
    }

    #[test]
    fn imports_resolve_in_declaration_order() {
        let mut table = SymbolTable::new();
        table.insert("second.ts", "shared", SymbolKind::Function, SymbolScope::Global);
        table.insert("third.ts", "shared", SymbolKind::Function, SymbolScope::Global);
        let mut imports = HashMap::new();
        imports.insert(
            "a.ts".to_string(),
            vec!["second.ts".to_string(), "third.ts".to_string()],
        );

        let resolver = LexicalResolver::new(&table, &imports);
        let hit = resolver.resolve("a.ts", "shared").unwrap();
        assert_eq!(hit.key, SymbolKey::new("second.ts", "shared"));
        assert!(hit.via_import);

        assert!(resolver.resolve("a.ts", "nowhere").is_none());
        assert!(resolver.resolve("untracked.ts", "shared").is_none());
    }
}
