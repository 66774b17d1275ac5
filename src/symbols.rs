//! Repository-wide symbol table.
//!
//! Entries are keyed by `(file, name)` so identically-named symbols in
//! different files stay distinct. Name lookups that span files return
//! candidates in definition order, which follows batch input order.

use std::collections::HashMap;

use serde::Serialize;

use crate::parser::{SymbolKind, SymbolScope};

/// Key of one table entry: owning file plus declared name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SymbolKey {
    pub file: String,
    pub name: String,
}

impl SymbolKey {
    pub fn new(file: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            name: name.into(),
        }
    }
}

/// Where a symbol was used: the referencing file and line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageSite {
    pub file: String,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SymbolTableEntry {
    pub name: String,
    pub kind: SymbolKind,
    pub file: String,
    pub scope: SymbolScope,
    /// Call and reference sites that resolved to this symbol.
    pub usages: Vec<UsageSite>,
    /// Files that import this symbol, directly or through resolution.
    pub imported_in: Vec<String>,
}

/// All top-level symbols of the batch, with reverse lookup by bare name.
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: HashMap<SymbolKey, SymbolTableEntry>,
    by_name: HashMap<String, Vec<SymbolKey>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a symbol. The first definition of a `(file, name)` pair
    /// wins; later duplicates are dropped.
    pub(crate) fn insert(&mut self, file: &str, name: &str, kind: SymbolKind, scope: SymbolScope) {
        let key = SymbolKey::new(file, name);
        if self.entries.contains_key(&key) {
            return;
        }
        self.entries.insert(
            key.clone(),
            SymbolTableEntry {
                name: name.to_string(),
                kind,
                file: file.to_string(),
                scope,
                usages: Vec::new(),
                imported_in: Vec::new(),
            },
        );
        self.by_name.entry(name.to_string()).or_default().push(key);
    }

    pub(crate) fn record_usage(&mut self, key: &SymbolKey, file: &str, line: usize) {
        if let Some(entry) = self.entries.get_mut(key) {
            let site = UsageSite {
                file: file.to_string(),
                line,
            };
            if !entry.usages.contains(&site) {
                entry.usages.push(site);
            }
        }
    }

    pub(crate) fn record_import(&mut self, key: &SymbolKey, importer: &str) {
        if let Some(entry) = self.entries.get_mut(key) {
            if !entry.imported_in.iter().any(|f| f == importer) {
                entry.imported_in.push(importer.to_string());
            }
        }
    }

    pub fn get(&self, file: &str, name: &str) -> Option<&SymbolTableEntry> {
        self.entries.get(&SymbolKey::new(file, name))
    }

    /// First definition of `name` across the batch, if any.
    pub fn lookup(&self, name: &str) -> Option<&SymbolTableEntry> {
        self.candidates(name).into_iter().next()
    }

    /// Every definition of `name`, in definition order.
    pub fn candidates(&self, name: &str) -> Vec<&SymbolTableEntry> {
        self.by_name
            .get(name)
            .map(|keys| keys.iter().filter_map(|key| self.entries.get(key)).collect())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolTableEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_in_two_files_stays_distinct() {
        let mut table = SymbolTable::new();
        table.insert("a.ts", "run", SymbolKind::Function, SymbolScope::Global);
        table.insert("b.ts", "run", SymbolKind::Function, SymbolScope::Global);

        assert_eq!(table.len(), 2);
        let candidates = table.candidates("run");
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].file, "a.ts");
        assert_eq!(candidates[1].file, "b.ts");
        // lookup picks the first definition
        assert_eq!(table.lookup("run").map(|e| e.file.as_str()), Some("a.ts"));
    }

    #[test]
    fn duplicate_definition_keeps_the_first() {
        let mut table = SymbolTable::new();
        table.insert("a.ts", "x", SymbolKind::Variable, SymbolScope::Global);
        table.insert("a.ts", "x", SymbolKind::Function, SymbolScope::Global);

        assert_eq!(table.len(), 1);
        assert_eq!(
            table.get("a.ts", "x").map(|e| e.kind),
            Some(SymbolKind::Variable)
        );
    }

    #[test]
    fn usages_and_imports_deduplicate() {
        let mut table = SymbolTable::new();
        table.insert("a.ts", "f", SymbolKind::Function, SymbolScope::Global);
        let key = SymbolKey::new("a.ts", "f");

        table.record_usage(&key, "b.ts", 3);
        table.record_usage(&key, "b.ts", 3);
        table.record_usage(&key, "b.ts", 9);
        table.record_import(&key, "b.ts");
        table.record_import(&key, "b.ts");

        let entry = table.get("a.ts", "f").unwrap();
        assert_eq!(entry.usages.len(), 2);
        assert_eq!(entry.imported_in, vec!["b.ts"]);
    }

    #[test]
    fn missing_symbols_are_silent() {
        let mut table = SymbolTable::new();
        table.record_usage(&SymbolKey::new("a.ts", "ghost"), "b.ts", 1);
        assert!(table.lookup("ghost").is_none());
        assert!(table.candidates("ghost").is_empty());
    }
}
