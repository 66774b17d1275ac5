//! Grammar front end for the JavaScript/TypeScript family.
//!
//! One tree-sitter pass per file. Top-level declarations become symbols;
//! function and method bodies are walked once to collect branch counts,
//! call sites, and free-variable references. Syntax errors never abort a
//! file: tree-sitter produces a tree with error nodes and extraction keeps
//! whatever parsed cleanly.

use std::collections::HashSet;

use tracing::{debug, warn};
use tree_sitter::{Node, Parser};

use super::types::{
    CallSite, ClassInfo, ExportDecl, ExportKind, FileAnalysis, FunctionInfo, ImportDecl,
    ReferenceSite, Span, SymbolScope, VariableInfo,
};
use super::{is_external_specifier, Language};

pub(super) fn parse(path: &str, content: &str, language: Language) -> FileAnalysis {
    let Some(grammar) = language.grammar() else {
        return FileAnalysis::empty(path, language);
    };

    let mut parser = Parser::new();
    if let Err(err) = parser.set_language(&grammar) {
        warn!(path, error = %err, "grammar unavailable, emitting empty analysis");
        return FileAnalysis::empty(path, language);
    }
    let Some(tree) = parser.parse(content, None) else {
        warn!(path, "tree-sitter produced no tree, emitting empty analysis");
        return FileAnalysis::empty(path, language);
    };

    let mut out = FileAnalysis::empty(path, language);
    let source = content.as_bytes();
    let root = tree.root_node();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        extract_top_level(child, source, &mut out);
    }

    debug!(
        path,
        functions = out.functions.len(),
        classes = out.classes.len(),
        imports = out.imports.len(),
        "grammar extraction complete"
    );
    out
}

fn extract_top_level(node: Node, source: &[u8], out: &mut FileAnalysis) {
    match node.kind() {
        "import_statement" => extract_import(node, source, out),
        "export_statement" => extract_export(node, source, out),
        _ => {
            extract_declaration(node, source, out);
        }
    }
}

/// Extract one top-level declaration into `out`, returning the names it
/// declared so export handling can record them.
fn extract_declaration(node: Node, source: &[u8], out: &mut FileAnalysis) -> Vec<String> {
    match node.kind() {
        "function_declaration" | "generator_function_declaration" => {
            match extract_function(node, source, SymbolScope::Global) {
                Some(func) => {
                    let name = func.name.clone();
                    out.functions.push(func);
                    vec![name]
                }
                None => Vec::new(),
            }
        }
        "class_declaration" | "abstract_class_declaration" => {
            match extract_class(node, source) {
                Some(class) => {
                    let name = class.name.clone();
                    out.classes.push(class);
                    vec![name]
                }
                None => Vec::new(),
            }
        }
        "lexical_declaration" | "variable_declaration" => {
            extract_variable_declaration(node, source, out)
        }
        // TS enums have a runtime object, so they count as variables.
        "enum_declaration" => match field_text(node, "name", source) {
            Some(name) => {
                out.variables.push(VariableInfo {
                    name: name.clone(),
                    span: span_of(node),
                    scope: SymbolScope::Global,
                });
                vec![name]
            }
            None => Vec::new(),
        },
        _ => Vec::new(),
    }
}

// ─── Functions ───

fn extract_function(node: Node, source: &[u8], scope: SymbolScope) -> Option<FunctionInfo> {
    let name_node = node.child_by_field_name("name")?;
    if name_node.kind() == "computed_property_name" {
        return None;
    }
    let name = node_text(&name_node, source);
    if name.is_empty() {
        return None;
    }
    Some(build_function(name, node, node, source, scope))
}

/// Build a function from a `const f = () => …` style declarator, where the
/// name lives on `origin` and the function itself is `def`.
fn function_from_value(
    name: String,
    origin: Node,
    def: Node,
    source: &[u8],
    scope: SymbolScope,
) -> FunctionInfo {
    build_function(name, origin, def, source, scope)
}

fn build_function(
    name: String,
    span_node: Node,
    def: Node,
    source: &[u8],
    scope: SymbolScope,
) -> FunctionInfo {
    let params = params_of(def, source);
    let mut facts = BodyFacts::default();
    for param in &params {
        facts.bound.insert(param.clone());
    }
    if let Some(body) = def.child_by_field_name("body") {
        collect_body(body, source, &mut facts);
    }

    let complexity = facts.complexity();
    let references = facts
        .uses
        .into_iter()
        .filter(|site| !facts.bound.contains(&site.name) && !facts.seen_calls.contains(&site.name))
        .collect();

    FunctionInfo {
        name,
        params,
        span: span_of(span_node),
        scope,
        complexity,
        calls: facts.calls,
        references,
    }
}

fn params_of(def: Node, source: &[u8]) -> Vec<String> {
    let mut params = Vec::new();
    if let Some(list) = def.child_by_field_name("parameters") {
        collect_param_bindings(list, source, &mut params);
    } else if let Some(single) = def.child_by_field_name("parameter") {
        // Concise arrow: `x => …`
        collect_pattern_names(single, source, &mut params);
    }
    params
}

fn collect_param_bindings(list: Node, source: &[u8], out: &mut Vec<String>) {
    let mut cursor = list.walk();
    for param in list.named_children(&mut cursor) {
        match param.kind() {
            // TS wraps each parameter; the bound pattern is a field.
            "required_parameter" | "optional_parameter" => {
                if let Some(pattern) = param.child_by_field_name("pattern") {
                    collect_pattern_names(pattern, source, out);
                }
            }
            _ => collect_pattern_names(param, source, out),
        }
    }
}

/// Binding names declared by a pattern. Default values and pair keys are
/// not bindings and are skipped.
fn collect_pattern_names(node: Node, source: &[u8], out: &mut Vec<String>) {
    match node.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => {
            let text = node_text(&node, source);
            if !text.is_empty() {
                out.push(text);
            }
        }
        "assignment_pattern" => {
            if let Some(left) = node.child_by_field_name("left") {
                collect_pattern_names(left, source, out);
            }
        }
        "pair_pattern" => {
            if let Some(value) = node.child_by_field_name("value") {
                collect_pattern_names(value, source, out);
            }
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                collect_pattern_names(child, source, out);
            }
        }
    }
}

// ─── Body walk ───

#[derive(Default)]
struct BodyFacts {
    branches: u32,
    calls: Vec<CallSite>,
    seen_calls: HashSet<String>,
    uses: Vec<ReferenceSite>,
    seen_uses: HashSet<String>,
    bound: HashSet<String>,
}

impl BodyFacts {
    /// Branch count plus one.
    fn complexity(&self) -> u32 {
        self.branches + 1
    }

    fn record_call(&mut self, callee: String, line: usize) {
        if self.seen_calls.insert(callee.clone()) {
            self.calls.push(CallSite { callee, line });
        }
    }

    fn record_use(&mut self, name: String, line: usize) {
        if self.seen_uses.insert(name.clone()) {
            self.uses.push(ReferenceSite { name, line });
        }
    }

    fn bind_pattern(&mut self, pattern: Node, source: &[u8]) {
        let mut names = Vec::new();
        collect_pattern_names(pattern, source, &mut names);
        self.bound.extend(names);
    }
}

fn collect_body(node: Node, source: &[u8], facts: &mut BodyFacts) {
    if is_branch(node) {
        facts.branches += 1;
    }

    match node.kind() {
        "call_expression" => {
            if let Some(callee) = callee_name(node, source) {
                facts.record_call(callee, line_of(node));
            }
        }
        "new_expression" => {
            if let Some(callee) = constructor_name(node, source) {
                facts.record_call(callee, line_of(node));
            }
        }
        "identifier" => {
            if !is_callee_position(node) && !is_jsx_name_position(node) {
                facts.record_use(node_text(&node, source), line_of(node));
            }
        }
        "variable_declarator" => {
            if let Some(name) = node.child_by_field_name("name") {
                facts.bind_pattern(name, source);
            }
        }
        "class_declaration" => {
            if let Some(name) = field_text(node, "name", source) {
                facts.bound.insert(name);
            }
        }
        // Nested closures: their names and parameters are local to the
        // enclosing top-level function for reference purposes.
        "function_declaration" | "generator_function_declaration" | "arrow_function"
        | "function_expression" | "function" | "generator_function" | "method_definition" => {
            if let Some(name) = field_text(node, "name", source) {
                facts.bound.insert(name);
            }
            if let Some(list) = node.child_by_field_name("parameters") {
                facts.bind_pattern(list, source);
            } else if let Some(single) = node.child_by_field_name("parameter") {
                facts.bind_pattern(single, source);
            }
        }
        "catch_clause" => {
            if let Some(param) = node.child_by_field_name("parameter") {
                facts.bind_pattern(param, source);
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_body(child, source, facts);
    }
}

fn is_branch(node: Node) -> bool {
    match node.kind() {
        "if_statement" | "while_statement" | "do_statement" | "for_statement"
        | "for_in_statement" | "ternary_expression" | "catch_clause" | "switch_case" => true,
        "binary_expression" => node
            .child_by_field_name("operator")
            .is_some_and(|op| matches!(op.kind(), "&&" | "||" | "??")),
        _ => false,
    }
}

/// Callee name of a call: bare identifier, or the property name of a
/// member call. Computed and immediately-invoked callees have no name.
fn callee_name(call: Node, source: &[u8]) -> Option<String> {
    let func = call.child_by_field_name("function")?;
    named_target(func, source)
}

fn constructor_name(new_expr: Node, source: &[u8]) -> Option<String> {
    let ctor = new_expr.child_by_field_name("constructor")?;
    named_target(ctor, source)
}

fn named_target(node: Node, source: &[u8]) -> Option<String> {
    match node.kind() {
        "identifier" => Some(node_text(&node, source)),
        "member_expression" => node
            .child_by_field_name("property")
            .map(|prop| node_text(&prop, source)),
        _ => None,
    }
    .filter(|name| !name.is_empty())
}

fn is_callee_position(node: Node) -> bool {
    node.parent().is_some_and(|parent| {
        (parent.kind() == "call_expression" && field_is(parent, "function", node))
            || (parent.kind() == "new_expression" && field_is(parent, "constructor", node))
    })
}

/// JSX element names alias to `identifier` in the grammar but are tag
/// names, not variable uses.
fn is_jsx_name_position(node: Node) -> bool {
    node.parent().is_some_and(|parent| {
        matches!(
            parent.kind(),
            "jsx_opening_element" | "jsx_self_closing_element" | "jsx_closing_element"
        ) && field_is(parent, "name", node)
    })
}

fn field_is(parent: Node, field: &str, node: Node) -> bool {
    parent
        .child_by_field_name(field)
        .is_some_and(|child| child.id() == node.id())
}

// ─── Classes ───

fn extract_class(node: Node, source: &[u8]) -> Option<ClassInfo> {
    let name = field_text(node, "name", source)?;
    let mut class = ClassInfo {
        name,
        span: span_of(node),
        scope: SymbolScope::Global,
        superclass: superclass_name(node, source),
        methods: Vec::new(),
        properties: Vec::new(),
    };

    let Some(body) = node.child_by_field_name("body") else {
        return Some(class);
    };
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        match member.kind() {
            "method_definition" => {
                if let Some(method) = extract_function(member, source, SymbolScope::Local) {
                    class.methods.push(method);
                }
            }
            // JS uses the `property` field, TS uses `name`.
            "field_definition" | "public_field_definition" => {
                let name = field_text(member, "name", source)
                    .or_else(|| field_text(member, "property", source));
                let Some(name) = name else { continue };
                match member.child_by_field_name("value") {
                    Some(value) if is_function_value(value) => {
                        class
                            .methods
                            .push(function_from_value(name, member, value, source, SymbolScope::Local));
                    }
                    _ => class.properties.push(VariableInfo {
                        name,
                        span: span_of(member),
                        scope: SymbolScope::Local,
                    }),
                }
            }
            _ => {}
        }
    }
    Some(class)
}

fn superclass_name(class: Node, source: &[u8]) -> Option<String> {
    let mut cursor = class.walk();
    let heritage = class
        .children(&mut cursor)
        .find(|child| child.kind() == "class_heritage")?;
    first_identifier(heritage, source)
}

fn first_identifier(node: Node, source: &[u8]) -> Option<String> {
    if matches!(node.kind(), "identifier" | "type_identifier") {
        return Some(node_text(&node, source));
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.named_children(&mut cursor).collect();
    for child in children {
        if let Some(found) = first_identifier(child, source) {
            return Some(found);
        }
    }
    None
}

// ─── Variables ───

fn extract_variable_declaration(node: Node, source: &[u8], out: &mut FileAnalysis) -> Vec<String> {
    let mut declared = Vec::new();
    let mut cursor = node.walk();
    for declarator in node.named_children(&mut cursor) {
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        let Some(name_node) = declarator.child_by_field_name("name") else {
            continue;
        };
        let value = declarator.child_by_field_name("value");

        if name_node.kind() == "identifier" {
            let name = node_text(&name_node, source);
            if name.is_empty() {
                continue;
            }
            match value {
                Some(value) if is_function_value(value) => {
                    out.functions.push(function_from_value(
                        name.clone(),
                        declarator,
                        value,
                        source,
                        SymbolScope::Global,
                    ));
                }
                _ => out.variables.push(VariableInfo {
                    name: name.clone(),
                    span: span_of(declarator),
                    scope: SymbolScope::Global,
                }),
            }
            declared.push(name);
        } else {
            // Destructuring: every bound name is its own variable.
            let mut names = Vec::new();
            collect_pattern_names(name_node, source, &mut names);
            for name in names {
                out.variables.push(VariableInfo {
                    name: name.clone(),
                    span: span_of(declarator),
                    scope: SymbolScope::Global,
                });
                declared.push(name);
            }
        }
    }
    declared
}

fn is_function_value(node: Node) -> bool {
    matches!(
        node.kind(),
        "arrow_function" | "function_expression" | "function" | "generator_function"
    )
}

// ─── Imports and exports ───

fn extract_import(node: Node, source: &[u8], out: &mut FileAnalysis) {
    let Some(source_node) = node.child_by_field_name("source") else {
        return;
    };
    let specifier = string_value(&source_node, source);
    if specifier.is_empty() {
        return;
    }

    let mut names = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "import_clause" {
            collect_import_names(child, source, &mut names);
        }
    }

    out.imports.push(ImportDecl {
        external: is_external_specifier(&specifier),
        specifier,
        names,
        line: line_of(node),
    });
}

fn collect_import_names(clause: Node, source: &[u8], names: &mut Vec<String>) {
    let mut cursor = clause.walk();
    for child in clause.named_children(&mut cursor) {
        match child.kind() {
            // Default import binds a single local name.
            "identifier" => names.push(node_text(&child, source)),
            "named_imports" => {
                let mut inner = child.walk();
                for spec in child.named_children(&mut inner) {
                    if spec.kind() != "import_specifier" {
                        continue;
                    }
                    // The exporting module's name, before any `as`.
                    if let Some(name) = field_text(spec, "name", source) {
                        names.push(name);
                    }
                }
            }
            "namespace_import" => {
                if let Some(alias) = first_identifier(child, source) {
                    names.push(alias);
                }
            }
            _ => {}
        }
    }
}

fn extract_export(node: Node, source: &[u8], out: &mut FileAnalysis) {
    let line = line_of(node);
    let mut cursor = node.walk();
    let is_default = node.children(&mut cursor).any(|child| child.kind() == "default");

    // Re-export: a dependency on the source module plus named exports.
    if let Some(source_node) = node.child_by_field_name("source") {
        let specifier = string_value(&source_node, source);
        let names = export_clause_names(node, source);
        if !specifier.is_empty() {
            out.imports.push(ImportDecl {
                external: is_external_specifier(&specifier),
                specifier,
                names: names.iter().map(|(name, _)| name.clone()).collect(),
                line,
            });
        }
        for (_, exported_as) in names {
            out.exports.push(ExportDecl {
                name: exported_as,
                kind: ExportKind::Named,
                line,
            });
        }
        return;
    }

    if let Some(decl) = node.child_by_field_name("declaration") {
        let declared = extract_declaration(decl, source, out);
        let kind = if is_default {
            ExportKind::Default
        } else {
            ExportKind::Named
        };
        if declared.is_empty() && is_default {
            out.exports.push(ExportDecl {
                name: "default".to_string(),
                kind,
                line,
            });
        }
        for name in declared {
            out.exports.push(ExportDecl { name, kind, line });
        }
        return;
    }

    // `export default <expression>`
    if let Some(value) = node.child_by_field_name("value") {
        let name = if value.kind() == "identifier" {
            node_text(&value, source)
        } else {
            "default".to_string()
        };
        out.exports.push(ExportDecl {
            name,
            kind: ExportKind::Default,
            line,
        });
        return;
    }

    // `export { a, b as c }`
    for (_, exported_as) in export_clause_names(node, source) {
        out.exports.push(ExportDecl {
            name: exported_as,
            kind: ExportKind::Named,
            line,
        });
    }
}

/// `(source_name, exported_as)` pairs from an export clause.
fn export_clause_names(node: Node, source: &[u8]) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() != "export_clause" {
            continue;
        }
        let mut inner = child.walk();
        for spec in child.named_children(&mut inner) {
            if spec.kind() != "export_specifier" {
                continue;
            }
            let Some(name) = field_text(spec, "name", source) else {
                continue;
            };
            let exported_as = field_text(spec, "alias", source).unwrap_or_else(|| name.clone());
            pairs.push((name, exported_as));
        }
    }
    pairs
}

// ─── Node helpers ───

fn node_text(node: &Node, source: &[u8]) -> String {
    node.utf8_text(source).unwrap_or("").to_string()
}

fn field_text(node: Node, field: &str, source: &[u8]) -> Option<String> {
    node.child_by_field_name(field)
        .map(|child| node_text(&child, source))
        .filter(|text| !text.is_empty())
}

fn string_value(node: &Node, source: &[u8]) -> String {
    node_text(node, source)
        .trim_matches(|c| c == '\'' || c == '"' || c == '`')
        .to_string()
}

fn span_of(node: Node) -> Span {
    Span::new(node.start_position().row + 1, node.end_position().row + 1)
}

fn line_of(node: Node) -> usize {
    node.start_position().row + 1
}

#[cfg(test)]
mod tests {
    use crate::parser::parse_file;
    use crate::parser::types::{ExportKind, SymbolScope};

    #[test]
    fn counts_branches_into_complexity() {
        let src = r#"
function classify(n) {
  if (n < 0) { return "neg"; }
  for (let i = 0; i < n; i++) { n += i; }
  const label = n > 10 ? "big" : "small";
  return n && label;
}
"#;
        let analysis = parse_file("classify.js", src);
        assert_eq!(analysis.functions.len(), 1);
        let func = &analysis.functions[0];
        assert_eq!(func.name, "classify");
        assert_eq!(func.params, vec!["n"]);
        // if + for + ternary + && on a base of one
        assert_eq!(func.complexity, 5);
        assert!(func.references.is_empty());
    }

    #[test]
    fn counts_switch_cases_and_catch() {
        let src = r#"
function guard(x) {
  try {
    switch (x) {
      case 1: return a;
      default: return b;
    }
  } catch (e) { log(e); }
}
"#;
        let func = &parse_file("guard.js", src).functions[0];
        // one valued case plus the catch clause; default arm is free
        assert_eq!(func.complexity, 3);
        let callees: Vec<_> = func.calls.iter().map(|c| c.callee.as_str()).collect();
        assert_eq!(callees, vec!["log"]);
        let refs: Vec<_> = func.references.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(refs, vec!["a", "b"]);
    }

    #[test]
    fn records_direct_and_member_calls_once() {
        let src = r#"
function run(items) {
  const out = items.map(step);
  step(out);
  step(out);
  return helper.finish(out);
}
"#;
        let func = &parse_file("run.js", src).functions[0];
        let callees: Vec<_> = func.calls.iter().map(|c| c.callee.as_str()).collect();
        assert_eq!(callees, vec!["map", "step", "finish"]);
        // the member object is a free reference, the callees are not
        let refs: Vec<_> = func.references.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(refs, vec!["helper"]);
    }

    #[test]
    fn references_exclude_params_locals_and_nested_names() {
        let src = r#"
function outer(a) {
  const b = transform(a);
  function inner(c) { return c + b; }
  return inner(b) || fallback;
}
"#;
        let func = &parse_file("outer.js", src).functions[0];
        let callees: Vec<_> = func.calls.iter().map(|c| c.callee.as_str()).collect();
        assert_eq!(callees, vec!["transform", "inner"]);
        let refs: Vec<_> = func.references.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(refs, vec!["fallback"]);
        assert_eq!(func.complexity, 2);
    }

    #[test]
    fn called_names_never_double_as_references() {
        let src = r#"
function run(x) {
  handler();
  return wrap(handler);
}
"#;
        let func = &parse_file("run.js", src).functions[0];
        let callees: Vec<_> = func.calls.iter().map(|c| c.callee.as_str()).collect();
        assert_eq!(callees, vec!["handler", "wrap"]);
        // passed-as-value use of a called name stays a call, not a reference
        assert!(func.references.is_empty());
    }

    #[test]
    fn destructured_parameters_are_bound() {
        let src = r#"
function pick({ id, name }, [first]) { return id || name || first; }
"#;
        let func = &parse_file("pick.js", src).functions[0];
        assert_eq!(func.params, vec!["id", "name", "first"]);
        assert!(func.references.is_empty());
        assert_eq!(func.complexity, 3);
    }

    #[test]
    fn arrow_assigned_to_const_is_a_function() {
        let src = r#"
const fetchUser = async (id) => { return api.get(id); };
let plain = 5;
"#;
        let analysis = parse_file("fetch.ts", src);
        assert_eq!(analysis.functions.len(), 1);
        let func = &analysis.functions[0];
        assert_eq!(func.name, "fetchUser");
        assert_eq!(func.calls[0].callee, "get");
        assert_eq!(func.references[0].name, "api");
        assert_eq!(analysis.variables.len(), 1);
        assert_eq!(analysis.variables[0].name, "plain");
    }

    #[test]
    fn extracts_class_shape() {
        let src = r#"
export class Repo extends Base {
  size = 0;
  load(id) { return fetch(id); }
}
"#;
        let analysis = parse_file("repo.ts", src);
        assert_eq!(analysis.classes.len(), 1);
        let class = &analysis.classes[0];
        assert_eq!(class.name, "Repo");
        assert_eq!(class.superclass.as_deref(), Some("Base"));
        assert_eq!(class.scope, SymbolScope::Global);
        assert_eq!(class.properties.len(), 1);
        assert_eq!(class.properties[0].name, "size");
        assert_eq!(class.methods.len(), 1);
        assert_eq!(class.methods[0].name, "load");
        assert_eq!(class.methods[0].scope, SymbolScope::Local);
        assert_eq!(class.methods[0].calls[0].callee, "fetch");

        assert_eq!(analysis.exports.len(), 1);
        assert_eq!(analysis.exports[0].name, "Repo");
        assert_eq!(analysis.exports[0].kind, ExportKind::Named);
    }

    #[test]
    fn extracts_import_forms() {
        let src = r#"
import Default from './a';
import { one, two as three } from './b';
import * as ns from 'pkg';
import './side';
"#;
        let analysis = parse_file("imports.ts", src);
        assert_eq!(analysis.imports.len(), 4);

        assert_eq!(analysis.imports[0].specifier, "./a");
        assert_eq!(analysis.imports[0].names, vec!["Default"]);
        assert!(!analysis.imports[0].external);

        // named imports keep the exported name, not the alias
        assert_eq!(analysis.imports[1].names, vec!["one", "two"]);

        assert_eq!(analysis.imports[2].specifier, "pkg");
        assert!(analysis.imports[2].external);

        assert_eq!(analysis.imports[3].specifier, "./side");
        assert!(analysis.imports[3].names.is_empty());
    }

    #[test]
    fn extracts_export_forms() {
        let src = r#"
export function f() {}
export default class Main {}
const hidden = 1;
export { hidden as visible };
"#;
        let analysis = parse_file("exports.ts", src);
        let exports: Vec<_> = analysis
            .exports
            .iter()
            .map(|e| (e.name.as_str(), e.kind))
            .collect();
        assert_eq!(
            exports,
            vec![
                ("f", ExportKind::Named),
                ("Main", ExportKind::Default),
                ("visible", ExportKind::Named),
            ]
        );
        assert_eq!(analysis.functions.len(), 1);
        assert_eq!(analysis.classes.len(), 1);
        assert_eq!(analysis.variables.len(), 1);
    }

    #[test]
    fn reexport_records_both_sides() {
        let src = r#"
export { helper } from './util';
"#;
        let analysis = parse_file("barrel.ts", src);
        assert_eq!(analysis.imports.len(), 1);
        assert_eq!(analysis.imports[0].specifier, "./util");
        assert_eq!(analysis.imports[0].names, vec!["helper"]);
        assert_eq!(analysis.exports.len(), 1);
        assert_eq!(analysis.exports[0].name, "helper");
    }

    #[test]
    fn syntax_errors_keep_the_valid_parts() {
        let src = r#"
function ok() { return 1; }
function broken(((
"#;
        let analysis = parse_file("broken.js", src);
        assert!(analysis.functions.iter().any(|f| f.name == "ok"));
    }

    #[test]
    fn tsx_components_are_functions() {
        let src = r#"
const App = () => <div onClick={handle} />;
"#;
        let analysis = parse_file("App.tsx", src);
        assert_eq!(analysis.functions.len(), 1);
        assert_eq!(analysis.functions[0].name, "App");
        let refs: Vec<_> = analysis.functions[0]
            .references
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(refs, vec!["handle"]);
    }
}
