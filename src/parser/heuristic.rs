//! Line-heuristic front end for languages outside the grammar family.
//!
//! This is deliberately approximate: declarations are matched by keyword
//! prefixes, bodies by brace depth or indentation, branches and calls by
//! token scanning. Files in these languages get coarser data than the
//! grammar family, and emit no free-variable references at all.

use std::collections::HashSet;

use tracing::debug;

use super::types::{
    CallSite, ClassInfo, ExportDecl, ExportKind, FileAnalysis, FunctionInfo, ImportDecl, Span,
    SymbolScope, VariableInfo,
};
use super::{is_external_specifier, Language};

#[derive(Clone, Copy, PartialEq)]
enum BlockStyle {
    Braces,
    Indent,
}

#[derive(Clone, Copy, PartialEq)]
enum ParamStyle {
    /// `name type` or bare `name` (Go, Python, Rust).
    First,
    /// `type name` (Java, C#, C, C++).
    Last,
}

struct LineRules {
    fn_markers: &'static [&'static str],
    class_markers: &'static [&'static str],
    var_markers: &'static [&'static str],
    modifiers: &'static [&'static str],
    comment: &'static str,
    blocks: BlockStyle,
    params: ParamStyle,
    /// Bare `NAME = value` lines at the left margin count as variables.
    margin_assignments: bool,
}

fn rules_for(language: Language) -> LineRules {
    match language {
        Language::Python => LineRules {
            fn_markers: &["def "],
            class_markers: &["class "],
            var_markers: &[],
            modifiers: &["async "],
            comment: "#",
            blocks: BlockStyle::Indent,
            params: ParamStyle::First,
            margin_assignments: true,
        },
        Language::Rust => LineRules {
            fn_markers: &["fn ", "const fn "],
            class_markers: &["struct ", "enum ", "trait "],
            var_markers: &["const ", "static ", "let "],
            modifiers: &["pub(crate) ", "pub(super) ", "pub ", "async ", "unsafe "],
            comment: "//",
            blocks: BlockStyle::Braces,
            params: ParamStyle::First,
            margin_assignments: false,
        },
        Language::Go => LineRules {
            fn_markers: &["func "],
            class_markers: &["type "],
            var_markers: &["var ", "const "],
            modifiers: &[],
            comment: "//",
            blocks: BlockStyle::Braces,
            params: ParamStyle::First,
            margin_assignments: false,
        },
        Language::Java => LineRules {
            fn_markers: &[],
            class_markers: &["class ", "interface ", "enum ", "record "],
            var_markers: &[],
            modifiers: &[
                "public ",
                "private ",
                "protected ",
                "static ",
                "final ",
                "abstract ",
                "synchronized ",
                "native ",
                "default ",
            ],
            comment: "//",
            blocks: BlockStyle::Braces,
            params: ParamStyle::Last,
            margin_assignments: false,
        },
        Language::CSharp => LineRules {
            fn_markers: &[],
            class_markers: &["class ", "interface ", "struct ", "enum ", "record "],
            var_markers: &[],
            modifiers: &[
                "public ",
                "private ",
                "protected ",
                "internal ",
                "static ",
                "sealed ",
                "abstract ",
                "virtual ",
                "override ",
                "async ",
                "partial ",
                "readonly ",
            ],
            comment: "//",
            blocks: BlockStyle::Braces,
            params: ParamStyle::Last,
            margin_assignments: false,
        },
        Language::C => LineRules {
            fn_markers: &[],
            class_markers: &["struct ", "union ", "enum "],
            var_markers: &["#define "],
            modifiers: &["static ", "inline ", "extern "],
            comment: "//",
            blocks: BlockStyle::Braces,
            params: ParamStyle::Last,
            margin_assignments: false,
        },
        Language::Cpp => LineRules {
            fn_markers: &[],
            class_markers: &["class ", "struct ", "enum "],
            var_markers: &["#define "],
            modifiers: &["static ", "inline ", "extern ", "virtual ", "constexpr "],
            comment: "//",
            blocks: BlockStyle::Braces,
            params: ParamStyle::Last,
            margin_assignments: false,
        },
        Language::Ruby => LineRules {
            fn_markers: &["def "],
            class_markers: &["class ", "module "],
            var_markers: &[],
            modifiers: &[],
            comment: "#",
            blocks: BlockStyle::Indent,
            params: ParamStyle::First,
            margin_assignments: false,
        },
        _ => LineRules {
            fn_markers: &["function ", "def ", "fn ", "func ", "sub ", "proc "],
            class_markers: &["class ", "struct ", "interface "],
            var_markers: &[],
            modifiers: &["public ", "private ", "static ", "export ", "async "],
            comment: "//",
            blocks: BlockStyle::Braces,
            params: ParamStyle::First,
            margin_assignments: true,
        },
    }
}

pub(super) fn parse(path: &str, content: &str, language: Language) -> FileAnalysis {
    let rules = rules_for(language);
    let lines: Vec<&str> = content.lines().collect();
    let mut out = FileAnalysis::empty(path, language);

    let mut i = 0;
    while i < lines.len() {
        let raw = lines[i];
        let trimmed = raw.trim_start();
        if trimmed.is_empty() || is_comment(trimmed, &rules) {
            i += 1;
            continue;
        }

        let explicit_pub = trimmed.starts_with("pub ") || trimmed.starts_with("pub(");
        let stripped = strip_modifiers(trimmed, rules.modifiers);

        // Go groups imports in a parenthesized block.
        if language == Language::Go && stripped.starts_with("import (") {
            let mut j = i + 1;
            while j < lines.len() && !lines[j].trim_start().starts_with(')') {
                if let Some(spec) = quoted(lines[j]) {
                    out.imports.push(ImportDecl {
                        external: is_external_specifier(&spec),
                        specifier: spec,
                        names: Vec::new(),
                        line: j + 1,
                    });
                }
                j += 1;
            }
            i = j + 1;
            continue;
        }

        let imports = parse_imports(language, trimmed, i + 1);
        if !imports.is_empty() {
            out.imports.extend(imports);
            i += 1;
            continue;
        }

        if let Some((name, superclass)) = match_class(stripped, &rules, language) {
            let (class, next) = scan_class(&lines, i, name, superclass, &rules, language);
            record_export(&mut out, language, explicit_pub, &class.name, i + 1);
            out.classes.push(class);
            i = next;
            continue;
        }

        if let Some((name, params)) = match_function(stripped, &rules) {
            let (func, next) =
                scan_function(&lines, i, name, params, SymbolScope::Global, &rules);
            record_export(&mut out, language, explicit_pub, &func.name, i + 1);
            out.functions.push(func);
            i = next;
            continue;
        }

        let at_margin = raw.len() == trimmed.len();
        if at_margin {
            if let Some(name) = match_variable(stripped, &rules) {
                record_export(&mut out, language, explicit_pub, &name, i + 1);
                out.variables.push(VariableInfo {
                    name,
                    span: Span::line(i + 1),
                    scope: SymbolScope::Global,
                });
            }
        }
        i += 1;
    }

    debug!(
        path,
        functions = out.functions.len(),
        classes = out.classes.len(),
        imports = out.imports.len(),
        "heuristic extraction complete"
    );
    out
}

fn is_comment(trimmed: &str, rules: &LineRules) -> bool {
    trimmed.starts_with(rules.comment)
        || trimmed.starts_with("/*")
        || trimmed.starts_with("* ")
}

fn strip_modifiers<'a>(mut line: &'a str, modifiers: &[&str]) -> &'a str {
    loop {
        let mut stripped = false;
        for modifier in modifiers {
            if let Some(rest) = line.strip_prefix(modifier) {
                line = rest.trim_start();
                stripped = true;
            }
        }
        if !stripped {
            return line;
        }
    }
}

// ─── Declarations ───

fn match_function(stripped: &str, rules: &LineRules) -> Option<(String, Vec<String>)> {
    if !rules.fn_markers.is_empty() {
        for marker in rules.fn_markers {
            if let Some(rest) = stripped.strip_prefix(marker) {
                return parse_signature(rest.trim_start(), rules);
            }
        }
        return None;
    }

    // Markerless languages: `type name(args) {` after modifier stripping.
    if stripped.ends_with(';') || !stripped.ends_with('{') {
        return None;
    }
    let paren = stripped.find('(')?;
    let head = &stripped[..paren];
    if head.contains('=') || head.contains('"') {
        return None;
    }
    let name = trailing_ident(head);
    let name = name.rsplit("::").next().unwrap_or(name);
    if name.is_empty() || CALL_KEYWORDS.contains(&name) {
        return None;
    }
    let params = matching_paren_slice(&stripped[paren..])
        .map(|inner| parse_params(inner, rules.params))
        .unwrap_or_default();
    Some((name.to_string(), params))
}

fn parse_signature(rest: &str, rules: &LineRules) -> Option<(String, Vec<String>)> {
    let mut rest = rest.trim_start();
    // Go method receivers: `func (s *Server) Start(…)`.
    if rest.starts_with('(') {
        let inner = matching_paren_slice(rest)?;
        rest = rest[inner.len() + 2..].trim_start();
    }
    let name = leading_ident(rest);
    if name.is_empty() {
        return None;
    }
    let after_name = &rest[name.len()..];
    let params = after_name
        .find('(')
        .and_then(|idx| matching_paren_slice(&after_name[idx..]))
        .map(|inner| parse_params(inner, rules.params))
        .unwrap_or_default();
    Some((name.to_string(), params))
}

fn parse_params(inner: &str, style: ParamStyle) -> Vec<String> {
    inner
        .split(',')
        .filter_map(|piece| param_name(piece, style))
        .collect()
}

fn param_name(piece: &str, style: ParamStyle) -> Option<String> {
    let head = piece.split([':', '=']).next().unwrap_or("").trim();
    if head.is_empty() {
        return None;
    }
    let token = match style {
        ParamStyle::First => head.split_whitespace().next(),
        ParamStyle::Last => head.split_whitespace().last(),
    }?;
    let token = token.trim_matches(|c| matches!(c, '*' | '&' | '[' | ']'));
    let token = token.strip_prefix("mut ").unwrap_or(token);
    if token.is_empty()
        || matches!(token, "self" | "cls" | "this" | "mut" | "void")
        || !token.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
    {
        return None;
    }
    Some(leading_ident(token).to_string())
}

fn match_class(
    stripped: &str,
    rules: &LineRules,
    language: Language,
) -> Option<(String, Option<String>)> {
    for marker in rules.class_markers {
        if let Some(rest) = stripped.strip_prefix(marker) {
            let rest = rest.trim_start();
            let name = leading_ident(rest);
            if name.is_empty() {
                return None;
            }
            let superclass = superclass_of(&rest[name.len()..], language);
            return Some((name.to_string(), superclass));
        }
    }
    None
}

fn superclass_of(rest: &str, language: Language) -> Option<String> {
    match language {
        Language::Python => {
            let inner = matching_paren_slice(rest.trim_start())?;
            let first = first_ident(inner)?;
            (first != "object").then_some(first)
        }
        Language::Ruby => first_ident(rest.split_once('<')?.1),
        Language::CSharp | Language::Cpp => {
            let after = rest.split_once(':')?.1;
            let after = after
                .trim_start()
                .trim_start_matches("public ")
                .trim_start_matches("private ")
                .trim_start_matches("protected ")
                .trim_start_matches("virtual ");
            first_ident(after)
        }
        _ => first_ident(rest.split_once("extends ")?.1),
    }
}

fn match_variable(stripped: &str, rules: &LineRules) -> Option<String> {
    for marker in rules.var_markers {
        if let Some(rest) = stripped.strip_prefix(marker) {
            let rest = rest.trim_start();
            let rest = rest.strip_prefix("mut ").unwrap_or(rest);
            let name = leading_ident(rest);
            if !name.is_empty() {
                return Some(name.to_string());
            }
            return None;
        }
    }
    if rules.margin_assignments {
        let name = leading_ident(stripped);
        if name.is_empty() {
            return None;
        }
        let rest = stripped[name.len()..].trim_start();
        if rest.starts_with('=') && !rest.starts_with("==") {
            return Some(name.to_string());
        }
    }
    None
}

fn match_field(stripped: &str, language: Language) -> Option<String> {
    if stripped.contains('(') {
        return None;
    }
    match language {
        Language::Rust => {
            let head = stripped.split_once(':')?.0.trim();
            ident_only(head)
        }
        Language::Go => {
            let mut tokens = stripped.split_whitespace();
            let first = tokens.next()?;
            tokens.next()?;
            ident_only(first)
        }
        Language::Java | Language::CSharp | Language::C | Language::Cpp => {
            if !stripped.ends_with(';') {
                return None;
            }
            let head = stripped.trim_end_matches(';');
            let head = head.split('=').next().unwrap_or(head).trim();
            let mut tokens = head.split_whitespace();
            // need a type token before the name
            tokens.next()?;
            let last = tokens.last()?;
            ident_only(last.trim_matches(|c| matches!(c, '*' | '&' | '[' | ']')))
        }
        Language::Python | Language::Ruby => {
            let name = leading_ident(stripped);
            if name.is_empty() {
                return None;
            }
            let rest = stripped[name.len()..].trim_start();
            (rest.starts_with('=') && !rest.starts_with("==")).then(|| name.to_string())
        }
        _ => None,
    }
}

// ─── Body scanning ───

fn scan_function(
    lines: &[&str],
    start: usize,
    name: String,
    params: Vec<String>,
    scope: SymbolScope,
    rules: &LineRules,
) -> (FunctionInfo, usize) {
    let end = block_end(lines, start, rules);
    let mut complexity = 1u32;
    let mut calls = Vec::new();
    let mut seen = HashSet::new();

    for (j, line) in lines.iter().enumerate().take(end + 1).skip(start) {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || is_comment(trimmed, rules) {
            continue;
        }
        complexity += count_branches(trimmed);
        for callee in line_callees(trimmed) {
            if j == start && callee == name {
                continue;
            }
            if seen.insert(callee.clone()) {
                calls.push(CallSite {
                    callee,
                    line: j + 1,
                });
            }
        }
    }

    let func = FunctionInfo {
        name,
        params,
        span: Span::new(start + 1, end + 1),
        scope,
        complexity,
        calls,
        references: Vec::new(),
    };
    (func, end + 1)
}

fn scan_class(
    lines: &[&str],
    start: usize,
    name: String,
    superclass: Option<String>,
    rules: &LineRules,
    language: Language,
) -> (ClassInfo, usize) {
    let end = block_end(lines, start, rules);
    let mut class = ClassInfo {
        name,
        span: Span::new(start + 1, end + 1),
        scope: SymbolScope::Global,
        superclass,
        methods: Vec::new(),
        properties: Vec::new(),
    };

    let mut j = start + 1;
    while j <= end {
        let trimmed = lines[j].trim_start();
        if trimmed.is_empty() || is_comment(trimmed, rules) {
            j += 1;
            continue;
        }
        let stripped = strip_modifiers(trimmed, rules.modifiers);
        if let Some((fname, fparams)) = match_function(stripped, rules) {
            let (method, next) =
                scan_function(lines, j, fname, fparams, SymbolScope::Local, rules);
            class.methods.push(method);
            j = next.clamp(j + 1, end + 1);
            continue;
        }
        if let Some(field) = match_field(stripped, language) {
            class.properties.push(VariableInfo {
                name: field,
                span: Span::line(j + 1),
                scope: SymbolScope::Local,
            });
        }
        j += 1;
    }
    (class, end + 1)
}

fn block_end(lines: &[&str], start: usize, rules: &LineRules) -> usize {
    match rules.blocks {
        BlockStyle::Braces => brace_block_end(lines, start),
        BlockStyle::Indent => indent_block_end(lines, start),
    }
}

fn brace_block_end(lines: &[&str], start: usize) -> usize {
    let mut depth = 0i32;
    let mut opened = false;
    for (j, line) in lines.iter().enumerate().skip(start) {
        for ch in line.chars() {
            match ch {
                '{' => {
                    depth += 1;
                    opened = true;
                }
                '}' => depth -= 1,
                _ => {}
            }
        }
        if opened && depth <= 0 {
            return j;
        }
        if !opened && line.trim_end().ends_with(';') {
            return j;
        }
    }
    lines.len().saturating_sub(1)
}

fn indent_block_end(lines: &[&str], start: usize) -> usize {
    let base = indent_of(lines[start]);
    let mut end = start;
    for (j, line) in lines.iter().enumerate().skip(start + 1) {
        if line.trim_start().is_empty() {
            continue;
        }
        if indent_of(line) <= base {
            break;
        }
        end = j;
    }
    end
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

const BRANCH_TOKENS: &[&str] = &[
    "if ", "if(", "while ", "while(", "for ", "for(", "case ", "when ", "except", "rescue",
    "catch", "&&", "||", " ? ",
];

fn count_branches(line: &str) -> u32 {
    BRANCH_TOKENS
        .iter()
        .map(|token| line.matches(token).count() as u32)
        .sum()
}

const CALL_KEYWORDS: &[&str] = &[
    "if", "elif", "else", "for", "while", "switch", "case", "catch", "except", "return", "match",
    "when", "def", "fn", "func", "function", "new", "do", "try", "raise", "throw", "assert",
    "yield", "await", "not", "and", "or", "in", "is", "typeof", "sizeof", "delete", "lambda",
    "unless", "until", "defer", "go", "super", "with",
];

/// Identifiers immediately followed by `(`.
fn line_callees(line: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut ident_start: Option<usize> = None;
    let mut ident_end = 0;
    for (idx, ch) in line.char_indices() {
        if ch.is_alphanumeric() || ch == '_' {
            if ident_start.is_none() {
                ident_start = Some(idx);
            }
            ident_end = idx + ch.len_utf8();
        } else {
            if ch == '(' {
                if let Some(start) = ident_start {
                    if ident_end == idx {
                        let name = &line[start..idx];
                        if is_callee(name) {
                            out.push(name.to_string());
                        }
                    }
                }
            }
            ident_start = None;
        }
    }
    out
}

fn is_callee(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
        && !CALL_KEYWORDS.contains(&name)
}

// ─── Imports ───

fn parse_imports(language: Language, trimmed: &str, line: usize) -> Vec<ImportDecl> {
    match language {
        Language::Python => python_imports(trimmed, line),
        Language::Go => go_import(trimmed, line).into_iter().collect(),
        Language::Rust => rust_import(trimmed, line).into_iter().collect(),
        Language::Ruby => ruby_import(trimmed, line).into_iter().collect(),
        Language::C | Language::Cpp => c_include(trimmed, line).into_iter().collect(),
        Language::Java | Language::CSharp => dotted_import(trimmed, line).into_iter().collect(),
        Language::JavaScript | Language::TypeScript | Language::Tsx => Vec::new(),
        _ => generic_import(trimmed, line).into_iter().collect(),
    }
}

fn python_imports(trimmed: &str, line: usize) -> Vec<ImportDecl> {
    if let Some(rest) = trimmed.strip_prefix("from ") {
        let Some((module, names)) = rest.split_once(" import ") else {
            return Vec::new();
        };
        let specifier = python_module_path(module.trim());
        let names = names
            .split(',')
            .map(|n| {
                n.split(" as ")
                    .next()
                    .unwrap_or("")
                    .trim()
                    .trim_matches(|c| matches!(c, '(' | ')' | '\\'))
                    .to_string()
            })
            .filter(|n| !n.is_empty() && n != "*")
            .collect();
        return vec![ImportDecl {
            external: is_external_specifier(&specifier),
            specifier,
            names,
            line,
        }];
    }
    if let Some(rest) = trimmed.strip_prefix("import ") {
        return rest
            .split(',')
            .filter_map(|module| {
                let module = module.split(" as ").next().unwrap_or("").trim();
                if module.is_empty() {
                    return None;
                }
                let specifier = python_module_path(module);
                Some(ImportDecl {
                    external: is_external_specifier(&specifier),
                    specifier,
                    names: Vec::new(),
                    line,
                })
            })
            .collect();
    }
    Vec::new()
}

/// Dotted module path to a slash path, preserving relative prefixes:
/// `.sibling` joins the current package, `..pkg.mod` walks one level up.
fn python_module_path(module: &str) -> String {
    let dots = module.chars().take_while(|c| *c == '.').count();
    let rest = module[dots..].replace('.', "/");
    match dots {
        0 => rest,
        1 => format!("./{rest}"),
        n => format!("{}{rest}", "../".repeat(n - 1)),
    }
}

fn go_import(trimmed: &str, line: usize) -> Option<ImportDecl> {
    let rest = trimmed.strip_prefix("import ")?;
    let specifier = quoted(rest)?;
    Some(ImportDecl {
        external: is_external_specifier(&specifier),
        specifier,
        names: Vec::new(),
        line,
    })
}

fn rust_import(trimmed: &str, line: usize) -> Option<ImportDecl> {
    let rest = trimmed.strip_prefix("use ")?;
    let rest = rest.trim_end().trim_end_matches(';');
    let (path, names) = match rest.split_once('{') {
        Some((head, group)) => {
            let names = group
                .trim_end_matches('}')
                .split(',')
                .map(|n| n.split(" as ").next().unwrap_or("").trim().to_string())
                .filter(|n| !n.is_empty() && n != "self" && n != "*")
                .collect();
            (head.trim_end_matches("::").to_string(), names)
        }
        None => {
            let segments: Vec<&str> = rest.split("::").collect();
            match segments.split_last() {
                Some((last, head)) if !head.is_empty() && last.trim() != "*" => {
                    (head.join("::"), vec![last.trim().to_string()])
                }
                Some((_, head)) if !head.is_empty() => (head.join("::"), Vec::new()),
                _ => (rest.to_string(), Vec::new()),
            }
        }
    };
    let specifier = path.split("::").map(str::trim).collect::<Vec<_>>().join("/");
    if specifier.is_empty() {
        return None;
    }
    Some(ImportDecl {
        external: is_external_specifier(&specifier),
        specifier,
        names,
        line,
    })
}

fn ruby_import(trimmed: &str, line: usize) -> Option<ImportDecl> {
    if let Some(rest) = trimmed.strip_prefix("require_relative ") {
        let spec = quoted(rest)?;
        let specifier = if spec.starts_with('.') {
            spec
        } else {
            format!("./{spec}")
        };
        return Some(ImportDecl {
            external: false,
            specifier,
            names: Vec::new(),
            line,
        });
    }
    let rest = trimmed.strip_prefix("require ")?;
    let specifier = quoted(rest)?;
    Some(ImportDecl {
        external: is_external_specifier(&specifier),
        specifier,
        names: Vec::new(),
        line,
    })
}

fn c_include(trimmed: &str, line: usize) -> Option<ImportDecl> {
    let rest = trimmed.strip_prefix("#include")?.trim_start();
    if let Some(spec) = quoted(rest) {
        // Quoted includes resolve relative to the including file.
        let specifier = if spec.starts_with('.') {
            spec
        } else {
            format!("./{spec}")
        };
        return Some(ImportDecl {
            external: false,
            specifier,
            names: Vec::new(),
            line,
        });
    }
    let inner = rest.strip_prefix('<')?.split('>').next()?;
    Some(ImportDecl {
        external: true,
        specifier: inner.to_string(),
        names: Vec::new(),
        line,
    })
}

fn dotted_import(trimmed: &str, line: usize) -> Option<ImportDecl> {
    let rest = trimmed
        .strip_prefix("import ")
        .or_else(|| trimmed.strip_prefix("using "))?;
    if rest.starts_with('(') {
        return None;
    }
    let rest = rest.trim_end().trim_end_matches(';');
    let rest = rest.strip_prefix("static ").unwrap_or(rest);
    let rest = rest.split('=').next_back().unwrap_or(rest).trim();
    if rest.is_empty() || rest.contains(' ') || rest.contains('(') {
        return None;
    }
    Some(ImportDecl {
        external: true,
        specifier: rest.replace('.', "/"),
        names: Vec::new(),
        line,
    })
}

fn generic_import(trimmed: &str, line: usize) -> Option<ImportDecl> {
    if trimmed.starts_with("from ") {
        return python_imports(trimmed, line).into_iter().next();
    }
    for marker in ["import ", "include ", "require ", "use "] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            let specifier = quoted(rest).unwrap_or_else(|| {
                rest.trim_end()
                    .trim_end_matches(';')
                    .trim_matches(|c| matches!(c, '\'' | '"'))
                    .to_string()
            });
            if specifier.is_empty() {
                return None;
            }
            return Some(ImportDecl {
                external: is_external_specifier(&specifier),
                specifier,
                names: Vec::new(),
                line,
            });
        }
    }
    None
}

// ─── Export/visibility heuristics ───

fn record_export(
    out: &mut FileAnalysis,
    language: Language,
    explicit_pub: bool,
    name: &str,
    line: usize,
) {
    let exported = match language {
        Language::Rust => explicit_pub,
        Language::Go => name.chars().next().is_some_and(|c| c.is_uppercase()),
        _ => false,
    };
    if exported {
        out.exports.push(ExportDecl {
            name: name.to_string(),
            kind: ExportKind::Named,
            line,
        });
    }
}

// ─── Token helpers ───

fn leading_ident(s: &str) -> &str {
    let end = s
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(s.len());
    &s[..end]
}

fn trailing_ident(s: &str) -> &str {
    let trimmed = s.trim_end();
    // Strip the trailing identifier run rather than indexing past the
    // last non-identifier char, which may be multi-byte.
    let head = trimmed.trim_end_matches(|c: char| c.is_alphanumeric() || c == '_' || c == ':');
    &trimmed[head.len()..]
}

fn first_ident(s: &str) -> Option<String> {
    let start = s.find(|c: char| c.is_alphabetic() || c == '_')?;
    let ident = leading_ident(&s[start..]);
    (!ident.is_empty()).then(|| ident.to_string())
}

fn ident_only(s: &str) -> Option<String> {
    (!s.is_empty()
        && s.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
        && s.chars().all(|c| c.is_alphanumeric() || c == '_'))
    .then(|| s.to_string())
}

/// First single- or double-quoted string on the line.
fn quoted(line: &str) -> Option<String> {
    for quote in ['"', '\''] {
        if let Some(start) = line.find(quote) {
            if let Some(len) = line[start + 1..].find(quote) {
                return Some(line[start + 1..start + 1 + len].to_string());
            }
        }
    }
    None
}

/// Contents of the parenthesized group that `s` begins with.
fn matching_paren_slice(s: &str) -> Option<&str> {
    let open = s.find('(')?;
    let mut depth = 0i32;
    for (idx, ch) in s.char_indices().skip(open) {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[open + 1..idx]);
                }
            }
            _ => {}
        }
    }
    None
}
