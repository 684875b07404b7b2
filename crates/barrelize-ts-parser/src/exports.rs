//! Export statement collection from a parsed syntax tree.
//!
//! [`collect_exports`] turns each top-level `export` statement into one or
//! more [`ExportStatement`]s. Wildcard re-exports are reported unresolved;
//! following them to disk is the extractor's job.
//!
//! | Source | Result |
//! |--------|--------|
//! | `export const a = 1, { b } = o;` | `a`, `b` (value) |
//! | `export function f() {}` / `class` / `enum` / `namespace` | name (value) |
//! | `export interface I {}` / `export type T = ..` | name (type) |
//! | `export { a, b as c }` | `a`, `c` |
//! | `export type { T }` / `export { type T }` | `T` (type) |
//! | `export default ...` | `default` |
//! | `export * as ns from './x'` | `ns` (value) |
//! | `export * from './x'` | re-export of `./x` |

use barrelize_core::{ExportInfo, ExportKind};
use smallvec::SmallVec;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor, Tree};

use crate::queries::CAPTURE_EXPORT;

/// One item of a file's export surface, before re-export resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatement {
    /// A symbol declared or re-exported by name.
    Symbol(ExportInfo),
    /// `export * from '<specifier>'`.
    ReExportAll {
        /// The module specifier, without quotes.
        specifier: String,
    },
}

/// Collects export statements from `tree` in declaration order.
///
/// Uses `SmallVec<[ExportStatement; 8]>` to avoid heap allocation for
/// typical modules.
pub fn collect_exports(tree: &Tree, source: &str, query: &Query) -> SmallVec<[ExportStatement; 8]> {
    let mut out = SmallVec::new();
    let bytes = source.as_bytes();

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, tree.root_node(), bytes);

    while let Some(found) = matches.next() {
        for capture in found.captures {
            if capture.index == CAPTURE_EXPORT {
                statement_exports(capture.node, bytes, &mut out);
            }
        }
    }

    out
}

fn statement_exports(node: Node<'_>, src: &[u8], out: &mut SmallVec<[ExportStatement; 8]>) {
    let mut is_default = false;
    let mut is_star = false;
    let mut type_only = false;

    let mut walk = node.walk();
    for child in node.children(&mut walk) {
        match child.kind() {
            "default" if !child.is_named() => is_default = true,
            "*" if !child.is_named() => is_star = true,
            "type" if !child.is_named() => type_only = true,
            _ => {}
        }
    }

    if is_default {
        let local = node
            .child_by_field_name("declaration")
            .or_else(|| node.child_by_field_name("value"))
            .and_then(|decl| default_local_name(decl, src));
        let info = ExportInfo::value("default");
        let info = match local {
            Some(local) => info.with_local_name(local),
            None => info,
        };
        out.push(ExportStatement::Symbol(info));
        return;
    }

    if let Some(decl) = node.child_by_field_name("declaration") {
        declaration_exports(decl, src, out);
        return;
    }

    let mut walk = node.walk();
    for child in node.named_children(&mut walk) {
        match child.kind() {
            "namespace_export" => {
                if let Some(alias) = last_named_text(child, src) {
                    out.push(ExportStatement::Symbol(ExportInfo::value(alias)));
                }
            }
            "export_clause" => clause_exports(child, src, type_only, out),
            _ => {}
        }
    }

    if is_star {
        if let Some(specifier) = node
            .child_by_field_name("source")
            .map(|s| unquote(text(s, src)).to_owned())
        {
            out.push(ExportStatement::ReExportAll { specifier });
        }
    }
}

fn declaration_exports(decl: Node<'_>, src: &[u8], out: &mut SmallVec<[ExportStatement; 8]>) {
    match decl.kind() {
        "lexical_declaration" | "variable_declaration" => {
            let mut walk = decl.walk();
            for declarator in decl.named_children(&mut walk) {
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                if let Some(pattern) = declarator.child_by_field_name("name") {
                    let mut names = Vec::new();
                    binding_names(pattern, src, &mut names);
                    for name in names {
                        push_symbol(out, name, ExportKind::Value);
                    }
                }
            }
        }
        "interface_declaration" | "type_alias_declaration" => {
            if let Some(name) = decl.child_by_field_name("name") {
                push_symbol(out, text(name, src), ExportKind::Type);
            }
        }
        "function_declaration"
        | "generator_function_declaration"
        | "function_signature"
        | "class_declaration"
        | "abstract_class_declaration"
        | "enum_declaration"
        | "internal_module"
        | "module" => {
            if let Some(name) = decl.child_by_field_name("name") {
                // `declare module 'pkg'` names a string, not a binding.
                if name.kind() != "string" {
                    push_symbol(out, text(name, src), ExportKind::Value);
                }
            }
        }
        // `export declare ...` emits no runtime binding.
        "ambient_declaration" => {
            let start = out.len();
            let mut walk = decl.walk();
            let inner: Vec<_> = decl.named_children(&mut walk).collect();
            for child in inner {
                declaration_exports(child, src, out);
            }
            for statement in &mut out[start..] {
                if let ExportStatement::Symbol(info) = statement {
                    info.kind = ExportKind::Type;
                }
            }
        }
        _ => {}
    }
}

fn push_symbol(out: &mut SmallVec<[ExportStatement; 8]>, name: &str, kind: ExportKind) {
    out.push(ExportStatement::Symbol(ExportInfo::new(name, kind)));
}

/// Collects bound identifiers from a declarator name, descending into
/// destructuring patterns.
fn binding_names<'s>(node: Node<'_>, src: &'s [u8], names: &mut Vec<&'s str>) {
    match node.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => names.push(text(node, src)),
        "pair_pattern" => {
            if let Some(value) = node.child_by_field_name("value") {
                binding_names(value, src, names);
            }
        }
        "assignment_pattern" | "object_assignment_pattern" => {
            if let Some(left) = node.child_by_field_name("left") {
                binding_names(left, src, names);
            }
        }
        "object_pattern" | "array_pattern" | "rest_pattern" => {
            let mut walk = node.walk();
            for child in node.named_children(&mut walk) {
                binding_names(child, src, names);
            }
        }
        _ => {}
    }
}

fn clause_exports(
    clause: Node<'_>,
    src: &[u8],
    statement_type_only: bool,
    out: &mut SmallVec<[ExportStatement; 8]>,
) {
    let mut walk = clause.walk();
    for spec in clause.named_children(&mut walk) {
        if spec.kind() != "export_specifier" {
            continue;
        }

        let Some(name) = spec.child_by_field_name("name") else {
            continue;
        };
        let local = unquote(text(name, src));
        let exported = spec
            .child_by_field_name("alias")
            .map_or(local, |alias| unquote(text(alias, src)));

        let mut spec_walk = spec.walk();
        let spec_type_only = spec
            .children(&mut spec_walk)
            .any(|c| !c.is_named() && c.kind() == "type");

        let kind = if statement_type_only || spec_type_only {
            ExportKind::Type
        } else {
            ExportKind::Value
        };

        let info = ExportInfo::new(exported, kind);
        let info = if exported == "default" && local != "default" {
            info.with_local_name(local)
        } else {
            info
        };
        out.push(ExportStatement::Symbol(info));
    }
}

/// The local name bound by a default export, if it has one.
fn default_local_name(node: Node<'_>, src: &[u8]) -> Option<String> {
    match node.kind() {
        "identifier" => Some(text(node, src).to_owned()),
        _ => node
            .child_by_field_name("name")
            .filter(|name| matches!(name.kind(), "identifier" | "type_identifier"))
            .map(|name| text(name, src).to_owned()),
    }
}

fn last_named_text<'s>(node: Node<'_>, src: &'s [u8]) -> Option<&'s str> {
    let count = node.named_child_count();
    count
        .checked_sub(1)
        .and_then(|last| node.named_child(last))
        .map(|child| unquote(text(child, src)))
}

fn text<'s>(node: Node<'_>, src: &'s [u8]) -> &'s str {
    node.utf8_text(src).unwrap_or_default()
}

fn unquote(raw: &str) -> &str {
    raw.trim_matches(|c| c == '\'' || c == '"')
}
