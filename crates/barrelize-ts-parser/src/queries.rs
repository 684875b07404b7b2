//! Pre-compiled tree-sitter queries.
//!
//! Queries are compiled once per process and shared across all parsers.

use std::sync::OnceLock;

use tree_sitter::{Language, Query};

use crate::error::ParseError;

/// Matches every top-level export statement.
///
/// Nested statements (inside `declare module '...' { }` or namespaces) are
/// not part of the file's own export surface and are not captured.
pub const EXPORT_QUERY: &str = r"
(program
  (export_statement) @export)
";

/// Capture index for `export`.
pub const CAPTURE_EXPORT: u32 = 0;

/// Global cache for the compiled export query.
static COMPILED_EXPORT_QUERY: OnceLock<Query> = OnceLock::new();

/// Returns the compiled export query for the TSX grammar.
///
/// # Errors
///
/// Returns [`ParseError::QueryCompile`] if the query fails to compile.
pub fn export_query() -> Result<&'static Query, ParseError> {
    if let Some(query) = COMPILED_EXPORT_QUERY.get() {
        return Ok(query);
    }

    let language: Language = tree_sitter_typescript::LANGUAGE_TSX.into();
    let query = Query::new(&language, EXPORT_QUERY).map_err(|e| ParseError::QueryCompile {
        offset: e.offset,
        kind: e,
    })?;

    Ok(COMPILED_EXPORT_QUERY.get_or_init(|| query))
}
