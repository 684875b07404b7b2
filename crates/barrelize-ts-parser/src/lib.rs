//! TypeScript export extraction using tree-sitter.
//!
//! This crate answers one question for the barrel generator: which symbols
//! does a source file export, and is each one a value or a type?
//!
//! # Overview
//!
//! - [`TsParser`] wraps a tree-sitter parser configured for TSX, so type
//!   annotations and embedded markup are both accepted in every file.
//! - [`collect_exports`] walks the top-level `export` statements of a parsed
//!   tree.
//! - [`ExportExtractor`] reads files from disk, follows
//!   `export * from '...'` re-exports, and guards against cycles.
//!
//! ```
//! use barrelize_ts_parser::{TsParser, collect_exports, ExportStatement, queries::export_query};
//!
//! let source = "export interface User {}\nexport * from './roles';";
//! let mut parser = TsParser::new()?;
//! let tree = parser.parse(source)?;
//! let statements = collect_exports(&tree, source, export_query()?);
//!
//! assert!(matches!(&statements[0], ExportStatement::Symbol(info) if info.is_type()));
//! assert!(matches!(&statements[1], ExportStatement::ReExportAll { specifier } if specifier == "./roles"));
//! # Ok::<(), barrelize_ts_parser::ParseError>(())
//! ```
//!
//! # Thread Safety
//!
//! [`TsParser`] and [`ExportExtractor`] are `Send` but not `Sync`; create one
//! per thread. The compiled export query is shared globally.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod exports;
pub mod extract;
mod parser;
pub mod queries;

pub use error::{ExtractError, ParseError};
pub use exports::{ExportStatement, collect_exports};
pub use extract::{ExportExtractor, resolve_specifier};
pub use parser::TsParser;
