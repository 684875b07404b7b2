//! TypeScript parser management using tree-sitter.
//!
//! This module provides the [`TsParser`] struct, a reusable tree-sitter
//! parser configured for TSX.

use tree_sitter::{Language, Parser, Tree};

use crate::error::ParseError;

/// TypeScript parser producing syntax trees for export extraction.
///
/// The TSX grammar is used for every file regardless of extension: it
/// accepts type annotations and embedded markup alike, so `.ts` sources
/// never fail for lack of the markup extension.
///
/// # Thread Safety
///
/// `TsParser` is `Send` but not `Sync`. Create one parser per thread.
///
/// # Examples
///
/// ```
/// use barrelize_ts_parser::TsParser;
///
/// let mut parser = TsParser::new()?;
/// let tree = parser.parse("export const answer = 42;")?;
/// assert_eq!(tree.root_node().kind(), "program");
/// # Ok::<(), barrelize_ts_parser::ParseError>(())
/// ```
pub struct TsParser {
    /// The underlying tree-sitter parser.
    parser: Parser,
    /// The TSX language for the parser.
    language: Language,
}

impl TsParser {
    /// Creates a new TSX parser.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if the language cannot be set
    /// on the parser.
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        let language: Language = tree_sitter_typescript::LANGUAGE_TSX.into();

        parser
            .set_language(&language)
            .map_err(|_| ParseError::LanguageInit)?;

        Ok(Self { parser, language })
    }

    /// Parses source code into a syntax tree.
    ///
    /// A tree containing error or missing nodes is rejected: extraction
    /// from a partially understood file would silently drop exports.
    ///
    /// # Errors
    ///
    /// - Returns [`ParseError::Parse`] if the parser produced no tree
    /// - Returns [`ParseError::Syntax`] if the source has syntax errors
    pub fn parse(&mut self, source: &str) -> Result<Tree, ParseError> {
        let tree = self.parser.parse(source, None).ok_or(ParseError::Parse)?;

        if tree.root_node().has_error() {
            return Err(ParseError::Syntax);
        }

        Ok(tree)
    }

    /// Returns the tree-sitter language used by this parser.
    #[inline]
    pub fn language(&self) -> &Language {
        &self.language
    }
}

impl std::fmt::Debug for TsParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TsParser")
            .field("language", &"TSX")
            .finish_non_exhaustive()
    }
}
