//! Error types for the barrelize-ts-parser crate.
//!
//! [`ParseError`] covers parser setup and syntax failures; [`ExtractError`]
//! adds the file-level context of export extraction.

use camino::Utf8PathBuf;

/// Errors that can occur during TypeScript parsing.
///
/// # Examples
///
/// ```
/// use barrelize_ts_parser::ParseError;
///
/// fn describe(err: &ParseError) -> &'static str {
///     match err {
///         ParseError::LanguageInit => "grammar",
///         ParseError::QueryCompile { .. } => "query",
///         ParseError::Parse | ParseError::Syntax => "source",
///     }
/// }
///
/// assert_eq!(describe(&ParseError::Syntax), "source");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to set the TSX language on the parser.
    #[error("failed to set TypeScript language")]
    LanguageInit,

    /// Failed to compile a tree-sitter query.
    ///
    /// Contains the byte offset where the error occurred and the error kind.
    #[error("failed to compile query at offset {offset}: {kind:?}")]
    QueryCompile {
        /// The byte offset in the query string where the error occurred.
        offset: usize,
        /// The query error.
        kind: tree_sitter::QueryError,
    },

    /// The parser produced no tree.
    ///
    /// This typically indicates the parser ran out of memory or was cancelled.
    #[error("failed to parse source code")]
    Parse,

    /// The source contains syntax the grammar cannot handle.
    #[error("source contains syntax errors")]
    Syntax,
}

impl ParseError {
    /// Returns `true` if the parser itself is unusable, rather than one
    /// source file.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::LanguageInit | Self::QueryCompile { .. })
    }
}

/// A failure to extract exports from one file.
///
/// Extraction errors never abort generation: the file contributes no exports
/// and the error is logged at debug level.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The file being read.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file could not be parsed.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// The file being parsed.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: ParseError,
    },
}

impl ExtractError {
    /// Creates a new [`ExtractError::Read`] error.
    #[inline]
    pub fn read(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ExtractError::Parse`] error.
    #[inline]
    pub fn parse(path: impl Into<Utf8PathBuf>, source: ParseError) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Returns the file path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_init_display() {
        let err = ParseError::LanguageInit;
        assert_eq!(err.to_string(), "failed to set TypeScript language");
    }

    #[test]
    fn test_syntax_display() {
        assert_eq!(ParseError::Syntax.to_string(), "source contains syntax errors");
        assert!(!ParseError::Syntax.is_fatal());
        assert!(ParseError::LanguageInit.is_fatal());
    }

    #[test]
    fn test_extract_error_read() {
        let err = ExtractError::read(
            "src/gone.ts",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(err.path().as_str(), "src/gone.ts");
        assert!(err.to_string().contains("failed to read src/gone.ts"));
    }

    #[test]
    fn test_extract_error_parse() {
        let err = ExtractError::parse("src/bad.ts", ParseError::Syntax);
        assert!(err.to_string().contains("syntax errors"));
    }
}
