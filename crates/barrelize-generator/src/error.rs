//! Error types for the barrelize-generator crate.
//!
//! Only conditions that end a run are errors here. Recoverable problems
//! (a missing scope directory, an unreadable source file, an invalid rule)
//! are logged where they occur and the pipeline continues.

use std::path::PathBuf;

use barrelize_ts_parser::ParseError;
use barrelize_watcher::WatchError;
use camino::Utf8PathBuf;

/// Errors that can end a generation run or the watch loop.
///
/// # Error Recovery Strategy
///
/// - **I/O errors** ([`GenerateError::Io`]): Fatal - the aggregator could not be read or written
/// - **Walker errors** ([`GenerateError::Walk`]): Fatal - discovery cannot complete
/// - **Glob errors** ([`GenerateError::Glob`]): Fatal - configuration was not validated
/// - **Non-UTF-8 paths** ([`GenerateError::NonUtf8Path`]): Fatal - output paths must be text
/// - **Parser init** ([`GenerateError::Parser`]): Fatal - the grammar failed to load
/// - **Watch errors** ([`GenerateError::Watch`]): Fatal for the watch loop
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Reading or writing an aggregator file failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// The file that could not be accessed.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// A configured glob does not compile.
    #[error("invalid glob pattern '{pattern}': {source}")]
    Glob {
        /// The offending pattern.
        pattern: String,
        /// The underlying globset error.
        #[source]
        source: globset::Error,
    },

    /// A discovered path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(PathBuf),

    /// The TypeScript parser could not be initialised.
    #[error("parser initialisation failed: {0}")]
    Parser(#[from] ParseError),

    /// The file watcher failed.
    #[error(transparent)]
    Watch(#[from] WatchError),

    /// No configured scope root exists, so there is nothing to watch.
    #[error("none of the configured barrel roots exist; nothing to watch")]
    NoWatchRoots,

    /// A blocking regeneration task panicked or was cancelled.
    #[error("regeneration task failed: {0}")]
    Task(String),
}

impl GenerateError {
    /// Creates a new [`GenerateError::Io`] error.
    #[inline]
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`GenerateError::Glob`] error.
    #[inline]
    pub fn glob(pattern: impl Into<String>, source: globset::Error) -> Self {
        Self::Glob {
            pattern: pattern.into(),
            source,
        }
    }

    /// Returns `true` if the watch loop can keep running after this error.
    ///
    /// A failed regeneration does not stop watching; a broken watcher does.
    #[must_use]
    pub const fn is_recoverable_in_watch(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::Walk(_) | Self::NonUtf8Path(_) | Self::Task(_)
        )
    }

    /// Returns the file path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Watch(err) => err.root(),
            Self::Walk(_)
            | Self::Glob { .. }
            | Self::NonUtf8Path(_)
            | Self::Parser(_)
            | Self::NoWatchRoots
            | Self::Task(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = GenerateError::io(
            "src/index.ts",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "failed to access src/index.ts: denied");
        assert_eq!(err.path().map(|p| p.as_str()), Some("src/index.ts"));
        assert!(err.is_recoverable_in_watch());
    }

    #[test]
    fn test_glob_error_display() {
        let source = globset::Glob::new("a[").expect_err("unclosed class");
        let err = GenerateError::glob("a[", source);
        assert!(err.to_string().starts_with("invalid glob pattern 'a['"));
        assert!(!err.is_recoverable_in_watch());
    }

    #[test]
    fn test_watch_error_path() {
        let err = GenerateError::from(WatchError::RootNotFound(Utf8PathBuf::from("lib")));
        assert_eq!(err.path().map(|p| p.as_str()), Some("lib"));
        assert!(!err.is_recoverable_in_watch());
    }
}
