//! Error types for the barrelize-core crate.
//!
//! This module provides the [`ConfigError`] type for failures while loading,
//! validating, or initialising a `.barrelize` configuration file.

use camino::Utf8PathBuf;

/// Errors that can occur during configuration loading and validation.
///
/// Every variant is fatal to the current invocation: the generation pipeline
/// never starts with a configuration that produced one of these.
///
/// # Examples
///
/// ```
/// use barrelize_core::ConfigError;
/// use camino::Utf8PathBuf;
///
/// let error = ConfigError::NotFound(Utf8PathBuf::from(".barrelize"));
/// assert!(error.to_string().contains(".barrelize"));
/// assert!(error.is_not_found());
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("configuration file not found: {0}")]
    NotFound(Utf8PathBuf),

    /// The configuration file is not well-formed JSON5.
    #[error("syntax error in {path}:{line}:{column}: {reason}")]
    Syntax {
        /// The configuration file.
        path: Utf8PathBuf,
        /// One-based line of the error.
        line: usize,
        /// One-based column of the error.
        column: usize,
        /// Parser message.
        reason: String,
    },

    /// The configuration parsed but does not match the expected schema.
    ///
    /// Carries one message per offending field.
    #[error("invalid configuration in {path}:\n  {}", messages.join("\n  "))]
    Invalid {
        /// The configuration file.
        path: Utf8PathBuf,
        /// Field-level messages, each prefixed with the field location.
        messages: Vec<String>,
    },

    /// `init` refused to overwrite an existing file.
    #[error("configuration file already exists: {0}")]
    AlreadyExists(Utf8PathBuf),

    /// `init` was pointed at a directory that does not exist.
    #[error("missing required directory: {0}")]
    MissingDirectory(Utf8PathBuf),

    /// An I/O error occurred while reading or writing configuration.
    #[error("failed to access configuration {path}: {source}")]
    Io {
        /// The file being accessed.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Creates a new [`ConfigError::Io`] error.
    #[inline]
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wraps a `json5` parse failure for the file at `path`.
    ///
    /// Parse failures always carry a location; one without is reported at
    /// the start of the file.
    pub fn from_json5(path: impl Into<Utf8PathBuf>, err: json5::Error) -> Self {
        let json5::Error::Message { msg, location } = err;
        let (line, column) = location.map_or((1, 1), |at| (at.line, at.column));
        Self::Syntax {
            path: path.into(),
            line,
            column,
            reason: json5_reason(&msg),
        }
    }

    /// Classifies a `serde_json` failure for the file at `path`.
    ///
    /// Syntax and end-of-input errors become [`ConfigError::Syntax`]; type
    /// mismatches and unknown fields become [`ConfigError::Invalid`]. Errors
    /// raised while mapping an already parsed value have no location.
    pub fn from_json(path: impl Into<Utf8PathBuf>, err: &serde_json::Error) -> Self {
        use serde_json::error::Category;

        let path = path.into();
        match err.classify() {
            Category::Syntax | Category::Eof => Self::Syntax {
                path,
                line: err.line(),
                column: err.column(),
                reason: json_reason(err),
            },
            Category::Data if err.line() == 0 => Self::Invalid {
                path,
                messages: vec![json_reason(err)],
            },
            Category::Data => Self::Invalid {
                path,
                messages: vec![format!(
                    "line {}:{}: {}",
                    err.line(),
                    err.column(),
                    json_reason(err)
                )],
            },
            Category::Io => Self::io(path, std::io::Error::other(err.to_string())),
        }
    }

    /// Returns `true` if the configuration file was missing.
    #[inline]
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns the file path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            Self::NotFound(path)
            | Self::AlreadyExists(path)
            | Self::MissingDirectory(path)
            | Self::Syntax { path, .. }
            | Self::Invalid { path, .. }
            | Self::Io { path, .. } => path,
        }
    }
}

/// Strips serde_json's trailing " at line X column Y" so the location is not
/// reported twice.
fn json_reason(err: &serde_json::Error) -> String {
    let full = err.to_string();
    match full.rfind(" at line ") {
        Some(idx) => full[..idx].to_owned(),
        None => full,
    }
}

/// Keeps the `= expected ...` line of a pest report; the location is
/// carried separately.
fn json5_reason(msg: &str) -> String {
    msg.lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("= "))
        .unwrap_or(msg)
        .trim()
        .to_owned()
}
