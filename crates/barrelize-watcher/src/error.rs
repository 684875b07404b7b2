//! Error types for the barrelize-watcher crate.

use camino::Utf8PathBuf;

/// Errors raised while starting or stopping a [`FileWatcher`].
///
/// Problems with individual events (non-UTF-8 paths, debouncer hiccups) are
/// logged on the watcher thread and never surface here, so every variant
/// ends watching.
///
/// [`FileWatcher`]: crate::FileWatcher
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// The watcher was given no roots.
    #[error("no directories to watch")]
    NoRoots,

    /// A root does not exist.
    #[error("watch root does not exist: {0}")]
    RootNotFound(Utf8PathBuf),

    /// A root exists but is a file.
    #[error("watch root is not a directory: {0}")]
    NotADirectory(Utf8PathBuf),

    /// A root could not be resolved to its canonical form.
    #[error("failed to resolve watch root {path}: {source}")]
    Canonicalize {
        /// The root as given.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// `notify` failed to start or to register a root.
    #[error("notify watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// The blocking watcher task panicked or was aborted.
    #[error("watcher task failed: {0}")]
    TaskFailed(String),
}

impl WatchError {
    /// The root this error is about, if any.
    #[must_use]
    pub fn root(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::RootNotFound(path) | Self::NotADirectory(path) | Self::Canonicalize { path, .. } => {
                Some(path)
            }
            Self::NoRoots | Self::Notify(_) | Self::TaskFailed(_) => None,
        }
    }

    /// Returns `true` if the error comes from the configured roots rather
    /// than from the platform watcher.
    #[must_use]
    pub const fn is_root_error(&self) -> bool {
        matches!(
            self,
            Self::NoRoots | Self::RootNotFound(_) | Self::NotADirectory(_) | Self::Canonicalize { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_not_found() {
        let err = WatchError::RootNotFound(Utf8PathBuf::from("src/missing"));
        assert!(err.is_root_error());
        assert_eq!(err.root().map(|p| p.as_str()), Some("src/missing"));
        assert_eq!(err.to_string(), "watch root does not exist: src/missing");
    }

    #[test]
    fn test_task_failure_has_no_root() {
        let err = WatchError::TaskFailed("panicked".to_owned());
        assert!(!err.is_root_error());
        assert!(err.root().is_none());
        assert_eq!(err.to_string(), "watcher task failed: panicked");
    }
}
