//! Event filtering on the watcher thread.
//!
//! The generator passes an [`ExcludePathsFilter`] holding every aggregator
//! path, so writing a barrel never schedules another run.
//!
//! # Examples
//!
//! ```
//! use barrelize_watcher::{ExcludePathsFilter, FileFilter};
//! use camino::{Utf8Path, Utf8PathBuf};
//!
//! let filter = ExcludePathsFilter::new([Utf8PathBuf::from("/app/src/index.ts")]);
//!
//! assert!(!filter.should_process(Utf8Path::new("/app/src/index.ts")));
//! assert!(filter.should_process(Utf8Path::new("/app/src/user.ts")));
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use rustc_hash::FxHashSet;

/// Decides whether a change is forwarded to the async side.
///
/// Runs on the blocking watcher thread for every debounced path, so it must
/// be cheap and thread-safe.
///
/// ```
/// use barrelize_watcher::FileFilter;
/// use camino::Utf8Path;
///
/// struct TypeScriptOnly;
///
/// impl FileFilter for TypeScriptOnly {
///     fn should_process(&self, path: &Utf8Path) -> bool {
///         matches!(path.extension(), Some("ts" | "tsx"))
///     }
/// }
///
/// assert!(TypeScriptOnly.should_process(Utf8Path::new("src/app.tsx")));
/// ```
pub trait FileFilter: Send + Sync + 'static {
    /// Returns `true` to forward the change at `path`.
    fn should_process(&self, path: &Utf8Path) -> bool;
}

/// Forwards every change.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllFilter;

impl FileFilter for AcceptAllFilter {
    fn should_process(&self, _path: &Utf8Path) -> bool {
        true
    }
}

/// Drops changes to an exact set of absolute paths.
#[derive(Debug, Clone, Default)]
pub struct ExcludePathsFilter {
    excluded: FxHashSet<Utf8PathBuf>,
}

impl ExcludePathsFilter {
    /// Creates a filter that drops changes to `paths`.
    pub fn new(paths: impl IntoIterator<Item = Utf8PathBuf>) -> Self {
        Self {
            excluded: paths.into_iter().collect(),
        }
    }

    /// Returns `true` if changes to `path` are dropped.
    #[must_use]
    pub fn excludes(&self, path: &Utf8Path) -> bool {
        self.excluded.contains(path)
    }
}

impl FileFilter for ExcludePathsFilter {
    fn should_process(&self, path: &Utf8Path) -> bool {
        !self.excludes(path)
    }
}
