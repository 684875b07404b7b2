//! Source file discovery for one barrel scope.
//!
//! [`FileDiscovery`] walks the scope root with the `ignore` crate and keeps
//! the files matched by the scope's include globs and not matched by its
//! exclude globs. Results are root-relative, forward-slash paths.
//!
//! Files named `index.ts` or `index.js` are never returned, nor is the
//! scope's own aggregator file, so a barrel never re-exports itself or a
//! sibling barrel.
//!
//! # Examples
//!
//! ```no_run
//! use barrelize_core::BarrelConfig;
//! use barrelize_generator::FileDiscovery;
//! use camino::Utf8Path;
//!
//! let barrel = BarrelConfig::default_scope();
//! let discovery = FileDiscovery::new(Utf8Path::new("./src"), &barrel)?;
//! for path in discovery.collect_paths()? {
//!     tracing::info!(%path, "discovered");
//! }
//! # Ok::<(), barrelize_generator::GenerateError>(())
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use globset::{GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

use barrelize_core::{BarrelConfig, compile_glob};

use crate::error::GenerateError;

/// File names that are always treated as aggregators.
const AGGREGATOR_NAMES: &[&str] = &["index.ts", "index.js"];

/// Discovers the source files of one scope.
#[derive(Debug)]
pub struct FileDiscovery {
    /// The scope root every result is relative to.
    root: Utf8PathBuf,
    /// Compiled include globs.
    include: GlobSet,
    /// Compiled exclude globs.
    exclude: GlobSet,
    /// The scope's own aggregator path, relative to `root`.
    aggregator: String,
}

impl FileDiscovery {
    /// Compiles the scope's globs for walking `root`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Glob`] if an include or exclude pattern does
    /// not compile.
    pub fn new(root: &Utf8Path, barrel: &BarrelConfig) -> Result<Self, GenerateError> {
        Ok(Self {
            root: root.to_owned(),
            include: build_glob_set(&barrel.include)?,
            exclude: build_glob_set(&barrel.exclude)?,
            aggregator: barrel.normalized_name(),
        })
    }

    /// Walks the root and returns the sorted, deduplicated matches.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Walk`] if traversal fails and
    /// [`GenerateError::NonUtf8Path`] for a path that is not valid UTF-8.
    pub fn collect_paths(&self) -> Result<Vec<String>, GenerateError> {
        let mut paths = Vec::new();

        for result in self.build_walker() {
            let entry = result?;

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let utf8_path =
                Utf8Path::from_path(path).ok_or_else(|| GenerateError::NonUtf8Path(path.to_owned()))?;

            let Ok(relative) = utf8_path.strip_prefix(&self.root) else {
                continue;
            };
            let relative = relative.as_str().replace('\\', "/");

            if self.accepts(&relative) {
                paths.push(relative);
            }
        }

        paths.sort_unstable();
        paths.dedup();

        tracing::debug!(root = %self.root, count = paths.len(), "Discovered source files");

        Ok(paths)
    }

    /// Returns `true` if a root-relative path belongs in the barrel.
    #[must_use]
    pub fn accepts(&self, relative: &str) -> bool {
        let base = relative.rsplit('/').next().unwrap_or(relative);

        if AGGREGATOR_NAMES.contains(&base) || relative == self.aggregator {
            return false;
        }

        self.include.is_match(relative) && !self.exclude.is_match(relative)
    }

    /// Builds the walker: hidden entries skipped, ignore files not consulted,
    /// entries visited in name order.
    fn build_walker(&self) -> ignore::Walk {
        WalkBuilder::new(&self.root)
            .standard_filters(false)
            .hidden(true)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build()
    }

    /// Returns the root directory being walked.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

/// Compiles `patterns` into one set.
///
/// # Errors
///
/// Returns [`GenerateError::Glob`] naming the first pattern that fails.
pub fn build_glob_set(patterns: &[String]) -> Result<GlobSet, GenerateError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(compile_glob(pattern).map_err(|err| GenerateError::glob(pattern, err))?);
    }
    builder
        .build()
        .map_err(|err| GenerateError::glob(patterns.join(", "), err))
}
