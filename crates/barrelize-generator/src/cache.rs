//! Per-run cache of extracted exports.
//!
//! One [`ExportCache`] lives for one generation run and is shared by every
//! scope of that run, so a file selected by several scopes is parsed once.
//! Watch-triggered regenerations start with a fresh cache, so edited files
//! are always re-extracted.
//!
//! # Locking
//!
//! The map sits behind a `parking_lot::RwLock`. Guards never escape a method;
//! lookups return a cheap [`Arc`] clone of the stored slice.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::RwLock;
use rayon::prelude::*;

use barrelize_core::{ExportInfo, FxHashMap};
use barrelize_ts_parser::ExportExtractor;

/// Extracted exports keyed by absolute file path.
#[derive(Debug, Default)]
pub struct ExportCache {
    entries: RwLock<FxHashMap<Utf8PathBuf, Arc<[ExportInfo]>>>,
}

impl ExportCache {
    /// Creates an empty cache.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached exports of `path`, if present.
    #[must_use]
    pub fn get(&self, path: &Utf8Path) -> Option<Arc<[ExportInfo]>> {
        self.entries.read().get(path).cloned()
    }

    /// Stores the exports of `path`, replacing any previous entry.
    pub fn insert(&self, path: Utf8PathBuf, exports: Vec<ExportInfo>) -> Arc<[ExportInfo]> {
        let exports: Arc<[ExportInfo]> = exports.into();
        self.entries.write().insert(path, Arc::clone(&exports));
        exports
    }

    /// Returns the cached exports of `path`, extracting them on a miss.
    pub fn get_or_extract(
        &self,
        path: &Utf8Path,
        extractor: &mut ExportExtractor,
    ) -> Arc<[ExportInfo]> {
        if let Some(hit) = self.get(path) {
            return hit;
        }
        let exports = extractor.extract(path);
        self.insert(path.to_owned(), exports)
    }

    /// Extracts every uncached path in parallel.
    ///
    /// Each rayon worker gets its own extractor. Results do not depend on
    /// which worker extracted a file.
    pub fn prefetch(&self, paths: &[Utf8PathBuf]) {
        let missing: Vec<&Utf8PathBuf> = {
            let entries = self.entries.read();
            paths.iter().filter(|path| !entries.contains_key(*path)).collect()
        };

        if missing.len() < 2 {
            return;
        }

        let extracted: Vec<(Utf8PathBuf, Vec<ExportInfo>)> = missing
            .par_iter()
            .map_init(
                || ExportExtractor::new().ok(),
                |extractor, path| {
                    let exports = extractor
                        .as_mut()
                        .map(|extractor| extractor.extract(path))
                        .unwrap_or_default();
                    ((*path).clone(), exports)
                },
            )
            .collect();

        tracing::debug!(files = extracted.len(), "Prefetched exports");

        let mut entries = self.entries.write();
        for (path, exports) in extracted {
            entries.entry(path).or_insert_with(|| exports.into());
        }
    }

    /// Number of cached files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
