//! The per-scope pipeline and the run over all scopes.
//!
//! # Pipeline
//!
//! ```text
//! discovery ─► order ─► replace ─► member selection ─► render ─► write
//!     │                                  │
//!  FileDiscovery                    ExportCache (shared by all scopes of a run)
//! ```
//!
//! Scopes run sequentially in declaration order: a later scope may read an
//! aggregator written by an earlier one, and summaries come out in a stable
//! order.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

use barrelize_core::{BarrelConfig, Config, ExportPathInfo};
use barrelize_ts_parser::ExportExtractor;

use crate::cache::ExportCache;
use crate::discovery::FileDiscovery;
use crate::error::GenerateError;
use crate::members::ExportRules;
use crate::order::order_paths;
use crate::render::render_all;
use crate::replace::ReplaceRules;
use crate::writer::{BarrelOutcome, write_barrel};

/// Generates every barrel of one configuration.
///
/// # Examples
///
/// ```no_run
/// use barrelize_core::Config;
/// use barrelize_generator::BarrelGenerator;
/// use camino::Utf8Path;
///
/// let path = Utf8Path::new(".barrelize");
/// let generator = BarrelGenerator::new(path, Config::load(path)?);
/// for outcome in generator.run()? {
///     tracing::info!("{outcome}");
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct BarrelGenerator {
    /// The configuration file, as given.
    config_path: Utf8PathBuf,
    /// Absolute directory every scope root is relative to.
    config_dir: Utf8PathBuf,
    config: Config,
}

impl BarrelGenerator {
    /// Creates a generator for `config`, loaded from `config_path`.
    ///
    /// Scope roots resolve against the directory containing the
    /// configuration file.
    pub fn new(config_path: impl Into<Utf8PathBuf>, config: Config) -> Self {
        let config_path = config_path.into();
        let parent = match config_path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let config_dir = parent
            .canonicalize_utf8()
            .unwrap_or_else(|_| normalize(parent));

        Self {
            config_path,
            config_dir,
            config,
        }
    }

    /// The configuration being generated.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The directory scope roots are resolved against.
    #[must_use]
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// The scope's root directory.
    #[must_use]
    pub fn scope_root(&self, barrel: &BarrelConfig) -> Utf8PathBuf {
        normalize(&self.config_dir.join(&barrel.root))
    }

    /// The scope's aggregator file.
    #[must_use]
    pub fn aggregator_path(&self, barrel: &BarrelConfig) -> Utf8PathBuf {
        normalize(&self.scope_root(barrel).join(barrel.normalized_name()))
    }

    /// Every scope's aggregator file.
    #[must_use]
    pub fn aggregator_paths(&self) -> Vec<Utf8PathBuf> {
        self.config
            .barrels
            .iter()
            .map(|barrel| self.aggregator_path(barrel))
            .collect()
    }

    /// The scope roots that exist, deduplicated, in declaration order.
    #[must_use]
    pub fn watch_roots(&self) -> Vec<Utf8PathBuf> {
        let mut roots: Vec<Utf8PathBuf> = Vec::new();
        for barrel in &self.config.barrels {
            let root = self.scope_root(barrel);
            if !root.is_dir() {
                tracing::warn!(root = %root, "Barrel root does not exist - not watching it");
                continue;
            }
            if !roots.contains(&root) {
                roots.push(root);
            }
        }
        roots
    }

    /// Runs every scope and collects the outcomes.
    ///
    /// # Errors
    ///
    /// See [`BarrelGenerator::run_with`].
    pub fn run(&self) -> Result<Vec<BarrelOutcome>, GenerateError> {
        let mut outcomes = Vec::with_capacity(self.config.barrels.len());
        self.run_with(|outcome| outcomes.push(outcome.clone()))?;
        Ok(outcomes)
    }

    /// Runs every scope, reporting each outcome as soon as it is known.
    ///
    /// A fresh export cache is shared by the scopes of this run.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error: the parser failed to initialise,
    /// discovery failed, or an aggregator could not be read or written.
    /// Outcomes of earlier scopes have already been reported.
    pub fn run_with(&self, mut on_outcome: impl FnMut(&BarrelOutcome)) -> Result<(), GenerateError> {
        let cache = ExportCache::new();
        let mut extractor = ExportExtractor::new()?;

        for barrel in &self.config.barrels {
            let outcome = self.generate_scope(barrel, &cache, &mut extractor)?;
            on_outcome(&outcome);
        }

        tracing::debug!(cached_files = cache.len(), "Generation run finished");
        Ok(())
    }

    /// Generates one scope.
    ///
    /// # Errors
    ///
    /// Same as [`BarrelGenerator::run_with`], for this scope only.
    pub fn generate_scope(
        &self,
        barrel: &BarrelConfig,
        cache: &ExportCache,
        extractor: &mut ExportExtractor,
    ) -> Result<BarrelOutcome, GenerateError> {
        let root = self.scope_root(barrel);
        let target = self.aggregator_path(barrel);
        let directory = target.parent().map_or_else(|| root.clone(), Utf8Path::to_owned);

        for required in [&directory, &root] {
            if !required.is_dir() {
                tracing::warn!("Index directory '{required}' does not exist - skipping");
                tracing::warn!(
                    "  Please verify the directory path in your '{}' configuration",
                    self.config_path
                );
                return Ok(BarrelOutcome::Skipped {
                    directory: required.clone(),
                });
            }
        }

        let paths = self.derive_paths(barrel, &root, cache, extractor)?;
        let format = self.config.format_for(barrel);
        let lines = render_all(&paths, &format);
        let modified: Vec<String> = paths.into_iter().map(|info| info.modified_path).collect();

        write_barrel(
            &target,
            barrel.display_path(),
            &lines,
            &modified,
            format.insert_final_newline,
        )
    }

    /// Discovers, orders, rewrites, and selects members for one scope.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] if discovery fails.
    pub fn derive_paths(
        &self,
        barrel: &BarrelConfig,
        root: &Utf8Path,
        cache: &ExportCache,
        extractor: &mut ExportExtractor,
    ) -> Result<Vec<ExportPathInfo>, GenerateError> {
        let discovered = FileDiscovery::new(root, barrel)?.collect_paths()?;
        let mut paths: Vec<ExportPathInfo> = discovered.into_iter().map(ExportPathInfo::new).collect();

        order_paths(&barrel.order, &mut paths);
        ReplaceRules::compile(&barrel.replace).rewrite(&mut paths);

        let rules = ExportRules::compile(&barrel.exports);
        if !rules.is_empty() {
            cache.prefetch(&rules.matched_files(root, &paths));
            rules.resolve(root, &mut paths, cache, extractor);
        }

        Ok(paths)
    }
}

/// Drops `.` components and trailing separators without touching the
/// filesystem.
fn normalize(path: &Utf8Path) -> Utf8PathBuf {
    path.components()
        .filter(|component| !matches!(component, Utf8Component::CurDir))
        .collect()
}
