//! Barrel derivation and writing.
//!
//! For every scope of a `.barrelize` configuration this crate discovers the
//! files to re-export, orders them, rewrites their module paths, selects
//! members, renders the statements, and brings the aggregator file up to
//! date without touching it when nothing changed.
//!
//! # Overview
//!
//! - [`BarrelGenerator`] runs the pipeline for every scope of a configuration.
//! - [`watch_barrels`] re-runs it whenever a file under a scope root changes.
//! - [`BarrelOutcome`] reports what happened to each aggregator.
//!
//! The stages are public so they can be used on their own:
//! [`FileDiscovery`], [`order_paths`], [`ReplaceRules`], [`ExportRules`],
//! [`render_lines`], [`find_region`] and [`write_barrel`].
//!
//! # Examples
//!
//! ```
//! use barrelize_generator::{Matcher, order_paths};
//! use barrelize_core::ExportPathInfo;
//!
//! let mut paths: Vec<_> = ["utils.ts", "api/client.ts", "types.ts"]
//!     .into_iter()
//!     .map(ExportPathInfo::new)
//!     .collect();
//! order_paths(&["types".to_owned()], &mut paths);
//! assert_eq!(paths[0].original_path, "types.ts");
//! assert_eq!(paths[1].original_path, "api/client.ts");
//!
//! let strip = Matcher::parse("/\\.ts$/");
//! assert_eq!(strip.apply("utils.ts", "").as_deref(), Some("utils"));
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod cache;
pub mod diff;
pub mod discovery;
pub mod error;
pub mod generator;
pub mod members;
pub mod order;
pub mod pattern;
pub mod region;
pub mod render;
pub mod replace;
pub mod watch;
pub mod writer;

pub use cache::ExportCache;
pub use diff::{PathsDiff, exported_paths};
pub use discovery::{FileDiscovery, build_glob_set};
pub use error::GenerateError;
pub use generator::BarrelGenerator;
pub use members::{ExportRules, Selector, resolve_members};
pub use order::{compare_paths, order_paths};
pub use pattern::{JsRegex, Matcher, PatternError, parse_regex_literal};
pub use region::{END_MARKER, START_MARKER, find_region};
pub use render::{render_all, render_lines};
pub use replace::ReplaceRules;
pub use watch::watch_barrels;
pub use writer::{BarrelOutcome, write_barrel};
