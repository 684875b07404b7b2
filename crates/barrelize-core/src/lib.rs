//! Core types, errors, and configuration for barrelize.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - [`Config`] and [`BarrelConfig`], the `.barrelize` file model, with
//!   loading, validation, and layered formatting resolution
//! - [`ConfigError`] for configuration failures
//! - Domain types shared by extraction and generation ([`ExportInfo`],
//!   [`ExportPathInfo`], [`ExportMember`])
//! - The starter template written by `barrelize init`
//! - Type aliases for `FxHashMap`/`FxHashSet`
//!
//! # Examples
//!
//! ```
//! use barrelize_core::{Config, FormatOptions};
//!
//! let config: Config = serde_json::from_str(r#"{"barrels": [{"root": "lib", "semi": false}]}"#)?;
//! let options = config.format_for(&config.barrels[0]);
//! assert!(!options.semi);
//! assert!(options.single_quote);
//! # Ok::<(), serde_json::Error>(())
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod template;
pub mod types;

pub use config::{
    BarrelConfig, Config, DEFAULT_BARREL_NAME, DEFAULT_CONFIG_FILE, FormatOptions,
    FormatOverrides, WatchConfig, compile_glob, resolve,
};
pub use error::ConfigError;
pub use hash::{FxHashMap, FxHashSet};
pub use template::{SCHEMA_REFERENCE, template_json, write_template};
pub use types::{ExportInfo, ExportKind, ExportMember, ExportPathInfo};
