//! Debounced file watching with async event streaming.
//!
//! Watch mode keeps barrel files current while sources change. This crate
//! detects changes under every scope root through `notify`, debounces them
//! with `notify-debouncer-mini`, and forwards them to a tokio channel.
//!
//! # Overview
//!
//! - [`FileWatcher`] owns the blocking notify thread and the event receiver.
//! - [`FileFilter`] decides on the watcher thread which events get through.
//! - [`ExcludePathsFilter`] drops events for the generated aggregator files,
//!   so a write by the generator never triggers itself.
//!
//! # Crate Dependencies
//!
//! ```text
//! barrelize-cli ──► barrelize-generator ──► barrelize-ts-parser ──► barrelize-core
//!                                      └──► barrelize-watcher ───────────►
//! ```
//!
//! # Error Handling
//!
//! Every [`WatchError`] ends watching. Root problems come from the caller's
//! configuration; the rest from the platform watcher.
//!
//! ```
//! use barrelize_watcher::WatchError;
//! use camino::Utf8PathBuf;
//!
//! let err = WatchError::RootNotFound(Utf8PathBuf::from("src"));
//! assert!(err.is_root_error());
//! assert_eq!(err.root().map(|p| p.as_str()), Some("src"));
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod events;
pub mod filter;
pub mod watcher;

pub use error::WatchError;
pub use events::FileEvent;
pub use filter::{AcceptAllFilter, ExcludePathsFilter, FileFilter};
pub use watcher::FileWatcher;
