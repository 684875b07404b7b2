//! Multi-root file watcher with async event delivery.
//!
//! `notify` is synchronous, so the debouncer lives on a blocking tokio task
//! and forwards filtered events over a bounded channel:
//!
//! ```text
//!  blocking task                                   async side
//! ┌────────────────────────────────────────┐      ┌──────────────────────┐
//! │ Debouncer ─► EventSink ─► blocking_send │ ───► │ FileWatcher::recv()  │
//! │   (one watch per root)   (FileFilter)   │      │ FileWatcher::drain() │
//! │                                         │ ◄─── │ stop (oneshot)       │
//! └────────────────────────────────────────┘      └──────────────────────┘
//! ```
//!
//! [`FileWatcher::new`] waits until every root is registered, so a root the
//! platform refuses to watch fails construction instead of going silent.
//!
//! # Usage
//!
//! ```no_run
//! use barrelize_watcher::{FileWatcher, AcceptAllFilter};
//! use barrelize_core::WatchConfig;
//! use camino::Utf8PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let roots = [Utf8PathBuf::from("src"), Utf8PathBuf::from("lib")];
//!     let mut watcher = FileWatcher::new(&roots, &WatchConfig::default(), AcceptAllFilter).await?;
//!
//!     while let Some(event) = watcher.recv().await {
//!         tracing::info!(path = %event.path, "changed");
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use camino::Utf8PathBuf;
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use barrelize_core::WatchConfig;

use crate::error::WatchError;
use crate::events::FileEvent;
use crate::filter::FileFilter;

/// Default channel capacity for file events.
const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// Watches one or more directory trees and yields debounced [`FileEvent`]s.
///
/// Stop it with [`shutdown`](Self::shutdown) to wait for the watcher thread;
/// dropping it only signals the thread.
pub struct FileWatcher {
    events: mpsc::Receiver<FileEvent>,
    task: Option<WatcherTask>,
    roots: Vec<Utf8PathBuf>,
}

/// The blocking task and its stop signal.
struct WatcherTask {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("roots", &self.roots)
            .field("is_running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl FileWatcher {
    /// Starts watching `paths`.
    ///
    /// With a recursive config, roots nested inside another root are folded
    /// into their ancestor.
    ///
    /// # Errors
    ///
    /// - [`WatchError::NoRoots`] if `paths` is empty
    /// - [`WatchError::RootNotFound`] or [`WatchError::NotADirectory`] for a bad root
    /// - [`WatchError::Canonicalize`] if a root cannot be resolved
    /// - [`WatchError::Notify`] if the platform watcher refuses a root
    pub async fn new<F: FileFilter>(
        paths: &[Utf8PathBuf],
        config: &WatchConfig,
        filter: F,
    ) -> Result<Self, WatchError> {
        Self::with_capacity(paths, config, filter, DEFAULT_CHANNEL_CAPACITY).await
    }

    /// Starts watching with a custom event channel capacity.
    ///
    /// # Errors
    ///
    /// Same as [`FileWatcher::new`].
    pub async fn with_capacity<F: FileFilter>(
        paths: &[Utf8PathBuf],
        config: &WatchConfig,
        filter: F,
        channel_capacity: usize,
    ) -> Result<Self, WatchError> {
        let roots = resolve_roots(paths, config.recursive).await?;

        let (event_tx, events) = mpsc::channel(channel_capacity.max(1));
        let (ready_tx, ready_rx) = oneshot::channel();
        let (stop_tx, stop_rx) = oneshot::channel();

        let sink = EventSink {
            filter,
            tx: event_tx,
        };
        let task_roots = roots.clone();
        let config = *config;
        let handle = tokio::task::spawn_blocking(move || {
            run_blocking(&task_roots, config, sink, ready_tx, stop_rx);
        });

        match ready_rx.await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => return Err(err),
            Err(_) => {
                return Err(WatchError::TaskFailed(
                    "watcher thread exited before registering roots".to_owned(),
                ));
            }
        }

        tracing::debug!(roots = ?roots, recursive = config.recursive, "File watcher started");

        Ok(Self {
            events,
            task: Some(WatcherTask {
                stop: stop_tx,
                handle,
            }),
            roots,
        })
    }

    /// Waits for the next event.
    ///
    /// Returns `None` once the watcher thread has stopped and every queued
    /// event was received.
    pub async fn recv(&mut self) -> Option<FileEvent> {
        self.events.recv().await
    }

    /// Discards the queued events and returns how many there were.
    pub fn drain(&mut self) -> usize {
        std::iter::from_fn(|| self.events.try_recv().ok()).count()
    }

    /// The canonical roots being watched.
    #[must_use]
    pub fn roots(&self) -> &[Utf8PathBuf] {
        &self.roots
    }

    /// Returns `true` while the watcher thread is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.handle.is_finished())
    }

    /// Stops the watcher thread and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::TaskFailed`] if the thread panicked.
    pub async fn shutdown(mut self) -> Result<(), WatchError> {
        let Some(task) = self.task.take() else {
            return Ok(());
        };

        let _ = task.stop.send(());
        task.handle
            .await
            .map_err(|err| WatchError::TaskFailed(err.to_string()))
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.stop.send(());
        }
    }
}

/// Checks, canonicalizes, and folds the requested roots.
async fn resolve_roots(paths: &[Utf8PathBuf], recursive: bool) -> Result<Vec<Utf8PathBuf>, WatchError> {
    if paths.is_empty() {
        return Err(WatchError::NoRoots);
    }

    let mut roots = Vec::with_capacity(paths.len());
    for path in paths {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(WatchError::RootNotFound(path.clone()));
            }
            Err(source) => {
                return Err(WatchError::Canonicalize {
                    path: path.clone(),
                    source,
                });
            }
        };
        if !metadata.is_dir() {
            return Err(WatchError::NotADirectory(path.clone()));
        }

        let canonical = tokio::fs::canonicalize(path)
            .await
            .map_err(|source| WatchError::Canonicalize {
                path: path.clone(),
                source,
            })?;
        let root = Utf8PathBuf::try_from(canonical).map_err(|err| WatchError::Canonicalize {
            path: path.clone(),
            source: err.into_io_error(),
        })?;
        roots.push(root);
    }

    Ok(fold_roots(roots, recursive))
}

/// Sorts and deduplicates roots; when recursive, drops roots that sit
/// inside another root.
fn fold_roots(mut roots: Vec<Utf8PathBuf>, recursive: bool) -> Vec<Utf8PathBuf> {
    roots.sort();
    if recursive {
        // Component order places each descendant right after its ancestor.
        roots.dedup_by(|later, kept| later.starts_with(&*kept));
    } else {
        roots.dedup();
    }
    roots
}

/// Debouncer callback state: filters events and forwards them.
struct EventSink<F> {
    filter: F,
    tx: mpsc::Sender<FileEvent>,
}

impl<F: FileFilter> EventSink<F> {
    fn forward(&self, result: DebounceEventResult) {
        let events = match result {
            Ok(events) => events,
            Err(err) => {
                tracing::warn!(error = %err, "File watcher error");
                return;
            }
        };

        for event in events {
            let path = match Utf8PathBuf::try_from(event.path) {
                Ok(path) => path,
                Err(err) => {
                    tracing::warn!(path = %err.as_path().display(), "Ignoring change to non-UTF-8 path");
                    continue;
                }
            };

            if !self.filter.should_process(&path) {
                tracing::trace!(%path, "Change filtered out");
                continue;
            }

            if self.tx.blocking_send(FileEvent::with_kind(path, event.kind)).is_err() {
                // Receiver gone; the stop signal follows.
                return;
            }
        }
    }
}

/// Body of the blocking task: registers every root, reports readiness, then
/// parks until stopped.
fn run_blocking<F: FileFilter>(
    roots: &[Utf8PathBuf],
    config: WatchConfig,
    sink: EventSink<F>,
    ready: oneshot::Sender<Result<(), WatchError>>,
    stop: oneshot::Receiver<()>,
) {
    let debouncer = match register(roots, config, sink) {
        Ok(debouncer) => debouncer,
        Err(err) => {
            let _ = ready.send(Err(err));
            return;
        }
    };

    if ready.send(Ok(())).is_err() {
        return;
    }

    let _ = stop.blocking_recv();
    drop(debouncer);
    tracing::debug!(roots = roots.len(), "File watcher stopped");
}

fn register<F: FileFilter>(
    roots: &[Utf8PathBuf],
    config: WatchConfig,
    sink: EventSink<F>,
) -> Result<Debouncer<RecommendedWatcher>, WatchError> {
    let mut debouncer = new_debouncer(
        Duration::from_millis(config.debounce_ms),
        move |result: DebounceEventResult| sink.forward(result),
    )?;

    let mode = if config.recursive {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };

    for root in roots {
        debouncer.watcher().watch(root.as_std_path(), mode)?;
        tracing::debug!(%root, "Watching directory");
    }

    Ok(debouncer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{AcceptAllFilter, ExcludePathsFilter};
    use std::fs;
    use tempfile::TempDir;

    fn utf8_root(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .expect("utf8")
            .canonicalize_utf8()
            .expect("canonical")
    }

    fn fast_config() -> WatchConfig {
        WatchConfig {
            debounce_ms: 50,
            recursive: true,
        }
    }

    #[test]
    fn test_fold_roots() {
        let roots = ["/app/src/models", "/app/lib", "/app/src", "/app/srcs", "/app/lib"]
            .map(Utf8PathBuf::from)
            .to_vec();

        assert_eq!(
            fold_roots(roots.clone(), true),
            ["/app/lib", "/app/src", "/app/srcs"].map(Utf8PathBuf::from)
        );
        assert_eq!(
            fold_roots(roots, false),
            ["/app/lib", "/app/src", "/app/src/models", "/app/srcs"].map(Utf8PathBuf::from)
        );
    }

    #[tokio::test]
    async fn test_start_and_shutdown() {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = utf8_root(&temp_dir);
        let nested = root.join("src");
        fs::create_dir(&nested).expect("mkdir");

        let watcher = FileWatcher::new(&[nested, root.clone()], &WatchConfig::default(), AcceptAllFilter)
            .await
            .expect("watcher starts");

        assert!(watcher.is_running());
        assert_eq!(watcher.roots(), [root]);
        watcher.shutdown().await.expect("clean shutdown");
    }

    #[tokio::test]
    async fn test_no_roots() {
        let result = FileWatcher::new(&[], &WatchConfig::default(), AcceptAllFilter).await;
        assert!(matches!(result, Err(WatchError::NoRoots)));
    }

    #[tokio::test]
    async fn test_missing_root() {
        let missing = Utf8PathBuf::from("/nonexistent/barrelize/root");
        let result = FileWatcher::new(&[missing], &WatchConfig::default(), AcceptAllFilter).await;
        assert!(matches!(result, Err(WatchError::RootNotFound(path)) if path.ends_with("root")));
    }

    #[tokio::test]
    async fn test_file_root_rejected() {
        let temp_dir = TempDir::new().expect("temp dir");
        let file = utf8_root(&temp_dir).join("index.ts");
        fs::write(&file, "").expect("write");

        let result = FileWatcher::new(&[file], &WatchConfig::default(), AcceptAllFilter).await;
        assert!(matches!(result, Err(WatchError::NotADirectory(_))));
    }

    #[tokio::test]
    async fn test_receives_events() {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = utf8_root(&temp_dir);

        let mut watcher = FileWatcher::new(&[root.clone()], &fast_config(), AcceptAllFilter)
            .await
            .expect("watcher starts");

        fs::write(root.join("user.ts"), "export const a = 1;").expect("write");

        let event = tokio::time::timeout(Duration::from_secs(2), watcher.recv()).await;
        watcher.shutdown().await.expect("clean shutdown");

        // Timing-dependent on some CI file systems.
        if let Ok(Some(event)) = event {
            assert!(event.path.starts_with(&root));
        }
    }

    #[tokio::test]
    async fn test_excluded_paths_never_arrive() {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = utf8_root(&temp_dir);
        let barrel = root.join("index.ts");

        let mut watcher = FileWatcher::new(&[root], &fast_config(), ExcludePathsFilter::new([barrel.clone()]))
            .await
            .expect("watcher starts");

        fs::write(&barrel, "export * from './a';\n").expect("write");

        let event = tokio::time::timeout(Duration::from_millis(500), watcher.recv()).await;
        watcher.shutdown().await.expect("clean shutdown");

        if let Ok(Some(event)) = event {
            assert_ne!(event.path, barrel);
        }
    }

    #[tokio::test]
    async fn test_drain_empty_queue() {
        let temp_dir = TempDir::new().expect("temp dir");
        let mut watcher = FileWatcher::new(&[utf8_root(&temp_dir)], &WatchConfig::default(), AcceptAllFilter)
            .await
            .expect("watcher starts");

        assert_eq!(watcher.drain(), 0);
        watcher.shutdown().await.expect("clean shutdown");
    }
}
