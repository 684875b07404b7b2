//! Regeneration on file changes.
//!
//! Events are coalesced twice: the watcher debounces bursts, and events that
//! arrive while a run is in progress collapse into a single follow-up run.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use barrelize_core::WatchConfig;
use barrelize_watcher::{ExcludePathsFilter, FileWatcher};

use crate::error::GenerateError;
use crate::generator::BarrelGenerator;
use crate::writer::BarrelOutcome;

/// Watches every existing scope root and regenerates all barrels on change.
///
/// Changes to the aggregators themselves are ignored so a run never triggers
/// the next one. Runs until `cancel` fires or the watcher stops.
///
/// # Errors
///
/// - [`GenerateError::NoWatchRoots`] if no scope root exists
/// - [`GenerateError::Watch`] if the watcher cannot start or stop cleanly
/// - the error of a run that failed in a way no file change can fix, see
///   [`GenerateError::is_recoverable_in_watch`]
///
/// Other failures of individual runs are logged and watching continues.
pub async fn watch_barrels<F>(
    generator: Arc<BarrelGenerator>,
    config: WatchConfig,
    cancel: CancellationToken,
    on_outcome: F,
) -> Result<(), GenerateError>
where
    F: Fn(&BarrelOutcome) + Send + Sync + 'static,
{
    let roots = generator.watch_roots();
    if roots.is_empty() {
        return Err(GenerateError::NoWatchRoots);
    }

    let filter = ExcludePathsFilter::new(generator.aggregator_paths());
    let mut watcher = FileWatcher::new(&roots, &config, filter).await?;
    let on_outcome = Arc::new(on_outcome);

    tracing::info!(roots = ?watcher.roots(), "Watching for changes");

    let finished = loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break Ok(()),
            event = watcher.recv() => event,
        };

        let Some(event) = event else {
            tracing::warn!("Watcher stopped");
            break Ok(());
        };

        let coalesced = watcher.drain();
        tracing::debug!(path = %event.path, coalesced, "Change detected, regenerating");

        let generator = Arc::clone(&generator);
        let on_outcome = Arc::clone(&on_outcome);
        let result = tokio::task::spawn_blocking(move || generator.run_with(|outcome| on_outcome(outcome)))
            .await
            .map_err(|err| GenerateError::Task(err.to_string()))
            .and_then(|result| result);

        match result {
            Ok(()) => {}
            Err(err) if err.is_recoverable_in_watch() => {
                tracing::error!(error = %err, "Regeneration failed");
            }
            Err(err) => {
                tracing::error!(error = %err, "Regeneration failed; stopping watch");
                break Err(err);
            }
        }
    };

    let stopped = watcher.shutdown().await;
    finished?;
    stopped?;
    tracing::info!("Watch stopped");
    Ok(())
}
