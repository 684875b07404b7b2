//! CLI entry point for barrelize.
//!
//! Generates TypeScript barrel files (aggregators that re-export a
//! directory's modules) from a `.barrelize` configuration file.
//!
//! # Usage
//!
//! ```bash
//! barrelize [OPTIONS] [CONFIG]
//!
//! # Generate every barrel once
//! barrelize
//!
//! # Use another configuration file and keep barrels current
//! barrelize packages/app/.barrelize --watch
//!
//! # Write a starter configuration
//! barrelize init
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use barrelize_core::{Config, ConfigError, DEFAULT_CONFIG_FILE, WatchConfig, write_template};
use barrelize_generator::{BarrelGenerator, BarrelOutcome, watch_barrels};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Generate TypeScript barrel files from a `.barrelize` configuration.
///
/// Every scope of the configuration is scanned for files and its aggregator
/// is written only when its content changes.
#[derive(Parser)]
#[command(name = "barrelize", version, about, long_about = None)]
#[command(propagate_version = true, args_conflicts_with_subcommands = true)]
struct Cli {
    /// Command to execute. Generates barrels when omitted.
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the configuration file.
    ///
    /// Scope roots are resolved against the directory containing it.
    #[arg(default_value = DEFAULT_CONFIG_FILE, env = "BARRELIZE_CONFIG")]
    config: Utf8PathBuf,

    /// Watch for changes and regenerate barrel files automatically.
    #[arg(short, long)]
    watch: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Create a configuration file if it does not exist.
    Init {
        /// Where to write the configuration, relative to the current directory.
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        path: Utf8PathBuf,
    },
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
/// The `notify` crate is filtered to `warn` level.
fn init_tracing(verbose: bool, use_ansi: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},notify=warn,globset=warn,ignore=warn"))
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_ansi(use_ansi),
        )
        .with(filter)
        .init();
}

/// Resolves when Ctrl-C or, on Unix, SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    () = ctrl_c => {}
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
                }
            }
            Err(err) => {
                warn!(error = %err, "Failed to listen for SIGTERM");
                ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    ctrl_c.await;
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Generates every barrel once, then optionally keeps watching.
///
/// Configuration and generation failures are logged and reported through
/// the exit code.
async fn run_generate(config_path: &Utf8Path, watch: bool, printer: Printer) -> color_eyre::Result<ExitCode> {
    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(err @ ConfigError::NotFound(_)) => {
            error!("Couldn't find barrelize config file with path '{config_path}'");
            tracing::debug!(error = %err, "Configuration lookup failed");
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => {
            error!("{err}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let generator = Arc::new(BarrelGenerator::new(config_path, config));
    info!(config_dir = %generator.config_dir(), scopes = generator.config().barrels.len(), "Generating barrels");

    let initial = Arc::clone(&generator);
    let result = tokio::task::spawn_blocking(move || initial.run_with(|outcome| printer.outcome(outcome))).await?;
    if let Err(err) = result {
        error!("{err}");
        return Ok(ExitCode::FAILURE);
    }

    if !watch {
        return Ok(ExitCode::SUCCESS);
    }

    printer.notice("Watch mode enabled.");

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_token.cancel();
    });

    match watch_barrels(generator, WatchConfig::default(), cancel, move |outcome| printer.outcome(outcome)).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            error!("{err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Writes the starter configuration to `path`.
///
/// An existing file or a missing parent directory is reported as a warning,
/// not an error.
fn run_init(path: &Utf8Path, printer: Printer) -> color_eyre::Result<ExitCode> {
    let cwd = Utf8PathBuf::try_from(std::env::current_dir()?)?;
    let target = cwd.join(path);

    match write_template(&target) {
        Ok(text) => {
            printer.created(&target, &text);
            Ok(ExitCode::SUCCESS)
        }
        Err(ConfigError::AlreadyExists(path)) => {
            warn!("Config file '{path}' already exists");
            Ok(ExitCode::SUCCESS)
        }
        Err(ConfigError::MissingDirectory(dir)) => {
            warn!("Directory '{dir}' does not exist");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            error!("{err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// Writes status summaries to stdout.
#[derive(Debug, Clone, Copy)]
struct Printer {
    color: bool,
}

impl Printer {
    const fn new(color: bool) -> Self {
        Self { color }
    }

    /// Prints one scope's summary and, for updates, its changed paths.
    ///
    /// Skipped scopes were already reported as warnings.
    fn outcome(self, outcome: &BarrelOutcome) {
        if matches!(outcome, BarrelOutcome::Skipped { .. }) {
            return;
        }

        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        let _ = handle.write_all(self.format_outcome(outcome).as_bytes());
    }

    fn format_outcome(self, outcome: &BarrelOutcome) -> String {
        let mut text = format!(
            "{} {} {}\n",
            self.gray(outcome.status()),
            self.cyan(outcome.target()),
            self.gray(&outcome.summary()),
        );

        if let Some(diff) = outcome.diff() {
            for path in &diff.insertions {
                text.push_str(&self.green(&format!("  + {path}")));
                text.push('\n');
            }
            for path in &diff.deletions {
                text.push_str(&self.red(&format!("  - {path}")));
                text.push('\n');
            }
        }

        text
    }

    fn notice(self, message: &str) {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        let _ = writeln!(handle, "{}", self.green(message));
    }

    fn created(self, path: &Utf8Path, template: &str) {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        let _ = writeln!(handle, "{} {}", self.gray("Created config file"), self.cyan(path.as_str()));
        let _ = write!(handle, "{template}");
    }

    fn gray(self, text: &str) -> String {
        if self.color { text.bright_black().to_string() } else { text.to_owned() }
    }

    fn cyan(self, text: &str) -> String {
        if self.color { text.cyan().to_string() } else { text.to_owned() }
    }

    fn green(self, text: &str) -> String {
        if self.color { text.green().to_string() } else { text.to_owned() }
    }

    fn red(self, text: &str) -> String {
        if self.color { text.red().to_string() } else { text.to_owned() }
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
#[tokio::main]
async fn main() -> color_eyre::Result<ExitCode> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Colors are off with --no-color or NO_COLOR, for logs and summaries alike
    let use_ansi = !cli.no_color && std::env::var_os("NO_COLOR").is_none();
    init_tracing(cli.verbose, use_ansi);
    let printer = Printer::new(use_ansi);

    // 4. Route to the command
    match &cli.command {
        Some(Commands::Init { path }) => run_init(path, printer),
        None => run_generate(&cli.config, cli.watch, printer).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barrelize_generator::PathsDiff;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["barrelize"]).expect("parses");
        assert_eq!(cli.config, DEFAULT_CONFIG_FILE);
        assert!(!cli.watch);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_config_and_watch() {
        let cli = Cli::try_parse_from(["barrelize", "app/.barrelize", "-w"]).expect("parses");
        assert_eq!(cli.config, "app/.barrelize");
        assert!(cli.watch);
    }

    #[tokio::test]
    async fn test_generate_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf8");
        std::fs::create_dir_all(root.join("src")).expect("mkdir");
        std::fs::write(root.join("src/user.ts"), "export const user = 1;\n").expect("write");
        let config = root.join(DEFAULT_CONFIG_FILE);
        std::fs::write(&config, "{\n  // one scope\n  barrels: [{root: 'src'}],\n}").expect("config");

        let code = run_generate(&config, false, Printer { color: false })
            .await
            .expect("runs");

        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(
            std::fs::read_to_string(root.join("src/index.ts")).expect("generated"),
            "export * from './user';\n"
        );
    }

    #[tokio::test]
    async fn test_generate_missing_config_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Utf8Path::from_path(dir.path()).expect("utf8").join(DEFAULT_CONFIG_FILE);

        let code = run_generate(&config, false, Printer { color: false })
            .await
            .expect("runs");

        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn test_parse_init() {
        let cli = Cli::try_parse_from(["barrelize", "init", "lib/.barrelize"]).expect("parses");
        assert!(matches!(cli.command, Some(Commands::Init { ref path }) if path == "lib/.barrelize"));
    }

    #[test]
    fn test_plain_update_summary() {
        let outcome = BarrelOutcome::Updated {
            path: "src/index.ts".to_owned(),
            exported: 3,
            diff: PathsDiff {
                insertions: vec!["models/user".to_owned()],
                deletions: vec!["legacy".to_owned()],
            },
        };

        let text = Printer::new(false).format_outcome(&outcome);

        assert_eq!(
            text,
            "UPDATE src/index.ts 3 files exported, 1 insertion, 1 deletion\n  + models/user\n  - legacy\n"
        );
    }

    #[test]
    fn test_colored_summary_keeps_text() {
        let outcome = BarrelOutcome::Created {
            path: "index.ts".to_owned(),
            exported: 1,
        };

        let text = Printer::new(true).format_outcome(&outcome);

        assert!(text.contains("\u{1b}["));
        assert!(text.contains("index.ts"));
        assert!(text.contains("1 file exported"));
    }
}
