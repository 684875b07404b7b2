//! Idempotent aggregator writes.
//!
//! [`write_barrel`] compares freshly rendered lines with what is on disk and
//! writes only when something changed. Each call yields a [`BarrelOutcome`]
//! describing what happened.

use std::fmt;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::diff::{PathsDiff, exported_paths};
use crate::error::GenerateError;
use crate::region::find_region;
use crate::render::{region_content, whole_file_content};

/// What happened to one scope's aggregator during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BarrelOutcome {
    /// The aggregator's directory does not exist; nothing was done.
    Skipped {
        /// The missing directory.
        directory: Utf8PathBuf,
    },
    /// The aggregator did not exist and was written.
    Created {
        /// Aggregator path relative to the configuration directory.
        path: String,
        /// Number of files exported.
        exported: usize,
    },
    /// The aggregator was already up to date.
    Ignored {
        /// Aggregator path relative to the configuration directory.
        path: String,
        /// Number of files exported.
        exported: usize,
    },
    /// The aggregator changed and was rewritten.
    Updated {
        /// Aggregator path relative to the configuration directory.
        path: String,
        /// Number of files exported.
        exported: usize,
        /// Module paths added and removed.
        diff: PathsDiff,
    },
}

impl BarrelOutcome {
    /// The status label: `CREATE`, `UPDATE`, `IGNORE` or `SKIP`.
    #[must_use]
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Skipped { .. } => "SKIP",
            Self::Created { .. } => "CREATE",
            Self::Ignored { .. } => "IGNORE",
            Self::Updated { .. } => "UPDATE",
        }
    }

    /// The aggregator label, or the missing directory for skipped scopes.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Skipped { directory } => directory.as_str(),
            Self::Created { path, .. } | Self::Ignored { path, .. } | Self::Updated { path, .. } => {
                path
            }
        }
    }

    /// The counts after the target, e.g. `3 files exported, 1 insertion`.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Skipped { .. } => "directory does not exist".to_owned(),
            Self::Created { exported, .. } | Self::Ignored { exported, .. } => exported_text(*exported),
            Self::Updated { exported, diff, .. } => {
                let mut text = exported_text(*exported);
                if !diff.insertions.is_empty() {
                    text.push_str(&format!(", {}", counted(diff.insertions.len(), "insertion")));
                }
                if !diff.deletions.is_empty() {
                    text.push_str(&format!(", {}", counted(diff.deletions.len(), "deletion")));
                }
                text
            }
        }
    }

    /// The insertions and deletions of an update.
    #[must_use]
    pub const fn diff(&self) -> Option<&PathsDiff> {
        match self {
            Self::Updated { diff, .. } => Some(diff),
            _ => None,
        }
    }

    /// Returns `true` if the run wrote the aggregator.
    #[must_use]
    pub const fn wrote(&self) -> bool {
        matches!(self, Self::Created { .. } | Self::Updated { .. })
    }
}

impl fmt::Display for BarrelOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.status(), self.target(), self.summary())
    }
}

fn counted(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

fn exported_text(n: usize) -> String {
    format!("{} exported", counted(n, "file"))
}

/// Brings the aggregator at `target` up to date with `lines`.
///
/// `label` is the path shown in the outcome and `modified_paths` are the
/// module paths the lines export, used for the update diff.
///
/// # Errors
///
/// Returns [`GenerateError::Io`] if the existing file cannot be read or the
/// new content cannot be written.
pub fn write_barrel(
    target: &Utf8Path,
    label: String,
    lines: &[String],
    modified_paths: &[String],
    insert_final_newline: bool,
) -> Result<BarrelOutcome, GenerateError> {
    let exported = modified_paths.len();

    if !target.exists() {
        let content = whole_file_content(lines, insert_final_newline);
        fs::write(target, content).map_err(|err| GenerateError::io(target, err))?;
        tracing::debug!(path = %target, "Created aggregator");
        return Ok(BarrelOutcome::Created {
            path: label,
            exported,
        });
    }

    let old = fs::read_to_string(target).map_err(|err| GenerateError::io(target, err))?;

    let (previous, new_text) = match find_region(&old) {
        Some(region) => {
            let content = region_content(lines);
            if region.content == content {
                return Ok(BarrelOutcome::Ignored {
                    path: label,
                    exported,
                });
            }
            (region.content, region.splice(&content))
        }
        None => {
            let content = whole_file_content(lines, insert_final_newline);
            if old == content {
                return Ok(BarrelOutcome::Ignored {
                    path: label,
                    exported,
                });
            }
            (old.as_str(), content)
        }
    };

    let diff = PathsDiff::between(&exported_paths(previous), modified_paths);
    fs::write(target, new_text).map_err(|err| GenerateError::io(target, err))?;
    tracing::debug!(
        path = %target,
        insertions = diff.insertions.len(),
        deletions = diff.deletions.len(),
        "Updated aggregator"
    );

    Ok(BarrelOutcome::Updated {
        path: label,
        exported,
        diff,
    })
}
