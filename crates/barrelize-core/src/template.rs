//! Starter configuration written by `barrelize init`.

use camino::Utf8Path;
use serde::Serialize;

use crate::error::ConfigError;

/// Schema reference embedded in new configuration files.
pub const SCHEMA_REFERENCE: &str = "node_modules/barrelize/schema.json";

#[derive(Serialize)]
struct Template<'a> {
    #[serde(rename = "$schema")]
    schema: &'a str,
    barrels: [TemplateBarrel<'a>; 1],
}

#[derive(Serialize)]
struct TemplateBarrel<'a> {
    root: &'a str,
    name: &'a str,
    include: [&'a str; 1],
    exclude: [&'a str; 1],
}

/// Renders the starter configuration as pretty JSON with a trailing newline.
///
/// # Examples
///
/// ```
/// let text = barrelize_core::template_json();
/// assert!(text.starts_with("{\n  \"$schema\""));
/// let config: barrelize_core::Config = serde_json::from_str(&text)?;
/// assert_eq!(config.barrels[0].root, "src");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[must_use]
pub fn template_json() -> String {
    let template = Template {
        schema: SCHEMA_REFERENCE,
        barrels: [TemplateBarrel {
            root: "src",
            name: "index.ts",
            include: ["**/*.ts"],
            exclude: ["**/*.test.ts"],
        }],
    };

    // Serializing borrowed strings into a String cannot fail.
    let mut text = serde_json::to_string_pretty(&template).unwrap_or_default();
    text.push('\n');
    text
}

/// Writes the starter configuration to `path`.
///
/// Returns the written text so the caller can echo it.
///
/// # Errors
///
/// - [`ConfigError::AlreadyExists`] if `path` exists
/// - [`ConfigError::MissingDirectory`] if its parent directory does not exist
/// - [`ConfigError::Io`] if the write fails
pub fn write_template(path: &Utf8Path) -> Result<String, ConfigError> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists(path.to_owned()));
    }

    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    if !parent.is_dir() {
        return Err(ConfigError::MissingDirectory(parent.to_owned()));
    }

    let text = template_json();
    std::fs::write(path, &text).map_err(|err| ConfigError::io(path, err))?;
    Ok(text)
}
