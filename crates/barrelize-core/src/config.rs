//! Configuration structures for barrelize.
//!
//! This module provides the `.barrelize` file model and its helpers:
//!
//! - [`Config`] - Root configuration with global formatting defaults
//! - [`BarrelConfig`] - One barrel scope (root, aggregator name, rules)
//! - [`FormatOverrides`] / [`FormatOptions`] - Layered formatting flags
//! - [`WatchConfig`] - File watcher settings (debouncing, recursion)
//!
//! Formatting flags are optional at both the global and the scope level and
//! are only collapsed into concrete values by [`FormatOptions::resolve`].

use camino::Utf8Path;
use globset::GlobBuilder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default name of the configuration file.
pub const DEFAULT_CONFIG_FILE: &str = ".barrelize";

/// Default aggregator file name.
pub const DEFAULT_BARREL_NAME: &str = "index.ts";

/// Resolves one layered option: scope value, then global value, then the
/// built-in default.
///
/// # Examples
///
/// ```
/// use barrelize_core::resolve;
///
/// assert!(!resolve(Some(false), Some(true), true));
/// assert!(resolve(None, Some(true), false));
/// assert!(resolve(None, None, true));
/// ```
#[inline]
#[must_use]
pub fn resolve<T>(scope: Option<T>, global: Option<T>, builtin: T) -> T {
    scope.or(global).unwrap_or(builtin)
}

/// Formatting flags as written in the configuration file.
///
/// Every field is optional; an absent field defers to the next layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FormatOverrides {
    /// Spaces inside `{ }`.
    pub bracket_spacing: Option<bool>,
    /// Single instead of double quotes.
    pub single_quote: Option<bool>,
    /// Terminate statements with `;`.
    pub semi: Option<bool>,
    /// End the aggregator with a newline.
    pub insert_final_newline: Option<bool>,
    /// Emit `type` before type-only members.
    pub type_prefix: Option<bool>,
}

/// Fully resolved formatting flags for one scope.
///
/// # Examples
///
/// ```
/// use barrelize_core::{FormatOptions, FormatOverrides};
///
/// let global = FormatOverrides { semi: Some(false), ..Default::default() };
/// let scope = FormatOverrides { single_quote: Some(false), ..Default::default() };
///
/// let options = FormatOptions::resolve(&scope, &global);
/// assert!(!options.semi);
/// assert!(!options.single_quote);
/// assert!(options.bracket_spacing);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::struct_excessive_bools)]
pub struct FormatOptions {
    /// Spaces inside `{ }`.
    pub bracket_spacing: bool,
    /// Single instead of double quotes.
    pub single_quote: bool,
    /// Terminate statements with `;`.
    pub semi: bool,
    /// End the aggregator with a newline.
    pub insert_final_newline: bool,
    /// Emit `type` before type-only members.
    pub type_prefix: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            bracket_spacing: true,
            single_quote: true,
            semi: true,
            insert_final_newline: true,
            type_prefix: true,
        }
    }
}

impl FormatOptions {
    /// Resolves each flag field-by-field against the built-in defaults.
    #[must_use]
    pub fn resolve(scope: &FormatOverrides, global: &FormatOverrides) -> Self {
        let builtin = Self::default();
        Self {
            bracket_spacing: resolve(
                scope.bracket_spacing,
                global.bracket_spacing,
                builtin.bracket_spacing,
            ),
            single_quote: resolve(scope.single_quote, global.single_quote, builtin.single_quote),
            semi: resolve(scope.semi, global.semi, builtin.semi),
            insert_final_newline: resolve(
                scope.insert_final_newline,
                global.insert_final_newline,
                builtin.insert_final_newline,
            ),
            type_prefix: resolve(scope.type_prefix, global.type_prefix, builtin.type_prefix),
        }
    }

    /// The quote character for module specifiers.
    #[inline]
    #[must_use]
    pub const fn quote(&self) -> char {
        if self.single_quote { '\'' } else { '"' }
    }

    /// The statement terminator.
    #[inline]
    #[must_use]
    pub const fn terminator(&self) -> &'static str {
        if self.semi { ";" } else { "" }
    }
}

/// One barrel scope.
///
/// # Examples
///
/// ```
/// use barrelize_core::BarrelConfig;
///
/// let scope = BarrelConfig::default();
/// assert_eq!(scope.name, "index.ts");
/// assert_eq!(scope.include, vec!["**/*.ts"]);
/// assert_eq!(scope.replace.get("/\\.ts$/").map(String::as_str), Some(""));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct BarrelConfig {
    /// Directory scanned for files, relative to the configuration file.
    pub root: String,

    /// Aggregator path relative to `root`.
    pub name: String,

    /// Glob patterns selecting files.
    pub include: Vec<String>,

    /// Glob patterns removing files from `include`.
    pub exclude: Vec<String>,

    /// Path prefixes that sort first, in priority order.
    pub order: Vec<String>,

    /// Find pattern to replacement, applied first-match-wins.
    pub replace: IndexMap<String, String>,

    /// Glob pattern to member selectors.
    pub exports: IndexMap<String, Vec<String>>,

    /// Scope override for bracket spacing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bracket_spacing: Option<bool>,

    /// Scope override for quote style.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_quote: Option<bool>,

    /// Scope override for the statement terminator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semi: Option<bool>,

    /// Scope override for the trailing newline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_final_newline: Option<bool>,

    /// Scope override for the `type` member prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_prefix: Option<bool>,
}

impl Default for BarrelConfig {
    fn default() -> Self {
        let mut replace = IndexMap::new();
        replace.insert("/\\.ts$/".to_owned(), String::new());

        Self {
            root: String::new(),
            name: DEFAULT_BARREL_NAME.to_owned(),
            include: vec!["**/*.ts".to_owned()],
            exclude: Vec::new(),
            order: Vec::new(),
            replace,
            exports: IndexMap::new(),
            bracket_spacing: None,
            single_quote: None,
            semi: None,
            insert_final_newline: None,
            type_prefix: None,
        }
    }
}

impl BarrelConfig {
    /// The scope used when a configuration lists no barrels.
    #[must_use]
    pub fn default_scope() -> Self {
        Self {
            root: "src".to_owned(),
            exclude: vec!["**/*.test.ts".to_owned()],
            ..Self::default()
        }
    }

    /// The scope's formatting overrides.
    #[must_use]
    pub const fn format_overrides(&self) -> FormatOverrides {
        FormatOverrides {
            bracket_spacing: self.bracket_spacing,
            single_quote: self.single_quote,
            semi: self.semi,
            insert_final_newline: self.insert_final_newline,
            type_prefix: self.type_prefix,
        }
    }

    /// The aggregator path relative to `root`, with forward slashes.
    #[must_use]
    pub fn normalized_name(&self) -> String {
        let name = self.name.replace('\\', "/");
        name.strip_prefix("./").map_or_else(|| name.clone(), str::to_owned)
    }

    /// The aggregator path relative to the configuration directory.
    ///
    /// This is the label used in status summaries.
    #[must_use]
    pub fn display_path(&self) -> String {
        let root = self.root.replace('\\', "/");
        let root = root.trim_end_matches('/');
        let name = self.normalized_name();
        if root.is_empty() || root == "." {
            name
        } else {
            format!("{root}/{name}")
        }
    }
}

/// Root configuration, the content of a `.barrelize` file.
///
/// # Examples
///
/// ```
/// use barrelize_core::Config;
///
/// let config: Config = serde_json::from_str(r#"{"semi": false}"#)?;
/// assert_eq!(config.semi, Some(false));
/// assert_eq!(config.barrels.len(), 1);
/// assert_eq!(config.barrels[0].root, "src");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Editor schema reference; ignored.
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Global bracket spacing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bracket_spacing: Option<bool>,

    /// Global quote style.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_quote: Option<bool>,

    /// Global statement terminator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semi: Option<bool>,

    /// Global trailing newline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_final_newline: Option<bool>,

    /// Global `type` member prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_prefix: Option<bool>,

    /// Barrel scopes, processed in order.
    pub barrels: Vec<BarrelConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: None,
            bracket_spacing: None,
            single_quote: None,
            semi: None,
            insert_final_newline: None,
            type_prefix: None,
            barrels: vec![BarrelConfig::default_scope()],
        }
    }
}

impl Config {
    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NotFound`] if the file does not exist
    /// - [`ConfigError::Syntax`] if it is not valid JSON5
    /// - [`ConfigError::Invalid`] if it does not match the schema
    /// - [`ConfigError::Io`] for any other read failure
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path.to_owned()));
            }
            Err(err) => return Err(ConfigError::io(path, err)),
        };

        Self::from_json_str(path, &text)
    }

    /// Parses and validates configuration text attributed to `path`.
    ///
    /// The text is JSON5: comments, trailing commas, single-quoted strings
    /// and unquoted keys are accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use barrelize_core::Config;
    /// use camino::Utf8Path;
    ///
    /// let text = "{\n  // formatting\n  semi: false,\n}";
    /// let config = Config::from_json_str(Utf8Path::new(".barrelize"), text)?;
    /// assert_eq!(config.semi, Some(false));
    /// # Ok::<(), barrelize_core::ConfigError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn from_json_str(path: &Utf8Path, text: &str) -> Result<Self, ConfigError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let value: serde_json::Value =
            json5::from_str(text).map_err(|err| ConfigError::from_json5(path, err))?;
        let config: Self =
            serde_json::from_value(value).map_err(|err| ConfigError::from_json(path, &err))?;

        let messages = config.validate();
        if messages.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Invalid {
                path: path.to_owned(),
                messages,
            })
        }
    }

    /// Checks constraints the type system cannot express.
    ///
    /// Returns one message per offending field; empty when valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut messages = Vec::new();

        for (index, barrel) in self.barrels.iter().enumerate() {
            let at = format!("barrels[{index}]");

            if barrel.name.trim().is_empty() {
                messages.push(format!("{at}.name: must not be empty"));
            } else if barrel.name.ends_with(['/', '\\']) {
                messages.push(format!("{at}.name: must name a file, not a directory"));
            }

            check_globs(&mut messages, &format!("{at}.include"), &barrel.include);
            check_globs(&mut messages, &format!("{at}.exclude"), &barrel.exclude);

            for pattern in barrel.exports.keys() {
                if let Err(err) = compile_glob(pattern) {
                    messages.push(format!("{at}.exports[\"{pattern}\"]: {}", err.kind()));
                }
            }
        }

        messages
    }

    /// The global formatting overrides.
    #[must_use]
    pub const fn format_overrides(&self) -> FormatOverrides {
        FormatOverrides {
            bracket_spacing: self.bracket_spacing,
            single_quote: self.single_quote,
            semi: self.semi,
            insert_final_newline: self.insert_final_newline,
            type_prefix: self.type_prefix,
        }
    }

    /// Resolved formatting flags for `barrel`.
    #[must_use]
    pub fn format_for(&self, barrel: &BarrelConfig) -> FormatOptions {
        FormatOptions::resolve(&barrel.format_overrides(), &self.format_overrides())
    }
}

/// Compiles a glob the way discovery matches it: `*` never crosses `/`.
///
/// Patterns are matched against root-relative paths, so leading `./`
/// segments are dropped first.
///
/// # Examples
///
/// ```
/// use barrelize_core::compile_glob;
///
/// let glob = compile_glob("./models/*.ts")?.compile_matcher();
/// assert!(glob.is_match("models/user.ts"));
/// assert!(!glob.is_match("models/nested/user.ts"));
/// # Ok::<(), globset::Error>(())
/// ```
///
/// # Errors
///
/// Returns the `globset` error for malformed patterns.
pub fn compile_glob(pattern: &str) -> Result<globset::Glob, globset::Error> {
    GlobBuilder::new(strip_current_dir(pattern))
        .literal_separator(true)
        .backslash_escape(true)
        .build()
}

/// Drops every leading `./` from a pattern.
fn strip_current_dir(mut pattern: &str) -> &str {
    while let Some(rest) = pattern.strip_prefix("./") {
        pattern = rest.trim_start_matches('/');
    }
    pattern
}

fn check_globs(messages: &mut Vec<String>, at: &str, patterns: &[String]) {
    for (index, pattern) in patterns.iter().enumerate() {
        if let Err(err) = compile_glob(pattern) {
            messages.push(format!("{at}[{index}]: {}", err.kind()));
        }
    }
}

/// Configuration for the file watcher.
///
/// Not part of the `.barrelize` file; the CLI constructs it.
///
/// # Examples
///
/// ```
/// use barrelize_core::WatchConfig;
///
/// let config = WatchConfig::default();
/// assert_eq!(config.debounce_ms, 100);
/// assert!(config.recursive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Debounce window in milliseconds.
    ///
    /// Multiple file changes within this window are batched into a single event.
    pub debounce_ms: u64,

    /// Whether to watch subdirectories recursively.
    pub recursive: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            recursive: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Config, ConfigError> {
        Config::from_json_str(Utf8Path::new(".barrelize"), text)
    }

    #[test]
    fn test_empty_object_uses_default_scope() {
        let config = parse("{}").expect("valid config");
        assert_eq!(config, Config::default());
        assert_eq!(config.barrels[0].exclude, vec!["**/*.test.ts"]);
    }

    #[test]
    fn test_scope_fields_default_individually() {
        let config = parse(r#"{"barrels": [{"root": "lib", "order": ["types"]}]}"#)
            .expect("valid config");
        let barrel = &config.barrels[0];
        assert_eq!(barrel.root, "lib");
        assert_eq!(barrel.name, "index.ts");
        assert_eq!(barrel.include, vec!["**/*.ts"]);
        assert!(barrel.exclude.is_empty());
        assert_eq!(barrel.order, vec!["types"]);
        assert_eq!(barrel.replace.len(), 1);
    }

    #[test]
    fn test_replace_and_exports_preserve_declaration_order() {
        let config = parse(
            r#"{"barrels": [{
                "replace": {"/b/": "1", "/a/": "2", "c": "3"},
                "exports": {"**/z.ts": ["z"], "**/a.ts": ["a", "* as all"]}
            }]}"#,
        )
        .expect("valid config");
        let barrel = &config.barrels[0];
        let keys: Vec<_> = barrel.replace.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["/b/", "/a/", "c"]);
        let globs: Vec<_> = barrel.exports.keys().map(String::as_str).collect();
        assert_eq!(globs, vec!["**/z.ts", "**/a.ts"]);
    }

    #[test]
    fn test_schema_field_is_accepted() {
        let config = parse(r#"{"$schema": "node_modules/barrelize/schema.json"}"#)
            .expect("valid config");
        assert_eq!(
            config.schema.as_deref(),
            Some("node_modules/barrelize/schema.json")
        );
    }

    #[test]
    fn test_unknown_field_is_invalid() {
        let err = parse(r#"{"barrels": [{"roots": "src"}]}"#).expect_err("should fail");
        match err {
            ConfigError::Invalid { messages, .. } => {
                assert!(messages[0].contains("roots"), "{messages:?}");
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_type_is_invalid() {
        let err = parse(r#"{"semi": "yes"}"#).expect_err("should fail");
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_syntax_error_carries_location() {
        let err = parse("{\n  \"semi\": true,\n  ]").expect_err("should fail");
        match err {
            ConfigError::Syntax { line, column, .. } => {
                assert_eq!(line, 3);
                assert!(column > 0);
            }
            other => panic!("expected Syntax, got {other:?}"),
        }
    }

    #[test]
    fn test_comments_and_trailing_commas() {
        let config = parse(
            r#"{
                // shared formatting
                "semi": false,
                /* one scope */
                barrels: [
                    {
                        root: 'lib',
                        exclude: ["**/*.spec.ts",],
                    },
                ],
            }"#,
        )
        .expect("valid config");
        assert_eq!(config.semi, Some(false));
        assert_eq!(config.barrels[0].root, "lib");
        assert_eq!(config.barrels[0].exclude, vec!["**/*.spec.ts"]);
    }

    #[test]
    fn test_validation_reports_every_field() {
        let err = parse(
            r#"{"barrels": [
                {"name": ""},
                {"include": ["src/[a-"], "exclude": ["ok/**", "bad/{x"], "exports": {"[": ["x"]}}
            ]}"#,
        )
        .expect_err("should fail");
        match err {
            ConfigError::Invalid { messages, .. } => {
                assert_eq!(messages.len(), 4, "{messages:?}");
                assert!(messages[0].starts_with("barrels[0].name"));
                assert!(messages[1].starts_with("barrels[1].include[0]"));
                assert!(messages[2].starts_with("barrels[1].exclude[1]"));
                assert!(messages[3].starts_with("barrels[1].exports[\"[\"]"));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_bom_is_ignored() {
        let config = parse("\u{feff}{\"semi\": false}").expect("valid config");
        assert_eq!(config.semi, Some(false));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = Utf8Path::from_path(dir.path())
            .expect("utf8")
            .join(DEFAULT_CONFIG_FILE);
        let err = Config::load(&path).expect_err("should fail");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = Utf8Path::from_path(dir.path())
            .expect("utf8")
            .join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, r#"{"barrels": [{"root": "app"}]}"#).expect("write");
        let config = Config::load(&path).expect("load");
        assert_eq!(config.barrels[0].root, "app");
    }

    #[test]
    fn test_format_precedence() {
        let config: Config = serde_json::from_str(
            r#"{"singleQuote": false, "semi": false,
                "barrels": [{"semi": true}, {}]}"#,
        )
        .expect("valid");

        let first = config.format_for(&config.barrels[0]);
        assert!(first.semi);
        assert!(!first.single_quote);
        assert_eq!(first.quote(), '"');
        assert_eq!(first.terminator(), ";");

        let second = config.format_for(&config.barrels[1]);
        assert!(!second.semi);
        assert_eq!(second.terminator(), "");
        assert!(second.bracket_spacing);
        assert!(second.insert_final_newline);
        assert!(second.type_prefix);
    }

    #[test]
    fn test_display_path() {
        let mut barrel = BarrelConfig::default_scope();
        assert_eq!(barrel.display_path(), "src/index.ts");
        barrel.root = "./".to_owned();
        assert_eq!(barrel.display_path(), "index.ts");
        barrel.root = "src/".to_owned();
        barrel.name = "./lib/barrel.ts".to_owned();
        assert_eq!(barrel.display_path(), "src/lib/barrel.ts");
    }

    #[test]
    fn test_compile_glob_ignores_current_dir_prefix() {
        assert_eq!(strip_current_dir("././src/*.ts"), "src/*.ts");
        assert_eq!(strip_current_dir(".//**/*.ts"), "**/*.ts");
        assert_eq!(strip_current_dir("../shared/*.ts"), "../shared/*.ts");
        assert_eq!(strip_current_dir(".hidden/*.ts"), ".hidden/*.ts");

        let matcher = compile_glob("./**/*.ts").expect("valid glob").compile_matcher();
        assert!(matcher.is_match("helpers.ts"));
        assert!(matcher.is_match("api/client.ts"));
    }

    #[test]
    fn test_watch_config_defaults() {
        let config = WatchConfig::default();
        assert_eq!(config.debounce_ms, 100);
        assert!(config.recursive);
    }
}
