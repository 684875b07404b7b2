//! Domain types shared by the extractor and the generation pipeline.
//!
//! - [`ExportInfo`] - one exported symbol of a source file
//! - [`ExportPathInfo`] - the working record for one discovered file
//! - [`ExportMember`] - one member of a rendered re-export statement

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether an export is a runtime value or only exists at the type level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    /// Functions, classes, variables, enums, namespaces and defaults.
    #[default]
    Value,
    /// Interfaces, type aliases and members of `export type { .. }`.
    Type,
}

/// A symbol exported by a source file.
///
/// Produced by the export extractor in declaration order and never modified
/// afterwards.
///
/// # Examples
///
/// ```
/// use barrelize_core::{ExportInfo, ExportKind};
///
/// let info = ExportInfo::value("createUser");
/// assert_eq!(info.kind, ExportKind::Value);
/// assert_eq!(info.alias_source(), "createUser");
///
/// let default = ExportInfo::value("default").with_local_name("LoginService");
/// assert_eq!(default.alias_source(), "LoginService");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExportInfo {
    /// The exported name as seen by importers (`default` for default exports).
    pub name: String,

    /// Value or type-only.
    pub kind: ExportKind,

    /// The declared local name when it differs from `name`.
    ///
    /// Set for `export default class Foo` (local `Foo`) and for
    /// `export { Foo as default }`.
    pub local_name: Option<String>,
}

impl ExportInfo {
    /// Creates an export record of the given kind.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ExportKind) -> Self {
        Self {
            name: name.into(),
            kind,
            local_name: None,
        }
    }

    /// Creates a value export.
    #[must_use]
    pub fn value(name: impl Into<String>) -> Self {
        Self::new(name, ExportKind::Value)
    }

    /// Creates a type-only export.
    #[must_use]
    pub fn type_only(name: impl Into<String>) -> Self {
        Self::new(name, ExportKind::Type)
    }

    /// Records the local declared name.
    #[must_use]
    pub fn with_local_name(mut self, local: impl Into<String>) -> Self {
        self.local_name = Some(local.into());
        self
    }

    /// Returns `true` for type-only exports.
    #[inline]
    #[must_use]
    pub fn is_type(&self) -> bool {
        self.kind == ExportKind::Type
    }

    /// The name substituted for `@exportName` in selector aliases.
    #[must_use]
    pub fn alias_source(&self) -> &str {
        self.local_name.as_deref().unwrap_or(&self.name)
    }
}

/// One member of a rendered re-export.
///
/// Wildcards render as their own statement; named members are collected into
/// a single bracketed statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExportMember {
    /// `*` or `* as alias`.
    Wildcard {
        /// Namespace alias.
        alias: Option<String>,
    },
    /// `name`, `type name`, or `name as alias`.
    Named {
        /// The member's exported name in the source module.
        name: String,
        /// The name it is re-exported under, when different.
        alias: Option<String>,
        /// Whether the member is type-only.
        type_only: bool,
    },
}

impl ExportMember {
    /// Creates a named member, dropping an alias identical to the name.
    #[must_use]
    pub fn named(name: impl Into<String>, alias: Option<String>, type_only: bool) -> Self {
        let name = name.into();
        let alias = alias.filter(|alias| *alias != name);
        Self::Named {
            name,
            alias,
            type_only,
        }
    }

    /// Returns `true` for `*` and `* as alias`.
    #[inline]
    #[must_use]
    pub const fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard { .. })
    }

    /// Formats the member, emitting the `type` keyword only when
    /// `type_prefix` is enabled.
    #[must_use]
    pub fn render(&self, type_prefix: bool) -> String {
        match self {
            Self::Wildcard { alias: None } => "*".to_owned(),
            Self::Wildcard { alias: Some(alias) } => format!("* as {alias}"),
            Self::Named {
                name,
                alias,
                type_only,
            } => {
                let prefix = if *type_only && type_prefix { "type " } else { "" };
                match alias {
                    Some(alias) => format!("{prefix}{name} as {alias}"),
                    None => format!("{prefix}{name}"),
                }
            }
        }
    }
}

impl fmt::Display for ExportMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(true))
    }
}

/// Working record for one discovered file.
///
/// `original_path` is fixed at discovery. `modified_path` starts equal to it
/// and is rewritten once by the replace rules. `exports` stays `None` (export
/// everything) unless an export rule selects members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPathInfo {
    /// Root-relative, forward-slash path including the extension.
    pub original_path: String,

    /// The module specifier rendered after `./`.
    pub modified_path: String,

    /// Explicitly selected members, in render order.
    pub exports: Option<Vec<ExportMember>>,
}

impl ExportPathInfo {
    /// Creates a record whose modified path equals the original.
    #[must_use]
    pub fn new(original_path: impl Into<String>) -> Self {
        let original_path = original_path.into();
        Self {
            modified_path: original_path.clone(),
            original_path,
            exports: None,
        }
    }

    /// The base name of `original_path` without its last extension.
    ///
    /// This is the value substituted for `@fileName`.
    ///
    /// # Examples
    ///
    /// ```
    /// use barrelize_core::ExportPathInfo;
    ///
    /// let info = ExportPathInfo::new("services/my.helper.ts");
    /// assert_eq!(info.file_stem(), "my.helper");
    /// ```
    #[must_use]
    pub fn file_stem(&self) -> &str {
        let base = self
            .original_path
            .rsplit_once('/')
            .map_or(self.original_path.as_str(), |(_, base)| base);
        match base.rfind('.') {
            Some(idx) if idx > 0 => &base[..idx],
            _ => base,
        }
    }
}
