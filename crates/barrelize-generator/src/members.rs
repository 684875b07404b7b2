//! Member selection for files matched by export rules.
//!
//! An export rule maps a glob to a list of selector strings:
//!
//! | Selector                   | Meaning                                         |
//! |----------------------------|-------------------------------------------------|
//! | `*`                        | `export * from '...'`                           |
//! | `* as utils`               | `export * as utils from '...'`                  |
//! | `User`                     | `export { User } from '...'`                    |
//! | `User as Person`           | `export { User as Person } from '...'`          |
//! | `/Service$/`               | every export whose name matches                 |
//! | `/(.+)Config$/ as $1Settings` | every match, renamed with group expansion    |
//!
//! The alias may use `@fileName` (the matched file's name without its last
//! extension) and `@exportName` (the declared name of a default export, or
//! the member's own name).
//!
//! A wildcard selector replaces every other selector for the file. A literal
//! name the file does not export is still emitted, without a type prefix.

use camino::{Utf8Path, Utf8PathBuf};
use globset::GlobMatcher;
use indexmap::IndexMap;

use barrelize_core::{ExportInfo, ExportMember, ExportPathInfo, compile_glob};
use barrelize_ts_parser::ExportExtractor;

use crate::cache::ExportCache;
use crate::pattern::{JsRegex, PatternError, parse_regex_literal};

/// Alias variable for the matched file's name.
const FILE_NAME_VAR: &str = "@fileName";

/// Alias variable for a member's declared name.
const EXPORT_NAME_VAR: &str = "@exportName";

/// What a selector looks for.
#[derive(Debug, Clone)]
pub enum SelectorFind {
    /// `*`
    Wildcard,
    /// An exact member name.
    Literal(String),
    /// A regex literal tested against every member name.
    Pattern(JsRegex),
}

/// One parsed selector string.
#[derive(Debug, Clone)]
pub struct Selector {
    /// The find half.
    pub find: SelectorFind,
    /// The `as` target, when present.
    pub to_name: Option<String>,
}

impl Selector {
    /// Parses `find` or `find as toName`.
    ///
    /// The separator is the last whitespace-delimited `as` token.
    ///
    /// # Errors
    ///
    /// Returns the [`PatternError`] of a regex-shaped find that does not
    /// compile.
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        let source = source.trim();
        let (find, to_name) = match split_as(source) {
            Some((find, to_name)) => (find, Some(to_name.to_owned())),
            None => (source, None),
        };

        let find = if find == "*" {
            SelectorFind::Wildcard
        } else {
            match parse_regex_literal(find) {
                None => SelectorFind::Literal(find.to_owned()),
                Some(Ok(regex)) => SelectorFind::Pattern(regex),
                Some(Err(err)) => return Err(err),
            }
        };

        Ok(Self { find, to_name })
    }

    /// Returns `true` for `*` and `* as alias`.
    #[must_use]
    pub const fn is_wildcard(&self) -> bool {
        matches!(self.find, SelectorFind::Wildcard)
    }
}

/// Splits at the last ` as ` whose `as` is surrounded by whitespace.
fn split_as(source: &str) -> Option<(&str, &str)> {
    let bytes = source.as_bytes();
    let mut index = source.len().checked_sub(3)?;

    loop {
        let is_separator = bytes[index..].starts_with(b"as")
            && index > 0
            && bytes[index - 1].is_ascii_whitespace()
            && bytes.get(index + 2).is_some_and(u8::is_ascii_whitespace);

        if is_separator {
            let find = source[..index].trim();
            let to_name = source[index + 2..].trim();
            if !find.is_empty() && !to_name.is_empty() {
                return Some((find, to_name));
            }
        }

        index = index.checked_sub(1)?;
    }
}

/// Replaces `@fileName` and `@exportName` in an alias template.
fn substitute(template: &str, file_name: &str, export_name: &str) -> String {
    template
        .replace(FILE_NAME_VAR, file_name)
        .replace(EXPORT_NAME_VAR, export_name)
}

/// Resolves a file's members against its selectors.
///
/// `selectors` must be non-empty. The result is in selector order, then in
/// declaration order within one regex selector; each source name appears
/// once, with the last registration winning.
#[must_use]
pub fn resolve_members(
    selectors: &[Selector],
    exports: &[ExportInfo],
    file_name: &str,
) -> Vec<ExportMember> {
    if let Some(wildcard) = selectors.iter().find(|s| s.is_wildcard()) {
        let default_name = exports
            .iter()
            .find(|info| info.name == "default")
            .and_then(|info| info.local_name.as_deref())
            .unwrap_or(file_name);
        let alias = wildcard
            .to_name
            .as_deref()
            .map(|template| substitute(template, file_name, default_name));
        return vec![ExportMember::Wildcard { alias }];
    }

    let mut members: IndexMap<String, ExportMember> = IndexMap::new();

    for selector in selectors {
        match &selector.find {
            SelectorFind::Wildcard => {}
            SelectorFind::Literal(name) => {
                let member = match exports.iter().find(|info| info.name == *name) {
                    Some(info) => {
                        let alias = selector
                            .to_name
                            .as_deref()
                            .map(|t| substitute(t, file_name, info.alias_source()));
                        ExportMember::named(&info.name, alias, info.is_type())
                    }
                    None => {
                        let alias = selector
                            .to_name
                            .as_deref()
                            .map(|t| substitute(t, file_name, name));
                        ExportMember::named(name, alias, false)
                    }
                };
                members.insert(name.clone(), member);
            }
            SelectorFind::Pattern(regex) => {
                for info in exports.iter().filter(|info| regex.is_match(&info.name)) {
                    let alias = selector.to_name.as_deref().map(|t| {
                        let template = substitute(t, file_name, info.alias_source());
                        regex.replace(&info.name, &template)
                    });
                    members.insert(
                        info.name.clone(),
                        ExportMember::named(&info.name, alias, info.is_type()),
                    );
                }
            }
        }
    }

    members.into_values().collect()
}

/// One compiled export rule.
#[derive(Debug, Clone)]
pub struct ExportRule {
    /// The configured glob.
    pub pattern: String,
    matcher: GlobMatcher,
    selectors: Vec<Selector>,
}

impl ExportRule {
    /// Returns `true` if the rule applies to a discovered path.
    #[must_use]
    pub fn matches(&self, original_path: &str) -> bool {
        self.matcher.is_match(original_path)
    }

    /// The rule's valid selectors.
    #[must_use]
    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }
}

/// A scope's export rules, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ExportRules {
    rules: Vec<ExportRule>,
}

impl ExportRules {
    /// Compiles the rules.
    ///
    /// Rules with an invalid glob, and selectors with an invalid pattern, are
    /// logged with their 1-based position and skipped. Rules left without
    /// selectors are dropped, so they never touch a file.
    #[must_use]
    pub fn compile(exports: &IndexMap<String, Vec<String>>) -> Self {
        let mut rules = Vec::with_capacity(exports.len());

        for (rule_index, (pattern, selector_sources)) in exports.iter().enumerate() {
            let matcher = match compile_glob(pattern) {
                Ok(glob) => glob.compile_matcher(),
                Err(err) => {
                    tracing::warn!(rule = rule_index + 1, %pattern, error = %err, "Invalid export glob; rule skipped");
                    continue;
                }
            };

            let selectors: Vec<Selector> = selector_sources
                .iter()
                .enumerate()
                .filter_map(|(index, source)| match Selector::parse(source) {
                    Ok(selector) => Some(selector),
                    Err(reason) => {
                        tracing::warn!(
                            rule = rule_index + 1,
                            selector = index + 1,
                            %source,
                            %reason,
                            "Invalid selector pattern; selector skipped"
                        );
                        None
                    }
                })
                .collect();

            if selectors.is_empty() {
                continue;
            }

            rules.push(ExportRule {
                pattern: pattern.clone(),
                matcher,
                selectors,
            });
        }

        Self { rules }
    }

    /// Returns `true` if no rule can select members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The compiled rules.
    #[must_use]
    pub fn rules(&self) -> &[ExportRule] {
        &self.rules
    }

    /// Absolute paths of the discovered files some rule applies to.
    #[must_use]
    pub fn matched_files(&self, root: &Utf8Path, paths: &[ExportPathInfo]) -> Vec<Utf8PathBuf> {
        paths
            .iter()
            .filter(|info| self.rules.iter().any(|rule| rule.matches(&info.original_path)))
            .map(|info| root.join(&info.original_path))
            .collect()
    }

    /// Sets `exports` on every discovered file a rule applies to.
    ///
    /// A later rule that matches the same file replaces the earlier result.
    pub fn resolve(
        &self,
        root: &Utf8Path,
        paths: &mut [ExportPathInfo],
        cache: &ExportCache,
        extractor: &mut ExportExtractor,
    ) {
        for rule in &self.rules {
            for info in paths.iter_mut().filter(|info| rule.matches(&info.original_path)) {
                let exports = cache.get_or_extract(&root.join(&info.original_path), extractor);
                let members = resolve_members(&rule.selectors, &exports, info.file_stem());
                tracing::trace!(
                    path = %info.original_path,
                    rule = %rule.pattern,
                    members = members.len(),
                    "Resolved export members"
                );
                info.exports = Some(members);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selectors(sources: &[&str]) -> Vec<Selector> {
        sources
            .iter()
            .map(|s| Selector::parse(s).expect("valid selector"))
            .collect()
    }

    fn rendered(sources: &[&str], exports: &[ExportInfo], file_name: &str) -> Vec<String> {
        resolve_members(&selectors(sources), exports, file_name)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_split_as() {
        assert_eq!(split_as("User as Person"), Some(("User", "Person")));
        assert_eq!(split_as("  * \t as   helpers "), Some(("*", "helpers")));
        assert_eq!(split_as("alias"), None);
        assert_eq!(split_as("User as"), None);
        assert_eq!(split_as("as"), None);
        assert_eq!(split_as("/has/ as x"), Some(("/has/", "x")));
    }

    #[test]
    fn test_selector_parse_variants() {
        assert!(Selector::parse("*").expect("wildcard").is_wildcard());
        assert!(matches!(
            Selector::parse("User").expect("literal").find,
            SelectorFind::Literal(ref name) if name == "User"
        ));
        let renamed = Selector::parse("/(.+)Config$/ as $1Settings").expect("pattern");
        assert!(matches!(renamed.find, SelectorFind::Pattern(_)));
        assert_eq!(renamed.to_name.as_deref(), Some("$1Settings"));
        assert!(Selector::parse("/(?=x)/").is_err());
    }

    #[test]
    fn test_wildcard_subsumes_other_selectors() {
        let exports = [ExportInfo::value("helper1"), ExportInfo::value("helper2")];
        assert_eq!(rendered(&["* as helpers", "helper1"], &exports, "helpers"), ["* as helpers"]);
        assert_eq!(rendered(&["helper1", "*"], &exports, "helpers"), ["*"]);
    }

    #[test]
    fn test_literal_selection_with_type_prefix() {
        let exports = [
            ExportInfo::type_only("User"),
            ExportInfo::value("createUser"),
            ExportInfo::value("deleteUser"),
        ];
        assert_eq!(
            rendered(&["createUser", "User as Person"], &exports, "user"),
            ["createUser", "type User as Person"]
        );
    }

    #[test]
    fn test_missing_member_passes_through() {
        let exports = [ExportInfo::type_only("User")];
        assert_eq!(
            rendered(&["nonExistent", "other as alias"], &exports, "user"),
            ["nonExistent", "other as alias"]
        );
    }

    #[test]
    fn test_regex_selector_renames_with_groups() {
        let exports = [
            ExportInfo::value("AuthConfig"),
            ExportInfo::value("DbConfig"),
            ExportInfo::value("helper"),
        ];
        assert_eq!(
            rendered(&["/(.+)Config$/ as $1Settings"], &exports, "config"),
            ["AuthConfig as AuthSettings", "DbConfig as DbSettings"]
        );
    }

    #[test]
    fn test_regex_selector_without_alias_keeps_names() {
        let exports = [
            ExportInfo::type_only("UserDto"),
            ExportInfo::value("mapUser"),
            ExportInfo::type_only("RoleDto"),
        ];
        assert_eq!(
            rendered(&["/Dto$/"], &exports, "dto"),
            ["type UserDto", "type RoleDto"]
        );
    }

    #[test]
    fn test_regex_matching_nothing_yields_empty() {
        let exports = [ExportInfo::value("a")];
        assert!(rendered(&["/^zzz/"], &exports, "a").is_empty());
    }

    #[test]
    fn test_duplicate_registration_keeps_first_position() {
        let exports = [ExportInfo::value("a"), ExportInfo::value("b")];
        assert_eq!(rendered(&["a", "b", "a as c"], &exports, "x"), ["a as c", "b"]);
    }

    #[test]
    fn test_file_name_variable() {
        let exports = [ExportInfo::value("default")];
        assert_eq!(
            rendered(&["default as @fileName"], &exports, "my.helper"),
            ["default as my.helper"]
        );
        assert_eq!(rendered(&["* as @fileName"], &exports, "utils"), ["* as utils"]);
    }

    #[test]
    fn test_export_name_variable() {
        let exports = [
            ExportInfo::value("default").with_local_name("LoginService"),
            ExportInfo::value("helper"),
        ];
        assert_eq!(
            rendered(&["default as @exportName", "helper as @exportNameFn"], &exports, "login"),
            ["default as LoginService", "helper as helperFn"]
        );
        assert_eq!(rendered(&["* as @exportName"], &exports, "login"), ["* as LoginService"]);
    }

    #[test]
    fn test_export_name_falls_back_for_anonymous_default() {
        let exports = [ExportInfo::value("default")];
        assert_eq!(rendered(&["* as @exportName"], &exports, "widget"), ["* as widget"]);
        assert_eq!(rendered(&["default as @exportName"], &exports, "widget"), ["default"]);
    }

    #[test]
    fn test_rules_skip_empty_and_invalid() {
        let mut config = IndexMap::new();
        config.insert("**/*.ts".to_owned(), Vec::new());
        config.insert("models/*.ts".to_owned(), vec!["/(?<=x)/".to_owned()]);
        config.insert("api/*.ts".to_owned(), vec!["*".to_owned()]);

        let rules = ExportRules::compile(&config);
        assert_eq!(rules.rules().len(), 1);
        assert!(rules.rules()[0].matches("api/client.ts"));
        assert!(!rules.rules()[0].matches("api/v2/client.ts"));
    }

    #[test]
    fn test_rule_glob_with_current_dir_prefix() {
        let mut config = IndexMap::new();
        config.insert("./helpers.ts".to_owned(), vec!["h1".to_owned()]);
        config.insert("././models/*.ts".to_owned(), vec!["*".to_owned()]);

        let rules = ExportRules::compile(&config);
        assert_eq!(rules.rules().len(), 2);
        assert!(rules.rules()[0].matches("helpers.ts"));
        assert!(rules.rules()[1].matches("models/user.ts"));

        let paths = [ExportPathInfo::new("helpers.ts"), ExportPathInfo::new("a.ts")];
        assert_eq!(
            rules.matched_files(Utf8Path::new("/app/src"), &paths),
            [Utf8PathBuf::from("/app/src/helpers.ts")]
        );
    }
}
