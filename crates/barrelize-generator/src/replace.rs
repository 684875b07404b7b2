//! Path rewriting with first-match-wins replace rules.

use indexmap::IndexMap;

use barrelize_core::ExportPathInfo;

use crate::pattern::Matcher;

/// A scope's compiled replace rules, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ReplaceRules {
    rules: Vec<(Matcher, String)>,
}

impl ReplaceRules {
    /// Compiles the rules, logging every invalid pattern with its 1-based
    /// position.
    #[must_use]
    pub fn compile(replace: &IndexMap<String, String>) -> Self {
        let rules = replace
            .iter()
            .enumerate()
            .map(|(index, (find, replacement))| {
                let matcher = Matcher::parse(find);
                if let Matcher::Invalid { source, reason } = &matcher {
                    tracing::warn!(
                        rule = index + 1,
                        pattern = %source,
                        %reason,
                        "Invalid replace pattern; rule will never match"
                    );
                }
                (matcher, replacement.clone())
            })
            .collect();

        Self { rules }
    }

    /// Rewrites one path with the first rule that matches it.
    ///
    /// Returns `None` when no rule matches.
    #[must_use]
    pub fn apply(&self, path: &str) -> Option<String> {
        self.rules
            .iter()
            .find_map(|(matcher, replacement)| matcher.apply(path, replacement))
    }

    /// Sets each record's `modified_path` from its `original_path`.
    pub fn rewrite(&self, paths: &mut [ExportPathInfo]) {
        for info in paths {
            info.modified_path = self
                .apply(&info.original_path)
                .unwrap_or_else(|| info.original_path.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(pairs: &[(&str, &str)]) -> ReplaceRules {
        ReplaceRules::compile(
            &pairs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        )
    }

    fn rewritten(rules: &ReplaceRules, files: &[&str]) -> Vec<String> {
        let mut paths: Vec<ExportPathInfo> = files.iter().copied().map(ExportPathInfo::new).collect();
        rules.rewrite(&mut paths);
        paths.into_iter().map(|p| p.modified_path).collect()
    }

    #[test]
    fn test_default_rule_strips_extension() {
        let rules = rules(&[("/\\.ts$/", "")]);
        assert_eq!(rewritten(&rules, &["user.ts", "api/client.ts"]), ["user", "api/client"]);
    }

    #[test]
    fn test_first_match_wins() {
        let rules = rules(&[("/^(special)\\.ts$/", "custom-name"), ("/^(regular)\\.ts$/", "$1")]);
        assert_eq!(
            rewritten(&rules, &["special.ts", "regular.ts"]),
            ["custom-name", "regular"]
        );
    }

    #[test]
    fn test_later_rules_not_chained() {
        let rules = rules(&[("/\\.ts$/", ".js"), ("/\\.js$/", "")]);
        assert_eq!(rewritten(&rules, &["user.ts"]), ["user.js"]);
    }

    #[test]
    fn test_literal_requires_equality() {
        let rules = rules(&[("user.ts", "people")]);
        assert_eq!(rewritten(&rules, &["user.ts", "models/user.ts"]), ["people", "models/user.ts"]);
    }

    #[test]
    fn test_invalid_rule_is_skipped() {
        let rules = rules(&[("/(?<=x)\\.ts$/", ""), ("/\\.ts$/", ".mjs")]);
        assert_eq!(rewritten(&rules, &["xa.ts"]), ["xa.mjs"]);
    }

    #[test]
    fn test_no_rules_leave_path_unchanged() {
        let rules = ReplaceRules::default();
        assert_eq!(rewritten(&rules, &["user.ts"]), ["user.ts"]);
    }
}
