//! Insertions and deletions between two versions of a barrel.

use barrelize_core::FxHashSet;

/// Module paths added to and removed from a barrel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathsDiff {
    /// Paths exported now but not before, in new order.
    pub insertions: Vec<String>,
    /// Paths exported before but not now, in old order.
    pub deletions: Vec<String>,
}

impl PathsDiff {
    /// Computes `new - old` and `old - new`.
    #[must_use]
    pub fn between(old: &[String], new: &[String]) -> Self {
        let old_set: FxHashSet<&str> = old.iter().map(String::as_str).collect();
        let new_set: FxHashSet<&str> = new.iter().map(String::as_str).collect();

        Self {
            insertions: unique(new.iter().filter(|path| !old_set.contains(path.as_str()))),
            deletions: unique(old.iter().filter(|path| !new_set.contains(path.as_str()))),
        }
    }

    /// Returns `true` if nothing was added or removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.insertions.is_empty() && self.deletions.is_empty()
    }
}

fn unique<'a>(paths: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen = FxHashSet::default();
    paths
        .filter(|path| seen.insert(path.as_str()))
        .cloned()
        .collect()
}

/// Recovers the module paths of a barrel's `'./x'` and `"./x"` specifiers,
/// without the leading `./`.
///
/// # Examples
///
/// ```
/// use barrelize_generator::exported_paths;
///
/// let text = "export * from './user';\nexport { A } from \"./models/a\";\n";
/// assert_eq!(exported_paths(text), ["user", "models/a"]);
/// ```
#[must_use]
pub fn exported_paths(content: &str) -> Vec<String> {
    let bytes = content.as_bytes();
    let mut paths = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let quote = bytes[i];
        if (quote == b'\'' || quote == b'"') && bytes[i + 1..].starts_with(b"./") {
            let start = i + 3;
            let end = bytes[start..]
                .iter()
                .position(|&b| b == quote || b == b'\n')
                .map(|len| start + len);

            if let Some(end) = end.filter(|&end| end > start && bytes[end] == quote) {
                paths.push(content[start..end].to_owned());
                i = end + 1;
                continue;
            }
        }
        i += 1;
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_exported_paths_mixed_quotes() {
        let text = "export * from './a';\nexport { B as C } from \"./b/c\";\nexport * from './d'";
        assert_eq!(exported_paths(text), ["a", "b/c", "d"]);
    }

    #[test]
    fn test_exported_paths_ignores_other_strings() {
        let text = "import x from 'lib';\nconst s = './unterminated\nexport * from '../up';\n''./";
        assert!(exported_paths(text).is_empty());
    }

    #[test]
    fn test_diff_directions() {
        let old = strings(&["a", "b", "c"]);
        let new = strings(&["b", "c", "d", "e"]);
        let diff = PathsDiff::between(&old, &new);

        assert_eq!(diff.insertions, ["d", "e"]);
        assert_eq!(diff.deletions, ["a"]);
        assert!(!diff.is_empty());
    }

    #[test]
    fn test_diff_deduplicates() {
        let old = strings(&["x", "x"]);
        let new = strings(&["y", "y"]);
        let diff = PathsDiff::between(&old, &new);

        assert_eq!(diff.insertions, ["y"]);
        assert_eq!(diff.deletions, ["x"]);
    }

    #[test]
    fn test_diff_reordering_is_empty() {
        let diff = PathsDiff::between(&strings(&["a", "b"]), &strings(&["b", "a"]));
        assert!(diff.is_empty());
    }
}
