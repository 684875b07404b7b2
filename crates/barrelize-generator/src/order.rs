//! Ordering of discovered paths.
//!
//! Paths that start with one of the scope's order prefixes come first, grouped
//! by the first prefix they match, shallower paths before deeper ones.
//! Everything else follows in alphabetical order.

use std::cmp::Ordering;

use barrelize_core::ExportPathInfo;

/// Sorts `paths` in place by `original_path`.
///
/// # Examples
///
/// ```
/// use barrelize_core::ExportPathInfo;
/// use barrelize_generator::order_paths;
///
/// let mut paths: Vec<_> = ["utils.ts", "api/client.ts", "types.ts"]
///     .into_iter()
///     .map(ExportPathInfo::new)
///     .collect();
/// order_paths(&["types".to_owned(), "api".to_owned()], &mut paths);
///
/// let order: Vec<_> = paths.iter().map(|p| p.original_path.as_str()).collect();
/// assert_eq!(order, ["types.ts", "api/client.ts", "utils.ts"]);
/// ```
pub fn order_paths(order: &[String], paths: &mut [ExportPathInfo]) {
    paths.sort_by(|a, b| compare_paths(order, &a.original_path, &b.original_path));
}

/// The total order used by [`order_paths`].
#[must_use]
pub fn compare_paths(order: &[String], a: &str, b: &str) -> Ordering {
    let rank = |path: &str| {
        order
            .iter()
            .position(|prefix| path.starts_with(prefix.as_str()))
            .unwrap_or(order.len())
    };

    let (rank_a, rank_b) = (rank(a), rank(b));
    rank_a.cmp(&rank_b).then_with(|| {
        if rank_a < order.len() {
            segments(a)
                .cmp(&segments(b))
                .then_with(|| alphabetical(a, b))
        } else {
            alphabetical(a, b)
        }
    })
}

fn segments(path: &str) -> usize {
    path.split('/').count()
}

/// Case-folded comparison, falling back to byte order for a total order.
fn alphabetical(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ordered(order: &[&str], files: &[&str]) -> Vec<String> {
        let order: Vec<String> = order.iter().map(ToString::to_string).collect();
        let mut paths: Vec<ExportPathInfo> = files.iter().copied().map(ExportPathInfo::new).collect();
        order_paths(&order, &mut paths);
        paths.into_iter().map(|p| p.original_path).collect()
    }

    #[test]
    fn test_prefix_groups_then_alphabetical_remainder() {
        let result = ordered(
            &["types", "constants", "api"],
            &["utils.ts", "components/button.ts", "api/client.ts", "constants.ts", "types.ts"],
        );
        assert_eq!(
            result,
            ["types.ts", "constants.ts", "api/client.ts", "components/button.ts", "utils.ts"]
        );
    }

    #[test]
    fn test_shallower_first_within_prefix() {
        let result = ordered(&["models"], &["models/a/deep.ts", "models/z.ts", "models/b/x.ts"]);
        assert_eq!(result, ["models/z.ts", "models/a/deep.ts", "models/b/x.ts"]);
    }

    #[test]
    fn test_first_matching_prefix_wins() {
        let result = ordered(&["api", "api/admin"], &["api/admin/users.ts", "api/a.ts"]);
        assert_eq!(result, ["api/a.ts", "api/admin/users.ts"]);
    }

    #[test]
    fn test_empty_order_is_alphabetical() {
        let result = ordered(&[], &["b.ts", "a/z.ts", "B2.ts", "a.ts"]);
        assert_eq!(result, ["a.ts", "a/z.ts", "b.ts", "B2.ts"]);
    }

    #[test]
    fn test_case_fold_tie_breaks_by_bytes() {
        let result = ordered(&[], &["user.ts", "User.ts"]);
        assert_eq!(result, ["User.ts", "user.ts"]);
    }
}
