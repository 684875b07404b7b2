//! Delimited regions inside hand-maintained aggregator files.
//!
//! A file containing a `barrelize-start` comment line followed later by a
//! `barrelize-end` comment line only has the text between those two lines
//! regenerated:
//!
//! ```text
//! import './polyfills';
//!
//! // barrelize-start
//! export * from './user';
//! // barrelize-end
//!
//! export const version = '1.0.0';
//! ```

/// Start marker token.
pub const START_MARKER: &str = "barrelize-start";

/// End marker token.
pub const END_MARKER: &str = "barrelize-end";

/// A file split around its generated region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region<'a> {
    /// Everything up to and including the start-marker line.
    pub before: &'a str,
    /// The generated text between the marker lines.
    pub content: &'a str,
    /// Everything from the start of the end-marker line.
    pub after: &'a str,
}

impl Region<'_> {
    /// Returns the file with the region body replaced.
    #[must_use]
    pub fn splice(&self, content: &str) -> String {
        let mut out =
            String::with_capacity(self.before.len() + content.len() + self.after.len());
        out.push_str(self.before);
        out.push_str(content);
        out.push_str(self.after);
        out
    }
}

/// Finds the first start marker and the first end marker after it.
///
/// Returns `None` when either is missing, meaning the whole file is owned by
/// the generator.
#[must_use]
pub fn find_region(text: &str) -> Option<Region<'_>> {
    let mut offset = 0;
    let mut content_start = None;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        match content_start {
            None if is_marker(line, START_MARKER) => content_start = Some(offset),
            Some(start) if is_marker(line, END_MARKER) => {
                return Some(Region {
                    before: &text[..start],
                    content: &text[start..line_start],
                    after: &text[line_start..],
                });
            }
            _ => {}
        }
    }

    None
}

/// Returns `true` if `line` is a comment holding only `token`.
fn is_marker(line: &str, token: &str) -> bool {
    let line = line.trim();
    let line = line
        .strip_prefix("//")
        .or_else(|| line.strip_prefix("/*"))
        .unwrap_or(line);
    let line = line.strip_suffix("*/").unwrap_or(line);
    line.trim_matches(|c: char| c.is_whitespace() || c == '*') == token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_forms() {
        assert!(is_marker("// barrelize-start\n", START_MARKER));
        assert!(is_marker("//barrelize-start", START_MARKER));
        assert!(is_marker("  /* barrelize-end */\r\n", END_MARKER));
        assert!(is_marker("/** barrelize-end **/", END_MARKER));
        assert!(is_marker(" * barrelize-start", START_MARKER));
        assert!(!is_marker("// barrelize-start here", START_MARKER));
        assert!(!is_marker("export * from './barrelize-start';", START_MARKER));
    }

    #[test]
    fn test_find_region_splits_text() {
        let text = "import './a';\n// barrelize-start\nexport * from './x';\n// barrelize-end\ntail\n";
        let region = find_region(text).expect("region");

        assert_eq!(region.before, "import './a';\n// barrelize-start\n");
        assert_eq!(region.content, "export * from './x';\n");
        assert_eq!(region.after, "// barrelize-end\ntail\n");
    }

    #[test]
    fn test_empty_region() {
        let text = "// barrelize-start\n// barrelize-end";
        let region = find_region(text).expect("region");
        assert_eq!(region.content, "");
        assert_eq!(region.after, "// barrelize-end");
    }

    #[test]
    fn test_missing_markers() {
        assert!(find_region("export * from './x';\n").is_none());
        assert!(find_region("// barrelize-start\nexport * from './x';\n").is_none());
        assert!(find_region("// barrelize-end\n// barrelize-start\n").is_none());
    }

    #[test]
    fn test_splice_preserves_surroundings() {
        let text = "head\n/* barrelize-start */\nold\n/* barrelize-end */\nfoot";
        let region = find_region(text).expect("region");
        assert_eq!(
            region.splice("new1\nnew2\n"),
            "head\n/* barrelize-start */\nnew1\nnew2\n/* barrelize-end */\nfoot"
        );
    }
}
