//! Rendering of re-export statements.

use barrelize_core::{ExportPathInfo, FormatOptions};

/// Renders the statements for one file.
///
/// Files without selected members export everything. Wildcard members each
/// get their own statement, placed before the single bracketed statement
/// holding the named members.
///
/// # Examples
///
/// ```
/// use barrelize_core::{ExportMember, ExportPathInfo, FormatOptions};
/// use barrelize_generator::render_lines;
///
/// let mut info = ExportPathInfo::new("user.ts");
/// info.modified_path = "user".to_owned();
/// assert_eq!(render_lines(&info, &FormatOptions::default()), ["export * from './user';"]);
///
/// info.exports = Some(vec![ExportMember::named("User", None, true)]);
/// assert_eq!(
///     render_lines(&info, &FormatOptions::default()),
///     ["export { type User } from './user';"]
/// );
/// ```
#[must_use]
pub fn render_lines(info: &ExportPathInfo, format: &FormatOptions) -> Vec<String> {
    let quote = format.quote();
    let terminator = format.terminator();
    let from = format!("from {quote}./{}{quote}{terminator}", info.modified_path);

    let Some(members) = &info.exports else {
        return vec![format!("export * {from}")];
    };

    let mut lines: Vec<String> = members
        .iter()
        .filter(|member| member.is_wildcard())
        .map(|member| format!("export {member} {from}"))
        .collect();

    let named: Vec<String> = members
        .iter()
        .filter(|member| !member.is_wildcard())
        .map(|member| member.render(format.type_prefix))
        .collect();

    if !named.is_empty() {
        let space = if format.bracket_spacing { " " } else { "" };
        lines.push(format!("export {{{space}{}{space}}} {from}", named.join(", ")));
    } else if lines.is_empty() {
        lines.push(format!("export {{}} {from}"));
    }

    lines
}

/// Renders every file of a scope, in order.
#[must_use]
pub fn render_all(paths: &[ExportPathInfo], format: &FormatOptions) -> Vec<String> {
    paths
        .iter()
        .flat_map(|info| render_lines(info, format))
        .collect()
}

/// Joins lines into a whole-file body.
#[must_use]
pub fn whole_file_content(lines: &[String], insert_final_newline: bool) -> String {
    let mut content = lines.join("\n");
    if insert_final_newline {
        content.push('\n');
    }
    content
}

/// Joins lines into the body of a delimited region.
///
/// A non-empty region always ends with a newline so the end marker keeps its
/// own line.
#[must_use]
pub fn region_content(lines: &[String]) -> String {
    let mut content = lines.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    content
}
