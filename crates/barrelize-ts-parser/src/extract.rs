//! File-level export extraction with wildcard re-export following.
//!
//! [`ExportExtractor::extract`] reads a file, parses it, and lists its
//! exports. `export * from '<specifier>'` statements are resolved against the
//! directory of the file that contains them and inlined recursively.
//!
//! # Resolution
//!
//! Candidates are tried in order, and the first regular file wins:
//!
//! 1. the specifier as written
//! 2. the specifier plus `.ts`, when the containing file is a typed source
//!    (`.ts`, `.tsx`, `.mts`, `.cts`)
//! 3. the specifier plus `.js`
//!
//! # Cycles
//!
//! The extractor keeps the stack of files currently being expanded. A
//! re-export of a file already on that stack contributes nothing, so cyclic
//! re-exports terminate. Files reached twice through different branches (a
//! diamond) are still inlined twice.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, trace};

use barrelize_core::ExportInfo;

use crate::error::{ExtractError, ParseError};
use crate::exports::{ExportStatement, collect_exports};
use crate::parser::TsParser;
use crate::queries::export_query;

/// Extensions whose re-exports may omit a `.ts` suffix.
const TYPED_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts"];

/// Lists the exports of source files, following wildcard re-exports.
///
/// One extractor owns one parser and should be reused for many files.
///
/// # Examples
///
/// ```no_run
/// use barrelize_ts_parser::ExportExtractor;
/// use camino::Utf8Path;
///
/// let mut extractor = ExportExtractor::new()?;
/// for info in extractor.extract(Utf8Path::new("src/models/user.ts")) {
///     println!("{} ({:?})", info.name, info.kind);
/// }
/// # Ok::<(), barrelize_ts_parser::ParseError>(())
/// ```
#[derive(Debug)]
pub struct ExportExtractor {
    parser: TsParser,
    /// Files currently being expanded, outermost first.
    ancestors: Vec<Utf8PathBuf>,
}

impl ExportExtractor {
    /// Creates an extractor with a fresh parser.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the parser or the export query cannot be
    /// initialised.
    pub fn new() -> Result<Self, ParseError> {
        export_query()?;
        Ok(Self {
            parser: TsParser::new()?,
            ancestors: Vec::new(),
        })
    }

    /// Lists the exports of `path` in declaration order.
    ///
    /// Never fails: a missing, unreadable, or unparsable file yields an empty
    /// list and a debug log entry.
    pub fn extract(&mut self, path: &Utf8Path) -> Vec<ExportInfo> {
        match self.try_extract(path) {
            Ok(exports) => exports,
            Err(err) => {
                debug!(path = %err.path(), error = %err, "No exports extracted");
                Vec::new()
            }
        }
    }

    /// Lists the exports of `path`, reporting why the top-level file failed.
    ///
    /// Failures in re-exported files are still logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] if `path` cannot be read or parsed.
    pub fn try_extract(&mut self, path: &Utf8Path) -> Result<Vec<ExportInfo>, ExtractError> {
        let key = path
            .canonicalize_utf8()
            .unwrap_or_else(|_| path.to_owned());

        if self.ancestors.contains(&key) {
            debug!(path = %path, "Skipping cyclic re-export");
            return Ok(Vec::new());
        }

        self.ancestors.push(key);
        let result = self.extract_file(path);
        self.ancestors.pop();
        result
    }

    fn extract_file(&mut self, path: &Utf8Path) -> Result<Vec<ExportInfo>, ExtractError> {
        let raw = std::fs::read_to_string(path).map_err(|err| ExtractError::read(path, err))?;
        let source = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

        let tree = self
            .parser
            .parse(source)
            .map_err(|err| ExtractError::parse(path, err))?;
        let query = export_query().map_err(|err| ExtractError::parse(path, err))?;
        let statements = collect_exports(&tree, source, query);

        let mut exports = Vec::with_capacity(statements.len());
        for statement in statements {
            match statement {
                ExportStatement::Symbol(info) => exports.push(info),
                ExportStatement::ReExportAll { specifier } => {
                    match resolve_specifier(path, &specifier) {
                        Some(target) => {
                            trace!(from = %path, to = %target, "Following re-export");
                            exports.extend(self.extract(&target));
                        }
                        None => {
                            debug!(from = %path, specifier = %specifier, "Re-export target not found");
                        }
                    }
                }
            }
        }

        Ok(exports)
    }
}

/// Resolves `specifier` relative to the directory of `from`.
///
/// Returns `None` when no candidate is a regular file.
pub fn resolve_specifier(from: &Utf8Path, specifier: &str) -> Option<Utf8PathBuf> {
    let base = from.parent().unwrap_or_else(|| Utf8Path::new(""));
    let target = base.join(specifier);

    let typed = from
        .extension()
        .is_some_and(|ext| TYPED_EXTENSIONS.contains(&ext));

    let mut candidates = vec![target.clone()];
    if typed {
        candidates.push(Utf8PathBuf::from(format!("{target}.ts")));
    }
    candidates.push(Utf8PathBuf::from(format!("{target}.js")));

    candidates.into_iter().find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        root: Utf8PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().expect("Failed to create temp directory");
            let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8");
            Self { _dir: dir, root }
        }

        fn write(&self, rel: &str, content: &str) -> Utf8PathBuf {
            let path = self.root.join(rel);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).expect("mkdir");
            }
            std::fs::write(&path, content).expect("write");
            path
        }
    }

    fn names(exports: &[ExportInfo]) -> Vec<&str> {
        exports.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_extract_simple_file() {
        let fx = Fixture::new();
        let path = fx.write("user.ts", "export interface User {}\nexport const createUser = () => {};");

        let mut extractor = ExportExtractor::new().expect("extractor");
        let exports = extractor.extract(&path);
        assert_eq!(names(&exports), vec!["User", "createUser"]);
        assert!(exports[0].is_type());
    }

    #[test]
    fn test_follows_wildcard_re_exports() {
        let fx = Fixture::new();
        fx.write("models/a.ts", "export const a = 1;");
        fx.write("models/b.js", "export const b = 2;");
        let path = fx.write(
            "models/index2.ts",
            "export * from './a';\nexport * from './b';\nexport const own = 3;",
        );

        let mut extractor = ExportExtractor::new().expect("extractor");
        assert_eq!(names(&extractor.extract(&path)), vec!["a", "b", "own"]);
    }

    #[test]
    fn test_resolution_is_relative_to_containing_file() {
        let fx = Fixture::new();
        fx.write("deep/nested/leaf.ts", "export const leaf = 1;");
        fx.write("deep/mid.ts", "export * from './nested/leaf';");
        let path = fx.write("top.ts", "export * from './deep/mid';");

        let mut extractor = ExportExtractor::new().expect("extractor");
        assert_eq!(names(&extractor.extract(&path)), vec!["leaf"]);
    }

    #[test]
    fn test_ts_suffix_only_for_typed_sources() {
        let fx = Fixture::new();
        fx.write("dep.ts", "export const dep = 1;");
        let js = fx.write("consumer.js", "export * from './dep';");

        assert!(resolve_specifier(&js, "./dep").is_none());
        let ts = fx.write("consumer.ts", "export * from './dep';");
        assert_eq!(resolve_specifier(&ts, "./dep"), Some(fx.root.join("./dep.ts")));
    }

    #[test]
    fn test_missing_re_export_contributes_nothing() {
        let fx = Fixture::new();
        let path = fx.write("a.ts", "export * from './missing';\nexport const a = 1;");

        let mut extractor = ExportExtractor::new().expect("extractor");
        assert_eq!(names(&extractor.extract(&path)), vec!["a"]);
    }

    #[test]
    fn test_cyclic_re_exports_terminate() {
        let fx = Fixture::new();
        fx.write("a.ts", "export * from './b';\nexport const a = 1;");
        let b = fx.write("b.ts", "export * from './a';\nexport const b = 2;");

        let mut extractor = ExportExtractor::new().expect("extractor");
        assert_eq!(names(&extractor.extract(&b)), vec!["a", "b"]);
    }

    #[test]
    fn test_self_re_export_terminates() {
        let fx = Fixture::new();
        let path = fx.write("self.ts", "export * from './self';\nexport const x = 1;");

        let mut extractor = ExportExtractor::new().expect("extractor");
        assert_eq!(names(&extractor.extract(&path)), vec!["x"]);
    }

    #[test]
    fn test_diamond_re_exports_duplicate() {
        let fx = Fixture::new();
        fx.write("shared.ts", "export const shared = 1;");
        fx.write("left.ts", "export * from './shared';");
        fx.write("right.ts", "export * from './shared';");
        let path = fx.write("top.ts", "export * from './left';\nexport * from './right';");

        let mut extractor = ExportExtractor::new().expect("extractor");
        assert_eq!(names(&extractor.extract(&path)), vec!["shared", "shared"]);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let fx = Fixture::new();
        let mut extractor = ExportExtractor::new().expect("extractor");
        assert!(extractor.extract(&fx.root.join("nope.ts")).is_empty());
        assert!(matches!(
            extractor.try_extract(&fx.root.join("nope.ts")),
            Err(ExtractError::Read { .. })
        ));
    }

    #[test]
    fn test_syntax_error_is_empty() {
        let fx = Fixture::new();
        let path = fx.write("broken.ts", "export const = ;");
        let mut extractor = ExportExtractor::new().expect("extractor");
        assert!(extractor.extract(&path).is_empty());
    }

    #[test]
    fn test_byte_order_mark_is_stripped() {
        let fx = Fixture::new();
        let path = fx.write("bom.ts", "\u{feff}export const marked = true;");
        let mut extractor = ExportExtractor::new().expect("extractor");
        assert_eq!(names(&extractor.extract(&path)), vec!["marked"]);
    }

    #[test]
    fn test_markup_in_ts_file() {
        let fx = Fixture::new();
        let path = fx.write("view.ts", "export const View = () => <span>hi</span>;");
        let mut extractor = ExportExtractor::new().expect("extractor");
        assert_eq!(names(&extractor.extract(&path)), vec!["View"]);
    }
}
