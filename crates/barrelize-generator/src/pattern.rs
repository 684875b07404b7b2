//! `/pattern/flags` literals used by replace rules and member selectors.
//!
//! A configuration string is either a regex literal or a plain string. The
//! decision is made once, by [`Matcher::parse`], and the compiled form is
//! carried through the pipeline.
//!
//! Patterns are compiled with the `regex` crate, so look-around and
//! back-references are not available; such patterns are reported as invalid.
//! Replacement strings follow the JavaScript `String.prototype.replace`
//! conventions.

use regex::{Captures, Regex, RegexBuilder};

/// Flag characters accepted after the closing `/`.
const VALID_FLAGS: &str = "dgimsuvy";

/// A compiled regex literal.
#[derive(Debug, Clone)]
pub struct JsRegex {
    regex: Regex,
    /// `g`: replace every match instead of the first.
    global: bool,
    /// Whether `$<name>` refers to a named group.
    named_groups: bool,
}

impl JsRegex {
    /// Returns `true` if the pattern matches anywhere in `text`.
    #[inline]
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Replaces the first match (every match with the `g` flag), expanding
    /// `$1`, `$&`, `` $` ``, `$'`, `$<name>` and `$$` in `replacement`.
    ///
    /// # Examples
    ///
    /// ```
    /// use barrelize_generator::pattern::parse_regex_literal;
    ///
    /// let re = parse_regex_literal("/(.+)Config$/").and_then(Result::ok).expect("valid literal");
    /// assert_eq!(re.replace("AuthConfig", "$1Settings"), "AuthSettings");
    /// ```
    #[must_use]
    pub fn replace(&self, text: &str, replacement: &str) -> String {
        let mut out = String::with_capacity(text.len() + replacement.len());
        let mut last = 0;

        for caps in self.regex.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            out.push_str(&text[last..whole.start()]);
            self.expand(&caps, text, replacement, &mut out);
            last = whole.end();

            if !self.global {
                break;
            }
        }

        out.push_str(&text[last..]);
        out
    }

    fn expand(&self, caps: &Captures<'_>, haystack: &str, replacement: &str, out: &mut String) {
        let (start, end) = caps.get(0).map_or((0, 0), |m| (m.start(), m.end()));
        let groups = caps.len().saturating_sub(1);
        let bytes = replacement.as_bytes();
        let group = |n: usize| caps.get(n).map_or("", |m| m.as_str());

        let mut i = 0;
        while let Some(offset) = replacement[i..].find('$') {
            let at = i + offset;
            out.push_str(&replacement[i..at]);

            match bytes.get(at + 1) {
                Some(b'$') => {
                    out.push('$');
                    i = at + 2;
                }
                Some(b'&') => {
                    out.push_str(&haystack[start..end]);
                    i = at + 2;
                }
                Some(b'`') => {
                    out.push_str(&haystack[..start]);
                    i = at + 2;
                }
                Some(b'\'') => {
                    out.push_str(&haystack[end..]);
                    i = at + 2;
                }
                Some(b'<') if self.named_groups => {
                    if let Some(close) = replacement[at + 2..].find('>') {
                        let name = &replacement[at + 2..at + 2 + close];
                        out.push_str(caps.name(name).map_or("", |m| m.as_str()));
                        i = at + 3 + close;
                    } else {
                        out.push('$');
                        i = at + 1;
                    }
                }
                Some(&digit) if digit.is_ascii_digit() => {
                    let one = usize::from(digit - b'0');
                    let two = bytes
                        .get(at + 2)
                        .filter(|b| b.is_ascii_digit())
                        .map(|b| one * 10 + usize::from(b - b'0'));

                    if let Some(n) = two.filter(|n| (1..=groups).contains(n)) {
                        out.push_str(group(n));
                        i = at + 3;
                    } else if (1..=groups).contains(&one) {
                        out.push_str(group(one));
                        i = at + 2;
                    } else {
                        out.push('$');
                        i = at + 1;
                    }
                }
                _ => {
                    out.push('$');
                    i = at + 1;
                }
            }
        }

        out.push_str(&replacement[i..]);
    }
}

/// Why a regex literal was rejected after it was recognised as one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// A flag appears more than once.
    #[error("duplicate flag '{0}'")]
    DuplicateFlag(char),

    /// The pattern does not compile.
    #[error("{0}")]
    Compile(String),
}

/// Parses `/pattern/flags`.
///
/// Returns `None` when `source` is not shaped like a regex literal: it does
/// not start with `/`, has no closing `/`, or its flags are not drawn from
/// `dgimsuvy`. Returns `Some(Err(_))` when it is shaped like one but does not
/// compile.
#[must_use]
pub fn parse_regex_literal(source: &str) -> Option<Result<JsRegex, PatternError>> {
    let body = source.strip_prefix('/')?;
    let close = body.rfind('/')?;
    let (pattern, flags) = (&body[..close], &body[close + 1..]);

    if !flags.chars().all(|c| VALID_FLAGS.contains(c)) {
        return None;
    }

    Some(compile(pattern, flags))
}

fn compile(pattern: &str, flags: &str) -> Result<JsRegex, PatternError> {
    let mut seen = String::with_capacity(flags.len());
    for flag in flags.chars() {
        if seen.contains(flag) {
            return Err(PatternError::DuplicateFlag(flag));
        }
        seen.push(flag);
    }

    let has = |flag: char| flags.contains(flag);
    let pattern = if has('y') {
        format!(r"\A(?:{pattern})")
    } else {
        pattern.to_owned()
    };

    let regex = RegexBuilder::new(&pattern)
        .case_insensitive(has('i'))
        .multi_line(has('m'))
        .dot_matches_new_line(has('s'))
        .build()
        .map_err(|err| PatternError::Compile(err.to_string()))?;
    let named_groups = regex.capture_names().flatten().next().is_some();

    Ok(JsRegex {
        regex,
        global: has('g'),
        named_groups,
    })
}

/// A find pattern from a replace rule, decided once.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Matches by exact equality.
    Literal(String),
    /// A compiled regex literal.
    Pattern(JsRegex),
    /// A regex literal that failed to compile. Never matches.
    Invalid {
        /// The configured text.
        source: String,
        /// Why compilation failed.
        reason: PatternError,
    },
}

impl Matcher {
    /// Classifies `source` as a literal, a pattern, or an invalid pattern.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        match parse_regex_literal(source) {
            None => Self::Literal(source.to_owned()),
            Some(Ok(regex)) => Self::Pattern(regex),
            Some(Err(reason)) => Self::Invalid {
                source: source.to_owned(),
                reason,
            },
        }
    }

    /// Applies the matcher to `text`, returning the replaced text on a match.
    ///
    /// Literal matchers substitute `replacement` verbatim.
    #[must_use]
    pub fn apply(&self, text: &str, replacement: &str) -> Option<String> {
        match self {
            Self::Literal(literal) => (literal == text).then(|| replacement.to_owned()),
            Self::Pattern(regex) => regex
                .is_match(text)
                .then(|| regex.replace(text, replacement)),
            Self::Invalid { .. } => None,
        }
    }

    /// Returns `true` for [`Matcher::Invalid`].
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }
}
