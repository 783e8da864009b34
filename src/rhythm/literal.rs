//! Tolerant scanning of pattern-language source text.
//!
//! This is not a grammar. Each helper looks for one shape of call and
//! returns `None` when it is absent or mangled.

use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;

/// Quoted string argument in any of the three JS quote styles
macro_rules! call_with_literal {
    ($name:literal) => {
        concat!(
            r"\b",
            $name,
            r#"\(\s*(?:"([^"]*)"|'([^']*)'|`([^`]*)`)"#
        )
    };
}

lazy_static! {
    static ref SOUND_CALL: Regex =
        Regex::new(call_with_literal!("(?:s|sound)")).expect("sound call regex");
    static ref INDEX_CALL: Regex = Regex::new(call_with_literal!("n")).expect("index call regex");
    static ref NOTE_CALL: Regex = Regex::new(call_with_literal!("note")).expect("note call regex");
    static ref SLOW: Regex =
        Regex::new(r"\.slow\(\s*([0-9]*\.?[0-9]+)\s*\)").expect("slow regex");
    static ref FAST: Regex =
        Regex::new(r"\.fast\(\s*([0-9]*\.?[0-9]+)\s*\)").expect("fast regex");
    static ref SCOPE_COMMENT: Regex =
        Regex::new(r"//\s*@scope\b").expect("scope comment regex");
    static ref SCOPE_CALL: Regex = Regex::new(r"\._?scope\s*\(").expect("scope call regex");
    static ref LINE_COMMENT: Regex = Regex::new(r"//[^\n]*").expect("comment regex");
    static ref DIVISOR: Regex =
        Regex::new(r"(?s)^(.*?)/\s*([0-9]*\.?[0-9]+)\s*$").expect("divisor regex");
    static ref NUMBER: Regex = Regex::new(r"-?[0-9]+(?:\.[0-9]+)?").expect("number regex");
}

/// Remove `//` line comments so commented-out code does not drive visuals
pub fn strip_comments(text: &str) -> Cow<'_, str> {
    LINE_COMMENT.replace_all(text, "")
}

fn first_literal<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    let caps = re.captures(text)?;
    (1..=3).find_map(|i| caps.get(i)).map(|m| m.as_str())
}

/// First `s("...")` / `sound("...")` argument
pub fn sound_literal(code: &str) -> Option<&str> {
    first_literal(&SOUND_CALL, code)
}

/// First `n("...")` argument
pub fn index_literal(code: &str) -> Option<&str> {
    first_literal(&INDEX_CALL, code)
}

/// First `note("...")` argument
pub fn note_literal(code: &str) -> Option<&str> {
    first_literal(&NOTE_CALL, code)
}

pub fn has_voice_call(code: &str) -> bool {
    NOTE_CALL.is_match(code) || SOUND_CALL.is_match(code)
}

/// `// @scope` annotation; checked on the raw source since it is a comment
pub fn has_scope_comment(source: &str) -> bool {
    SCOPE_COMMENT.is_match(source)
}

/// `.scope(` / `._scope(` call; pass comment-stripped code
pub fn has_scope_call(code: &str) -> bool {
    SCOPE_CALL.is_match(code)
}

fn first_factor(re: &Regex, code: &str) -> Option<f64> {
    re.captures(code)?
        .get(1)?
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && *f > 0.0)
}

/// Combined playback-rate factor from `.slow(k)` and `.fast(k)`
///
/// `slow(2)` gives 0.5, `fast(2)` gives 2, both together multiply.
/// Missing, zero or unparsable factors count as 1.
pub fn tempo_factor(code: &str) -> f64 {
    let slow = first_factor(&SLOW, code).unwrap_or(1.0);
    let fast = first_factor(&FAST, code).unwrap_or(1.0);
    fast / slow
}

/// A literal with its `<...>` wrapper and `/k` suffix peeled off
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralShape<'a> {
    pub body: &'a str,
    pub alternation: bool,
    pub divisor: Option<f64>,
}

pub fn literal_shape(literal: &str) -> LiteralShape<'_> {
    let mut body = literal.trim();
    let mut divisor = None;

    if let Some(caps) = DIVISOR.captures(body) {
        let value = caps
            .get(2)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d > 0.0);
        if let (Some(value), Some(rest)) = (value, caps.get(1)) {
            divisor = Some(value);
            body = rest.as_str().trim();
        }
    }

    let alternation = body.len() >= 2 && body.starts_with('<') && body.ends_with('>');
    if alternation {
        body = body[1..body.len() - 1].trim();
    }

    LiteralShape {
        body,
        alternation,
        divisor,
    }
}

/// Every number embedded in `text`
pub fn numbers(text: &str) -> Vec<f64> {
    NUMBER
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .collect()
}

/// Whitespace-separated tokens, where a bracketed group counts as one
///
/// Unbalanced closers are tolerated; an unclosed group runs to the end.
pub fn group_tokens(body: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;

    for (i, ch) in body.char_indices() {
        match ch {
            '[' | '<' | '{' => {
                depth += 1;
                start.get_or_insert(i);
            }
            ']' | '>' | '}' => {
                depth = depth.saturating_sub(1);
                start.get_or_insert(i);
            }
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    tokens.push(&body[s..i]);
                }
            }
            _ => {
                start.get_or_insert(i);
            }
        }
    }
    if let Some(s) = start {
        tokens.push(&body[s..]);
    }
    tokens
}
