//! Process-wide compiled regular expressions, lazily compiled on first use.

use once_cell::sync::Lazy;
use regex::Regex;

/// Compiles one of the fixed patterns below.
#[expect(clippy::expect_used, reason = "Fixed patterns are literals exercised by the test suite")]
fn fixed(pattern: &str) -> Regex {
	Regex::new(pattern).expect("fixed pattern should compile")
}

/// Comparator anywhere in a formula body: a sign followed by everything up to the next fragment separator
pub static COMPARATOR: Lazy<Regex> = Lazy::new(|| fixed(r"(?P<sign>[<>]=?|!=|==|=)(?P<value>[^;]+)"));

/// Whole comparator clause, with an optional opposition clause directly after the first
pub static CLAUSE: Lazy<Regex> = Lazy::new(|| {
	fixed(r"^(?P<sign>[<>]=?|!=|==|=)(?P<value>[^<>=!]+)(?:(?P<osign>[<>]=?|!=|==|=)(?P<ovalue>[^<>=!]+))?$")
});

/// Text that starts with a comparison sign
pub static SIGN_PREFIX: Lazy<Regex> = Lazy::new(|| fixed(r"^\s*(?:[<>]=?|!=|==|=)"));

/// Inline critical block, e.g. `{cs:>=19}` or `{*cf:<=$luck}`
pub static CRITICAL_BLOCK: Lazy<Regex> = Lazy::new(|| {
	fixed(r"(?i)\{(?P<total>\*)?c(?P<kind>[fs]):(?P<sign>[<>]=?|!=|==|=)(?P<value>[^}]+)\}")
});

/// Square-bracketed span (inline roll, or per-fragment comment in chained rolls)
pub static BRACKET: Lazy<Regex> = Lazy::new(|| fixed(r"\[(?P<inner>[^\[\]]*)\]"));

/// Leading token of a line and the free text after it.
/// Whitespace around arithmetic operators and signs stays part of the token (`1d20 + 3 attack`), and so do critical
/// blocks set apart by whitespace (`1d20 {cf:<=2}>=10`).
pub static LEADING_TOKEN: Lazy<Regex> = Lazy::new(|| {
	fixed(concat!(
		r"(?s)^\s*(?P<token>(?:\{\*?[cC][fFsS]:[^}]*\}\s*)*\S+",
		r"(?:\s*[+\-*/\\<>=!]+\s*\S+|\s+\{\*?[cC][fFsS]:[^}]*\}\S*)*)",
		r"(?:\s+(?P<comment>.*\S))?\s*$",
	))
});

/// Dice term not glued to a preceding letter, e.g. `2d6`, `d8`, `1d%`
pub static DICE_TERM: Lazy<Regex> = Lazy::new(|| fixed(r"(?i)(?:^|[^\p{L}])\d*d(?:\d+|%)"));

/// Token that starts like a number or a brace expression
pub static NUMERIC_START: Lazy<Regex> = Lazy::new(|| fixed(r"^[(+\-]*(?:\d|\{)"));

/// Name that is itself a dice term, so `(d6)` is never treated as a stat reference
pub static DICE_NAME: Lazy<Regex> = Lazy::new(|| fixed(r"(?i)^\d*d(?:\d+|%)$"));

/// `$name` stat reference
pub static STAT_REF: Lazy<Regex> = Lazy::new(|| fixed(r"\$(?P<name>[\p{L}_][\p{L}\p{N}_]*)"));

/// `(name)` stat reference, along with a `+` or `-` directly before it
pub static PAREN_REF: Lazy<Regex> =
	Lazy::new(|| fixed(r"(?P<op>\s*[+\-]\s*)?\(\s*(?P<name>[\p{L}_][\p{L}\p{N}_ ]*?)\s*\)"));

/// Bare `$` placeholder for the current stat, captured with the character after it
pub static STAT_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| fixed(r"\$(?P<after>[^\p{L}\p{N}_]|$)"));

/// Stat usage marker, e.g. `%%[__Strength__]%%`
pub static STAT_MARKER: Lazy<Regex> = Lazy::new(|| fixed(r"%%\[__(?P<name>.+?)__\]%%"));

/// Runs of whitespace
pub static WHITESPACE: Lazy<Regex> = Lazy::new(|| fixed(r"\s+"));
