//! Structural extraction of raw chat input into the pieces the rest of the pipeline works with.

use std::ops::Range;

use crate::{
	critical::CriticalBlock,
	patterns::{BRACKET, CRITICAL_BLOCK, DICE_TERM, LEADING_TOKEN, NUMERIC_START, WHITESPACE},
};

/// Overall shape of the input
#[derive(Debug, Clone, PartialEq, Eq)]
#[expect(clippy::exhaustive_enums, reason = "Downstream code matches the shapes exhaustively")]
pub enum Shape {
	/// An inline roll in square brackets takes priority over the rest of the line
	Bracket {
		/// Text between the brackets
		roll: String,
	},

	/// Fragments sharing results through `&`, separated by `;`
	Chained,

	/// A plain formula, possibly followed by free text
	Plain,

	/// Free text with no rollable content
	Prose,
}

/// Everything [`extract_dice_data()`] could learn about an input
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ExtractedStructure {
	/// Shape of the input
	pub shape: Shape,

	/// Rollable part of the input. For chained input this is the whole line, comments included.
	pub formula: String,

	/// Free text found around the rollable part
	pub comments: Option<String>,

	/// Inline critical blocks, in order of appearance
	pub critical_blocks: Vec<CriticalBlock>,

	/// Whether the formula holds something that looks like a dice term or a number
	pub has_dice_token: bool,
}

impl ExtractedStructure {
	/// Checks whether the input is something that can be rolled.
	#[must_use]
	pub const fn is_valid(&self) -> bool {
		!matches!(self.shape, Shape::Prose)
	}

	/// Gets the bracketed roll, if the input had one.
	#[must_use]
	pub fn bracket_roll(&self) -> Option<&str> {
		match &self.shape {
			Shape::Bracket { roll } => Some(roll),
			_ => None,
		}
	}

	/// Checks whether the input uses chained notation.
	#[must_use]
	pub const fn is_chained(&self) -> bool {
		matches!(self.shape, Shape::Chained)
	}
}

/// Splits raw input into its rollable payload, comment, critical blocks and shape.
///
/// # Examples
/// ```
/// use dicenote::extract::{extract_dice_data, Shape};
///
/// let plain = extract_dice_data("1d20+3 attack the orc");
/// assert_eq!(plain.shape, Shape::Plain);
/// assert_eq!(plain.formula, "1d20+3");
/// assert_eq!(plain.comments.as_deref(), Some("attack the orc"));
///
/// let bracket = extract_dice_data("I swing [1d20+5] at the goblin");
/// assert_eq!(bracket.bracket_roll(), Some("1d20+5"));
/// assert_eq!(bracket.comments.as_deref(), Some("I swing at the goblin"));
///
/// assert_eq!(extract_dice_data("1d20;&+2d6 #dmg").shape, Shape::Chained);
/// assert_eq!(extract_dice_data("hello there friend").shape, Shape::Prose);
/// ```
#[must_use]
pub fn extract_dice_data(input: &str) -> ExtractedStructure {
	let input = input.trim();
	let critical_blocks = CriticalBlock::find_all(input);

	if input.contains('&') && input.contains(';') {
		return ExtractedStructure {
			shape: Shape::Chained,
			formula: input.to_owned(),
			comments: None,
			critical_blocks,
			has_dice_token: has_dice_token(input),
		};
	}

	if let Some((roll, comments)) = find_bracket_roll(input) {
		return ExtractedStructure {
			shape: Shape::Bracket { roll: roll.clone() },
			formula: roll,
			comments,
			critical_blocks,
			has_dice_token: true,
		};
	}

	let (formula, comments) = match LEADING_TOKEN.captures(input) {
		Some(caps) => (
			caps.name("token").map_or(input, |token| token.as_str()).to_owned(),
			caps.name("comment").map(|comment| comment.as_str().to_owned()),
		),
		None => (input.to_owned(), None),
	};

	let has_dice_token = has_dice_token(&formula);
	let shape = if formula.is_empty() || (comments.is_some() && !has_dice_token) {
		Shape::Prose
	} else {
		Shape::Plain
	};

	ExtractedStructure {
		shape,
		formula,
		comments,
		critical_blocks,
		has_dice_token,
	}
}

/// Checks whether a token plausibly holds a dice value: a dice term anywhere, or a leading number or brace
/// expression. Critical blocks don't count.
#[must_use]
pub fn has_dice_token(token: &str) -> bool {
	let token = CRITICAL_BLOCK.replace_all(token, "");
	DICE_TERM.is_match(&token) || NUMERIC_START.is_match(&token)
}

/// Finds the first bracketed span holding a dice token, returning it along with the text surrounding it.
fn find_bracket_roll(input: &str) -> Option<(String, Option<String>)> {
	let found = BRACKET
		.captures_iter(input)
		.filter_map(|caps| Some((caps.get(0)?, caps.name("inner")?)))
		.find(|(_, inner)| has_dice_token(inner.as_str()))?;
	let (whole, inner) = found;

	let rest = format!("{} {}", &input[..whole.start()], &input[whole.end()..]);
	let rest = WHITESPACE.replace_all(rest.trim(), " ").into_owned();
	Some((inner.as_str().trim().to_owned(), (!rest.is_empty()).then_some(rest)))
}

/// Finds the byte ranges of the `;`-separated fragments of a formula.
///
/// Once a fragment has a `#` comment, a `;` only starts a new fragment when what follows is itself a roll: a single
/// token holding dice, a number or `&`. Anything else is more comment text.
///
/// # Examples
/// ```
/// use dicenote::extract::split_fragments;
///
/// assert_eq!(split_fragments("1d20 # aim;1d6[burn] # shared"), ["1d20 # aim", "1d6[burn] # shared"]);
/// assert_eq!(split_fragments("1d20 # attack; then retreat"), ["1d20 # attack; then retreat"]);
/// assert_eq!(split_fragments("1d20;&+1d6"), ["1d20", "&+1d6"]);
/// ```
#[must_use]
pub fn fragment_ranges(formula: &str) -> Vec<Range<usize>> {
	let mut ranges: Vec<Range<usize>> = Vec::new();
	let mut start = 0;

	for piece in formula.split(';') {
		let end = start + piece.len();
		match ranges.last_mut() {
			Some(last) if formula[last.clone()].contains('#') && !is_fragment(piece) => last.end = end,
			_ => ranges.push(start..end),
		}
		start = end + 1;
	}

	ranges
}

/// Splits a formula into its `;`-separated fragments, following the rules of [`fragment_ranges()`].
#[must_use]
pub fn split_fragments(formula: &str) -> Vec<&str> {
	fragment_ranges(formula)
		.into_iter()
		.map(|range| &formula[range])
		.collect()
}

/// Checks whether text after a `;` starts a roll of its own.
fn is_fragment(piece: &str) -> bool {
	let body = piece
		.split(|ch| ch == '#' || ch == '[')
		.next()
		.unwrap_or_default()
		.trim();
	let single_token = LEADING_TOKEN
		.captures(body)
		.is_some_and(|caps| caps.name("comment").is_none());
	single_token && (body.contains('&') || has_dice_token(body))
}
