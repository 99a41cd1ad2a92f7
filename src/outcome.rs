//! Rolling composed formulas into outcomes: the dice roller seam and the engine that implements it with the
//! crate's own dice expressions.

use std::ops::Range;

use crate::{
	comparator::{Clause, Comparator, Sign},
	compose::extract_comparator,
	extract::split_fragments,
	dice::roller::Roller,
	expr::{CalcError, Describe, EvalError, Expr},
	parse,
	patterns::{BRACKET, COMPARATOR},
};

/// Result of rolling a formula, possibly made of several `;`-separated segments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct RollOutcome {
	/// Formula that was rolled, as handed to the roller
	pub expression: String,

	/// Rolled segments, in order
	pub segments: Vec<RolledSegment>,

	/// Comment shared by every segment
	pub comment: Option<String>,
}

impl RollOutcome {
	/// Creates an outcome from its parts.
	#[must_use]
	pub fn new(expression: impl Into<String>, segments: Vec<RolledSegment>, comment: Option<String>) -> Self {
		Self {
			expression: expression.into(),
			segments,
			comment,
		}
	}

	/// Gets each segment as `entry: calc = total`.
	///
	/// # Examples
	/// ```
	/// use dicenote::{dice::roller::Iter as IterRoller, outcome::{DiceRoller, Engine}};
	///
	/// let outcome = Engine::new(IterRoller::new([4, 3])).roll("2d6+1")?;
	/// assert_eq!(outcome.result_segments(), ["2d6+1: 2d6[4, 3] + 1 = 8"]);
	/// assert_eq!(outcome.total(), Some(8));
	/// # Ok::<(), dicenote::outcome::Error>(())
	/// ```
	#[must_use]
	pub fn result_segments(&self) -> Vec<String> {
		self.segments
			.iter()
			.map(|segment| format!("{}: {} = {}", segment.entry, segment.calc, segment.total))
			.collect()
	}

	/// Total of the roll when it has a single segment.
	#[must_use]
	pub fn total(&self) -> Option<i32> {
		match self.segments.as_slice() {
			[segment] => Some(segment.total),
			_ => None,
		}
	}

	/// Whether the outcome holds more than one segment
	#[must_use]
	pub fn is_chained(&self) -> bool {
		self.segments.len() > 1
	}
}

/// One rolled segment of an outcome
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct RolledSegment {
	/// Expression as rolled, without its comparator or comment
	pub entry: String,

	/// Description of the rolls that made up the total
	pub calc: String,

	/// Total of the segment
	pub total: i32,

	/// Faces the original dice landed on, before modifiers
	pub natural: Vec<u8>,

	/// Comparator the total is tested against
	pub comparator: Option<Comparator>,

	/// Comment attached to this segment only
	pub comment: Option<String>,
}

impl RolledSegment {
	/// Creates a segment without a comparator or comment.
	#[must_use]
	pub fn new(entry: impl Into<String>, calc: impl Into<String>, total: i32, natural: Vec<u8>) -> Self {
		Self {
			entry: entry.into(),
			calc: calc.into(),
			total,
			natural,
			comparator: None,
			comment: None,
		}
	}

	/// Attaches a comparator.
	#[must_use]
	pub fn with_comparator(mut self, comparator: Comparator) -> Self {
		self.comparator = Some(comparator);
		self
	}

	/// Attaches a comment.
	#[must_use]
	pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
		self.comment = Some(comment.into());
		self
	}
}

/// Rolls composed formulas
pub trait DiceRoller {
	/// Rolls a formula such as `2d6+5>=12 # attack` or `1d20[hit];&+2d6`.
	///
	/// # Errors
	/// If the formula can't be rolled, an error variant is returned.
	fn roll(&mut self, formula: &str) -> Result<RollOutcome, Error>;
}

/// [`DiceRoller`] built on the crate's dice expressions.
///
/// Formulas are split into `;` fragments. Each fragment may carry a `[comment]` and a comparator, and later
/// fragments can use `&` for the total of the first one. Thresholds holding dice are rolled too.
///
/// # Examples
/// ```
/// use dicenote::{dice::roller::Iter as IterRoller, outcome::{DiceRoller, Engine}};
///
/// let mut engine = Engine::new(IterRoller::new([15, 4, 2]));
/// let outcome = engine.roll("1d20+2>=10[hit];&+2d6 # sword")?;
/// assert_eq!(outcome.segments.len(), 2);
/// assert_eq!(outcome.segments[0].total, 17);
/// assert_eq!(outcome.segments[0].comment.as_deref(), Some("hit"));
/// assert_eq!(outcome.segments[1].entry, "17+2d6");
/// assert_eq!(outcome.segments[1].total, 23);
/// assert_eq!(outcome.comment.as_deref(), Some("sword"));
/// # Ok::<(), dicenote::outcome::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Engine<R: Roller> {
	/// Source of die faces
	rng: R,

	/// Maximum number of individual dice listed in descriptions
	list_limit: Option<usize>,
}

impl<R: Roller> Engine<R> {
	/// Creates an engine that rolls with the given roller.
	#[must_use]
	pub const fn new(rng: R) -> Self {
		Self { rng, list_limit: None }
	}

	/// Limits how many individual dice are listed per set in descriptions.
	#[must_use]
	pub const fn list_limit(mut self, list_limit: Option<usize>) -> Self {
		self.list_limit = list_limit;
		self
	}

	/// Rolls one fragment. `first_total` is the value `&` stands for.
	fn roll_fragment(&mut self, fragment: &str, first_total: Option<i32>) -> Result<RolledSegment, Error> {
		let (fragment, comment) = split_fragment_comment(fragment);

		let fragment = match first_total {
			Some(total) => fragment.replace('&', &wrap_negative(total)),
			None if fragment.contains('&') => {
				return Err(Error::malformed(fragment, "`&` can only refer to an earlier roll", None));
			}
			None => fragment,
		};

		let (body, raw_comparator) = extract_comparator(&fragment, &COMPARATOR);
		let entry = body.trim().to_owned();
		if entry.is_empty() {
			return Err(Error::malformed(fragment.as_str(), "nothing to roll", None));
		}

		let expr: Expr = entry
			.parse()
			.map_err(|err: parse::Error| Error::malformed(entry.as_str(), &err.details, Some(err.spans)))?;
		let evaled = expr.eval(&mut self.rng)?;
		let total = evaled.calc()?;

		let mut segment = RolledSegment::new(entry.clone(), evaled.describe(self.list_limit), total, evaled.natural());
		segment.comment = comment;

		if !raw_comparator.is_empty() {
			let clause = Clause::parse(&raw_comparator)
				.ok_or_else(|| Error::malformed(raw_comparator.as_str(), "incomplete comparison", None))?;
			let mut comparator = self.threshold(clause.sign, &clause.value)?;
			if let Some((sign, value)) = &clause.opposition {
				comparator = comparator.with_opposition(self.threshold(*sign, value)?);
			}
			segment.comparator = Some(comparator);
		}

		tracing::debug!(entry = %segment.entry, total, "rolled fragment");
		Ok(segment)
	}

	/// Turns threshold text into a comparator, rolling it when it holds dice. Text that isn't an expression is
	/// kept unresolved.
	fn threshold(&mut self, sign: Sign, value: &str) -> Result<Comparator, Error> {
		let Ok(expr) = value.parse::<Expr>() else {
			return Ok(Comparator::unresolved(sign, value));
		};

		let evaled = expr.eval(&mut self.rng)?;
		let total = evaled.calc()?;
		if expr.is_deterministic() {
			Ok(Comparator::new(sign, total))
		} else {
			Ok(Comparator::new(sign, total).rolled_from(value, evaled.describe(self.list_limit)))
		}
	}
}

#[cfg(feature = "fastrand")]
impl Default for Engine<crate::dice::roller::FastRand> {
	fn default() -> Self {
		Self::new(crate::dice::roller::FastRand::default())
	}
}

impl<R: Roller> DiceRoller for Engine<R> {
	fn roll(&mut self, formula: &str) -> Result<RollOutcome, Error> {
		let expression = formula.trim();

		// The `#` comment of the last fragment belongs to the whole roll
		let mut fragments = split_fragments(expression);
		let mut comment = None;
		if let Some(last) = fragments.last_mut() {
			let current: &str = *last;
			if let Some((body, text)) = current.split_once('#') {
				let text = text.trim();
				comment = (!text.is_empty()).then(|| text.to_owned());
				*last = body;
			}
		}

		let mut segments: Vec<RolledSegment> = Vec::new();
		for fragment in fragments.into_iter().filter(|fragment| !fragment.trim().is_empty()) {
			let first_total = segments.first().map(|segment| segment.total);
			segments.push(self.roll_fragment(fragment, first_total)?);
		}

		if segments.is_empty() {
			return Err(Error::malformed(expression, "nothing to roll", None));
		}

		Ok(RollOutcome {
			expression: expression.to_owned(),
			segments,
			comment,
		})
	}
}

/// Takes a `[comment]` or `# comment` out of a fragment.
fn split_fragment_comment(fragment: &str) -> (String, Option<String>) {
	if let Some(caps) = BRACKET.captures(fragment) {
		if let (Some(whole), Some(inner)) = (caps.get(0), caps.name("inner")) {
			let rest = format!("{}{}", &fragment[..whole.start()], &fragment[whole.end()..]);
			let comment = inner.as_str().trim();
			return (rest.trim().to_owned(), (!comment.is_empty()).then(|| comment.to_owned()));
		}
	}

	match fragment.split_once('#') {
		Some((rest, comment)) => {
			let comment = comment.trim();
			(rest.trim().to_owned(), (!comment.is_empty()).then(|| comment.to_owned()))
		}
		None => (fragment.trim().to_owned(), None),
	}
}

/// Formats a total for substitution into another fragment.
fn wrap_negative(total: i32) -> String {
	if total < 0 {
		format!("({total})")
	} else {
		total.to_string()
	}
}

/// An error resulting from rolling a formula
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// The formula isn't valid dice notation.
	#[error("invalid dice \"{formula}\": {details}")]
	MalformedFormula {
		/// Text that couldn't be rolled
		formula: String,

		/// What was wrong with it
		details: String,

		/// Byte ranges of `formula` the problems were found at, with their messages
		spans: Vec<(Range<usize>, String)>,
	},

	/// Rolling the dice failed.
	#[error(transparent)]
	Eval(#[from] EvalError),

	/// Totalling the rolls failed.
	#[error(transparent)]
	Calc(#[from] CalcError),
}

impl Error {
	/// Builds a [`Self::MalformedFormula`].
	fn malformed(formula: impl Into<String>, details: &str, spans: Option<Vec<(Range<usize>, String)>>) -> Self {
		Self::MalformedFormula {
			formula: formula.into(),
			details: details.to_owned(),
			spans: spans.unwrap_or_default(),
		}
	}
}
