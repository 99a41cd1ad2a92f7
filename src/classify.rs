//! Classification of rolled segments into successes, failures, criticals and custom criticals.

use std::fmt;

use crate::{
	comparator::Sign,
	critical::{CriticalBlock, CriticalCheck, CriticalRule, CriticalThresholds},
	eval::{Arithmetic, Error as EvalError, Evaluator},
	outcome::RolledSegment,
	stats::{matching::DEFAULT_SIMILARITY, Resolver, StatMap},
};

/// Result label of a classified segment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "Rendering matches the labels exhaustively")]
pub enum Label {
	/// The test passed
	Success,

	/// The test failed
	Failure,

	/// A critical success threshold was met
	CriticalSuccess,

	/// A critical failure threshold was met
	CriticalFailure,

	/// A named custom critical rule fired
	Custom(String),
}

impl Label {
	/// Gets the translation key of a built-in label. Custom labels have none.
	#[must_use]
	pub const fn key(&self) -> Option<&'static str> {
		use crate::locale::keys;

		match self {
			Self::Success => Some(keys::SUCCESS),
			Self::Failure => Some(keys::FAILURE),
			Self::CriticalSuccess => Some(keys::CRITICAL_SUCCESS),
			Self::CriticalFailure => Some(keys::CRITICAL_FAILURE),
			Self::Custom(..) => None,
		}
	}

	/// Label for a plain pass or fail.
	#[must_use]
	pub const fn from_passed(passed: bool) -> Self {
		if passed {
			Self::Success
		} else {
			Self::Failure
		}
	}
}

/// Sign glyph and threshold as shown to the reader
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct DisplayComparator {
	/// Sign glyph, already inverted for failures
	pub sign: &'static str,

	/// Threshold value
	pub value: String,
}

impl DisplayComparator {
	/// Creates the display of a test with a known result.
	#[must_use]
	pub fn new(sign: Sign, passed: bool, value: i32) -> Self {
		Self {
			sign: sign.display(passed),
			value: value.to_string(),
		}
	}
}

/// Result of testing the total against an opposing difficulty
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct OppositionResult {
	/// Success or failure against the opposition
	pub label: Label,

	/// Display of the opposing test
	pub display: DisplayComparator,

	/// Whether the total beat the opposition
	pub passed: bool,
}

/// Full classification of a segment
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Classification {
	/// Result label
	pub label: Label,

	/// Sign and value to display. For custom criticals, the rule's own.
	pub display: DisplayComparator,

	/// Whether the total passed the comparator
	pub passed: bool,

	/// Result against the opposition clause, if there was one
	pub opposition: Option<OppositionResult>,
}

/// What classification needs beyond the segment: the stats and evaluator for rule values, and whether the roll
/// is a skill roll.
#[derive(Clone, Copy)]
#[non_exhaustive]
pub struct Context<'a> {
	/// Stats referenced by rule and block values
	pub stats: &'a StatMap,

	/// Evaluator for rule and block values
	pub evaluator: &'a dyn Evaluator,

	/// Whether the roll comes from a skill, which skips rules that don't affect skills
	pub skill: bool,

	/// Minimum similarity for fuzzy stat matching
	pub similarity: f64,
}

impl<'a> Context<'a> {
	/// Creates a context for a non-skill roll, evaluating with [`Arithmetic`].
	#[must_use]
	pub const fn new(stats: &'a StatMap) -> Self {
		Self {
			stats,
			evaluator: &Arithmetic,
			skill: false,
			similarity: DEFAULT_SIMILARITY,
		}
	}

	/// Marks the roll as a skill roll.
	#[must_use]
	pub const fn skill(mut self, skill: bool) -> Self {
		self.skill = skill;
		self
	}

	/// Uses a specific evaluator.
	#[must_use]
	pub const fn evaluator(mut self, evaluator: &'a dyn Evaluator) -> Self {
		self.evaluator = evaluator;
		self
	}

	/// Sets the minimum similarity for fuzzy stat matching.
	#[must_use]
	pub const fn similarity(mut self, similarity: f64) -> Self {
		self.similarity = similarity;
		self
	}

	/// Resolves stats in a value and evaluates it.
	fn evaluate(&self, value: &str) -> Result<i32, EvalError> {
		let resolved = Resolver::new(self.stats).min_similarity(self.similarity).resolve(value);
		self.evaluator.evaluate(&resolved.formula)
	}
}

impl fmt::Debug for Context<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Context")
			.field("stats", self.stats)
			.field("skill", &self.skill)
			.field("similarity", &self.similarity)
			.finish_non_exhaustive()
	}
}

/// Applies inline critical blocks over the configured thresholds. Block values go through the stats and the
/// evaluator; a block whose value can't be evaluated is ignored.
///
/// # Examples
/// ```
/// use dicenote::{
/// 	classify::{apply_blocks, Context},
/// 	critical::{CriticalBlock, CriticalThresholds},
/// 	stats::StatMap,
/// };
///
/// let stats = StatMap::from_iter([("luck", 3)]);
/// let blocks = CriticalBlock::find_all("1d20{cf:<=$luck}");
/// let thresholds = apply_blocks(CriticalThresholds::natural(Some(20), Some(1)), &blocks, &Context::new(&stats));
/// assert!(thresholds.failure.is_some_and(|check| check.holds(&[3], 3)));
/// assert!(thresholds.success.is_some_and(|check| check.holds(&[20], 20)));
/// ```
#[must_use]
pub fn apply_blocks(
	thresholds: CriticalThresholds,
	blocks: &[CriticalBlock],
	context: &Context<'_>,
) -> CriticalThresholds {
	blocks.iter().fold(thresholds, |thresholds, block| match context.evaluate(&block.value) {
		Ok(value) => thresholds.with(block.kind, CriticalCheck::new(block.sign, value, block.on_natural_die)),
		Err(err) => {
			tracing::warn!(block = %block, %err, "ignoring critical block");
			thresholds
		}
	})
}

/// Classifies a rolled segment.
///
/// Returns `None` when the segment has no comparator or its threshold isn't a number. Otherwise the total is
/// tested against the comparator, then the critical failure and critical success thresholds are checked (in that
/// order), then the custom rules in order, the first one that holds replacing the label and the displayed
/// comparator. An opposition clause is tested against the total and reported alongside.
///
/// # Examples
/// ```
/// use dicenote::{
/// 	classify::{classify_outcome, Context, Label},
/// 	comparator::{Comparator, Sign},
/// 	critical::CriticalThresholds,
/// 	outcome::RolledSegment,
/// 	stats::StatMap,
/// };
///
/// let stats = StatMap::new();
/// let segment = RolledSegment::new("1d20", "1d20[12]", 12, vec![12]).with_comparator(Comparator::new(Sign::Gte, 10));
/// let classified = classify_outcome(&segment, &CriticalThresholds::default(), &[], &Context::new(&stats)).unwrap();
/// assert_eq!(classified.label, Label::Success);
/// assert_eq!(classified.display.sign, "≥");
/// ```
#[must_use]
pub fn classify_outcome(
	segment: &RolledSegment,
	thresholds: &CriticalThresholds,
	rules: &[CriticalRule],
	context: &Context<'_>,
) -> Option<Classification> {
	let comparator = segment.comparator.as_ref()?;
	let Some(value) = comparator.value else {
		tracing::debug!(threshold = %comparator.raw, "threshold isn't numeric, leaving segment unclassified");
		return None;
	};

	let total = segment.total;
	let passed = comparator.sign.check(total, value);
	let mut label = Label::from_passed(passed);
	let mut display = DisplayComparator::new(comparator.sign, passed, value);

	if thresholds
		.failure
		.is_some_and(|check| check.holds(&segment.natural, total))
	{
		label = Label::CriticalFailure;
	} else if thresholds
		.success
		.is_some_and(|check| check.holds(&segment.natural, total))
	{
		label = Label::CriticalSuccess;
	} else if let Some((rule, rule_value)) = first_rule(segment, rules, context) {
		label = Label::Custom(rule.name.clone());
		display = DisplayComparator::new(rule.sign, true, rule_value);
	}

	let opposition = comparator.opposition.as_deref().and_then(|opposition| {
		let value = opposition.value?;
		let passed = opposition.sign.check(total, value);
		Some(OppositionResult {
			label: Label::from_passed(passed),
			display: DisplayComparator::new(opposition.sign, passed, value),
			passed,
		})
	});

	Some(Classification {
		label,
		display,
		passed,
		opposition,
	})
}

/// Finds the first custom rule that holds for the segment, with its evaluated value.
fn first_rule<'r>(
	segment: &RolledSegment,
	rules: &'r [CriticalRule],
	context: &Context<'_>,
) -> Option<(&'r CriticalRule, i32)> {
	rules
		.iter()
		.filter(|rule| !context.skill || rule.affects_skill)
		.find_map(|rule| {
			let value = match context.evaluate(&rule.value) {
				Ok(value) => value,
				Err(err) => {
					tracing::warn!(rule = %rule.name, %err, "skipping critical rule");
					return None;
				}
			};

			CriticalCheck::new(rule.sign, value, rule.on_natural_die)
				.holds(&segment.natural, segment.total)
				.then_some((rule, value))
		})
}
