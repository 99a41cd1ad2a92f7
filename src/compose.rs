//! Composition of the final roll string from a resolved formula, threshold overrides and comments.

use regex::Regex;

use crate::{
	comparator::Clause,
	eval::{Arithmetic, Evaluator},
	patterns::{COMPARATOR, CRITICAL_BLOCK, DICE_TERM, SIGN_PREFIX},
	stats::{fill_placeholder, Resolver, StatMap},
};

/// Pieces of a composed roll
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct Composed {
	/// Dice body with the comparator taken out, stats resolved and trimmed
	pub dice_without_comparator: String,

	/// Comparator as it appeared in the formula (after threshold overrides), empty when there was none
	pub raw_comparator: String,

	/// Comparator with its stats resolved and, where possible, its threshold evaluated. Empty when there was none.
	pub comparator_evaluated: String,

	/// Final roll string for the roller
	pub roll: String,
}

/// Removes every inline critical block from a formula.
///
/// # Examples
/// ```
/// use dicenote::compose::strip_critical_blocks;
///
/// assert_eq!(strip_critical_blocks("2d6{cf:<=2}{cs:>=12}>=10"), "2d6>=10");
/// ```
#[must_use]
pub fn strip_critical_blocks(formula: &str) -> String {
	CRITICAL_BLOCK.replace_all(formula, "").into_owned()
}

/// Applies a threshold override to a formula.
///
/// An override starting with a sign replaces the whole comparator, or is appended when the formula has none.
/// A bare value only replaces the threshold of an existing comparator and does nothing otherwise.
///
/// # Examples
/// ```
/// use dicenote::compose::get_threshold;
///
/// assert_eq!(get_threshold("2d6>=10", Some(">=15")), "2d6>=15");
/// assert_eq!(get_threshold("2d6>=10", Some("12")), "2d6>=12");
/// assert_eq!(get_threshold("2d6", Some("<5")), "2d6<5");
/// assert_eq!(get_threshold("2d6", Some("12")), "2d6");
/// ```
#[must_use]
pub fn get_threshold(dice: &str, threshold: Option<&str>) -> String {
	let Some(threshold) = threshold.map(str::trim).filter(|threshold| !threshold.is_empty()) else {
		return dice.to_owned();
	};
	let existing = COMPARATOR.captures(dice);

	if SIGN_PREFIX.is_match(threshold) {
		return match existing.and_then(|caps| caps.get(0)) {
			Some(whole) => format!("{}{threshold}{}", &dice[..whole.start()], &dice[whole.end()..]),
			None => format!("{dice}{threshold}"),
		};
	}

	match existing.and_then(|caps| caps.name("value")) {
		Some(value) => format!("{}{threshold}{}", &dice[..value.start()], &dice[value.end()..]),
		None => dice.to_owned(),
	}
}

/// Splits a formula into its body and its comparator using a pattern with `sign` and `value` groups.
/// The comparator is empty when the pattern doesn't match.
///
/// # Examples
/// ```
/// use dicenote::{compose::extract_comparator, patterns::COMPARATOR};
///
/// assert_eq!(extract_comparator("2d6>=10", &COMPARATOR), ("2d6".to_owned(), ">=10".to_owned()));
/// assert_eq!(extract_comparator("2d6", &COMPARATOR), ("2d6".to_owned(), String::new()));
/// ```
#[must_use]
pub fn extract_comparator(dice: &str, pattern: &Regex) -> (String, String) {
	let Some(caps) = pattern.captures(dice) else {
		return (dice.to_owned(), String::new());
	};
	let (Some(whole), Some(sign), Some(value)) = (caps.get(0), caps.name("sign"), caps.name("value")) else {
		return (dice.to_owned(), String::new());
	};

	let body = format!("{}{}", &dice[..whole.start()], &dice[whole.end()..]);
	(body, format!("{}{}", sign.as_str(), value.as_str().trim()))
}

/// Composes the roll string handed to the roller.
///
/// Critical blocks are stripped, the threshold override applied and the comparator split from the body. The body
/// and the comparator then get their stats resolved separately (the bare `$` placeholder taking `stat_total`), a
/// deterministic comparator threshold is evaluated to a number, and everything is joined as
/// `body + suffix + comparator + " " + comments`.
///
/// # Examples
/// ```
/// use dicenote::{compose::compose_roll_base, stats::StatMap};
///
/// let stats = StatMap::new();
/// let composed = compose_roll_base("2d6{cf:<=2}>=10", Some(">=12"), &stats, None, "+5", "# attack");
/// assert_eq!(composed.roll, "2d6+5>=12 # attack");
/// assert_eq!(composed.raw_comparator, ">=12");
/// ```
#[must_use]
pub fn compose_roll_base(
	formula: &str,
	threshold_override: Option<&str>,
	stats: &StatMap,
	stat_total: Option<&str>,
	suffix: &str,
	comments: &str,
) -> Composed {
	compose_with(
		formula,
		threshold_override,
		&Resolver::new(stats),
		stat_total,
		suffix,
		comments,
		&Arithmetic,
	)
}

/// Same as [`compose_roll_base()`], with a specific resolver and evaluator.
#[must_use]
pub fn compose_with(
	formula: &str,
	threshold_override: Option<&str>,
	resolver: &Resolver<'_>,
	stat_total: Option<&str>,
	suffix: &str,
	comments: &str,
	evaluator: &impl Evaluator,
) -> Composed {
	let formula = strip_critical_blocks(formula);
	let formula = get_threshold(&formula, threshold_override);
	let (body, raw_comparator) = extract_comparator(&formula, &COMPARATOR);

	let fill = |text: &str| match stat_total {
		Some(total) => fill_placeholder(text, total),
		None => text.to_owned(),
	};

	let dice_without_comparator = resolver.resolve(&fill(&body)).formula.trim().to_owned();
	let comparator_evaluated = if raw_comparator.is_empty() {
		String::new()
	} else {
		evaluate_comparator(&resolver.resolve(&fill(&raw_comparator)).formula, evaluator)
	};

	let roll = format!("{dice_without_comparator}{suffix}{comparator_evaluated} {comments}");
	let roll = roll.trim_end().to_owned();
	tracing::debug!(%roll, %raw_comparator, "composed roll");

	Composed {
		dice_without_comparator,
		raw_comparator,
		comparator_evaluated,
		roll,
	}
}

/// Evaluates the thresholds of a comparator when they hold no dice. Anything that can't be evaluated is kept as
/// written so the roller can have a go at it.
fn evaluate_comparator(comparator: &str, evaluator: &impl Evaluator) -> String {
	let Some(clause) = Clause::parse(comparator) else {
		return comparator.trim().to_owned();
	};

	let threshold = |value: &str| {
		if DICE_TERM.is_match(value) {
			return value.to_owned();
		}
		match evaluator.evaluate(value) {
			Ok(number) => number.to_string(),
			Err(err) => {
				tracing::debug!(value, %err, "comparator threshold left unevaluated");
				value.to_owned()
			}
		}
	};

	let mut evaluated = format!("{}{}", clause.sign, threshold(&clause.value));
	if let Some((sign, value)) = &clause.opposition {
		evaluated.push_str(&format!("{sign}{}", threshold(value)));
	}
	evaluated
}
