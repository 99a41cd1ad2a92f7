//! Character stats and the substitution of stat references in formulas.
//!
//! Formulas refer to stats as `$name` or `(name)`. Every reference is looked up with the tiers in [`matching`] and
//! replaced by the stat's value; references nothing matches stay in the formula as written.

pub mod matching;

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use regex::Captures;

use self::matching::{Found, DEFAULT_SIMILARITY};
use crate::patterns::{DICE_NAME, PAREN_REF, STAT_PLACEHOLDER, STAT_REF};

/// Stats of a character, in the order they were declared
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatMap(IndexMap<String, i32>);

impl StatMap {
	/// Creates an empty set of stats.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds or replaces a stat, keeping its original position when replacing.
	pub fn insert(&mut self, name: impl Into<String>, value: i32) -> Option<i32> {
		self.0.insert(name.into(), value)
	}

	/// Gets a stat by its exact stored name.
	#[must_use]
	pub fn get(&self, name: &str) -> Option<i32> {
		self.0.get(name).copied()
	}

	/// Iterates over the stats in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> + '_ {
		self.0.iter().map(|(name, value)| (name.as_str(), *value))
	}

	/// Number of stats
	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Checks whether there are no stats.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl<S: Into<String>> FromIterator<(S, i32)> for StatMap {
	fn from_iter<T: IntoIterator<Item = (S, i32)>>(iter: T) -> Self {
		Self(iter.into_iter().map(|(name, value)| (name.into(), value)).collect())
	}
}

/// Formula with its stat references substituted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct Resolved {
	/// Formula after substitution
	pub formula: String,

	/// Capitalized names of the stats that were used, without duplicates, in the order they were first used
	pub matched: IndexSet<String>,
}

impl fmt::Display for Resolved {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.formula)
	}
}

/// Substitutes stat references using a set of stats, explicit overrides for `(name)` references and a minimum
/// similarity for the fuzzy tier.
///
/// # Examples
/// ```
/// use dicenote::stats::{Resolver, StatMap};
///
/// let stats = StatMap::from_iter([("Strength", 3), ("Dexterity", 2)]);
/// let resolved = Resolver::new(&stats).with_override("bonus", "").resolve("1d20+$str+(bonus)>=(dex)");
/// assert_eq!(resolved.formula, "1d20+3>=2");
/// assert_eq!(resolved.matched.iter().collect::<Vec<_>>(), ["Strength", "Dexterity"]);
/// ```
#[derive(Debug, Clone)]
pub struct Resolver<'s> {
	/// Stats to look references up in
	stats: &'s StatMap,

	/// Replacement text for `(name)` references, keyed by normalized name
	overrides: IndexMap<String, String>,

	/// Minimum similarity for the fuzzy tier
	min_similarity: f64,
}

impl<'s> Resolver<'s> {
	/// Creates a resolver for a set of stats with the default similarity threshold.
	#[must_use]
	pub fn new(stats: &'s StatMap) -> Self {
		Self {
			stats,
			overrides: IndexMap::new(),
			min_similarity: DEFAULT_SIMILARITY,
		}
	}

	/// Sets the minimum similarity for the fuzzy tier.
	#[must_use]
	pub const fn min_similarity(mut self, min_similarity: f64) -> Self {
		self.min_similarity = min_similarity;
		self
	}

	/// Replaces `(name)` references with the given text instead of a stat value.
	/// An empty replacement deletes the reference along with an operator directly before it.
	#[must_use]
	pub fn with_override(mut self, name: &str, value: impl Into<String>) -> Self {
		self.overrides.insert(matching::normalize(name), value.into());
		self
	}

	/// Looks a single search term up.
	#[must_use]
	pub fn find(&self, term: &str) -> Option<Found<'s>> {
		matching::find(self.stats, term, self.min_similarity)
	}

	/// Substitutes every `$name` reference, then every remaining `(name)` reference.
	#[must_use]
	pub fn resolve(&self, formula: &str) -> Resolved {
		let mut matched = IndexSet::new();

		let formula = STAT_REF.replace_all(formula, |caps: &Captures| {
			let whole = &caps[0];
			let Some(name) = caps.name("name") else {
				return whole.to_owned();
			};
			self.substitute(name.as_str(), &mut matched)
				.unwrap_or_else(|| whole.to_owned())
		});

		// An empty override takes the operator before the reference with it
		let formula = PAREN_REF.replace_all(&formula, |caps: &Captures| {
			let whole = &caps[0];
			let op = caps.name("op").map_or("", |op| op.as_str());
			let Some(name) = caps.name("name").map(|name| name.as_str()) else {
				return whole.to_owned();
			};
			if DICE_NAME.is_match(name) {
				return whole.to_owned();
			}
			match self.overrides.get(&matching::normalize(name)) {
				Some(value) if value.is_empty() => String::new(),
				Some(value) => format!("{op}{value}"),
				None => self
					.substitute(name, &mut matched)
					.map_or_else(|| whole.to_owned(), |value| format!("{op}{value}")),
			}
		});

		Resolved {
			formula: formula.into_owned(),
			matched,
		}
	}

	/// Gets the replacement text for a reference and records the stat used.
	fn substitute(&self, term: &str, matched: &mut IndexSet<String>) -> Option<String> {
		let found = self.find(term)?;
		tracing::trace!(term, stat = found.name, tier = ?found.tier, value = found.value, "resolved stat reference");
		matched.insert(capitalize(found.name));
		Some(format_value(found.value))
	}
}

/// Substitutes stat references with the default settings.
///
/// # Examples
/// ```
/// use dicenote::stats::{resolve_stats_in_formula, StatMap};
///
/// let stats = StatMap::from_iter([("str", 1), ("strength", 2)]);
/// assert_eq!(resolve_stats_in_formula("1d20+$str", &stats).formula, "1d20+1");
/// assert_eq!(resolve_stats_in_formula("1d20+$luck", &stats).formula, "1d20+$luck");
/// ```
#[must_use]
pub fn resolve_stats_in_formula(formula: &str, stats: &StatMap) -> Resolved {
	Resolver::new(stats).resolve(formula)
}

/// Replaces the bare `$` placeholder (a `$` not followed by a name) with the current stat's value.
///
/// # Examples
/// ```
/// use dicenote::stats::fill_placeholder;
///
/// assert_eq!(fill_placeholder("1d100<=$", "45"), "1d100<=45");
/// assert_eq!(fill_placeholder("1d20+$str", "3"), "1d20+$str");
/// ```
#[must_use]
pub fn fill_placeholder(formula: &str, value: &str) -> String {
	STAT_PLACEHOLDER
		.replace_all(formula, |caps: &Captures| {
			format!("{value}{}", caps.name("after").map_or("", |after| after.as_str()))
		})
		.into_owned()
}

/// Formats a stat value for substitution, wrapping negative values in parentheses.
fn format_value(value: i32) -> String {
	if value < 0 {
		format!("({value})")
	} else {
		value.to_string()
	}
}

/// Uppercases the first letter of a name.
#[must_use]
pub fn capitalize(name: &str) -> String {
	let mut chars = name.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}
