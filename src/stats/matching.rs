//! Matching tiers for finding a stat from a search term.
//!
//! Each tier is an independent pure function; [`find()`] chains them and stops at the first one that yields a
//! result. All comparisons happen on [`normalize()`]d names.

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use super::StatMap;

/// Minimum similarity a name must reach in the last tier
pub const DEFAULT_SIMILARITY: f64 = 0.5;

/// Stat found for a search term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct Found<'a> {
	/// Name of the stat as stored in the map
	pub name: &'a str,

	/// Value of the stat
	pub value: i32,

	/// Tier that produced the match
	pub tier: Tier,
}

/// Matching tier that produced a [`Found`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[expect(clippy::exhaustive_enums, reason = "The tiers are fixed")]
pub enum Tier {
	/// Same name once normalized
	Exact,

	/// Name contains the term
	Partial,

	/// Name is similar enough by edit distance
	Similar,
}

/// Lowercases a name, strips accents and trims it.
///
/// # Examples
/// ```
/// use dicenote::stats::matching::normalize;
///
/// assert_eq!(normalize("  Dextérité "), "dexterite");
/// assert_eq!(normalize("FORCE"), "force");
/// ```
#[must_use]
pub fn normalize(name: &str) -> String {
	name.trim()
		.nfd()
		.filter(|c| !is_combining_mark(*c))
		.collect::<String>()
		.to_lowercase()
}

/// Finds a stat by running the tiers in order: exact, then partial, then similarity.
#[must_use]
pub fn find<'a>(stats: &'a StatMap, term: &str, min_similarity: f64) -> Option<Found<'a>> {
	let term = normalize(term);
	if term.is_empty() {
		return None;
	}

	exact(stats, &term)
		.or_else(|| partial(stats, &term))
		.or_else(|| similar(stats, &term, min_similarity))
}

/// Finds a stat whose normalized name equals the (already normalized) term.
#[must_use]
pub fn exact<'a>(stats: &'a StatMap, term: &str) -> Option<Found<'a>> {
	stats
		.iter()
		.find(|(name, _)| normalize(name) == term)
		.map(|(name, value)| Found {
			name,
			value,
			tier: Tier::Exact,
		})
}

/// Finds the shortest stat name containing the (already normalized) term.
/// The first one encountered wins between names of the same length.
#[must_use]
pub fn partial<'a>(stats: &'a StatMap, term: &str) -> Option<Found<'a>> {
	let mut best: Option<(usize, Found<'a>)> = None;

	for (name, value) in stats.iter() {
		let normalized = normalize(name);
		if !normalized.contains(term) {
			continue;
		}

		let len = normalized.chars().count();
		if best.as_ref().map_or(true, |(best_len, _)| len < *best_len) {
			best = Some((
				len,
				Found {
					name,
					value,
					tier: Tier::Partial,
				},
			));
		}
	}

	best.map(|(_, found)| found)
}

/// Finds the stat name most similar to the (already normalized) term by normalized Levenshtein similarity,
/// provided it reaches `min_similarity`. The first one encountered wins between equal scores.
#[must_use]
pub fn similar<'a>(stats: &'a StatMap, term: &str, min_similarity: f64) -> Option<Found<'a>> {
	let mut best: Option<(f64, Found<'a>)> = None;

	for (name, value) in stats.iter() {
		let score = strsim::normalized_levenshtein(&normalize(name), term);
		if score < min_similarity {
			continue;
		}

		if best.as_ref().map_or(true, |(best_score, _)| score > *best_score) {
			best = Some((
				score,
				Found {
					name,
					value,
					tier: Tier::Similar,
				},
			));
		}
	}

	best.map(|(_, found)| found)
}
