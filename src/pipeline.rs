//! One call from raw chat input to rendered text.
//!
//! [`process()`] runs every stage in order: structural extraction, comment merging, stat resolution, composition,
//! rolling, classification and rendering. [`Settings`] hold what stays the same between rolls (locale, critical
//! thresholds and rules); a [`Request`] holds what belongs to a single roll.

use crate::{
	classify::{apply_blocks, classify_outcome, Classification, Context},
	comment::extract_and_merge_comments,
	compose::{compose_with, Composed},
	critical::{CriticalRule, CriticalThresholds},
	eval::Arithmetic,
	extract::{extract_dice_data, split_fragments, Shape},
	locale::{Catalog, Locale},
	outcome::{self, DiceRoller, RollOutcome},
	render::render_result,
	stats::{matching::DEFAULT_SIMILARITY, Resolver, StatMap},
};

/// Configuration shared by every roll
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Settings {
	/// Language of the rendered text
	pub locale: Locale,

	/// Simple critical thresholds, overridable per roll with inline blocks
	pub thresholds: CriticalThresholds,

	/// Custom critical rules, in priority order
	pub critical_rules: Vec<CriticalRule>,

	/// Minimum similarity for fuzzy stat matching
	pub similarity: f64,

	/// Maximum number of individual dice listed per set
	pub list_limit: Option<usize>,
}

impl Settings {
	/// Creates a settings builder.
	#[must_use]
	#[inline]
	pub fn builder() -> Builder {
		Builder::default()
	}
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			locale: Locale::default(),
			thresholds: CriticalThresholds::default(),
			critical_rules: Vec::new(),
			similarity: DEFAULT_SIMILARITY,
			list_limit: None,
		}
	}
}

/// Builds [`Settings`] with a fluent interface.
///
/// # Examples
/// ```
/// use dicenote::{
/// 	comparator::Sign,
/// 	critical::{CriticalRule, CriticalThresholds},
/// 	locale::Locale,
/// 	pipeline::Settings,
/// };
///
/// let settings = Settings::builder()
/// 	.locale(Locale::Fr)
/// 	.thresholds(CriticalThresholds::natural(Some(20), Some(1)))
/// 	.critical_rule(CriticalRule::new("Brutal", Sign::Gte, "25"))
/// 	.build();
/// assert_eq!(settings.locale, Locale::Fr);
/// assert_eq!(settings.critical_rules.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder(Settings);

impl Builder {
	/// Sets the language of the rendered text.
	#[must_use]
	pub const fn locale(mut self, locale: Locale) -> Self {
		self.0.locale = locale;
		self
	}

	/// Sets the simple critical thresholds.
	#[must_use]
	pub const fn thresholds(mut self, thresholds: CriticalThresholds) -> Self {
		self.0.thresholds = thresholds;
		self
	}

	/// Adds a custom critical rule after the existing ones.
	#[must_use]
	pub fn critical_rule(mut self, rule: CriticalRule) -> Self {
		self.0.critical_rules.push(rule);
		self
	}

	/// Replaces every custom critical rule.
	#[must_use]
	pub fn critical_rules(mut self, rules: impl IntoIterator<Item = CriticalRule>) -> Self {
		self.0.critical_rules = rules.into_iter().collect();
		self
	}

	/// Sets the minimum similarity for fuzzy stat matching.
	#[must_use]
	pub const fn similarity(mut self, similarity: f64) -> Self {
		self.0.similarity = similarity;
		self
	}

	/// Sets the maximum number of individual dice listed per set.
	#[must_use]
	pub const fn list_limit(mut self, list_limit: Option<usize>) -> Self {
		self.0.list_limit = list_limit;
		self
	}

	/// Finalizes the settings.
	#[must_use]
	pub fn build(self) -> Settings {
		self.0
	}
}

/// A single roll to process
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct Request<'a> {
	/// Raw chat input
	pub input: &'a str,

	/// Stats of the character rolling, if any
	pub stats: Option<&'a StatMap>,

	/// Threshold override, either a full comparator (`>=15`) or a bare value (`15`)
	pub threshold: Option<String>,

	/// Value of the bare `$` placeholder
	pub stat_total: Option<String>,

	/// Expression appended to the dice body, before the comparator
	pub suffix: String,

	/// Comment supplied alongside the input
	pub comment: Option<String>,

	/// Whether the roll comes from a skill
	pub skill: bool,
}

impl<'a> Request<'a> {
	/// Creates a request for raw input.
	#[must_use]
	pub fn new(input: &'a str) -> Self {
		Self {
			input,
			..Self::default()
		}
	}

	/// Sets the character's stats.
	#[must_use]
	pub const fn stats(mut self, stats: &'a StatMap) -> Self {
		self.stats = Some(stats);
		self
	}

	/// Sets the threshold override.
	#[must_use]
	pub fn threshold(mut self, threshold: impl Into<String>) -> Self {
		self.threshold = Some(threshold.into());
		self
	}

	/// Sets the value of the `$` placeholder.
	#[must_use]
	pub fn stat_total(mut self, total: impl Into<String>) -> Self {
		self.stat_total = Some(total.into());
		self
	}

	/// Sets the expression appended to the dice body.
	#[must_use]
	pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
		self.suffix = suffix.into();
		self
	}

	/// Sets the comment supplied alongside the input.
	#[must_use]
	pub fn comment(mut self, comment: impl Into<String>) -> Self {
		self.comment = Some(comment.into());
		self
	}

	/// Marks the roll as a skill roll.
	#[must_use]
	pub const fn skill(mut self, skill: bool) -> Self {
		self.skill = skill;
		self
	}
}

/// Everything produced while processing a request
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Rendered {
	/// Roll string handed to the roller
	pub roll: String,

	/// What the roller produced
	pub outcome: RollOutcome,

	/// Classification of each segment, `None` for unclassified ones
	pub classifications: Vec<Option<Classification>>,

	/// Final text
	pub text: String,
}

/// Runs a request through every stage and renders the result.
///
/// # Errors
/// If the input holds nothing to roll, or the roller refuses the composed formula, an error variant is returned.
///
/// # Examples
/// ```
/// use dicenote::{
/// 	critical::CriticalThresholds,
/// 	dice::roller::Iter as IterRoller,
/// 	outcome::Engine,
/// 	pipeline::{process, Request, Settings},
/// 	stats::StatMap,
/// };
///
/// let stats = StatMap::from_iter([("Strength", 3)]);
/// let settings = Settings::builder().thresholds(CriticalThresholds::natural(Some(20), Some(1))).build();
/// let request = Request::new("1d20+$str>=15 swing at the orc").stats(&stats);
///
/// let rendered = process(&request, &settings, &mut Engine::new(IterRoller::new([20])))?;
/// assert_eq!(rendered.roll, "1d20+3>=15 # %%[__Strength__]%% swing at the orc");
/// assert_eq!(
/// 	rendered.text,
/// 	"*swing at the orc*\n_Computed with Strength_\n**Critical success** — `1d20+3` ⟶ 1d20[20] + 3 = `23` ≥ [15]"
/// );
/// # Ok::<(), dicenote::pipeline::Error>(())
/// ```
pub fn process(request: &Request<'_>, settings: &Settings, roller: &mut impl DiceRoller) -> Result<Rendered, Error> {
	let empty = StatMap::new();
	let stats = request.stats.unwrap_or(&empty);

	let extracted = extract_dice_data(request.input);
	tracing::debug!(shape = ?extracted.shape, formula = %extracted.formula, "extracted input");

	let formula = match &extracted.shape {
		Shape::Prose => return Err(Error::NotARoll(request.input.to_owned())),
		Shape::Chained => extracted.formula.clone(),
		Shape::Bracket { .. } | Shape::Plain => match &extracted.comments {
			Some(comments) => format!("{} # {}", extracted.formula, comments.trim_start_matches('#').trim_start()),
			None => extracted.formula.clone(),
		},
	};

	let merged = extract_and_merge_comments(&formula, request.comment.as_deref());
	let resolver = Resolver::new(stats).min_similarity(settings.similarity);
	let used = resolver.resolve(&merged.cleaned_formula).matched;
	let merged = merged.with_stat_markers(&used);

	let roll = if merged.chained {
		compose_chained(&merged.cleaned_formula, &resolver, request.stat_total.as_deref(), &merged.for_roll())
	} else {
		compose_with(
			&merged.cleaned_formula,
			request.threshold.as_deref(),
			&resolver,
			request.stat_total.as_deref(),
			&request.suffix,
			&merged.for_roll(),
			&Arithmetic,
		)
		.roll
	};

	let outcome = roller.roll(&roll)?;

	let context = Context::new(stats)
		.skill(request.skill)
		.similarity(settings.similarity);
	let thresholds = apply_blocks(settings.thresholds, &extracted.critical_blocks, &context);
	let classifications = outcome
		.segments
		.iter()
		.map(|segment| classify_outcome(segment, &thresholds, &settings.critical_rules, &context))
		.collect::<Vec<_>>();

	let text = render_result(
		&outcome,
		&classifications,
		merged.merged.as_deref(),
		&Catalog::new(settings.locale),
	);

	Ok(Rendered {
		roll,
		outcome,
		classifications,
		text,
	})
}

/// Composes each fragment of a chained formula on its own and joins them back up. Threshold overrides and
/// suffixes only apply to single rolls.
fn compose_chained(formula: &str, resolver: &Resolver<'_>, stat_total: Option<&str>, comments: &str) -> String {
	let fragments = split_fragments(formula)
		.into_iter()
		.map(|fragment| {
			let Composed { roll, .. } = compose_with(fragment, None, resolver, stat_total, "", "", &Arithmetic);
			roll
		})
		.collect::<Vec<_>>()
		.join(";");

	format!("{fragments} {comments}").trim_end().to_owned()
}

/// An error resulting from processing a request
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// The input is free text with nothing to roll.
	#[error("no dice to roll in \"{0}\"")]
	NotARoll(String),

	/// The roller couldn't roll the composed formula.
	#[error(transparent)]
	Roll(#[from] outcome::Error),
}
