//! Rendering of classified outcomes into the text shown to players.

use crate::{
	classify::{Classification, Label},
	locale::{keys, reverse_lookup, Translator},
	outcome::{RollOutcome, RolledSegment},
	patterns::{STAT_MARKER, WHITESPACE},
};

/// Prefix of each line of a chained roll
pub const CHAINED_PREFIX: &str = "◈ ";

/// Renders an outcome with the classification of each of its segments.
///
/// The text starts with the comment in italics and a line naming the stats the roll was computed with (from the
/// `%%[__Name__]%%` markers in the comment), followed by one line per segment. `comment` falls back to the
/// outcome's own comment when `None`.
///
/// # Examples
/// ```
/// use dicenote::{
/// 	classify::{classify_outcome, Context},
/// 	comparator::{Comparator, Sign},
/// 	critical::CriticalThresholds,
/// 	locale::{Catalog, Locale},
/// 	outcome::{RollOutcome, RolledSegment},
/// 	render::render_result,
/// 	stats::StatMap,
/// };
///
/// let segment =
/// 	RolledSegment::new("1d20+3", "1d20[9] + 3", 12, vec![9]).with_comparator(Comparator::new(Sign::Gte, 10));
/// let outcome = RollOutcome::new("1d20+3>=10", vec![segment.clone()], None);
/// let stats = StatMap::new();
/// let classified = classify_outcome(&segment, &CriticalThresholds::default(), &[], &Context::new(&stats));
///
/// let text = render_result(&outcome, &[classified], Some("%%[__Strength__]%% attack"), &Catalog::new(Locale::En));
/// assert_eq!(
/// 	text,
/// 	"*attack*\n_Computed with Strength_\n**Success** — `1d20+3` ⟶ 1d20[9] + 3 = `12` ≥ [10]"
/// );
/// ```
#[must_use]
pub fn render_result(
	outcome: &RollOutcome,
	classifications: &[Option<Classification>],
	comment: Option<&str>,
	translator: &dyn Translator,
) -> String {
	let mut lines = Vec::new();

	if let Some(comment) = comment.or(outcome.comment.as_deref()) {
		let (text, stats) = split_markers(comment);
		if !text.is_empty() {
			lines.push(format!("*{text}*"));
		}
		if !stats.is_empty() {
			let stats = stats.join(", ");
			let computed = translator.translate(keys::COMPUTED_WITH, &[("stats", stats.as_str())]);
			lines.push(format!("_{computed}_"));
		}
	}

	let prefix = if outcome.is_chained() { CHAINED_PREFIX } else { "" };
	for (idx, segment) in outcome.segments.iter().enumerate() {
		let classification = classifications.get(idx).and_then(Option::as_ref);
		lines.push(format!("{prefix}{}", render_segment(segment, classification, translator)));
	}

	lines.join("\n")
}

/// Renders a single segment line.
///
/// # Examples
/// ```
/// use dicenote::{locale::Catalog, outcome::RolledSegment, render::render_segment};
///
/// let segment = RolledSegment::new("2d6", "2d6[3, 4]", 7, vec![3, 4]).with_comment("fire");
/// assert_eq!(render_segment(&segment, None, &Catalog::default()), "`2d6` ⟶ 2d6[3, 4] = `7` — *fire*");
/// ```
#[must_use]
pub fn render_segment(
	segment: &RolledSegment,
	classification: Option<&Classification>,
	translator: &dyn Translator,
) -> String {
	let breakdown = format!("`{}` ⟶ {} = `{}`", segment.entry, segment.calc, segment.total);

	let mut line = match classification {
		Some(classification) => {
			let mut line = format!(
				"**{}** — {breakdown} {} [{}]",
				label_text(&classification.label, translator),
				classification.display.sign,
				classification.display.value
			);

			if let Some(comparator) = &segment.comparator {
				if let (Some(dice), Some(rolled)) = (&comparator.original_dice, &comparator.rolled_value) {
					line.push_str(&format!(" ({dice} ⟶ {rolled})"));
				}
			}

			if let Some(opposition) = &classification.opposition {
				line.push_str(&format!(
					" ⚔ **{}** {} [{}]",
					label_text(&opposition.label, translator),
					opposition.display.sign,
					opposition.display.value
				));
			}

			line
		}
		None => breakdown,
	};

	if let Some(comment) = segment.comment.as_deref().filter(|comment| !comment.is_empty()) {
		line.push_str(&format!(" — *{comment}*"));
	}

	line
}

/// Gets the text of a label. Custom names that spell a built-in label in any language are shown as that label in
/// the active language.
#[must_use]
pub fn label_text(label: &Label, translator: &dyn Translator) -> String {
	match label {
		Label::Custom(name) => match reverse_lookup(name) {
			Some(key) => translator.translate(key, &[]),
			None => name.clone(),
		},
		builtin => builtin
			.key()
			.map_or_else(String::new, |key| translator.translate(key, &[])),
	}
}

/// Separates a comment into its free text and the stat names of its markers.
fn split_markers(comment: &str) -> (String, Vec<String>) {
	let stats = STAT_MARKER
		.captures_iter(comment)
		.filter_map(|caps| caps.name("name").map(|name| name.as_str().to_owned()))
		.collect::<Vec<_>>();

	let text = STAT_MARKER.replace_all(comment, "");
	let text = text.trim().trim_start_matches('#').trim();
	(WHITESPACE.replace_all(text, " ").into_owned(), stats)
}
