//! Merging of formula comments, stat usage markers and user-supplied comments.

use indexmap::IndexSet;

use crate::{
	extract::fragment_ranges,
	patterns::{STAT_MARKER, WHITESPACE},
};

/// Formula with its global comment taken out, and the single comment that remains after merging
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct MergedComments {
	/// Formula without the global comment or stat markers
	pub cleaned_formula: String,

	/// Merged comment, `None` when nothing was left
	pub merged: Option<String>,

	/// Whether the formula has several `;`-separated fragments, which decides how the comment is formatted
	pub chained: bool,
}

impl MergedComments {
	/// Adds a `%%[__Name__]%%` marker for each stat name, skipping markers already present.
	///
	/// # Examples
	/// ```
	/// use dicenote::comment::extract_and_merge_comments;
	///
	/// let merged = extract_and_merge_comments("1d20+3 # attack", None).with_stat_markers(["Strength", "Strength"]);
	/// assert_eq!(merged.merged.as_deref(), Some("%%[__Strength__]%% attack"));
	/// ```
	#[must_use]
	pub fn with_stat_markers<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let existing = self.merged.take().unwrap_or_default();
		let added = names
			.into_iter()
			.map(|name| marker(name.as_ref()))
			.collect::<Vec<_>>()
			.join(" ");
		let parts = Parts::gather([added.as_str(), existing.as_str()]);
		self.merged = parts.format(self.chained);
		self
	}

	/// Gets the merged comment in the form the roller expects after a formula: always starting with `# `.
	#[must_use]
	pub fn for_roll(&self) -> String {
		match self.merged.as_deref() {
			Some(comment) if comment.starts_with('#') => comment.to_owned(),
			Some(comment) => format!("# {comment}"),
			None => String::new(),
		}
	}
}

/// Builds the marker recording that a stat was used.
#[must_use]
pub fn marker(name: &str) -> String {
	format!("%%[__{name}__]%%")
}

/// Takes the global `# text` comment and stat markers out of a formula and merges them with a user comment.
///
/// For `;`-separated formulas only the last fragment's `#` comment is global, and the merged comment keeps a
/// leading `# `. Single formulas get the comment without it.
///
/// # Examples
/// ```
/// use dicenote::comment::extract_and_merge_comments;
///
/// let merged = extract_and_merge_comments("2d6 # fire", Some("fire"));
/// assert_eq!(merged.cleaned_formula, "2d6");
/// assert_eq!(merged.merged.as_deref(), Some("fire"));
///
/// let shared = extract_and_merge_comments("2d6;1d4 # shared", None);
/// assert_eq!(shared.merged.as_deref(), Some("# shared"));
///
/// assert_eq!(extract_and_merge_comments("2d6", None).merged, None);
/// ```
#[must_use]
pub fn extract_and_merge_comments(formula: &str, user_comment: Option<&str>) -> MergedComments {
	let fragments = fragment_ranges(formula);
	let chained = fragments.len() > 1;

	// Only the last fragment can carry the global comment
	let fragment_start = fragments.last().map_or(0, |last| last.start);
	let (body, global) = match formula[fragment_start..].find('#') {
		Some(idx) => {
			let idx = fragment_start + idx;
			(&formula[..idx], Some(&formula[idx + 1..]))
		}
		None => (formula, None),
	};

	let cleaned_formula = STAT_MARKER.replace_all(body, "");
	let cleaned_formula = cleaned_formula.trim().to_owned();
	let formula_markers = STAT_MARKER
		.find_iter(body)
		.map(|found| found.as_str())
		.collect::<Vec<_>>()
		.join(" ");

	let parts = Parts::gather([
		formula_markers.as_str(),
		global.unwrap_or_default(),
		user_comment.unwrap_or_default(),
	]);

	MergedComments {
		cleaned_formula,
		merged: parts.format(chained),
		chained,
	}
}

/// Deduplicated markers and comment texts, in the order they were first seen
#[derive(Debug, Default)]
struct Parts {
	/// Stat usage markers
	markers: IndexSet<String>,

	/// Comment texts without their leading `#`
	texts: IndexSet<String>,
}

impl Parts {
	/// Splits each source into its markers and remaining text.
	fn gather<'a>(sources: impl IntoIterator<Item = &'a str>) -> Self {
		let mut parts = Self::default();

		for source in sources {
			for found in STAT_MARKER.find_iter(source) {
				parts.markers.insert(found.as_str().to_owned());
			}

			let text = STAT_MARKER.replace_all(source, "");
			let text = WHITESPACE.replace_all(text.trim().trim_start_matches('#').trim(), " ");
			if !text.is_empty() {
				parts.texts.insert(text.into_owned());
			}
		}

		parts
	}

	/// Joins everything into one comment.
	fn format(self, chained: bool) -> Option<String> {
		let joined = self
			.markers
			.into_iter()
			.chain(self.texts)
			.collect::<Vec<_>>()
			.join(" ");

		if joined.is_empty() {
			None
		} else if chained {
			Some(format!("# {joined}"))
		} else {
			Some(joined)
		}
	}
}
