//! Localized text for rendered results.

use std::{collections::HashMap, fmt, str::FromStr};

use once_cell::sync::Lazy;

/// Languages with a built-in catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Locale {
	/// English, also the fallback for missing keys
	#[default]
	En,

	/// French
	Fr,
}

impl Locale {
	/// Every locale with a catalog
	pub const ALL: [Self; 2] = [Self::En, Self::Fr];

	/// Gets the language code.
	#[must_use]
	pub const fn code(self) -> &'static str {
		match self {
			Self::En => "en",
			Self::Fr => "fr",
		}
	}

	/// Gets the built-in table for the locale.
	const fn table(self) -> &'static [(&'static str, &'static str)] {
		match self {
			Self::En => EN,
			Self::Fr => FR,
		}
	}
}

impl FromStr for Locale {
	type Err = UnknownLocale;

	/// Parses a language code, ignoring case and any region suffix (`fr-FR`, `en_US`).
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let lang = s.trim().split(['-', '_']).next().unwrap_or_default().to_lowercase();
		match lang.as_str() {
			"en" => Ok(Self::En),
			"fr" => Ok(Self::Fr),
			_ => Err(UnknownLocale(s.to_owned())),
		}
	}
}

impl fmt::Display for Locale {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.code())
	}
}

/// Error for a language code without a catalog
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("no translations for locale \"{0}\"")]
pub struct UnknownLocale(pub String);

/// Keys of the built-in labels
pub mod keys {
	/// Label for a passed test
	pub const SUCCESS: &str = "roll.success";

	/// Label for a failed test
	pub const FAILURE: &str = "roll.failure";

	/// Label for a critical success
	pub const CRITICAL_SUCCESS: &str = "roll.critical_success";

	/// Label for a critical failure
	pub const CRITICAL_FAILURE: &str = "roll.critical_failure";

	/// Line listing the stats a roll used. Takes `stats`.
	pub const COMPUTED_WITH: &str = "roll.computed_with";

	/// Message for a formula that couldn't be rolled. Takes `dice`.
	pub const INVALID_DICE: &str = "error.invalid_dice";

	/// Message for input holding no roll. Takes `input`.
	pub const NOT_A_ROLL: &str = "error.not_a_roll";
}

/// English catalog
const EN: &[(&str, &str)] = &[
	(keys::SUCCESS, "Success"),
	(keys::FAILURE, "Failure"),
	(keys::CRITICAL_SUCCESS, "Critical success"),
	(keys::CRITICAL_FAILURE, "Critical failure"),
	(keys::COMPUTED_WITH, "Computed with {{stats}}"),
	(keys::INVALID_DICE, "Invalid dice: {{dice}}"),
	(keys::NOT_A_ROLL, "No dice to roll in \"{{input}}\""),
];

/// French catalog
const FR: &[(&str, &str)] = &[
	(keys::SUCCESS, "Réussite"),
	(keys::FAILURE, "Échec"),
	(keys::CRITICAL_SUCCESS, "Réussite critique"),
	(keys::CRITICAL_FAILURE, "Échec critique"),
	(keys::COMPUTED_WITH, "Calculé avec {{stats}}"),
	(keys::INVALID_DICE, "Dés invalides : {{dice}}"),
];

/// Looks up localized text
pub trait Translator {
	/// Gets the text for a key with its `{{param}}` placeholders filled in.
	fn translate(&self, key: &str, params: &[(&str, &str)]) -> String;
}

/// [`Translator`] over the built-in catalogs. Keys missing from a locale fall back to English, and keys missing
/// from English come back as the key itself.
///
/// # Examples
/// ```
/// use dicenote::locale::{keys, Catalog, Locale, Translator};
///
/// let fr = Catalog::new(Locale::Fr);
/// assert_eq!(fr.translate(keys::CRITICAL_FAILURE, &[]), "Échec critique");
/// assert_eq!(fr.translate(keys::COMPUTED_WITH, &[("stats", "Force")]), "Calculé avec Force");
/// assert_eq!(fr.translate(keys::NOT_A_ROLL, &[("input", "hi")]), "No dice to roll in \"hi\"");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Catalog {
	/// Active locale
	locale: Locale,
}

impl Catalog {
	/// Creates a catalog for a locale.
	#[must_use]
	pub const fn new(locale: Locale) -> Self {
		Self { locale }
	}

	/// Gets the active locale.
	#[must_use]
	pub const fn locale(&self) -> Locale {
		self.locale
	}
}

impl Translator for Catalog {
	fn translate(&self, key: &str, params: &[(&str, &str)]) -> String {
		let template = lookup(self.locale, key)
			.or_else(|| lookup(Locale::En, key))
			.unwrap_or(key);
		interpolate(template, params)
	}
}

/// Finds a key in one locale's table.
fn lookup(locale: Locale, key: &str) -> Option<&'static str> {
	locale
		.table()
		.iter()
		.find_map(|&(candidate, text)| (candidate == key).then_some(text))
}

/// Fills `{{name}}` placeholders. Placeholders without a value are left as written.
fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
	params.iter().fold(template.to_owned(), |text, (name, value)| {
		text.replace(&format!("{{{{{name}}}}}"), value)
	})
}

/// Every built-in label in every locale, keyed by its lowercased text
static REVERSE: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
	Locale::ALL
		.iter()
		.flat_map(|locale| locale.table().iter())
		.filter(|(_, text)| !text.contains("{{"))
		.map(|&(key, text)| (text.to_lowercase(), key))
		.collect()
});

/// Finds the key of a built-in label from its text in any locale, ignoring case and surrounding whitespace.
///
/// # Examples
/// ```
/// use dicenote::locale::{keys, reverse_lookup};
///
/// assert_eq!(reverse_lookup("réussite critique"), Some(keys::CRITICAL_SUCCESS));
/// assert_eq!(reverse_lookup(" Failure "), Some(keys::FAILURE));
/// assert_eq!(reverse_lookup("Brutal hit"), None);
/// ```
#[must_use]
pub fn reverse_lookup(text: &str) -> Option<&'static str> {
	REVERSE.get(&text.trim().to_lowercase()).copied()
}
