use rstest::rstest;

use crate::locale::{keys, reverse_lookup, Catalog, Locale, Translator, UnknownLocale};

#[rstest]
#[case("en", Locale::En)]
#[case("FR", Locale::Fr)]
#[case("fr-FR", Locale::Fr)]
#[case(" en_US ", Locale::En)]
fn locale_codes(#[case] code: &str, #[case] expected: Locale) -> Result<(), UnknownLocale> {
	assert_eq!(code.parse::<Locale>()?, expected);
	Ok(())
}

#[test]
fn unknown_locale() {
	assert_eq!("de".parse::<Locale>(), Err(UnknownLocale("de".to_owned())));
}

#[test]
fn display_round_trips_codes() {
	for locale in Locale::ALL {
		assert_eq!(locale.to_string().parse::<Locale>(), Ok(locale));
	}
}

#[test]
fn every_locale_names_the_labels() {
	for locale in Locale::ALL {
		let catalog = Catalog::new(locale);
		for key in [keys::SUCCESS, keys::FAILURE, keys::CRITICAL_SUCCESS, keys::CRITICAL_FAILURE] {
			let text = catalog.translate(key, &[]);
			assert_ne!(text, key, "{locale} has no text for {key}");
			assert_eq!(reverse_lookup(&text), Some(key));
		}
	}
}

#[test]
fn missing_keys_fall_back() {
	let fr = Catalog::new(Locale::Fr);
	assert_eq!(fr.translate(keys::NOT_A_ROLL, &[("input", "hi")]), "No dice to roll in \"hi\"");
	assert_eq!(fr.translate("roll.unheard_of", &[]), "roll.unheard_of");
}

#[test]
fn placeholders() {
	let en = Catalog::new(Locale::En);
	assert_eq!(
		en.translate(keys::COMPUTED_WITH, &[("stats", "Strength, Wisdom")]),
		"Computed with Strength, Wisdom"
	);
	assert_eq!(en.translate(keys::COMPUTED_WITH, &[]), "Computed with {{stats}}");
	assert_eq!(
		en.translate(keys::INVALID_DICE, &[("other", "x"), ("dice", "1d")]),
		"Invalid dice: 1d"
	);
}

#[test]
fn templates_are_not_reverse_looked_up() {
	assert_eq!(reverse_lookup("Computed with {{stats}}"), None);
	assert_eq!(reverse_lookup("SUCCESS"), Some(keys::SUCCESS));
	assert_eq!(reverse_lookup(""), None);
}
