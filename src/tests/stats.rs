use rstest::rstest;

use crate::stats::{
	fill_placeholder,
	matching::{find, normalize, Tier},
	resolve_stats_in_formula, Resolver, StatMap,
};

fn character() -> StatMap {
	StatMap::from_iter([("Strength", 3), ("Dexterity", 2), ("Dexterity bonus", 4), ("luck", -2)])
}

#[rstest]
#[case("1d20+$strength", "1d20+3")]
#[case("1d20+$STR", "1d20+3")]
#[case("1d20+(dex)", "1d20+2")]
#[case("1d20+$luck", "1d20+(-2)")]
#[case("1d20+$dexteryti", "1d20+2")]
#[case("1d20+$zz", "1d20+$zz")]
#[case("1d20+(d6)", "1d20+(d6)")]
#[case("1d100<=$", "1d100<=$")]
fn substitution(#[case] formula: &str, #[case] expected: &str) {
	assert_eq!(resolve_stats_in_formula(formula, &character()).formula, expected);
}

#[test]
fn exact_beats_partial() {
	let stats = StatMap::from_iter([("strength", 2), ("str", 1)]);
	let found = find(&stats, "str", 0.5).map(|found| (found.name, found.tier));
	assert_eq!(found, Some(("str", Tier::Exact)));
}

#[test]
fn partial_prefers_shortest_name() {
	let stats = character();
	let found = find(&stats, "dex", 0.5).map(|found| (found.name, found.tier));
	assert_eq!(found, Some(("Dexterity", Tier::Partial)));
}

#[test]
fn partial_ties_go_to_first() {
	let stats = StatMap::from_iter([("agility", 1), ("fragile", 2)]);
	assert_eq!(find(&stats, "agil", 0.5).map(|found| found.value), Some(1));
}

#[test]
fn similarity_threshold() {
	let stats = character();
	assert_eq!(
		find(&stats, "dexteryti", 0.5).map(|found| found.tier),
		Some(Tier::Similar)
	);

	let strict = Resolver::new(&stats).min_similarity(0.9).resolve("1d20+$dexteryti");
	assert_eq!(strict.formula, "1d20+$dexteryti");
	assert!(strict.matched.is_empty());
}

#[test]
fn accents_are_ignored() {
	let stats = StatMap::from_iter([("Dextérité", 2)]);
	let resolved = resolve_stats_in_formula("1d20+$dexterite", &stats);
	assert_eq!(resolved.formula, "1d20+2");
	assert_eq!(resolved.matched.iter().collect::<Vec<_>>(), ["Dextérité"]);
	assert_eq!(normalize(" Éclat "), "eclat");
}

#[test]
fn matched_names_are_capitalized_once() {
	let stats = StatMap::from_iter([("strength", 3)]);
	let resolved = resolve_stats_in_formula("$str+$str+(strength)", &stats);
	assert_eq!(resolved.formula, "3+3+3");
	assert_eq!(resolved.matched.iter().collect::<Vec<_>>(), ["Strength"]);
}

#[rstest]
#[case("1d20+(bonus)+2", "", "1d20+2")]
#[case("1d20 - (Bonus)", "", "1d20")]
#[case("1d20 + (bonus)", "1d4", "1d20 + 1d4")]
#[case("1d20+(Bônus)", "", "1d20")]
#[case("1d20 + (BÔNUS) >= 10", "", "1d20 >= 10")]
fn overrides(#[case] formula: &str, #[case] value: &str, #[case] expected: &str) {
	let stats = character();
	let resolved = Resolver::new(&stats).with_override("bonus", value).resolve(formula);
	assert_eq!(resolved.formula, expected);
}

#[test]
fn empty_stats_leave_references() {
	let stats = StatMap::new();
	assert_eq!(resolve_stats_in_formula("1d20+$str+(dex)", &stats).formula, "1d20+$str+(dex)");
}

#[rstest]
#[case("1d20+$;$+1", "5", "1d20+5;5+1")]
#[case("1d100<=$", "45", "1d100<=45")]
#[case("$str", "5", "$str")]
fn placeholder(#[case] formula: &str, #[case] value: &str, #[case] expected: &str) {
	assert_eq!(fill_placeholder(formula, value), expected);
}

#[test]
fn accented_override_name() {
	let stats = character();
	let resolved = Resolver::new(&stats).with_override("Bônus", "2").resolve("1d20-(bonus)");
	assert_eq!(resolved.formula, "1d20-2");
}
