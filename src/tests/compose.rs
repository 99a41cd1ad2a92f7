use rstest::rstest;

use crate::{
	compose::{compose_roll_base, compose_with, extract_comparator, get_threshold, strip_critical_blocks},
	eval::{Error as EvalError, Evaluator},
	patterns::COMPARATOR,
	stats::{Resolver, StatMap},
};

fn character() -> StatMap {
	StatMap::from_iter([("Strength", 3), ("Dexterity", 12)])
}

#[test]
fn roll_base() {
	let composed = compose_roll_base("2d6{cf:<=2}>=10", Some(">=12"), &StatMap::new(), None, "+5", "# attack");
	assert_eq!(composed.dice_without_comparator, "2d6");
	assert_eq!(composed.raw_comparator, ">=12");
	assert_eq!(composed.comparator_evaluated, ">=12");
	assert_eq!(composed.roll, "2d6+5>=12 # attack");
}

#[rstest]
#[case("2d6>=10", Some(">=15"), "2d6>=15")]
#[case("2d6>=10", Some("12"), "2d6>=12")]
#[case("2d6", Some("<5"), "2d6<5")]
#[case("2d6", Some("12"), "2d6")]
#[case("2d6>=10", None, "2d6>=10")]
#[case("2d6>=10", Some("  "), "2d6>=10")]
fn threshold_override(#[case] dice: &str, #[case] threshold: Option<&str>, #[case] expected: &str) {
	let once = get_threshold(dice, threshold);
	assert_eq!(once, expected);
	assert_eq!(get_threshold(&once, threshold), once);
}

#[test]
fn comparator_split() {
	assert_eq!(
		extract_comparator("2d6>=10", &COMPARATOR),
		("2d6".to_owned(), ">=10".to_owned())
	);
	assert_eq!(
		extract_comparator("1d20+4 > 12 ", &COMPARATOR),
		("1d20+4 ".to_owned(), ">12".to_owned())
	);
}

#[test]
fn blocks_are_stripped() {
	assert_eq!(strip_critical_blocks("{*cs:>=$luck}1d20{CF:=1}"), "1d20");
}

#[rstest]
#[case("2d6", "2d6", "", "")]
#[case("1d20>=10+3", "1d20>=13", ">=10+3", ">=13")]
#[case("1d20>=1d10+5", "1d20>=1d10+5", ">=1d10+5", ">=1d10+5")]
#[case("1d20+$str>=$dex", "1d20+3>=12", ">=$dex", ">=12")]
#[case("1d20>=$luck", "1d20>=$luck", ">=$luck", ">=$luck")]
#[case("1d20>10>=5", "1d20>10>=5", ">10>=5", ">10>=5")]
#[case("1d20+(str)>(dex)/2", "1d20+3>6", ">(dex)/2", ">6")]
fn comparators(#[case] formula: &str, #[case] roll: &str, #[case] raw: &str, #[case] evaluated: &str) {
	let composed = compose_roll_base(formula, None, &character(), None, "", "");
	assert_eq!(composed.roll, roll);
	assert_eq!(composed.raw_comparator, raw);
	assert_eq!(composed.comparator_evaluated, evaluated);
}

#[test]
fn placeholder_takes_stat_total() {
	let composed = compose_roll_base("1d100<=$", None, &StatMap::new(), Some("45"), "", "");
	assert_eq!(composed.roll, "1d100<=45");
}

#[test]
fn suffix_goes_before_comparator() {
	let composed = compose_roll_base("1d20", Some(">=15"), &StatMap::new(), None, "+2", "");
	assert_eq!(composed.roll, "1d20+2>=15");
}

/// Evaluator that answers the same number for everything
struct Fixed(i32);

impl Evaluator for Fixed {
	fn evaluate(&self, _expression: &str) -> Result<i32, EvalError> {
		Ok(self.0)
	}
}

#[test]
fn evaluator_is_pluggable() {
	let stats = character();
	let composed = compose_with(
		"1d20>=$luck",
		None,
		&Resolver::new(&stats),
		None,
		"",
		"# test",
		&Fixed(99),
	);
	assert_eq!(composed.roll, "1d20>=99 # test");
}
