use rstest::rstest;

use crate::{
	classify::Label,
	comparator::Sign,
	critical::{CriticalRule, CriticalThresholds},
	dice::roller::Iter as IterRoller,
	locale::Locale,
	outcome::{self, Engine},
	pipeline::{process, Error, Request, Settings},
	stats::StatMap,
};

fn engine<const N: usize>(faces: [u8; N]) -> Engine<IterRoller<std::array::IntoIter<u8, N>>> {
	Engine::new(IterRoller::new(faces))
}

#[test]
fn chained_roll() -> Result<(), Error> {
	let rendered = process(
		&Request::new("1d20>=10;&+1d6 # dmg"),
		&Settings::default(),
		&mut engine([12, 4]),
	)?;
	assert_eq!(rendered.roll, "1d20>=10;&+1d6 # dmg");
	assert_eq!(
		rendered.text,
		"*dmg*\n◈ **Success** — `1d20` ⟶ 1d20[12] = `12` ≥ [10]\n◈ `12+1d6` ⟶ 12 + 1d6[4] = `16`"
	);
	assert_eq!(rendered.classifications.len(), 2);
	assert!(rendered.classifications[1].is_none());
	Ok(())
}

#[test]
fn bracket_roll() -> Result<(), Error> {
	let rendered = process(
		&Request::new("I attack [1d20+2>=15] the troll"),
		&Settings::default(),
		&mut engine([10]),
	)?;
	assert_eq!(rendered.roll, "1d20+2>=15 # I attack the troll");
	assert_eq!(
		rendered.text,
		"*I attack the troll*\n**Failure** — `1d20+2` ⟶ 1d20[10] + 2 = `12` ≤ [15]"
	);
	Ok(())
}

#[test]
fn threshold_and_suffix() -> Result<(), Error> {
	let request = Request::new("1d20>=10 perception").threshold("12").suffix("+2");
	let rendered = process(&request, &Settings::default(), &mut engine([9]))?;
	assert_eq!(rendered.roll, "1d20+2>=12 # perception");
	assert_eq!(
		rendered.text,
		"*perception*\n**Failure** — `1d20+2` ⟶ 1d20[9] + 2 = `11` ≤ [12]"
	);
	Ok(())
}

#[test]
fn inline_block_overrides_thresholds() -> Result<(), Error> {
	let settings = Settings::builder()
		.thresholds(CriticalThresholds::natural(Some(20), Some(1)))
		.build();
	let rendered = process(&Request::new("{cs:>=18}1d20>=10 lucky"), &settings, &mut engine([18]))?;
	assert_eq!(rendered.roll, "1d20>=10 # lucky");
	assert_eq!(
		rendered.text,
		"*lucky*\n**Critical success** — `1d20` ⟶ 1d20[18] = `18` ≥ [10]"
	);
	Ok(())
}

#[test]
fn spaced_inline_block() -> Result<(), Error> {
	let rendered = process(&Request::new("1d20 {cf:<=2}>=10 careful"), &Settings::default(), &mut engine([2]))?;
	assert_eq!(rendered.roll, "1d20>=10 # careful");
	assert_eq!(
		rendered.text,
		"*careful*\n**Critical failure** — `1d20` ⟶ 1d20[2] = `2` ≤ [10]"
	);
	Ok(())
}

#[rstest]
#[case("1d20 attack; then retreat", 7, "1d20 # attack; then retreat", "*attack; then retreat*\n`1d20` ⟶ 1d20[7] = `7`")]
#[case("Je frappe; vite [1d20] l'orc", 5, "1d20 # Je frappe; vite l'orc", "*Je frappe; vite l'orc*\n`1d20` ⟶ 1d20[5] = `5`")]
#[case("1d20+2 attaque à l'épée", 11, "1d20+2 # attaque à l'épée", "*attaque à l'épée*\n`1d20+2` ⟶ 1d20[11] + 2 = `13`")]
#[case("1d20 shout {loudly}", 3, "1d20 # shout {loudly}", "*shout {loudly}*\n`1d20` ⟶ 1d20[3] = `3`")]
fn free_text_comments(
	#[case] input: &str,
	#[case] face: u8,
	#[case] roll: &str,
	#[case] text: &str,
) -> Result<(), Error> {
	let rendered = process(&Request::new(input), &Settings::default(), &mut engine([face]))?;
	assert_eq!(rendered.roll, roll);
	assert_eq!(rendered.text, text);
	assert_eq!(rendered.outcome.segments.len(), 1);
	Ok(())
}

#[test]
fn placeholder_takes_stat_total() -> Result<(), Error> {
	let request = Request::new("1d100<=$ climb").stat_total("45");
	let rendered = process(&request, &Settings::default(), &mut engine([30]))?;
	assert_eq!(rendered.roll, "1d100<=45 # climb");
	assert_eq!(rendered.text, "*climb*\n**Success** — `1d100` ⟶ 1d100[30] = `30` ≤ [45]");
	Ok(())
}

#[test]
fn custom_rule_with_stats() -> Result<(), Error> {
	let stats = StatMap::from_iter([("Strength", 3)]);
	let settings = Settings::builder()
		.critical_rule(CriticalRule::new("Brutal", Sign::Gte, "$str+15").affects_skill(false))
		.build();

	let rendered = process(&Request::new("1d20+$str>=10").stats(&stats), &settings, &mut engine([17]))?;
	assert_eq!(rendered.roll, "1d20+3>=10 # %%[__Strength__]%%");
	assert_eq!(
		rendered.text,
		"_Computed with Strength_\n**Brutal** — `1d20+3` ⟶ 1d20[17] + 3 = `20` ≥ [18]"
	);

	let skill = Request::new("1d20+$str>=10").stats(&stats).skill(true);
	let rendered = process(&skill, &settings, &mut engine([17]))?;
	let label = rendered.classifications[0].as_ref().map(|classified| &classified.label);
	assert_eq!(label, Some(&Label::Success));
	Ok(())
}

#[test]
fn french_output() -> Result<(), Error> {
	let settings = Settings::builder().locale(Locale::Fr).build();
	let rendered = process(&Request::new("2d6>=10 # feu"), &settings, &mut engine([5, 3]))?;
	assert_eq!(rendered.text, "*feu*\n**Échec** — `2d6` ⟶ 2d6[5, 3] = `8` ≤ [10]");
	Ok(())
}

#[test]
fn prose_is_not_a_roll() {
	let result = process(&Request::new("hello there"), &Settings::default(), &mut engine([1]));
	assert!(matches!(result, Err(Error::NotARoll(input)) if input == "hello there"));
}

#[test]
fn malformed_formula() {
	let result = process(&Request::new("1d20+foo"), &Settings::default(), &mut engine([1]));
	assert!(matches!(
		result,
		Err(Error::Roll(outcome::Error::MalformedFormula { formula, .. })) if formula == "1d20+foo"
	));
}
