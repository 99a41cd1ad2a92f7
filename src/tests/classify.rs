use rstest::rstest;

use crate::{
	classify::{apply_blocks, classify_outcome, Classification, Context, Label},
	comparator::{Comparator, Sign},
	critical::{CriticalBlock, CriticalCheck, CriticalRule, CriticalThresholds},
	outcome::RolledSegment,
	stats::StatMap,
};

fn segment(total: i32, natural: Vec<u8>, comparator: Comparator) -> RolledSegment {
	RolledSegment::new("1d20", format!("1d20[{total}]"), total, natural).with_comparator(comparator)
}

fn classify(
	segment: &RolledSegment,
	thresholds: &CriticalThresholds,
	rules: &[CriticalRule],
	context: &Context<'_>,
) -> Classification {
	let Some(classified) = classify_outcome(segment, thresholds, rules, context) else {
		panic!("segment with a numeric comparator should be classified");
	};
	classified
}

#[rstest]
#[case(Sign::Gte, 12, Label::Success, "≥")]
#[case(Sign::Gte, 8, Label::Failure, "≤")]
#[case(Sign::Gt, 8, Label::Failure, "<")]
#[case(Sign::Gt, 11, Label::Success, ">")]
#[case(Sign::Lt, 12, Label::Failure, ">")]
#[case(Sign::Lte, 5, Label::Success, "≤")]
#[case(Sign::Lte, 15, Label::Failure, "≥")]
#[case(Sign::Eq, 9, Label::Failure, "=")]
#[case(Sign::Ne, 10, Label::Failure, "!=")]
#[case(Sign::StrictEq, 10, Label::Success, "==")]
fn sign_table(#[case] sign: Sign, #[case] total: i32, #[case] label: Label, #[case] glyph: &str) {
	let stats = StatMap::new();
	let seg = segment(total, vec![5], Comparator::new(sign, 10));
	let classified = classify(&seg, &CriticalThresholds::default(), &[], &Context::new(&stats));
	assert_eq!(classified.label, label);
	assert_eq!(classified.display.sign, glyph);
	assert_eq!(classified.display.value, "10");
}

#[test]
fn unclassified_segments() {
	let stats = StatMap::new();
	let context = Context::new(&stats);
	let thresholds = CriticalThresholds::natural(Some(20), Some(1));

	let bare = RolledSegment::new("1d20", "1d20[20]", 20, vec![20]);
	assert_eq!(classify_outcome(&bare, &thresholds, &[], &context), None);

	let unresolved = segment(20, vec![20], Comparator::unresolved(Sign::Gte, "$luck"));
	assert_eq!(classify_outcome(&unresolved, &thresholds, &[], &context), None);
}

#[test]
fn failure_threshold_checked_first() {
	let stats = StatMap::new();
	let seg =
		RolledSegment::new("2d20", "2d20[1, 20]", 21, vec![1, 20]).with_comparator(Comparator::new(Sign::Gte, 10));
	let classified = classify(
		&seg,
		&CriticalThresholds::natural(Some(20), Some(1)),
		&[],
		&Context::new(&stats),
	);
	assert_eq!(classified.label, Label::CriticalFailure);
	assert!(classified.passed);
}

#[test]
fn critical_overrides_failed_test() {
	let stats = StatMap::new();
	let seg = segment(20, vec![20], Comparator::new(Sign::Gte, 25));
	let classified = classify(
		&seg,
		&CriticalThresholds::natural(Some(20), Some(1)),
		&[],
		&Context::new(&stats),
	);
	assert_eq!(classified.label, Label::CriticalSuccess);
	assert!(!classified.passed);
	assert_eq!(classified.display.sign, "≤");
}

#[test]
fn first_matching_rule_wins() {
	let stats = StatMap::new();
	let rules = [
		CriticalRule::new("Great", Sign::Gte, "15"),
		CriticalRule::new("Good", Sign::Gte, "10"),
	];
	let seg = segment(16, vec![16], Comparator::new(Sign::Gte, 5));

	for _ in 0..3 {
		let classified = classify(&seg, &CriticalThresholds::default(), &rules, &Context::new(&stats));
		assert_eq!(classified.label, Label::Custom("Great".to_owned()));
		assert_eq!(classified.display.sign, "≥");
		assert_eq!(classified.display.value, "15");
	}

	let lower = segment(12, vec![12], Comparator::new(Sign::Gte, 5));
	let classified = classify(&lower, &CriticalThresholds::default(), &rules, &Context::new(&stats));
	assert_eq!(classified.label, Label::Custom("Good".to_owned()));
}

#[test]
fn thresholds_beat_rules() {
	let stats = StatMap::new();
	let rules = [CriticalRule::new("Great", Sign::Gte, "15")];
	let seg = segment(20, vec![20], Comparator::new(Sign::Gte, 10));
	let classified = classify(
		&seg,
		&CriticalThresholds::natural(Some(20), None),
		&rules,
		&Context::new(&stats),
	);
	assert_eq!(classified.label, Label::CriticalSuccess);
	assert_eq!(classified.display.value, "10");
}

#[test]
fn skill_rolls_skip_rules() {
	let stats = StatMap::new();
	let rules = [
		CriticalRule::new("Great", Sign::Gte, "15").affects_skill(false),
		CriticalRule::new("Good", Sign::Gte, "10"),
	];
	let seg = segment(16, vec![16], Comparator::new(Sign::Gte, 5));

	let skill = classify(&seg, &CriticalThresholds::default(), &rules, &Context::new(&stats).skill(true));
	assert_eq!(skill.label, Label::Custom("Good".to_owned()));

	let plain = classify(&seg, &CriticalThresholds::default(), &rules, &Context::new(&stats));
	assert_eq!(plain.label, Label::Custom("Great".to_owned()));
}

#[test]
fn rule_values_use_stats() {
	let stats = StatMap::from_iter([("dexterity", 12)]);
	let rules = [
		CriticalRule::new("Broken", Sign::Gte, "$luck"),
		CriticalRule::new("Nimble", Sign::Gt, "$dex").on_natural_die(),
	];
	let seg = segment(13, vec![13], Comparator::new(Sign::Gte, 5));
	let classified = classify(&seg, &CriticalThresholds::default(), &rules, &Context::new(&stats));
	assert_eq!(classified.label, Label::Custom("Nimble".to_owned()));
	assert_eq!(classified.display.sign, ">");
	assert_eq!(classified.display.value, "12");
}

#[test]
fn rule_values_can_halve_stats() {
	let stats = StatMap::from_iter([("wisdom", 7)]);
	let rules = [CriticalRule::new("Insight", Sign::Lte, "$wis\\2")];
	let seg = segment(4, vec![4], Comparator::new(Sign::Gte, 2));
	let classified = classify(&seg, &CriticalThresholds::default(), &rules, &Context::new(&stats));
	assert_eq!(classified.label, Label::Custom("Insight".to_owned()));
	assert_eq!(classified.display.value, "4");
}

#[test]
fn opposition_is_reported_alongside() {
	let stats = StatMap::new();
	let comparator = Comparator::new(Sign::Gt, 10).with_opposition(Comparator::new(Sign::Gte, 15));
	let seg = segment(12, vec![12], comparator);
	let classified = classify(&seg, &CriticalThresholds::default(), &[], &Context::new(&stats));
	assert_eq!(classified.label, Label::Success);

	let Some(opposition) = classified.opposition else {
		panic!("opposition should be classified");
	};
	assert_eq!(opposition.label, Label::Failure);
	assert!(!opposition.passed);
	assert_eq!(opposition.display.sign, "≤");
	assert_eq!(opposition.display.value, "15");
}

#[test]
fn blocks_override_thresholds() {
	let stats = StatMap::from_iter([("luck", 3)]);
	let context = Context::new(&stats);
	let base = CriticalThresholds::natural(Some(20), Some(1));

	let blocks = CriticalBlock::find_all("1d20{*cs:>=18}{cf:<=oops}");
	let thresholds = apply_blocks(base, &blocks, &context);
	assert_eq!(thresholds.success, Some(CriticalCheck::new(Sign::Gte, 18, false)));
	assert_eq!(thresholds.failure, base.failure);

	let seg = segment(18, vec![15], Comparator::new(Sign::Gte, 10));
	let classified = classify(&seg, &thresholds, &[], &context);
	assert_eq!(classified.label, Label::CriticalSuccess);
}
