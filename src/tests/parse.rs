use rstest::rstest;

use crate::{
	dice::{Condition, Dice, Modifier},
	expr::Expr,
	parse::Error,
};

#[rstest]
#[case("d20", Dice::new(1, 20))]
#[case("3D8", Dice::new(3, 8))]
#[case("d%", Dice::new(1, 100))]
#[case("2d20kh", Dice::builder().count(2).sides(20).keep_high(1).build())]
#[case("2d20k", Dice::builder().count(2).sides(20).keep_high(1).build())]
#[case("4d6kl2", Dice::builder().count(4).sides(6).keep_low(2).build())]
#[case("8d6x", Dice::builder().count(8).sides(6).explode(None, true).build())]
#[case("8d6xo5", Dice::builder().count(8).sides(6).explode(Some(5), false).build())]
#[case("4d6rr1", Dice::builder().count(4).sides(6).reroll(1, true).build())]
#[case("4d6r", Dice::builder().count(4).sides(6).reroll(1, false).build())]
#[case("1d20MIN3max18", Dice::builder().sides(20).min(3).max(18).build())]
fn dice(#[case] input: &str, #[case] expected: Dice) -> Result<(), Error> {
	assert_eq!(input.parse::<Dice>()?, expected);
	Ok(())
}

#[test]
fn reroll_condition() -> Result<(), Error> {
	let dice: Dice = "6d8r2".parse()?;
	assert_eq!(
		dice.modifiers,
		vec![Modifier::Reroll {
			cond: Condition::at_most(2),
			recurse: false
		}]
	);
	Ok(())
}

#[rstest]
#[case("d")]
#[case("2d")]
#[case("300d6")]
#[case("1d20+")]
#[case("1d20 # comment")]
#[case("")]
fn invalid_expressions(#[case] input: &str) {
	let result = input.parse::<Expr>();
	assert!(result.is_err(), "{input} should not parse");
}

#[test]
fn errors_point_at_input() {
	let Err(err) = "1d20 + foo".parse::<Expr>() else {
		panic!("expression with a word should not parse");
	};
	assert!(!err.spans.is_empty());
	assert!(err.spans.iter().all(|(span, _)| span.end <= "1d20 + foo".len()));
	assert!(!err.details.is_empty());
}

#[test]
fn whitespace_is_ignored() -> Result<(), Error> {
	let spaced: Expr = " ( 1d20 +  4 ) * 2 ".parse()?;
	let tight: Expr = "(1d20+4)*2".parse()?;
	assert_eq!(spaced, tight);
	Ok(())
}
