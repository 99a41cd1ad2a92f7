use rstest::rstest;

use crate::{
	dice::roller::{Iter as IterRoller, Max as MaxRoller},
	expr::{CalcError, Describe, Expr},
};

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[rstest]
#[case("42 + 69", 111)]
#[case("42 - 69", -27)]
#[case("42 * 69", 2898)]
#[case("50 / 11", 4)]
#[case("50 \\ 11", 5)]
#[case("-5 * (3 + 1) - -4 / 2", -18)]
#[case("+7", 7)]
fn arithmetic(#[case] input: &str, #[case] expected: i32) -> TestResult {
	let expr: Expr = input.parse()?;
	assert!(expr.is_deterministic());
	assert_eq!(expr.eval(&mut MaxRoller)?.calc()?, expected);
	Ok(())
}

#[test]
fn overflow() -> TestResult {
	let expr: Expr = format!("{} + 1", i32::MAX).parse()?;
	let result = expr.eval(&mut MaxRoller)?.calc();
	assert!(matches!(result, Err(CalcError::Overflow(..))));
	Ok(())
}

#[test]
fn division_by_zero() -> TestResult {
	let expr: Expr = "1 / 0".parse()?;
	let result = expr.eval(&mut MaxRoller)?.calc();
	assert!(matches!(result, Err(CalcError::Division(..))));
	Ok(())
}

#[test]
fn dice_math() -> TestResult {
	let expr: Expr = "4d5 + 20".parse()?;
	assert!(!expr.is_deterministic());
	let evaled = expr.eval(&mut IterRoller::new([1, 2, 3, 4]))?;
	assert_eq!(evaled.calc()?, 30);
	assert_eq!(evaled.to_string(), "4d5[1, 2, 3, 4] + 20");
	Ok(())
}

#[test]
fn single_sided_dice_are_deterministic() -> TestResult {
	let expr: Expr = "2d1 + 3".parse()?;
	assert!(expr.is_deterministic());
	assert_eq!(expr.eval(&mut MaxRoller)?.calc()?, 5);
	Ok(())
}

#[test]
fn natural_faces_in_order() -> TestResult {
	let expr: Expr = "-(1d20 + 1d4) * 2d6".parse()?;
	let evaled = expr.eval(&mut IterRoller::new([11, 3, 6, 1]))?;
	assert_eq!(evaled.natural(), vec![11, 3, 6, 1]);
	assert_eq!(evaled.calc()?, -98);
	Ok(())
}

#[test]
fn list_limit_truncates_rolls() -> TestResult {
	let expr: Expr = "6d6".parse()?;
	let evaled = expr.eval(&mut IterRoller::new([1, 2, 3, 4, 5, 6]))?;
	assert_eq!(evaled.describe(Some(2)), "6d6[1, 2, 4 more...]");
	assert_eq!(evaled.describe(None), "6d6[1, 2, 3, 4, 5, 6]");
	Ok(())
}

#[rstest]
#[case("1 + 2 * 3", "1 + (2 * 3)")]
#[case("(1 + 2) * 3", "(1 + 2) * 3")]
#[case("-(2d6 + 1)", "-(2d6 + 1)")]
#[case("d20", "1d20")]
fn describe_keeps_grouping(#[case] input: &str, #[case] expected: &str) -> TestResult {
	let expr: Expr = input.parse()?;
	assert_eq!(expr.to_string(), expected);
	Ok(())
}
