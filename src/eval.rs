//! Evaluation of deterministic arithmetic, used for comparator thresholds and critical rule values.

use crate::{
	dice::roller::Max as MaxRoller,
	expr::{CalcError, EvalError, Expr},
	parse,
};

/// Turns arithmetic text into a number
pub trait Evaluator {
	/// Evaluates an expression such as `10+3` or `(15-2)/2`.
	///
	/// # Errors
	/// If the text isn't an expression that evaluates to a single deterministic number, an error variant is returned.
	fn evaluate(&self, expression: &str) -> Result<i32, Error>;
}

/// Evaluator backed by the dice expression grammar. Expressions that would need a roll are refused.
///
/// # Examples
/// ```
/// use dicenote::eval::{Arithmetic, Evaluator};
///
/// assert_eq!(Arithmetic.evaluate("10+3")?, 13);
/// assert_eq!(Arithmetic.evaluate("7\\2")?, 4);
/// assert!(Arithmetic.evaluate("1d20").is_err());
/// # Ok::<(), dicenote::eval::Error>(())
/// ```
#[derive(Debug, Default, Clone, Copy)]
#[expect(clippy::exhaustive_structs, reason = "Stateless")]
pub struct Arithmetic;

impl Evaluator for Arithmetic {
	fn evaluate(&self, expression: &str) -> Result<i32, Error> {
		let expr: Expr = expression.parse()?;
		if !expr.is_deterministic() {
			return Err(Error::NotDeterministic(expression.trim().to_owned()));
		}

		// Single-sided dice are all that can be left, and those always land on their max
		let evaled = expr.eval(&mut MaxRoller)?;
		Ok(evaled.calc()?)
	}
}

/// An error resulting from evaluating arithmetic
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// The text isn't valid arithmetic.
	#[error("unable to parse expression: {0}")]
	Parse(#[from] parse::Error),

	/// The expression involves dice with more than one side.
	#[error("\"{0}\" depends on a roll")]
	NotDeterministic(String),

	/// Evaluating failed.
	#[error(transparent)]
	Eval(#[from] EvalError),

	/// Calculating the result failed (overflow, division by zero).
	#[error(transparent)]
	Calc(#[from] CalcError),
}
