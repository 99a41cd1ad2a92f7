//! Arithmetic over dice: the expression tree produced by the parser, its evaluated counterpart and the errors that
//! can come out of rolling or totalling one.

use std::fmt;

use crate::dice::{roller::Roller, Dice, Error as DiceError, Rolled};

/// Binary operator of an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "Covers every operator the grammar has")]
pub enum Op {
	/// `+`
	Add,

	/// `-`
	Sub,

	/// `*`
	Mul,

	/// `/`, integer quotient rounded toward zero
	DivDown,

	/// `\`, integer quotient bumped up by one whenever there is a remainder
	DivUp,
}

impl Op {
	/// Gets the symbol the operator is written with.
	#[must_use]
	pub const fn symbol(self) -> char {
		match self {
			Self::Add => '+',
			Self::Sub => '-',
			Self::Mul => '*',
			Self::DivDown => '/',
			Self::DivUp => '\\',
		}
	}

	/// Checks whether the operator binds tighter than addition.
	#[must_use]
	pub const fn is_multiplicative(self) -> bool {
		matches!(self, Self::Mul | Self::DivDown | Self::DivUp)
	}

	/// Applies the operator with checked arithmetic.
	fn apply(self, lhs: i32, rhs: i32) -> Result<i32, Failure> {
		match self {
			Self::Add => lhs.checked_add(rhs).ok_or(Failure::Overflow),
			Self::Sub => lhs.checked_sub(rhs).ok_or(Failure::Overflow),
			Self::Mul => lhs.checked_mul(rhs).ok_or(Failure::Overflow),
			Self::DivDown => lhs.checked_div(rhs).ok_or(Failure::Division),
			Self::DivUp => {
				let quotient = lhs.checked_div(rhs).ok_or(Failure::Division)?;
				if lhs.checked_rem(rhs).ok_or(Failure::Division)? == 0 {
					Ok(quotient)
				} else {
					quotient.checked_add(1).ok_or(Failure::Overflow)
				}
			}
		}
	}
}

impl fmt::Display for Op {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.symbol())
	}
}

/// Which way applying an operator went wrong, before it's attached to the offending expression
enum Failure {
	/// The result doesn't fit
	Overflow,

	/// Division by zero
	Division,
}

/// Parsed dice expression
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Expr {
	/// Standalone integer
	Num(i32),

	/// Set of dice
	Dice(Dice),

	/// Negated expression
	Neg(Box<Self>),

	/// Two expressions joined by an operator
	Binary(Op, Box<Self>, Box<Self>),
}

impl Expr {
	/// Joins two expressions with an operator.
	#[must_use]
	pub fn binary(op: Op, lhs: Self, rhs: Self) -> Self {
		Self::Binary(op, Box::new(lhs), Box::new(rhs))
	}

	/// Rolls every set of dice in the expression with `rng`, left to right.
	///
	/// # Errors
	/// If rolling a set of dice fails, an error variant is returned.
	///
	/// # Examples
	/// ```
	/// use dicenote::{dice::roller::Iter as IterRoller, expr::Expr};
	///
	/// let expr: Expr = "2d6+3".parse()?;
	/// let evaled = expr.eval(&mut IterRoller::new([4, 5]))?;
	/// assert_eq!(evaled.calc()?, 12);
	/// assert_eq!(evaled.to_string(), "2d6[4, 5] + 3");
	/// # Ok::<(), Box<dyn std::error::Error>>(())
	/// ```
	pub fn eval(&self, rng: &mut impl Roller) -> Result<Evaled<'_>, EvalError> {
		Ok(match self {
			Self::Num(x) => Evaled::Num(*x),
			Self::Dice(dice) => Evaled::Dice(rng.roll(dice, true).map_err(|err| EvalError::Dice(self.clone(), err))?),
			Self::Neg(x) => Evaled::Neg(Box::new(x.eval(rng)?)),
			Self::Binary(op, a, b) => {
				let a = a.eval(rng)?;
				Evaled::Binary(*op, Box::new(a), Box::new(b.eval(rng)?))
			}
		})
	}

	/// Checks whether the expression always yields the same value: numbers, single-sided dice and anything built
	/// only from those.
	#[must_use]
	pub fn is_deterministic(&self) -> bool {
		match self {
			Self::Num(..) => true,
			Self::Dice(dice) => dice.sides == 1,
			Self::Neg(x) => x.is_deterministic(),
			Self::Binary(_, a, b) => a.is_deterministic() && b.is_deterministic(),
		}
	}
}

impl Node for Expr {
	fn operator(&self) -> Option<Op> {
		match self {
			Self::Binary(op, ..) => Some(*op),
			_ => None,
		}
	}

	fn is_value(&self) -> bool {
		matches!(self, Self::Num(..) | Self::Dice(..))
	}
}

impl Describe for Expr {
	/// Writes the expression back out in notation that parses to the same tree. `list_limit` is ignored since
	/// nothing has been rolled yet.
	fn describe(&self, _list_limit: Option<usize>) -> String {
		match self {
			Self::Num(x) => x.to_string(),
			Self::Dice(dice) => dice.to_string(),
			Self::Neg(x) => describe_neg(x.as_ref(), None),
			Self::Binary(op, a, b) => describe_binary(*op, a.as_ref(), b.as_ref(), None),
		}
	}
}

impl fmt::Display for Expr {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.describe(None))
	}
}

/// Expression whose dice have been rolled
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Evaled<'a> {
	/// Standalone integer
	Num(i32),

	/// Rolled dice
	Dice(Rolled<'a>),

	/// Negated expression
	Neg(Box<Self>),

	/// Two expressions joined by an operator
	Binary(Op, Box<Self>, Box<Self>),
}

impl Evaled<'_> {
	/// Totals the expression.
	///
	/// # Errors
	/// If the dice can't be totalled, the arithmetic overflows or a division is by zero, an error variant is returned.
	pub fn calc(&self) -> Result<i32, CalcError> {
		match self {
			Self::Num(x) => Ok(*x),
			Self::Dice(rolled) => Ok(rolled
				.total()
				.map_err(|err| CalcError::Dice(self.clone().into_owned(), err))?
				.into()),
			Self::Neg(x) => x
				.calc()?
				.checked_neg()
				.ok_or_else(|| CalcError::Overflow(self.clone().into_owned())),
			Self::Binary(op, a, b) => op.apply(a.calc()?, b.calc()?).map_err(|failure| match failure {
				Failure::Overflow => CalcError::Overflow(self.clone().into_owned()),
				Failure::Division => CalcError::Division(self.clone().into_owned()),
			}),
		}
	}

	/// Collects the natural faces of every set of dice in the expression, left to right.
	///
	/// # Examples
	/// ```
	/// use dicenote::{dice::roller::Iter as IterRoller, expr::Expr};
	///
	/// let expr: Expr = "1d20+2d6kh1".parse()?;
	/// let evaled = expr.eval(&mut IterRoller::new([17, 2, 5]))?;
	/// assert_eq!(evaled.natural(), vec![17, 2, 5]);
	/// # Ok::<(), Box<dyn std::error::Error>>(())
	/// ```
	#[must_use]
	pub fn natural(&self) -> Vec<u8> {
		match self {
			Self::Num(..) => Vec::new(),
			Self::Dice(rolled) => rolled.natural(),
			Self::Neg(x) => x.natural(),
			Self::Binary(_, a, b) => {
				let mut faces = a.natural();
				faces.extend(b.natural());
				faces
			}
		}
	}

	/// Takes ownership of any borrowed dice so the result can outlive the [`Expr`] it came from.
	#[must_use]
	pub fn into_owned(self) -> Evaled<'static> {
		match self {
			Self::Num(x) => Evaled::Num(x),
			Self::Dice(rolled) => Evaled::Dice(rolled.into_owned()),
			Self::Neg(x) => Evaled::Neg(Box::new(x.into_owned())),
			Self::Binary(op, a, b) => Evaled::Binary(op, Box::new(a.into_owned()), Box::new(b.into_owned())),
		}
	}
}

impl Node for Evaled<'_> {
	fn operator(&self) -> Option<Op> {
		match self {
			Self::Binary(op, ..) => Some(*op),
			_ => None,
		}
	}

	fn is_value(&self) -> bool {
		matches!(self, Self::Num(..) | Self::Dice(..))
	}
}

impl Describe for Evaled<'_> {
	/// Writes the expression with the individual results of each set of dice, up to `list_limit` of them per set.
	fn describe(&self, list_limit: Option<usize>) -> String {
		match self {
			Self::Num(x) => x.to_string(),
			Self::Dice(roll) => roll.describe(list_limit),
			Self::Neg(x) => describe_neg(x.as_ref(), list_limit),
			Self::Binary(op, a, b) => describe_binary(*op, a.as_ref(), b.as_ref(), list_limit),
		}
	}
}

impl fmt::Display for Evaled<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.describe(None))
	}
}

/// Error that can occur during [`Expr::eval()`]
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum EvalError {
	/// Rolling a set of dice failed.
	#[error("dice error while evaluating \"{0}\": {1}")]
	Dice(Expr, #[source] DiceError),
}

/// Error that can occur during [`Evaled::calc()`]
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum CalcError {
	/// Totalling a set of dice failed.
	#[error("dice error while calculating ({0}): {1}")]
	Dice(Evaled<'static>, #[source] DiceError),

	/// The result doesn't fit in an `i32`.
	#[error("integer overflow while calculating {0}")]
	Overflow(Evaled<'static>),

	/// Division by zero.
	#[error("division error while calculating {0}")]
	Division(Evaled<'static>),
}

/// Builds a textual description with up to `list_limit` individual results listed per set of dice
pub trait Describe {
	/// Describes the value. Sets of rolled dice list their results.
	#[must_use]
	fn describe(&self, list_limit: Option<usize>) -> String;
}

/// Shape of a tree node, enough to decide where parentheses go
trait Node: Describe {
	/// Operator of a binary node
	fn operator(&self) -> Option<Op>;

	/// Whether the node is a number or a set of dice
	fn is_value(&self) -> bool;
}

/// Describes a negation, grouping anything that isn't a single value.
fn describe_neg(x: &impl Node, list_limit: Option<usize>) -> String {
	if x.is_value() {
		format!("-{}", x.describe(list_limit))
	} else {
		format!("-({})", x.describe(list_limit))
	}
}

/// Describes a binary operation. A left operand is wrapped in parentheses when it mixes additive and multiplicative
/// operators with the parent, a right operand whenever it is itself an operation, so the text parses back to the
/// same tree.
fn describe_binary(op: Op, a: &impl Node, b: &impl Node, list_limit: Option<usize>) -> String {
	let lhs = a.describe(list_limit);
	let lhs = match a.operator() {
		Some(child) if child.is_multiplicative() != op.is_multiplicative() => format!("({lhs})"),
		_ => lhs,
	};

	let rhs = b.describe(list_limit);
	let rhs = if b.operator().is_some() { format!("({rhs})") } else { rhs };

	format!("{lhs} {op} {rhs}")
}
