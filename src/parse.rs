//! Parser generators for dice expressions, along with the [`FromStr`] implementations that use them.
//!
//! The grammar covers integers, dice (`2d6`, `d20`, `d%`) with their modifiers (`r1`, `rr1`, `x`, `x5`, `xo`,
//! `k`, `kh2`, `kl2`, `min2`, `max5`), unary `-`/`+`, `*`, `/` (rounding down), `\` (rounding up), `+`, `-` and
//! parentheses.

use std::{ops::Range, str::FromStr};

use chumsky::prelude::*;

use crate::{
	dice::{Condition, Dice, Modifier},
	expr::{Expr, Op},
};

/// Generates a parser for an unsigned 8-bit number, labelling errors with `what`.
fn small_int<'src>(what: &'static str) -> impl Parser<'src, &'src str, u8, extra::Err<Rich<'src, char>>> + Clone {
	text::int::<&'src str, _, _>(10).try_map(move |s: &str, span| {
		s.parse()
			.map_err(|err| Rich::custom(span, format!("{what}: {err}")))
	})
}

/// Generates a parser that specifically handles dice terms like "d20", "2d20kh", "8d6x", "d%", etc.
pub fn dice_part<'src>() -> impl Parser<'src, &'src str, Dice, extra::Err<Rich<'src, char>>> + Clone {
	let sides = small_int("Dice sides").or(just('%').to(100_u8));

	let modifier = choice((
		// Minimum and maximum (e.g. min2, max5)
		just("min")
			.ignore_then(small_int("Minimum"))
			.map(Modifier::Min),
		just("max")
			.ignore_then(small_int("Maximum"))
			.map(Modifier::Max),
		// Reroll dice (e.g. r, r2, rr1)
		just('r')
			.ignore_then(just('r').or_not().map(|r| r.is_some()))
			.then(small_int("Reroll value").or_not())
			.map(|(recurse, at_most)| Modifier::Reroll {
				cond: Condition::at_most(at_most.unwrap_or(1)),
				recurse,
			}),
		// Exploding dice (e.g. x, x5, xo)
		just('x')
			.ignore_then(just('o').or_not().map(|o| o.is_none()))
			.then(small_int("Explode value").or_not())
			.map(|(recurse, at_least)| Modifier::Explode {
				cond: at_least.map(Condition::at_least),
				recurse,
			}),
		// Keep lowest (e.g. kl, kl2)
		just("kl")
			.ignore_then(small_int("Keep lowest count").or_not())
			.map(|count| Modifier::KeepLow(count.unwrap_or(1))),
		// Keep highest (e.g. k, kh, kh2)
		just('k')
			.ignore_then(just('h').or_not())
			.ignore_then(small_int("Keep highest count").or_not())
			.map(|count| Modifier::KeepHigh(count.unwrap_or(1))),
	));

	small_int("Dice count")
		.or_not()
		.then_ignore(just('d'))
		.then(sides)
		.then(modifier.repeated().collect::<Vec<_>>())
		.map(|((count, sides), modifiers)| Dice {
			count: count.unwrap_or(1),
			sides,
			modifiers,
		})
}

/// Generates a parser that specifically handles dice terms and expects end of input
pub fn dice<'src>() -> impl Parser<'src, &'src str, Dice, extra::Err<Rich<'src, char>>> + Clone {
	dice_part().padded().then_ignore(end())
}

/// Generates a parser that handles full expressions including mathematical operations, grouping with parentheses,
/// dice expressions, etc.
pub fn expr_part<'src>() -> impl Parser<'src, &'src str, Expr, extra::Err<Rich<'src, char>>> + Clone {
	let op = |c| just(c).padded();

	recursive(|expr| {
		let int = text::int(10).try_map(|s: &str, span| {
			s.parse()
				.map(Expr::Num)
				.map_err(|err| Rich::custom(span, format!("{err}")))
		});

		let dice = dice_part().map(Expr::Dice);

		let atom = dice.or(int).or(expr.delimited_by(just('('), just(')'))).padded();

		// Signs in front of an atom; `+` is a no-op
		let unary = choice((op('-').to(true), op('+').to(false)))
			.repeated()
			.foldr(atom, |negate, rhs| if negate { Expr::Neg(Box::new(rhs)) } else { rhs });

		let product = unary.clone().foldl(
			choice((
				op('*').to(Op::Mul),
				op('/').to(Op::DivDown),
				op('\\').to(Op::DivUp),
			))
			.then(unary)
			.repeated(),
			|lhs, (op, rhs)| Expr::binary(op, lhs, rhs),
		);

		product.clone().foldl(
			choice((
				op('+').to(Op::Add),
				op('-').to(Op::Sub),
			))
			.then(product)
			.repeated(),
			|lhs, (op, rhs)| Expr::binary(op, lhs, rhs),
		)
	})
}

/// Generates a parser that handles full expressions and expects end of input
pub fn expr<'src>() -> impl Parser<'src, &'src str, Expr, extra::Err<Rich<'src, char>>> + Clone {
	expr_part().then_ignore(end())
}

/// Error from parsing dice notation
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{details}")]
#[non_exhaustive]
pub struct Error {
	/// Every parser error, joined with `; `
	pub details: String,

	/// Byte ranges of the input the errors point at, with their messages
	pub spans: Vec<(Range<usize>, String)>,
}

impl Error {
	/// Gathers the errors reported by a parser.
	fn from_rich(errs: &[Rich<'_, char>]) -> Self {
		let spans = errs
			.iter()
			.map(|err| {
				let span = err.span();
				(span.start..span.end, err.to_string())
			})
			.collect::<Vec<_>>();
		Self {
			details: spans
				.iter()
				.map(|(_, message)| message.as_str())
				.collect::<Vec<_>>()
				.join("; "),
			spans,
		}
	}
}

impl FromStr for Dice {
	type Err = Error;

	/// Parses a single set of dice, ignoring case.
	///
	/// # Examples
	/// ```
	/// use dicenote::dice::Dice;
	///
	/// let dice: Dice = "4D6kh3".parse()?;
	/// assert_eq!(dice, Dice::builder().count(4).sides(6).keep_high(3).build());
	/// assert_eq!("d%".parse::<Dice>()?, Dice::new(1, 100));
	/// # Ok::<(), dicenote::parse::Error>(())
	/// ```
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let lc = s.to_lowercase();
		let result = dice().parse(&lc).into_result().map_err(|errs| Error::from_rich(&errs));
		result
	}
}

impl FromStr for Expr {
	type Err = Error;

	/// Parses a full expression, ignoring case.
	///
	/// # Examples
	/// ```
	/// use dicenote::expr::Expr;
	///
	/// let expr: Expr = "(1d20 + 4) * 2".parse()?;
	/// assert_eq!(expr.to_string(), "(1d20 + 4) * 2");
	/// assert!("1d20 +".parse::<Expr>().is_err());
	/// # Ok::<(), dicenote::parse::Error>(())
	/// ```
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let lc = s.to_lowercase();
		let result = expr().parse(&lc).into_result().map_err(|errs| Error::from_rich(&errs));
		result
	}
}
