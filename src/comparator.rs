//! Comparison signs, comparator clauses and the sign tables used when displaying them.

use std::{fmt, str::FromStr};

use crate::patterns::CLAUSE;

/// Relation between a roll total and a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "The notation has no other comparison signs")]
pub enum Sign {
	/// `<`
	Lt,

	/// `>`
	Gt,

	/// `<=`
	Lte,

	/// `>=`
	Gte,

	/// `=`
	Eq,

	/// `!=`
	Ne,

	/// `==`
	StrictEq,
}

impl Sign {
	/// Checks `lhs <sign> rhs`.
	///
	/// # Examples
	/// ```
	/// use dicenote::comparator::Sign;
	///
	/// assert!(Sign::Gte.check(12, 10));
	/// assert!(!Sign::Lt.check(12, 10));
	/// assert!(Sign::Ne.check(3, 4));
	/// ```
	#[must_use]
	pub fn check<T: PartialOrd>(self, lhs: T, rhs: T) -> bool {
		match self {
			Self::Lt => lhs < rhs,
			Self::Gt => lhs > rhs,
			Self::Lte => lhs <= rhs,
			Self::Gte => lhs >= rhs,
			Self::Eq | Self::StrictEq => lhs == rhs,
			Self::Ne => lhs != rhs,
		}
	}

	/// Gets the symbol as it is written in dice notation.
	#[must_use]
	pub const fn symbol(self) -> &'static str {
		match self {
			Self::Lt => "<",
			Self::Gt => ">",
			Self::Lte => "<=",
			Self::Gte => ">=",
			Self::Eq => "=",
			Self::Ne => "!=",
			Self::StrictEq => "==",
		}
	}

	/// Gets the glyph shown to the reader once the test is known to have passed or failed.
	///
	/// A passed test shows its own sign with `>=`/`<=` swapped for `≥`/`≤`. A failed test shows the
	/// mirrored sign: `>` becomes `<`, `>=` becomes `≤` and so on, while the equality signs stay as written.
	///
	/// # Examples
	/// ```
	/// use dicenote::comparator::Sign;
	///
	/// assert_eq!(Sign::Gte.display(true), "≥");
	/// assert_eq!(Sign::Gte.display(false), "≤");
	/// assert_eq!(Sign::Gt.display(false), "<");
	/// assert_eq!(Sign::Ne.display(false), "!=");
	/// ```
	#[must_use]
	pub const fn display(self, passed: bool) -> &'static str {
		if passed {
			return match self {
				Self::Gte => "≥",
				Self::Lte => "≤",
				other => other.symbol(),
			};
		}

		match self {
			Self::Gt => "<",
			Self::Lt => ">",
			Self::Gte => "≤",
			Self::Lte => "≥",
			Self::Eq => "=",
			Self::Ne => "!=",
			Self::StrictEq => "==",
		}
	}
}

impl FromStr for Sign {
	type Err = UnknownSign;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s.trim() {
			"<" => Self::Lt,
			">" => Self::Gt,
			"<=" => Self::Lte,
			">=" => Self::Gte,
			"=" => Self::Eq,
			"!=" => Self::Ne,
			"==" => Self::StrictEq,
			other => return Err(UnknownSign(other.to_owned())),
		})
	}
}

impl fmt::Display for Sign {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.symbol())
	}
}

/// Error for text that isn't one of the known comparison signs
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown comparison sign: {0}")]
pub struct UnknownSign(pub String);

/// Unevaluated comparator text, split into its sign and threshold (and an optional opposition clause)
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Clause {
	/// Sign of the primary test
	pub sign: Sign,

	/// Threshold text, trimmed
	pub value: String,

	/// Second clause written directly after the first, e.g. the `>=5` in `>10>=5`
	pub opposition: Option<(Sign, String)>,
}

impl Clause {
	/// Parses comparator text such as `>=10`, `<$dex` or `>10>=5`.
	/// Returns `None` when the text doesn't start with a sign or has an empty threshold.
	///
	/// # Examples
	/// ```
	/// use dicenote::comparator::{Clause, Sign};
	///
	/// let clause = Clause::parse(">10>=5").unwrap();
	/// assert_eq!(clause.sign, Sign::Gt);
	/// assert_eq!(clause.value, "10");
	/// assert_eq!(clause.opposition, Some((Sign::Gte, "5".to_owned())));
	/// ```
	#[must_use]
	pub fn parse(text: &str) -> Option<Self> {
		let caps = CLAUSE.captures(text.trim())?;
		let sign = caps.name("sign")?.as_str().parse().ok()?;
		let value = caps.name("value")?.as_str().trim().to_owned();
		if value.is_empty() {
			return None;
		}

		let opposition = match (caps.name("osign"), caps.name("ovalue")) {
			(Some(osign), Some(ovalue)) if !ovalue.as_str().trim().is_empty() => {
				Some((osign.as_str().parse().ok()?, ovalue.as_str().trim().to_owned()))
			}
			_ => None,
		};

		Some(Self { sign, value, opposition })
	}
}

impl fmt::Display for Clause {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{}", self.sign, self.value)?;
		if let Some((sign, value)) = &self.opposition {
			write!(f, "{sign}{value}")?;
		}
		Ok(())
	}
}

/// A threshold the total of a rolled segment is tested against
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Comparator {
	/// Sign of the test
	pub sign: Sign,

	/// Numeric threshold, `None` when the threshold text couldn't be turned into a number
	pub value: Option<i32>,

	/// Threshold text as written
	pub raw: String,

	/// Dice expression the threshold was rolled from, if it contained dice
	pub original_dice: Option<String>,

	/// Description of the roll that produced the threshold, if it contained dice
	pub rolled_value: Option<String>,

	/// Opposing difficulty written after the primary clause
	pub opposition: Option<Box<Comparator>>,
}

impl Comparator {
	/// Creates a comparator with a plain numeric threshold.
	#[must_use]
	pub fn new(sign: Sign, value: i32) -> Self {
		Self {
			sign,
			value: Some(value),
			raw: value.to_string(),
			original_dice: None,
			rolled_value: None,
			opposition: None,
		}
	}

	/// Creates a comparator whose threshold text couldn't be evaluated.
	#[must_use]
	pub fn unresolved(sign: Sign, raw: impl Into<String>) -> Self {
		Self {
			sign,
			value: None,
			raw: raw.into(),
			original_dice: None,
			rolled_value: None,
			opposition: None,
		}
	}

	/// Marks the threshold as having been rolled from a dice expression.
	#[must_use]
	pub fn rolled_from(mut self, dice: impl Into<String>, rolled: impl Into<String>) -> Self {
		self.original_dice = Some(dice.into());
		self.rolled_value = Some(rolled.into());
		self
	}

	/// Attaches an opposition comparator.
	#[must_use]
	pub fn with_opposition(mut self, opposition: Self) -> Self {
		self.opposition = Some(Box::new(opposition));
		self
	}

	/// Tests a total against the comparator. `None` when the threshold isn't numeric.
	#[must_use]
	pub fn test(&self, total: i32) -> Option<bool> {
		self.value.map(|value| self.sign.check(total, value))
	}
}

impl fmt::Display for Comparator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.value {
			Some(value) => write!(f, "{}{value}", self.sign),
			None => write!(f, "{}{}", self.sign, self.raw),
		}
	}
}
