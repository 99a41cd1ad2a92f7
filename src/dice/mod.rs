//! Dice primitives used by the reference roller: sets of dice, the individual rolls they produce and the
//! modifiers applied to them.
//!
//! Formulas get here through [`Expr::Dice`](crate::expr::Expr::Dice); the rest of the crate only ever sees the
//! totals, natural faces and descriptions these produce.

pub mod modifier;
pub mod roller;

use std::{borrow::Cow, cmp, fmt};

pub use self::{
	modifier::{Condition, Modifier},
	roller::Roller,
};
use crate::expr::Describe;

/// A set of one or more dice with the same number of sides, and the modifiers to apply to their rolls
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "Built directly by the parser and in tests")]
pub struct Dice {
	/// Number of dice to roll
	pub count: u8,

	/// Number of sides for each die
	pub sides: u8,

	/// Modifiers applied to the rolls, in order
	pub modifiers: Vec<Modifier>,
}

impl Dice {
	/// Creates a new set of dice with a given count and number of sides.
	#[must_use]
	pub const fn new(count: u8, sides: u8) -> Self {
		Self {
			count,
			sides,
			modifiers: Vec::new(),
		}
	}

	/// Creates a new dice builder.
	#[must_use]
	#[inline]
	pub fn builder() -> Builder {
		Builder::default()
	}
}

impl Default for Dice {
	/// Creates the default dice (1d20).
	#[inline]
	fn default() -> Self {
		Self::new(1, 20)
	}
}

impl fmt::Display for Dice {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}d{}", self.count, self.sides)?;
		self.modifiers.iter().try_for_each(|modifier| write!(f, "{modifier}"))
	}
}

/// Single die produced from rolling [`Dice`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct DieRoll {
	/// Current value of the die
	pub val: u8,

	/// Modifier that caused the addition of this die, if any
	pub added_by: Option<Modifier>,

	/// Modifier that caused the drop of this die, if any
	pub dropped_by: Option<Modifier>,

	/// Changes made to the value, oldest first
	pub changes: Vec<ValChange>,
}

impl DieRoll {
	/// Creates a new die roll with the given value.
	#[must_use]
	pub const fn new(val: u8) -> Self {
		Self {
			val,
			added_by: None,
			dropped_by: None,
			changes: Vec::new(),
		}
	}

	/// Marks this die as added by a modifier. A die keeps the first modifier it was added by.
	pub fn add(&mut self, from: Modifier) {
		self.added_by.get_or_insert(from);
	}

	/// Marks this die as dropped by a modifier. A die keeps the first modifier it was dropped by.
	pub fn drop(&mut self, from: Modifier) {
		self.dropped_by.get_or_insert(from);
	}

	/// Replaces the value and records the change.
	pub fn change(&mut self, from: Modifier, new_val: u8) {
		self.changes.push(ValChange {
			before: self.val,
			after: new_val,
			cause: from,
		});
		self.val = new_val;
	}

	/// Value the die landed on, before any modifier changed it.
	#[must_use]
	pub fn natural(&self) -> u8 {
		self.changes.first().map_or(self.val, |change| change.before)
	}

	/// Whether this die was part of the original set (not added by a modifier)
	#[must_use]
	#[inline]
	pub const fn is_original(&self) -> bool {
		self.added_by.is_none()
	}

	/// Whether this die has been dropped by a modifier
	#[must_use]
	#[inline]
	pub const fn is_dropped(&self) -> bool {
		self.dropped_by.is_some()
	}

	/// Whether this die still counts towards the total
	#[must_use]
	#[inline]
	pub const fn is_kept(&self) -> bool {
		self.dropped_by.is_none()
	}

	/// Whether a modifier changed the value
	#[must_use]
	#[inline]
	pub fn is_changed(&self) -> bool {
		!self.changes.is_empty()
	}
}

impl PartialOrd for DieRoll {
	fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for DieRoll {
	fn cmp(&self, other: &Self) -> cmp::Ordering {
		self.val.cmp(&other.val)
	}
}

impl fmt::Display for DieRoll {
	/// Writes the value, followed by ` (m)` if a modifier changed it and ` (d)` if it was dropped.
	///
	/// # Examples
	/// ```
	/// use dicenote::dice::{DieRoll, Modifier};
	///
	/// let mut roll = DieRoll::new(16);
	/// assert_eq!(roll.to_string(), "16");
	/// roll.drop(Modifier::KeepHigh(1));
	/// assert_eq!(roll.to_string(), "16 (d)");
	/// ```
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}{}{}",
			self.val,
			if self.is_changed() { " (m)" } else { "" },
			if self.is_dropped() { " (d)" } else { "" }
		)
	}
}

/// Modification made to a [`DieRoll`] by a [`Modifier`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[expect(clippy::exhaustive_structs, reason = "Plain record")]
pub struct ValChange {
	/// Value before the change
	pub before: u8,

	/// Value after the change
	pub after: u8,

	/// Modifier that made the change
	pub cause: Modifier,
}

/// Result of rolling [`Dice`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[expect(clippy::exhaustive_structs, reason = "Plain record")]
pub struct Rolled<'a> {
	/// Every die that was rolled, including added and dropped ones
	pub rolls: Vec<DieRoll>,

	/// Dice that were rolled
	pub dice: Cow<'a, Dice>,
}

impl Rolled<'_> {
	/// Sums the values of the kept dice.
	///
	/// # Errors
	/// If the sum overflows, an error variant is returned.
	///
	/// # Examples
	/// ```
	/// use dicenote::dice::{roller::{Iter as IterRoller, Roller}, Dice};
	///
	/// let dice = Dice::builder().count(3).sides(6).keep_high(2).build();
	/// let rolled = IterRoller::new([2, 6, 5]).roll(&dice, true)?;
	/// assert_eq!(rolled.total()?, 11);
	/// # Ok::<(), dicenote::dice::Error>(())
	/// ```
	pub fn total(&self) -> Result<u16, Error> {
		self.rolls
			.iter()
			.filter(|roll| roll.is_kept())
			.try_fold(0_u16, |sum, roll| sum.checked_add(u16::from(roll.val)))
			.ok_or_else(|| Error::Overflow(self.clone().into_owned()))
	}

	/// Faces the original dice landed on, ignoring dice added by modifiers and value changes.
	#[must_use]
	pub fn natural(&self) -> Vec<u8> {
		self.rolls
			.iter()
			.filter(|roll| roll.is_original())
			.map(DieRoll::natural)
			.collect()
	}

	/// Moves all owned data into a `'static` instance, cloning the dice if they were borrowed.
	#[must_use]
	pub fn into_owned(self) -> Rolled<'static> {
		Rolled {
			rolls: self.rolls,
			dice: Cow::Owned(self.dice.into_owned()),
		}
	}

	/// Creates a rolled set from dice and plain values.
	#[must_use]
	pub fn from_dice_and_rolls(dice: &Dice, rolls: impl IntoIterator<Item = u8>) -> Rolled<'_> {
		Rolled {
			rolls: rolls.into_iter().map(DieRoll::new).collect(),
			dice: Cow::Borrowed(dice),
		}
	}
}

impl Describe for Rolled<'_> {
	/// Writes the dice followed by the list of rolls, truncated to `list_limit` entries with an "X more..." note.
	///
	/// # Examples
	/// ```
	/// use dicenote::{dice::{Dice, Modifier, Rolled}, expr::Describe};
	///
	/// let dice = Dice::builder().count(4).sides(6).keep_high(2).build();
	/// let mut rolled = Rolled::from_dice_and_rolls(&dice, [6, 2, 5, 3]);
	/// rolled.rolls[1].drop(Modifier::KeepHigh(2));
	/// rolled.rolls[3].drop(Modifier::KeepHigh(2));
	///
	/// assert_eq!(rolled.describe(None), "4d6kh2[6, 2 (d), 5, 3 (d)]");
	/// assert_eq!(rolled.describe(Some(2)), "4d6kh2[6, 2 (d), 2 more...]");
	/// ```
	fn describe(&self, list_limit: Option<usize>) -> String {
		let list_limit = list_limit.unwrap_or(usize::MAX);
		let truncated = self.rolls.len().saturating_sub(list_limit);

		format!(
			"{}[{}{}]",
			self.dice,
			self.rolls
				.iter()
				.take(list_limit)
				.map(ToString::to_string)
				.collect::<Vec<_>>()
				.join(", "),
			if truncated > 0 {
				format!(", {truncated} more...")
			} else {
				String::new()
			}
		)
	}
}

impl fmt::Display for Rolled<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.describe(None))
	}
}

/// An error resulting from a dice operation
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// Summing the rolls overflowed.
	#[error("integer overflow")]
	Overflow(Rolled<'static>),

	/// Rolling the dice would never stop, e.g. rerolling every face of a die.
	///
	/// # Examples
	/// ```
	/// use dicenote::dice::{roller::{FastRand as FastRandRoller, Roller}, Dice, Error};
	///
	/// let dice = Dice::builder().count(4).sides(1).explode(None, true).build();
	/// assert!(matches!(FastRandRoller::default().roll(&dice, true), Err(Error::InfiniteRolls(..))));
	/// ```
	#[error("{0} would result in infinite rolls")]
	InfiniteRolls(Dice),
}

/// Builds [`Dice`] with a fluent interface.
///
/// # Examples
/// ```
/// use dicenote::dice::{Condition, Dice, Modifier};
///
/// let dice = Dice::builder().count(6).sides(8).reroll(1, false).keep_high(4).build();
/// assert_eq!(
/// 	dice.modifiers,
/// 	vec![
/// 		Modifier::Reroll {
/// 			cond: Condition::at_most(1),
/// 			recurse: false
/// 		},
/// 		Modifier::KeepHigh(4),
/// 	],
/// );
/// assert_eq!(dice.to_string(), "6d8r1kh4");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder(Dice);

impl Builder {
	/// Sets the number of dice to roll.
	#[must_use]
	pub const fn count(mut self, count: u8) -> Self {
		self.0.count = count;
		self
	}

	/// Sets the number of sides per die.
	#[must_use]
	pub const fn sides(mut self, sides: u8) -> Self {
		self.0.sides = sides;
		self
	}

	/// Adds a modifier that rerolls faces at or below a value.
	#[must_use]
	pub fn reroll(mut self, at_most: u8, recurse: bool) -> Self {
		self.0.modifiers.push(Modifier::Reroll {
			cond: Condition::at_most(at_most),
			recurse,
		});
		self
	}

	/// Adds a modifier that explodes faces at or above a value (the max face when `None`).
	#[must_use]
	pub fn explode(mut self, at_least: Option<u8>, recurse: bool) -> Self {
		self.0.modifiers.push(Modifier::Explode {
			cond: at_least.map(Condition::at_least),
			recurse,
		});
		self
	}

	/// Adds a keep highest modifier.
	#[must_use]
	pub fn keep_high(mut self, count: u8) -> Self {
		self.0.modifiers.push(Modifier::KeepHigh(count));
		self
	}

	/// Adds a keep lowest modifier.
	#[must_use]
	pub fn keep_low(mut self, count: u8) -> Self {
		self.0.modifiers.push(Modifier::KeepLow(count));
		self
	}

	/// Adds a minimum modifier.
	#[must_use]
	pub fn min(mut self, min: u8) -> Self {
		self.0.modifiers.push(Modifier::Min(min));
		self
	}

	/// Adds a maximum modifier.
	#[must_use]
	pub fn max(mut self, max: u8) -> Self {
		self.0.modifiers.push(Modifier::Max(max));
		self
	}

	/// Finalizes the dice.
	#[must_use]
	pub fn build(self) -> Dice {
		self.0
	}
}
