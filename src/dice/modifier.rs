//! Dice modifiers and the conditions they test faces with.

use std::fmt;

use super::{roller::Roller, Error, Rolled};
use crate::comparator::Sign;

/// Routines applied to the rolls of [`Dice`](super::Dice) as part of rolling them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Modifier {
	/// Drops dice meeting a condition and rolls a replacement for each (`r1`, or `rr1` to keep going until the
	/// replacements no longer meet it).
	///
	/// # Examples
	/// ```
	/// use dicenote::dice::{roller::{Iter as IterRoller, Roller}, Dice};
	///
	/// // 4d6rr1: the first 1 is rerolled into another 1, which is rerolled into a 4
	/// let dice = Dice::builder().count(4).sides(6).reroll(1, true).build();
	/// let rolled = IterRoller::new([3, 6, 1, 2, 1, 4]).roll(&dice, true)?;
	/// assert_eq!(rolled.to_string(), "4d6rr1[3, 6, 1 (d), 2, 1 (d), 4]");
	/// assert_eq!(rolled.total()?, 15);
	/// # Ok::<(), dicenote::dice::Error>(())
	/// ```
	Reroll {
		/// Condition faces must meet to be rerolled
		cond: Condition,

		/// Whether replacements are rerolled as well
		recurse: bool,
	},

	/// Keeps dice meeting a condition and rolls an extra die for each (`x`, or `xo` to only do it once).
	///
	/// # Examples
	/// ```
	/// use dicenote::dice::{roller::{Iter as IterRoller, Roller}, Dice};
	///
	/// // 4d6x: the 6 explodes into another 6, which explodes into a 4
	/// let dice = Dice::builder().count(4).sides(6).explode(None, true).build();
	/// let rolled = IterRoller::new([3, 6, 1, 2, 6, 4]).roll(&dice, true)?;
	/// assert_eq!(rolled.total()?, 22);
	/// assert_eq!(rolled.natural(), vec![3, 6, 1, 2]);
	/// # Ok::<(), dicenote::dice::Error>(())
	/// ```
	Explode {
		/// Condition faces must meet to explode. When `None`, only the max face explodes.
		cond: Option<Condition>,

		/// Whether extra dice can explode as well
		recurse: bool,
	},

	/// Keeps only the highest x dice (`kh2`, `k`).
	KeepHigh(u8),

	/// Keeps only the lowest x dice (`kl2`).
	KeepLow(u8),

	/// Raises faces below a minimum to the minimum (`min3`).
	Min(u8),

	/// Lowers faces above a maximum to the maximum (`max3`).
	Max(u8),
}

impl Modifier {
	/// Applies the modifier to a set of rolls, using a roller when extra dice are needed.
	///
	/// # Errors
	/// If applying the modifier would never stop adding dice, an error variant is returned.
	pub fn apply(self, rolled: &mut Rolled, rng: &mut impl Roller) -> Result<(), Error> {
		match self {
			Self::Reroll { cond, recurse } => self.apply_reroll(rolled, rng, cond, recurse)?,
			Self::Explode { cond, recurse } => self.apply_explode(rolled, rng, cond, recurse)?,
			Self::KeepHigh(count) => self.apply_keep(rolled, count, true),
			Self::KeepLow(count) => self.apply_keep(rolled, count, false),
			Self::Min(min) => self.apply_clamp(rolled, |val| (val < min).then_some(min)),
			Self::Max(max) => self.apply_clamp(rolled, |val| (val > max).then_some(max)),
		}

		Ok(())
	}

	/// Applies the [`Self::Reroll`] variant.
	fn apply_reroll(
		self,
		rolled: &mut Rolled,
		rng: &mut impl Roller,
		cond: Condition,
		recurse: bool,
	) -> Result<(), Error> {
		let sides = rolled.dice.sides;
		if recurse && cond.covers_every_face(sides) {
			return Err(Error::InfiniteRolls((*rolled.dice).clone()));
		}

		loop {
			let mut rerolls = Vec::new();
			for roll in rolled
				.rolls
				.iter_mut()
				.filter(|roll| roll.is_kept() && cond.check(roll.val))
			{
				roll.drop(self);
				let mut reroll = rng.roll_die(sides);
				reroll.add(self);
				rerolls.push(reroll);
			}

			if rerolls.is_empty() {
				break;
			}
			rolled.rolls.append(&mut rerolls);

			if !recurse {
				break;
			}
		}

		Ok(())
	}

	/// Applies the [`Self::Explode`] variant.
	fn apply_explode(
		self,
		rolled: &mut Rolled,
		rng: &mut impl Roller,
		cond: Option<Condition>,
		recurse: bool,
	) -> Result<(), Error> {
		let sides = rolled.dice.sides;
		let cond = cond.unwrap_or(Condition::at_least(sides));
		if recurse && cond.covers_every_face(sides) {
			return Err(Error::InfiniteRolls((*rolled.dice).clone()));
		}

		let mut to_explode = rolled
			.rolls
			.iter()
			.filter(|roll| roll.is_kept() && cond.check(roll.val))
			.count();

		while to_explode > 0 {
			let mut explosions = (0..to_explode)
				.map(|_| {
					let mut roll = rng.roll_die(sides);
					roll.add(self);
					roll
				})
				.collect::<Vec<_>>();

			to_explode = if recurse {
				explosions.iter().filter(|roll| cond.check(roll.val)).count()
			} else {
				0
			};
			rolled.rolls.append(&mut explosions);
		}

		Ok(())
	}

	/// Applies the [`Self::KeepHigh`] and [`Self::KeepLow`] variants.
	fn apply_keep(self, rolled: &mut Rolled, count: u8, highest: bool) {
		let mut refs = rolled
			.rolls
			.iter_mut()
			.filter(|roll| roll.is_kept())
			.collect::<Vec<_>>();
		refs.sort();
		if highest {
			refs.reverse();
		}
		refs.iter_mut().skip(usize::from(count)).for_each(|roll| roll.drop(self));
	}

	/// Applies the [`Self::Min`] and [`Self::Max`] variants.
	fn apply_clamp(self, rolled: &mut Rolled, clamp: impl Fn(u8) -> Option<u8>) {
		for roll in rolled.rolls.iter_mut().filter(|roll| roll.is_kept()) {
			if let Some(val) = clamp(roll.val) {
				roll.change(self, val);
			}
		}
	}
}

impl fmt::Display for Modifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Reroll { cond, recurse } => {
				write!(f, "{}{}", if *recurse { "rr" } else { "r" }, cond.describe(Sign::Lte))
			}
			Self::Explode { cond, recurse } => write!(
				f,
				"{}{}",
				if *recurse { "x" } else { "xo" },
				cond.map(|cond| cond.describe(Sign::Gte)).unwrap_or_default()
			),
			Self::KeepHigh(count) if *count > 1 => write!(f, "kh{count}"),
			Self::KeepHigh(..) => f.write_str("kh"),
			Self::KeepLow(count) if *count > 1 => write!(f, "kl{count}"),
			Self::KeepLow(..) => f.write_str("kl"),
			Self::Min(min) => write!(f, "min{min}"),
			Self::Max(max) => write!(f, "max{max}"),
		}
	}
}

/// Test that die faces are checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "Plain record")]
pub struct Condition {
	/// Relation the face must have to the value
	pub sign: Sign,

	/// Value faces are compared to
	pub value: u8,
}

impl Condition {
	/// Faces at or below `value`
	#[must_use]
	pub const fn at_most(value: u8) -> Self {
		Self { sign: Sign::Lte, value }
	}

	/// Faces at or above `value`
	#[must_use]
	pub const fn at_least(value: u8) -> Self {
		Self { sign: Sign::Gte, value }
	}

	/// Checks a face against the condition.
	#[must_use]
	pub fn check(&self, face: u8) -> bool {
		self.sign.check(face, self.value)
	}

	/// Whether every face of a die with `sides` sides meets the condition.
	#[must_use]
	pub fn covers_every_face(&self, sides: u8) -> bool {
		(1..=sides.max(1)).all(|face| self.check(face))
	}

	/// Writes the value alone when the sign is the modifier's usual one, or sign and value otherwise.
	fn describe(&self, usual: Sign) -> String {
		if self.sign == usual {
			self.value.to_string()
		} else {
			format!("{}{}", self.sign, self.value)
		}
	}
}

impl fmt::Display for Condition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{}", self.sign, self.value)
	}
}
