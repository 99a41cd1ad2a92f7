use crate::dice::{
	roller::{FastRand as FastRandRoller, Iter as IterRoller, Max as MaxRoller, Roller},
	Dice, DieRoll, Error, Modifier, Rolled,
};

#[test]
fn rolls_stay_in_range() -> Result<(), Error> {
	let dice = Dice::new(100, 42);
	let rolled = FastRandRoller::with_seed(0x0007_50c3_8d57_4400).roll(&dice, true)?;
	assert_eq!(rolled.rolls.len(), 100);
	assert!(rolled.rolls.iter().all(|roll| (1..=42).contains(&roll.val)));
	Ok(())
}

#[test]
fn max_roller_rolls_max_faces() -> Result<(), Error> {
	let dice = Dice::new(3, 8);
	let rolled = MaxRoller.roll(&dice, true)?;
	assert_eq!(rolled.total()?, 24);
	Ok(())
}

#[test]
fn explode_once() -> Result<(), Error> {
	let dice = Dice::builder().count(2).sides(6).explode(None, false).build();
	let rolled = IterRoller::new([6, 6, 6, 6]).roll(&dice, true)?;
	assert_eq!(rolled.rolls.len(), 4);
	assert_eq!(rolled.total()?, 24);
	assert_eq!(rolled.natural(), vec![6, 6]);
	Ok(())
}

#[test]
fn explode_at_threshold() -> Result<(), Error> {
	let dice = Dice::builder().count(2).sides(6).explode(Some(5), true).build();
	let mut roller = IterRoller::new([5, 2, 6, 1]);
	let rolled = roller.roll(&dice, true)?;
	assert_eq!(rolled.total()?, 14);
	assert!(!roller.can_roll());
	Ok(())
}

#[test]
fn infinite_reroll_is_refused() {
	let dice = Dice::builder().count(2).sides(6).reroll(6, true).build();
	let result = IterRoller::new([1, 2]).roll(&dice, true);
	assert!(matches!(result, Err(Error::InfiniteRolls(..))));
}

#[test]
fn single_reroll_is_allowed_on_every_face() -> Result<(), Error> {
	let dice = Dice::builder().count(1).sides(6).reroll(6, false).build();
	let rolled = IterRoller::new([3, 5]).roll(&dice, true)?;
	assert_eq!(rolled.total()?, 5);
	assert_eq!(rolled.natural(), vec![3]);
	Ok(())
}

#[test]
fn keep_low() -> Result<(), Error> {
	let dice = Dice::builder().count(4).sides(6).keep_low(1).build();
	let rolled = IterRoller::new([4, 2, 6, 3]).roll(&dice, true)?;
	assert_eq!(rolled.total()?, 2);
	assert_eq!(rolled.to_string(), "4d6kl[4 (d), 2, 6 (d), 3 (d)]");
	Ok(())
}

#[test]
fn min_and_max_change_values() -> Result<(), Error> {
	let dice = Dice::builder().count(3).sides(6).min(3).max(5).build();
	let rolled = IterRoller::new([1, 6, 4]).roll(&dice, true)?;
	assert_eq!(rolled.total()?, 12);
	assert_eq!(rolled.natural(), vec![1, 6, 4]);
	assert_eq!(rolled.to_string(), "3d6min3max5[3 (m), 5 (m), 4]");
	Ok(())
}

#[test]
fn modifiers_are_skipped_on_request() -> Result<(), Error> {
	let dice = Dice::builder().count(2).sides(6).keep_high(1).build();
	let rolled = IterRoller::new([2, 5]).roll(&dice, false)?;
	assert_eq!(rolled.total()?, 7);
	Ok(())
}

#[test]
fn dice_display() {
	let dice = Dice::builder()
		.count(4)
		.sides(6)
		.explode(Some(5), false)
		.reroll(2, true)
		.build();
	assert_eq!(dice.to_string(), "4d6xo5rr2");
}

#[test]
fn drop_keeps_first_cause() {
	let mut roll = DieRoll::new(4);
	roll.drop(Modifier::KeepHigh(1));
	roll.drop(Modifier::KeepLow(1));
	assert_eq!(roll.dropped_by, Some(Modifier::KeepHigh(1)));
}

#[test]
fn natural_of_changed_roll() {
	let dice = Dice::new(1, 6);
	let mut rolled = Rolled::from_dice_and_rolls(&dice, [2]);
	rolled.rolls[0].change(Modifier::Min(4), 4);
	assert_eq!(rolled.natural(), vec![2]);
	assert_eq!(rolled.rolls[0].val, 4);
}
