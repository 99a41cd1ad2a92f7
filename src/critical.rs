//! Critical thresholds and named critical rules.
//!
//! Two mechanisms can turn a plain success or failure into something more specific:
//!
//! - [`CriticalThresholds`] are the simple ones: a natural die meeting the configured success or failure check
//!   makes the roll a critical success or critical failure. Inline `{cs:..}` / `{cf:..}` blocks override them
//!   for a single roll.
//! - [`CriticalRule`]s are named custom criticals, walked in the order they were declared. The first one whose
//!   condition holds wins.

use std::fmt;

use crate::{
	comparator::Sign,
	patterns::CRITICAL_BLOCK,
};

/// Which simple threshold an inline block overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "Only success and failure blocks exist")]
pub enum BlockKind {
	/// `{cs:..}`
	Success,

	/// `{cf:..}`
	Failure,
}

/// Inline critical block as written in a formula, e.g. `{cf:<=2}` or `{*cs:>=$luck}`
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct CriticalBlock {
	/// Threshold being overridden
	pub kind: BlockKind,

	/// Sign of the check
	pub sign: Sign,

	/// Value text, possibly holding stat references
	pub value: String,

	/// Whether the check runs against the natural dice (`false` when the block starts with `{*`)
	pub on_natural_die: bool,
}

impl CriticalBlock {
	/// Finds every critical block in a formula, in order of appearance.
	///
	/// # Examples
	/// ```
	/// use dicenote::{comparator::Sign, critical::{BlockKind, CriticalBlock}};
	///
	/// let blocks = CriticalBlock::find_all("2d6{cf:<=2}{*cs:>=12}>=10");
	/// assert_eq!(blocks.len(), 2);
	/// assert_eq!(blocks[0].kind, BlockKind::Failure);
	/// assert_eq!(blocks[0].sign, Sign::Lte);
	/// assert!(blocks[0].on_natural_die);
	/// assert!(!blocks[1].on_natural_die);
	/// ```
	#[must_use]
	pub fn find_all(formula: &str) -> Vec<Self> {
		CRITICAL_BLOCK
			.captures_iter(formula)
			.filter_map(|caps| {
				let kind = match caps.name("kind")?.as_str() {
					"s" | "S" => BlockKind::Success,
					_ => BlockKind::Failure,
				};
				Some(Self {
					kind,
					sign: caps.name("sign")?.as_str().parse().ok()?,
					value: caps.name("value")?.as_str().trim().to_owned(),
					on_natural_die: caps.name("total").is_none(),
				})
			})
			.collect()
	}
}

impl fmt::Display for CriticalBlock {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{{{}c{}:{}{}}}",
			if self.on_natural_die { "" } else { "*" },
			match self.kind {
				BlockKind::Success => 's',
				BlockKind::Failure => 'f',
			},
			self.sign,
			self.value
		)
	}
}

/// A resolved check against either the natural dice or the total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct CriticalCheck {
	/// Sign of the check
	pub sign: Sign,

	/// Value to check against
	pub value: i32,

	/// Whether the check runs against the natural dice rather than the total
	pub on_natural_die: bool,
}

impl CriticalCheck {
	/// Creates a check that passes when a natural die shows exactly `value`.
	#[must_use]
	pub const fn natural(value: i32) -> Self {
		Self {
			sign: Sign::Eq,
			value,
			on_natural_die: true,
		}
	}

	/// Creates a check with any sign.
	#[must_use]
	pub const fn new(sign: Sign, value: i32, on_natural_die: bool) -> Self {
		Self {
			sign,
			value,
			on_natural_die,
		}
	}

	/// Runs the check. Natural checks pass when any natural die meets the condition.
	#[must_use]
	pub fn holds(&self, natural: &[u8], total: i32) -> bool {
		if self.on_natural_die {
			natural.iter().any(|&die| self.sign.check(i32::from(die), self.value))
		} else {
			self.sign.check(total, self.value)
		}
	}
}

/// Simple critical success and failure checks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct CriticalThresholds {
	/// Check that makes a roll a critical success
	pub success: Option<CriticalCheck>,

	/// Check that makes a roll a critical failure
	pub failure: Option<CriticalCheck>,
}

impl CriticalThresholds {
	/// Creates thresholds from plain natural die values (e.g. 20 and 1 for a d20 system).
	#[must_use]
	pub const fn natural(success: Option<i32>, failure: Option<i32>) -> Self {
		Self {
			success: match success {
				Some(value) => Some(CriticalCheck::natural(value)),
				None => None,
			},
			failure: match failure {
				Some(value) => Some(CriticalCheck::natural(value)),
				None => None,
			},
		}
	}

	/// Checks whether any threshold is configured.
	#[must_use]
	pub const fn is_empty(&self) -> bool {
		self.success.is_none() && self.failure.is_none()
	}

	/// Replaces one of the thresholds, returning the updated set.
	#[must_use]
	pub const fn with(mut self, kind: BlockKind, check: CriticalCheck) -> Self {
		match kind {
			BlockKind::Success => self.success = Some(check),
			BlockKind::Failure => self.failure = Some(check),
		}
		self
	}
}

/// Named custom critical
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct CriticalRule {
	/// Name shown as the result label when the rule fires
	pub name: String,

	/// Sign of the rule's condition
	pub sign: Sign,

	/// Value of the condition. May be a sub-expression with stat references (`$dex`, `$wis\2`).
	pub value: String,

	/// Whether the condition is tested against the natural dice rather than the total
	pub on_natural_die: bool,

	/// Whether the rule also applies to skill rolls
	pub affects_skill: bool,
}

impl CriticalRule {
	/// Creates a rule tested against the total that applies to every roll.
	#[must_use]
	pub fn new(name: impl Into<String>, sign: Sign, value: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			sign,
			value: value.into(),
			on_natural_die: false,
			affects_skill: true,
		}
	}

	/// Makes the rule test the natural dice.
	#[must_use]
	pub const fn on_natural_die(mut self) -> Self {
		self.on_natural_die = true;
		self
	}

	/// Sets whether the rule applies to skill rolls.
	#[must_use]
	pub const fn affects_skill(mut self, affects: bool) -> Self {
		self.affects_skill = affects;
		self
	}
}
