//! Dice notation compiler and result renderer for tabletop RPG chat rolls.
//!
//! Players type things like `2d6{cf:<=2}>=10`, `1d20+($strength) # attack` or `1d20;&+2d6 #dmg`. This crate takes
//! such input apart, substitutes character stats, composes the formula handed to a dice roller, classifies the
//! rolled totals (success, failure, criticals, custom criticals, oppositions) and renders the result as text.
//!
//! The stages are exposed individually:
//!
//! - [`extract_dice_data()`] splits raw input into its shape, rollable formula, comment and critical blocks.
//! - [`resolve_stats_in_formula()`] substitutes `$name` and `(name)` stat references.
//! - [`extract_and_merge_comments()`] merges formula comments, stat markers and user comments.
//! - [`compose_roll_base()`] builds the roll string.
//! - [`classify_outcome()`] classifies a rolled segment.
//! - [`render_result()`] renders the final text.
//!
//! [`pipeline::process()`] runs all of them in order, using any [`DiceRoller`]. The crate ships one built on its own
//! dice expression grammar, [`outcome::Engine`].
//!
//! # Example
//! ```
//! use dicenote::{
//! 	dice::roller::Iter as IterRoller,
//! 	outcome::Engine,
//! 	pipeline::{process, Request, Settings},
//! };
//!
//! let mut engine = Engine::new(IterRoller::new([5, 3]));
//! let rendered = process(&Request::new("2d6>=10 # fire"), &Settings::default(), &mut engine)?;
//! assert_eq!(rendered.text, "*fire*\n**Failure** — `2d6` ⟶ 2d6[5, 3] = `8` ≤ [10]");
//! # Ok::<(), dicenote::pipeline::Error>(())
//! ```

#![expect(
	clippy::tabs_in_doc_comments,
	reason = "Consistency with source, user-configurability & accessibility"
)]
#![deny(macro_use_extern_crate, meta_variable_misuse, unit_bindings)]
#![warn(
	explicit_outlives_requirements,
	missing_docs,
	missing_debug_implementations,
	unreachable_pub,
	unused_crate_dependencies,
	unused_qualifications,
	clippy::pedantic,
	clippy::allow_attributes,
	clippy::allow_attributes_without_reason,
	clippy::cfg_not_test,
	clippy::clone_on_ref_ptr,
	clippy::cognitive_complexity,
	clippy::dbg_macro,
	clippy::doc_include_without_cfg,
	clippy::empty_enum_variants_with_brackets,
	clippy::empty_structs_with_brackets,
	clippy::exhaustive_enums,
	clippy::exhaustive_structs,
	clippy::exit,
	clippy::expect_used,
	clippy::field_scoped_visibility_modifiers,
	clippy::filetype_is_file,
	clippy::fn_to_numeric_cast_any,
	clippy::get_unwrap,
	clippy::if_then_some_else_none,
	clippy::infinite_loop,
	clippy::lossy_float_literal,
	clippy::map_err_ignore,
	clippy::map_with_unused_argument_over_ranges,
	clippy::missing_const_for_fn,
	clippy::missing_docs_in_private_items,
	clippy::multiple_inherent_impl,
	clippy::mutex_atomic,
	clippy::needless_raw_strings,
	clippy::non_zero_suggestions,
	clippy::panic_in_result_fn,
	clippy::pathbuf_init_then_push,
	clippy::pointer_format,
	clippy::precedence_bits,
	clippy::print_stderr,
	clippy::print_stdout,
	clippy::pub_without_shorthand,
	clippy::rc_buffer,
	clippy::rc_mutex,
	clippy::redundant_test_prefix,
	clippy::redundant_type_annotations,
	clippy::ref_patterns,
	clippy::renamed_function_params,
	clippy::rest_pat_in_fully_bound_structs,
	clippy::return_and_then,
	clippy::same_name_method,
	clippy::self_named_module_files,
	clippy::semicolon_inside_block,
	clippy::str_to_string,
	clippy::string_lit_chars_any,
	clippy::suspicious_xor_used_as_pow,
	clippy::tests_outside_test_module,
	clippy::try_err,
	clippy::undocumented_unsafe_blocks,
	clippy::unnecessary_safety_comment,
	clippy::unnecessary_safety_doc,
	clippy::unnecessary_self_imports,
	clippy::unneeded_field_pattern,
	clippy::unused_result_ok,
	clippy::unwrap_in_result,
	clippy::unwrap_used,
	clippy::verbose_file_reads
)]

pub mod classify;
pub mod comment;
pub mod comparator;
pub mod compose;
pub mod critical;
pub mod dice;
pub mod eval;
pub mod expr;
pub mod extract;
pub mod locale;
pub mod outcome;
pub mod parse;
pub mod patterns;
pub mod pipeline;
pub mod render;
pub mod stats;

pub use classify::classify_outcome;
pub use comment::extract_and_merge_comments;
pub use compose::compose_roll_base;
pub use dice::Dice;
pub use expr::Expr;
pub use extract::extract_dice_data;
pub use outcome::DiceRoller;
pub use render::render_result;
pub use stats::resolve_stats_in_formula;

#[cfg(test)]
mod tests;

#[cfg(feature = "build-binary")]
use ariadne as _;
#[cfg(feature = "build-binary")]
use clap as _;
#[cfg(feature = "build-binary")]
use tracing_subscriber as _;
