//! Command-line front end: rolls one expression and prints the rendered result.

use std::{io, process::ExitCode};

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::Parser;
use dicenote::{
	critical::CriticalThresholds,
	locale::{keys, Catalog, Locale, Translator},
	outcome::{self, Engine},
	pipeline::{self, process, Request, Settings},
	stats::StatMap,
};
use tracing_subscriber::EnvFilter;

/// Roll dice notation and print the result
#[derive(Parser, Debug)]
#[command(name = "dicenote", version, about)]
struct Args {
	/// Language of the output (en, fr)
	#[arg(long, default_value = "en")]
	lang: Locale,

	/// Character stat as name=value, can be repeated
	#[arg(long = "stat", value_parser = parse_stat)]
	stats: Vec<(String, i32)>,

	/// Natural die value that makes a critical success
	#[arg(long)]
	crit_success: Option<i32>,

	/// Natural die value that makes a critical failure
	#[arg(long)]
	crit_failure: Option<i32>,

	/// Threshold override, either a comparator (>=15) or a bare value (15)
	#[arg(long)]
	threshold: Option<String>,

	/// Maximum number of individual dice listed per set
	#[arg(long)]
	list_limit: Option<usize>,

	/// Expression to roll. Words are joined with spaces, so it can be left unquoted.
	#[arg(required = true)]
	expression: Vec<String>,
}

/// Parses a `name=value` stat argument.
fn parse_stat(text: &str) -> Result<(String, i32), String> {
	let (name, value) = text
		.split_once('=')
		.ok_or_else(|| format!("expected name=value, got \"{text}\""))?;
	let value = value
		.trim()
		.parse()
		.map_err(|err| format!("invalid value for {name}: {err}"))?;
	Ok((name.trim().to_owned(), value))
}

fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.with_writer(io::stderr)
		.init();

	let args = Args::parse();
	let input = args.expression.join(" ");
	let stats = args.stats.into_iter().collect::<StatMap>();
	let settings = Settings::builder()
		.locale(args.lang)
		.thresholds(CriticalThresholds::natural(args.crit_success, args.crit_failure))
		.list_limit(args.list_limit)
		.build();

	let mut request = Request::new(&input).stats(&stats);
	if let Some(threshold) = args.threshold {
		request = request.threshold(threshold);
	}

	let mut engine = Engine::default().list_limit(settings.list_limit);
	match process(&request, &settings, &mut engine) {
		Ok(rendered) => {
			println!("{}", rendered.text);
			ExitCode::SUCCESS
		}
		Err(err) => {
			report(&err, &Catalog::new(settings.locale));
			ExitCode::FAILURE
		}
	}
}

/// Prints an error, pointing at the offending parts of a malformed formula when they are known.
fn report(err: &pipeline::Error, catalog: &Catalog) {
	match err {
		pipeline::Error::Roll(outcome::Error::MalformedFormula { formula, details, spans }) => {
			let message = catalog.translate(keys::INVALID_DICE, &[("dice", formula.as_str())]);
			if spans.is_empty() {
				eprintln!("{message} ({details})");
				return;
			}

			let report = Report::build(ReportKind::Error, 0..formula.len())
				.with_message(message)
				.with_labels(spans.iter().map(|(span, text)| {
					Label::new(span.clone())
						.with_message(text)
						.with_color(Color::Red)
				}))
				.finish();
			if report.eprint(Source::from(formula.as_str())).is_err() {
				eprintln!("{details}");
			}
		}
		pipeline::Error::NotARoll(input) => {
			eprintln!("{}", catalog.translate(keys::NOT_A_ROLL, &[("input", input.as_str())]));
		}
		other => eprintln!("{other}"),
	}
}
