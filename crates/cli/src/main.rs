#![warn(clippy::pedantic)]

mod config;

use std::{
	fs::{self, File},
	io::{self, Read, Write},
	path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use serde::Serialize;
use tkb2ics_core::{Import, Kind, Occurrence, Subject, Term};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Overrides, Settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Format {
	Ics,
	Json,
}

/// Turn text copied from the course registration portal into a calendar.
#[derive(Parser)]
#[command(name = "tkb2ics", version)]
struct Args {
	/// Pasted text to read; stdin when omitted
	#[clap(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
	path: Option<PathBuf>,
	#[clap(short, long, value_hint = clap::ValueHint::FilePath)]
	output: Option<PathBuf>,
	/// What the pasted text contains
	#[clap(short, long, value_enum, default_value_t = Kind::Schedule)]
	kind: Kind,
	#[clap(short, long, value_enum, default_value_t = Format::Ics)]
	format: Format,
	#[clap(long, env = "TKB2ICS_CONFIG", value_hint = clap::ValueHint::FilePath)]
	config: Option<PathBuf>,
	/// First day of the term's first week (YYYY-MM-DD)
	#[clap(long, env = "TKB2ICS_TERM_START")]
	term_start: Option<NaiveDate>,
	/// Week number of the term's first week
	#[clap(long, env = "TKB2ICS_FIRST_WEEK")]
	first_week: Option<u32>,
}

#[derive(Serialize)]
struct Report<'a> {
	#[serde(flatten)]
	import: &'a Import,
	subjects: Vec<Subject>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	occurrences: Vec<Occurrence>,
}

impl<'a> Report<'a> {
	fn new(import: &'a Import, term: &Term) -> Self {
		Self {
			import,
			subjects: import.subjects(),
			occurrences: import.occurrences(term),
		}
	}
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
	if let Some(path) = path {
		fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
	} else {
		let mut text = String::new();
		io::stdin()
			.read_to_string(&mut text)
			.context("failed to read stdin")?;
		Ok(text)
	}
}

fn main() -> anyhow::Result<()> {
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
		)
		.with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
		.init();

	let args = Args::parse();
	let settings = Settings::resolve(args.config.as_deref(), Overrides {
		term_start: args.term_start,
		first_week: args.first_week,
	})?;

	let text = read_input(args.path.as_deref())?;
	let import = tkb2ics_core::parse(args.kind, &text);

	if import.is_empty() {
		tracing::warn!(kind = %args.kind, "no entries recognised in input");
	} else {
		tracing::info!(kind = %args.kind, entries = import.len(), "parsed input");
	}

	let rendered = match args.format {
		Format::Ics => {
			tkb2ics_core::create_calendar(&import, &settings.term, &settings.calendar).to_string()
		}
		Format::Json => serde_json::to_string_pretty(&Report::new(&import, &settings.term))?,
	};

	if let Some(output) = args.output {
		let mut file = File::create(&output)
			.with_context(|| format!("failed to create {}", output.display()))?;
		writeln!(&mut file, "{rendered}")?;
	} else {
		writeln!(&mut io::stdout(), "{rendered}")?;
	}

	Ok(())
}
