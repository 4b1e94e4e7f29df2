use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::{
	error::{LineError, UnknownKind},
	exam::{parse_exam, ExamEntry},
	schedule::{parse_schedule, ScheduleEntry},
	subject::{subjects_from_exams, subjects_from_schedule, Subject},
	term::{Occurrence, Term},
};

/// What a pasted blob is expected to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Kind {
	Schedule,
	Exam,
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(match self {
			Self::Schedule => "schedule",
			Self::Exam => "exam",
		})
	}
}

impl FromStr for Kind {
	type Err = UnknownKind;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s.trim() {
			"schedule" => Self::Schedule,
			"exam" => Self::Exam,
			other => return Err(UnknownKind(other.to_string())),
		})
	}
}

/// Entries recognised in one pasted blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "entries", rename_all = "lowercase")]
pub enum Import {
	Schedule(Vec<ScheduleEntry>),
	Exam(Vec<ExamEntry>),
}

impl Import {
	#[must_use]
	pub fn kind(&self) -> Kind {
		match self {
			Self::Schedule(_) => Kind::Schedule,
			Self::Exam(_) => Kind::Exam,
		}
	}

	#[must_use]
	pub fn len(&self) -> usize {
		match self {
			Self::Schedule(entries) => entries.len(),
			Self::Exam(entries) => entries.len(),
		}
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	#[must_use]
	pub fn subjects(&self) -> Vec<Subject> {
		match self {
			Self::Schedule(entries) => subjects_from_schedule(entries),
			Self::Exam(entries) => subjects_from_exams(entries),
		}
	}

	/// Dated class meetings, in entry order. Exams have none.
	#[must_use]
	pub fn occurrences(&self, term: &Term) -> Vec<Occurrence> {
		match self {
			Self::Schedule(entries) => entries
				.iter()
				.flat_map(|entry| entry.occurrences(term))
				.collect(),
			Self::Exam(_) => Vec::new(),
		}
	}
}

/// Parse `text` as `kind`. Lines that don't fit are skipped.
#[must_use]
pub fn parse(kind: Kind, text: &str) -> Import {
	match kind {
		Kind::Schedule => Import::Schedule(parse_schedule(text)),
		Kind::Exam => Import::Exam(parse_exam(text)),
	}
}

/// Non-blank lines of `text` with their 1-based numbers, split on `\n`,
/// `\r\n` and lone `\r`.
pub fn lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
	text.lines()
		.flat_map(|line| line.split('\r'))
		.enumerate()
		.map(|(i, line)| (i + 1, line.trim()))
		.filter(|(_, line)| !line.is_empty())
}

pub(crate) fn parse_lines<T>(text: &str, kind: Kind) -> Vec<T>
where
	T: FromStr<Err = LineError>,
{
	let mut skipped = 0_usize;
	let entries = lines(text)
		.filter_map(|(number, line)| match line.parse() {
			Ok(entry) => Some(entry),
			Err(err) => {
				skipped += 1;
				tracing::warn!(%kind, line = number, text = line, "skipping line: {err}");
				None
			}
		})
		.collect::<Vec<T>>();

	tracing::debug!(%kind, parsed = entries.len(), skipped, "parsed pasted text");
	entries
}
