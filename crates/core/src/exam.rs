use std::{str::FromStr, sync::OnceLock};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::Serialize;

use crate::{
	error::LineError,
	import::{parse_lines, Kind},
	schedule::parse_time,
};

const FIELDS: usize = 10;

const DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y"];

/// One row of a pasted exam timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamEntry {
	pub semester: String,
	pub subject_code: String,
	pub subject_name: String,
	pub group_class: String,
	pub exam_date: String,
	pub exam_type: String,
	pub campus: String,
	pub room: String,
	pub day_of_week: u32,
	pub start_time: String,
	pub duration_minutes: u32,
}

fn split_subject(field: &str) -> Option<(String, String)> {
	const RE: &str = r"^([A-Z0-9]+)\s*-\s*(.+)$";
	static REGEX: OnceLock<Regex> = OnceLock::new();
	let re = REGEX.get_or_init(|| Regex::new(RE).unwrap());

	let captures = re.captures(field)?;
	Some((
		captures[1].trim().to_string(),
		captures[2].trim().to_string(),
	))
}

/// Leading digit run of `field`, or 0 when there is none.
fn leading_int(field: &str, name: &'static str) -> u32 {
	let end = field
		.find(|c: char| !c.is_ascii_digit())
		.unwrap_or(field.len());

	field[..end].parse().unwrap_or_else(|_| {
		tracing::warn!(field, name, "not a number, using 0");
		0
	})
}

impl FromStr for ExamEntry {
	type Err = LineError;

	fn from_str(line: &str) -> Result<Self, Self::Err> {
		let fields = line.split_whitespace().collect::<Vec<_>>();
		if fields.len() < FIELDS {
			return Err(LineError::TooFewFields {
				expected: FIELDS,
				found: fields.len(),
			});
		}

		let (subject_code, subject_name) =
			split_subject(fields[1]).ok_or_else(|| LineError::Subject(fields[1].to_string()))?;

		Ok(Self {
			semester: fields[0].to_string(),
			subject_code,
			subject_name,
			group_class: fields[2].to_string(),
			exam_date: fields[3].to_string(),
			exam_type: fields[4].to_string(),
			campus: fields[5].to_string(),
			room: fields[6].to_string(),
			day_of_week: leading_int(fields[7], "day of week"),
			start_time: fields[8].to_string(),
			duration_minutes: leading_int(fields[9], "duration"),
		})
	}
}

impl ExamEntry {
	/// `exam_date` as a calendar date, accepting `dd/mm/yyyy` and ISO dates.
	#[must_use]
	pub fn date(&self) -> Option<NaiveDate> {
		DATE_FORMATS
			.iter()
			.find_map(|format| NaiveDate::parse_from_str(&self.exam_date, format).ok())
	}

	#[must_use]
	pub fn start(&self) -> Option<NaiveDateTime> {
		Some(self.date()?.and_time(parse_time(&self.start_time)?))
	}

	#[must_use]
	pub fn end(&self) -> Option<NaiveDateTime> {
		Some(self.start()? + Duration::minutes(i64::from(self.duration_minutes)))
	}
}

/// Parse every exam line in `text`, dropping the ones that don't fit.
#[must_use]
pub fn parse_exam(text: &str) -> Vec<ExamEntry> {
	parse_lines(text, Kind::Exam)
}
