#![warn(clippy::pedantic)]

use chrono::NaiveDate;
use tkb2ics_core::{CalendarOptions, Kind, Term};
use wasm_bindgen::{prelude::wasm_bindgen, JsError};

fn term(start: Option<String>) -> Result<Term, JsError> {
	Ok(match start {
		Some(start) => Term {
			start: start.parse::<NaiveDate>()?,
			..Term::default()
		},
		None => Term::default(),
	})
}

/// Calendar for a pasted timetable. `term_start` is the first day of week
/// 25 as `YYYY-MM-DD`.
#[wasm_bindgen]
pub fn schedule_to_ics(text: &str, term_start: Option<String>) -> Result<String, JsError> {
	let import = tkb2ics_core::parse(Kind::Schedule, text);
	let calendar = tkb2ics_core::create_calendar(&import, &term(term_start)?, &CalendarOptions::default());

	Ok(calendar.to_string())
}

#[wasm_bindgen]
#[must_use]
pub fn exam_to_ics(text: &str) -> String {
	let import = tkb2ics_core::parse(Kind::Exam, text);
	let calendar = tkb2ics_core::create_calendar(&import, &Term::default(), &CalendarOptions::default());

	calendar.to_string()
}

/// Parsed entries as JSON, `kind` being `schedule` or `exam`.
#[wasm_bindgen]
pub fn parse_to_json(kind: &str, text: &str) -> Result<String, JsError> {
	let import = tkb2ics_core::parse(kind.parse()?, text);

	Ok(serde_json::to_string(&import)?)
}
