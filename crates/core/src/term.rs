use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::schedule::{Day, FIRST_WEEK};

/// Anchor of the academic calendar: `start` is the first day of week
/// `first_week`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
	pub start: NaiveDate,
	pub first_week: u32,
}

impl Default for Term {
	/// Summer term 2025, week 25 starting Monday 16/6/2025.
	fn default() -> Self {
		Self {
			start: NaiveDate::from_ymd_opt(2025, 6, 16).expect("valid term start"),
			first_week: FIRST_WEEK,
		}
	}
}

/// A single dated class meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
	pub subject_code: String,
	pub week: u32,
	pub start: NaiveDateTime,
	pub end: NaiveDateTime,
}

impl Term {
	#[must_use]
	pub fn new(start: NaiveDate, first_week: u32) -> Self {
		Self { start, first_week }
	}

	fn week_start(&self, week: u32) -> Option<NaiveDate> {
		let offset = week.checked_sub(self.first_week)?;
		self.start
			.checked_add_days(Days::new(u64::from(offset) * 7))
	}

	/// First date on or after the start of `week` that falls on `day`.
	#[must_use]
	pub fn date_of(&self, week: u32, day: Day) -> Option<NaiveDate> {
		let week_start = self.week_start(week)?;
		let current = week_start.weekday().num_days_from_monday();
		let target = day.weekday().num_days_from_monday();

		// figure out how many days to add to get to the correct weekday
		let days_to_add = if current > target {
			7 - current + target
		} else {
			target - current
		};

		week_start.checked_add_days(Days::new(u64::from(days_to_add)))
	}

	/// The seven consecutive dates making up `week`.
	#[must_use]
	pub fn week_dates(&self, week: u32) -> Option<[NaiveDate; 7]> {
		let first = self.week_start(week)?;
		let mut dates = [first; 7];

		for (days, date) in (0..).zip(dates.iter_mut()) {
			*date = first.checked_add_days(Days::new(days))?;
		}

		Some(dates)
	}

	/// Academic week containing `date`, if it is not before the term.
	#[must_use]
	pub fn week_of(&self, date: NaiveDate) -> Option<u32> {
		let days = (date - self.start).num_days();
		if days < 0 {
			return None;
		}

		u32::try_from(days / 7)
			.ok()
			.and_then(|offset| offset.checked_add(self.first_week))
	}
}
