use std::{fmt, str::FromStr, sync::OnceLock};

use chrono::{NaiveTime, Weekday};
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::{
	error::LineError,
	import::{parse_lines, Kind},
	term::{Occurrence, Term},
};

/// Week number of the first slot in the week-presence field.
pub const FIRST_WEEK: u32 = 25;

/// Weekday as written by the portal: `2` is Monday through `7` for
/// Saturday, and `CN` (chủ nhật) for Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Day {
	Monday,
	Tuesday,
	Wednesday,
	Thursday,
	Friday,
	Saturday,
	Sunday,
}

const DAYS: [Day; 7] = [
	Day::Monday,
	Day::Tuesday,
	Day::Wednesday,
	Day::Thursday,
	Day::Friday,
	Day::Saturday,
	Day::Sunday,
];

const TOKENS: [&str; 7] = ["2", "3", "4", "5", "6", "7", "CN"];

impl Day {
	/// Day number stored alongside lessons, `2..=8` with Sunday as 8.
	#[must_use]
	pub fn number(self) -> u8 {
		self as u8 + 2
	}

	#[must_use]
	pub fn weekday(self) -> Weekday {
		match self {
			Self::Monday => Weekday::Mon,
			Self::Tuesday => Weekday::Tue,
			Self::Wednesday => Weekday::Wed,
			Self::Thursday => Weekday::Thu,
			Self::Friday => Weekday::Fri,
			Self::Saturday => Weekday::Sat,
			Self::Sunday => Weekday::Sun,
		}
	}
}

impl fmt::Display for Day {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(TOKENS[*self as usize])
	}
}

impl FromStr for Day {
	type Err = LineError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		TOKENS
			.iter()
			.position(|&token| token == s)
			.map(|i| DAYS[i])
			.ok_or_else(|| LineError::Day(s.to_string()))
	}
}

impl Serialize for Day {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

/// Start and end of a class on the day it meets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
	pub start: NaiveTime,
	pub end: NaiveTime,
}

pub(crate) fn parse_time(s: &str) -> Option<NaiveTime> {
	NaiveTime::parse_from_str(s.trim(), "%H:%M").ok()
}

impl fmt::Display for TimeRange {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(
			f,
			"{} - {}",
			self.start.format("%H:%M"),
			self.end.format("%H:%M")
		)
	}
}

impl FromStr for TimeRange {
	type Err = LineError;

	// H:MM - H:MM
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let invalid = || LineError::Time(s.to_string());
		let (start, end) = s.split_once('-').ok_or_else(invalid)?;
		let start = parse_time(start).ok_or_else(invalid)?;
		let end = parse_time(end).ok_or_else(invalid)?;

		if end <= start {
			return Err(invalid());
		}

		Ok(Self { start, end })
	}
}

impl Serialize for TimeRange {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

/// One row of a pasted timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
	pub semester: String,
	pub subject_code: String,
	pub subject_name: String,
	pub credits: u32,
	pub tuition_credits: u32,
	pub group: String,
	pub day: Day,
	pub time: TimeRange,
	pub room: String,
	pub campus: String,
	pub weeks: Vec<u32>,
}

/// Active weeks of a pipe-delimited presence field. Slot `i` stands for
/// week `i + FIRST_WEEK`; empty and `--` slots are inactive.
#[must_use]
pub fn parse_weeks(field: &str) -> Vec<u32> {
	field
		.split('|')
		.zip(FIRST_WEEK..)
		.filter(|(slot, _)| {
			let slot = slot.trim();
			!slot.is_empty() && slot != "--"
		})
		.map(|(_, week)| week)
		.collect()
}

impl FromStr for ScheduleEntry {
	type Err = LineError;

	fn from_str(line: &str) -> Result<Self, Self::Err> {
		// semester, code, name, credits, tuition credits, group, day,
		// optional periods, time range, room, campus, weeks
		const RE: &str = r"^\*\*(\d+)\*\*\s*([A-Z]+\d+)\s*(\D+?)\s*(\d+)\s*(\d+)\s+(\S+)\s+(\S+)\s+(?:[\d-]+\s+)?(\d{1,2}:\d{2}\s*-\s*\d{1,2}:\d{2})\s*(.*?)\s*(BK[^|]*)\|(.*)$";
		static REGEX: OnceLock<Regex> = OnceLock::new();
		let re = REGEX.get_or_init(|| Regex::new(RE).unwrap());

		let captures = re.captures(line.trim()).ok_or(LineError::Layout)?;

		let day = captures[7].parse()?;
		let time = captures[8].parse()?;
		let weeks = parse_weeks(&captures[11]);

		if weeks.is_empty() {
			return Err(LineError::NoWeeks(captures[11].to_string()));
		}

		Ok(Self {
			semester: captures[1].to_string(),
			subject_code: captures[2].to_string(),
			subject_name: captures[3].trim().to_string(),
			credits: captures[4].parse().unwrap_or_default(),
			tuition_credits: captures[5].parse().unwrap_or_default(),
			group: captures[6].to_string(),
			day,
			time,
			room: captures[9].trim().to_string(),
			campus: captures[10].trim().to_string(),
			weeks,
		})
	}
}

impl ScheduleEntry {
	/// Dated meetings of this entry, one per active week.
	#[must_use]
	pub fn occurrences(&self, term: &Term) -> Vec<Occurrence> {
		self.weeks
			.iter()
			.filter_map(|&week| {
				let Some(date) = term.date_of(week, self.day) else {
					tracing::warn!(
						subject = %self.subject_code,
						week,
						first_week = term.first_week,
						"week falls before the term start, skipping"
					);
					return None;
				};

				Some(Occurrence {
					subject_code: self.subject_code.clone(),
					week,
					start: date.and_time(self.time.start),
					end: date.and_time(self.time.end),
				})
			})
			.collect()
	}
}

/// Parse every timetable line in `text`, dropping the ones that don't fit.
#[must_use]
pub fn parse_schedule(text: &str) -> Vec<ScheduleEntry> {
	parse_lines(text, Kind::Schedule)
}

#[cfg(test)]
mod tests {
	use chrono::NaiveDate;

	use super::*;

	const SAMPLE: &str =
		"**251**CO1234Lập trình1 2 2 7 2 07:00 - 09:50H1-101BK-LTK|--|x|x|--|--|--|--|--|--";

	#[test]
	fn parses_portal_line() {
		let entry: ScheduleEntry = SAMPLE.parse().unwrap();

		assert_eq!(entry.semester, "251");
		assert_eq!(entry.subject_code, "CO1234");
		assert_eq!(entry.subject_name, "Lập trình");
		assert_eq!(entry.credits, 1);
		assert_eq!(entry.tuition_credits, 2);
		assert_eq!(entry.group, "2");
		assert_eq!(entry.day, Day::Saturday);
		assert_eq!(entry.time.to_string(), "07:00 - 09:50");
		assert_eq!(entry.room, "H1-101");
		assert_eq!(entry.campus, "BK-LTK");
		assert_eq!(entry.weeks, vec![26, 27]);
	}

	#[test]
	fn parses_line_without_periods() {
		let line = "**20251**MT1003 Giải tích\t4 4 L01 CN 7:00 - 9:50 B4-302 BK-DAn|x|x|x";
		let entry: ScheduleEntry = line.parse().unwrap();

		assert_eq!(entry.semester, "20251");
		assert_eq!(entry.subject_code, "MT1003");
		assert_eq!(entry.subject_name, "Giải tích");
		assert_eq!(entry.group, "L01");
		assert_eq!(entry.day, Day::Sunday);
		assert_eq!(entry.time.to_string(), "07:00 - 09:50");
		assert_eq!(entry.room, "B4-302");
		assert_eq!(entry.campus, "BK-DAn");
		assert_eq!(entry.weeks, vec![25, 26, 27]);
	}

	#[test]
	fn all_dash_weeks_are_dropped() {
		let line = "**251**CO1234Lập trình1 2 2 7 2 07:00 - 09:50H1-101BK-LTK|--|--|--";
		assert_eq!(
			line.parse::<ScheduleEntry>(),
			Err(LineError::NoWeeks("--|--|--".to_string()))
		);
		assert!(parse_schedule(line).is_empty());
	}

	#[test]
	fn empty_week_field_is_dropped() {
		let line = "**251**CO1234Lập trình1 2 2 7 2 07:00 - 09:50H1-101BK-LTK|";
		assert!(matches!(
			line.parse::<ScheduleEntry>(),
			Err(LineError::NoWeeks(_))
		));
	}

	#[test]
	fn unknown_day_is_rejected() {
		let line = "**251**CO1234Lập trình1 2 L01 8 07:00 - 09:50H1-101BK-LTK|x";
		assert_eq!(
			line.parse::<ScheduleEntry>(),
			Err(LineError::Day("8".to_string()))
		);
	}

	#[test]
	fn backwards_time_is_rejected() {
		let line = "**251**CO1234Lập trình1 2 L01 2 09:50 - 07:00H1-101BK-LTK|x";
		assert!(matches!(
			line.parse::<ScheduleEntry>(),
			Err(LineError::Time(_))
		));
	}

	#[test]
	fn line_without_campus_is_rejected() {
		let line = "**251**CO1234Lập trình1 2 L01 2 07:00 - 09:50H1-101|x";
		assert_eq!(line.parse::<ScheduleEntry>(), Err(LineError::Layout));
	}

	#[test]
	fn weeks_follow_slot_positions() {
		assert_eq!(parse_weeks("x|--|x| |x"), vec![25, 27, 29]);
		assert_eq!(parse_weeks("--|x|x|--|"), vec![26, 27]);
		assert!(parse_weeks("").is_empty());
		assert!(parse_weeks("--|--").is_empty());
	}

	#[test]
	fn day_tokens_round_trip() {
		for token in TOKENS {
			assert_eq!(token.parse::<Day>().unwrap().to_string(), token);
		}
		assert_eq!(Day::Monday.number(), 2);
		assert_eq!(Day::Sunday.number(), 8);
		assert_eq!(Day::Sunday.weekday(), Weekday::Sun);
		assert!("1".parse::<Day>().is_err());
	}

	#[test]
	fn blank_input_is_empty() {
		assert!(parse_schedule("").is_empty());
		assert!(parse_schedule("   ").is_empty());
		assert!(parse_schedule("\r\n\n  \r").is_empty());
	}

	#[test]
	fn bad_lines_do_not_stop_the_batch() {
		let text = format!("{SAMPLE}\r\ngarbage\n\n{SAMPLE}\rstill garbage");
		let entries = parse_schedule(&text);

		assert_eq!(entries.len(), 2);
		assert_eq!(entries[0], entries[1]);
	}

	#[test]
	fn occurrences_land_on_the_class_day() {
		let entry: ScheduleEntry = SAMPLE.parse().unwrap();
		let occurrences = entry.occurrences(&Term::default());

		assert_eq!(occurrences.len(), 2);
		assert_eq!(occurrences[0].week, 26);
		assert_eq!(
			occurrences[0].start,
			NaiveDate::from_ymd_opt(2025, 6, 28)
				.unwrap()
				.and_hms_opt(7, 0, 0)
				.unwrap()
		);
		assert_eq!(
			occurrences[1].end,
			NaiveDate::from_ymd_opt(2025, 7, 5)
				.unwrap()
				.and_hms_opt(9, 50, 0)
				.unwrap()
		);
	}
}
