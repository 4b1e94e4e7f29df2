#![warn(clippy::pedantic)]

use chrono::NaiveDateTime;
use icalendar::{Calendar, CalendarDateTime, Component, Event, EventLike};

pub mod error;
pub mod exam;
pub mod import;
pub mod schedule;
pub mod subject;
pub mod term;

pub use error::{LineError, UnknownKind};
pub use exam::{parse_exam, ExamEntry};
pub use import::{parse, Import, Kind};
pub use schedule::{parse_schedule, parse_weeks, Day, ScheduleEntry, TimeRange, FIRST_WEEK};
pub use subject::{subjects_from_exams, subjects_from_schedule, Subject};
pub use term::{Occurrence, Term};

pub const TZ: chrono_tz::Tz = chrono_tz::Asia::Ho_Chi_Minh;

/// Calendar-wide settings for [`create_calendar`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarOptions {
	pub name: String,
	/// Minutes before each event to show a reminder; 0 disables it.
	pub reminder_minutes: u32,
}

impl Default for CalendarOptions {
	fn default() -> Self {
		Self {
			name: String::from("HCMUT"),
			reminder_minutes: 30,
		}
	}
}

fn local(date_time: NaiveDateTime) -> CalendarDateTime {
	CalendarDateTime::WithTimezone {
		date_time,
		tzid: TZ.name().to_string(),
	}
}

/// Runs of consecutive weeks as `(first week, length)`.
fn week_runs(weeks: &[u32]) -> Vec<(u32, u32)> {
	let mut weeks = weeks.to_vec();
	weeks.sort_unstable();
	weeks.dedup();

	let mut runs: Vec<(u32, u32)> = Vec::new();
	for week in weeks {
		match runs.last_mut() {
			Some((first, len)) if *first + *len == week => *len += 1,
			_ => runs.push((week, 1)),
		}
	}

	runs
}

fn add_reminder(event: &mut Event, options: &CalendarOptions) {
	if options.reminder_minutes > 0 {
		event.add_property(
			"VALARM",
			format!(
				"TRIGGER:-PT{}M;ACTION=DISPLAY;DESCRIPTION=Reminder",
				options.reminder_minutes
			),
		);
	}
}

fn schedule_events(calendar: &mut Calendar, entries: &[ScheduleEntry], term: &Term, options: &CalendarOptions) {
	for entry in entries {
		for (week, count) in week_runs(&entry.weeks) {
			let Some(date) = term.date_of(week, entry.day) else {
				tracing::warn!(subject = %entry.subject_code, week, "week falls before the term start, skipping");
				continue;
			};

			let mut event = Event::new();

			event
				.summary(&format!(
					"{} ({}) {}",
					entry.room, entry.group, entry.subject_name
				))
				.starts(local(date.and_time(entry.time.start)))
				.ends(local(date.and_time(entry.time.end)))
				.location(&format!("{}, {}", entry.room, entry.campus))
				.description(&format!(
					"Code: {} | Group: {} | Credits: {} | Semester: {}",
					entry.subject_code, entry.group, entry.credits, entry.semester
				));

			// repeat weekly for the rest of the run
			if count > 1 {
				event.add_property(
					"RRULE",
					rrule::RRule::new(rrule::Frequency::Weekly)
						.count(count)
						.to_string(),
				);
			}

			add_reminder(&mut event, options);
			calendar.push(event);
		}
	}
}

fn exam_events(calendar: &mut Calendar, entries: &[ExamEntry], options: &CalendarOptions) {
	for exam in entries {
		let (Some(start), Some(end)) = (exam.start(), exam.end()) else {
			tracing::warn!(
				subject = %exam.subject_code,
				date = %exam.exam_date,
				time = %exam.start_time,
				"exam date or time not recognised, skipping"
			);
			continue;
		};

		let mut event = Event::new();

		event
			.summary(&format!(
				"{} exam {} ({})",
				exam.exam_type, exam.subject_name, exam.subject_code
			))
			.starts(local(start))
			.ends(local(end))
			.location(&format!("{}, {}", exam.room, exam.campus))
			.description(&format!(
				"Group: {} | Duration: {} min | Semester: {}",
				exam.group_class, exam.duration_minutes, exam.semester
			));

		add_reminder(&mut event, options);
		calendar.push(event);
	}
}

#[must_use]
pub fn create_calendar(import: &Import, term: &Term, options: &CalendarOptions) -> Calendar {
	let mut calendar = Calendar::new();

	calendar.name(&options.name);
	calendar.timezone(TZ.name());

	match import {
		Import::Schedule(entries) => schedule_events(&mut calendar, entries, term, options),
		Import::Exam(entries) => exam_events(&mut calendar, entries, options),
	}

	tracing::debug!(kind = %import.kind(), entries = import.len(), "built calendar");
	calendar
}
