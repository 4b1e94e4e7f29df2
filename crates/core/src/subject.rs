use std::collections::HashSet;

use serde::Serialize;

use crate::{exam::ExamEntry, schedule::ScheduleEntry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
	pub code: String,
	pub name: String,
	pub credits: u32,
	pub tuition_credits: u32,
}

impl From<&ScheduleEntry> for Subject {
	fn from(entry: &ScheduleEntry) -> Self {
		Self {
			code: entry.subject_code.clone(),
			name: entry.subject_name.clone(),
			credits: entry.credits,
			tuition_credits: entry.tuition_credits,
		}
	}
}

// exam listings don't carry credits
impl From<&ExamEntry> for Subject {
	fn from(entry: &ExamEntry) -> Self {
		Self {
			code: entry.subject_code.clone(),
			name: entry.subject_name.clone(),
			credits: 0,
			tuition_credits: 0,
		}
	}
}

fn unique_by_code(subjects: impl Iterator<Item = Subject>) -> Vec<Subject> {
	let mut seen = HashSet::new();
	subjects
		.filter(|subject| seen.insert(subject.code.clone()))
		.collect()
}

/// Subjects referenced by `entries`, one per code. The first entry seen
/// for a code wins.
#[must_use]
pub fn subjects_from_schedule(entries: &[ScheduleEntry]) -> Vec<Subject> {
	unique_by_code(entries.iter().map(Subject::from))
}

#[must_use]
pub fn subjects_from_exams(entries: &[ExamEntry]) -> Vec<Subject> {
	unique_by_code(entries.iter().map(Subject::from))
}
