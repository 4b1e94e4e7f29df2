use thiserror::Error;

/// Why a pasted line was left out of a parse result.
///
/// This never escapes the batch parsers; each skipped line is logged with
/// its reason instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
	#[error("line does not match the timetable layout")]
	Layout,

	#[error("unknown weekday token `{0}`")]
	Day(String),

	#[error("invalid time range `{0}`")]
	Time(String),

	#[error("no active week in `{0}`")]
	NoWeeks(String),

	#[error("expected at least {expected} fields, found {found}")]
	TooFewFields { expected: usize, found: usize },

	#[error("subject field `{0}` is not CODE-NAME")]
	Subject(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown import kind `{0}`, expected `schedule` or `exam`")]
pub struct UnknownKind(pub String);
