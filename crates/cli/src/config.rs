use std::{
	fs, io,
	path::{Path, PathBuf},
	str::FromStr,
};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tkb2ics_core::{CalendarOptions, Term};

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read config file at {}", .path.display())]
	Read {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("failed to parse config file at {}", .path.display())]
	Parse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},
}

/// On-disk configuration, every key optional:
///
/// ```toml
/// [term]
/// start = "2025-06-16"
/// first_week = 25
///
/// [calendar]
/// name = "HCMUT"
/// reminder_minutes = 30
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
	term: TermSection,
	calendar: CalendarSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TermSection {
	start: Option<NaiveDate>,
	first_week: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CalendarSection {
	name: Option<String>,
	reminder_minutes: Option<u32>,
}

impl FromStr for ConfigFile {
	type Err = toml::de::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		toml::from_str(s)
	}
}

impl ConfigFile {
	#[tracing::instrument]
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		fs::read_to_string(path)
			.map_err(|source| ConfigError::Read {
				path: path.to_path_buf(),
				source,
			})?
			.parse()
			.map_err(|source| ConfigError::Parse {
				path: path.to_path_buf(),
				source,
			})
	}
}

/// Values given on the command line or through the environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct Overrides {
	pub term_start: Option<NaiveDate>,
	pub first_week: Option<u32>,
}

/// Effective settings: overrides, then the config file, then defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
	pub term: Term,
	pub calendar: CalendarOptions,
}

impl Settings {
	pub fn resolve(path: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
		let file = match path {
			Some(path) => ConfigFile::load(path)?,
			None => ConfigFile::default(),
		};

		Ok(Self::merge(file, overrides))
	}

	fn merge(file: ConfigFile, overrides: Overrides) -> Self {
		let term = Term::default();
		let calendar = CalendarOptions::default();

		Self {
			term: Term::new(
				overrides.term_start.or(file.term.start).unwrap_or(term.start),
				overrides
					.first_week
					.or(file.term.first_week)
					.unwrap_or(term.first_week),
			),
			calendar: CalendarOptions {
				name: file.calendar.name.unwrap_or(calendar.name),
				reminder_minutes: file
					.calendar
					.reminder_minutes
					.unwrap_or(calendar.reminder_minutes),
			},
		}
	}
}
