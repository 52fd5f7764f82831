//! Input configuration: a JSON document, optionally overridden from the command line.

use crate::model::DateRange;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "input.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed configuration {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_path_to_error::Error<serde_json::Error>,
    },
    #[error("Invalid date '{0}': expected YYYY-MM-DD or RFC3339")]
    InvalidDate(String),
    #[error("Invalid range: since ({since}) is after until ({until})")]
    InvalidRange { since: String, until: String },
    #[error("Invalid path pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("maxAbs must not be negative, got {0}")]
    NegativeMaxAbs(i64),
    #[error("No repositories configured")]
    NoRepositories,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputConfig {
    pub repos: Vec<PathBuf>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub max_abs: Option<i64>,
    pub skip_merge: bool,
    pub pattern: Option<String>,
}

impl InputConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_path_to_error::Error<serde_json::Error>> {
        let de = &mut serde_json::Deserializer::from_str(text);
        serde_path_to_error::deserialize(de)
    }

    /// Validate and compile into the settings used by a run.
    pub fn resolve(self) -> Result<Settings, ConfigError> {
        if self.repos.is_empty() {
            return Err(ConfigError::NoRepositories);
        }

        let max_abs = self.max_abs.unwrap_or(i64::MAX);
        if max_abs < 0 {
            return Err(ConfigError::NegativeMaxAbs(max_abs));
        }

        let pattern_src = self.pattern.clone().unwrap_or_default();
        let pattern = Regex::new(&pattern_src)?;

        let range = resolve_range(self.since.as_deref(), self.until.as_deref())?;

        Ok(Settings {
            repos: self.repos,
            since: self.since,
            until: self.until,
            range,
            max_abs,
            skip_merge: self.skip_merge,
            pattern,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub repos: Vec<PathBuf>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub range: DateRange,
    pub max_abs: i64,
    pub skip_merge: bool,
    pub pattern: Regex,
}

pub fn resolve_range(since: Option<&str>, until: Option<&str>) -> Result<DateRange, ConfigError> {
    let since_dt = since.map(|s| parse_bound(s, Bound::Start)).transpose()?;
    let until_dt = until.map(|u| parse_bound(u, Bound::End)).transpose()?;

    if let (Some(s), Some(u)) = (since_dt, until_dt) {
        if s > u {
            return Err(ConfigError::InvalidRange {
                since: s.to_rfc3339(),
                until: u.to_rfc3339(),
            });
        }
    }

    let mut range = DateRange::new();
    if let Some(s) = since_dt {
        range = range.with_since(s);
    }
    if let Some(u) = until_dt {
        range = range.with_until(u);
    }
    Ok(range)
}

#[derive(Clone, Copy)]
enum Bound {
    Start,
    End,
}

fn parse_bound(input: &str, bound: Bound) -> Result<DateTime<Utc>, ConfigError> {
    // RFC3339
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    // YYYY-MM-DD, covering the whole day
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| ConfigError::InvalidDate(input.to_string()))?;
    let datetime = match bound {
        Bound::Start => date.and_hms_opt(0, 0, 0),
        Bound::End => date.and_hms_nano_opt(23, 59, 59, 999_999_999),
    }
    .ok_or_else(|| ConfigError::InvalidDate(input.to_string()))?;
    Ok(Utc.from_utc_datetime(&datetime))
}
