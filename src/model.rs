use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone)]
pub struct CommitInfo {
    pub id: String,
    pub author_name: String,
    pub author_email: String,
    /// Author time, carrying the author's recorded UTC offset.
    pub timestamp: DateTime<FixedOffset>,
    pub parent_count: usize,
}

impl CommitInfo {
    pub fn is_merge(&self) -> bool {
        self.parent_count > 1
    }

    /// Calendar day of the commit in the author's own time zone.
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStats {
    pub path: String,
    pub added_lines: u32,
    pub deleted_lines: u32,
}

/// Raw, unclamped sums for one author on one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DaySum {
    pub addition: i64,
    pub deletion: i64,
    pub modification: i64,
    pub commit_count: i64,
}

impl DaySum {
    pub fn add_commit(&mut self) {
        self.commit_count += 1;
    }

    /// Modification is accumulated per file, never derived from the day totals.
    pub fn add_file(&mut self, stats: &FileStats) {
        let added = i64::from(stats.added_lines);
        let deleted = i64::from(stats.deleted_lines);
        self.addition += added;
        self.deletion += deleted;
        self.modification += added - deleted;
    }
}

impl AddAssign for DaySum {
    fn add_assign(&mut self, other: Self) {
        self.addition += other.addition;
        self.deletion += other.deletion;
        self.modification += other.modification;
        self.commit_count += other.commit_count;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub email: String,
    pub addition: i64,
    pub deletion: i64,
    pub modification: i64,
    pub commit_count: i64,
    pub day_count: i64,
    pub add_per_day: i64,
    pub mod_per_day: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repositories: Vec<String>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub max_abs: i64,
    pub skip_merge: bool,
    pub pattern: String,
    pub rows: Vec<SummaryRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new() -> Self {
        Self { since: None, until: None }
    }

    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn with_until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    pub fn contains<Tz: chrono::TimeZone>(&self, timestamp: &DateTime<Tz>) -> bool {
        let timestamp = timestamp.with_timezone(&Utc);
        if let Some(since) = self.since {
            if timestamp < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if timestamp > until {
                return false;
            }
        }
        true
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn day_sum_keeps_per_file_modification() {
        let mut sum = DaySum::default();
        sum.add_file(&FileStats { path: "a.rs".into(), added_lines: 10, deleted_lines: 2 });
        sum.add_file(&FileStats { path: "b.rs".into(), added_lines: 0, deleted_lines: 5 });
        assert_eq!(sum.addition, 10);
        assert_eq!(sum.deletion, 7);
        assert_eq!(sum.modification, 8 - 5);
        assert_eq!(sum.commit_count, 0);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let since = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let until = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        let range = DateRange::new().with_since(since).with_until(until);

        assert!(range.contains(&since));
        assert!(range.contains(&until));
        assert!(!range.contains(&(since - chrono::Duration::seconds(1))));
        assert!(!range.contains(&(until + chrono::Duration::seconds(1))));
    }

    #[test]
    fn range_compares_instants_across_offsets() {
        let since = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let range = DateRange::new().with_since(since);
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        // 2024-01-01 08:00 in Tokyo is still 2023-12-31 in UTC
        let early = tokyo.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        assert!(!range.contains(&early));
        assert!(DateRange::default().contains(&early));
    }
}
