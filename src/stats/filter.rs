use crate::model::{CommitInfo, DateRange, FileStats};
use crate::source::SourceCommit;
use crate::util::files_matching;
use chrono::NaiveDate;
use regex::Regex;

/// An in-scope commit paired with the diff stats of the paths that matched the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitEvent {
    pub author_email: String,
    pub day: NaiveDate,
    pub files: Vec<FileStats>,
}

/// Decides commit scope and contributing paths. Immutable once built, so one instance is
/// shared by every worker.
#[derive(Debug, Clone)]
pub struct CommitFilter {
    range: DateRange,
    skip_merge: bool,
    pattern: Regex,
}

impl CommitFilter {
    pub fn new(range: DateRange, skip_merge: bool, pattern: Regex) -> Self {
        Self { range, skip_merge, pattern }
    }

    pub fn accepts(&self, info: &CommitInfo) -> bool {
        if !self.range.contains(&info.timestamp) {
            return false;
        }
        !(self.skip_merge && info.is_merge())
    }

    pub fn matching_files(&self, files: &[FileStats]) -> Vec<FileStats> {
        files_matching(files, &self.pattern).cloned().collect()
    }

    /// `None` when the commit is out of scope. An accepted commit always yields an event,
    /// even when no path matched or its diff could not be computed.
    pub fn commit_event(&self, commit: &dyn SourceCommit) -> Option<CommitEvent> {
        let info = commit.info();
        if !self.accepts(info) {
            return None;
        }

        let files = match commit.file_stats() {
            Ok(files) => self.matching_files(&files),
            Err(e) => {
                tracing::debug!(commit = %info.id, error = %e, "counting commit without line stats");
                Vec::new()
            }
        };

        Some(CommitEvent {
            author_email: info.author_email.clone(),
            day: info.day(),
            files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::resolve_range;
    use crate::testing::{commit, commit_at, file};

    fn filter(since: &str, until: &str, skip_merge: bool, pattern: &str) -> CommitFilter {
        CommitFilter::new(
            resolve_range(Some(since), Some(until)).unwrap(),
            skip_merge,
            Regex::new(pattern).unwrap(),
        )
    }

    #[test]
    fn rejects_commits_outside_window() {
        let f = filter("2024-01-01", "2024-01-31", false, "");
        assert!(f.commit_event(&commit("a@x.com", (2023, 12, 31), 1, vec![])).is_none());
        assert!(f.commit_event(&commit("a@x.com", (2024, 2, 1), 1, vec![])).is_none());
        assert!(f.commit_event(&commit("a@x.com", (2024, 1, 31), 1, vec![])).is_some());
    }

    #[test]
    fn merge_policy_only_applies_when_enabled() {
        let merge = commit("a@x.com", (2024, 1, 10), 2, vec![file("a.rs", 1, 0)]);
        assert!(filter("2024-01-01", "2024-01-31", true, "").commit_event(&merge).is_none());
        assert!(filter("2024-01-01", "2024-01-31", false, "").commit_event(&merge).is_some());

        let root = commit("a@x.com", (2024, 1, 10), 0, vec![]);
        assert!(filter("2024-01-01", "2024-01-31", true, "").commit_event(&root).is_some());
    }

    #[test]
    fn keeps_only_matching_paths() {
        let f = filter("2024-01-01", "2024-01-31", false, r"\.rs$");
        let c = commit(
            "a@x.com",
            (2024, 1, 10),
            1,
            vec![file("src/lib.rs", 10, 2), file("docs/guide.md", 100, 0)],
        );
        let event = f.commit_event(&c).unwrap();
        assert_eq!(event.files, vec![file("src/lib.rs", 10, 2)]);
        assert_eq!(event.author_email, "a@x.com");
    }

    #[test]
    fn accepted_commit_without_matches_is_still_an_event() {
        let f = filter("2024-01-01", "2024-01-31", false, r"\.rs$");
        let c = commit("a@x.com", (2024, 1, 10), 1, vec![file("notes.txt", 3, 0)]);
        let event = f.commit_event(&c).unwrap();
        assert!(event.files.is_empty());
    }

    #[test]
    fn failed_diff_keeps_the_commit_event() {
        let f = filter("2024-01-01", "2024-01-31", false, "");
        let mut c = commit("a@x.com", (2024, 1, 10), 1, vec![]);
        c.files = None;
        let event = f.commit_event(&c).unwrap();
        assert!(event.files.is_empty());
    }

    #[test]
    fn day_follows_author_time_zone() {
        let f = filter("2024-01-01", "2024-01-31", false, "");
        // 23:00 at UTC-05:00 is already the next day in UTC
        let c = commit_at("a@x.com", (2024, 1, 10), 23, -5, 1, vec![]);
        let event = f.commit_event(&c).unwrap();
        assert_eq!(event.day, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    }
}
