use super::filter::CommitEvent;
use crate::model::DaySum;
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub type AuthorMap = BTreeMap<NaiveDate, DaySum>;

/// Running, unclamped sums keyed by author email, then by calendar day.
///
/// Buckets are created lazily, so an author or day only exists once a commit contributed to it.
/// Sorted maps keep iteration in byte-wise email order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accumulator {
    authors: BTreeMap<String, AuthorMap>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, event: &CommitEvent) {
        let sum = self
            .authors
            .entry(event.author_email.clone())
            .or_default()
            .entry(event.day)
            .or_default();

        sum.add_commit();
        for file in &event.files {
            sum.add_file(file);
        }
    }

    /// Elementwise addition of every day bucket in `other`. Taking `other` by value keeps the
    /// merge free of any concurrent access to it.
    pub fn merge(&mut self, other: Accumulator) {
        for (email, days) in other.authors {
            let mine = self.authors.entry(email).or_default();
            for (day, sum) in days {
                *mine.entry(day).or_default() += sum;
            }
        }
    }

    pub fn authors(&self) -> impl Iterator<Item = (&str, &AuthorMap)> {
        self.authors.iter().map(|(email, days)| (email.as_str(), days))
    }

    pub fn day(&self, email: &str, day: NaiveDate) -> Option<&DaySum> {
        self.authors.get(email).and_then(|days| days.get(&day))
    }

    pub fn author_count(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }
}
