use super::accumulator::{Accumulator, AuthorMap};
use crate::model::SummaryRow;
use crate::util::clamp_abs;

/// One row per author, ordered by email. Each day's addition, deletion and modification is
/// clamped to `[-max_abs, max_abs]` before it is added to the author's totals; commit counts
/// are summed as-is.
pub fn summarize(acc: &Accumulator, max_abs: i64) -> Vec<SummaryRow> {
    acc.authors()
        .map(|(email, days)| summarize_author(email, days, max_abs))
        .collect()
}

pub fn summarize_author(email: &str, days: &AuthorMap, max_abs: i64) -> SummaryRow {
    let mut row = SummaryRow {
        email: email.to_string(),
        addition: 0,
        deletion: 0,
        modification: 0,
        commit_count: 0,
        day_count: 0,
        add_per_day: 0,
        mod_per_day: 0,
    };

    for sum in days.values() {
        row.addition += clamp_abs(sum.addition, max_abs);
        row.deletion += clamp_abs(sum.deletion, max_abs);
        row.modification += clamp_abs(sum.modification, max_abs);
        row.commit_count += sum.commit_count;
        row.day_count += 1;
    }

    row.add_per_day = per_day(row.addition, row.day_count);
    row.mod_per_day = per_day(row.modification, row.day_count);
    row
}

// Truncates toward zero.
fn per_day(total: i64, day_count: i64) -> i64 {
    if day_count == 0 {
        0
    } else {
        total / day_count
    }
}
