use crate::model::FileStats;
use regex::Regex;
use std::time::Duration;

pub fn files_matching<'a>(
    files: &'a [FileStats],
    pattern: &'a Regex,
) -> impl Iterator<Item = &'a FileStats> + 'a {
    files.iter().filter(move |fs| pattern.is_match(&fs.path))
}

/// Millisecond-precision duration for log output.
pub fn elapsed_display(elapsed: Duration) -> String {
    let millis = Duration::from_millis(elapsed.as_millis() as u64);
    humantime::format_duration(millis).to_string()
}

/// Clamp `value` into the symmetric range `[-max_abs, max_abs]`.
pub fn clamp_abs(value: i64, max_abs: i64) -> i64 {
    value.min(max_abs).max(-max_abs)
}
