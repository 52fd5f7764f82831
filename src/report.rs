use crate::config::Settings;
use crate::model::{ReportOutput, SummaryRow, SCHEMA_VERSION};
use chrono::Utc;
use console::style;
use std::io::{self, Write};

const HEADERS: [&str; 8] = [
    "Email", "Add", "Delete", "Modify", "Commits", "Days", "Add/Day", "Modify/Day",
];

pub fn output_json<W: Write>(rows: &[SummaryRow], settings: &Settings, out: &mut W) -> anyhow::Result<()> {
    let output = ReportOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repositories: settings
            .repos
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect(),
        since: settings.since.clone(),
        until: settings.until.clone(),
        max_abs: settings.max_abs,
        skip_merge: settings.skip_merge,
        pattern: settings.pattern.as_str().to_string(),
        rows: rows.to_vec(),
    };

    writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

pub fn output_ndjson<W: Write>(rows: &[SummaryRow], out: &mut W) -> anyhow::Result<()> {
    for row in rows {
        writeln!(out, "{}", serde_json::to_string(row)?)?;
    }
    Ok(())
}

pub fn output_table<W: Write>(rows: &[SummaryRow], out: &mut W) -> io::Result<()> {
    if rows.is_empty() {
        writeln!(out, "No data to display")?;
        return Ok(());
    }

    let cells: Vec<[String; 8]> = rows.iter().map(row_cells).collect();
    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (h, w))| style(pad(h, w, i == 0)).bold().to_string())
        .collect();
    writeln!(out, "{}", header.join("  "))?;
    writeln!(out, "{}", "─".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)))?;

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (cell, w))| pad(cell, w, i == 0))
            .collect();
        writeln!(out, "{}", line.join("  "))?;
    }
    Ok(())
}

fn row_cells(row: &SummaryRow) -> [String; 8] {
    [
        row.email.clone(),
        row.addition.to_string(),
        row.deletion.to_string(),
        row.modification.to_string(),
        row.commit_count.to_string(),
        row.day_count.to_string(),
        row.add_per_day.to_string(),
        row.mod_per_day.to_string(),
    ]
}

// Email left-aligned, numbers right-aligned.
fn pad(cell: &str, width: usize, left: bool) -> String {
    if left {
        format!("{cell:<width$}")
    } else {
        format!("{cell:>width$}")
    }
}
