use super::{aggregate, summarize, CommitFilter};
use crate::cli::Cli;
use crate::git::GitOpener;
use crate::logging::{default_level, setup_logger};
use crate::report::{output_json, output_ndjson, output_table};
use anyhow::Context;
use indicatif::{MultiProgress, ProgressDrawTarget};
use std::io::Write;

pub fn exec(cli: Cli) -> anyhow::Result<()> {
    setup_logger(default_level(cli.verbose, cli.quiet));

    let input = cli.input_config().context("Failed to load configuration")?;
    tracing::debug!(config = ?input, "Loaded configuration");
    let settings = input.resolve().context("Invalid configuration")?;

    let filter = CommitFilter::new(settings.range.clone(), settings.skip_merge, settings.pattern.clone());

    // Disable progress indicators for machine-readable output
    let progress = (!cli.no_progress && !cli.json && !cli.ndjson)
        .then(|| MultiProgress::with_draw_target(ProgressDrawTarget::stderr()));

    let merged = aggregate(&GitOpener, &settings.repos, &filter, progress.as_ref())
        .context("Failed to aggregate repository statistics")?;
    if let Some(mp) = &progress {
        mp.clear().ok();
    }

    let rows = summarize(&merged, settings.max_abs);
    tracing::debug!(authors = rows.len(), "Summarised authors");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        output_json(&rows, &settings, &mut out)?;
    } else if cli.ndjson {
        output_ndjson(&rows, &mut out)?;
    } else {
        output_table(&rows, &mut out)?;
    }
    out.flush()?;

    Ok(())
}
