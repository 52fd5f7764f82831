use super::accumulator::Accumulator;
use super::filter::CommitFilter;
use crate::error::Result;
use crate::source::{CommitSource, RepoOpener, SourceCommit};
use crate::util::elapsed_display;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Analyse every repository on its own thread, then merge the per-repository accumulators
/// on the calling thread.
///
/// A repository that cannot be opened contributes nothing. Any other error is returned once
/// every worker has finished; there is no cancellation, so a hung walk blocks the whole call.
pub fn aggregate<O: RepoOpener>(
    opener: &O,
    repos: &[PathBuf],
    filter: &CommitFilter,
    progress: Option<&MultiProgress>,
) -> Result<Accumulator> {
    let (tx, rx) = mpsc::channel::<(&Path, Result<Accumulator>)>();

    thread::scope(|scope| {
        for repo in repos {
            let tx = tx.clone();
            let bar = progress.map(|mp| spinner(mp, repo));
            scope.spawn(move || {
                let outcome = run_worker(opener, repo, filter, bar.as_ref());
                // The receiver outlives the scope.
                let _ = tx.send((repo.as_path(), outcome));
            });
        }
    });
    drop(tx);

    let mut merged = Accumulator::new();
    let mut fatal = None;
    for (repo, outcome) in rx {
        match outcome {
            Ok(acc) => merged.merge(acc),
            Err(e) => {
                error!(repo = %repo.display(), error = %e, "Repository traversal failed");
                fatal.get_or_insert(e);
            }
        }
    }

    match fatal {
        Some(e) => Err(e),
        None => Ok(merged),
    }
}

/// Single-threaded equivalent of [`aggregate`] that fills one accumulator for all repositories.
pub fn aggregate_sequential<O: RepoOpener>(
    opener: &O,
    repos: &[PathBuf],
    filter: &CommitFilter,
) -> Result<Accumulator> {
    let mut acc = Accumulator::new();
    for repo in repos {
        analyse_repo(opener, repo, filter, &mut acc, None)?;
    }
    Ok(acc)
}

fn run_worker<O: RepoOpener>(
    opener: &O,
    repo: &Path,
    filter: &CommitFilter,
    bar: Option<&ProgressBar>,
) -> Result<Accumulator> {
    let mut acc = Accumulator::new();
    analyse_repo(opener, repo, filter, &mut acc, bar)?;
    Ok(acc)
}

fn analyse_repo<O: RepoOpener>(
    opener: &O,
    repo: &Path,
    filter: &CommitFilter,
    acc: &mut Accumulator,
    bar: Option<&ProgressBar>,
) -> Result<()> {
    let start = Instant::now();

    let source = match opener.open(repo) {
        Ok(source) => source,
        Err(e) => {
            warn!(repo = %repo.display(), error = %e, "Open repo failed, skipping");
            if let Some(pb) = bar {
                pb.finish_with_message("open failed");
            }
            return Ok(());
        }
    };
    info!(repo = %repo.display(), "Opened repository");

    let mut visited = 0u64;
    let mut in_scope = 0u64;
    source.for_each_commit(&mut |commit: &dyn SourceCommit| {
        visited += 1;
        if let Some(event) = filter.commit_event(commit) {
            in_scope += 1;
            acc.append(&event);
        }
        if let Some(pb) = bar {
            pb.inc(1);
        }
        Ok(())
    })?;

    info!(
        repo = %repo.display(),
        commits = visited,
        in_scope,
        elapsed = %elapsed_display(start.elapsed()),
        "Analysed repository"
    );
    if let Some(pb) = bar {
        pb.finish_with_message("done");
    }
    Ok(())
}

fn spinner(mp: &MultiProgress, repo: &Path) -> ProgressBar {
    let pb = mp.add(ProgressBar::new_spinner());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix} {msg} ({pos} commits)")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_prefix(repo.display().to_string());
    pb.set_message("Collecting commits...");
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
