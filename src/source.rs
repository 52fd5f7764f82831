//! Capabilities consumed by the aggregation pipeline: something that opens a repository
//! path and something that enumerates its commits.

use crate::error::Result;
use crate::model::{CommitInfo, FileStats};
use std::path::Path;

pub trait SourceCommit {
    fn info(&self) -> &CommitInfo;

    /// Per-path line counts. Computed on demand and may fail for a single commit.
    fn file_stats(&self) -> Result<Vec<FileStats>>;
}

pub trait CommitSource {
    /// Visit every commit once. An error from `visit` or from the walk itself stops the walk.
    fn for_each_commit(&self, visit: &mut dyn FnMut(&dyn SourceCommit) -> Result<()>) -> Result<()>;
}

/// Opens repositories from worker threads. Shared read-only by every worker.
pub trait RepoOpener: Sync {
    type Source: CommitSource;

    fn open(&self, path: &Path) -> Result<Self::Source>;
}
