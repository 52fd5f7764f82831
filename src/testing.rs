//! In-memory repositories for unit tests.

use crate::error::{Result, StatError};
use crate::model::{CommitInfo, FileStats};
use crate::source::{CommitSource, RepoOpener, SourceCommit};
use chrono::{FixedOffset, TimeZone};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct MemoryCommit {
    pub info: CommitInfo,
    /// `None` simulates a diff that fails for this commit only.
    pub files: Option<Vec<FileStats>>,
}

impl SourceCommit for MemoryCommit {
    fn info(&self) -> &CommitInfo {
        &self.info
    }

    fn file_stats(&self) -> Result<Vec<FileStats>> {
        self.files.clone().ok_or_else(|| StatError::CommitStats {
            commit: self.info.id.clone(),
            reason: "diff unavailable".to_string(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryRepo {
    pub commits: Vec<MemoryCommit>,
    /// Fail the walk before visiting the commit at this index.
    pub fail_at: Option<usize>,
}

impl CommitSource for MemoryRepo {
    fn for_each_commit(&self, visit: &mut dyn FnMut(&dyn SourceCommit) -> Result<()>) -> Result<()> {
        for (idx, commit) in self.commits.iter().enumerate() {
            if self.fail_at == Some(idx) {
                return Err(StatError::GitRepo("corrupt object".to_string()));
            }
            visit(commit)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryOpener {
    pub repos: HashMap<PathBuf, MemoryRepo>,
}

impl MemoryOpener {
    pub fn with_repo(mut self, path: &str, repo: MemoryRepo) -> Self {
        self.repos.insert(PathBuf::from(path), repo);
        self
    }
}

impl RepoOpener for MemoryOpener {
    type Source = MemoryRepo;

    fn open(&self, path: &Path) -> Result<MemoryRepo> {
        self.repos.get(path).cloned().ok_or_else(|| StatError::RepoOpen {
            path: path.to_path_buf(),
            reason: "not a repository".to_string(),
        })
    }
}

pub fn file(path: &str, added: u32, deleted: u32) -> FileStats {
    FileStats {
        path: path.to_string(),
        added_lines: added,
        deleted_lines: deleted,
    }
}

/// A commit authored at noon UTC on the given day.
pub fn commit(email: &str, ymd: (i32, u32, u32), parents: usize, files: Vec<FileStats>) -> MemoryCommit {
    commit_at(email, ymd, 12, 0, parents, files)
}

pub fn commit_at(
    email: &str,
    (y, m, d): (i32, u32, u32),
    hour: u32,
    offset_hours: i32,
    parents: usize,
    files: Vec<FileStats>,
) -> MemoryCommit {
    let offset = FixedOffset::east_opt(offset_hours * 3600).unwrap();
    let timestamp = offset.with_ymd_and_hms(y, m, d, hour, 0, 0).unwrap();
    MemoryCommit {
        info: CommitInfo {
            id: format!("{email}-{y}{m:02}{d:02}{hour:02}-{}", files.len()),
            author_name: email.split('@').next().unwrap_or(email).to_string(),
            author_email: email.to_string(),
            timestamp,
            parent_count: parents,
        },
        files: Some(files),
    }
}
