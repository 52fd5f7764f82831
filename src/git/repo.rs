use crate::error::{Result, StatError};
use crate::model::{CommitInfo, FileStats};
use crate::source::{CommitSource, RepoOpener, SourceCommit};
use chrono::{DateTime, FixedOffset};
use gix::object::tree::diff::ChangeDetached;
use gix::{ObjectId, Repository};
use similar::{ChangeTag, TextDiff};
use std::collections::{HashSet, VecDeque};
use std::path::Path;

pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Open the repository at exactly `path`; parent directories are not searched.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let requested = path.as_ref().to_path_buf();
        let repo = gix::open(&requested).map_err(|e| StatError::RepoOpen {
            path: requested.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self { repo })
    }

    /// Commit ids at `HEAD` and at every reference tip. References that do not peel to a
    /// commit (tags on trees or blobs) are skipped.
    fn tips(&self) -> Result<Vec<ObjectId>> {
        let mut tips = Vec::new();

        let mut head = self.repo.head()?;
        if !head.is_unborn() {
            tips.push(head.peel_to_commit_in_place()?.id);
        }

        let platform = self
            .repo
            .references()
            .map_err(|e| StatError::GitRepo(format!("Failed to read references: {e}")))?;
        let refs = platform
            .all()
            .map_err(|e| StatError::GitRepo(format!("Failed to list references: {e}")))?;
        for reference in refs {
            let mut reference =
                reference.map_err(|e| StatError::GitRepo(format!("Failed to read reference: {e}")))?;
            let name = reference.name().as_bstr().to_string();
            let id = reference
                .peel_to_id_in_place()
                .map_err(|e| StatError::GitRepo(format!("Failed to peel {name}: {e}")))?;
            let object = id
                .object()
                .map_err(|e| StatError::GitRepo(format!("Failed to read {name}: {e}")))?;
            if let Ok(commit) = object.try_into_commit() {
                tips.push(commit.id);
            }
        }

        Ok(tips)
    }

    fn commit_info(&self, commit_id: ObjectId, commit: &gix::Commit<'_>, parent_count: usize) -> Result<CommitInfo> {
        let author = commit.author()?;
        let time = author
            .time()
            .map_err(|e| StatError::InvalidDate(format!("Unparseable author time in {commit_id}: {e}")))?;
        let timestamp = DateTime::from_timestamp(time.seconds, 0)
            .ok_or_else(|| StatError::InvalidDate(format!("Invalid timestamp: {}", time.seconds)))?;
        let offset = FixedOffset::east_opt(time.offset)
            .ok_or_else(|| StatError::InvalidDate(format!("Invalid UTC offset: {}", time.offset)))?;

        Ok(CommitInfo {
            id: commit_id.to_string(),
            author_name: author.name.to_string(),
            author_email: author.email.to_string(),
            timestamp: timestamp.with_timezone(&offset),
            parent_count,
        })
    }

    fn compute_diff_stats(&self, commit_id: ObjectId, parent_id: Option<ObjectId>) -> Result<Vec<FileStats>> {
        let commit_tree = self.repo.find_commit(commit_id)?.tree()?;
        let changes: Vec<ChangeDetached> = match parent_id {
            Some(parent_id) => {
                let parent_tree = self.repo.find_commit(parent_id)?.tree()?;
                self.repo.diff_tree_to_tree(Some(&parent_tree), Some(&commit_tree), None)?
            }
            None => self.repo.diff_tree_to_tree(None, Some(&commit_tree), None)?,
        };

        let mut files = Vec::new();
        for change in changes {
            self.handle_change(change, &mut files)?;
        }
        Ok(files)
    }

    fn handle_change(&self, change: ChangeDetached, files: &mut Vec<FileStats>) -> Result<()> {
        match change {
            ChangeDetached::Addition { id, location, entry_mode, .. } => {
                if entry_mode.is_tree() {
                    return Ok(());
                }
                if let Ok(obj) = self.repo.find_object(id) {
                    if !is_binary_object(&obj) {
                        files.push(FileStats {
                            path: location.to_string(),
                            added_lines: count_lines(&obj),
                            deleted_lines: 0,
                        });
                    }
                }
            }
            ChangeDetached::Deletion { id, location, entry_mode, .. } => {
                if entry_mode.is_tree() {
                    return Ok(());
                }
                if let Ok(obj) = self.repo.find_object(id) {
                    if !is_binary_object(&obj) {
                        files.push(FileStats {
                            path: location.to_string(),
                            added_lines: 0,
                            deleted_lines: count_lines(&obj),
                        });
                    }
                }
            }
            ChangeDetached::Modification {
                previous_id,
                id,
                location,
                entry_mode,
                ..
            } => {
                if entry_mode.is_tree() {
                    return Ok(());
                }
                if let (Ok(old_obj), Ok(new_obj)) =
                    (self.repo.find_object(previous_id), self.repo.find_object(id))
                {
                    if !is_binary_object(&old_obj) && !is_binary_object(&new_obj) {
                        let (added, deleted) = line_diff(&old_obj, &new_obj);
                        files.push(FileStats {
                            path: location.to_string(),
                            added_lines: added,
                            deleted_lines: deleted,
                        });
                    }
                }
            }
            // Renames and copies count against the destination path only.
            ChangeDetached::Rewrite {
                source_id,
                id,
                location,
                entry_mode,
                ..
            } => {
                if entry_mode.is_tree() {
                    return Ok(());
                }
                if let (Ok(old_obj), Ok(new_obj)) =
                    (self.repo.find_object(source_id), self.repo.find_object(id))
                {
                    if !is_binary_object(&old_obj) && !is_binary_object(&new_obj) {
                        let (added, deleted) = line_diff(&old_obj, &new_obj);
                        files.push(FileStats {
                            path: location.to_string(),
                            added_lines: added,
                            deleted_lines: deleted,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

impl CommitSource for GitRepo {
    /// Walks everything reachable from `HEAD` or any reference, each commit once.
    fn for_each_commit(&self, visit: &mut dyn FnMut(&dyn SourceCommit) -> Result<()>) -> Result<()> {
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: VecDeque<ObjectId> = VecDeque::from(self.tips()?);

        while let Some(commit_id) = stack.pop_back() {
            if !seen.insert(commit_id) {
                continue;
            }

            let commit = self.repo.find_commit(commit_id)?;
            let parents: Vec<ObjectId> = commit.parent_ids().map(|id| id.into()).collect();
            let info = self.commit_info(commit_id, &commit, parents.len())?;

            visit(&GitCommit {
                repo: self,
                id: commit_id,
                first_parent: parents.first().copied(),
                info,
            })?;

            for pid in parents {
                stack.push_back(pid);
            }
        }

        Ok(())
    }
}

struct GitCommit<'r> {
    repo: &'r GitRepo,
    id: ObjectId,
    first_parent: Option<ObjectId>,
    info: CommitInfo,
}

impl SourceCommit for GitCommit<'_> {
    fn info(&self) -> &CommitInfo {
        &self.info
    }

    fn file_stats(&self) -> Result<Vec<FileStats>> {
        self.repo
            .compute_diff_stats(self.id, self.first_parent)
            .map_err(|e| StatError::CommitStats {
                commit: self.info.id.clone(),
                reason: e.to_string(),
            })
    }
}

/// Opens repositories with gix.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitOpener;

impl RepoOpener for GitOpener {
    type Source = GitRepo;

    fn open(&self, path: &Path) -> Result<GitRepo> {
        GitRepo::open(path)
    }
}

fn is_binary_object(object: &gix::Object<'_>) -> bool {
    object.data.as_slice().iter().take(8192).any(|&b| b == 0)
}

fn count_lines(object: &gix::Object<'_>) -> u32 {
    String::from_utf8_lossy(object.data.as_slice()).lines().count() as u32
}

fn line_diff(old_object: &gix::Object<'_>, new_object: &gix::Object<'_>) -> (u32, u32) {
    let old_text = String::from_utf8_lossy(old_object.data.as_slice());
    let new_text = String::from_utf8_lossy(new_object.data.as_slice());
    let diff = TextDiff::from_lines(old_text.as_ref(), new_text.as_ref());

    let (mut added, mut deleted) = (0u32, 0u32);
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => added += 1,
            ChangeTag::Delete => deleted += 1,
            ChangeTag::Equal => {}
        }
    }
    (added, deleted)
}
