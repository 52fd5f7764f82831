use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StatError>;

#[derive(Error, Debug)]
pub enum StatError {
    #[error("Failed to open repository {}: {reason}", path.display())]
    RepoOpen { path: PathBuf, reason: String },
    #[error("Failed to compute stats for commit {commit}: {reason}")]
    CommitStats { commit: String, reason: String },
    #[error("Git repository error: {0}")]
    GitRepo(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Head peel error: {0}")]
    HeadPeel(#[from] Box<gix::head::peel::to_commit::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
    #[error("Diff tree to tree error: {0}")]
    DiffTreeToTree(#[from] Box<gix::repository::diff_tree_to_tree::Error>),
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::object::commit::Error> for StatError {
    fn from(err: gix::object::commit::Error) -> Self {
        StatError::Commit(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for StatError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        StatError::RefFind(Box::new(err))
    }
}

impl From<gix::head::peel::to_commit::Error> for StatError {
    fn from(err: gix::head::peel::to_commit::Error) -> Self {
        StatError::HeadPeel(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for StatError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        StatError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for StatError {
    fn from(err: gix::objs::decode::Error) -> Self {
        StatError::ObjectDecode(Box::new(err))
    }
}

impl From<gix::repository::diff_tree_to_tree::Error> for StatError {
    fn from(err: gix::repository::diff_tree_to_tree::Error) -> Self {
        StatError::DiffTreeToTree(Box::new(err))
    }
}
