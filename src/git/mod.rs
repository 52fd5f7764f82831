pub mod repo;

pub use repo::{GitOpener, GitRepo};
