pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod logging;
pub mod model;
pub mod report;
pub mod source;
pub mod stats;
pub mod util;

#[cfg(test)]
pub(crate) mod testing;
