pub mod accumulator;
pub mod coordinator;
pub mod exec;
pub mod filter;
pub mod summary;

pub use accumulator::{Accumulator, AuthorMap};
pub use coordinator::{aggregate, aggregate_sequential};
pub use exec::exec;
pub use filter::{CommitEvent, CommitFilter};
pub use summary::{summarize, summarize_author};
