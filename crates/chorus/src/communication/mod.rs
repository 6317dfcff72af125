//! Task and result-channel plumbing between submission and execution.

mod pill;
mod task;

pub(crate) use pill::Pill;
pub(crate) use task::Task;
pub use task::TaskResult;
