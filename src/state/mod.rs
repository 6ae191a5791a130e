//! State module for tracking progress across runs
//!
//! # Components
//!
//! - `VisitedSet`: durable, append-only record of processed URLs and PDFs
//! - `FailureLog`: append-only log of fetch and extraction failures

mod failure_log;
mod visited;

pub use failure_log::FailureLog;
pub use visited::VisitedSet;
pub(crate) use visited::open_list_for_append;
