//! Output module for run reporting
//!
//! This module handles:
//! - Counting what a run fetched, extracted, skipped and failed
//! - Printing the end-of-run summary
//! - Writing an optional markdown summary

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_summary, write_markdown_summary};
pub use stats::{print_summary, RunSummary};
