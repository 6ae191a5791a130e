//! Pipeline module tying sources, crawler, extraction and sinks together
//!
//! This module handles:
//! - Resolving the mode flags to exactly one `Mode`
//! - The fixed recipe per mode (visited record, discovery, extraction)
//! - Running a mode end to end and reporting its summary

mod mode;
mod runner;

pub use mode::{InvalidModeError, Mode, ModeFlags, Recipe, VisitedFile};
pub use runner::{ensure_progress, Pipeline};
