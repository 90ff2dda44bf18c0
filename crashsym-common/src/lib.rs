//! Common functionality for `crashsym`.
//!
//! This crate exposes the leaf types shared by the crash-report parsing and
//! symbolication crates:
//!
//!  - [`Arch`]: CPU architectures as they appear in crash reports and debug
//!    artifacts, including the `Code Type` spellings of report producers.
//!  - [`DSymPathExt`]: Path utilities for locating the debug artifact inside
//!    a `.dSYM` bundle directory.
//!  - Re-exports of [`DebugId`](debugid::DebugId) and friends, the
//!    content-derived unique identifiers used to match a crash report's
//!    binary image to its debug-symbol artifact.
//!
//! This module is part of the `crashsym` crate.

#![warn(missing_docs)]

mod path;
mod types;

pub use crate::path::*;
pub use crate::types::*;

pub use debugid::*;
