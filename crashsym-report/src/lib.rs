//! Parsing for textual crash reports.
//!
//! Crash reports are loosely formatted diagnostic dumps without a formal
//! schema. This crate extracts structure from them in three layers:
//!
//!  - [`Scanner`]: locates labeled single-line and multi-line sections.
//!  - [`CrashReport`]: the typed report metadata (version, bundle
//!    identifier, architecture, OS version, binary image table entry).
//!  - [`backtrace`]: per-thread stack frame extraction, keyed by the exact
//!    original text to be replaced during symbolication.
//!
//! Parsing is tolerant by design: malformed backtrace lines and sections are
//! skipped, while fields required for symbolication produce a
//! [`ReportError`] identifying what is missing.
//!
//! This module is part of the `crashsym` crate.

#![warn(missing_docs)]

pub mod backtrace;

mod error;
mod report;
mod scanner;

pub use crate::backtrace::Frame;
pub use crate::error::*;
pub use crate::report::*;
pub use crate::scanner::*;
