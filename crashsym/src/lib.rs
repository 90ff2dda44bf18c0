//! Crashsym is a library to symbolicate textual crash reports: it resolves
//! the raw return addresses in a report's thread backtraces into
//! human-readable function, file and line descriptions using a supplied
//! debug-symbol bundle, and rewrites the report text in place, preserving
//! all non-address content byte for byte.
//!
//! # What's in the package
//!
//! Crashsym provides the following functionality:
//!
//! - Tolerant, section-oriented parsing of crash report text
//!   - labeled single-line fields and multi-line sections
//!   - typed report metadata: version, bundle identifier, architecture,
//!     OS version, binary image table entries
//!   - per-thread backtrace frame extraction
//! - Identity verification between a report's binary image and a
//!   debug-symbol artifact, by architecture and content-derived unique
//!   identifier — a mismatch always fails rather than emitting wrong names
//! - Batched address-to-symbol resolution with positional alignment
//!   guarantees, behind a trait so resolver backends can be swapped
//! - Report rewriting by exact-substring substitution in a single pass
//!
//! # Usage
//!
//! Add `crashsym` as a dependency to your `Cargo.toml`:
//!
//! ```text
//! use crashsym::symbolicate::{CommandDebugTools, SymbolicateOptions, Symbolicator};
//!
//! let options = SymbolicateOptions {
//!     dsym_path: Some("Example.app.dSYM".into()),
//!     search_paths: Vec::new(),
//! };
//!
//! let symbolicator = Symbolicator::new(options, CommandDebugTools);
//! let rewritten = symbolicator.process(&report_text)?;
//! ```

#![warn(missing_docs)]

#[doc(inline)]
pub use crashsym_common as common;
#[doc(inline)]
pub use crashsym_report as report;
#[doc(inline)]
pub use crashsym_symbolicate as symbolicate;
