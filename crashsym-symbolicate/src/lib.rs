//! Symbolication of crash reports against debug-symbol bundles.
//!
//! The [`Symbolicator`] runs the whole pipeline over a report's text:
//!
//!  1. parse the report metadata ([`crashsym_report::CrashReport`]),
//!  2. locate the debug artifact and verify its identity against the
//!     report's binary image ([`verify_image`]) — a mismatch aborts the run
//!     before any resolution is attempted,
//!  3. extract the backtrace frames of every thread,
//!  4. resolve the frames' addresses in one batch per artifact
//!     ([`resolve_frames`]),
//!  5. rewrite the report, substituting symbol text for the original
//!     address and description of each resolved frame
//!     ([`rewrite_report`]).
//!
//! The pipeline is synchronous and builds all state fresh per run. The
//! external primitives it depends on are abstracted by the [`DebugTools`]
//! trait; [`CommandDebugTools`] implements them with the platform debug
//! toolchain.
//!
//! This module is part of the `crashsym` crate.

#![warn(missing_docs)]

mod error;
mod resolve;
mod rewrite;
mod tools;
mod verify;

pub use crate::error::*;
pub use crate::resolve::*;
pub use crate::rewrite::*;
pub use crate::tools::*;
pub use crate::verify::*;

use std::collections::BTreeMap;
use std::path::PathBuf;

use crashsym_common::DSymPathExt;
use crashsym_report::{backtrace, CrashReport, Scanner};

/// Configuration for a symbolication run.
///
/// Passed explicitly into the pipeline; components never read configuration
/// from ambient state.
#[derive(Clone, Debug, Default)]
pub struct SymbolicateOptions {
    /// The debug-symbol bundle: either a `.dSYM` directory or a direct path
    /// to the debug artifact.
    pub dsym_path: Option<PathBuf>,
    /// Directories probed for `<executable>.dSYM` when no explicit bundle
    /// path is given.
    pub search_paths: Vec<PathBuf>,
}

/// The crash-report symbolication pipeline.
pub struct Symbolicator<T> {
    options: SymbolicateOptions,
    tools: T,
}

impl<T: DebugTools> Symbolicator<T> {
    /// Creates a symbolicator with the given options and tool primitives.
    pub fn new(options: SymbolicateOptions, tools: T) -> Self {
        Symbolicator { options, tools }
    }

    /// Symbolicates a crash report, returning the rewritten text.
    ///
    /// All non-address content is preserved byte for byte. Fatal conditions
    /// (missing report fields, identity mismatch) yield an error and no
    /// output; an unresolvable artifact merely leaves its frames unchanged.
    pub fn process(&self, text: &str) -> Result<String, SymbolicateError> {
        let report = CrashReport::parse(text)?;
        tracing::debug!(
            "report version {} for {} ({}) on {}",
            report.report_version,
            report.bundle_id,
            report.arch,
            report.os_version.version,
        );

        let artifact = self.locate_artifact(&report)?;
        let image = report.target_image();
        verify_image(&self.tools, &artifact, image.arch, image.debug_id)?;

        let scanner = Scanner::new(text);
        let frames = backtrace::all_frames(&scanner, &report.images);

        let mut artifacts = BTreeMap::new();
        artifacts.insert(report.bundle_id.clone(), artifact);
        let resolved = resolve_frames(&self.tools, &artifacts, &report.images, frames);

        Ok(rewrite_report(text, &resolved))
    }

    /// Determines the debug artifact for the report's executable.
    ///
    /// An explicit `.dSYM` directory is resolved to its contained artifact;
    /// any other explicit path is used as the artifact directly. Without an
    /// explicit path, each search directory is probed for
    /// `<executable>.dSYM` by naming convention (full bundle discovery is a
    /// collaborator's job, not this crate's).
    fn locate_artifact(&self, report: &CrashReport<'_>) -> Result<PathBuf, SymbolicateError> {
        if let Some(path) = &self.options.dsym_path {
            if path.is_dsym_dir() {
                return path
                    .resolve_dsym()
                    .ok_or_else(|| SymbolicateError::ArtifactNotFound(path.clone()));
            }
            return Ok(path.clone());
        }

        for dir in &self.options.search_paths {
            let candidate = dir.join(format!("{}.dSYM", report.executable));
            if let Some(artifact) = candidate.resolve_dsym() {
                tracing::debug!("found debug bundle at {}", candidate.display());
                return Ok(artifact);
            }
        }

        Err(SymbolicateError::NoSymbols(report.executable.clone()))
    }
}
