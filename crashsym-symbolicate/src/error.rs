use std::path::PathBuf;

use thiserror::Error;

use crashsym_common::{Arch, DebugId};
use crashsym_report::ReportError;

use crate::tools::ToolError;

/// Errors aborting a symbolication run.
///
/// Any of these conditions stops the run before a rewritten report is
/// produced; partial or potentially incorrect output is never emitted.
#[derive(Debug, Error)]
pub enum SymbolicateError {
    /// The crash report is missing a field required for symbolication.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// No debug-symbol artifact was found for the target executable.
    #[error("no debug-symbol bundle found for {0}")]
    NoSymbols(String),

    /// The supplied debug artifact does not exist on disk.
    #[error("debug artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    /// The debug artifact has no slice for the report's architecture.
    #[error("no {arch} slice in {}", .path.display())]
    MissingArchitecture {
        /// The artifact that was probed.
        path: PathBuf,
        /// The architecture recorded in the crash report.
        arch: Arch,
    },

    /// The artifact's unique identifier does not match the crash report's.
    ///
    /// Proceeding would risk emitting wrong symbol names silently, so this
    /// is always fatal.
    #[error(
        "debug identifier mismatch for {}: report has {expected}, artifact has {}",
        .path.display(),
        .actual.map(|id| id.to_string()).unwrap_or_else(|| "none".to_string())
    )]
    DebugIdMismatch {
        /// The artifact that was verified.
        path: PathBuf,
        /// The identifier recorded in the crash report.
        expected: DebugId,
        /// The identifier extracted from the artifact, if any.
        actual: Option<DebugId>,
    },

    /// An external debug tool failed during verification.
    #[error(transparent)]
    Tool(#[from] ToolError),
}
