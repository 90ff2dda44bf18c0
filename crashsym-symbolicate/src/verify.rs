//! Verification that a debug artifact matches a crash report's binary image.

use std::path::Path;

use crashsym_common::{Arch, DebugId};

use crate::error::SymbolicateError;
use crate::tools::DebugTools;

/// Verifies that `artifact` belongs to the same build as the crash report's
/// binary image.
///
/// Three checks, in order: the artifact exists on disk, it contains a slice
/// for `arch`, and its unique identifier for that slice equals `expected`.
/// Identifier comparison is by parsed value, so hex case never matters.
/// There is no fuzzy match; any deviation is an error carrying both the
/// expected and the actual identifier.
pub fn verify_image(
    tools: &dyn DebugTools,
    artifact: &Path,
    arch: Arch,
    expected: DebugId,
) -> Result<(), SymbolicateError> {
    if !artifact.exists() {
        return Err(SymbolicateError::ArtifactNotFound(artifact.to_path_buf()));
    }

    if !tools.has_architecture(artifact, arch)? {
        return Err(SymbolicateError::MissingArchitecture {
            path: artifact.to_path_buf(),
            arch,
        });
    }

    let actual = tools.read_debug_id(artifact, arch)?;
    if actual != Some(expected) {
        return Err(SymbolicateError::DebugIdMismatch {
            path: artifact.to_path_buf(),
            expected,
            actual,
        });
    }

    tracing::debug!(
        "verified {} against {}",
        artifact.display(),
        expected
    );
    Ok(())
}
