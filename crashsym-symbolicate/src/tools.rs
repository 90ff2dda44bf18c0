//! External debug-tool primitives.
//!
//! Probing a debug artifact for architecture slices, extracting its unique
//! identifier and resolving addresses to symbols are delegated to external
//! collaborators. This module fixes their interface as the [`DebugTools`]
//! trait and provides [`CommandDebugTools`], which shells out to the
//! platform toolchain (`lipo`, `dwarfdump`, `atos`).

use std::path::Path;
use std::process::{Command, ExitStatus};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crashsym_common::{Arch, DebugId};

/// A `dwarfdump --uuid` output line, e.g.
/// `UUID: C0DEA7AB-1234-5678-9ABC-DEF012345678 (x86_64) /path/to/binary`.
static DWARFDUMP_UUID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^UUID:\s*([0-9a-fA-F-]+)\s*\(([^)]+)\)").unwrap());

/// An error returned when invoking an external debug tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool binary could not be launched.
    #[error("failed to launch {tool}")]
    Launch {
        /// The tool that failed to start.
        tool: &'static str,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but exited with a failure status.
    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        /// The tool that failed.
        tool: &'static str,
        /// The exit status.
        status: ExitStatus,
        /// Captured standard error output.
        stderr: String,
    },

    /// The resolver returned fewer or more lines than addresses requested.
    #[error("resolver returned {actual} lines for {expected} addresses")]
    TruncatedOutput {
        /// The number of addresses requested.
        expected: usize,
        /// The number of lines returned.
        actual: usize,
    },
}

/// The external primitives required for symbolication.
///
/// Implementations are expected to be blocking. The one correctness contract
/// is positional alignment in [`resolve_addresses`]: the result must contain
/// exactly one line per input address, in input order. Addresses the
/// implementation cannot resolve are echoed back as-is, which callers detect
/// by the leading digit of the echoed address.
///
/// [`resolve_addresses`]: DebugTools::resolve_addresses
pub trait DebugTools {
    /// Returns whether the artifact contains a slice for the architecture.
    fn has_architecture(&self, artifact: &Path, arch: Arch) -> Result<bool, ToolError>;

    /// Extracts the artifact's unique identifier for the given architecture.
    ///
    /// Returns `None` when the identifier cannot be determined.
    fn read_debug_id(&self, artifact: &Path, arch: Arch) -> Result<Option<DebugId>, ToolError>;

    /// Resolves an ordered batch of addresses against the artifact.
    ///
    /// `load_address` is the base address the image was mapped at in the
    /// crashed process, verbatim from the report.
    fn resolve_addresses(
        &self,
        artifact: &Path,
        arch: Arch,
        load_address: &str,
        addresses: &[&str],
    ) -> Result<Vec<String>, ToolError>;
}

/// [`DebugTools`] backed by the platform debug toolchain.
#[derive(Clone, Copy, Debug, Default)]
pub struct CommandDebugTools;

impl DebugTools for CommandDebugTools {
    fn has_architecture(&self, artifact: &Path, arch: Arch) -> Result<bool, ToolError> {
        let mut command = Command::new("lipo");
        command.arg("-info").arg(artifact);
        let output = run("lipo", &mut command)?;

        // `Architectures in the fat file: <path> are: x86_64 arm64` or
        // `Non-fat file: <path> is architecture: x86_64`
        let archs = output.rsplit(':').next().unwrap_or("");
        Ok(archs.split_whitespace().any(|token| token == arch.name()))
    }

    fn read_debug_id(&self, artifact: &Path, arch: Arch) -> Result<Option<DebugId>, ToolError> {
        let mut command = Command::new("dwarfdump");
        command.arg("--uuid").arg(artifact);
        let output = run("dwarfdump", &mut command)?;

        for line in output.lines() {
            if let Some(captures) = DWARFDUMP_UUID.captures(line.trim()) {
                if captures[2].parse::<Arch>().ok() == Some(arch) {
                    return Ok(captures[1].parse().ok());
                }
            }
        }

        Ok(None)
    }

    fn resolve_addresses(
        &self,
        artifact: &Path,
        arch: Arch,
        load_address: &str,
        addresses: &[&str],
    ) -> Result<Vec<String>, ToolError> {
        let mut command = Command::new("atos");
        command
            .arg("-o")
            .arg(artifact)
            .arg("-arch")
            .arg(arch.name())
            .arg("-l")
            .arg(load_address)
            .args(addresses);

        let output = run("atos", &mut command)?;
        let lines: Vec<String> = output.lines().map(str::to_string).collect();
        if lines.len() != addresses.len() {
            return Err(ToolError::TruncatedOutput {
                expected: addresses.len(),
                actual: lines.len(),
            });
        }

        Ok(lines)
    }
}

/// Runs a command and captures its standard output.
fn run(tool: &'static str, command: &mut Command) -> Result<String, ToolError> {
    let output = command
        .output()
        .map_err(|source| ToolError::Launch { tool, source })?;

    if !output.status.success() {
        return Err(ToolError::Failed {
            tool,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dwarfdump_uuid_line() {
        let captures = DWARFDUMP_UUID
            .captures("UUID: C0DEA7AB-1234-5678-9ABC-DEF012345678 (x86_64) /bin/App")
            .unwrap();
        assert_eq!(&captures[2], "x86_64");
        assert_eq!(
            captures[1].parse::<DebugId>().unwrap(),
            "c0dea7ab-1234-5678-9abc-def012345678".parse().unwrap()
        );
    }
}
