//! Typed metadata extracted from a crash report.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crashsym_common::{Arch, DebugId};

use crate::error::{ReportError, ReportErrorKind};
use crate::scanner::Scanner;

/// The first decimal run in a field's content.
static INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// `OS Version` formats, in decreasing order of specificity.
///
/// Example: `Mac OS X 10.13.6 (Build 17G65)`, `Mac OS X 10.13.6 (17G65)` or
/// a bare `Mac OS X 10.13.6`. The first matching pattern wins.
static OS_VERSION_FORMATS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"^(?P<version>.+?)\s+\(Build\s+(?P<build>[^)]+)\)").unwrap(),
        Regex::new(r"^(?P<version>.+?)\s+\((?P<build>[^)]+)\)").unwrap(),
        Regex::new(r"^(?P<version>\S.*?)\s*$").unwrap(),
    ]
});

/// The angle-bracketed unique identifier in a binary image line.
static IMAGE_DEBUG_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<([^>]+)>").unwrap());

/// The leading load address of a binary image line.
static IMAGE_LOAD_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"0x[0-9a-fA-F]+").unwrap());

/// The operating system version recorded in a crash report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OsVersion {
    /// The version string, including the OS name (e.g. `"Mac OS X 10.13.6"`).
    pub version: String,
    /// The build identifier, if the report carries one.
    pub build: Option<String>,
}

/// A binary image loaded by the crashed process, as recorded in the report's
/// `Binary Images` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRecord {
    /// The bundle identifier of the image.
    pub bundle_id: String,
    /// The content-derived unique identifier of the built binary.
    pub debug_id: DebugId,
    /// The architecture the process ran as.
    pub arch: Arch,
    /// The load address, verbatim from the report (hex, `0x`-prefixed).
    pub load_address: String,
}

/// A parsed crash report.
///
/// Borrows the original report text; parsing never mutates it. The rewritten
/// output produced at the end of symbolication is a new buffer.
#[derive(Clone, Debug)]
pub struct CrashReport<'d> {
    text: &'d str,
    /// The report-format version marker.
    pub report_version: u32,
    /// The bundle identifier of the target binary.
    pub bundle_id: String,
    /// The executable name of the target binary.
    pub executable: String,
    /// The process architecture.
    pub arch: Arch,
    /// The OS version and build the process ran on.
    pub os_version: OsVersion,
    /// Binary images with supplied symbols, keyed by bundle identifier.
    ///
    /// Currently holds exactly one entry, the target bundle's own image.
    pub images: BTreeMap<String, ImageRecord>,
}

impl<'d> CrashReport<'d> {
    /// Parses the metadata of a crash report.
    ///
    /// All extracted fields are required for symbolication; any missing or
    /// unrecognized field yields an error identifying it.
    pub fn parse(text: &'d str) -> Result<Self, ReportError> {
        let scanner = Scanner::new(text);

        let report_version = scanner
            .section("Report Version")
            .and_then(|content| INTEGER.find(content))
            .and_then(|m| m.as_str().parse().ok())
            .ok_or(ReportErrorKind::MissingReportVersion)?;

        let bundle_id = preferred_field(&scanner, "PlugIn Identifier", "Identifier")
            .map(last_path_component)
            .ok_or(ReportErrorKind::MissingIdentifier)?;

        let executable = preferred_field(&scanner, "PlugIn Path", "Path")
            .map(last_path_component)
            .ok_or(ReportErrorKind::MissingExecutable)?;

        let arch = scanner
            .section("Code Type")
            .and_then(|content| content.split_whitespace().next())
            .ok_or(ReportErrorKind::UnknownCodeType)?
            .parse::<Arch>()
            .map_err(|e| ReportError::new(ReportErrorKind::UnknownCodeType, e))?;

        let os_version = scanner
            .section("OS Version")
            .and_then(parse_os_version)
            .ok_or(ReportErrorKind::MissingOsVersion)?;

        let image = find_image(&scanner, &bundle_id, arch)?;
        let mut images = BTreeMap::new();
        images.insert(bundle_id.clone(), image);

        Ok(CrashReport {
            text,
            report_version,
            bundle_id,
            executable,
            arch,
            os_version,
            images,
        })
    }

    /// Returns the original report text.
    pub fn text(&self) -> &'d str {
        self.text
    }

    /// Returns the image record of the target bundle.
    pub fn target_image(&self) -> &ImageRecord {
        // the constructor always inserts the target bundle
        &self.images[&self.bundle_id]
    }
}

/// Returns the first non-empty content of `preferred`, falling back to `fallback`.
fn preferred_field<'d>(scanner: &Scanner<'d>, preferred: &str, fallback: &str) -> Option<&'d str> {
    scanner
        .section(preferred)
        .filter(|content| !content.is_empty())
        .or_else(|| scanner.section(fallback).filter(|content| !content.is_empty()))
}

/// Returns the last path component of a field value.
fn last_path_component(value: &str) -> String {
    value.rsplit('/').next().unwrap_or(value).to_string()
}

fn parse_os_version(content: &str) -> Option<OsVersion> {
    OS_VERSION_FORMATS.iter().find_map(|format| {
        let captures = format.captures(content)?;
        Some(OsVersion {
            version: captures["version"].to_string(),
            build: captures.name("build").map(|m| m.as_str().to_string()),
        })
    })
}

/// Locates the target bundle's entry in the `Binary Images` table.
fn find_image(
    scanner: &Scanner<'_>,
    bundle_id: &str,
    arch: Arch,
) -> Result<ImageRecord, ReportError> {
    let table = scanner
        .section_block("Binary Images")
        .ok_or(ReportErrorKind::MissingBinaryImage)?;

    let line = table
        .lines()
        .find(|line| line.contains(bundle_id))
        .ok_or(ReportErrorKind::MissingBinaryImage)?;

    let debug_id = IMAGE_DEBUG_ID
        .captures(line)
        .ok_or(ReportErrorKind::MissingDebugId)?[1]
        .parse::<DebugId>()
        .map_err(|e| ReportError::new(ReportErrorKind::MissingDebugId, e))?;

    let load_address = IMAGE_LOAD_ADDRESS
        .find(line)
        .ok_or(ReportErrorKind::MissingBinaryImage)?
        .as_str()
        .to_string();

    Ok(ImageRecord {
        bundle_id: bundle_id.to_string(),
        debug_id,
        arch,
        load_address,
    })
}
