use std::error::Error;
use std::fmt;

use thiserror::Error;

/// Errors related to parsing a crash report.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportErrorKind {
    /// The report does not carry a `Report Version` marker.
    MissingReportVersion,

    /// Neither `PlugIn Identifier` nor `Identifier` is present.
    MissingIdentifier,

    /// Neither `PlugIn Path` nor `Path` is present.
    MissingExecutable,

    /// The `Code Type` field is missing or names an unknown architecture.
    UnknownCodeType,

    /// The `OS Version` field is missing or does not match any known format.
    MissingOsVersion,

    /// The `Binary Images` section has no entry for the target bundle.
    MissingBinaryImage,

    /// The target bundle's image entry carries no unique identifier.
    MissingDebugId,
}

impl fmt::Display for ReportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingReportVersion => write!(f, "missing report version"),
            Self::MissingIdentifier => write!(f, "missing bundle identifier"),
            Self::MissingExecutable => write!(f, "missing executable path"),
            Self::UnknownCodeType => write!(f, "unrecognized code type"),
            Self::MissingOsVersion => write!(f, "missing or malformed OS version"),
            Self::MissingBinaryImage => write!(f, "no binary image entry for the target bundle"),
            Self::MissingDebugId => write!(f, "binary image entry has no unique identifier"),
        }
    }
}

/// An error returned when parsing a crash report.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct ReportError {
    kind: ReportErrorKind,
    #[source]
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl ReportError {
    /// Creates a new report error from a known kind of error as well as an
    /// arbitrary error payload.
    pub fn new<E>(kind: ReportErrorKind, source: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        let source = Some(source.into());
        Self { kind, source }
    }

    /// Returns the corresponding [`ReportErrorKind`] for this error.
    pub fn kind(&self) -> ReportErrorKind {
        self.kind
    }
}

impl From<ReportErrorKind> for ReportError {
    fn from(kind: ReportErrorKind) -> Self {
        Self { kind, source: None }
    }
}
