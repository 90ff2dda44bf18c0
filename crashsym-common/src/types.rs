//! Common types used across `crashsym`.

use std::fmt;
use std::str;

/// An error returned for an invalid [`Arch`](enum.Arch.html).
#[derive(Debug)]
pub struct UnknownArchError;

impl fmt::Display for UnknownArchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown architecture")
    }
}

impl std::error::Error for UnknownArchError {}

/// An enumeration of CPU architectures encountered in crash reports.
///
/// Each architecture has a canonical name, returned by [`Arch::name`], which
/// is also the token passed to external debug tools. Architectures can be
/// parsed from their string names, including the spellings used by the
/// `Code Type` field of crash reports (for instance `"X86-64"` parses to
/// [`Arch::Amd64`]).
///
/// [`Arch::name`]: enum.Arch.html#method.name
#[non_exhaustive]
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Arch {
    Unknown,
    X86,
    Amd64,
    Amd64h,
    Arm,
    ArmV6,
    ArmV7,
    ArmV7s,
    Arm64,
    Arm64e,
    Ppc,
    Ppc64,
}

impl Arch {
    /// Returns the canonical name of the CPU architecture.
    ///
    /// This follows the Apple conventions for naming architectures. For
    /// instance, Intel 32-bit architectures are canonically named `"x86"`,
    /// even though `"i386"` would also be a valid name.
    ///
    /// # Examples
    ///
    /// ```
    /// use crashsym_common::Arch;
    ///
    /// // Will print "x86_64"
    /// println!("{}", Arch::Amd64.name());
    /// ```
    pub fn name(self) -> &'static str {
        match self {
            Arch::Unknown => "unknown",
            Arch::X86 => "x86",
            Arch::Amd64 => "x86_64",
            Arch::Amd64h => "x86_64h",
            Arch::Arm => "arm",
            Arch::ArmV6 => "armv6",
            Arch::ArmV7 => "armv7",
            Arch::ArmV7s => "armv7s",
            Arch::Arm64 => "arm64",
            Arch::Arm64e => "arm64e",
            Arch::Ppc => "ppc",
            Arch::Ppc64 => "ppc64",
        }
    }

    /// Returns whether this architecture is well-known.
    ///
    /// This is trivially `true` for all architectures other than
    /// [`Arch::Unknown`].
    pub fn well_known(self) -> bool {
        !matches!(self, Arch::Unknown)
    }
}

impl Default for Arch {
    fn default() -> Arch {
        Arch::Unknown
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl str::FromStr for Arch {
    type Err = UnknownArchError;

    fn from_str(string: &str) -> Result<Arch, UnknownArchError> {
        Ok(match string.to_ascii_lowercase().as_str() {
            "unknown" => Arch::Unknown,
            // this is an alias that is known among macho users
            "i386" => Arch::X86,
            "x86" => Arch::X86,
            "x86_64" | "amd64" => Arch::Amd64,
            "x86_64h" => Arch::Amd64h,
            "arm" => Arch::Arm,
            "armv6" => Arch::ArmV6,
            "armv7" => Arch::ArmV7,
            "armv7s" => Arch::ArmV7s,
            "arm64" => Arch::Arm64,
            "arm64e" => Arch::Arm64e,
            "ppc" => Arch::Ppc,
            "ppc64" => Arch::Ppc64,

            // crash report `Code Type` variants
            "x86-64" => Arch::Amd64,
            "arm-64" => Arch::Arm64,

            _ => return Err(UnknownArchError),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use similar_asserts::assert_eq;

    #[test]
    fn test_code_type_spellings() {
        assert_eq!("X86-64".parse::<Arch>().unwrap(), Arch::Amd64);
        assert_eq!("ARM-64".parse::<Arch>().unwrap(), Arch::Arm64);
        assert_eq!("PPC".parse::<Arch>().unwrap(), Arch::Ppc);
    }

    #[test]
    fn test_unknown_code_type() {
        assert!("riscv128".parse::<Arch>().is_err());
    }

    #[test]
    fn test_name_roundtrip() {
        assert_eq!(
            Arch::Arm64e.name().parse::<Arch>().unwrap(),
            Arch::Arm64e
        );
    }
}
