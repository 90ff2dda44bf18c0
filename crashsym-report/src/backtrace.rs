//! Extraction of stack frames from thread backtrace sections.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::report::ImageRecord;
use crate::scanner::Scanner;

/// Labels of thread backtrace sections, e.g. `Thread 0 Crashed`.
static THREAD_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Thread \d+( Crashed| Highlighted)?").unwrap());

/// A single backtrace frame line: index, bundle token, then the replaceable
/// remainder decomposed into a return address and a description.
static FRAME_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\d+\s+(\S+)\s+((0x[0-9a-fA-F]+)\s+.*?)\s*$").unwrap()
});

/// A stack frame whose address can be symbolicated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// The exact original substring to replace: address plus description.
    pub replacement_key: String,
    /// The return address (hex, `0x`-prefixed, verbatim).
    pub address: String,
    /// The bundle identifier of the image owning this frame.
    pub bundle_id: String,
}

/// Extracts the frames of a single thread section.
///
/// Lines that do not match the frame grammar, and frames owned by images
/// without supplied symbols, are skipped. Both are expected for regular
/// reports, so neither is an error.
pub fn thread_frames(
    body: &str,
    images: &BTreeMap<String, ImageRecord>,
) -> BTreeMap<String, Frame> {
    let mut frames = BTreeMap::new();

    for line in body.lines() {
        let Some(captures) = FRAME_LINE.captures(line) else {
            tracing::debug!("skipping unrecognized backtrace line: {}", line.trim());
            continue;
        };

        let bundle_id = &captures[1];
        if !images.contains_key(bundle_id) {
            continue;
        }

        let frame = Frame {
            replacement_key: captures[2].to_string(),
            address: captures[3].to_string(),
            bundle_id: bundle_id.to_string(),
        };

        // identical replacement text implies an identical address
        if let Some(previous) = frames.insert(frame.replacement_key.clone(), frame) {
            debug_assert_eq!(
                previous.address,
                frames[&previous.replacement_key].address
            );
        }
    }

    frames
}

/// Extracts the frames of every thread backtrace in the report.
///
/// Thread sections are enumerated in report order and merged into one mapping
/// keyed by replacement text; a later frame with an identical key overwrites
/// an earlier one.
pub fn all_frames(
    scanner: &Scanner<'_>,
    images: &BTreeMap<String, ImageRecord>,
) -> BTreeMap<String, Frame> {
    let mut frames = BTreeMap::new();
    for section in scanner.sections_matching(&THREAD_LABEL) {
        frames.append(&mut thread_frames(section.content, images));
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    use similar_asserts::assert_eq;

    use crashsym_common::Arch;

    fn images() -> BTreeMap<String, ImageRecord> {
        let mut images = BTreeMap::new();
        images.insert(
            "com.example.App".to_string(),
            ImageRecord {
                bundle_id: "com.example.App".to_string(),
                debug_id: "c0dea7ab-1234-5678-9abc-def012345678".parse().unwrap(),
                arch: Arch::Amd64,
                load_address: "0x100000000".to_string(),
            },
        );
        images
    }

    #[test]
    fn test_known_bundle_yields_frame() {
        let body = "3   com.example.App \t0x0000000100001000 0x100000000 + 4096";
        let frames = thread_frames(body, &images());

        let frame = &frames["0x0000000100001000 0x100000000 + 4096"];
        assert_eq!(frame.address, "0x0000000100001000");
        assert_eq!(frame.bundle_id, "com.example.App");
    }

    #[test]
    fn test_unknown_bundle_skipped() {
        let body = "3   com.unknown.Lib \t0x0000000100001000 0x100000000 + 4096";
        assert!(thread_frames(body, &images()).is_empty());
    }

    #[test]
    fn test_malformed_line_skipped() {
        let body = "this is not a frame line\n\
                    3   com.example.App \t0x0000000100001000 0x100000000 + 4096";
        assert_eq!(thread_frames(body, &images()).len(), 1);
    }

    #[test]
    fn test_threads_merged() {
        let text = "\
Thread 0 Crashed:
0   com.example.App \t0x0000000100001000 0x100000000 + 4096

Thread 1:
0   com.example.App \t0x0000000100002000 0x100000000 + 8192
1   com.example.App \t0x0000000100001000 0x100000000 + 4096
";
        let scanner = Scanner::new(text);
        let frames = all_frames(&scanner, &images());

        assert_eq!(frames.len(), 2);
        assert!(frames.contains_key("0x0000000100002000 0x100000000 + 8192"));
    }
}
