use std::fs;
use std::path::Path;

use similar_asserts::assert_eq;

use crashsym_common::{Arch, DebugId};
use crashsym_symbolicate::{
    DebugTools, SymbolicateError, SymbolicateOptions, Symbolicator, ToolError,
};

const DEBUG_ID: &str = "c0dea7ab-1234-5678-9abc-def012345678";

const REPORT: &str = "\
Process:         Example [123]
Path:            /Applications/Example.app/Contents/MacOS/Example
Identifier:      com.example.App
Code Type:       X86-64 (Native)
OS Version:      Mac OS X 10.13.6 (17G65)
Report Version:  9

Thread 0 Crashed:
0   com.example.App \t0x0000000100001000 0x100000000 + 4096
1   libsystem.dylib \t0x00007fff20000000 start + 1

Binary Images:
0x100000000 - 0x100fff7ff +com.example.App (1.0) <c0dea7ab-1234-5678-9abc-def012345678> /Applications/Example.app
0x7fff20000000 - 0x7fff2fffffff libsystem.dylib (1.0) <11111111-2222-3333-4444-555555555555> /usr/lib/libsystem.dylib
";

/// Answers every address with a fixed symbol and reports a configurable
/// debug identifier.
struct StubTools {
    debug_id: DebugId,
}

impl DebugTools for StubTools {
    fn has_architecture(&self, _: &Path, arch: Arch) -> Result<bool, ToolError> {
        Ok(arch == Arch::Amd64)
    }

    fn read_debug_id(&self, _: &Path, _: Arch) -> Result<Option<DebugId>, ToolError> {
        Ok(Some(self.debug_id))
    }

    fn resolve_addresses(
        &self,
        _: &Path,
        _: Arch,
        load_address: &str,
        addresses: &[&str],
    ) -> Result<Vec<String>, ToolError> {
        assert_eq!(load_address, "0x100000000");
        Ok(addresses
            .iter()
            .map(|addr| match *addr {
                "0x0000000100001000" => {
                    "-[AppDelegate applicationDidFinishLaunching:] (AppDelegate.m:42) (in Example)"
                        .to_string()
                }
                other => other.to_string(),
            })
            .collect())
    }
}

/// Creates `Example.dSYM/Contents/Resources/DWARF/Example` under a search
/// directory and returns the directory.
fn search_dir() -> tempfile::TempDir {
    let temp = tempfile::tempdir().unwrap();
    let dwarf = temp.path().join("Example.dSYM/Contents/Resources/DWARF");
    fs::create_dir_all(&dwarf).unwrap();
    fs::write(dwarf.join("Example"), b"\xfe\xed\xfa\xcf").unwrap();
    temp
}

fn matching_tools() -> StubTools {
    StubTools {
        debug_id: DEBUG_ID.parse().unwrap(),
    }
}

#[test]
fn test_end_to_end() {
    let dir = search_dir();
    let options = SymbolicateOptions {
        dsym_path: None,
        search_paths: vec![dir.path().to_path_buf()],
    };

    let output = Symbolicator::new(options, matching_tools())
        .process(REPORT)
        .unwrap();

    // the resolvable frame is rewritten
    assert!(output.contains(
        "0   com.example.App \t0x0000000100001000 \
         -[AppDelegate applicationDidFinishLaunching:] (AppDelegate.m:42)\n"
    ));
    // the unsupplied bundle's frame stays untouched
    assert!(output.contains("1   libsystem.dylib \t0x00007fff20000000 start + 1\n"));
    // everything outside the replaced frame is preserved
    assert!(output.contains("OS Version:      Mac OS X 10.13.6 (17G65)"));
    assert!(output.contains("<c0dea7ab-1234-5678-9abc-def012345678>"));
}

#[test]
fn test_explicit_dsym_directory() {
    let dir = search_dir();
    let options = SymbolicateOptions {
        dsym_path: Some(dir.path().join("Example.dSYM")),
        search_paths: Vec::new(),
    };

    let output = Symbolicator::new(options, matching_tools())
        .process(REPORT)
        .unwrap();
    assert!(output.contains("AppDelegate.m:42"));
}

#[test]
fn test_debug_id_mismatch_aborts() {
    let dir = search_dir();
    let options = SymbolicateOptions {
        dsym_path: None,
        search_paths: vec![dir.path().to_path_buf()],
    };
    let tools = StubTools {
        debug_id: "ffffffff-0000-0000-0000-000000000000".parse().unwrap(),
    };

    let err = Symbolicator::new(options, tools).process(REPORT).unwrap_err();
    assert!(matches!(err, SymbolicateError::DebugIdMismatch { .. }));

    let message = err.to_string();
    assert!(message.contains(DEBUG_ID), "{message}");
    assert!(message.contains("ffffffff-0000-0000-0000-000000000000"), "{message}");
}

#[test]
fn test_missing_bundle_is_fatal() {
    let options = SymbolicateOptions::default();
    let err = Symbolicator::new(options, matching_tools())
        .process(REPORT)
        .unwrap_err();
    assert!(matches!(err, SymbolicateError::NoSymbols(_)));
}

#[test]
fn test_unresolvable_report_passes_through() {
    // resolver echoes every address back; output must equal input exactly
    struct EchoTools;

    impl DebugTools for EchoTools {
        fn has_architecture(&self, _: &Path, _: Arch) -> Result<bool, ToolError> {
            Ok(true)
        }

        fn read_debug_id(&self, _: &Path, _: Arch) -> Result<Option<DebugId>, ToolError> {
            Ok(Some(DEBUG_ID.parse().unwrap()))
        }

        fn resolve_addresses(
            &self,
            _: &Path,
            _: Arch,
            _: &str,
            addresses: &[&str],
        ) -> Result<Vec<String>, ToolError> {
            Ok(addresses.iter().map(|a| a.to_string()).collect())
        }
    }

    let dir = search_dir();
    let options = SymbolicateOptions {
        dsym_path: None,
        search_paths: vec![dir.path().to_path_buf()],
    };

    let output = Symbolicator::new(options, EchoTools).process(REPORT).unwrap();
    assert_eq!(output, REPORT);
}
