//! Utilities for locating debug artifacts inside `dSYM` bundles.

use std::path::{Path, PathBuf};

/// Extensions to `Path` for handling `dSYM` bundle directories.
pub trait DSymPathExt {
    /// Returns `true` if this path points to an existing directory with a `.dSYM` extension.
    ///
    /// Note that this does not check if a full `dSYM` structure is contained within this folder.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use crashsym_common::DSymPathExt;
    ///
    /// assert!(Path::new("Foo.dSYM").is_dsym_dir());
    /// assert!(!Path::new("Foo").is_dsym_dir());
    /// ```
    fn is_dsym_dir(&self) -> bool;

    /// Resolves the path of the debug file in a `dSYM` directory structure.
    ///
    /// Returns `Some(path)` if this path is a dSYM directory according to [`is_dsym_dir`], and a
    /// file of the same name is located at `Contents/Resources/DWARF/`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use crashsym_common::DSymPathExt;
    ///
    /// let path = Path::new("Foo.dSYM");
    /// let dsym_path = path.resolve_dsym().unwrap();
    /// assert_eq!(dsym_path, Path::new("Foo.dSYM/Contents/Resources/DWARF/Foo"));
    /// ```
    ///
    /// [`is_dsym_dir`]: trait.DSymPathExt.html#tymethod.is_dsym_dir
    fn resolve_dsym(&self) -> Option<PathBuf>;
}

impl DSymPathExt for Path {
    fn is_dsym_dir(&self) -> bool {
        self.extension() == Some("dSYM".as_ref()) && self.is_dir()
    }

    fn resolve_dsym(&self) -> Option<PathBuf> {
        if !self.is_dsym_dir() {
            return None;
        }

        let framework = self.file_stem()?;
        let mut full_path = self.to_path_buf();
        full_path.push("Contents/Resources/DWARF");
        full_path.push(framework);

        // XCode produces [appName].app.dSYM files where the debug file's name is just [appName],
        // so strip .app if it's present.
        if matches!(full_path.extension(), Some(extension) if extension == "app") {
            full_path = full_path.with_extension("")
        }

        if full_path.is_file() {
            Some(full_path)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    #[test]
    fn test_resolve_dsym() {
        let temp = tempfile::tempdir().unwrap();
        let dsym = temp.path().join("Foo.dSYM");
        let dwarf = dsym.join("Contents/Resources/DWARF");
        fs::create_dir_all(&dwarf).unwrap();
        fs::write(dwarf.join("Foo"), b"").unwrap();

        assert!(dsym.is_dsym_dir());
        assert_eq!(dsym.resolve_dsym().unwrap(), dwarf.join("Foo"));
    }

    #[test]
    fn test_resolve_dsym_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let dsym = temp.path().join("Foo.dSYM");
        fs::create_dir_all(&dsym).unwrap();

        assert_eq!(dsym.resolve_dsym(), None);
    }

    #[test]
    fn test_not_a_dsym() {
        assert!(!Path::new("Foo").is_dsym_dir());
        assert_eq!(Path::new("Foo").resolve_dsym(), None);
    }
}
