//! Maximum filename length oracles.
//!
//! The legalizer asks an oracle for the limit once per call and never
//! caches it; any caching policy belongs to the oracle's owner.

use std::path::{Path, PathBuf};

/// Upper bound applied to whatever the filesystem reports.
///
/// Some filesystems misreport their capacity, so the probe is capped.
pub const MAX_FILENAME_LENGTH: usize = 200;

/// Source of the maximum legal filename length, in bytes.
pub trait LengthOracle {
    fn max_filename_length(&self) -> usize;
}

impl<T: LengthOracle + ?Sized> LengthOracle for &T {
    fn max_filename_length(&self) -> usize {
        (**self).max_filename_length()
    }
}

impl<T: LengthOracle + ?Sized> LengthOracle for Box<T> {
    fn max_filename_length(&self) -> usize {
        (**self).max_filename_length()
    }
}

/// A constant limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedLimit(pub usize);

impl LengthOracle for FixedLimit {
    fn max_filename_length(&self) -> usize {
        self.0
    }
}

impl Default for FixedLimit {
    fn default() -> Self {
        Self(MAX_FILENAME_LENGTH)
    }
}

/// Probes the filesystem holding `directory` on every query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesystemLimit {
    directory: PathBuf,
}

impl FilesystemLimit {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl LengthOracle for FilesystemLimit {
    fn max_filename_length(&self) -> usize {
        match probe_name_max(&self.directory) {
            Some(name_max) => name_max.min(MAX_FILENAME_LENGTH),
            None => {
                tracing::trace!(
                    "No name length for {:?}, using {}",
                    self.directory,
                    MAX_FILENAME_LENGTH
                );
                MAX_FILENAME_LENGTH
            }
        }
    }
}

/// `f_namemax` of the filesystem containing `path` (None if unavailable)
#[cfg(unix)]
fn probe_name_max(path: &Path) -> Option<usize> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let path_cstr = CString::new(path.as_os_str().as_bytes()).ok()?;

    unsafe {
        let mut stat: libc::statvfs = std::mem::zeroed();
        if libc::statvfs(path_cstr.as_ptr(), &mut stat) == 0 {
            usize::try_from(stat.f_namemax).ok().filter(|&n| n > 0)
        } else {
            None
        }
    }
}

#[cfg(not(unix))]
fn probe_name_max(_path: &Path) -> Option<usize> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_limit() {
        assert_eq!(FixedLimit(5).max_filename_length(), 5);
        assert_eq!(FixedLimit::default().max_filename_length(), MAX_FILENAME_LENGTH);
    }

    #[test]
    fn test_filesystem_limit_is_capped() {
        let dir = tempfile::tempdir().unwrap();
        let limit = FilesystemLimit::new(dir.path()).max_filename_length();
        assert!(limit > 0);
        assert!(limit <= MAX_FILENAME_LENGTH);
    }

    #[test]
    fn test_missing_directory_falls_back_to_cap() {
        let limit = FilesystemLimit::new("/definitely/not/here/tagpath").max_filename_length();
        assert_eq!(limit, MAX_FILENAME_LENGTH);
    }

    #[test]
    fn test_boxed_and_borrowed_oracles() {
        let boxed: Box<dyn LengthOracle> = Box::new(FixedLimit(7));
        assert_eq!(boxed.max_filename_length(), 7);
        let fixed = FixedLimit(9);
        assert_eq!((&fixed).max_filename_length(), 9);
    }
}
