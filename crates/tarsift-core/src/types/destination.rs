//! Resolved destination directory type.

use crate::ExtractionError;
use crate::Result;
use std::path::Path;
use std::path::PathBuf;

use super::EntryPath;

/// A rule's destination directory, made absolute.
///
/// Resolution is lexical: the current directory is prepended to relative
/// paths, symlinks are not followed and the directory does not have to exist
/// yet. Missing directories are created when the first entry lands in them.
///
/// # Examples
///
/// ```
/// use tarsift_core::types::Destination;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = Destination::resolve("out")?;
/// assert!(dest.as_path().is_absolute());
/// assert!(dest.as_path().ends_with("out"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination(PathBuf);

impl Destination {
    /// Resolves `path` against the current working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::DestinationResolution`] if the path is
    /// empty or the current directory cannot be determined.
    pub fn resolve(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        std::path::absolute(path)
            .map(Self)
            .map_err(|source| ExtractionError::DestinationResolution {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Returns the absolute path.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Returns where `entry` is materialized below this destination.
    #[inline]
    #[must_use]
    pub fn join(&self, entry: &EntryPath) -> PathBuf {
        if entry.is_empty() {
            return self.0.clone();
        }
        self.0.join(entry.as_path())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_path_unchanged() {
        let dest = Destination::resolve("/tmp/x").expect("absolute path resolves");
        assert_eq!(dest.as_path(), Path::new("/tmp/x"));
    }

    #[test]
    fn test_relative_path_is_anchored_at_cwd() {
        let cwd = std::env::current_dir().unwrap();
        let dest = Destination::resolve("out/sub").expect("relative path resolves");
        assert_eq!(dest.as_path(), cwd.join("out/sub"));
    }

    #[test]
    fn test_nonexistent_directory_resolves() {
        let dest = Destination::resolve("/definitely/not/here").unwrap();
        assert!(!dest.as_path().exists());
    }

    #[test]
    fn test_empty_path_fails() {
        let result = Destination::resolve("");
        assert!(matches!(
            result,
            Err(ExtractionError::DestinationResolution { .. })
        ));
    }

    #[test]
    fn test_join_entry_path() {
        let dest = Destination::resolve("/out").unwrap();
        let entry = EntryPath::from_name("/some/file").unwrap();
        assert_eq!(dest.join(&entry), PathBuf::from("/out/some/file"));
    }

    #[test]
    fn test_join_empty_entry_is_destination() {
        let dest = Destination::resolve("/out").unwrap();
        let entry = EntryPath::from_name("./").unwrap();
        assert_eq!(dest.join(&entry), PathBuf::from("/out"));
    }
}
