//! Normalized entry path type.

use crate::ExtractionError;
use crate::Result;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// An entry name turned into a path relative to a destination.
///
/// Image tarballs mix `usr/bin/env`, `./usr/bin/env` and `/usr/bin/env`
/// styles. All three normalize to `usr/bin/env`: root and `.` components are
/// dropped, every other component is kept in order. A name containing `..`
/// is refused because it could leave the destination.
///
/// `EntryPath` can only be built through [`EntryPath::new`] or
/// [`EntryPath::from_name`], so a value always stays below whatever
/// destination it is joined to.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tarsift_core::types::EntryPath;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let entry = EntryPath::from_name("/usr/bin/env")?;
/// assert_eq!(entry.as_path(), Path::new("usr/bin/env"));
///
/// assert!(EntryPath::from_name("usr/../../etc/shadow").is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryPath(PathBuf);

impl EntryPath {
    /// Normalizes an entry path read from a tar header.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::PathTraversal`] if the path contains a
    /// `..` component.
    pub fn new(path: &Path) -> Result<Self> {
        let mut normalized = PathBuf::new();

        for component in path.components() {
            match component {
                Component::Normal(part) => normalized.push(part),
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
                Component::ParentDir => {
                    return Err(ExtractionError::PathTraversal {
                        path: path.to_path_buf(),
                    });
                }
            }
        }

        Ok(Self(normalized))
    }

    /// Normalizes a slash-separated entry name.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::new(Path::new(name))
    }

    /// Returns `true` if the name referred to the archive root itself
    /// (`/`, `.`, `./`).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.as_os_str().is_empty()
    }

    /// Returns the relative path.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}
