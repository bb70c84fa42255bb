//! Error types for selective extraction.

use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ExtractionError`.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Errors that can occur while extracting an image filesystem stream.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Reading the tar stream failed (corrupt, truncated or unreadable data).
    #[error("failed to read tar stream: {0}")]
    Stream(#[source] std::io::Error),

    /// A rule's destination directory could not be made absolute.
    #[error("cannot resolve destination directory {path}: {source}")]
    DestinationResolution {
        /// The destination as given in the rule.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A directory (or one of its ancestors) could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDirectory {
        /// The directory being created.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A file could not be opened, written or flushed.
    #[error("failed to write file {path}: {source}")]
    WriteFile {
        /// The file being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The filesystem source could not be opened.
    #[error("failed to open filesystem source {path}: {source}")]
    OpenSource {
        /// Path of the source tarball.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// An entry name would escape its destination directory.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The entry name as found in the archive.
        path: PathBuf,
    },

    /// The extraction configuration is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected.
        reason: String,
    },

    /// Any other I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractionError {
    /// Returns `true` if extraction may continue past this error.
    ///
    /// Only unsafe entry names are recoverable: the offending entry is
    /// skipped. Every other error aborts the extraction.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use tarsift_core::ExtractionError;
    ///
    /// let err = ExtractionError::PathTraversal {
    ///     path: PathBuf::from("../etc/passwd"),
    /// };
    /// assert!(err.is_recoverable());
    ///
    /// let err = ExtractionError::Stream(std::io::Error::other("truncated"));
    /// assert!(!err.is_recoverable());
    /// ```
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::PathTraversal { .. })
    }

    /// Returns `true` if this error came from writing to the local filesystem.
    #[must_use]
    pub const fn is_filesystem_error(&self) -> bool {
        matches!(
            self,
            Self::CreateDirectory { .. } | Self::WriteFile { .. } | Self::Io(_)
        )
    }

    /// Returns the path involved in this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::DestinationResolution { path, .. }
            | Self::CreateDirectory { path, .. }
            | Self::WriteFile { path, .. }
            | Self::OpenSource { path, .. }
            | Self::PathTraversal { path } => Some(path),
            Self::Stream(_) | Self::InvalidConfig { .. } | Self::Io(_) => None,
        }
    }
}
