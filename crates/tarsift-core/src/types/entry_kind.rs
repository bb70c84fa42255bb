//! Classification of tar entries.

/// How a tar entry is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file: content is copied.
    File,

    /// Directory: created with its ancestors, no content.
    Directory,

    /// Anything else (links, devices, fifos). Never materialized.
    Unsupported(tar::EntryType),
}

impl EntryKind {
    /// Returns `true` if this is a directory.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self, Self::Directory)
    }
}

impl From<tar::EntryType> for EntryKind {
    fn from(entry_type: tar::EntryType) -> Self {
        match entry_type {
            tar::EntryType::Regular | tar::EntryType::Continuous | tar::EntryType::GNUSparse => {
                Self::File
            }
            tar::EntryType::Directory => Self::Directory,
            other => Self::Unsupported(other),
        }
    }
}
