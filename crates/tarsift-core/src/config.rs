//! Extraction configuration.

use crate::ExtractionError;
use crate::Result;

/// Mode for directories created during extraction (`rwxr-xr-x`).
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Mode for files created during extraction (`rwxrwxrwx`).
///
/// Entry modes recorded in the tar headers are never applied.
pub const DEFAULT_FILE_MODE: u32 = 0o777;

/// Largest entry held in memory when it must be written to several
/// destinations (64 MB).
pub const DEFAULT_MAX_BUFFER_SIZE: u64 = 64 * 1024 * 1024;

/// Highest permission bits accepted for `dir_mode` and `file_mode`.
const MODE_MASK: u32 = 0o7777;

/// Configuration for an extraction run.
///
/// Modes are requested at creation time and are still subject to the
/// process umask. They only apply on Unix.
///
/// # Examples
///
/// ```
/// use tarsift_core::ExtractConfig;
///
/// let config = ExtractConfig::default()
///     .with_file_mode(0o644)
///     .with_max_buffer_size(1024 * 1024);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Mode for created directories.
    ///
    /// Default: [`DEFAULT_DIR_MODE`].
    pub dir_mode: u32,

    /// Mode for created files.
    ///
    /// Default: [`DEFAULT_FILE_MODE`].
    pub file_mode: u32,

    /// Entries matching several rules are buffered in memory up to this size.
    /// Larger entries are written to the first destination and copied from
    /// there to the others.
    ///
    /// Default: [`DEFAULT_MAX_BUFFER_SIZE`].
    pub max_buffer_size: u64,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            dir_mode: DEFAULT_DIR_MODE,
            file_mode: DEFAULT_FILE_MODE,
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
        }
    }
}

impl ExtractConfig {
    /// Creates a configuration with the default modes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the mode for created directories.
    #[must_use]
    pub fn with_dir_mode(mut self, mode: u32) -> Self {
        self.dir_mode = mode;
        self
    }

    /// Sets the mode for created files.
    #[must_use]
    pub fn with_file_mode(mut self, mode: u32) -> Self {
        self.file_mode = mode;
        self
    }

    /// Sets the in-memory buffering threshold for multi-destination entries.
    #[must_use]
    pub fn with_max_buffer_size(mut self, size: u64) -> Self {
        self.max_buffer_size = size;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a mode has bits outside `0o7777`.
    pub fn validate(&self) -> Result<()> {
        for (name, mode) in [("dir_mode", self.dir_mode), ("file_mode", self.file_mode)] {
            if mode & !MODE_MASK != 0 {
                return Err(ExtractionError::InvalidConfig {
                    reason: format!("{name} {mode:#o} exceeds {MODE_MASK:#o}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtractConfig::default();
        assert_eq!(config.dir_mode, 0o755);
        assert_eq!(config.file_mode, 0o777);
        assert_eq!(config.max_buffer_size, 64 * 1024 * 1024);
        assert_eq!(config, ExtractConfig::new());
    }

    #[test]
    fn test_builder_methods() {
        let config = ExtractConfig::new()
            .with_dir_mode(0o700)
            .with_file_mode(0o600)
            .with_max_buffer_size(0);
        assert_eq!(config.dir_mode, 0o700);
        assert_eq!(config.file_mode, 0o600);
        assert_eq!(config.max_buffer_size, 0);
    }

    #[test]
    fn test_validate_accepts_special_bits() {
        let config = ExtractConfig::new().with_dir_mode(0o1777);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_mode() {
        let config = ExtractConfig::new().with_file_mode(0o10_000);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidConfig { .. }));
        assert!(err.to_string().contains("file_mode"));
    }
}
