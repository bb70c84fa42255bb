//! Error conversion utilities for CLI.
//!
//! Converts tarsift-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use std::path::Path;
use tarsift_core::ExtractionError;

/// Returns how a source path is shown to the user
pub fn source_label(source: &Path) -> String {
    if source == Path::new("-") {
        "<stdin>".to_string()
    } else {
        source.display().to_string()
    }
}

/// Converts `ExtractionError` to user-friendly anyhow error with context
pub fn convert_extraction_error(err: ExtractionError, source: &Path) -> anyhow::Error {
    let label = source_label(source);

    match err {
        ExtractionError::OpenSource { path, source } => {
            anyhow!(
                "Cannot open filesystem tarball '{}': {}\n\
                 HINT: Pass a flattened image tarball, or '-' to read it from stdin.",
                path.display(),
                source
            )
        }
        ExtractionError::Stream(io_err) => {
            anyhow!(
                "Failed to read tar stream from '{label}': {io_err}\n\
                 HINT: The tarball may be truncated, corrupted or not a tar archive. \
                 Files written so far were left in place."
            )
        }
        ExtractionError::DestinationResolution { path, source } => {
            anyhow!(
                "Cannot resolve destination directory '{}': {}",
                path.display(),
                source
            )
        }
        ExtractionError::CreateDirectory { path, source } => {
            anyhow!(
                "Failed to create directory '{}' while extracting '{label}': {}\n\
                 HINT: Check that the destination is writable and not occupied by a file.",
                path.display(),
                source
            )
        }
        ExtractionError::WriteFile { path, source } => {
            anyhow!(
                "Failed to write '{}' while extracting '{label}': {}\n\
                 HINT: Check free space and permissions of the destination.",
                path.display(),
                source
            )
        }
        ExtractionError::InvalidConfig { reason } => {
            anyhow!(
                "Invalid extraction options: {reason}\n\
                 HINT: Modes are octal permission bits, for example 755 or 0644."
            )
        }
        ExtractionError::PathTraversal { path } => {
            anyhow!(
                "Unsafe entry name in '{label}': '{}'",
                path.display()
            )
        }
        ExtractionError::Io(io_err) => {
            anyhow!("I/O error while processing '{label}': {io_err}")
        }
    }
}

/// Adds context to a generic error about extraction operations
pub fn add_source_context<T>(
    result: Result<T, ExtractionError>,
    source: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_extraction_error(e, source))
}
