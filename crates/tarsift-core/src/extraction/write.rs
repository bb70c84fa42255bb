//! Filesystem side effects of a matched entry.
//!
//! - [`create_directory`]: directory plus missing ancestors (idempotent)
//! - [`write_file`]: parent chain, create/truncate, buffered copy, flush
//! - [`replicate_file`]: copy an already written file to another destination
//! - [`is_same_file`]: detect two target paths naming one file

use std::fs;
use std::fs::DirBuilder;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::io::Read;
use std::path::Path;

use crate::ExtractConfig;
use crate::ExtractionError;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::copy::CopyFailure;
use crate::copy::copy_with_buffer;

/// Capacity of the output file writer (64KB).
const WRITER_CAPACITY: usize = 64 * 1024;

/// Creates `path` and every missing ancestor with `mode`.
///
/// Existing directories are left untouched, including their permissions.
///
/// # Errors
///
/// Returns [`ExtractionError::CreateDirectory`] if any component cannot be
/// created or already exists as a non-directory.
pub fn create_directory(path: &Path, mode: u32) -> Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    builder
        .create(path)
        .map_err(|source| ExtractionError::CreateDirectory {
            path: path.to_path_buf(),
            source,
        })
}

/// Writes everything `reader` yields into `target`.
///
/// Missing parent directories are created with the configured directory
/// mode. The file is created (or truncated) with the configured file mode,
/// never the mode recorded in the archive. The file is flushed and closed
/// before returning.
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// - [`ExtractionError::Stream`] if reading `reader` fails
/// - [`ExtractionError::CreateDirectory`] if the parent chain cannot be
///   created
/// - [`ExtractionError::WriteFile`] if the file cannot be opened, written or
///   flushed
pub fn write_file<R: Read + ?Sized>(
    reader: &mut R,
    target: &Path,
    config: &ExtractConfig,
    buffer: &mut CopyBuffer,
) -> Result<u64> {
    write_from(reader, target, config, buffer, ExtractionError::Stream)
}

/// Copies the already written file `source` to `target`.
///
/// Used when one large entry matches several rules: the entry is streamed
/// into its first destination, then replicated from disk.
///
/// Returns `None` without touching anything when `target` turns out to be
/// `source` under another name, since truncating it would lose the content.
///
/// # Errors
///
/// Returns [`ExtractionError::Io`] if `source` cannot be read back, otherwise
/// the same errors as [`write_file`].
pub fn replicate_file(
    source: &Path,
    target: &Path,
    config: &ExtractConfig,
    buffer: &mut CopyBuffer,
) -> Result<Option<u64>> {
    // The parent must exist for `..` in the target to resolve.
    if let Some(parent) = target.parent() {
        create_directory(parent, config.dir_mode)?;
    }
    if is_same_file(source, target) {
        return Ok(None);
    }

    let mut input = File::open(source)?;
    write_from(&mut input, target, config, buffer, ExtractionError::Io).map(Some)
}

/// Returns `true` if `a` and `b` name the same existing file once symlinks,
/// `.` and `..` are resolved.
pub fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn write_from<R: Read + ?Sized>(
    reader: &mut R,
    target: &Path,
    config: &ExtractConfig,
    buffer: &mut CopyBuffer,
    read_error: fn(std::io::Error) -> ExtractionError,
) -> Result<u64> {
    if let Some(parent) = target.parent() {
        create_directory(parent, config.dir_mode)?;
    }

    let write_error = |source: std::io::Error| ExtractionError::WriteFile {
        path: target.to_path_buf(),
        source,
    };

    let file = open_output(target, config.file_mode).map_err(write_error)?;
    let mut writer = BufWriter::with_capacity(WRITER_CAPACITY, file);

    let written = copy_with_buffer(reader, &mut writer, buffer).map_err(|failure| match failure {
        CopyFailure::Read(e) => read_error(e),
        CopyFailure::Write(e) => write_error(e),
    })?;

    // into_inner flushes; the file is closed when it goes out of scope.
    writer
        .into_inner()
        .map_err(|e| write_error(e.into_error()))?;

    Ok(written)
}

fn open_output(path: &Path, mode: u32) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    options.open(path)
}
