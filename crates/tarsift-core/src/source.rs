//! Filesystem sources: where the flattened tar stream comes from.
//!
//! Pulling an image from a registry and flattening its layers is someone
//! else's job. The extractor only needs a [`FilesystemSource`] that can hand
//! out an uncompressed tar stream. [`TarballSource`] reads a flattened
//! filesystem tarball from disk, and [`decode_stream`] wraps any other reader
//! (stdin, a pipe from another tool).
//!
//! Compressed input is recognized by its magic bytes, never by file
//! extension:
//!
//! | Codec | Magic |
//! |-------|-------|
//! | Gzip  | `1f 8b` |
//! | Bzip2 | `BZh` |
//! | Xz    | `fd 37 7a 58 5a 00` |
//! | Zstd  | `28 b5 2f fd` |

use std::fs::File;
use std::io::BufReader;
use std::io::Cursor;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use log::debug;

use crate::ExtractionError;
use crate::Result;

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const BZIP2_MAGIC: &[u8] = b"BZh";
const XZ_MAGIC: &[u8] = &[0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00];
const ZSTD_MAGIC: &[u8] = &[0x28, 0xb5, 0x2f, 0xfd];

/// Longest magic sequence that has to be inspected.
const MAGIC_LEN: usize = 6;

/// Something that can produce the tar stream of a flattened filesystem.
pub trait FilesystemSource {
    /// Opens a fresh, uncompressed tar stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying data cannot be opened or its
    /// compression header cannot be read.
    fn open(&self) -> Result<Box<dyn Read + '_>>;
}

/// A flattened filesystem tarball on disk, optionally compressed.
///
/// # Examples
///
/// ```no_run
/// use tarsift_core::FilesystemSource;
/// use tarsift_core::TarballSource;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = TarballSource::new("rootfs.tar.gz");
/// let stream = source.open()?;
/// # drop(stream);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TarballSource {
    path: PathBuf,
}

impl TarballSource {
    /// Creates a source reading `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the tarball path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FilesystemSource for TarballSource {
    fn open(&self) -> Result<Box<dyn Read + '_>> {
        let file = File::open(&self.path).map_err(|source| ExtractionError::OpenSource {
            path: self.path.clone(),
            source,
        })?;
        decode_stream(BufReader::new(file))
    }
}

/// Compression codec recognized in front of a tar stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Gzip (deflate).
    Gzip,
    /// Bzip2.
    Bzip2,
    /// Xz (LZMA2).
    Xz,
    /// Zstandard.
    Zstd,
}

impl Compression {
    /// Detects the codec from the first bytes of a stream.
    ///
    /// Returns `None` for anything else, including a plain tar stream.
    ///
    /// # Examples
    ///
    /// ```
    /// use tarsift_core::source::Compression;
    ///
    /// assert_eq!(Compression::detect(&[0x1f, 0x8b, 0x08]), Some(Compression::Gzip));
    /// assert_eq!(Compression::detect(b"usr/"), None);
    /// ```
    #[must_use]
    pub fn detect(head: &[u8]) -> Option<Self> {
        if head.starts_with(GZIP_MAGIC) {
            Some(Self::Gzip)
        } else if head.starts_with(ZSTD_MAGIC) {
            Some(Self::Zstd)
        } else if head.starts_with(XZ_MAGIC) {
            Some(Self::Xz)
        } else if head.starts_with(BZIP2_MAGIC) {
            Some(Self::Bzip2)
        } else {
            None
        }
    }

    /// Returns the human-readable codec name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        }
    }
}

/// Wraps `reader` in the decoder its magic bytes call for.
///
/// The inspected bytes are replayed in front of the remaining input, so
/// nothing is lost for plain tar streams.
///
/// # Errors
///
/// Returns [`ExtractionError::Stream`] if the first bytes cannot be read or
/// the zstd frame header is invalid.
pub fn decode_stream<'a, R: Read + 'a>(mut reader: R) -> Result<Box<dyn Read + 'a>> {
    let mut magic = [0u8; MAGIC_LEN];
    let filled = read_head(&mut reader, &mut magic).map_err(ExtractionError::Stream)?;
    let head = &magic[..filled];

    let compression = Compression::detect(head);
    let input = Cursor::new(head.to_vec()).chain(reader);

    match compression {
        Some(codec) => debug!("detected {} compressed stream", codec.name()),
        None => debug!("reading uncompressed tar stream"),
    }

    let decoded: Box<dyn Read + 'a> = match compression {
        Some(Compression::Gzip) => Box::new(flate2::read::GzDecoder::new(input)),
        Some(Compression::Bzip2) => Box::new(bzip2::read::BzDecoder::new(input)),
        Some(Compression::Xz) => Box::new(xz2::read::XzDecoder::new(input)),
        Some(Compression::Zstd) => Box::new(
            zstd::stream::read::Decoder::new(input).map_err(ExtractionError::Stream)?,
        ),
        None => Box::new(input),
    };

    Ok(decoded)
}

/// Fills `buf` as far as the reader allows; short only at end of input.
fn read_head<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;

    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }

    Ok(filled)
}
