//! High-level public API for selective extraction.

use std::io::Read;

use crate::ExtractConfig;
use crate::ExtractionReport;
use crate::FilesystemSource;
use crate::NoopProgress;
use crate::ProgressCallback;
use crate::Result;
use crate::RuleSet;
use crate::extraction::ExtractionEngine;

/// Extracts the entries of a tar stream that match `rules`.
///
/// Every rule is evaluated against every entry. Matching directories are
/// created under the rule's destination, matching regular files are written
/// there with [`DEFAULT_FILE_MODE`](crate::DEFAULT_FILE_MODE). The stream is
/// consumed and dropped whatever the outcome.
///
/// # Arguments
///
/// * `stream` - Uncompressed tar stream of a flattened filesystem
/// * `rules` - Destination directory to glob pattern mapping
///
/// # Errors
///
/// Returns the first error encountered. Files written before it stay on
/// disk.
///
/// # Examples
///
/// ```no_run
/// use tarsift_core::RuleSet;
/// use tarsift_core::extract;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let stream = std::fs::File::open("rootfs.tar")?;
/// let rules: RuleSet = [("./bin", "/usr/bin/*"), ("./etc", "/etc/*.conf")]
///     .into_iter()
///     .collect();
/// let report = extract(stream, &rules)?;
/// println!("Wrote {} files", report.files_written);
/// # Ok(())
/// # }
/// ```
pub fn extract<R: Read>(stream: R, rules: &RuleSet) -> Result<ExtractionReport> {
    extract_with_config(stream, rules, &ExtractConfig::default())
}

/// Extracts matching entries with a custom configuration.
///
/// # Errors
///
/// Returns [`ExtractionError::InvalidConfig`](crate::ExtractionError::InvalidConfig)
/// if `config` is invalid, otherwise the same errors as [`extract`].
///
/// # Examples
///
/// ```no_run
/// use tarsift_core::ExtractConfig;
/// use tarsift_core::RuleSet;
/// use tarsift_core::extract_with_config;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let stream = std::fs::File::open("rootfs.tar")?;
/// let config = ExtractConfig::default().with_file_mode(0o644);
/// extract_with_config(stream, &RuleSet::single("./out", "*"), &config)?;
/// # Ok(())
/// # }
/// ```
pub fn extract_with_config<R: Read>(
    stream: R,
    rules: &RuleSet,
    config: &ExtractConfig,
) -> Result<ExtractionReport> {
    extract_with_progress(stream, rules, config, &mut NoopProgress)
}

/// Extracts matching entries, reporting progress to `progress`.
///
/// # Errors
///
/// Same as [`extract_with_config`].
///
/// # Examples
///
/// ```no_run
/// use tarsift_core::ExtractConfig;
/// use tarsift_core::NoopProgress;
/// use tarsift_core::RuleSet;
/// use tarsift_core::extract_with_progress;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let stream = std::fs::File::open("rootfs.tar")?;
/// let rules = RuleSet::single("./out", "*");
/// let mut progress = NoopProgress;
/// extract_with_progress(stream, &rules, &ExtractConfig::default(), &mut progress)?;
/// # Ok(())
/// # }
/// ```
pub fn extract_with_progress<R: Read>(
    stream: R,
    rules: &RuleSet,
    config: &ExtractConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<ExtractionReport> {
    let mut engine = ExtractionEngine::new(*config);
    engine.extract(stream, rules, progress)
}

/// Opens `source` and extracts the matching entries of its stream.
///
/// # Errors
///
/// Returns the error of [`FilesystemSource::open`], otherwise the same
/// errors as [`extract_with_config`].
///
/// # Examples
///
/// ```no_run
/// use tarsift_core::ExtractConfig;
/// use tarsift_core::NoopProgress;
/// use tarsift_core::RuleSet;
/// use tarsift_core::TarballSource;
/// use tarsift_core::extract_source;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = TarballSource::new("rootfs.tar.zst");
/// let rules = RuleSet::single("./out", "/etc/*");
/// extract_source(&source, &rules, &ExtractConfig::default(), &mut NoopProgress)?;
/// # Ok(())
/// # }
/// ```
pub fn extract_source<S: FilesystemSource + ?Sized>(
    source: &S,
    rules: &RuleSet,
    config: &ExtractConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<ExtractionReport> {
    let stream = source.open()?;
    extract_with_progress(stream, rules, config, progress)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ExtractionError;
    use crate::TarballSource;
    use crate::test_utils::TarTestBuilder;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_extract_default_config() {
        let temp = TempDir::new().unwrap();
        let tar = TarTestBuilder::new()
            .add_file("bin/tool", b"tool")
            .build();

        let report = extract(Cursor::new(tar), &RuleSet::single(temp.path(), "*")).unwrap();
        assert_eq!(report.files_written, 1);
        assert_eq!(
            std::fs::read(temp.path().join("bin/tool")).unwrap(),
            b"tool"
        );
    }

    #[test]
    fn test_extract_with_invalid_config() {
        let config = ExtractConfig::default().with_dir_mode(0o70000);
        let result = extract_with_config(Cursor::new(Vec::new()), &RuleSet::new(), &config);
        assert!(matches!(result, Err(ExtractionError::InvalidConfig { .. })));
    }

    #[test]
    fn test_extract_source_missing_tarball() {
        let temp = TempDir::new().unwrap();
        let source = TarballSource::new(temp.path().join("absent.tar"));

        let result = extract_source(
            &source,
            &RuleSet::single(temp.path(), "*"),
            &ExtractConfig::default(),
            &mut NoopProgress,
        );
        assert!(matches!(result, Err(ExtractionError::OpenSource { .. })));
    }

    #[test]
    fn test_extract_source_tarball() {
        let temp = TempDir::new().unwrap();
        let tarball = temp.path().join("rootfs.tar");
        let tar = TarTestBuilder::new()
            .add_file("etc/os-release", b"ID=test")
            .build();
        std::fs::write(&tarball, tar).unwrap();
        let out = temp.path().join("out");

        let source = TarballSource::new(&tarball);
        let report = extract_source(
            &source,
            &RuleSet::single(&out, "etc/*"),
            &ExtractConfig::default(),
            &mut NoopProgress,
        )
        .unwrap();

        assert_eq!(report.files_written, 1);
        assert!(out.join("etc/os-release").is_file());
    }
}
