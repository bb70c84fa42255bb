//! Core extraction engine.

use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use log::debug;
use log::info;
use log::trace;
use log::warn;

use crate::ExtractConfig;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::ProgressCallback;
use crate::Result;
use crate::Rule;
use crate::RuleSet;
use crate::copy::CopyBuffer;
use crate::types::Destination;
use crate::types::EntryKind;
use crate::types::EntryPath;

use super::write::create_directory;
use super::write::is_same_file;
use super::write::replicate_file;
use super::write::write_file;

/// A rule whose destination has been resolved.
#[derive(Debug)]
struct ResolvedRule<'a> {
    destination: Destination,
    rule: &'a Rule,
}

/// Walks a tar stream once and materializes the entries matching a rule set.
///
/// The engine owns the copy buffer, so one engine can run several
/// extractions without reallocating it.
#[derive(Debug)]
pub struct ExtractionEngine {
    config: ExtractConfig,
    copy_buffer: CopyBuffer,
}

impl ExtractionEngine {
    /// Creates a new extraction engine with the given configuration.
    #[must_use]
    pub fn new(config: ExtractConfig) -> Self {
        Self {
            config,
            copy_buffer: CopyBuffer::new(),
        }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extracts every entry of `stream` that matches a rule of `rules`.
    ///
    /// The stream is read strictly forward and dropped when this returns,
    /// whatever the outcome. Files written before an error are left in
    /// place.
    ///
    /// # Errors
    ///
    /// - [`ExtractionError::InvalidConfig`] if the configuration is invalid
    /// - [`ExtractionError::DestinationResolution`] if a destination cannot
    ///   be made absolute
    /// - [`ExtractionError::Stream`] if the tar stream is corrupt,
    ///   truncated or unreadable
    /// - [`ExtractionError::CreateDirectory`] or
    ///   [`ExtractionError::WriteFile`] on filesystem failures
    pub fn extract<R: Read>(
        &mut self,
        stream: R,
        rules: &RuleSet,
        progress: &mut dyn ProgressCallback,
    ) -> Result<ExtractionReport> {
        let start = Instant::now();
        self.config.validate()?;

        let resolved = resolve_rules(rules)?;
        let mut report = ExtractionReport::new();

        let mut archive = tar::Archive::new(stream);
        let entries = archive.entries().map_err(ExtractionError::Stream)?;

        for (index, entry) in entries.enumerate() {
            let mut entry = entry.map_err(ExtractionError::Stream)?;
            report.entries_seen += 1;

            let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
            let matched: Vec<&Destination> = resolved
                .iter()
                .filter(|resolved| resolved.rule.matches(&name))
                .map(|resolved| &resolved.destination)
                .collect();

            if matched.is_empty() {
                trace!("no rule matches {name}");
                continue;
            }

            report.entries_matched += 1;
            progress.on_entry_start(&name, index + 1);
            let extracted = self.extract_entry(&mut entry, &name, &matched, &mut report, progress);
            if let Err(err) = extracted {
                if err.is_filesystem_error() {
                    warn!(
                        "aborting at {name}: {err} ({} files already written)",
                        report.files_written
                    );
                }
                return Err(err);
            }
            progress.on_entry_complete(&name);
        }

        report.duration = start.elapsed();
        info!(
            "extracted {} items ({} files, {} directories, {} bytes) from {} entries in {:?}",
            report.total_items(),
            report.files_written,
            report.directories_created,
            report.bytes_written,
            report.entries_seen,
            report.duration
        );
        progress.on_complete();

        Ok(report)
    }

    fn extract_entry<R: Read>(
        &mut self,
        entry: &mut tar::Entry<'_, R>,
        name: &str,
        matched: &[&Destination],
        report: &mut ExtractionReport,
        progress: &mut dyn ProgressCallback,
    ) -> Result<()> {
        let kind = EntryKind::from(entry.header().entry_type());

        if let EntryKind::Unsupported(entry_type) = kind {
            debug!("skipping {name}: unsupported entry type {entry_type:?}");
            report.entries_skipped += 1;
            return Ok(());
        }

        let entry_path = match entry
            .path()
            .map_err(ExtractionError::Stream)
            .and_then(|path| EntryPath::new(&path))
        {
            Ok(entry_path) => entry_path,
            Err(err) if err.is_recoverable() => {
                skip_unsafe(report, name, &err.to_string());
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        if kind.is_directory() {
            for destination in matched {
                let target = destination.join(&entry_path);
                debug!("creating directory {}", target.display());
                create_directory(&target, self.config.dir_mode)?;
                report.directories_created += 1;
            }
            return Ok(());
        }

        if entry_path.is_empty() {
            skip_unsafe(report, name, "file entry has no name");
            return Ok(());
        }

        let targets: Vec<PathBuf> = matched.iter().map(|d| d.join(&entry_path)).collect();
        self.write_targets(entry, &targets, report, progress)
    }

    fn write_targets<R: Read>(
        &mut self,
        entry: &mut tar::Entry<'_, R>,
        targets: &[PathBuf],
        report: &mut ExtractionReport,
        progress: &mut dyn ProgressCallback,
    ) -> Result<()> {
        let size = entry.size();

        match targets {
            [] => {}
            [target] => {
                debug!("writing {} ({size} bytes)", target.display());
                let written = write_file(entry, target, &self.config, &mut self.copy_buffer)?;
                record_file(report, progress, written);
            }
            _ if size <= self.config.max_buffer_size => {
                let mut content = Vec::new();
                entry
                    .read_to_end(&mut content)
                    .map_err(ExtractionError::Stream)?;

                for (position, target) in targets.iter().enumerate() {
                    debug!("writing {} ({size} bytes, buffered)", target.display());
                    let written = write_file(
                        &mut content.as_slice(),
                        target,
                        &self.config,
                        &mut self.copy_buffer,
                    )?;
                    if !already_written(&targets[..position], target) {
                        record_file(report, progress, written);
                    }
                }
            }
            [first, rest @ ..] => {
                debug!("writing {} ({size} bytes)", first.display());
                let written = write_file(entry, first, &self.config, &mut self.copy_buffer)?;
                record_file(report, progress, written);

                for (position, target) in rest.iter().enumerate() {
                    debug!("replicating {} to {}", first.display(), target.display());
                    match replicate_file(first, target, &self.config, &mut self.copy_buffer)? {
                        Some(written) if !already_written(&rest[..position], target) => {
                            record_file(report, progress, written);
                        }
                        Some(_) => {}
                        None => {
                            debug!("{} is {} under another name", target.display(), first.display());
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

impl Default for ExtractionEngine {
    fn default() -> Self {
        Self::new(ExtractConfig::default())
    }
}

fn resolve_rules(rules: &RuleSet) -> Result<Vec<ResolvedRule<'_>>> {
    let mut resolved = Vec::with_capacity(rules.len());

    for rule in rules {
        let destination = Destination::resolve(rule.destination())?;
        debug!(
            "rule {} -> {}",
            rule.pattern(),
            destination.as_path().display()
        );
        resolved.push(ResolvedRule { destination, rule });
    }

    Ok(resolved)
}

/// Destination paths are lexical, so two rules can name the same directory
/// differently (`out` and `./out`, `a/../out`). A file is counted once.
fn already_written(written: &[PathBuf], target: &Path) -> bool {
    written
        .iter()
        .any(|previous| is_same_file(previous, target))
}

fn record_file(report: &mut ExtractionReport, progress: &mut dyn ProgressCallback, written: u64) {
    report.files_written += 1;
    report.bytes_written += written;
    progress.on_bytes_written(written);
}

fn skip_unsafe(report: &mut ExtractionReport, name: &str, reason: &str) {
    warn!("skipping {name}: {reason}");
    report.entries_skipped += 1;
    report.add_warning(format!("skipped {name}: {reason}"));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::NoopProgress;
    use crate::test_utils::TarTestBuilder;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn run(tar: Vec<u8>, rules: &RuleSet, config: ExtractConfig) -> Result<ExtractionReport> {
        let mut engine = ExtractionEngine::new(config);
        engine.extract(Cursor::new(tar), rules, &mut NoopProgress)
    }

    #[derive(Default)]
    struct Recording {
        started: Vec<(String, usize)>,
        bytes: u64,
        completed: usize,
        finished: bool,
    }

    impl ProgressCallback for Recording {
        fn on_entry_start(&mut self, name: &str, index: usize) {
            self.started.push((name.to_string(), index));
        }

        fn on_bytes_written(&mut self, bytes: u64) {
            self.bytes += bytes;
        }

        fn on_entry_complete(&mut self, _name: &str) {
            self.completed += 1;
        }

        fn on_complete(&mut self) {
            self.finished = true;
        }
    }

    #[test]
    fn test_truncated_multi_match_entry_is_stream_error() {
        let temp = TempDir::new().unwrap();
        let mut header = tar::Header::new_gnu();
        header.set_path("big.bin").unwrap();
        header.set_size(32 * 1024 * 1024);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        let mut tar = header.as_bytes().to_vec();
        tar.extend_from_slice(&[0x5A; 1000]);
        let rules: RuleSet = [(temp.path().join("a"), "*"), (temp.path().join("b"), "*")]
            .into_iter()
            .collect();

        let result = run(tar, &rules, ExtractConfig::default());
        assert!(matches!(result, Err(ExtractionError::Stream(_))));
    }

    #[test]
    fn test_empty_stream_succeeds() {
        let temp = TempDir::new().unwrap();
        let rules = RuleSet::single(temp.path(), "*");

        let report = run(Vec::new(), &rules, ExtractConfig::default()).unwrap();
        assert_eq!(report.entries_seen, 0);
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_empty_rule_set_walks_stream() {
        let tar = TarTestBuilder::new()
            .add_file("a.txt", b"a")
            .add_file("b.txt", b"b")
            .build();

        let report = run(tar, &RuleSet::new(), ExtractConfig::default()).unwrap();
        assert_eq!(report.entries_seen, 2);
        assert_eq!(report.entries_matched, 0);
        assert_eq!(report.files_written, 0);
    }

    #[test]
    fn test_unmatched_entries_not_written() {
        let temp = TempDir::new().unwrap();
        let tar = TarTestBuilder::new()
            .add_file("keep.json", b"{}")
            .add_file("drop.md", b"hello")
            .build();
        let rules = RuleSet::single(temp.path(), "*.json");

        let report = run(tar, &rules, ExtractConfig::default()).unwrap();
        assert_eq!(report.files_written, 1);
        assert!(temp.path().join("keep.json").exists());
        assert!(!temp.path().join("drop.md").exists());
    }

    #[test]
    fn test_invalid_config_rejected_before_reading() {
        let rules = RuleSet::single("/unused", "*");
        let config = ExtractConfig::default().with_file_mode(0o17777);

        let result = run(b"not a tar".to_vec(), &rules, config);
        assert!(matches!(result, Err(ExtractionError::InvalidConfig { .. })));
    }

    #[test]
    fn test_empty_destination_fails() {
        let tar = TarTestBuilder::new().add_file("a", b"a").build();
        let rules = RuleSet::single("", "*");

        let result = run(tar, &rules, ExtractConfig::default());
        assert!(matches!(
            result,
            Err(ExtractionError::DestinationResolution { .. })
        ));
    }

    #[test]
    fn test_root_directory_entry_maps_to_destination() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("fresh");
        let tar = TarTestBuilder::new().add_raw_directory("./").build();
        let rules = RuleSet::single(&dest, "*");

        let report = run(tar, &rules, ExtractConfig::default()).unwrap();
        assert_eq!(report.directories_created, 1);
        assert!(dest.is_dir());
    }

    #[test]
    fn test_unsupported_entries_skipped() {
        let temp = TempDir::new().unwrap();
        let tar = TarTestBuilder::new()
            .add_file("target", b"data")
            .add_symlink("link", "target")
            .add_hardlink("hard", "target")
            .build();
        let rules = RuleSet::single(temp.path(), "*");

        let report = run(tar, &rules, ExtractConfig::default()).unwrap();
        assert_eq!(report.files_written, 1);
        assert_eq!(report.entries_skipped, 2);
        assert!(!temp.path().join("link").exists());
        assert!(!temp.path().join("hard").exists());
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_traversal_entry_skipped_with_warning() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("dest");
        let tar = TarTestBuilder::new()
            .add_raw_file("../escape.txt", b"nope")
            .add_file("ok.txt", b"ok")
            .build();
        let rules = RuleSet::single(&dest, "*");

        let report = run(tar, &rules, ExtractConfig::default()).unwrap();
        assert_eq!(report.files_written, 1);
        assert_eq!(report.entries_skipped, 1);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("../escape.txt"));
        assert!(!temp.path().join("escape.txt").exists());
        assert!(dest.join("ok.txt").exists());
    }

    #[test]
    fn test_progress_events() {
        let temp = TempDir::new().unwrap();
        let tar = TarTestBuilder::new()
            .add_file("skip.md", b"skip")
            .add_file("one.json", b"12345")
            .build();
        let rules = RuleSet::single(temp.path(), "*.json");
        let mut progress = Recording::default();

        let mut engine = ExtractionEngine::default();
        engine
            .extract(Cursor::new(tar), &rules, &mut progress)
            .unwrap();

        assert_eq!(progress.started, vec![("one.json".to_string(), 2)]);
        assert_eq!(progress.bytes, 5);
        assert_eq!(progress.completed, 1);
        assert!(progress.finished);
    }

    #[test]
    fn test_engine_reusable() {
        let temp = TempDir::new().unwrap();
        let rules = RuleSet::single(temp.path(), "*");
        let mut engine = ExtractionEngine::default();

        for _ in 0..2 {
            let tar = TarTestBuilder::new().add_file("f", b"data").build();
            let report = engine
                .extract(Cursor::new(tar), &rules, &mut NoopProgress)
                .unwrap();
            assert_eq!(report.files_written, 1);
        }
        assert_eq!(engine.config(), &ExtractConfig::default());
    }
}
