//! Extraction reporting and progress callbacks.

use std::time::Duration;

/// Report of an extraction run.
///
/// File and directory counters are per destination: an entry written into
/// two destinations counts twice.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Number of tar entries read from the stream.
    pub entries_seen: usize,

    /// Number of entries matched by at least one rule.
    pub entries_matched: usize,

    /// Number of files written.
    pub files_written: usize,

    /// Number of directory entries materialized.
    pub directories_created: usize,

    /// Number of matched entries that were not written (unsupported kind or
    /// unsafe name).
    pub entries_skipped: usize,

    /// Total bytes written to disk.
    pub bytes_written: u64,

    /// Duration of the extraction.
    pub duration: Duration,

    /// Warnings generated during extraction.
    pub warnings: Vec<String>,
}

impl ExtractionReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Returns the number of filesystem objects written.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_written + self.directories_created
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Callback trait for progress reporting during extraction.
///
/// The stream length is unknown up front, so callbacks receive a running
/// entry index rather than a total.
///
/// # Examples
///
/// ```
/// use tarsift_core::ProgressCallback;
///
/// struct Printer;
///
/// impl ProgressCallback for Printer {
///     fn on_entry_start(&mut self, name: &str, index: usize) {
///         println!("#{index}: {name}");
///     }
///
///     fn on_bytes_written(&mut self, _bytes: u64) {}
///
///     fn on_entry_complete(&mut self, _name: &str) {}
///
///     fn on_complete(&mut self) {
///         println!("done");
///     }
/// }
/// ```
pub trait ProgressCallback {
    /// Called before an entry matched by at least one rule is extracted.
    ///
    /// `index` is the 1-based position of the entry in the stream.
    fn on_entry_start(&mut self, name: &str, index: usize);

    /// Called after bytes have been written to a destination file.
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called when all rules have been applied to an entry.
    fn on_entry_complete(&mut self, name: &str);

    /// Called once the end of the stream has been reached.
    fn on_complete(&mut self);
}

/// `ProgressCallback` that ignores every event.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _name: &str, _index: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_entry_complete(&mut self, _name: &str) {}

    fn on_complete(&mut self) {}
}
