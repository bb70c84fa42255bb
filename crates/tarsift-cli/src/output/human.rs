//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use crate::progress::humanize_bytes;
use anyhow::Result;
use console::Term;
use console::style;
use tarsift_core::ExtractionReport;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn summary_lines(&self, report: &ExtractionReport) -> Vec<String> {
        let mut lines = vec![
            format!("  Files written: {}", report.files_written),
            format!("  Directories: {}", report.directories_created),
            format!("  Total size: {}", humanize_bytes(report.bytes_written)),
        ];

        if report.entries_skipped > 0 {
            lines.push(format!("  Entries skipped: {}", report.entries_skipped));
        }

        if report.has_warnings() {
            lines.extend(
                report
                    .warnings
                    .iter()
                    .map(|warning| format!("  Warning: {warning}")),
            );
        }

        if self.verbose {
            lines.push(format!(
                "  Entries matched: {} of {}",
                report.entries_matched, report.entries_seen
            ));
            lines.push(format!("  Duration: {:?}", report.duration));
        }

        lines
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_extraction_result(&self, report: &ExtractionReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.use_colors {
            let _ = self.term.write_line(&format!(
                "{} Extraction complete",
                style("✓").green().bold()
            ));
        } else {
            let _ = self.term.write_line("Extraction complete");
        }

        for line in self.summary_lines(report) {
            let _ = self.term.write_line(&line);
        }

        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = term.write_line(&format!("ERROR: {error:?}"));
        }
    }
}
