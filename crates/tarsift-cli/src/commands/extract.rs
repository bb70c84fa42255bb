//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::error::add_source_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use log::debug;
use std::io;
use std::path::Path;
use tarsift_core::ExtractConfig;
use tarsift_core::NoopProgress;
use tarsift_core::ProgressCallback;
use tarsift_core::RuleSet;
use tarsift_core::TarballSource;
use tarsift_core::extract_source;
use tarsift_core::extract_with_progress;
use tarsift_core::source::decode_stream;

pub fn execute(
    args: &ExtractArgs,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    let config = build_config(args);
    let rules = build_rules(args);

    for rule in &rules {
        debug!("rule {} -> {}", rule.pattern(), rule.destination().display());
    }

    // Use a spinner if TTY is detected (not quiet, not JSON, is terminal)
    let mut progress: Box<dyn ProgressCallback> = if show_progress && CliProgress::should_show() {
        Box::new(CliProgress::new("Extracting"))
    } else {
        Box::new(NoopProgress)
    };

    let result = if args.source == Path::new("-") {
        decode_stream(io::stdin().lock())
            .and_then(|stream| extract_with_progress(stream, &rules, &config, progress.as_mut()))
    } else {
        let source = TarballSource::new(&args.source);
        extract_source(&source, &rules, &config, progress.as_mut())
    };
    drop(progress);

    let report = add_source_context(result, &args.source)?;
    formatter.format_extraction_result(&report)?;

    Ok(())
}

fn build_config(args: &ExtractArgs) -> ExtractConfig {
    let mut config = ExtractConfig::default();

    if let Some(mode) = args.file_mode {
        config = config.with_file_mode(mode);
    }
    if let Some(mode) = args.dir_mode {
        config = config.with_dir_mode(mode);
    }
    if let Some(size) = args.max_buffer_size {
        config = config.with_max_buffer_size(size);
    }

    config
}

/// The positional `DIRECTORY`/`--pattern` rule first, then every `--rule`.
/// A later rule for the same directory replaces the earlier pattern.
fn build_rules(args: &ExtractArgs) -> RuleSet {
    let mut rules = RuleSet::single(&args.directory, &args.pattern);
    rules.extend(args.rules.iter().cloned());
    rules
}
