//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;

/// Largest permission bits accepted for `--file-mode` and `--dir-mode`.
const MAX_MODE: u32 = 0o7777;

#[derive(Parser)]
#[command(name = "tarsift")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract matching entries of an image filesystem tarball
    Extract(ExtractArgs),
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Flattened filesystem tarball, optionally compressed ('-' reads stdin)
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Directory the matching entries are written to
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Glob pattern entry names must match ('*' matches any characters)
    #[arg(short, long, default_value = "*")]
    pub pattern: String,

    /// Additional destination rule (can be repeated)
    #[arg(short, long = "rule", value_name = "DIR=PATTERN", value_parser = parse_rule)]
    pub rules: Vec<(PathBuf, String)>,

    /// Permission bits for created files, in octal [default: 777]
    #[arg(long, value_name = "MODE", value_parser = parse_mode)]
    pub file_mode: Option<u32>,

    /// Permission bits for created directories, in octal [default: 755]
    #[arg(long, value_name = "MODE", value_parser = parse_mode)]
    pub dir_mode: Option<u32>,

    /// Largest entry held in memory when it matches several rules
    #[arg(long, value_name = "SIZE", value_parser = parse_byte_size)]
    pub max_buffer_size: Option<u64>,
}

/// Parse a `DIR=PATTERN` rule
fn parse_rule(s: &str) -> Result<(PathBuf, String), String> {
    let (dir, pattern) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid rule '{s}': expected DIR=PATTERN"))?;

    if dir.is_empty() {
        return Err(format!("invalid rule '{s}': empty directory"));
    }

    Ok((PathBuf::from(dir), pattern.to_string()))
}

/// Parse octal permission bits (`755`, `0755` or `0o755`)
fn parse_mode(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let digits = s.strip_prefix("0o").unwrap_or(s);

    let mode = u32::from_str_radix(digits, 8).map_err(|_| format!("invalid octal mode: {s}"))?;
    if mode > MAX_MODE {
        return Err(format!("mode {s} exceeds {MAX_MODE:o}"));
    }

    Ok(mode)
}

/// Parse byte size with optional suffix (K, M, G, T)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('T') {
        (stripped, 1024_u64.pow(4))
    } else if let Some(stripped) = s.strip_suffix('G') {
        (stripped, 1024_u64.pow(3))
    } else if let Some(stripped) = s.strip_suffix('M') {
        (stripped, 1024_u64.pow(2))
    } else if let Some(stripped) = s.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (s, 1)
    };

    num_str
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rule() {
        assert_eq!(
            parse_rule("./bin=/usr/bin/*").unwrap(),
            (PathBuf::from("./bin"), "/usr/bin/*".to_string())
        );
        assert_eq!(
            parse_rule("out=a=b").unwrap(),
            (PathBuf::from("out"), "a=b".to_string())
        );
        assert_eq!(parse_rule("out=").unwrap().1, "");
        assert!(parse_rule("no-separator").is_err());
        assert!(parse_rule("=*").is_err());
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("755").unwrap(), 0o755);
        assert_eq!(parse_mode("0644").unwrap(), 0o644);
        assert_eq!(parse_mode("0o700").unwrap(), 0o700);
        assert_eq!(parse_mode("7777").unwrap(), 0o7777);
        assert!(parse_mode("17777").is_err());
        assert!(parse_mode("999").is_err());
        assert!(parse_mode("").is_err());
    }

    #[test]
    fn test_parse_byte_size() {
        assert_eq!(parse_byte_size("100").unwrap(), 100);
        assert_eq!(parse_byte_size("1K").unwrap(), 1024);
        assert_eq!(parse_byte_size("2M").unwrap(), 2 * 1024 * 1024);
        assert_eq!(parse_byte_size("3G").unwrap(), 3 * 1024 * 1024 * 1024);
        assert_eq!(parse_byte_size("1T").unwrap(), 1024_u64.pow(4));
        assert!(parse_byte_size("invalid").is_err());
        assert!(parse_byte_size("").is_err());
    }

    #[test]
    fn test_parse_byte_size_overflow() {
        assert!(parse_byte_size("18446744073709551615K").is_err());
        assert!(parse_byte_size("17592186044416G").is_err());
    }

    #[test]
    fn test_extract_defaults() {
        let cli = Cli::try_parse_from(["tarsift", "extract", "rootfs.tar", "out"]).unwrap();
        let Commands::Extract(args) = cli.command;

        assert_eq!(args.source, PathBuf::from("rootfs.tar"));
        assert_eq!(args.directory, PathBuf::from("out"));
        assert_eq!(args.pattern, "*");
        assert!(args.rules.is_empty());
        assert_eq!(args.file_mode, None);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_extract_all_options() {
        let cli = Cli::try_parse_from([
            "tarsift",
            "extract",
            "-",
            "out",
            "-p",
            "/etc/*",
            "--rule",
            "bin=/usr/bin/*",
            "-r",
            "lib=/usr/lib/*",
            "--file-mode",
            "644",
            "--dir-mode",
            "0700",
            "--max-buffer-size",
            "1M",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        let Commands::Extract(args) = cli.command;

        assert_eq!(args.pattern, "/etc/*");
        assert_eq!(args.rules.len(), 2);
        assert_eq!(args.file_mode, Some(0o644));
        assert_eq!(args.dir_mode, Some(0o700));
        assert_eq!(args.max_buffer_size, Some(1024 * 1024));
    }
}
