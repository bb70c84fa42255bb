//! Selective extraction of container image filesystems.
//!
//! `tarsift-core` walks the tar stream of a flattened image filesystem once
//! and writes the entries that match caller-supplied
//! `(destination directory, glob pattern)` rules onto the local filesystem.
//!
//! # Examples
//!
//! ```no_run
//! use tarsift_core::RuleSet;
//! use tarsift_core::extract;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let stream = std::fs::File::open("rootfs.tar")?;
//! let rules = RuleSet::single("./out", "/usr/bin/*");
//! extract(stream, &rules)?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod copy;
pub mod error;
pub mod extraction;
pub mod pattern;
pub mod report;
pub mod rules;
pub mod source;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;

pub use api::extract;
pub use api::extract_source;
pub use api::extract_with_config;
pub use api::extract_with_progress;
pub use config::DEFAULT_DIR_MODE;
pub use config::DEFAULT_FILE_MODE;
pub use config::ExtractConfig;
pub use error::ExtractionError;
pub use error::Result;
pub use pattern::matches;
pub use report::ExtractionReport;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use rules::Rule;
pub use rules::RuleSet;
pub use source::FilesystemSource;
pub use source::TarballSource;

pub use types::Destination;
pub use types::EntryKind;
pub use types::EntryPath;
