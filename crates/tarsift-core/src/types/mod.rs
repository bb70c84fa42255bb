//! Typed paths and entry classification used by the extractor.
//!
//! - [`Destination`]: a rule's destination resolved to an absolute path
//! - [`EntryPath`]: an entry name normalized to a relative path that stays
//!   below any destination
//! - [`EntryKind`]: how an entry is materialized

pub mod destination;
pub mod entry_kind;
pub mod entry_path;

pub use destination::Destination;
pub use entry_kind::EntryKind;
pub use entry_path::EntryPath;
