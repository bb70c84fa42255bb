//! Streaming tar walk and the filesystem writes it performs.

pub mod engine;
pub mod write;

pub use engine::ExtractionEngine;
