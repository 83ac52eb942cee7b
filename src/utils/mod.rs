//! Utility functions shared by the build and query pipelines.
//!
//! - [`encoding`] - Base-4 nucleotide encoding and little-endian helpers
//! - [`fasta`] - FASTA record parsing
//! - [`progress`] - Progress spinners (no-op without the `progress` feature)

pub mod encoding;
pub mod fasta;
pub mod progress;

pub use encoding::*;
pub use fasta::*;
