//! Suffix index construction, persistence and reading
//!
//! - `builder`: normalizes FASTA records and sorts the suffixes
//! - `prefix_table`: fixed-length prefix lookup over the sorted suffixes
//! - `writer` / `reader`: the on-disk directory format (memory-mapped reads)
//! - `stats`: summaries for the `stats` command
//! - `types`: shared index types and validation

pub mod builder;
pub mod prefix_table;
pub mod reader;
pub mod stats;
pub mod types;
pub mod writer;

pub use builder::{BuiltIndex, IndexBuilder};
pub use prefix_table::PrefixTable;
pub use reader::{IndexReader, MappedSuffixes};
pub use types::*;
pub use writer::IndexWriter;
