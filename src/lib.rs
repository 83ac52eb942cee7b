//! # dnasa - exact substring search over genomes
//!
//! dnasa answers exact-substring queries against a fixed reference sequence
//! using a precomputed suffix array, optionally narrowed by a table of
//! fixed-length prefixes.
//!
//! ## Architecture
//!
//! - [`index`] - Building, persisting and memory-mapping suffix indexes,
//!   including the prefix table
//! - [`query`] - Interval search strategies (naive and LCP-accelerated binary
//!   search) and query resolution
//! - [`output`] - Result formatting
//! - [`utils`] - FASTA parsing, nucleotide encoding, progress spinners
//! - [`error`] - Typed index and query errors
//!
//! ## Quick Start
//!
//! ```
//! use dnasa::index::{BuildConfig, IndexBuilder};
//! use dnasa::query::{QueryMode, QueryResolver};
//! use dnasa::utils::FastaRecord;
//!
//! let mut builder = IndexBuilder::new(BuildConfig {
//!     prefix_len: Some(2),
//!     ..Default::default()
//! });
//! builder.add_record(&FastaRecord {
//!     name: "chr1".into(),
//!     sequence: b"ACCAAGATAGCTAC".to_vec(),
//! });
//! let built = builder.build().unwrap();
//!
//! let resolver = QueryResolver::with_mode(QueryMode::SimpAccel);
//! let interval = resolver.resolve(built.index.view(), b"TA").unwrap();
//! assert_eq!(built.index.positions(interval), vec![11, 7]);
//! ```
//!
//! ## Search
//!
//! Both strategies return the half-open interval of suffix array ranks whose
//! suffixes start with the pattern. The accelerated strategy tracks the
//! longest common prefix with each fence and skips characters already known
//! to match.

pub mod error;
pub mod index;
pub mod output;
pub mod query;
pub mod utils;
