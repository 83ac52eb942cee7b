//! Typed errors for index construction and query resolution.
//!
//! Precondition violations surface here and are never retried. A query with
//! zero hits is not an error; it resolves to an empty interval.

use thiserror::Error;

/// Violations of the text / suffix array / prefix table contracts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("text is empty")]
    EmptyText,

    #[error("text of {len} bytes exceeds the {max} byte limit")]
    TextTooLarge { len: usize, max: usize },

    #[error("text must end with the sentinel byte {sentinel:?}")]
    MissingSentinel { sentinel: char },

    #[error("sentinel byte found at position {position}, expected only at {expected}")]
    MisplacedSentinel { position: usize, expected: usize },

    #[error("suffix array has {actual} entries but text has {expected} bytes")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("suffix array entry {value} at rank {rank} is out of range or repeated")]
    NotAPermutation { rank: usize, value: usize },

    #[error("rank 0 must hold the sentinel suffix {expected}, found {actual}")]
    SentinelNotFirst { expected: usize, actual: usize },

    #[error("suffix at rank {rank} sorts below its predecessor")]
    NotSorted { rank: usize },

    #[error("prefix length {k} is outside 1..={max}")]
    InvalidPrefixLength { k: usize, max: usize },

    #[error("prefix table entry [{start}, {end}) lies outside 0..={len}")]
    InvalidTableEntry { start: usize, end: usize, len: usize },

    #[error("invalid {file}: {reason}")]
    Corrupt { file: &'static str, reason: String },
}

/// Per-query precondition failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("pattern of length {len} is shorter than the prefix table length {k}")]
    PatternTooShort { len: usize, k: usize },

    #[error("query {name}: {source}")]
    Failed {
        name: String,
        #[source]
        source: Box<QueryError>,
    },
}
