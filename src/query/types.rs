//! Query input and result types

use crate::index::types::IndexInterval;
use crate::utils::fasta::FastaRecord;
use serde::Serialize;

/// A named pattern to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub name: String,
    pub pattern: Vec<u8>,
}

impl Query {
    pub fn new(name: impl Into<String>, pattern: impl AsRef<[u8]>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.as_ref().to_vec(),
        }
    }
}

impl From<FastaRecord> for Query {
    /// Query sequences are upper-cased the same way the reference is.
    /// Other symbols are kept and simply never match.
    fn from(record: FastaRecord) -> Self {
        let mut pattern = record.sequence;
        pattern.make_ascii_uppercase();
        Self {
            name: record.name,
            pattern,
        }
    }
}

/// The resolved interval for one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryHit {
    pub name: String,
    pub interval: IndexInterval,
}

impl QueryHit {
    /// Number of occurrences
    pub fn count(&self) -> usize {
        self.interval.len()
    }
}
