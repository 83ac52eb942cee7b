//! Index builder
//!
//! Builds a suffix index from FASTA records by:
//! 1. Upper-casing each record and replacing ambiguous bases with random ones
//! 2. Concatenating the records and appending the sentinel
//! 3. Sorting all suffixes with divsufsort
//! 4. Optionally scanning the sorted suffixes into a prefix table

use super::prefix_table::{self, PrefixTable};
use super::types::*;
use crate::error::IndexError;
use crate::utils::encoding::{BASES, encode_base};
use crate::utils::fasta::FastaRecord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Accumulates reference records and builds the index
pub struct IndexBuilder {
    config: BuildConfig,
    rng: StdRng,
    /// Normalized text, without the sentinel until `build`
    text: Vec<u8>,
    records: Vec<RecordBoundary>,
    ambiguous: u64,
}

impl IndexBuilder {
    pub fn new(config: BuildConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng,
            text: Vec::new(),
            records: Vec::new(),
            ambiguous: 0,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(BuildConfig::default())
    }

    /// Append a record to the text.
    ///
    /// Returns `false` if the record was skipped because only the first
    /// record is indexed.
    pub fn add_record(&mut self, record: &FastaRecord) -> bool {
        if self.config.first_record_only && !self.records.is_empty() {
            return false;
        }

        let start = self.text.len();
        self.text.reserve(record.sequence.len());
        for &byte in &record.sequence {
            let base = byte.to_ascii_uppercase();
            if encode_base(base).is_some() {
                self.text.push(base);
            } else {
                self.text.push(BASES[self.rng.gen_range(0..BASES.len())]);
                self.ambiguous += 1;
            }
        }

        self.records.push(RecordBoundary {
            name: record.name.clone(),
            start,
            end: self.text.len(),
        });
        true
    }

    /// Add every record, honoring `first_record_only`
    pub fn add_records<'r>(&mut self, records: impl IntoIterator<Item = &'r FastaRecord>) -> usize {
        records
            .into_iter()
            .filter(|record| self.add_record(record))
            .count()
    }

    /// Symbols accumulated so far (sentinel excluded)
    pub fn text_size(&self) -> usize {
        self.text.len()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Ambiguous bases replaced so far
    pub fn ambiguous_count(&self) -> u64 {
        self.ambiguous
    }

    /// Sort the suffixes and build the optional prefix table
    pub fn build(self) -> Result<BuiltIndex, IndexError> {
        if let Some(k) = self.config.prefix_len {
            prefix_table::check_prefix_len(k)?;
        }

        let mut text = self.text;
        text.push(SENTINEL);

        let started = Instant::now();
        let suffix_array = build_suffix_array(&text)?;
        info!(
            text_len = text.len(),
            elapsed = ?started.elapsed(),
            "sorted suffixes"
        );

        let table = match self.config.prefix_len {
            Some(k) => {
                let started = Instant::now();
                let table = PrefixTable::build(&text, suffix_array.as_slice(), k)?;
                info!(
                    k,
                    occupied = table.occupied(),
                    slots = table.slot_count(),
                    elapsed = ?started.elapsed(),
                    "built prefix table"
                );
                Some(table)
            }
            None => None,
        };

        let meta = IndexMeta {
            version: INDEX_VERSION,
            text_len: text.len(),
            records: self.records,
            ambiguous_resolved: self.ambiguous,
            prefix_len: self.config.prefix_len,
            config: self.config,
            created_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        };

        let index = SuffixIndex::new(text, suffix_array)?.with_prefix_table(table);
        debug!(records = meta.records.len(), ambiguous = meta.ambiguous_resolved, "index built");

        Ok(BuiltIndex { index, meta })
    }
}

/// Result of building an index
#[derive(Debug, Clone)]
pub struct BuiltIndex {
    pub index: SuffixIndex,
    pub meta: IndexMeta,
}

/// Longest text divsufsort can index (its ranks are `i32`)
pub const MAX_TEXT_LEN: usize = i32::MAX as usize;

/// Suffix array of `text` in linear-ish time, independent of how repetitive
/// the text is.
///
/// The sentinel is unique, so no two suffixes compare equal.
pub fn build_suffix_array(text: &[u8]) -> Result<Vec<usize>, IndexError> {
    if text.len() > MAX_TEXT_LEN {
        return Err(IndexError::TextTooLarge {
            len: text.len(),
            max: MAX_TEXT_LEN,
        });
    }

    let mut sa = vec![0i32; text.len()];
    divsufsort::sort_in_place(text, &mut sa);
    Ok(sa.into_iter().map(|pos| pos as usize).collect())
}
