//! Prefix lookup table
//!
//! Maps every k-length prefix that occurs in the text to the contiguous run of
//! suffix array ranks whose suffixes start with it. Lookups narrow a query's
//! binary search to that run, or reject the query outright when its first `k`
//! symbols never occur.
//!
//! Slots are dense (`4^k` of them) and keyed by [`encode_prefix`]; a slot is
//! `None` when the prefix does not occur.

use super::types::{IndexInterval, MAX_PREFIX_LEN, Suffixes};
use crate::error::{IndexError, QueryError};
use crate::utils::encoding::encode_prefix;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixTable {
    k: usize,
    slots: Vec<Option<IndexInterval>>,
}

/// A run of equal k-prefixes that has been opened but not yet closed
struct OpenRun<'t> {
    prefix: &'t [u8],
    code: u32,
    start: usize,
}

impl<'t> OpenRun<'t> {
    fn open(prefix: &'t [u8], start: usize) -> Option<Self> {
        let code = encode_prefix(prefix)?;
        Some(Self { prefix, code, start })
    }
}

impl PrefixTable {
    /// Build the table by scanning the suffix array once.
    ///
    /// Rank 0 (the sentinel suffix) is skipped. Suffixes with fewer than `k`
    /// symbols before the sentinel close the current run without opening one.
    pub fn build<S: Suffixes + ?Sized>(
        text: &[u8],
        suffixes: &S,
        k: usize,
    ) -> Result<Self, IndexError> {
        check_prefix_len(k)?;
        let mut table = Self::empty(k);

        let n = suffixes.suffix_count();
        // Symbols before the sentinel
        let body_len = text.len().saturating_sub(1);
        let mut run: Option<OpenRun<'_>> = None;

        for rank in 1..n {
            let pos = suffixes.suffix_at(rank);
            let prefix = (body_len.saturating_sub(pos) >= k).then(|| &text[pos..pos + k]);

            match (run.take(), prefix) {
                (Some(open), Some(prefix)) if open.prefix == prefix => run = Some(open),
                (open, prefix) => {
                    if let Some(open) = open {
                        table.close(open, rank);
                    }
                    run = prefix.and_then(|p| OpenRun::open(p, rank));
                }
            }
        }

        if let Some(open) = run {
            table.close(open, n);
        }

        Ok(table)
    }

    /// Rebuild a table from its occupied entries (as persisted in preftab.bin).
    ///
    /// `text_len` bounds the intervals.
    pub fn from_entries<I>(k: usize, text_len: usize, entries: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = (u32, IndexInterval)>,
    {
        check_prefix_len(k)?;
        let mut table = Self::empty(k);
        let slot_count = table.slots.len();

        for (code, interval) in entries {
            if interval.start > interval.end || interval.end > text_len {
                return Err(IndexError::InvalidTableEntry {
                    start: interval.start,
                    end: interval.end,
                    len: text_len,
                });
            }
            let slot = table.slots.get_mut(code as usize).ok_or_else(|| IndexError::Corrupt {
                file: "preftab.bin",
                reason: format!("prefix code {code} exceeds {slot_count} slots"),
            })?;
            *slot = Some(interval);
        }

        Ok(table)
    }

    fn empty(k: usize) -> Self {
        Self {
            k,
            slots: vec![None; 1usize << (2 * k)],
        }
    }

    fn close(&mut self, run: OpenRun<'_>, end: usize) {
        self.slots[run.code as usize] = Some(IndexInterval::new(run.start, end));
    }

    /// Prefix length
    pub fn k(&self) -> usize {
        self.k
    }

    /// Total number of slots (`4^k`)
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of prefixes that occur in the text
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// The run for an encoded prefix, if it occurs
    pub fn get(&self, code: u32) -> Option<IndexInterval> {
        self.slots.get(code as usize).copied().flatten()
    }

    /// The run for the first `k` symbols of `pattern`.
    ///
    /// `Ok(None)` means the prefix never occurs (including prefixes with
    /// symbols outside the nucleotide alphabet).
    pub fn lookup(&self, pattern: &[u8]) -> Result<Option<IndexInterval>, QueryError> {
        if pattern.len() < self.k {
            return Err(QueryError::PatternTooShort {
                len: pattern.len(),
                k: self.k,
            });
        }
        Ok(encode_prefix(&pattern[..self.k]).and_then(|code| self.get(code)))
    }

    /// Occupied slots in code order
    pub fn iter(&self) -> impl Iterator<Item = (u32, IndexInterval)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(code, slot)| slot.map(|interval| (code as u32, interval)))
    }
}

pub(crate) fn check_prefix_len(k: usize) -> Result<(), IndexError> {
    if (1..=MAX_PREFIX_LEN).contains(&k) {
        Ok(())
    } else {
        Err(IndexError::InvalidPrefixLength {
            k,
            max: MAX_PREFIX_LEN,
        })
    }
}
