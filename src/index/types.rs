//! Types for suffix array indexing
//!
//! The text is an uppercase nucleotide sequence terminated by a single
//! [`SENTINEL`]. The suffix array is the permutation of text positions that
//! sorts every suffix; rank 0 is always the sentinel-only suffix.

use super::prefix_table::PrefixTable;
use crate::error::IndexError;
use crate::query::search::{IntervalSearch, NaiveSearch, SearchRange};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Terminal byte appended to every text; sorts below all nucleotides
pub const SENTINEL: u8 = b'$';

/// Largest supported prefix table length.
///
/// The table is dense: `4^12` slots of 24 bytes is already ~400 MB.
pub const MAX_PREFIX_LEN: usize = 12;

/// Magic number for index files
pub const INDEX_MAGIC: u32 = 0x4153_4E44; // "DNSA" in little-endian

/// Current version of the on-disk format
pub const INDEX_VERSION: u32 = 1;

/// Files making up an index directory
pub const TEXT_FILE: &str = "text.bin";
pub const SA_FILE: &str = "sa.bin";
pub const PREFTAB_FILE: &str = "preftab.bin";
pub const META_FILE: &str = "meta.json";

/// Half-open range `[start, end)` of suffix array ranks.
///
/// `start == end` means zero hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct IndexInterval {
    pub start: usize,
    pub end: usize,
}

impl IndexInterval {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted interval [{start}, {end})");
        Self { start, end }
    }

    /// The interval reported when a pattern cannot occur at all
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Ranks covered by this interval
    pub fn ranks(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Random access to suffix array entries.
///
/// Implemented for in-memory arrays and for memory-mapped `sa.bin` files so the
/// search strategies run on either without copying.
pub trait Suffixes {
    /// Number of entries (equals the text length)
    fn suffix_count(&self) -> usize;

    /// Text position of the suffix with the given rank
    fn suffix_at(&self, rank: usize) -> usize;
}

impl Suffixes for [usize] {
    #[inline]
    fn suffix_count(&self) -> usize {
        self.len()
    }

    #[inline]
    fn suffix_at(&self, rank: usize) -> usize {
        self[rank]
    }
}

impl Suffixes for Vec<usize> {
    #[inline]
    fn suffix_count(&self) -> usize {
        self.len()
    }

    #[inline]
    fn suffix_at(&self, rank: usize) -> usize {
        self[rank]
    }
}

/// Borrowed view over a text, its suffix array and an optional prefix table
pub struct IndexView<'a, S: Suffixes + ?Sized> {
    pub text: &'a [u8],
    pub suffixes: &'a S,
    pub prefix_table: Option<&'a PrefixTable>,
}

impl<S: Suffixes + ?Sized> Clone for IndexView<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Suffixes + ?Sized> Copy for IndexView<'_, S> {}

impl<'a, S: Suffixes + ?Sized> IndexView<'a, S> {
    pub fn new(text: &'a [u8], suffixes: &'a S) -> Self {
        Self {
            text,
            suffixes,
            prefix_table: None,
        }
    }

    pub fn with_prefix_table(mut self, table: Option<&'a PrefixTable>) -> Self {
        self.prefix_table = table;
        self
    }

    /// Number of suffixes
    #[inline]
    pub fn len(&self) -> usize {
        self.suffixes.suffix_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The suffix with the given rank
    #[inline]
    pub fn suffix(&self, rank: usize) -> &'a [u8] {
        &self.text[self.suffixes.suffix_at(rank)..]
    }

    /// Text offsets of every suffix in `interval`, in suffix array order
    pub fn positions(&self, interval: IndexInterval) -> Vec<usize> {
        interval
            .ranks()
            .map(|rank| self.suffixes.suffix_at(rank))
            .collect()
    }
}

/// An owned, validated text + suffix array (+ optional prefix table)
#[derive(Debug, Clone)]
pub struct SuffixIndex {
    text: Vec<u8>,
    suffix_array: Vec<usize>,
    prefix_table: Option<PrefixTable>,
}

impl SuffixIndex {
    /// Validate and wrap a text and its suffix array
    pub fn new(text: Vec<u8>, suffix_array: Vec<usize>) -> Result<Self, IndexError> {
        validate_text(&text)?;
        validate_suffix_array(&text, suffix_array.as_slice())?;
        Ok(Self {
            text,
            suffix_array,
            prefix_table: None,
        })
    }

    /// Attach a prefix table built over this index
    pub fn with_prefix_table(mut self, table: Option<PrefixTable>) -> Self {
        self.prefix_table = table;
        self
    }

    pub fn text(&self) -> &[u8] {
        &self.text
    }

    pub fn suffix_array(&self) -> &[usize] {
        &self.suffix_array
    }

    pub fn prefix_table(&self) -> Option<&PrefixTable> {
        self.prefix_table.as_ref()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Borrow as a searchable view
    pub fn view(&self) -> IndexView<'_, [usize]> {
        IndexView::new(&self.text, self.suffix_array.as_slice())
            .with_prefix_table(self.prefix_table.as_ref())
    }

    /// Text offsets of every suffix in `interval`
    pub fn positions(&self, interval: IndexInterval) -> Vec<usize> {
        self.view().positions(interval)
    }

    /// Number of occurrences of `pattern`, searching the whole array
    pub fn count(&self, pattern: &[u8]) -> usize {
        NaiveSearch
            .interval(self.view(), pattern, SearchRange::full(self.len()))
            .len()
    }

    pub fn into_parts(self) -> (Vec<u8>, Vec<usize>, Option<PrefixTable>) {
        (self.text, self.suffix_array, self.prefix_table)
    }
}

/// Check the sentinel contract: non-empty, sentinel last and nowhere else
pub fn validate_text(text: &[u8]) -> Result<(), IndexError> {
    let Some(&last) = text.last() else {
        return Err(IndexError::EmptyText);
    };
    if last != SENTINEL {
        return Err(IndexError::MissingSentinel {
            sentinel: SENTINEL as char,
        });
    }
    let expected = text.len() - 1;
    if let Some(position) = text[..expected].iter().position(|&b| b == SENTINEL) {
        return Err(IndexError::MisplacedSentinel { position, expected });
    }
    Ok(())
}

/// Check that `suffixes` is a permutation of the text positions with the
/// sentinel suffix at rank 0. Sortedness is checked separately by [`is_sorted`].
pub fn validate_suffix_array<S: Suffixes + ?Sized>(
    text: &[u8],
    suffixes: &S,
) -> Result<(), IndexError> {
    let n = text.len();
    if suffixes.suffix_count() != n {
        return Err(IndexError::LengthMismatch {
            expected: n,
            actual: suffixes.suffix_count(),
        });
    }

    let mut seen = vec![false; n];
    for rank in 0..n {
        let value = suffixes.suffix_at(rank);
        match seen.get_mut(value) {
            Some(slot) if !*slot => *slot = true,
            _ => return Err(IndexError::NotAPermutation { rank, value }),
        }
    }

    if n > 0 && suffixes.suffix_at(0) != n - 1 {
        return Err(IndexError::SentinelNotFirst {
            expected: n - 1,
            actual: suffixes.suffix_at(0),
        });
    }
    Ok(())
}

/// Whether every adjacent pair of suffixes is in lexicographic order
pub fn is_sorted<S: Suffixes + ?Sized>(text: &[u8], suffixes: &S) -> bool {
    first_unsorted(text, suffixes).is_none()
}

/// The first rank whose suffix sorts below its predecessor
pub fn first_unsorted<S: Suffixes + ?Sized>(text: &[u8], suffixes: &S) -> Option<usize> {
    (1..suffixes.suffix_count())
        .find(|&rank| text[suffixes.suffix_at(rank - 1)..] > text[suffixes.suffix_at(rank)..])
}

/// Configuration for index building
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildConfig {
    /// Build a prefix table over prefixes of this length
    pub prefix_len: Option<usize>,
    /// Index only the first FASTA record
    pub first_record_only: bool,
    /// Seed for ambiguous base resolution (random when unset)
    pub seed: Option<u64>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            prefix_len: None,
            first_record_only: false,
            seed: None,
        }
    }
}

/// A FASTA record's span in the concatenated text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordBoundary {
    pub name: String,
    /// Start position in the text (inclusive)
    pub start: usize,
    /// End position in the text (exclusive)
    pub end: usize,
}

/// Index metadata stored in meta.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IndexMeta {
    pub version: u32,
    /// Text length including the sentinel
    pub text_len: usize,
    pub records: Vec<RecordBoundary>,
    /// Ambiguous bases replaced with random nucleotides
    pub ambiguous_resolved: u64,
    pub prefix_len: Option<usize>,
    pub config: BuildConfig,
    /// Unix timestamp (seconds)
    pub created_at: u64,
}

/// Header shared by sa.bin and preftab.bin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub magic: u32,
    pub version: u32,
    /// Number of entries that follow
    pub count: u64,
    /// sa.bin: reserved; preftab.bin: prefix length
    pub param: u32,
}

impl FileHeader {
    /// Size of header in bytes
    pub const SIZE: usize = 4 + 4 + 8 + 4; // 20 bytes

    pub fn new(count: u64, param: u32) -> Self {
        Self {
            magic: INDEX_MAGIC,
            version: INDEX_VERSION,
            count,
            param,
        }
    }
}

/// Size of one sa.bin entry
pub const SA_ENTRY_SIZE: usize = 8;

/// Size of one preftab.bin entry: code (u32) + start (u64) + end (u64)
pub const TABLE_ENTRY_SIZE: usize = 4 + 8 + 8;
