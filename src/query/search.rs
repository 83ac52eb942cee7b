//! Interval search over a suffix array
//!
//! Both strategies answer the same question: given a candidate range of ranks
//! `[lo, hi]` known to contain the answer, find the first rank whose suffix is
//! `>= pattern`. The matching interval is then `[locate(p), locate(p⁺))` where
//! `p⁺` is the smallest string greater than every string starting with `p`.
//!
//! A candidate range `[lo, hi]` promises that every suffix ranked below `lo`
//! is `< pattern` and every suffix ranked at or above `hi` is `>= pattern⁺`.
//! The whole array (`[0, n]`) and any prefix table run satisfy this.
//!
//! - [`NaiveSearch`] bisects between open fences and compares whole suffixes
//!   at every step.
//! - [`AcceleratedSearch`] carries the longest common prefix of each fence with
//!   the pattern and starts every comparison at the smaller of the two.

use crate::index::types::{IndexInterval, IndexView, Suffixes};
use std::cmp::Ordering;

/// Ranks `[lo, hi]` known to contain the lower bound of a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRange {
    pub lo: usize,
    pub hi: usize,
}

impl SearchRange {
    pub fn new(lo: usize, hi: usize) -> Self {
        debug_assert!(lo <= hi);
        Self { lo, hi }
    }

    /// The whole suffix array
    pub fn full(len: usize) -> Self {
        Self { lo: 0, hi: len }
    }
}

impl From<IndexInterval> for SearchRange {
    fn from(interval: IndexInterval) -> Self {
        Self::new(interval.start, interval.end)
    }
}

/// A strategy for resolving a pattern to its suffix array interval
pub trait IntervalSearch {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// First rank in `range.lo..=range.hi` whose suffix is `>= pattern`
    fn locate<S: Suffixes + ?Sized>(
        &self,
        index: IndexView<'_, S>,
        pattern: &[u8],
        range: SearchRange,
    ) -> usize;

    /// Ranks whose suffixes start with `pattern`
    fn interval<S: Suffixes + ?Sized>(
        &self,
        index: IndexView<'_, S>,
        pattern: &[u8],
        range: SearchRange,
    ) -> IndexInterval {
        let start = self.locate(index, pattern, range);
        let end = match successor(pattern) {
            Some(next) => self.locate(index, &next, SearchRange::new(start, range.hi)),
            None => range.hi,
        };
        IndexInterval::new(start, end)
    }
}

/// Classic bisection with whole-suffix comparisons
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveSearch;

impl IntervalSearch for NaiveSearch {
    fn name(&self) -> &'static str {
        "naive"
    }

    fn locate<S: Suffixes + ?Sized>(
        &self,
        index: IndexView<'_, S>,
        pattern: &[u8],
        range: SearchRange,
    ) -> usize {
        if range.lo == range.hi {
            return range.lo;
        }

        // Open left fence: lo - 1 is below the pattern by contract. Rank 0 has
        // nothing below it, so it is compared before it can serve as a fence.
        let mut left = match range.lo.checked_sub(1) {
            Some(fence) => fence,
            None if index.suffix(0) >= pattern => return 0,
            None => 0,
        };
        let mut right = range.hi;

        while right - left > 1 {
            let center = left + (right - left) / 2;
            if index.suffix(center) < pattern {
                left = center;
            } else {
                right = center;
            }
        }
        right
    }
}

/// A fence rank paired with the length of its confirmed common prefix with
/// the current pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryState {
    pub rank: usize,
    pub lcp: usize,
}

/// Bisection that skips characters both fences already share with the pattern
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceleratedSearch;

impl AcceleratedSearch {
    /// Lower bound of `pattern` in `range`, starting the first comparison at
    /// rank `range.lo` from offset `lo_lcp`, a known lower bound on the common
    /// prefix of that suffix and the pattern.
    ///
    /// Returns the answer with its common prefix length; the length is 0 when
    /// the answer is `range.hi`, which is never compared.
    pub fn locate_from<S: Suffixes + ?Sized>(
        &self,
        index: IndexView<'_, S>,
        pattern: &[u8],
        range: SearchRange,
        lo_lcp: usize,
    ) -> BoundaryState {
        let SearchRange { lo, hi } = range;
        if lo == hi {
            return BoundaryState { rank: hi, lcp: 0 };
        }

        // The inclusive left fence is the answer unless it sorts below the pattern
        let (ordering, lcp) = compare_from(pattern, index.suffix(lo), lo_lcp);
        if ordering != Ordering::Greater {
            return BoundaryState { rank: lo, lcp };
        }
        let mut left = BoundaryState { rank: lo, lcp };

        // Mirror on the right: if the last candidate is still below the
        // pattern the answer is one past it
        if hi - 1 == lo {
            return BoundaryState { rank: hi, lcp: 0 };
        }
        let (ordering, lcp) = compare_from(pattern, index.suffix(hi - 1), 0);
        if ordering == Ordering::Greater {
            return BoundaryState { rank: hi, lcp: 0 };
        }
        let mut right = BoundaryState { rank: hi - 1, lcp };

        // Invariant: suffix(left) < pattern <= suffix(right)
        while right.rank - left.rank > 1 {
            let skip = left.lcp.min(right.lcp);
            let center = left.rank + (right.rank - left.rank) / 2;
            let (ordering, lcp) = compare_from(pattern, index.suffix(center), skip);
            let state = BoundaryState { rank: center, lcp };
            if ordering == Ordering::Greater {
                left = state;
            } else {
                right = state;
            }
        }
        right
    }
}

impl IntervalSearch for AcceleratedSearch {
    fn name(&self) -> &'static str {
        "simpaccel"
    }

    fn locate<S: Suffixes + ?Sized>(
        &self,
        index: IndexView<'_, S>,
        pattern: &[u8],
        range: SearchRange,
    ) -> usize {
        self.locate_from(index, pattern, range, 0).rank
    }

    fn interval<S: Suffixes + ?Sized>(
        &self,
        index: IndexView<'_, S>,
        pattern: &[u8],
        range: SearchRange,
    ) -> IndexInterval {
        let start = self.locate_from(index, pattern, range, 0);
        let end = match successor(pattern) {
            // p and p⁺ agree on all but their last symbol, so the start
            // boundary's prefix carries over up to that point
            Some(next) => {
                let carried = start.lcp.min(next.len() - 1);
                self.locate_from(index, &next, SearchRange::new(start.rank, range.hi), carried)
                    .rank
            }
            None => range.hi,
        };
        IndexInterval::new(start.rank, end)
    }
}

/// Compare `pattern` with `suffix`, skipping the first `skip` bytes, which the
/// caller guarantees are equal.
///
/// Returns the ordering of the pattern relative to the suffix and their
/// common prefix length. A pattern that runs out first is a prefix of the
/// suffix and orders `Less`.
#[inline]
pub fn compare_from(pattern: &[u8], suffix: &[u8], skip: usize) -> (Ordering, usize) {
    debug_assert!(skip <= pattern.len() && skip <= suffix.len());
    let lcp = skip + common_prefix_len(&pattern[skip..], &suffix[skip..]);
    let ordering = match (pattern.get(lcp), suffix.get(lcp)) {
        (Some(p), Some(s)) => p.cmp(s),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    };
    (ordering, lcp)
}

/// Length of the longest common prefix of two byte strings
#[inline]
pub fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Smallest string greater than every string that starts with `pattern`.
///
/// Increments the last byte; trailing `0xFF` bytes are dropped and the carry
/// moves left. `None` when no such string exists (empty or all `0xFF`), in
/// which case every remaining suffix in range starts with the pattern.
pub fn successor(pattern: &[u8]) -> Option<Vec<u8>> {
    let keep = pattern.iter().rposition(|&b| b != u8::MAX)?;
    let mut next = pattern[..=keep].to_vec();
    next[keep] += 1;
    Some(next)
}
