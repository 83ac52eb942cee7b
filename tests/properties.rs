//! Property tests for interval search and prefix table construction.
//!
//! Verifies:
//! 1. Naive and accelerated search agree on every pattern, with and without
//!    a prefix table
//! 2. Resolved intervals hold exactly the brute-force occurrences
//! 3. Built suffix arrays are sorted permutations
//! 4. Prefix table runs are disjoint, sorted and complete

use dnasa::index::{BuildConfig, IndexBuilder, SuffixIndex, is_sorted};
use dnasa::query::{
    AcceleratedSearch, IntervalSearch, NaiveSearch, QueryConfig, QueryMode, QueryResolver,
    SearchRange, ShortPatternPolicy,
};
use dnasa::utils::{FastaRecord, encode_prefix};
use proptest::prelude::*;
use std::collections::BTreeSet;

// ============================================================================
// STRATEGIES
// ============================================================================

fn genome_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        3 => prop::collection::vec(prop::sample::select(b"ACGT".to_vec()), 1..200),
        // Low-entropy genomes stress long common prefixes
        1 => prop::collection::vec(prop::sample::select(b"AC".to_vec()), 1..200),
    ]
}

fn pattern_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"ACGTN".to_vec()), 0..8)
}

fn build(genome: &[u8], prefix_len: Option<usize>) -> SuffixIndex {
    let mut builder = IndexBuilder::new(BuildConfig {
        prefix_len,
        seed: Some(0),
        ..Default::default()
    });
    builder.add_record(&FastaRecord {
        name: "g".into(),
        sequence: genome.to_vec(),
    });
    builder.build().unwrap().index
}

/// Every text offset where `pattern` starts
fn occurrences(text: &[u8], pattern: &[u8]) -> BTreeSet<usize> {
    (0..text.len())
        .filter(|&i| text[i..].starts_with(pattern))
        .collect()
}

// ============================================================================
// SEARCH EQUIVALENCE
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: both strategies return the brute-force occurrences.
    #[test]
    fn prop_search_matches_oracle(genome in genome_strategy(), pattern in pattern_strategy()) {
        let index = build(&genome, None);
        let range = SearchRange::full(index.len());

        let naive = NaiveSearch.interval(index.view(), &pattern, range);
        let accel = AcceleratedSearch.interval(index.view(), &pattern, range);
        prop_assert_eq!(naive, accel);

        let found: BTreeSet<usize> = index.positions(naive).into_iter().collect();
        prop_assert_eq!(found, occurrences(index.text(), &pattern));
    }

    /// Property: every substring of the genome is found.
    #[test]
    fn prop_substrings_found(
        genome in genome_strategy(),
        start in any::<prop::sample::Index>(),
        len in 1usize..12,
    ) {
        let index = build(&genome, None);
        let start = start.index(genome.len());
        let end = (start + len).min(genome.len());
        let pattern = &genome[start..end];

        for mode in [QueryMode::Naive, QueryMode::SimpAccel] {
            let interval = QueryResolver::with_mode(mode).resolve(index.view(), pattern).unwrap();
            prop_assert!(index.positions(interval).contains(&start));
        }
    }

    /// Property: narrowing with a prefix table never changes the answer.
    #[test]
    fn prop_table_narrowing_preserves_results(
        genome in genome_strategy(),
        pattern in pattern_strategy(),
        k in 1usize..=4,
    ) {
        let plain = build(&genome, None);
        let narrowed = build(&genome, Some(k));
        let expected = NaiveSearch.interval(plain.view(), &pattern, SearchRange::full(plain.len()));

        for mode in [QueryMode::Naive, QueryMode::SimpAccel] {
            let resolver = QueryResolver::new(QueryConfig {
                mode,
                short_patterns: ShortPatternPolicy::FullRange,
                parallel: false,
            });
            let interval = resolver.resolve(narrowed.view(), &pattern).unwrap();
            prop_assert_eq!(interval.len(), expected.len());
            if !expected.is_empty() {
                prop_assert_eq!(interval, expected);
            }
        }
    }

    /// Property: under a table, both strategies return the same interval,
    /// including the insertion point of a pattern the run does not contain.
    #[test]
    fn prop_strategies_agree_under_table(
        genome in genome_strategy(),
        pattern in pattern_strategy(),
        k in 1usize..=4,
    ) {
        let index = build(&genome, Some(k));
        let resolve = |mode| {
            QueryResolver::new(QueryConfig {
                mode,
                short_patterns: ShortPatternPolicy::FullRange,
                parallel: false,
            })
            .resolve(index.view(), &pattern)
            .unwrap()
        };
        prop_assert_eq!(resolve(QueryMode::Naive), resolve(QueryMode::SimpAccel));
    }

    /// Property: resolving twice gives the same interval.
    #[test]
    fn prop_resolution_idempotent(genome in genome_strategy(), pattern in pattern_strategy()) {
        let index = build(&genome, Some(2));
        let resolver = QueryResolver::new(QueryConfig {
            short_patterns: ShortPatternPolicy::FullRange,
            ..Default::default()
        });
        let first = resolver.resolve(index.view(), &pattern).unwrap();
        let second = resolver.resolve(index.view(), &pattern).unwrap();
        prop_assert_eq!(first, second);
    }
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: the built suffix array is sorted with the sentinel first.
    #[test]
    fn prop_suffix_array_sorted(genome in genome_strategy()) {
        let index = build(&genome, None);
        prop_assert!(is_sorted(index.text(), index.suffix_array()));
        prop_assert_eq!(index.suffix_array()[0], genome.len());
    }

    /// Property: table runs are disjoint, sorted, and cover exactly the
    /// suffixes with at least `k` symbols before the sentinel.
    #[test]
    fn prop_table_partitions_ranks(genome in genome_strategy(), k in 1usize..=4) {
        let index = build(&genome, Some(k));
        let table = index.prefix_table().unwrap();
        let view = index.view();

        let mut covered = vec![false; index.len()];
        let mut previous_end = 0;
        let mut runs: Vec<_> = table.iter().map(|(_, interval)| interval).collect();
        runs.sort_by_key(|interval| interval.start);

        for interval in runs {
            prop_assert!(!interval.is_empty());
            prop_assert!(interval.start >= previous_end);
            previous_end = interval.end;
            for rank in interval.ranks() {
                covered[rank] = true;
            }
        }

        for (code, interval) in table.iter() {
            for rank in interval.ranks() {
                prop_assert_eq!(encode_prefix(&view.suffix(rank)[..k]), Some(code));
            }
        }

        for (rank, &is_covered) in covered.iter().enumerate() {
            let long_enough = genome.len() - view.suffixes[rank] >= k && rank > 0;
            prop_assert_eq!(is_covered, long_enough, "rank {}", rank);
        }
    }
}
