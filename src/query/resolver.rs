//! Query resolution
//!
//! Each query moves through `Unresolved -> (prefix lookup) -> Narrowed |
//! Rejected -> Searched -> Resolved`. A prefix table miss resolves the query
//! to an empty interval without searching. Otherwise the chosen strategy runs
//! over the full array or the table run.

use super::search::{AcceleratedSearch, IntervalSearch, NaiveSearch, SearchRange};
use super::types::{Query, QueryHit};
use crate::error::QueryError;
use crate::index::types::{IndexInterval, IndexView, Suffixes};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, trace};

/// Which interval search strategy to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Plain binary search
    #[default]
    Naive,
    /// Binary search with the simple LCP accelerant
    #[value(name = "simpaccel", alias = "accel")]
    SimpAccel,
}

/// What to do with a pattern shorter than the prefix table's `k`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ShortPatternPolicy {
    /// Fail the query
    #[default]
    Reject,
    /// Skip the table and search the whole array
    FullRange,
}

/// Configuration for query resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    pub mode: QueryMode,
    pub short_patterns: ShortPatternPolicy,
    /// Resolve batches on the rayon thread pool
    pub parallel: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            mode: QueryMode::default(),
            short_patterns: ShortPatternPolicy::default(),
            parallel: true,
        }
    }
}

/// Outcome of consulting the prefix table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Narrowing {
    /// No table, or a short pattern bypassing it
    Full,
    /// The table run for the pattern's first `k` symbols
    Run(IndexInterval),
    /// The pattern's first `k` symbols never occur
    Rejected,
}

/// Resolves query patterns to suffix array intervals
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryResolver {
    config: QueryConfig,
}

impl QueryResolver {
    pub fn new(config: QueryConfig) -> Self {
        Self { config }
    }

    pub fn with_mode(mode: QueryMode) -> Self {
        Self::new(QueryConfig {
            mode,
            ..Default::default()
        })
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Resolve one pattern
    pub fn resolve<S: Suffixes + ?Sized>(
        &self,
        index: IndexView<'_, S>,
        pattern: &[u8],
    ) -> Result<IndexInterval, QueryError> {
        match self.config.mode {
            QueryMode::Naive => self.resolve_with(&NaiveSearch, index, pattern),
            QueryMode::SimpAccel => self.resolve_with(&AcceleratedSearch, index, pattern),
        }
    }

    fn resolve_with<T: IntervalSearch, S: Suffixes + ?Sized>(
        &self,
        strategy: &T,
        index: IndexView<'_, S>,
        pattern: &[u8],
    ) -> Result<IndexInterval, QueryError> {
        let range = match self.narrow(index, pattern)? {
            Narrowing::Rejected => return Ok(IndexInterval::empty()),
            Narrowing::Run(run) => SearchRange::from(run),
            Narrowing::Full => SearchRange::full(index.len()),
        };
        let interval = strategy.interval(index, pattern, range);
        trace!(
            strategy = strategy.name(),
            lo = range.lo,
            hi = range.hi,
            start = interval.start,
            end = interval.end,
            "searched"
        );
        Ok(interval)
    }

    fn narrow<S: Suffixes + ?Sized>(
        &self,
        index: IndexView<'_, S>,
        pattern: &[u8],
    ) -> Result<Narrowing, QueryError> {
        let Some(table) = index.prefix_table else {
            return Ok(Narrowing::Full);
        };
        match table.lookup(pattern) {
            Ok(Some(run)) => Ok(Narrowing::Run(run)),
            Ok(None) => Ok(Narrowing::Rejected),
            Err(QueryError::PatternTooShort { .. })
                if self.config.short_patterns == ShortPatternPolicy::FullRange =>
            {
                Ok(Narrowing::Full)
            }
            Err(err) => Err(err),
        }
    }

    /// Resolve a batch of queries, preserving input order.
    ///
    /// Queries share only read-only state, so they run on the rayon pool when
    /// `parallel` is set. The first failing query aborts the batch.
    pub fn resolve_all<S: Suffixes + Sync + ?Sized>(
        &self,
        index: IndexView<'_, S>,
        queries: &[Query],
    ) -> Result<Vec<QueryHit>, QueryError> {
        let started = Instant::now();
        let resolve_one = |query: &Query| {
            self.resolve(index, &query.pattern)
                .map(|interval| QueryHit {
                    name: query.name.clone(),
                    interval,
                })
                .map_err(|err| QueryError::Failed {
                    name: query.name.clone(),
                    source: Box::new(err),
                })
        };

        let hits: Vec<QueryHit> = if self.config.parallel {
            queries.par_iter().map(resolve_one).collect::<Result<_, _>>()?
        } else {
            queries.iter().map(resolve_one).collect::<Result<_, _>>()?
        };

        let total: usize = hits.iter().map(|hit| hit.interval.len()).sum();
        info!(
            queries = hits.len(),
            hits = total,
            mode = ?self.config.mode,
            narrowed = index.prefix_table.is_some(),
            elapsed = ?started.elapsed(),
            "resolved queries"
        );
        debug!(
            empty = hits.iter().filter(|hit| hit.interval.is_empty()).count(),
            "queries without hits"
        );
        Ok(hits)
    }
}
