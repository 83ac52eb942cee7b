//! Output formatting for resolved queries
//!
//! One line per query, in input order. The text format is
//! `name count offset...` with offsets in suffix array order; the JSON format
//! writes one object per line.

use crate::index::types::{IndexInterval, IndexView, Suffixes};
use crate::query::types::QueryHit;
use serde::Serialize;
use std::io::{self, Write};

/// Output format for query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// `name count offset...`
    #[default]
    Text,
    /// JSON lines
    Json,
}

#[derive(Serialize)]
struct HitLine<'a> {
    name: &'a str,
    count: usize,
    interval: IndexInterval,
    offsets: Vec<usize>,
}

/// Write every hit with its text offsets
pub fn write_hits<W: Write, S: Suffixes + ?Sized>(
    writer: &mut W,
    index: IndexView<'_, S>,
    hits: &[QueryHit],
    format: OutputFormat,
) -> io::Result<()> {
    for hit in hits {
        match format {
            OutputFormat::Text => write_text_line(writer, index, hit)?,
            OutputFormat::Json => {
                let line = HitLine {
                    name: &hit.name,
                    count: hit.count(),
                    interval: hit.interval,
                    offsets: index.positions(hit.interval),
                };
                serde_json::to_writer(&mut *writer, &line)?;
                writeln!(writer)?;
            }
        }
    }
    writer.flush()
}

fn write_text_line<W: Write, S: Suffixes + ?Sized>(
    writer: &mut W,
    index: IndexView<'_, S>,
    hit: &QueryHit,
) -> io::Result<()> {
    write!(writer, "{} {}", hit.name, hit.count())?;
    for rank in hit.interval.ranks() {
        write!(writer, " {}", index.suffixes.suffix_at(rank))?;
    }
    writeln!(writer)
}
