//! Minimal FASTA reader
//!
//! Header lines start with `>`; the record name is the first whitespace
//! delimited token after it. Sequence lines are trimmed and concatenated.

use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A named sequence from a FASTA file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub name: String,
    pub sequence: Vec<u8>,
}

/// Parse all records from a buffered reader
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<FastaRecord>> {
    let mut records: Vec<FastaRecord> = Vec::new();

    for (line_no, line) in reader.split(b'\n').enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_no + 1))?;
        let line = line.trim_ascii();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix(b">") {
            let name = header
                .split(|b| b.is_ascii_whitespace())
                .find(|token| !token.is_empty())
                .unwrap_or_default();
            records.push(FastaRecord {
                name: String::from_utf8_lossy(name).into_owned(),
                sequence: Vec::new(),
            });
        } else {
            match records.last_mut() {
                Some(record) => record.sequence.extend_from_slice(line),
                None => bail!("Sequence data on line {} before any '>' header", line_no + 1),
            }
        }
    }

    Ok(records)
}

/// Open and parse a FASTA file
pub fn read_fasta_file(path: &Path) -> Result<Vec<FastaRecord>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    read_records(BufReader::with_capacity(1 << 16, file))
        .with_context(|| format!("Failed to parse FASTA file {}", path.display()))
}
