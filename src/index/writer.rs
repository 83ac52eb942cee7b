//! Index writer
//!
//! Writes a built index to a directory in a format suited to memory-mapped
//! reading:
//! - `text.bin`: the text, sentinel included
//! - `sa.bin`: header + little-endian u64 suffix array entries
//! - `preftab.bin`: header + `(code, start, end)` for occupied prefixes
//! - `meta.json`: build metadata

use super::prefix_table::PrefixTable;
use super::types::*;
use crate::utils::encoding::{write_u32_le, write_u64_le};
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

const WRITE_BUFFER: usize = 64 * 1024;

/// Writes index files to a directory
pub struct IndexWriter;

impl IndexWriter {
    /// Write all index files, creating `dir` if needed
    pub fn write(dir: &Path, index: &SuffixIndex, meta: &IndexMeta) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create index directory {}", dir.display()))?;

        Self::write_text(dir, index.text())?;
        Self::write_suffix_array(dir, index.suffix_array())?;

        let preftab_path = dir.join(PREFTAB_FILE);
        match index.prefix_table() {
            Some(table) => Self::write_prefix_table(dir, table)?,
            // Don't leave a table from an earlier build next to the new array
            None if preftab_path.exists() => fs::remove_file(&preftab_path)
                .with_context(|| format!("Failed to remove stale {PREFTAB_FILE}"))?,
            None => {}
        }

        Self::write_meta(dir, meta)?;
        debug!(dir = %dir.display(), "index written");
        Ok(())
    }

    fn write_text(dir: &Path, text: &[u8]) -> Result<()> {
        let mut file = create(dir, TEXT_FILE)?;
        file.write_all(text)?;
        file.flush()?;
        Ok(())
    }

    fn write_suffix_array(dir: &Path, sa: &[usize]) -> Result<()> {
        let mut file = create(dir, SA_FILE)?;
        write_header(&mut file, &FileHeader::new(sa.len() as u64, 0))?;

        let mut buffer = Vec::with_capacity(SA_ENTRY_SIZE * 1024);
        for &entry in sa {
            buffer.extend_from_slice(&(entry as u64).to_le_bytes());
            if buffer.len() >= SA_ENTRY_SIZE * 1024 {
                file.write_all(&buffer)?;
                buffer.clear();
            }
        }
        file.write_all(&buffer)?;

        file.flush()
            .with_context(|| format!("Failed to write {SA_FILE}"))?;
        Ok(())
    }

    fn write_prefix_table(dir: &Path, table: &PrefixTable) -> Result<()> {
        let mut file = create(dir, PREFTAB_FILE)?;
        write_header(
            &mut file,
            &FileHeader::new(table.occupied() as u64, table.k() as u32),
        )?;

        for (code, interval) in table.iter() {
            write_u32_le(&mut file, code)?;
            write_u64_le(&mut file, interval.start as u64)?;
            write_u64_le(&mut file, interval.end as u64)?;
        }

        file.flush()
            .with_context(|| format!("Failed to write {PREFTAB_FILE}"))?;
        Ok(())
    }

    fn write_meta(dir: &Path, meta: &IndexMeta) -> Result<()> {
        let mut file = create(dir, META_FILE)?;
        serde_json::to_writer_pretty(&mut file, meta)?;
        file.flush()?;
        Ok(())
    }
}

fn create(dir: &Path, name: &str) -> Result<BufWriter<File>> {
    let path = dir.join(name);
    let file = File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(BufWriter::with_capacity(WRITE_BUFFER, file))
}

fn write_header<W: Write>(writer: &mut W, header: &FileHeader) -> Result<()> {
    write_u32_le(writer, header.magic)?;
    write_u32_le(writer, header.version)?;
    write_u64_le(writer, header.count)?;
    write_u32_le(writer, header.param)?;
    Ok(())
}
