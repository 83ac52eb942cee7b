//! Index reader
//!
//! Memory-maps `text.bin` and `sa.bin` so queries run directly on the mapped
//! data; the prefix table and metadata are small and loaded into memory.

use super::prefix_table::PrefixTable;
use super::types::*;
use crate::error::IndexError;
use crate::utils::encoding::{read_u32_le, read_u64_le};
use anyhow::{Context, Result};
use memmap2::Mmap;
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Suffix array entries read straight from a mapped `sa.bin`
pub struct MappedSuffixes {
    mmap: Mmap,
    count: usize,
}

impl MappedSuffixes {
    fn open(path: &Path) -> Result<Self> {
        let mmap = map(path)?;
        let header = parse_header(&mmap, "sa.bin")?;
        let count = header.count as usize;

        let expected = count
            .checked_mul(SA_ENTRY_SIZE)
            .and_then(|bytes| bytes.checked_add(FileHeader::SIZE));
        if expected != Some(mmap.len()) {
            return Err(corrupt(
                "sa.bin",
                format!("{} bytes cannot hold {count} entries", mmap.len()),
            )
            .into());
        }

        Ok(Self { mmap, count })
    }

    /// First rank whose entry does not point into a text of `text_len` bytes
    fn first_out_of_range(&self, text_len: usize) -> Option<usize> {
        self.mmap[FileHeader::SIZE..]
            .par_chunks_exact(SA_ENTRY_SIZE)
            .position_first(|entry| {
                <[u8; SA_ENTRY_SIZE]>::try_from(entry)
                    .map_or(true, |bytes| u64::from_le_bytes(bytes) >= text_len as u64)
            })
    }
}

impl Suffixes for MappedSuffixes {
    #[inline]
    fn suffix_count(&self) -> usize {
        self.count
    }

    #[inline]
    fn suffix_at(&self, rank: usize) -> usize {
        let offset = FileHeader::SIZE + rank * SA_ENTRY_SIZE;
        let mut bytes = [0u8; SA_ENTRY_SIZE];
        bytes.copy_from_slice(&self.mmap[offset..offset + SA_ENTRY_SIZE]);
        u64::from_le_bytes(bytes) as usize
    }
}

/// A persisted index opened for querying
pub struct IndexReader {
    dir: PathBuf,
    text: Mmap,
    suffixes: MappedSuffixes,
    prefix_table: Option<PrefixTable>,
    meta: IndexMeta,
}

impl IndexReader {
    /// Open an index directory.
    ///
    /// Checks headers, file sizes, that every suffix array entry lies inside
    /// the text, and the sentinel contract. Uniqueness and sort order are
    /// only checked by [`IndexReader::verify`], which is linear in memory
    /// and `O(n log n)` in comparisons.
    pub fn open(dir: &Path) -> Result<Self> {
        let started = Instant::now();

        let meta_path = dir.join(META_FILE);
        let meta_file = File::open(&meta_path)
            .with_context(|| format!("Failed to open {}", meta_path.display()))?;
        let meta: IndexMeta = serde_json::from_reader(io::BufReader::new(meta_file))
            .with_context(|| format!("Failed to parse {}", meta_path.display()))?;
        if meta.version != INDEX_VERSION {
            anyhow::bail!("Unsupported index version: {}", meta.version);
        }

        let text = map(&dir.join(TEXT_FILE))?;
        validate_text(&text).context("Invalid text.bin")?;

        let suffixes = MappedSuffixes::open(&dir.join(SA_FILE))?;
        if suffixes.suffix_count() != text.len() {
            return Err(IndexError::LengthMismatch {
                expected: text.len(),
                actual: suffixes.suffix_count(),
            }
            .into());
        }
        if let Some(rank) = suffixes.first_out_of_range(text.len()) {
            return Err(IndexError::NotAPermutation {
                rank,
                value: suffixes.suffix_at(rank),
            }
            .into());
        }
        let first = suffixes.suffix_at(0);
        if first != text.len() - 1 {
            return Err(IndexError::SentinelNotFirst {
                expected: text.len() - 1,
                actual: first,
            }
            .into());
        }

        let preftab_path = dir.join(PREFTAB_FILE);
        let prefix_table = if preftab_path.exists() {
            Some(read_prefix_table(&preftab_path, text.len())?)
        } else {
            None
        };

        info!(
            dir = %dir.display(),
            text_len = text.len(),
            prefix_len = prefix_table.as_ref().map(PrefixTable::k),
            elapsed = ?started.elapsed(),
            "opened index"
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            text,
            suffixes,
            prefix_table,
            meta,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[inline]
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    pub fn suffixes(&self) -> &MappedSuffixes {
        &self.suffixes
    }

    pub fn prefix_table(&self) -> Option<&PrefixTable> {
        self.prefix_table.as_ref()
    }

    pub fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    /// Searchable view over the mapped data
    pub fn view(&self) -> IndexView<'_, MappedSuffixes> {
        IndexView::new(&self.text, &self.suffixes).with_prefix_table(self.prefix_table.as_ref())
    }

    /// Full consistency check: permutation and sort order
    pub fn verify(&self) -> Result<(), IndexError> {
        let started = Instant::now();
        validate_suffix_array(&self.text, &self.suffixes)?;
        if let Some(rank) = first_unsorted(&self.text, &self.suffixes) {
            return Err(IndexError::NotSorted { rank });
        }
        debug!(elapsed = ?started.elapsed(), "index verified");
        Ok(())
    }

    /// Copy the mapped data into an owned index
    pub fn to_index(&self) -> Result<SuffixIndex, IndexError> {
        let sa = (0..self.suffixes.suffix_count())
            .map(|rank| self.suffixes.suffix_at(rank))
            .collect();
        Ok(SuffixIndex::new(self.text.to_vec(), sa)?.with_prefix_table(self.prefix_table.clone()))
    }
}

fn map(path: &Path) -> Result<Mmap> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    // Index files are written once and never modified while mapped
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to map {}", path.display()))?;
    Ok(mmap)
}

fn corrupt(file: &'static str, reason: impl Into<String>) -> IndexError {
    IndexError::Corrupt {
        file,
        reason: reason.into(),
    }
}

fn read_header<R: Read>(reader: &mut R) -> io::Result<FileHeader> {
    Ok(FileHeader {
        magic: read_u32_le(reader)?,
        version: read_u32_le(reader)?,
        count: read_u64_le(reader)?,
        param: read_u32_le(reader)?,
    })
}

fn parse_header(mut data: &[u8], file: &'static str) -> Result<FileHeader, IndexError> {
    let header = read_header(&mut data).map_err(|_| corrupt(file, "file too small"))?;
    if header.magic != INDEX_MAGIC {
        return Err(corrupt(file, "bad magic number"));
    }
    if header.version != INDEX_VERSION {
        return Err(corrupt(file, format!("unsupported version {}", header.version)));
    }
    Ok(header)
}

fn read_table_entry(mut entry: &[u8]) -> io::Result<(u32, IndexInterval)> {
    let code = read_u32_le(&mut entry)?;
    let start = read_u64_le(&mut entry)? as usize;
    let end = read_u64_le(&mut entry)? as usize;
    Ok((code, IndexInterval { start, end }))
}

fn read_prefix_table(path: &Path, text_len: usize) -> Result<PrefixTable> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let header = parse_header(&data, "preftab.bin")?;
    let count = header.count as usize;

    let body = &data[FileHeader::SIZE..];
    if Some(body.len()) != count.checked_mul(TABLE_ENTRY_SIZE) {
        return Err(corrupt(
            "preftab.bin",
            format!("{} bytes cannot hold {count} entries", body.len()),
        )
        .into());
    }

    let entries = body
        .chunks_exact(TABLE_ENTRY_SIZE)
        .map(read_table_entry)
        .collect::<io::Result<Vec<_>>>()
        .context("Failed to decode preftab.bin")?;

    Ok(PrefixTable::from_entries(header.param as usize, text_len, entries)?)
}
