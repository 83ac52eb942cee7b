use crate::index::reader::IndexReader;
use crate::index::types::Suffixes;
use anyhow::Result;
use std::path::Path;

/// Summary of an opened index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStats {
    pub text_len: usize,
    pub suffix_count: usize,
    pub record_count: usize,
    pub ambiguous_resolved: u64,
    pub prefix_len: Option<usize>,
    pub occupied_slots: usize,
    pub total_slots: usize,
    /// Length of the longest prefix table run
    pub largest_run: usize,
}

impl IndexStats {
    pub fn collect(reader: &IndexReader) -> Self {
        let table = reader.prefix_table();
        Self {
            text_len: reader.text().len(),
            suffix_count: reader.suffixes().suffix_count(),
            record_count: reader.meta().records.len(),
            ambiguous_resolved: reader.meta().ambiguous_resolved,
            prefix_len: table.map(|t| t.k()),
            occupied_slots: table.map_or(0, |t| t.occupied()),
            total_slots: table.map_or(0, |t| t.slot_count()),
            largest_run: table
                .and_then(|t| t.iter().map(|(_, interval)| interval.len()).max())
                .unwrap_or(0),
        }
    }
}

/// Display index statistics, optionally checking the sort order
pub fn show_stats(dir: &Path, verify: bool) -> Result<()> {
    let reader = IndexReader::open(dir)?;
    let stats = IndexStats::collect(&reader);
    let meta = reader.meta();

    println!("Index Statistics");
    println!("================");
    println!();
    println!("Index location:   {}", dir.display());
    println!("Index version:    {}", meta.version);
    println!("Text length:      {}", stats.text_len);
    println!("Suffix count:     {}", stats.suffix_count);
    println!("Records:          {}", stats.record_count);
    println!("Ambiguous bases:  {}", stats.ambiguous_resolved);

    for record in meta.records.iter().take(15) {
        println!("  {:15} {}", record.name, record.end - record.start);
    }
    if meta.records.len() > 15 {
        println!("  ... and {} more", meta.records.len() - 15);
    }

    println!();
    match stats.prefix_len {
        Some(k) => {
            println!("Prefix length:    {k}");
            println!(
                "Occupied slots:   {} / {}",
                stats.occupied_slots, stats.total_slots
            );
            println!("Largest run:      {}", stats.largest_run);
        }
        None => println!("Prefix table:     none"),
    }

    if let Ok(size) = dir_size(dir) {
        println!();
        println!("Index size:       {}", format_size(size));
    }

    println!();
    println!("Created:          {}", format_timestamp(meta.created_at));

    if verify {
        reader.verify()?;
        println!("Verified:         sorted permutation");
    }

    Ok(())
}

/// Calculate directory size recursively
fn dir_size(path: &Path) -> std::io::Result<u64> {
    let mut size = 0;
    if path.is_dir() {
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() {
                size += entry.metadata()?.len();
            } else if path.is_dir() {
                size += dir_size(&path)?;
            }
        }
    }
    Ok(size)
}

/// Format byte size to human readable
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

fn format_timestamp(ts: u64) -> String {
    use std::time::{Duration, UNIX_EPOCH};
    format!("{:?}", UNIX_EPOCH + Duration::from_secs(ts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::builder::IndexBuilder;
    use crate::index::types::BuildConfig;
    use crate::index::writer::IndexWriter;
    use crate::utils::fasta::FastaRecord;
    use tempfile::tempdir;

    #[test]
    fn test_collect_stats() {
        let temp_dir = tempdir().unwrap();
        let mut builder = IndexBuilder::new(BuildConfig {
            prefix_len: Some(2),
            seed: Some(5),
            ..Default::default()
        });
        builder.add_record(&FastaRecord {
            name: "chr1".into(),
            sequence: b"ACAACN".to_vec(),
        });
        let built = builder.build().unwrap();
        IndexWriter::write(temp_dir.path(), &built.index, &built.meta).unwrap();

        let reader = IndexReader::open(temp_dir.path()).unwrap();
        let stats = IndexStats::collect(&reader);
        assert_eq!(stats.text_len, 7);
        assert_eq!(stats.suffix_count, 7);
        assert_eq!(stats.record_count, 1);
        assert_eq!(stats.ambiguous_resolved, 1);
        assert_eq!(stats.prefix_len, Some(2));
        assert_eq!(stats.total_slots, 16);
        assert!(stats.occupied_slots >= 2);
        assert!(stats.largest_run >= 1);

        show_stats(temp_dir.path(), true).unwrap();
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 bytes");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }
}
