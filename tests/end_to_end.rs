//! End-to-end tests: FASTA -> build -> write -> read -> query -> output,
//! through the library and through the compiled binary.

use dnasa::index::{BuildConfig, IndexBuilder, IndexReader, IndexWriter, SuffixIndex};
use dnasa::output::{OutputFormat, write_hits};
use dnasa::query::{Query, QueryConfig, QueryMode, QueryResolver};
use dnasa::utils::{read_fasta_file, read_records};
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const REFERENCE: &str = ">chr1 test genome\nACCAAG\nATAGCT\nAC\n";
const QUERIES: &str = ">ta\nTA\n>aga\nAGA\n>ac\nac\n>cca\nCCAAGATAG\n>miss\nGGGG\n";

fn write_inputs(dir: &Path) {
    fs::write(dir.join("ref.fa"), REFERENCE).unwrap();
    fs::write(dir.join("queries.fa"), QUERIES).unwrap();
}

fn build_index(dir: &Path, prefix_len: Option<usize>) -> SuffixIndex {
    let records = read_fasta_file(&dir.join("ref.fa")).unwrap();
    let mut builder = IndexBuilder::new(BuildConfig {
        prefix_len,
        seed: Some(11),
        ..Default::default()
    });
    builder.add_records(&records);
    let built = builder.build().unwrap();
    IndexWriter::write(&dir.join("index"), &built.index, &built.meta).unwrap();
    built.index
}

fn run_queries(dir: &Path, mode: QueryMode) -> String {
    let reader = IndexReader::open(&dir.join("index")).unwrap();
    let queries: Vec<Query> = read_fasta_file(&dir.join("queries.fa"))
        .unwrap()
        .into_iter()
        .map(Query::from)
        .collect();
    let resolver = QueryResolver::new(QueryConfig {
        mode,
        ..Default::default()
    });
    let hits = resolver.resolve_all(reader.view(), &queries).unwrap();

    let mut out = Vec::new();
    write_hits(&mut out, reader.view(), &hits, OutputFormat::Text).unwrap();
    String::from_utf8(out).unwrap()
}

const EXPECTED: &str = "ta 2 11 7\naga 1 4\nac 2 12 0\ncca 1 1\nmiss 0\n";

#[test]
fn test_library_pipeline_without_table() {
    let temp = TempDir::new().unwrap();
    write_inputs(temp.path());
    let index = build_index(temp.path(), None);
    assert_eq!(index.text(), b"ACCAAGATAGCTAC$");

    for mode in [QueryMode::Naive, QueryMode::SimpAccel] {
        assert_eq!(run_queries(temp.path(), mode), EXPECTED, "{mode:?}");
    }
}

#[test]
fn test_library_pipeline_with_table() {
    let temp = TempDir::new().unwrap();
    write_inputs(temp.path());
    build_index(temp.path(), Some(2));

    for mode in [QueryMode::Naive, QueryMode::SimpAccel] {
        assert_eq!(run_queries(temp.path(), mode), EXPECTED, "{mode:?}");
    }
}

#[test]
fn test_mapped_and_owned_indexes_agree() {
    let temp = TempDir::new().unwrap();
    write_inputs(temp.path());
    let owned = build_index(temp.path(), Some(1));
    let reader = IndexReader::open(&temp.path().join("index")).unwrap();
    let resolver = QueryResolver::with_mode(QueryMode::SimpAccel);

    let records = read_records(QUERIES.as_bytes()).unwrap();
    for record in records {
        let query = Query::from(record);
        let from_disk = resolver.resolve(reader.view(), &query.pattern).unwrap();
        let in_memory = resolver.resolve(owned.view(), &query.pattern).unwrap();
        assert_eq!(from_disk, in_memory, "{}", query.name);
    }
}

// ============================================================================
// BINARY
// ============================================================================

fn dnasa(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_dnasa"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

#[test]
fn test_cli_build_and_query() {
    let temp = TempDir::new().unwrap();
    write_inputs(temp.path());
    let path = |name: &str| temp.path().join(name).to_string_lossy().into_owned();

    let build = dnasa(&["build", "--preftab", "2", "--seed", "1", &path("ref.fa"), &path("index")]);
    assert!(build.status.success(), "{}", String::from_utf8_lossy(&build.stderr));
    assert!(temp.path().join("index/preftab.bin").exists());

    for mode in ["naive", "simpaccel"] {
        let out = path(&format!("{mode}.txt"));
        let query = dnasa(&["query", &path("index"), &path("queries.fa"), mode, &out]);
        assert!(query.status.success(), "{}", String::from_utf8_lossy(&query.stderr));
        assert_eq!(fs::read_to_string(&out).unwrap(), EXPECTED);
    }

    let stats = dnasa(&["stats", "--verify", &path("index")]);
    assert!(stats.status.success());
    let stdout = String::from_utf8_lossy(&stats.stdout);
    assert!(stdout.contains("Text length:      15"), "{stdout}");
    assert!(stdout.contains("Prefix length:    2"), "{stdout}");
}

#[test]
fn test_cli_json_output_to_stdout() {
    let temp = TempDir::new().unwrap();
    write_inputs(temp.path());
    let path = |name: &str| temp.path().join(name).to_string_lossy().into_owned();

    assert!(dnasa(&["build", &path("ref.fa"), &path("index")]).status.success());
    let query = dnasa(&[
        "query",
        &path("index"),
        &path("queries.fa"),
        "simpaccel",
        "-",
        "--format",
        "json",
        "--sequential",
    ]);
    assert!(query.status.success());

    let stdout = String::from_utf8(query.stdout).unwrap();
    let first: serde_json::Value = serde_json::from_str(stdout.lines().next().unwrap()).unwrap();
    assert_eq!(first["name"], "ta");
    assert_eq!(first["offsets"], serde_json::json!([11, 7]));
    assert_eq!(stdout.lines().count(), 5);
}

#[test]
fn test_cli_rejects_short_patterns() {
    let temp = TempDir::new().unwrap();
    write_inputs(temp.path());
    fs::write(temp.path().join("short.fa"), ">tiny\nA\n").unwrap();
    let path = |name: &str| temp.path().join(name).to_string_lossy().into_owned();

    assert!(dnasa(&["build", "--preftab", "3", &path("ref.fa"), &path("index")]).status.success());

    let rejected = dnasa(&["query", &path("index"), &path("short.fa"), "naive", &path("out.txt")]);
    assert!(!rejected.status.success());
    assert!(String::from_utf8_lossy(&rejected.stderr).contains("tiny"));

    let bypassed = dnasa(&[
        "query",
        &path("index"),
        &path("short.fa"),
        "naive",
        &path("out.txt"),
        "--short-patterns",
        "full-range",
    ]);
    assert!(bypassed.status.success());
    let out = fs::read_to_string(temp.path().join("out.txt")).unwrap();
    assert!(out.starts_with("tiny 6 "), "{out}");
}
