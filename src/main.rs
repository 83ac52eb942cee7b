use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dnasa::index::{BuildConfig, IndexBuilder, IndexReader, IndexWriter, stats};
use dnasa::output::{OutputFormat, write_hits};
use dnasa::query::{Query, QueryConfig, QueryMode, QueryResolver, ShortPatternPolicy};
use dnasa::utils::progress::{finish_spinner, phase_spinner};
use dnasa::utils::read_fasta_file;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dnasa")]
#[command(about = "Exact substring search over genomes with suffix arrays")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an index from a FASTA reference
    Build {
        /// Reference FASTA file
        reference: PathBuf,

        /// Output index directory
        output: PathBuf,

        /// Build a prefix table over prefixes of this length
        #[arg(long, value_name = "K")]
        preftab: Option<usize>,

        /// Index only the first record
        #[arg(long)]
        first_record: bool,

        /// Seed for replacing ambiguous bases
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Resolve every query in a FASTA file against an index
    Query {
        /// Index directory
        index: PathBuf,

        /// Query FASTA file
        queries: PathBuf,

        /// Search strategy
        #[arg(value_enum)]
        mode: QueryMode,

        /// Output file ("-" for stdout)
        output: PathBuf,

        /// Handling of patterns shorter than the prefix table length
        #[arg(long, value_enum, default_value_t = ShortPatternPolicy::Reject)]
        short_patterns: ShortPatternPolicy,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Resolve queries on a single thread
        #[arg(long)]
        sequential: bool,
    },
    /// Show index statistics
    Stats {
        /// Index directory
        index: PathBuf,

        /// Check that the suffix array is a sorted permutation
        #[arg(long)]
        verify: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Build {
            reference,
            output,
            preftab,
            first_record,
            seed,
        } => {
            let config = BuildConfig {
                prefix_len: preftab,
                first_record_only: first_record,
                seed,
            };
            build(&reference, &output, config, cli.quiet)?;
        }
        Commands::Query {
            index,
            queries,
            mode,
            output,
            short_patterns,
            format,
            sequential,
        } => {
            let config = QueryConfig {
                mode,
                short_patterns,
                parallel: !sequential,
            };
            query(&index, &queries, &output, config, format)?;
        }
        Commands::Stats { index, verify } => {
            stats::show_stats(&index, verify)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build(reference: &Path, output: &Path, config: BuildConfig, quiet: bool) -> Result<()> {
    let started = Instant::now();

    let spinner = phase_spinner("Reading reference", quiet);
    let records = read_fasta_file(reference)?;
    finish_spinner(spinner);

    let mut builder = IndexBuilder::new(config);
    let added = builder.add_records(&records);
    info!(
        records = added,
        bases = builder.text_size(),
        ambiguous = builder.ambiguous_count(),
        "loaded reference"
    );

    let spinner = phase_spinner("Sorting suffixes", quiet);
    let built = builder.build().context("Failed to build index");
    finish_spinner(spinner);
    let built = built?;

    IndexWriter::write(output, &built.index, &built.meta)?;
    info!(
        dir = %output.display(),
        elapsed = ?started.elapsed(),
        "build finished"
    );
    Ok(())
}

fn query(
    index: &Path,
    queries: &Path,
    output: &Path,
    config: QueryConfig,
    format: OutputFormat,
) -> Result<()> {
    let started = Instant::now();
    let reader = IndexReader::open(index)?;

    let queries: Vec<Query> = read_fasta_file(queries)?
        .into_iter()
        .map(Query::from)
        .collect();

    let hits = QueryResolver::new(config).resolve_all(reader.view(), &queries)?;

    let mut writer: Box<dyn Write> = if output == Path::new("-") {
        Box::new(BufWriter::new(io::stdout().lock()))
    } else {
        let file = File::create(output)
            .with_context(|| format!("Failed to create {}", output.display()))?;
        Box::new(BufWriter::new(file))
    };
    write_hits(&mut writer, reader.view(), &hits, format)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(elapsed = ?started.elapsed(), "query finished");
    Ok(())
}
