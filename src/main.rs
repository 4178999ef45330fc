use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fmx::bench::BenchRunner;
use fmx::config::Config;
use fmx::index::TextIndex;
use fmx::index::suffix_array::SuffixArrayBuilder;
use fmx::metadata::{IntervalTree, Metadata};
use fmx::output;
use fmx::query::{QueryExecutor, QuerySpec, SearchMode, load_metadata, load_queries, load_text};
use fmx::utils::{phase_spinner, timed};
use serde_json::Value;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fmx")]
#[command(about = "Suffix-array substring search with approximate matching and metadata lookup")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Fold ASCII case in the text and in every pattern
    #[arg(short = 'i', long, global = true)]
    ignore_case: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// More logging (-v info, -vv debug); FMX_LOG overrides when no -v is given
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Build all structures with timings, then benchmark every query
    Run {
        /// Text file to index
        text: PathBuf,

        /// JSON array of { begin, end, value } entries
        metadata: PathBuf,

        /// JSON array of queries
        queries: PathBuf,

        /// Timed runs per query
        #[arg(short, long)]
        repeats: Option<usize>,

        /// Untimed runs per query before timing
        #[arg(short, long)]
        warmup: Option<usize>,

        /// Print every matched string with its metadata
        #[arg(long)]
        show_matches: bool,
    },
    /// Run one query and print its occurrences
    Search {
        /// Text file to index
        text: PathBuf,

        /// Pattern to search for
        pattern: String,

        /// Search algorithm
        #[arg(short, long, value_enum, default_value_t = SearchMode::Backwards)]
        mode: SearchMode,

        /// Allow up to this many edits (approximate search)
        #[arg(short, long)]
        budget: Option<usize>,

        /// JSON array of { begin, end, value } entries to attach to matches
        #[arg(long)]
        metadata: Option<PathBuf>,

        /// Maximum occurrences to print
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },
    /// Show index statistics
    Stats {
        /// Text file to index
        text: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if cli.ignore_case {
        config.index.case_insensitive = true;
    }
    let color = !cli.no_color;

    match cli.command {
        Commands::Run {
            text,
            metadata,
            queries,
            repeats,
            warmup,
            show_matches,
        } => {
            if let Some(repeats) = repeats {
                config.bench.query_repeats = repeats;
            }
            if let Some(warmup) = warmup {
                config.bench.warmup_repeats = warmup;
            }
            config.bench.show_matches |= show_matches;
            run_benchmark(&config, &text, &metadata, &queries, color)?;
        }
        Commands::Search {
            text,
            pattern,
            mode,
            budget,
            metadata,
            limit,
        } => {
            let query = match budget {
                Some(budget) => QuerySpec::approximate(pattern, mode, budget),
                None => QuerySpec::exact(pattern, mode),
            };
            run_search(&config, &text, metadata.as_deref(), &query, limit, color)?;
        }
        Commands::Stats { text } => {
            let index = build_index(&config, &text, false, color)?;
            output::print_stats(&index.stats(), color)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("FMX_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Build the suffix array and BWT index, printing phase timings when
/// `report` is set
fn build_index(config: &Config, path: &Path, report: bool, color: bool) -> Result<TextIndex> {
    let content = load_text(path)?;
    let show_spinner = std::io::stderr().is_terminal();
    let builder = SuffixArrayBuilder::new(config.index.clone());

    let spinner = phase_spinner("Sorting suffixes", show_spinner);
    let (built, elapsed) = timed(|| builder.build(&content));
    spinner.finish_and_clear();
    let built = built.with_context(|| format!("Failed to index {}", path.display()))?;
    info!(text_len = built.text.len(), ?elapsed, "suffix array built");
    if report {
        output::print_phase("Suffix array construction", elapsed, color)?;
    }

    let spinner = phase_spinner("Building rank index", show_spinner);
    let (index, elapsed) = timed(|| TextIndex::from_built(built, config.index.case_insensitive));
    spinner.finish_and_clear();
    let index = index.context("Failed to build rank index")?;
    info!(alphabet = index.bwt().alphabet().len(), ?elapsed, "rank index built");
    if report {
        output::print_phase("Rank index construction", elapsed, color)?;
    }

    Ok(index)
}

fn build_tree(path: &Path, color: bool) -> Result<IntervalTree<Value>> {
    let entries: Vec<Metadata<Value>> = load_metadata(path)?;

    let (tree, elapsed) = timed(|| IntervalTree::new(entries));
    info!(entries = tree.len(), nodes = tree.node_count(), ?elapsed, "interval tree built");
    output::print_phase("Interval tree construction", elapsed, color)?;

    Ok(tree)
}

fn run_benchmark(
    config: &Config,
    text: &Path,
    metadata: &Path,
    queries: &Path,
    color: bool,
) -> Result<()> {
    let index = build_index(config, text, true, color)?;
    let tree = build_tree(metadata, color)?;
    let queries = load_queries(queries)?;
    info!(count = queries.len(), "queries loaded");

    let executor = QueryExecutor::with_config(&index, &tree, config.search.clone());
    let runner = BenchRunner::new(executor, config.bench.clone());

    for query in &queries {
        match runner.run(query) {
            Ok(report) => output::print_report(&report, color)?,
            Err(e) => warn!(%query, error = %e, "skipping query"),
        }
    }

    Ok(())
}

fn run_search(
    config: &Config,
    text: &Path,
    metadata: Option<&Path>,
    query: &QuerySpec,
    limit: usize,
    color: bool,
) -> Result<()> {
    let index = build_index(config, text, false, color)?;
    let tree: IntervalTree<Value> = match metadata {
        Some(path) => IntervalTree::new(load_metadata(path)?),
        None => IntervalTree::new(Vec::new()),
    };

    let executor = QueryExecutor::with_config(&index, &tree, config.search.clone());
    let hits = executor.search_text(query)?;
    info!(%query, matches = hits.len(), occurrences = hits.occurrences(), "search done");

    output::print_hits(&index, &hits, limit, color, |m, position| {
        executor
            .metadata_at(m, position)
            .iter()
            .map(|entry| entry.value.to_string())
            .collect()
    })?;

    Ok(())
}
