//! lazyseq CLI: run, validate and explain query documents over JSON records.

use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use lazyseq_operators::Seq;
use lazyseq_planner::{
    effective_config, explain, lower, parse_query, parse_query_json, records_from_json,
    PlannerConfig, QueryDoc, Record, StringComparer,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lazyseq")]
#[command(about = "Lazy query pipelines over JSON records", long_about = None)]
struct Cli {
    /// Log lowering decisions and buffering operators to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query over JSON records and print the results as JSON lines
    Run {
        /// Path to the query document (YAML, or JSON with a .json extension)
        #[arg(short, long)]
        query: PathBuf,

        /// JSON array or JSON-lines input; stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output row cap (overrides env and document)
        #[arg(long)]
        max_rows: Option<i32>,

        /// Default string comparer: ordinal | case_insensitive
        #[arg(long, value_parser = parse_comparer)]
        comparer: Option<StringComparer>,
    },

    /// Validate a query document without reading any input
    Validate {
        #[arg(short, long)]
        query: PathBuf,
    },

    /// Show the stages, fingerprint and effective config of a query
    Explain {
        #[arg(short, long)]
        query: PathBuf,

        #[arg(long, value_parser = parse_comparer)]
        comparer: Option<StringComparer>,
    },
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            query,
            input,
            max_rows,
            comparer,
        } => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            let result = run_query(&query, input.as_deref(), max_rows, comparer, &mut out)
                .and_then(|rows| {
                    out.flush()?;
                    Ok(rows)
                });
            match result {
                Ok(rows) => tracing::info!(rows, "query finished"),
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Validate { query } => {
            if let Err(e) = validate_query(&query) {
                eprintln!("Validation failed: {e}");
                std::process::exit(1);
            }
            println!("✓ Query is valid");
        }
        Commands::Explain { query, comparer } => {
            if let Err(e) = explain_query(&query, comparer) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn parse_comparer(s: &str) -> Result<StringComparer, String> {
    StringComparer::parse(s).ok_or_else(|| format!("unknown comparer '{s}'"))
}

fn load_query(path: &Path) -> CliResult<QueryDoc> {
    let text = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let doc = if is_json {
        parse_query_json(&text)?
    } else {
        parse_query(&text)?
    };
    Ok(doc)
}

/// Env < document < CLI flags.
fn resolve_config(
    doc: &QueryDoc,
    max_rows: Option<i32>,
    comparer: Option<StringComparer>,
) -> PlannerConfig {
    let mut cfg = effective_config(&PlannerConfig::from_env(), doc);
    apply_cli_overrides(&mut cfg, max_rows, comparer);
    cfg
}

fn apply_cli_overrides(
    cfg: &mut PlannerConfig,
    max_rows: Option<i32>,
    comparer: Option<StringComparer>,
) {
    if let Some(n) = max_rows {
        cfg.max_output_rows = Some(n);
    }
    if let Some(c) = comparer {
        cfg.string_comparer = c;
    }
}

fn run_query<W: Write>(
    query_path: &Path,
    input: Option<&Path>,
    max_rows: Option<i32>,
    comparer: Option<StringComparer>,
    out: &mut W,
) -> CliResult<u64> {
    let doc = load_query(query_path)?;
    let config = resolve_config(&doc, max_rows, comparer);

    let text = match input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let records = records_from_json(&text)?;
    tracing::debug!(records = records.len(), "input loaded");

    write_results(&doc, Seq::from_vec(records), &config, out)
}

fn write_results<W: Write>(
    doc: &QueryDoc,
    source: Seq<Record>,
    config: &PlannerConfig,
    out: &mut W,
) -> CliResult<u64> {
    let pipeline = lower(doc, source, config)?;
    let mut rows = 0u64;
    for record in pipeline.iter() {
        let record = record?;
        serde_json::to_writer(&mut *out, &record.to_json())?;
        writeln!(out)?;
        rows += 1;
    }
    Ok(rows)
}

fn validate_query(query_path: &Path) -> CliResult<()> {
    let doc = load_query(query_path)?;
    let config = effective_config(&PlannerConfig::from_env(), &doc);
    lower(&doc, Seq::empty(), &config)?;
    Ok(())
}

fn explain_query(query_path: &Path, comparer: Option<StringComparer>) -> CliResult<()> {
    let doc = load_query(query_path)?;
    let mut base = PlannerConfig::from_env();
    apply_cli_overrides(&mut base, None, comparer);
    let plan = explain(&doc, &base)?;
    println!("{plan}");
    Ok(())
}
