//! table-guard command line
//!
//! Validates a dataset against a YAML rule file and writes JSON and Markdown
//! reports next to the given output prefix.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use table_guard::config::load_rules;
use table_guard::core::{Report, Validator};
use table_guard::formatters::write_reports;
use table_guard::logging::setup::{init_logging, LoggingConfig};
use table_guard::prelude::{ErrorContext, Result};
use table_guard::sources::load_table;
use tracing::error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Dataset to validate (.csv, .json, .jsonl, .ndjson, .parquet, .xlsx or .xls)
    #[arg(long)]
    input: PathBuf,

    /// YAML rule configuration
    #[arg(long)]
    config: PathBuf,

    /// Report path prefix; `.json` and `.md` are appended
    #[arg(long, default_value = "validation_report")]
    output: PathBuf,

    /// Evaluate rules on worker threads
    #[arg(long)]
    parallel: bool,

    /// Upper bound on worker threads (defaults to the CPU count)
    #[arg(long, requires = "parallel")]
    max_workers: Option<usize>,

    /// Log output format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// More log detail; repeat for traces
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors; overrides -v
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let logging = LoggingConfig::from_verbosity(args.verbose, args.quiet)
        .with_json_format(args.log_format == LogFormat::Json);
    if let Err(e) = init_logging(logging) {
        eprintln!("warning: logging disabled: {e}");
    }

    match run(&args).await {
        Ok(_) => {
            println!(
                "✅ Validation completed. Reports saved as {0}.json and {0}.md",
                args.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Validation run failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<Report> {
    let rules = load_rules(&args.config)?;
    let table = load_table(&args.input)
        .await
        .with_context(|| format!("loading dataset {}", args.input.display()))?;

    let mut builder = Validator::builder().parallel(args.parallel);
    if let Some(workers) = args.max_workers {
        builder = builder.max_workers(workers);
    }
    let report = builder.build().validate(&table, &rules);

    write_reports(&report, &args.output)?;
    Ok(report)
}
