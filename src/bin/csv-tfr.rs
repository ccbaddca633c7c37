//! CLI: transform, filter and remember a delimited table read from stdin.
//!
//! Usage:
//!   csv-tfr 1=0 0=1 < groceries.csv
//!   csv-tfr 1=0 -f 1=potatoes < groceries.csv
//!   csv-tfr 1=0 -i 1 -d state < groceries.csv
//!   csv-tfr 1=0 -i 1 -f state/fout.txt -k state/fin.txt -d state < groceries.csv

use clap::Parser;
use csv_tfr::{
    ColumnMap, Config, FilterSet, Pipeline, Prompter, StateTarget, TfrError, TtyPrompter,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// Take a csv from stdin and [t]ransform, [f]ilter it then [r]emember for the next run.
///
/// Rows can be filtered interactively; the answers are stored so the next
/// run can be partially automated.
#[derive(Parser)]
#[command(name = "csv-tfr")]
struct Cli {
    /// Column mappings {from}={to}; items without '=' are ignored
    mappings: Vec<String>,

    /// Input separator, e.g. '|' for psv or a tab for tsv
    #[arg(short, long, default_value = ",")]
    separator: String,

    /// Output separator
    #[arg(short, long, default_value = ",")]
    output_separator: String,

    /// Drop rows where {column}={value}, or a single file stored by a previous run
    #[arg(short = 'f', long = "filter-out", value_name = "SPEC")]
    filter_out: Vec<String>,

    /// Keep rows where {column}={value}, or a single file stored by a previous run
    /// (interactive mode only)
    #[arg(short = 'k', long = "filter-in", value_name = "SPEC")]
    filter_in: Vec<String>,

    /// Column whose value is remembered when asking about rows; negative disables
    #[arg(
        short = 'i',
        long = "filter-interactive",
        value_name = "COLUMN",
        default_value_t = -1,
        allow_negative_numbers = true
    )]
    filter_interactive: i64,

    /// Directory for fout.txt/fin.txt; without it the filters go to stderr
    #[arg(short = 'd', long = "state-dir", value_name = "DIR")]
    state_dir: Option<PathBuf>,

    /// Show record counts and where the filters went on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), TfrError> {
    let interactive_column = usize::try_from(cli.filter_interactive).ok();

    if interactive_column.is_none() && !cli.filter_in.is_empty() {
        return Err(TfrError::Usage(
            "--filter-in is only valid together with --filter-interactive".to_string(),
        ));
    }

    // Every spec is validated before any I/O happens.
    let column_map = ColumnMap::parse(&cli.mappings)?;
    let exclude = FilterSet::load(&cli.filter_out)?;
    let include = FilterSet::load(&cli.filter_in)?;

    let state_target = match &cli.state_dir {
        Some(dir) => StateTarget::Directory(dir.clone()),
        None => StateTarget::Diagnostic,
    };

    let config = Config {
        input_separator: cli.separator,
        output_separator: cli.output_separator,
        column_map,
        interactive_column,
        state_target,
    };

    let prompter: Option<Box<dyn Prompter>> = match interactive_column {
        Some(_) => Some(Box::new(TtyPrompter::open()?)),
        None => None,
    };

    let mut pipeline = Pipeline::new(config, exclude, include, prompter)?;
    let summary = pipeline.run(io::stdin().lock(), io::stdout().lock(), io::stderr())?;

    if cli.verbose {
        let target = match &cli.state_dir {
            Some(dir) => dir.display().to_string(),
            None => "(stderr)".to_string(),
        };
        eprintln!();
        eprintln!(
            "Records:  {} in -> {} out",
            summary.input_count, summary.output_count
        );
        eprintln!("Filters:  {target}");
    }

    Ok(())
}
