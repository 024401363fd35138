//! sheetsplit - split Excel/CSV files based on dates in a specified column.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sheetsplit::config::SheetConfigSet;
use sheetsplit::error::Result;
use sheetsplit::loader::{self, LoadedFile, CSV_SHEET_NAME};
use sheetsplit::resolve::resolve_sheet_configs;
use sheetsplit::select::select_sheets;

/// Time interval used to partition rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
enum Interval {
    Day,
    Week,
    #[default]
    Month,
    Year,
    /// Twelve-month accounting period starting at --financial-year-start.
    FinancialYear,
}

#[derive(Parser, Debug)]
#[command(name = "sheetsplit")]
#[command(version, about = "Split Excel/CSV files based on dates in a specified column")]
struct Args {
    /// Input Excel (.xlsx, .xls) or CSV file
    #[arg(short, long, value_name = "PATH")]
    file: PathBuf,

    /// Name of the column containing date values
    #[arg(
        short = 'd',
        long,
        value_name = "COLUMN",
        required_unless_present = "sheet_config"
    )]
    date_column: Option<String>,

    /// Custom date format (e.g. '%Y-%m-%d'); auto-detected when omitted
    #[arg(long, value_name = "FORMAT")]
    date_format: Option<String>,

    /// Time interval for splitting data
    #[arg(short, long, value_enum, default_value_t = Interval::Month)]
    interval: Interval,

    /// Start month of the financial year (1-12)
    #[arg(
        long,
        value_name = "MONTH",
        default_value_t = 4,
        value_parser = clap::value_parser!(u32).range(1..=12)
    )]
    financial_year_start: u32,

    /// Directory for output files
    #[arg(short, long, value_name = "PATH", default_value = "./split_output")]
    output_dir: PathBuf,

    /// Sheet names to process (Excel only)
    #[arg(
        long,
        num_args = 1..,
        value_name = "SHEET",
        conflicts_with_all = ["exclude", "sheet_config"]
    )]
    include: Vec<String>,

    /// Sheet names to skip (Excel only)
    #[arg(long, num_args = 1.., value_name = "SHEET", conflicts_with = "sheet_config")]
    exclude: Vec<String>,

    /// JSON file with per-sheet configuration
    #[arg(long, value_name = "PATH")]
    sheet_config: Option<PathBuf>,

    /// Print debug detail
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Print errors only
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    if let Err(e) = run(args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// RUST_LOG wins when set; otherwise the verbosity flags pick the level.
fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<()> {
    let sheet_config = match &args.sheet_config {
        Some(path) => Some(SheetConfigSet::from_path(path)?),
        None => None,
    };

    let (tables, selected) = match loader::load_file(&args.file)? {
        LoadedFile::Workbook(tables) => {
            let available: Vec<String> = tables.keys().cloned().collect();
            info!("workbook contains sheets: {:?}", available);

            let selected = select_sheets(
                &available,
                non_empty(&args.include),
                non_empty(&args.exclude),
                sheet_config.as_ref(),
            )?;
            (tables, selected)
        }
        LoadedFile::Csv(table) => {
            if !args.include.is_empty() || !args.exclude.is_empty() {
                warn!("--include/--exclude are Excel-only and will be ignored for a CSV file");
            }

            let name = csv_sheet_name(sheet_config.as_ref());
            info!("processing CSV file as single sheet '{name}'");
            let mut tables = BTreeMap::new();
            tables.insert(name.clone(), table);
            (tables, vec![name])
        }
    };

    let resolved = resolve_sheet_configs(
        &selected,
        Some(&tables),
        args.date_column.as_deref(),
        args.date_format.as_deref(),
        sheet_config.as_ref(),
    )?;

    for (sheet, config) in &resolved {
        let Some(table) = tables.get(sheet) else {
            continue;
        };
        info!("validating date column for sheet '{sheet}'");
        loader::validate_date_column(table, &config.date_column)?;
    }

    info!("file loading and configuration processing completed");
    info!("split interval: {:?}", args.interval);
    if args.interval == Interval::FinancialYear {
        info!("financial year starts in month {}", args.financial_year_start);
    }
    info!("output directory: {}", args.output_dir.display());

    // TODO: partition each sheet's rows by the chosen interval and write the
    // per-range output files.
    info!("date partitioning and output writing are not implemented yet");

    Ok(())
}

/// A CLI list flag that was never passed is an absent filter, not an empty one.
fn non_empty(names: &[String]) -> Option<&[String]> {
    if names.is_empty() {
        None
    } else {
        Some(names)
    }
}

/// A single-entry sheet config names the CSV's synthetic sheet.
fn csv_sheet_name(config: Option<&SheetConfigSet>) -> String {
    match config {
        Some(config) if config.len() == 1 => config
            .sheet_names()
            .next()
            .unwrap_or(CSV_SHEET_NAME)
            .to_string(),
        _ => CSV_SHEET_NAME.to_string(),
    }
}
