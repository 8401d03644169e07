//! # sheetsift-cli
//!
//! Command-line interface for sheetsift.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use sheetsift_core::{
    discover_headers, process, ExportFile, ExportFormat, HeaderSummary, MatchMode,
    ProcessOutcome, ProcessRequest, Upload,
};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// sift - filter spreadsheet rows and export the columns you need
#[derive(Parser)]
#[command(name = "sift")]
#[command(author, version, about = "Filter spreadsheet rows and export selected columns", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List the column headers of a workbook
    Headers {
        /// Workbook to inspect (.xlsx or .xls)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the headers as JSON
        #[arg(long)]
        json: bool,
    },
    /// Filter a workbook, then preview or export the selected columns
    Process(ProcessArgs),
}

#[derive(Args)]
struct ProcessArgs {
    /// Workbook to process (.xlsx or .xls)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Column to search (repeatable)
    #[arg(long = "filter-column", value_name = "COLUMN")]
    filter_columns: Vec<String>,

    /// Text to look for in the filter columns
    #[arg(short, long, default_value = "")]
    query: String,

    /// Require the whole cell to equal the query
    #[arg(long)]
    exact: bool,

    /// Compare case-sensitively
    #[arg(long)]
    case_sensitive: bool,

    /// Column to export, in output order (repeatable)
    #[arg(short = 'c', long = "column", value_name = "COLUMN")]
    columns: Vec<String>,

    /// Export format (csv, xlsx, vcf)
    #[arg(short, long, default_value = "csv")]
    format: ExportFormat,

    /// Text placed before each contact name (vcf only)
    #[arg(long)]
    prefix: Option<String>,

    /// Text placed after each contact name (vcf only)
    #[arg(long)]
    suffix: Option<String>,

    /// Print the first matching rows instead of exporting
    #[arg(short, long)]
    preview: bool,

    /// Where to write the export (defaults to the suggested name next to FILE)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(verbose_filter())
            .init();
    }

    match cli.command {
        Command::Headers { file, json } => {
            let summary = run_headers(&file)?;
            print_headers(&summary, json)
        }
        Command::Process(args) => match run_process(&args)? {
            ProcessOutcome::Preview(preview) => {
                println!("{}", serde_json::to_string_pretty(&preview)?);
                eprintln!(
                    "{} {} of {} matching rows",
                    "Showing".cyan().bold(),
                    preview.rows.len(),
                    preview.total
                );
                Ok(())
            }
            ProcessOutcome::Export(file) => {
                let path = write_export(&args, &file)?;
                println!(
                    "{} {} ({} bytes)",
                    "Wrote".green().bold(),
                    path.display(),
                    file.bytes.len()
                );
                Ok(())
            }
        },
    }
}

/// Pipeline stages log at `debug`, so `--verbose` shows them unless `RUST_LOG` says otherwise.
const VERBOSE_LEVEL: &str = "debug";

fn verbose_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(VERBOSE_LEVEL))
}

/// Read a workbook from disk as an upload named after the file.
fn load_upload(path: &Path) -> Result<Upload> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    debug!(%filename, size = bytes.len(), "loaded workbook");
    Ok(Upload::new(filename, bytes))
}

fn run_headers(path: &Path) -> Result<HeaderSummary> {
    let upload = load_upload(path)?;
    Ok(discover_headers(Some(&upload))?)
}

fn print_headers(summary: &HeaderSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    for header in &summary.headers {
        if summary.phone_columns.contains(header) {
            println!("{} {}", header, "(phone)".yellow());
        } else {
            println!("{header}");
        }
    }
    Ok(())
}

/// Translate command-line arguments into a process request.
fn build_request(args: &ProcessArgs, upload: Upload) -> ProcessRequest {
    let mode = if args.exact {
        MatchMode::Exact
    } else {
        MatchMode::Contains
    };
    ProcessRequest::new(upload)
        .with_filter_columns(&args.filter_columns)
        .with_query(args.query.clone(), mode, args.case_sensitive)
        .with_export_columns(&args.columns)
        .with_format(args.format)
        .with_affixes(args.prefix.clone(), args.suffix.clone())
        .with_preview(args.preview)
}

fn run_process(args: &ProcessArgs) -> Result<ProcessOutcome> {
    let upload = load_upload(&args.file)?;
    Ok(process(build_request(args, upload))?)
}

/// `--output`, or the suggested filename in the input's directory.
fn export_path(args: &ProcessArgs, file: &ExportFile) -> PathBuf {
    match &args.output {
        Some(path) => path.clone(),
        None => args
            .file
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&file.filename),
    }
}

fn write_export(args: &ProcessArgs, file: &ExportFile) -> Result<PathBuf> {
    let path = export_path(args, file);
    std::fs::write(&path, &file.bytes)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    Ok(path)
}
