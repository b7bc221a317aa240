use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use axiom_logic::batch::FileStatus;
use axiom_logic::discovery::{DEFAULT_OUTPUT_DIR, DEFAULT_PATTERN};
use axiom_logic::model::AssembleOptions;
use axiom_logic::parser::{ParseOptions, GROUPING_MARKER};
use axiom_logic::{run_extraction, ExtractOptions, InputSource};

#[derive(Parser)]
#[command(name = "axiom-logic")]
#[command(author, version, about = "Extract report logic from Axiom log files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract logic from Axiom logs into an Excel workbook
    Extract {
        /// Directory searched recursively for log files
        #[arg(short, long, required_unless_present = "input_file")]
        input_dir: Option<PathBuf>,

        /// Single log file to extract (no Report/Schedule columns)
        #[arg(short = 'f', long, conflicts_with = "input_dir")]
        input_file: Option<PathBuf>,

        /// Output path for the .xlsx file (defaults to a timestamped file in --output-dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for the default output file
        #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,

        /// File-name glob for log files
        #[arg(short, long, default_value = DEFAULT_PATTERN)]
        pattern: String,

        /// Match statement and boundary markers case-sensitively
        #[arg(long)]
        case_sensitive_markers: bool,

        /// Marker that starts a new statement when grouping lines
        #[arg(long, default_value = GROUPING_MARKER)]
        statement_marker: String,

        /// Keep rows whose logic references no qualified field
        #[arg(long)]
        keep_rows_without_elements: bool,

        /// Unaligned cells tolerated per file before warning
        #[arg(long, default_value_t = 0)]
        alignment_threshold: usize,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input_dir,
            input_file,
            output,
            output_dir,
            pattern,
            case_sensitive_markers,
            statement_marker,
            keep_rows_without_elements,
            alignment_threshold,
            verbose,
        } => {
            init_tracing(verbose);

            let input = match (input_file, input_dir) {
                (Some(file), _) => InputSource::File(file),
                (None, Some(dir)) => InputSource::Directory(dir),
                (None, None) => anyhow::bail!("either --input-dir or --input-file is required"),
            };

            let options = ExtractOptions {
                input,
                output_path: output,
                output_dir,
                pattern,
                parse: ParseOptions {
                    case_sensitive_markers,
                    statement_marker,
                    ..ParseOptions::default()
                },
                assemble: AssembleOptions {
                    alignment_threshold,
                    keep_rows_without_elements,
                },
            };

            let summary = run_extraction(options)?;

            for outcome in summary.failed() {
                if let FileStatus::Failed { error } = &outcome.status {
                    eprintln!("Failed: {} ({})", outcome.path.display(), error);
                }
            }

            if summary.is_empty() {
                println!("No logic was extracted from the input logs.");
            }
            println!(
                "Wrote {} rows to {}",
                summary.rows,
                summary.output_path.display()
            );
        }
    }

    Ok(())
}
