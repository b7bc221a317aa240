//! axiom-logic: Reverse-engineer regulatory report logic from Axiom logs
//!
//! This library scans Axiom calculation logs for captured SQL INSERT
//! statements and recovers, per report cell, the MDRM code, the fields
//! feeding it and the filters applied upstream. Results are written to an
//! Excel workbook.

pub mod batch;
pub mod discovery;
pub mod error;
pub mod model;
pub mod parser;
pub mod util;
pub mod workbook;

use std::path::{Path, PathBuf};

use anyhow::Result;

pub use error::AxiomLogicError;

use batch::{FileOutcome, FileStatus};
use model::{AssembleOptions, LogicTable};
use parser::ParseOptions;

/// Where log files are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Every matching file under a directory, with batch columns
    Directory(PathBuf),
    /// A single log file, without batch columns
    File(PathBuf),
}

/// Options for an extraction run
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub input: InputSource,
    /// Output path for the .xlsx file
    pub output_path: Option<PathBuf>,
    /// Directory for the timestamped default output file
    pub output_dir: PathBuf,
    /// File-name glob applied during directory discovery
    pub pattern: String,
    pub parse: ParseOptions,
    pub assemble: AssembleOptions,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            input: InputSource::Directory(PathBuf::from(".")),
            output_path: None,
            output_dir: PathBuf::from(discovery::DEFAULT_OUTPUT_DIR),
            pattern: discovery::DEFAULT_PATTERN.to_string(),
            parse: ParseOptions::default(),
            assemble: AssembleOptions::default(),
        }
    }
}

/// Result of an extraction run
#[derive(Debug, Clone)]
pub struct ExtractionSummary {
    pub output_path: PathBuf,
    pub rows: usize,
    pub outcomes: Vec<FileOutcome>,
}

impl ExtractionSummary {
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_failed())
    }
}

/// Extract logic from a single log file into an in-memory table.
pub fn extract_logic(path: &Path, options: &ExtractOptions) -> Result<LogicTable> {
    let extraction = batch::extract_file(path, &options.parse, &options.assemble)?;
    Ok(LogicTable::new(extraction.assembly.rows, false))
}

/// Discover, extract and write the workbook
pub fn run_extraction(options: ExtractOptions) -> Result<ExtractionSummary> {
    // Step 1: Resolve the input files
    let (table, outcomes, files) = match &options.input {
        InputSource::Directory(dir) => {
            let files = discovery::discover_log_files(dir, &options.pattern)?;
            tracing::info!(dir = %dir.display(), files = files.len(), "discovered log files");

            // Step 2: Run the pipeline on every file
            let result = batch::process_files(&files, &options.parse, &options.assemble);
            (result.table, result.outcomes, files)
        }
        InputSource::File(path) => {
            let extraction = batch::extract_file(path, &options.parse, &options.assemble)?;
            let outcome = FileOutcome {
                path: path.clone(),
                report: discovery::report_key(path),
                status: FileStatus::Extracted {
                    rows: extraction.assembly.rows.len(),
                    notices: extraction.assembly.notices,
                },
            };
            let table = LogicTable::new(extraction.assembly.rows, false);
            (table, vec![outcome], vec![path.clone()])
        }
    };

    // Step 3: Determine output path
    let output_path = options.output_path.clone().unwrap_or_else(|| {
        let report = discovery::report_name(&files);
        discovery::default_output_path(&options.output_dir, &report, &chrono::Local::now())
    });

    // Step 4: Write the workbook, even when empty
    workbook::create_workbook(&table, &output_path)?;
    tracing::info!(
        path = %output_path.display(),
        rows = table.rows.len(),
        "wrote workbook"
    );

    Ok(ExtractionSummary {
        output_path,
        rows: table.rows.len(),
        outcomes,
    })
}
