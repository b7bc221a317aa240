//! Run the extraction pipeline over files

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::discovery::report_key;
use crate::error::AxiomLogicError;
use crate::model::{assemble, AssembleOptions, Assembly, ExtractionNotice, LogicRow, LogicTable};
use crate::parser::{parse_log, LogFile, ParseOptions};

/// Minimum number of files to benefit from parallel processing.
/// Below this threshold, sequential processing is faster due to rayon overhead.
pub const PARALLEL_THRESHOLD: usize = 8;

/// Extraction result for one log file
#[derive(Debug, Clone)]
pub struct FileExtraction {
    pub path: PathBuf,
    pub statements: usize,
    pub assembly: Assembly,
}

/// Per-file status in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Extracted {
        rows: usize,
        notices: Vec<ExtractionNotice>,
    },
    Failed {
        error: String,
    },
}

/// What happened to one file of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub report: String,
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, FileStatus::Failed { .. })
    }
}

/// Combined table and per-file outcomes of a batch
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub table: LogicTable,
    pub outcomes: Vec<FileOutcome>,
}

impl BatchResult {
    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_failed())
    }
}

/// Parse and assemble an already-read log.
pub fn extract_log(
    log: &LogFile,
    parse_options: &ParseOptions,
    assemble_options: &AssembleOptions,
) -> FileExtraction {
    let statements = parse_log(log, parse_options);
    let assembly = assemble(&statements, assemble_options);

    tracing::debug!(
        path = %log.path().display(),
        statements = statements.len(),
        candidates = assembly.candidate_rows,
        reportable = assembly.reportable_rows,
        rows = assembly.rows.len(),
        "extracted logic"
    );
    for notice in &assembly.notices {
        tracing::warn!(path = %log.path().display(), "{}", notice);
    }

    FileExtraction {
        path: log.path().to_path_buf(),
        statements: statements.len(),
        assembly,
    }
}

/// Read, parse and assemble one log file.
pub fn extract_file(
    path: &Path,
    parse_options: &ParseOptions,
    assemble_options: &AssembleOptions,
) -> Result<FileExtraction, AxiomLogicError> {
    let log = LogFile::open(path)?;
    Ok(extract_log(&log, parse_options, assemble_options))
}

/// Extract every file and concatenate the rows in input order, tagged with
/// `Report` and `Schedule`.
///
/// A file that cannot be read is recorded as failed; the rest of the batch
/// still runs.
pub fn process_files(
    files: &[PathBuf],
    parse_options: &ParseOptions,
    assemble_options: &AssembleOptions,
) -> BatchResult {
    let run = |path: &PathBuf| extract_file(path, parse_options, assemble_options);

    let results: Vec<Result<FileExtraction, AxiomLogicError>> = if files.len() >= PARALLEL_THRESHOLD
    {
        files.par_iter().map(run).collect()
    } else {
        files.iter().map(run).collect()
    };

    let mut rows: Vec<LogicRow> = Vec::new();
    let mut outcomes = Vec::with_capacity(files.len());

    for (path, result) in files.iter().zip(results) {
        let report = report_key(path);
        let status = match result {
            Ok(extraction) => {
                let Assembly {
                    rows: file_rows,
                    notices,
                    ..
                } = extraction.assembly;
                let count = file_rows.len();
                rows.extend(file_rows.into_iter().map(|row| row.with_report(&report)));
                FileStatus::Extracted {
                    rows: count,
                    notices,
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping file");
                FileStatus::Failed {
                    error: e.to_string(),
                }
            }
        };
        outcomes.push(FileOutcome {
            path: path.clone(),
            report,
            status,
        });
    }

    let failed = outcomes.iter().filter(|o| o.is_failed()).count();
    tracing::info!(
        files = files.len(),
        failed,
        rows = rows.len(),
        "batch complete"
    );

    BatchResult {
        table: LogicTable::new(rows, true),
        outcomes,
    }
}
