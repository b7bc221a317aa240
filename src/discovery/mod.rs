//! Input discovery and output naming

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use walkdir::WalkDir;

use crate::error::AxiomLogicError;

/// File-name pattern used when none is given
pub const DEFAULT_PATTERN: &str = "*.log";

/// Directory workbooks are written to when none is given
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// Report name used when no file name yields one
pub const FALLBACK_REPORT_NAME: &str = "axiom";

const OUTPUT_SUFFIX: &str = "_axiom_log_file_logic_extraction_";

/// Log files under `input_dir` whose file name matches `pattern`.
///
/// The walk is recursive and sorted by file name so batch order is stable
/// across platforms.
pub fn discover_log_files(input_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, AxiomLogicError> {
    if !input_dir.is_dir() {
        return Err(AxiomLogicError::InputDirNotFound {
            path: input_dir.to_path_buf(),
        });
    }

    let matcher = glob::Pattern::new(pattern).map_err(|e| AxiomLogicError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in WalkDir::new(input_dir).follow_links(true).sort_by_file_name() {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && name_matches(&matcher, entry.path()) {
                    files.push(entry.into_path());
                }
            }
            // Matching entries that cannot be inspected stay in the batch so
            // the read failure is recorded against them.
            Err(err) => match err.path() {
                Some(path) if name_matches(&matcher, path) => {
                    tracing::warn!(path = %path.display(), error = %err, "cannot inspect log file");
                    files.push(path.to_path_buf());
                }
                _ => tracing::warn!(error = %err, "skipping unreadable entry"),
            },
        }
    }

    Ok(files)
}

fn name_matches(matcher: &glob::Pattern, path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| matcher.matches(name))
}

/// Key identifying a file in batch output: its stem.
pub fn report_key(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Report name for the output file.
///
/// Axiom exports are named like `axiom_FFIEC031_RC_20240331.log`; the
/// second and third `_` components are joined and lower-cased
/// (`ffiec031rc`). The last file wins. Names with fewer components fall
/// back to the lower-cased stem.
pub fn report_name(files: &[PathBuf]) -> String {
    files
        .last()
        .and_then(|path| path.file_name())
        .map(|name| name.to_string_lossy())
        .and_then(|name| {
            let parts: Vec<&str> = name.split('_').collect();
            match parts.as_slice() {
                [_, second, third, ..] => Some(format!("{second}{third}")),
                _ => files.last().map(|path| report_key(path)),
            }
        })
        .map(|name| name.to_lowercase())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_REPORT_NAME.to_string())
}

/// `<report>_axiom_log_file_logic_extraction_<YYYY-MM-DD HH-MM-SS>.xlsx`
pub fn output_file_name<Tz: TimeZone>(report: &str, timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}{}{}.xlsx",
        report,
        OUTPUT_SUFFIX,
        timestamp.format("%Y-%m-%d %H-%M-%S")
    )
}

/// Default workbook path inside `output_dir`.
pub fn default_output_path<Tz: TimeZone>(
    output_dir: &Path,
    report: &str,
    timestamp: &DateTime<Tz>,
) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    output_dir.join(output_file_name(report, timestamp))
}
