//! Load Axiom log files into memory

use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1252;

use crate::error::AxiomLogicError;

/// Read a file as a string, trying UTF-8 first, then Windows-1252 as fallback
fn read_file_with_encoding_fallback(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(err) => {
            // Non-UTF-8 logs are Windows-1252
            let bytes = err.into_bytes();
            let (decoded, _, had_errors) = WINDOWS_1252.decode(&bytes);
            if had_errors {
                Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "File contains invalid characters",
                ))
            } else {
                Ok(decoded.into_owned())
            }
        }
    }
}

/// An Axiom log file held in memory as an immutable list of lines.
///
/// Line terminators are stripped; everything else (tabs included) is kept
/// verbatim so that marker searches see exactly what the tool wrote.
#[derive(Debug, Clone)]
pub struct LogFile {
    path: PathBuf,
    lines: Vec<String>,
}

impl LogFile {
    /// Read a log file from disk.
    pub fn open(path: &Path) -> Result<Self, AxiomLogicError> {
        let content =
            read_file_with_encoding_fallback(path).map_err(|e| AxiomLogicError::FileAccess {
                path: path.to_path_buf(),
                source: e,
            })?;
        Ok(Self::from_text(path, &content))
    }

    /// Build a log file from text that is already in memory.
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        // Strip UTF-8 BOM if present
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
        Self {
            path: path.into(),
            lines: split_lines(text),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Lines `start..=end` using 1-based line numbers, clamped to the file.
    pub fn span(&self, start: usize, end: usize) -> &[String] {
        let from = start.saturating_sub(1).min(self.lines.len());
        let to = end.min(self.lines.len()).max(from);
        &self.lines[from..to]
    }
}

/// Split on `\r\n`, `\n` or a lone `\r`. A trailing terminator does not
/// start an extra empty line.
fn split_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text
        .split("\r\n")
        .flat_map(|chunk| chunk.split(['\r', '\n']))
        .map(str::to_string)
        .collect();
    if text.is_empty() || text.ends_with(['\r', '\n']) {
        lines.pop();
    }
    lines
}
