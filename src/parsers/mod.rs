//! Source adapters that turn transcript JSONL files into normalized [`Record`]s
//!
//! # Error Handling Strategy
//!
//! Transcripts are written by other programs and partial corruption is expected, so parsing
//! degrades gracefully:
//!
//! - **Individual line failures**: Lines that are not JSON, are not valid UTF-8, or describe a
//!   record with missing/invalid fields are logged as warnings, counted and skipped.
//!
//! - **Schema mismatch**: A file whose content never matches the adapter's schema is reported
//!   as unrecognized ([`ParsedFile::recognized`] is false) and contributes no records.
//!
//! - **I/O failures**: Failing to open or read a file returns an error for that file only;
//!   the loader decides what to do with it.

pub mod claude;
pub mod codex;
pub mod deserializers;

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use anyhow::{Context, Result};
pub use claude::ClaudeAdapter;
pub use codex::CodexAdapter;
use serde_json::Value;
use tracing::warn;

use crate::models::{Record, SourceFormat};
use crate::utils::validate_file_size;

/// Result of parsing one transcript file
#[derive(Debug, Default)]
pub struct ParsedFile {
    pub records: Vec<Record>,
    pub malformed_lines: usize,
    /// False when nothing in the file matched the adapter's schema
    pub recognized: bool,
}

/// One implementation per on-disk transcript schema
pub trait SourceAdapter {
    fn format(&self) -> SourceFormat;

    /// How many directory levels below the root transcript files may live
    fn max_depth(&self) -> usize;

    /// Parse a single transcript file into records tagged with session and project
    fn parse_file(&self, path: &Path) -> Result<ParsedFile>;
}

/// Adapter for the given source format
pub fn adapter_for(format: SourceFormat) -> Box<dyn SourceAdapter> {
    match format {
        SourceFormat::Claude => Box::new(ClaudeAdapter),
        SourceFormat::Codex => Box::new(CodexAdapter),
    }
}

/// What an adapter made of one JSON line
pub(crate) enum LineVerdict {
    Continue,
    Malformed(String),
    /// Stop reading the rest of the file
    Stop,
}

/// Feed every non-blank JSON line of `path` to `visit`, returning the number of malformed lines
pub(crate) fn read_json_lines<F>(path: &Path, mut visit: F) -> Result<usize>
where
    F: FnMut(usize, Value) -> LineVerdict,
{
    let file = File::open(path)
        .with_context(|| format!("Failed to open transcript file: {}", path.display()))?;
    validate_file_size(&file, path)?;

    let reader = BufReader::new(file);
    let mut malformed = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line_num = idx + 1;
        let line = match line {
            Ok(line) => line,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!("Skipping line {} in {}: {}", line_num, path.display(), e);
                malformed += 1;
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read line {} from {}", line_num, path.display())
                });
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let value = match serde_json::from_str::<Value>(&line) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to parse JSON on line {} in {}: {}", line_num, path.display(), e);
                malformed += 1;
                continue;
            }
        };

        match visit(line_num, value) {
            LineVerdict::Continue => {}
            LineVerdict::Malformed(reason) => {
                warn!("Failed to parse line {} in {}: {}", line_num, path.display(), reason);
                malformed += 1;
            }
            LineVerdict::Stop => break,
        }
    }

    Ok(malformed)
}
