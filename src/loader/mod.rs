//! Session loading: discover transcript files, parse them and tag every record
//!
//! # Error Handling Strategy
//!
//! - **Root directory**: A missing or unreadable root is the only fatal error.
//! - **File-level errors**: Files that cannot be opened or read are logged and counted as
//!   unreadable; files in an unrecognized schema are logged and counted as unrecognized.
//!   Neither stops the load.
//! - **Line-level errors**: Handled by the source adapters (see [`crate::parsers`]).
//! - **Empty results**: Finding nothing is a valid, empty result.
//!
//! [`LoadReport`] carries the counts so callers can tell the user what was skipped.

pub mod discovery;

use std::path::Path;

use anyhow::Result;
pub use discovery::{AGENT_FILE_PREFIX, discover_transcripts, is_agent_file};
use tracing::{info, warn};

use crate::models::{Record, SourceFormat};
use crate::parsers::{SourceAdapter, adapter_for};

/// What to load and which records to keep
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub format: SourceFormat,
    /// Also read `agent-*.jsonl` sub-task transcripts
    pub include_agents: bool,
    /// Keep only records whose project path contains this substring
    pub project_filter: Option<String>,
}

/// Counts describing what a load saw and skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub files_found: usize,
    pub files_loaded: usize,
    pub agent_files_loaded: usize,
    pub agent_files_skipped: usize,
    pub unreadable_files: usize,
    pub unrecognized_files: usize,
    pub malformed_lines: usize,
    pub records_parsed: usize,
    pub filtered_by_project: usize,
}

impl LoadReport {
    pub fn main_files_loaded(&self) -> usize {
        self.files_loaded - self.agent_files_loaded
    }
}

/// Records in load order (file by file, line by line) plus the load report
#[derive(Debug, Clone, Default)]
pub struct LoadedTranscripts {
    pub records: Vec<Record>,
    pub report: LoadReport,
}

/// Load every transcript under `root` using the adapter for `options.format`
///
/// # Errors
///
/// Returns an error only if `root` cannot be read. Unreadable files, unrecognized files and
/// malformed lines are skipped with a warning and counted in the [`LoadReport`].
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use chat_history_viewer::loader::{LoadOptions, load_records};
/// use chat_history_viewer::models::SourceFormat;
///
/// let options = LoadOptions { format: SourceFormat::Codex, ..Default::default() };
/// let loaded = load_records(Path::new("/home/alice/.codex/sessions"), &options)?;
/// println!("Loaded {} records", loaded.records.len());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn load_records(root: &Path, options: &LoadOptions) -> Result<LoadedTranscripts> {
    let adapter = adapter_for(options.format);
    load_with_adapter(root, adapter.as_ref(), options)
}

/// Load with an explicit adapter; `options.format` is ignored
pub fn load_with_adapter(
    root: &Path,
    adapter: &dyn SourceAdapter,
    options: &LoadOptions,
) -> Result<LoadedTranscripts> {
    let files = discover_transcripts(root, adapter.max_depth())?;
    let mut report = LoadReport { files_found: files.len(), ..Default::default() };
    let mut records = Vec::new();

    for path in files {
        let is_agent = is_agent_file(&path);
        if is_agent && !options.include_agents {
            report.agent_files_skipped += 1;
            continue;
        }

        let parsed = match adapter.parse_file(&path) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Failed to read {}: {:#}", path.display(), e);
                report.unreadable_files += 1;
                continue;
            }
        };

        report.malformed_lines += parsed.malformed_lines;

        if !parsed.recognized {
            warn!("Skipping {}: not a {} transcript", path.display(), adapter.format());
            report.unrecognized_files += 1;
            continue;
        }

        report.files_loaded += 1;
        if is_agent {
            report.agent_files_loaded += 1;
        }
        report.records_parsed += parsed.records.len();

        match options.project_filter.as_deref() {
            Some(filter) => {
                let kept_before = records.len();
                let parsed_count = parsed.records.len();
                records.extend(parsed.records.into_iter().filter(|r| matches_project(r, filter)));
                report.filtered_by_project += parsed_count - (records.len() - kept_before);
            }
            None => records.extend(parsed.records),
        }
    }

    info!(
        "Loaded {} records from {} files ({} agent files skipped, {} unreadable, \
         {} unrecognized, {} malformed lines)",
        records.len(),
        report.files_loaded,
        report.agent_files_skipped,
        report.unreadable_files,
        report.unrecognized_files,
        report.malformed_lines
    );

    Ok(LoadedTranscripts { records, report })
}

/// Substring match against the session's project path; records without one never match
fn matches_project(record: &Record, filter: &str) -> bool {
    record.project_str().is_some_and(|project| project.contains(filter))
}
