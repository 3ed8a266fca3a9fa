//! Merging: order records from every file on one timeline and collapse duplicates
//!
//! Session files overlap (a resumed conversation repeats its history in the new file), so
//! the same message can be loaded several times. The pipeline is:
//!
//! 1. stable sort by timestamp, so equal timestamps keep load order;
//! 2. optional deduplication by [`DedupKey`], keeping the earliest occurrence;
//! 3. optional session-id substring filter;
//! 4. optional limit to the most recent N records.
//!
//! Nothing here can fail; an empty input yields an empty output.

pub mod dedup;

use std::collections::HashSet;

pub use dedup::{DEDUP_PREFIX_CHARS, DedupKey, dedup_records};
use tracing::debug;

use crate::models::Record;

/// How to merge loaded records
#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub deduplicate: bool,
    /// Keep only records whose session id contains this substring
    pub session_filter: Option<String>,
    /// Keep only the most recent N records
    pub limit: Option<usize>,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self { deduplicate: true, session_filter: None, limit: None }
    }
}

/// What merging did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub records_in: usize,
    pub total: usize,
    pub duplicates_removed: usize,
    pub filtered_by_session: usize,
    /// Distinct session ids in the output
    pub sessions: usize,
}

impl MergeSummary {
    /// Share of the input that was duplicate, in percent
    pub fn duplicate_percent(&self) -> f64 {
        if self.records_in == 0 {
            return 0.0;
        }
        self.duplicates_removed as f64 * 100.0 / self.records_in as f64
    }
}

#[derive(Debug, Clone, Default)]
pub struct Merged {
    pub records: Vec<Record>,
    pub summary: MergeSummary,
}

/// Sort, deduplicate, filter and limit `records`
///
/// # Examples
///
/// ```
/// use chat_history_viewer::merge::{MergeOptions, merge_records};
///
/// let merged = merge_records(Vec::new(), &MergeOptions::default());
/// assert!(merged.records.is_empty());
/// assert_eq!(merged.summary.total, 0);
/// ```
pub fn merge_records(mut records: Vec<Record>, options: &MergeOptions) -> Merged {
    let mut summary = MergeSummary { records_in: records.len(), ..Default::default() };

    sort_records(&mut records);

    if options.deduplicate {
        let (kept, removed) = dedup_records(records);
        records = kept;
        summary.duplicates_removed = removed;
    }

    if let Some(filter) = options.session_filter.as_deref() {
        let before = records.len();
        records.retain(|r| r.session_id.contains(filter));
        summary.filtered_by_session = before - records.len();
    }

    if let Some(limit) = options.limit {
        let excess = records.len().saturating_sub(limit);
        records.drain(..excess);
    }

    summary.total = records.len();
    summary.sessions = records.iter().map(|r| r.session_id.as_str()).collect::<HashSet<_>>().len();

    debug!(
        "Merged {} records into {} ({} duplicates, {} filtered by session)",
        summary.records_in, summary.total, summary.duplicates_removed, summary.filtered_by_session
    );

    Merged { records, summary }
}

/// Stable sort by timestamp
pub fn sort_records(records: &mut [Record]) {
    records.sort_by_key(|r| r.timestamp);
}
