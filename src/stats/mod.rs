//! Aggregate statistics over merged records
//!
//! Computed from the deduplicated record sequence together with the loader's and merger's
//! reports, so file counts and duplicate counts reflect what was actually read.

pub mod report;
pub mod working_time;

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
pub use report::print_statistics;
pub use working_time::{IdlePeriod, LongResponse, WorkingTime, compute_working_time};

use crate::loader::LoadReport;
use crate::merge::MergeSummary;
use crate::models::{Record, Role, Session};

/// Group label for records whose session has no working directory
pub const NO_PROJECT: &str = "(no project)";
/// How many of the most recent days the daily breakdown shows
pub const RECENT_DAYS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectStats {
    pub project: String,
    pub messages: usize,
    pub sessions: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub main_files: usize,
    pub agent_files: usize,
    pub raw_messages: usize,
    pub unique_messages: usize,
    pub duplicates_removed: usize,
    pub duplicate_percent: f64,
    pub user_messages: usize,
    pub assistant_messages: usize,
    pub sessions: usize,
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
    pub working_time: WorkingTime,
    pub messages_by_day: BTreeMap<NaiveDate, usize>,
    /// Present only when grouping by project was requested
    pub projects: Option<Vec<ProjectStats>>,
}

impl Statistics {
    /// Compute statistics for `records`, which must already be sorted by timestamp
    pub fn compute(
        records: &[Record],
        load: &LoadReport,
        merge: &MergeSummary,
        by_project: bool,
    ) -> Self {
        let mut messages_by_day = BTreeMap::new();
        for record in records {
            *messages_by_day.entry(record.timestamp.date_naive()).or_insert(0) += 1;
        }

        Self {
            main_files: load.main_files_loaded(),
            agent_files: load.agent_files_loaded,
            raw_messages: merge.records_in,
            unique_messages: records.len(),
            duplicates_removed: merge.duplicates_removed,
            duplicate_percent: merge.duplicate_percent(),
            user_messages: records.iter().filter(|r| r.role == Role::User).count(),
            assistant_messages: records.iter().filter(|r| r.role == Role::Assistant).count(),
            sessions: Session::group(records).len(),
            earliest: records.iter().map(|r| r.timestamp).min(),
            latest: records.iter().map(|r| r.timestamp).max(),
            working_time: compute_working_time(records),
            messages_by_day,
            projects: by_project.then(|| group_by_project(records)),
        }
    }

    pub fn span(&self) -> Option<TimeDelta> {
        Some(self.latest? - self.earliest?)
    }

    /// Whole days between the earliest and latest message
    pub fn span_days(&self) -> Option<i64> {
        self.span().map(|span| span.num_days())
    }

    /// Active working time per assistant message
    pub fn average_response_time(&self) -> Option<TimeDelta> {
        if self.assistant_messages == 0 {
            return None;
        }
        let per_message =
            self.working_time.active.num_milliseconds() / self.assistant_messages as i64;
        Some(TimeDelta::milliseconds(per_message))
    }

    /// Active working time as a percentage of the overall span
    pub fn work_percentage(&self) -> Option<f64> {
        let span = self.span()?.num_seconds();
        if span <= 0 {
            return None;
        }
        Some(self.working_time.active.num_seconds() as f64 * 100.0 / span as f64)
    }

    /// Message counts for the most recent `days` days that have messages, newest first
    pub fn recent_days(&self, days: usize) -> Vec<(NaiveDate, usize)> {
        self.messages_by_day.iter().rev().take(days).map(|(day, count)| (*day, *count)).collect()
    }
}

/// Messages and sessions per project path, busiest first
pub fn group_by_project(records: &[Record]) -> Vec<ProjectStats> {
    let mut groups: HashMap<String, ProjectStats> = HashMap::new();
    for session in Session::group(records) {
        let project = session
            .project
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| NO_PROJECT.to_string());
        let entry = groups.entry(project.clone()).or_insert(ProjectStats {
            project,
            messages: 0,
            sessions: 0,
        });
        entry.messages += session.record_count;
        entry.sessions += 1;
    }

    let mut projects: Vec<ProjectStats> = groups.into_values().collect();
    projects.sort_by(|a, b| b.messages.cmp(&a.messages).then_with(|| a.project.cmp(&b.project)));
    projects
}

/// Bar for the daily breakdown: one `█` per ten messages, one `▌` per remaining five
pub fn day_bar(count: usize) -> String {
    format!("{}{}", "█".repeat(count / 10), "▌".repeat((count % 10) / 5))
}
