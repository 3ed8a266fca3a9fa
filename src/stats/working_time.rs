//! Assistant working time
//!
//! For each prompt typed by the user, the records that answer it (assistant text, thinking,
//! tool calls and tool results) are collected until the next user message. Consecutive gaps
//! between those events count as work unless longer than [`IDLE_THRESHOLD_MINUTES`], in which
//! case they are idle periods. A gap between a tool call and its result always counts: that
//! is the tool running, not the user being away.

use chrono::{DateTime, TimeDelta, Utc};

use crate::models::{ContentBlock, Record, Role};

pub const IDLE_THRESHOLD_MINUTES: i64 = 30;
pub const LONG_RESPONSE_HOURS: i64 = 1;
const QUESTION_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdlePeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl IdlePeriod {
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

/// A prompt whose answer spanned at least [`LONG_RESPONSE_HOURS`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongResponse {
    pub question: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub active: TimeDelta,
    pub idle_periods: Vec<IdlePeriod>,
    pub response_events: usize,
    pub tool_uses: usize,
}

impl LongResponse {
    pub fn total(&self) -> TimeDelta {
        self.end - self.start
    }

    pub fn total_idle(&self) -> TimeDelta {
        self.idle_periods.iter().map(IdlePeriod::duration).fold(TimeDelta::zero(), |a, b| a + b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkingTime {
    /// Summed active time across all prompts
    pub active: TimeDelta,
    pub prompts: usize,
    pub long_responses: Vec<LongResponse>,
}

#[derive(Debug, Clone, Copy)]
struct Event {
    time: DateTime<Utc>,
    tool_use: bool,
    tool_result: bool,
}

/// Compute working time over records sorted by timestamp
pub fn compute_working_time(records: &[Record]) -> WorkingTime {
    let idle_threshold = TimeDelta::minutes(IDLE_THRESHOLD_MINUTES);
    let long_response = TimeDelta::hours(LONG_RESPONSE_HOURS);
    let mut result = WorkingTime::default();

    for (index, prompt) in records.iter().enumerate() {
        if !prompt.is_prompt() {
            continue;
        }
        result.prompts += 1;

        let mut events =
            vec![Event { time: prompt.timestamp, tool_use: false, tool_result: false }];
        let mut tool_uses = 0;
        for record in &records[index + 1..] {
            if record.is_response() {
                let tool_use = record.has_tool_use();
                if tool_use {
                    tool_uses += 1;
                }
                events.push(Event {
                    time: record.timestamp,
                    tool_use,
                    tool_result: record.has_tool_result(),
                });
            } else if record.role == Role::User {
                break;
            }
        }
        events.sort_by_key(|e| e.time);

        let mut active = TimeDelta::zero();
        let mut idle_periods = Vec::new();
        for pair in events.windows(2) {
            let (current, next) = (pair[0], pair[1]);
            let gap = next.time - current.time;
            let tool_execution = current.tool_use && next.tool_result;
            if tool_execution || gap <= idle_threshold {
                active += gap;
            } else {
                idle_periods.push(IdlePeriod { start: current.time, end: next.time });
            }
        }

        if active <= TimeDelta::zero() {
            continue;
        }

        let (start, end) = (events[0].time, events[events.len() - 1].time);
        if end - start >= long_response {
            result.long_responses.push(LongResponse {
                question: question_preview(prompt),
                start,
                end,
                active,
                idle_periods,
                response_events: events.len() - 1,
                tool_uses,
            });
        }
        result.active += active;
    }

    result
}

fn question_preview(prompt: &Record) -> String {
    prompt
        .content
        .iter()
        .find_map(|block| match block {
            ContentBlock::Text { text } => {
                Some(text.chars().take(QUESTION_PREVIEW_CHARS).collect())
            }
            _ => None,
        })
        .unwrap_or_default()
}
