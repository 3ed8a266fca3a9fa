use std::io::Write;

use anyhow::Result;

use super::{RECENT_DAYS, Statistics, day_bar};
use crate::render::{Palette, Tone};
use crate::utils::{format_duration, format_timestamp, strip_ansi_codes};

const RULE_WIDTH: usize = 80;
const QUESTION_DISPLAY_CHARS: usize = 60;

/// Print a human-readable statistics report
pub fn print_statistics<W: Write>(
    stats: &Statistics,
    palette: &Palette,
    out: &mut W,
) -> Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    let heading = |title: &str| palette.paint(title, Tone::Highlight);

    writeln!(out, "\n{}", rule)?;
    writeln!(out, "{}", heading("Chat history statistics (deduplicated)"))?;
    writeln!(out, "{}", rule)?;

    writeln!(out, "\n{}", heading("Files"))?;
    writeln!(out, "   Main session files: {}", stats.main_files)?;
    writeln!(out, "   Agent files: {}", stats.agent_files)?;
    writeln!(out, "   Total: {}", stats.main_files + stats.agent_files)?;

    writeln!(out, "\n{}", heading("Messages"))?;
    writeln!(out, "   Raw messages: {}", stats.raw_messages)?;
    if stats.duplicates_removed > 0 {
        writeln!(
            out,
            "   After dedup: {} ({} duplicates removed, {:.1}%)",
            stats.unique_messages, stats.duplicates_removed, stats.duplicate_percent
        )?;
    }
    writeln!(out, "   User messages: {}", stats.user_messages)?;
    writeln!(out, "   Assistant messages: {}", stats.assistant_messages)?;

    writeln!(out, "\n{}", heading("Sessions"))?;
    writeln!(out, "   Distinct sessions: {}", stats.sessions)?;

    if let (Some(earliest), Some(latest), Some(days)) =
        (stats.earliest, stats.latest, stats.span_days())
    {
        writeln!(out, "\n{}", heading("Time span"))?;
        writeln!(out, "   Earliest message: {}", format_timestamp(&earliest))?;
        writeln!(out, "   Latest message: {}", format_timestamp(&latest))?;
        writeln!(out, "   Span: {} days", days)?;
    }

    writeln!(out, "\n{}", heading("Working time"))?;
    writeln!(out, "   Assistant working time: {}", format_duration(stats.working_time.active))?;
    if let Some(average) = stats.average_response_time() {
        writeln!(out, "   Average response time: {}", format_duration(average))?;
    }
    if let Some(percentage) = stats.work_percentage() {
        writeln!(out, "   Share of total span: {:.1}%", percentage)?;
    }

    let long_responses = &stats.working_time.long_responses;
    if !long_responses.is_empty() {
        writeln!(out, "\n{}", heading("Long responses (>= 1 hour)"))?;
        writeln!(out, "   {} responses took an hour or more", long_responses.len())?;
        for (i, response) in long_responses.iter().enumerate() {
            writeln!(
                out,
                "\n   {}. {} -> {}",
                i + 1,
                format_timestamp(&response.start),
                response.end.format("%m-%d %H:%M:%S")
            )?;
            writeln!(out, "      Total: {}", format_duration(response.total()))?;
            writeln!(out, "      Active: {}", format_duration(response.active))?;
            writeln!(out, "      Prompt: {}", question_line(&response.question))?;
            writeln!(out, "      Response events: {}", response.response_events)?;
            writeln!(out, "      Tool calls: {}", response.tool_uses)?;
            if !response.idle_periods.is_empty() {
                writeln!(
                    out,
                    "      Idle periods: {} ({})",
                    response.idle_periods.len(),
                    format_duration(response.total_idle())
                )?;
                for (j, idle) in response.idle_periods.iter().enumerate() {
                    let line = format!(
                        "         - idle {}: {} -> {} ({})",
                        j + 1,
                        idle.start.format("%m-%d %H:%M"),
                        idle.end.format("%m-%d %H:%M"),
                        format_duration(idle.duration())
                    );
                    writeln!(out, "{}", palette.paint(&line, Tone::Info))?;
                }
            }
        }
        writeln!(
            out,
            "\n   {}",
            palette.paint("Gaps over 30 minutes without messages are excluded as idle", Tone::Info)
        )?;
    }

    if let Some(projects) = &stats.projects {
        writeln!(out, "\n{}", heading("Projects"))?;
        for project in projects {
            writeln!(
                out,
                "   {}: {} messages, {} sessions",
                strip_ansi_codes(&project.project),
                project.messages,
                project.sessions
            )?;
        }
    }

    let recent = stats.recent_days(RECENT_DAYS);
    if !recent.is_empty() {
        writeln!(out, "\n{}", heading(&format!("Messages per day (latest {})", RECENT_DAYS)))?;
        for (day, count) in recent {
            writeln!(out, "   {}: {:4} {}", day, count, day_bar(count))?;
        }
    }

    writeln!(out, "\n{}\n", rule)?;
    Ok(())
}

fn question_line(question: &str) -> String {
    let question = strip_ansi_codes(question).replace('\n', " ");
    if question.chars().count() > QUESTION_DISPLAY_CHARS {
        let head: String = question.chars().take(QUESTION_DISPLAY_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        question
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{NaiveDate, TimeDelta, TimeZone, Utc};

    use super::*;
    use crate::stats::{IdlePeriod, LongResponse, ProjectStats, WorkingTime};

    fn sample() -> Statistics {
        let start = Utc.with_ymd_and_hms(2025, 9, 10, 8, 0, 0).unwrap();
        let mut messages_by_day = BTreeMap::new();
        messages_by_day.insert(NaiveDate::from_ymd_opt(2025, 9, 10).unwrap(), 27);
        messages_by_day.insert(NaiveDate::from_ymd_opt(2025, 9, 12).unwrap(), 3);

        Statistics {
            main_files: 2,
            agent_files: 1,
            raw_messages: 40,
            unique_messages: 30,
            duplicates_removed: 10,
            duplicate_percent: 25.0,
            user_messages: 12,
            assistant_messages: 18,
            sessions: 3,
            earliest: Some(start),
            latest: Some(start + TimeDelta::days(2)),
            working_time: WorkingTime {
                active: TimeDelta::minutes(90),
                prompts: 12,
                long_responses: vec![LongResponse {
                    question: "x".repeat(80),
                    start,
                    end: start + TimeDelta::minutes(100),
                    active: TimeDelta::minutes(10),
                    idle_periods: vec![IdlePeriod {
                        start: start + TimeDelta::minutes(10),
                        end: start + TimeDelta::minutes(100),
                    }],
                    response_events: 2,
                    tool_uses: 0,
                }],
            },
            messages_by_day,
            projects: Some(vec![ProjectStats {
                project: "/root/wjd/jax-dna-kernelcat".to_string(),
                messages: 30,
                sessions: 3,
            }]),
        }
    }

    #[test]
    fn test_report_sections() {
        let mut out = Vec::new();
        print_statistics(&sample(), &Palette::plain(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("Main session files: 2"));
        assert!(out.contains("After dedup: 30 (10 duplicates removed, 25.0%)"));
        assert!(out.contains("Distinct sessions: 3"));
        assert!(out.contains("Span: 2 days"));
        assert!(out.contains("Assistant working time: 1h 30m"));
        assert!(out.contains("Average response time: 5m"));
        assert!(out.contains("idle 1: 09-10 08:10 -> 09-10 09:40 (1h 30m)"));
        assert!(out.contains(&format!("Prompt: {}...", "x".repeat(57))));
        assert!(out.contains("/root/wjd/jax-dna-kernelcat: 30 messages, 3 sessions"));
        assert!(out.contains("2025-09-12:    3 "));
        assert!(out.contains("2025-09-10:   27 ██▌"));
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn test_report_without_duplicates_omits_dedup_line() {
        let mut stats = sample();
        stats.duplicates_removed = 0;
        stats.projects = None;
        let mut out = Vec::new();
        print_statistics(&stats, &Palette::plain(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(!out.contains("After dedup"));
        assert!(!out.contains("Projects"));
    }
}
