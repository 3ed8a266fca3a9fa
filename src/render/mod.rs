//! Transcript rendering for the terminal and for plain-text export
//!
//! Both destinations share one layout: a banner, then per record a separator, a
//! `[n] <role> - <timestamp>` header, a session/file line and the formatted content blocks.
//! The terminal shows a shortened session id and may use colors; exports carry the full id,
//! never contain escape codes and start with an export header.

pub mod blocks;
pub mod palette;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
pub use palette::{Palette, Tone};

use crate::models::Record;
use crate::utils::{format_timestamp, strip_ansi_codes};

const RULE_WIDTH: usize = 80;
const SHORT_SESSION_CHARS: usize = 8;

/// What to show and how
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub show_thinking: bool,
    pub show_tools: bool,
    /// Cap tool output and thinking to a fixed number of lines and columns
    pub truncate: bool,
    pub use_color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { show_thinking: true, show_tools: true, truncate: false, use_color: false }
    }
}

/// A record together with its already formatted body
struct Entry<'a> {
    record: &'a Record,
    body: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Destination {
    Terminal,
    Export,
}

pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Write the transcript for terminal display, returning how many records were shown
    pub fn render_terminal<W: Write>(&self, records: &[Record], out: &mut W) -> Result<usize> {
        let palette = Palette::new(self.options.use_color);
        let entries = self.prepare(records, &palette);

        let rule = "=".repeat(RULE_WIDTH);
        writeln!(out, "\n{}", rule)?;
        let title = format!("Chat history ({} messages)", entries.len());
        writeln!(out, "{}", palette.paint(&title, Tone::Highlight))?;
        writeln!(out, "{}\n", rule)?;

        self.write_entries(&entries, Destination::Terminal, &palette, out)?;
        Ok(entries.len())
    }

    /// Write the plain-text export, returning how many records were written
    pub fn render_export<W: Write>(
        &self,
        records: &[Record],
        exported_at: DateTime<Local>,
        out: &mut W,
    ) -> Result<usize> {
        let palette = Palette::plain();
        let entries = self.prepare(records, &palette);

        writeln!(out, "Chat history export")?;
        writeln!(out, "Exported: {}", exported_at.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(out, "Messages: {}", entries.len())?;
        writeln!(out, "{}\n", "=".repeat(RULE_WIDTH))?;

        self.write_entries(&entries, Destination::Export, &palette, out)?;
        Ok(entries.len())
    }

    fn prepare<'a>(&self, records: &'a [Record], palette: &Palette) -> Vec<Entry<'a>> {
        records.iter().filter_map(|record| self.prepare_record(record, palette)).collect()
    }

    /// `None` when every block of a non-empty record is hidden by the visibility flags
    fn prepare_record<'a>(&self, record: &'a Record, palette: &Palette) -> Option<Entry<'a>> {
        let visible: Vec<_> =
            record.content.iter().filter(|b| blocks::is_visible(b, &self.options)).collect();
        if visible.is_empty() && !record.content.is_empty() {
            return None;
        }

        let parts: Vec<String> = visible
            .into_iter()
            .filter_map(|block| blocks::format_block(block, &self.options, palette))
            .collect();
        let body = if parts.is_empty() { None } else { Some(parts.join("\n")) };
        Some(Entry { record, body })
    }

    fn write_entries<W: Write>(
        &self,
        entries: &[Entry<'_>],
        destination: Destination,
        palette: &Palette,
        out: &mut W,
    ) -> Result<()> {
        let separator = palette.paint(&"─".repeat(RULE_WIDTH), Tone::Separator);

        for (index, entry) in entries.iter().enumerate() {
            let record = entry.record;
            let role = palette.paint(record.role.label(), Tone::for_role(record.role));
            let timestamp = palette.paint(&format_timestamp(&record.timestamp), Tone::Info);
            let session_id = strip_ansi_codes(&record.session_id);
            let session = match destination {
                Destination::Terminal => short_session_id(&session_id),
                Destination::Export => session_id,
            };
            let file = strip_ansi_codes(&record.file_name());
            let meta = format!("session: {} | file: {}", session, file);

            writeln!(out, "\n{}", separator)?;
            writeln!(out, "[{}] {} - {}", index + 1, role, timestamp)?;
            writeln!(out, "{}", palette.paint(&meta, Tone::Info))?;
            match destination {
                Destination::Terminal => writeln!(out, "{}", separator)?,
                Destination::Export => writeln!(out, "{}\n", separator)?,
            }

            match &entry.body {
                Some(body) => writeln!(out, "{}", body)?,
                None => writeln!(out, "{}", palette.paint("[empty message]", Tone::Info))?,
            }
            writeln!(out)?;
        }

        Ok(())
    }
}

fn short_session_id(session_id: &str) -> String {
    if session_id.chars().count() > SHORT_SESSION_CHARS {
        format!("{}...", session_id.chars().take(SHORT_SESSION_CHARS).collect::<String>())
    } else {
        session_id.to_string()
    }
}

/// Export `records` as plain text to `path`, returning how many records were written
///
/// Colors are always off in exports regardless of `options.use_color`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn export_to_file(path: &Path, records: &[Record], options: RenderOptions) -> Result<usize> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let renderer = Renderer::new(RenderOptions { use_color: false, ..options });
    let written = renderer.render_export(records, Local::now(), &mut writer)?;
    writer.flush().with_context(|| format!("Failed to write export file: {}", path.display()))?;

    Ok(written)
}
