//! Formatting of individual content blocks
//!
//! Every string taken from a transcript goes through [`strip_ansi_codes`] here, so callers
//! never print raw transcript text.

use serde_json::Value;

use super::RenderOptions;
use super::palette::{Palette, Tone};
use crate::models::ContentBlock;
use crate::utils::strip_ansi_codes;

pub const TOOL_OUTPUT_MAX_LINES: usize = 30;
pub const TOOL_OUTPUT_MAX_LINE_CHARS: usize = 120;
pub const THINKING_MAX_LINES: usize = 20;
pub const THINKING_MAX_LINE_CHARS: usize = 118;
/// Argument values of tools without a dedicated summary
pub const ARGUMENT_MAX_CHARS: usize = 100;

const TOOL_ID_CHARS: usize = 12;
const THINKING_FOOTER_WIDTH: usize = 120;

/// Whether `block` survives the thinking/tool visibility flags
pub fn is_visible(block: &ContentBlock, options: &RenderOptions) -> bool {
    match block {
        ContentBlock::Thinking { .. } => options.show_thinking,
        ContentBlock::ToolUse { .. } | ContentBlock::ToolResult { .. } => options.show_tools,
        ContentBlock::Text { .. } => true,
    }
}

/// Render one block, or `None` when it has nothing to show
pub fn format_block(
    block: &ContentBlock,
    options: &RenderOptions,
    palette: &Palette,
) -> Option<String> {
    match block {
        ContentBlock::Text { text } if text.is_empty() => None,
        ContentBlock::Text { text } => Some(strip_ansi_codes(text)),
        ContentBlock::Thinking { thinking } if thinking.is_empty() => None,
        ContentBlock::Thinking { thinking } => {
            Some(format_thinking(&strip_ansi_codes(thinking), options.truncate, palette))
        }
        ContentBlock::ToolUse { id, name, input } => {
            Some(format_tool_use(id, name, input, palette))
        }
        ContentBlock::ToolResult { tool_use_id, content, is_error } => Some(format_tool_result(
            tool_use_id,
            &strip_ansi_codes(content),
            *is_error,
            options.truncate,
            palette,
        )),
    }
}

fn format_thinking(thinking: &str, truncate: bool, palette: &Palette) -> String {
    let all_lines: Vec<&str> = thinking.split('\n').collect();
    let header = palette.paint("╔══ thinking ══╗", Tone::Thinking);
    let mut lines = vec![format!("\n{}", header)];

    let shown = if truncate { all_lines.len().min(THINKING_MAX_LINES) } else { all_lines.len() };
    for line in &all_lines[..shown] {
        let line =
            if truncate { take_chars(line, THINKING_MAX_LINE_CHARS) } else { line.to_string() };
        lines.push(palette.paint(&format!("║ {}", line), Tone::Thinking));
    }
    if shown < all_lines.len() {
        let note = format!("║ ... ({} more lines)", all_lines.len() - shown);
        lines.push(palette.paint(&note, Tone::Thinking));
    }

    let footer = format!("╚{}╝", "═".repeat(THINKING_FOOTER_WIDTH));
    lines.push(palette.paint(&footer, Tone::Thinking));
    lines.join("\n")
}

fn format_tool_use(id: &str, name: &str, input: &Value, palette: &Palette) -> String {
    let name = strip_ansi_codes(name);
    let header = format!("tool call: {} [{}]", name, short_id(id));
    let mut lines = vec![format!("\n┌─ {}", palette.paint(&header, Tone::ToolCall))];

    for (label, value) in tool_summary(&name, input) {
        lines.push(format!("│  {}: {}", strip_ansi_codes(&label), strip_ansi_codes(&value)));
    }

    lines.push("└─".to_string());
    lines.join("\n")
}

/// Label/value pairs describing a tool call's arguments
pub fn tool_summary(name: &str, input: &Value) -> Vec<(String, String)> {
    let field = |key: &str| input.get(key).and_then(Value::as_str).unwrap_or("").to_string();
    let mut summary = Vec::new();

    match name {
        "Bash" => {
            summary.push(("command".to_string(), field("command")));
            let description = field("description");
            if !description.is_empty() {
                summary.push(("description".to_string(), description));
            }
        }
        "Read" | "Write" | "Edit" => {
            summary.push(("file".to_string(), field("file_path")));
            if name == "Edit" {
                let old = field("old_string");
                if !old.is_empty() {
                    let change = format!(
                        "{} → {} chars",
                        old.chars().count(),
                        field("new_string").chars().count()
                    );
                    summary.push(("change".to_string(), change));
                }
            } else if name == "Write" {
                let length = format!("{} chars", field("content").chars().count());
                summary.push(("length".to_string(), length));
            }
        }
        "Glob" => summary.push(("pattern".to_string(), field("pattern"))),
        "Grep" => {
            summary.push(("search".to_string(), field("pattern")));
            let mode = input
                .get("output_mode")
                .and_then(Value::as_str)
                .unwrap_or("files_with_matches")
                .to_string();
            summary.push(("mode".to_string(), mode));
        }
        "Task" => {
            summary.push(("task".to_string(), field("description")));
            summary.push(("agent".to_string(), field("subagent_type")));
        }
        _ => match input {
            Value::Object(map) => {
                for (key, value) in map {
                    let text = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    summary.push((key.clone(), truncate_with_ellipsis(&text, ARGUMENT_MAX_CHARS)));
                }
            }
            Value::Null => {}
            other => summary.push((
                "input".to_string(),
                truncate_with_ellipsis(&other.to_string(), ARGUMENT_MAX_CHARS),
            )),
        },
    }

    summary
}

fn format_tool_result(
    tool_use_id: &str,
    content: &str,
    is_error: bool,
    truncate: bool,
    palette: &Palette,
) -> String {
    let mut header = format!("tool output [{}]", short_id(tool_use_id));
    if is_error {
        header.push_str(" (error)");
    }
    let mut lines = vec![format!("\n┌─ {}", palette.paint(&header, Tone::ToolOutput))];

    let all_lines: Vec<&str> = content.split('\n').collect();
    if truncate {
        let shown = all_lines.len().min(TOOL_OUTPUT_MAX_LINES);
        if shown < all_lines.len() {
            lines.push(format!("│  (showing first {} of {} lines)", shown, all_lines.len()));
        }
        for line in &all_lines[..shown] {
            let line = truncate_with_ellipsis(line, TOOL_OUTPUT_MAX_LINE_CHARS);
            lines.push(format!("│  {}", line));
        }
        if shown < all_lines.len() {
            lines.push(format!("│  ... ({} more lines)", all_lines.len() - shown));
        }
    } else {
        lines.extend(all_lines.iter().map(|line| format!("│  {}", line)));
    }

    lines.push("└─".to_string());
    lines.join("\n")
}

fn short_id(id: &str) -> String {
    take_chars(&strip_ansi_codes(id), TOOL_ID_CHARS)
}

fn take_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Cut to `max` characters, appending `...` when something was removed
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", take_chars(text, max))
    } else {
        text.to_string()
    }
}
