//! Codex CLI transcripts: `YYYY/MM/DD/rollout-*.jsonl`, each opening with a `session_meta` line
//!
//! The header carries the session id and working directory; every later record in the file
//! inherits both. Only `response_item` lines become records. `event_msg` lines mirror the
//! response items for the TUI and `turn_context` lines hold settings, so both are skipped.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use super::deserializers::deserialize_timestamp;
use super::{LineVerdict, ParsedFile, SourceAdapter, read_json_lines};
use crate::models::{ContentBlock, Record, RecordOrigin, Role, SourceFormat};

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum CodexLine {
    SessionMeta {
        payload: SessionMeta,
    },
    ResponseItem {
        #[serde(deserialize_with = "deserialize_timestamp")]
        timestamp: DateTime<Utc>,
        payload: ResponseItem,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct SessionMeta {
    id: String,
    cwd: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseItem {
    Message {
        role: String,
        #[serde(default)]
        content: Vec<TextPart>,
    },
    Reasoning {
        #[serde(default)]
        summary: Vec<TextPart>,
        #[serde(default)]
        content: Option<Vec<TextPart>>,
    },
    FunctionCall {
        name: String,
        arguments: String,
        call_id: String,
    },
    CustomToolCall {
        name: String,
        input: String,
        call_id: String,
    },
    FunctionCallOutput {
        call_id: String,
        output: Value,
    },
    CustomToolCallOutput {
        call_id: String,
        output: Value,
    },
    #[serde(other)]
    Other,
}

/// `input_text`, `output_text`, `summary_text` and friends; parts without text are ignored
#[derive(Debug, Deserialize)]
struct TextPart {
    #[serde(default)]
    text: Option<String>,
}

fn join_texts(parts: Vec<TextPart>) -> String {
    parts.into_iter().filter_map(|p| p.text).collect::<Vec<_>>().join("\n")
}

/// Tool arguments are JSON-encoded strings; anything that is not an object is wrapped
fn tool_input(raw: String) -> Value {
    match serde_json::from_str::<Value>(&raw) {
        Ok(value @ Value::Object(_)) => value,
        _ => json!({ "input": raw }),
    }
}

/// Shell outputs are often `{"output": "...", "metadata": {...}}` encoded as a string
fn tool_output(output: Value) -> String {
    match output {
        Value::String(s) => match serde_json::from_str::<Value>(&s) {
            Ok(Value::Object(obj)) => match obj.get("output").and_then(Value::as_str) {
                Some(inner) => inner.to_string(),
                None => s,
            },
            _ => s,
        },
        other => other.to_string(),
    }
}

impl ResponseItem {
    /// Role and content of the record this item becomes, if any
    fn into_parts(self) -> Option<(Role, Vec<ContentBlock>)> {
        match self {
            ResponseItem::Message { role, content } => {
                let role = match role.as_str() {
                    "user" => Role::User,
                    "assistant" => Role::Assistant,
                    _ => Role::System,
                };
                let blocks = content
                    .into_iter()
                    .filter_map(|p| p.text)
                    .map(|text| ContentBlock::Text { text })
                    .collect();
                Some((role, blocks))
            }
            ResponseItem::Reasoning { summary, content } => {
                let mut thinking = join_texts(summary);
                if thinking.is_empty() {
                    thinking = content.map(join_texts).unwrap_or_default();
                }
                // Encrypted-only reasoning has nothing to show
                if thinking.is_empty() {
                    return None;
                }
                Some((Role::Thinking, vec![ContentBlock::Thinking { thinking }]))
            }
            ResponseItem::FunctionCall { name, arguments, call_id } => Some((
                Role::ToolCall,
                vec![ContentBlock::ToolUse { id: call_id, name, input: tool_input(arguments) }],
            )),
            ResponseItem::CustomToolCall { name, input, call_id } => Some((
                Role::ToolCall,
                vec![ContentBlock::ToolUse { id: call_id, name, input: tool_input(input) }],
            )),
            ResponseItem::FunctionCallOutput { call_id, output }
            | ResponseItem::CustomToolCallOutput { call_id, output } => Some((
                Role::ToolResult,
                vec![ContentBlock::ToolResult {
                    tool_use_id: call_id,
                    content: tool_output(output),
                    is_error: false,
                }],
            )),
            ResponseItem::Other => None,
        }
    }
}

/// Adapter for the nested Codex layout
#[derive(Debug, Clone, Copy, Default)]
pub struct CodexAdapter;

impl SourceAdapter for CodexAdapter {
    fn format(&self) -> SourceFormat {
        SourceFormat::Codex
    }

    fn max_depth(&self) -> usize {
        4
    }

    fn parse_file(&self, path: &Path) -> Result<ParsedFile> {
        let mut header: Option<SessionMeta> = None;
        let mut records = Vec::new();
        let mut recognized = false;

        let malformed_lines = read_json_lines(path, |line, value| {
            let parsed = serde_json::from_value::<CodexLine>(value);

            let Some(meta) = header.as_ref() else {
                // The first record must be the session header, otherwise this is not a rollout
                return match parsed {
                    Ok(CodexLine::SessionMeta { payload }) => {
                        header = Some(payload);
                        recognized = true;
                        LineVerdict::Continue
                    }
                    _ => LineVerdict::Stop,
                };
            };

            match parsed {
                Ok(CodexLine::ResponseItem { timestamp, payload }) => {
                    if let Some((role, content)) = payload.into_parts() {
                        records.push(Record {
                            session_id: meta.id.clone(),
                            timestamp,
                            role,
                            content,
                            uuid: None,
                            project: Some(meta.cwd.clone()),
                            format: SourceFormat::Codex,
                            origin: RecordOrigin { file: path.to_path_buf(), line },
                        });
                    }
                    LineVerdict::Continue
                }
                // Resumed sessions repeat the header; the first one wins
                Ok(CodexLine::SessionMeta { .. }) | Ok(CodexLine::Other) => LineVerdict::Continue,
                Err(e) => LineVerdict::Malformed(e.to_string()),
            }
        })?;

        debug!(
            "Parsed {}: {} records ({} malformed lines skipped)",
            path.display(),
            records.len(),
            malformed_lines
        );

        Ok(ParsedFile { records, malformed_lines, recognized })
    }
}
