//! Claude Code transcripts: one flat `<session-id>.jsonl` per session

use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::deserializers::{deserialize_non_empty, deserialize_timestamp};
use super::{LineVerdict, ParsedFile, SourceAdapter, read_json_lines};
use crate::models::{ContentBlock, Record, RecordOrigin, Role, SourceFormat};

const ENTRY_TYPE_USER: &str = "user";
const ENTRY_TYPE_ASSISTANT: &str = "assistant";

/// Entry types Claude Code writes that are not chat messages
const NON_MESSAGE_ENTRY_TYPES: &[&str] =
    &["system", "summary", "file-history-snapshot", "queue-operation"];

#[derive(Debug, Deserialize)]
struct ClaudeEntry {
    #[serde(rename = "type")]
    entry_type: String,
    message: ClaudeMessage,
    #[serde(deserialize_with = "deserialize_timestamp")]
    timestamp: DateTime<Utc>,
    #[serde(rename = "sessionId", default, deserialize_with = "deserialize_non_empty")]
    session_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    uuid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClaudeMessage {
    #[serde(default)]
    content: ClaudeContent,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClaudeContent {
    Text(String),
    Blocks(Vec<ClaudeBlock>),
}

impl Default for ClaudeContent {
    fn default() -> Self {
        ClaudeContent::Blocks(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClaudeBlock {
    Text {
        text: String,
    },
    Thinking {
        thinking: String,
    },
    ToolUse {
        id: String,
        name: String,
        #[serde(default)]
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        #[serde(default)]
        content: Value,
        #[serde(default)]
        is_error: bool,
    },
    #[serde(other)]
    Unsupported,
}

impl ClaudeContent {
    fn into_blocks(self) -> Vec<ContentBlock> {
        match self {
            ClaudeContent::Text(text) => vec![ContentBlock::Text { text }],
            ClaudeContent::Blocks(blocks) => {
                blocks.into_iter().filter_map(ClaudeBlock::into_content_block).collect()
            }
        }
    }
}

impl ClaudeBlock {
    fn into_content_block(self) -> Option<ContentBlock> {
        match self {
            ClaudeBlock::Text { text } => Some(ContentBlock::Text { text }),
            ClaudeBlock::Thinking { thinking } => Some(ContentBlock::Thinking { thinking }),
            ClaudeBlock::ToolUse { id, name, input } => {
                Some(ContentBlock::ToolUse { id, name, input })
            }
            ClaudeBlock::ToolResult { tool_use_id, content, is_error } => {
                Some(ContentBlock::ToolResult {
                    tool_use_id,
                    content: tool_result_text(&content),
                    is_error,
                })
            }
            ClaudeBlock::Unsupported => None,
        }
    }
}

/// Tool results carry either a string or a list of `{"type":"text","text":..}` parts
fn tool_result_text(content: &Value) -> String {
    match content {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .map(|part| match part.get("text").and_then(Value::as_str) {
                Some(text) => text.to_string(),
                None => part.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}

/// Adapter for the flat Claude Code layout
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaudeAdapter;

impl SourceAdapter for ClaudeAdapter {
    fn format(&self) -> SourceFormat {
        SourceFormat::Claude
    }

    fn max_depth(&self) -> usize {
        1
    }

    fn parse_file(&self, path: &Path) -> Result<ParsedFile> {
        let fallback_session_id =
            path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
        let mut records = Vec::new();
        let mut recognized = false;

        let malformed_lines = read_json_lines(path, |line, value| {
            let entry_type = value.get("type").and_then(Value::as_str).unwrap_or_default();

            if entry_type != ENTRY_TYPE_USER && entry_type != ENTRY_TYPE_ASSISTANT {
                // Silently skip non-conversation entries (e.g. file-history-snapshot, summary)
                if NON_MESSAGE_ENTRY_TYPES.contains(&entry_type) {
                    recognized = true;
                }
                return LineVerdict::Continue;
            }
            recognized = true;

            match serde_json::from_value::<ClaudeEntry>(value) {
                Ok(entry) => {
                    let role = if entry.entry_type == ENTRY_TYPE_USER {
                        Role::User
                    } else {
                        Role::Assistant
                    };
                    records.push(Record {
                        session_id: entry
                            .session_id
                            .unwrap_or_else(|| fallback_session_id.clone()),
                        timestamp: entry.timestamp,
                        role,
                        content: entry.message.content.into_blocks(),
                        uuid: entry.uuid,
                        project: None,
                        format: SourceFormat::Claude,
                        origin: RecordOrigin { file: path.to_path_buf(), line },
                    });
                    LineVerdict::Continue
                }
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
