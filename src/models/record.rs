use std::borrow::Cow;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::source::SourceFormat;

/// Who (or what) produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    System,
    ToolCall,
    ToolResult,
    Thinking,
}

impl Role {
    /// Human-readable label used in rendered transcripts
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
            Role::System => "System",
            Role::ToolCall => "Tool call",
            Role::ToolResult => "Tool output",
            Role::Thinking => "Thinking",
        }
    }
}

/// One part of a (possibly multi-part) message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    Thinking { thinking: String },
    ToolUse { id: String, name: String, input: Value },
    ToolResult { tool_use_id: String, content: String, is_error: bool },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn is_thinking(&self) -> bool {
        matches!(self, ContentBlock::Thinking { .. })
    }

    pub fn is_tool(&self) -> bool {
        matches!(self, ContentBlock::ToolUse { .. } | ContentBlock::ToolResult { .. })
    }

    /// Flattened textual form of the block
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            ContentBlock::Text { text } => Cow::Borrowed(text),
            ContentBlock::Thinking { thinking } => Cow::Borrowed(thinking),
            ContentBlock::ToolUse { name, input, .. } => Cow::Owned(format!("{} {}", name, input)),
            ContentBlock::ToolResult { content, .. } => Cow::Borrowed(content),
        }
    }
}

/// File and 1-based line a record was parsed from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RecordOrigin {
    pub file: PathBuf,
    pub line: usize,
}

/// One normalized chat message or event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub role: Role,
    pub content: Vec<ContentBlock>,
    /// Unique message identifier, when the source format provides one
    pub uuid: Option<String>,
    /// Working directory of the session this record belongs to
    pub project: Option<PathBuf>,
    pub format: SourceFormat,
    pub origin: RecordOrigin,
}

impl Record {
    /// All blocks flattened to text, newline separated
    pub fn content_text(&self) -> String {
        let parts: Vec<Cow<'_, str>> = self.content.iter().map(|b| b.as_text()).collect();
        parts.join("\n")
    }

    pub fn has_tool_use(&self) -> bool {
        self.role == Role::ToolCall
            || self.content.iter().any(|b| matches!(b, ContentBlock::ToolUse { .. }))
    }

    pub fn has_tool_result(&self) -> bool {
        self.role == Role::ToolResult
            || self.content.iter().any(|b| matches!(b, ContentBlock::ToolResult { .. }))
    }

    /// A prompt actually typed by the user: no tool results, some non-blank text
    pub fn is_prompt(&self) -> bool {
        self.role == Role::User
            && !self.has_tool_result()
            && self.content.iter().any(|b| match b {
                ContentBlock::Text { text } => !text.trim().is_empty(),
                _ => false,
            })
    }

    /// Part of the assistant's side of a turn
    pub fn is_response(&self) -> bool {
        matches!(self.role, Role::Assistant | Role::Thinking | Role::ToolCall | Role::ToolResult)
            || self.has_tool_result()
    }

    /// Name of the file this record came from
    pub fn file_name(&self) -> Cow<'_, str> {
        self.origin
            .file
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| self.origin.file.to_string_lossy())
    }

    /// Project path as a string, if the session has one
    pub fn project_str(&self) -> Option<Cow<'_, str>> {
        self.project.as_ref().map(|p| p.to_string_lossy())
    }
}
