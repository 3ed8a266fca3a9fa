//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use serde_json::{Value, json};
use tempfile::TempDir;

/// Builder for a directory of transcript files
pub struct TranscriptDirBuilder {
    temp_dir: TempDir,
}

impl TranscriptDirBuilder {
    /// Create a new builder with an empty directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write raw content to a file relative to the root, creating parent directories
    pub fn with_file(self, relative: &str, content: &str) -> Self {
        let path = self.temp_dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&path, content).expect("Failed to write transcript");
        self
    }

    /// Add a Claude Code session file
    pub fn with_claude_file(self, file_name: &str, entries: &[ClaudeEntryBuilder]) -> Self {
        let content = entries.iter().map(|e| e.to_json()).collect::<Vec<_>>().join("\n");
        self.with_file(file_name, &content)
    }

    /// Add a Codex rollout file at `relative` (e.g. `2025/09/10/rollout-a.jsonl`)
    pub fn with_codex_file(self, relative: &str, session: &CodexSessionBuilder) -> Self {
        let content = session.to_jsonl();
        self.with_file(relative, &content)
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for TranscriptDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for one line of a Claude Code transcript
pub struct ClaudeEntryBuilder {
    entry_type: &'static str,
    content: Value,
    timestamp: Value,
    session_id: String,
    uuid: Option<String>,
}

impl ClaudeEntryBuilder {
    pub fn user() -> Self {
        Self {
            entry_type: "user",
            content: json!("Test message"),
            timestamp: json!("2025-09-10T08:00:00.000Z"),
            session_id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            uuid: None,
        }
    }

    pub fn assistant() -> Self {
        Self {
            entry_type: "assistant",
            content: json!([{"type": "text", "text": "Test response"}]),
            ..Self::user()
        }
    }

    /// Plain string content
    pub fn text(mut self, text: &str) -> Self {
        self.content = json!(text);
        self
    }

    /// Content as a list of blocks
    pub fn blocks(mut self, blocks: Value) -> Self {
        self.content = blocks;
        self
    }

    /// RFC 3339 timestamp
    pub fn at(mut self, timestamp: &str) -> Self {
        self.timestamp = json!(timestamp);
        self
    }

    pub fn session_id(mut self, session_id: &str) -> Self {
        self.session_id = session_id.to_string();
        self
    }

    pub fn uuid(mut self, uuid: &str) -> Self {
        self.uuid = Some(uuid.to_string());
        self
    }

    pub fn to_json(&self) -> String {
        let mut entry = json!({
            "type": self.entry_type,
            "message": {"role": self.entry_type, "content": self.content},
            "timestamp": self.timestamp,
            "sessionId": self.session_id,
        });
        if let Some(uuid) = &self.uuid {
            entry["uuid"] = json!(uuid);
        }
        entry.to_string()
    }
}

/// Builder for a Codex rollout: a `session_meta` header followed by response items
pub struct CodexSessionBuilder {
    id: String,
    cwd: String,
    items: Vec<Value>,
}

impl CodexSessionBuilder {
    pub fn new(id: &str, cwd: &str) -> Self {
        Self { id: id.to_string(), cwd: cwd.to_string(), items: Vec::new() }
    }

    pub fn message(mut self, timestamp: &str, role: &str, text: &str) -> Self {
        let part_type = if role == "assistant" { "output_text" } else { "input_text" };
        self.items.push(json!({
            "timestamp": timestamp,
            "type": "response_item",
            "payload": {"type": "message", "role": role,
                        "content": [{"type": part_type, "text": text}]},
        }));
        self
    }

    pub fn reasoning(mut self, timestamp: &str, summary: &str) -> Self {
        self.items.push(json!({
            "timestamp": timestamp,
            "type": "response_item",
            "payload": {"type": "reasoning", "summary": [{"type": "summary_text", "text": summary}],
                        "encrypted_content": "gAAAA"},
        }));
        self
    }

    pub fn function_call(
        mut self,
        timestamp: &str,
        name: &str,
        arguments: Value,
        call_id: &str,
    ) -> Self {
        self.items.push(json!({
            "timestamp": timestamp,
            "type": "response_item",
            "payload": {"type": "function_call", "name": name,
                        "arguments": arguments.to_string(), "call_id": call_id},
        }));
        self
    }

    pub fn function_output(mut self, timestamp: &str, call_id: &str, output: &str) -> Self {
        let output_json = json!({"output": output, "metadata": {"exit_code": 0}}).to_string();
        self.items.push(json!({
            "timestamp": timestamp,
            "type": "response_item",
            "payload": {"type": "function_call_output", "call_id": call_id,
                        "output": output_json},
        }));
        self
    }

    /// A line the viewer does not render (token counts, turn context)
    pub fn event(mut self, timestamp: &str) -> Self {
        self.items.push(json!({
            "timestamp": timestamp,
            "type": "event_msg",
            "payload": {"type": "token_count", "info": null},
        }));
        self
    }

    pub fn to_jsonl(&self) -> String {
        let header = json!({
            "timestamp": "2025-09-10T10:00:00.000Z",
            "type": "session_meta",
            "payload": {"id": self.id, "cwd": self.cwd, "originator": "codex_cli_rs",
                        "cli_version": "0.36.0"},
        });
        std::iter::once(header.to_string())
            .chain(self.items.iter().map(Value::to_string))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A Claude Code directory with two overlapping sessions and an agent transcript
///
/// `resumed.jsonl` repeats the first two messages of `original.jsonl` (same uuids).
pub fn overlapping_claude_dir() -> TempDir {
    let original = "0199a1b2-0000-7000-8000-000000000001";
    let resumed = "0199a1b2-0000-7000-8000-000000000002";

    TranscriptDirBuilder::new()
        .with_claude_file(
            "original.jsonl",
            &[
                ClaudeEntryBuilder::user()
                    .text("Add a parser for the config file")
                    .at("2025-09-10T08:00:00.000Z")
                    .session_id(original)
                    .uuid("u-1"),
                ClaudeEntryBuilder::assistant()
                    .blocks(json!([
                        {"type": "thinking", "thinking": "Need to look at the config format"},
                        {"type": "text", "text": "I'll start by reading the file."}
                    ]))
                    .at("2025-09-10T08:00:05.000Z")
                    .session_id(original)
                    .uuid("u-2"),
            ],
        )
        .with_claude_file(
            "resumed.jsonl",
            &[
                ClaudeEntryBuilder::user()
                    .text("Add a parser for the config file")
                    .at("2025-09-10T08:00:00.000Z")
                    .session_id(resumed)
                    .uuid("u-1"),
                ClaudeEntryBuilder::assistant()
                    .blocks(json!([
                        {"type": "thinking", "thinking": "Need to look at the config format"},
                        {"type": "text", "text": "I'll start by reading the file."}
                    ]))
                    .at("2025-09-10T08:00:05.000Z")
                    .session_id(resumed)
                    .uuid("u-2"),
                ClaudeEntryBuilder::assistant()
                    .blocks(json!([{"type": "tool_use", "id": "toolu_01ABCDEFGHIJKLMN",
                                    "name": "Read", "input": {"file_path": "/repo/config.toml"}}]))
                    .at("2025-09-10T09:00:00.000Z")
                    .session_id(resumed)
                    .uuid("u-3"),
                ClaudeEntryBuilder::user()
                    .blocks(json!([{"type": "tool_result", "tool_use_id": "toolu_01ABCDEFGHIJKLMN",
                                    "content": "[server]\nport = 8080"}]))
                    .at("2025-09-10T09:00:01.000Z")
                    .session_id(resumed)
                    .uuid("u-4"),
                ClaudeEntryBuilder::assistant()
                    .text("The parser is in place.")
                    .at("2025-09-10T09:01:00.000Z")
                    .session_id(resumed)
                    .uuid("u-5"),
            ],
        )
        .with_claude_file(
            "agent-5f3c.jsonl",
            &[ClaudeEntryBuilder::user()
                .text("Search the repo for config loaders")
                .at("2025-09-10T08:30:00.000Z")
                .session_id(resumed)
                .uuid("a-1")],
        )
        .build()
}

/// A Codex sessions tree with two projects on two days
pub fn codex_sessions_dir() -> TempDir {
    TranscriptDirBuilder::new()
        .with_codex_file(
            "2025/09/10/rollout-2025-09-10T10-00-00-0199aaaa.jsonl",
            &CodexSessionBuilder::new(
                "0199aaaa-1111-7000-8000-000000000001",
                "/root/wjd/jax-dna-kernelcat",
            )
                .message("2025-09-10T10:00:01.000Z", "user", "Profile the kernel")
                .reasoning("2025-09-10T10:00:03.000Z", "Check the benchmark harness first")
                .function_call(
                    "2025-09-10T10:00:04.000Z",
                    "shell",
                    json!({"command": ["bash", "-lc", "pytest -q"]}),
                    "call_1",
                )
                .function_output("2025-09-10T10:00:20.000Z", "call_1", "12 passed")
                .event("2025-09-10T10:00:21.000Z")
                .message("2025-09-10T10:00:30.000Z", "assistant", "All tests pass."),
        )
        .with_codex_file(
            "2025/09/11/rollout-2025-09-11T09-00-00-0199bbbb.jsonl",
            &CodexSessionBuilder::new("0199bbbb-2222-7000-8000-000000000002", "/srv/web-frontend")
                .message("2025-09-11T09:00:01.000Z", "user", "Fix the login form")
                .message("2025-09-11T09:00:09.000Z", "assistant", "Fixed."),
        )
        .build()
}
