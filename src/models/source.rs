use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

/// On-disk transcript layout a record was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// Claude Code: one `<session>.jsonl` per session in a flat directory
    #[default]
    Claude,
    /// Codex CLI: `YYYY/MM/DD/rollout-*.jsonl` with a `session_meta` header line
    Codex,
}

impl SourceFormat {
    pub fn name(&self) -> &'static str {
        match self {
            SourceFormat::Claude => "claude",
            SourceFormat::Codex => "codex",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
