use owo_colors::{OwoColorize, Style};

use crate::models::Role;

/// Semantic colors used across transcript and stats output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    User,
    Assistant,
    Thinking,
    ToolCall,
    ToolOutput,
    /// Timestamps, session and file info
    Info,
    Separator,
    Highlight,
}

impl Tone {
    pub fn style(self) -> Style {
        match self {
            Tone::User => Style::new().red().bold(),
            Tone::Assistant => Style::new().blue().bold(),
            Tone::Thinking => Style::new().bright_black().dimmed(),
            Tone::ToolCall => Style::new().yellow().bold(),
            Tone::ToolOutput => Style::new().bright_cyan(),
            Tone::Info => Style::new().bright_black(),
            Tone::Separator => Style::new().bright_black().dimmed(),
            Tone::Highlight => Style::new().green().bold(),
        }
    }

    pub fn for_role(role: Role) -> Self {
        match role {
            Role::User => Tone::User,
            Role::Assistant => Tone::Assistant,
            Role::Thinking => Tone::Thinking,
            Role::ToolCall => Tone::ToolCall,
            Role::ToolResult => Tone::ToolOutput,
            Role::System => Tone::Info,
        }
    }
}

/// Applies [`Tone`]s when colors are enabled, passes text through otherwise
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn paint(&self, text: &str, tone: Tone) -> String {
        if self.enabled { text.style(tone.style()).to_string() } else { text.to_string() }
    }
}
