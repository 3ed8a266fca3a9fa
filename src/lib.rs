//! Chat History Viewer - Merge and browse Claude Code and Codex chat transcripts
//!
//! Coding assistants write one JSONL transcript per session, and resumed sessions repeat
//! earlier messages in new files. This library loads those transcripts into a common
//! [`Record`] model, merges them onto one timeline without duplicates and renders or
//! summarizes the result. It supports:
//!
//! - Claude Code transcripts: a flat directory of `<session>.jsonl` files
//! - Codex transcripts: a `YYYY/MM/DD/rollout-*.jsonl` tree with a `session_meta` header
//! - Deduplication by message uuid, or by timestamp and content prefix
//! - Terminal rendering, plain-text export and aggregate statistics
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use chat_history_viewer::{LoadOptions, MergeOptions, load_records, merge_records};
//!
//! let loaded = load_records(Path::new("."), &LoadOptions::default())?;
//! let merged = merge_records(loaded.records, &MergeOptions::default());
//! println!("{} messages, {} duplicates removed", merged.summary.total,
//!     merged.summary.duplicates_removed);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod loader;
pub mod merge;
pub mod models;
pub mod parsers;
pub mod render;
pub mod stats;
pub mod utils;

// Re-export commonly used types
pub use loader::{LoadOptions, LoadReport, load_records};
pub use merge::{MergeOptions, MergeSummary, dedup_records, merge_records};
pub use models::{ContentBlock, Record, Role, SourceFormat};
pub use utils::paths::format_path_with_tilde;
