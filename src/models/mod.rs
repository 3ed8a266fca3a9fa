//! Data models for normalized chat transcripts.
//!
//! - [`Record`] - One message or event, whatever tool wrote it
//! - [`ContentBlock`] - A part of a multi-part message (text, thinking, tool use, tool result)
//! - [`Session`] - Per-session summary derived from a run of records
//! - [`SourceFormat`] - Which on-disk layout a record came from
//!
//! Source-specific JSON shapes live next to their adapters in `parsers`; everything past the
//! loader only sees these types.

pub mod record;
pub mod session;
pub mod source;

pub use record::{ContentBlock, Record, RecordOrigin, Role};
pub use session::Session;
pub use source::SourceFormat;
