pub mod environment;
pub mod paths;
pub mod terminal;
pub mod time;

pub use environment::{default_root, get_codex_sessions_dir};
pub use paths::{format_path_with_tilde, resolve_root_dir, validate_file_size};
pub use terminal::{strip_ansi_codes, supports_color};
pub use time::{format_duration, format_timestamp};
