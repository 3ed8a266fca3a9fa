use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::SourceFormat;

/// Get the Codex sessions directory (`$CODEX_HOME/sessions`, else `~/.codex/sessions`)
pub fn get_codex_sessions_dir() -> Result<PathBuf> {
    if let Some(codex_home) = env::var_os("CODEX_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(codex_home).join("sessions"));
    }
    let home = env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".codex").join("sessions"))
}

/// Root to read when none is given on the command line
///
/// Claude Code transcripts are usually browsed from inside the project's session directory,
/// so the current directory is the default there.
pub fn default_root(format: SourceFormat) -> Result<PathBuf> {
    match format {
        SourceFormat::Claude => Ok(Path::new(".").to_path_buf()),
        SourceFormat::Codex => get_codex_sessions_dir(),
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    // Both cases live in one test so they never race on the shared environment
    #[test]
    fn test_get_codex_sessions_dir_from_environment() {
        let original_home = env::var("HOME").ok();
        let original_codex_home = env::var("CODEX_HOME").ok();

        // SAFETY: Setting environment variables in tests is safe as long as:
        // 1. No other test reads these variables concurrently
        // 2. We restore the original values afterwards
        unsafe {
            env::remove_var("CODEX_HOME");
            env::set_var("HOME", "/Users/testuser");
        }
        assert_eq!(
            get_codex_sessions_dir().unwrap(),
            PathBuf::from("/Users/testuser/.codex/sessions")
        );

        unsafe {
            env::set_var("CODEX_HOME", "/opt/codex");
        }
        assert_eq!(get_codex_sessions_dir().unwrap(), PathBuf::from("/opt/codex/sessions"));
        assert_eq!(
            default_root(SourceFormat::Codex).unwrap(),
            PathBuf::from("/opt/codex/sessions")
        );

        // Restore original values
        unsafe {
            match original_home {
                Some(home) => env::set_var("HOME", home),
                None => env::remove_var("HOME"),
            }
            match original_codex_home {
                Some(codex_home) => env::set_var("CODEX_HOME", codex_home),
                None => env::remove_var("CODEX_HOME"),
            }
        }
    }

    #[test]
    fn test_default_root_claude_is_current_dir() {
        assert_eq!(default_root(SourceFormat::Claude).unwrap(), PathBuf::from("."));
    }
}
