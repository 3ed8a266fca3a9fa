use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Sub-task transcripts are named `agent-<id>.jsonl`
pub const AGENT_FILE_PREFIX: &str = "agent-";

const TRANSCRIPT_EXTENSION: &str = "jsonl";

/// Whether a transcript belongs to a spawned sub-agent rather than a main session
pub fn is_agent_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with(AGENT_FILE_PREFIX))
        .unwrap_or(false)
}

/// Find `*.jsonl` files at most `max_depth` levels below `root`, sorted by path
///
/// Symlinks are not followed and symlinked files are skipped. Subdirectories that cannot be
/// read are logged and skipped.
///
/// # Errors
///
/// Returns an error if `root` itself cannot be read.
pub fn discover_transcripts(root: &Path, max_depth: usize) -> Result<Vec<PathBuf>> {
    // Surface an unreadable root as a hard error rather than an empty listing
    fs::read_dir(root).with_context(|| format!("Failed to read directory: {}", root.display()))?;

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable path under {}: {}", root.display(), e);
                continue;
            }
        };

        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != TRANSCRIPT_EXTENSION) {
            continue;
        }

        if entry.path_is_symlink() {
            debug!("Skipping symlinked transcript {}", path.display());
            continue;
        }

        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create dirs");
        }
        fs::write(path, "").expect("Failed to create file");
    }

    #[test]
    fn test_is_agent_file() {
        assert!(is_agent_file(Path::new("/x/agent-foo.jsonl")));
        assert!(!is_agent_file(Path::new("/x/foo-agent.jsonl")));
        assert!(!is_agent_file(Path::new("/x/0199a-session.jsonl")));
    }

    #[test]
    fn test_flat_discovery_ignores_subdirectories_and_other_files() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("b.jsonl"));
        touch(&root.path().join("a.jsonl"));
        touch(&root.path().join("notes.txt"));
        touch(&root.path().join("nested").join("c.jsonl"));

        let files = discover_transcripts(root.path(), 1).unwrap();
        let names: Vec<_> =
            files.iter().map(|p| p.file_name().unwrap().to_string_lossy().to_string()).collect();
        assert_eq!(names, vec!["a.jsonl", "b.jsonl"]);
    }

    #[test]
    fn test_nested_discovery_walks_date_tree_in_order() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("2025/10/02/rollout-b.jsonl"));
        touch(&root.path().join("2025/09/30/rollout-a.jsonl"));
        touch(&root.path().join("2025/10/02/rollout-a.jsonl"));
        touch(&root.path().join("2025/10/02/deeper/than/allowed.jsonl"));

        let files = discover_transcripts(root.path(), 4).unwrap();
        let relative: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root.path()).unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            relative,
            vec![
                "2025/09/30/rollout-a.jsonl",
                "2025/10/02/rollout-a.jsonl",
                "2025/10/02/rollout-b.jsonl",
            ]
        );
    }

    #[test]
    fn test_discovery_empty_directory() {
        let root = TempDir::new().unwrap();
        assert!(discover_transcripts(root.path(), 4).unwrap().is_empty());
    }

    #[test]
    fn test_discovery_missing_root_is_error() {
        let result = discover_transcripts(Path::new("/nonexistent/sessions"), 4);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to read directory"));
    }

    #[cfg(unix)]
    #[test]
    fn test_discovery_skips_symlinked_files() {
        let root = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let target = outside.path().join("secret.jsonl");
        touch(&target);
        std::os::unix::fs::symlink(&target, root.path().join("link.jsonl")).unwrap();
        touch(&root.path().join("real.jsonl"));

        let files = discover_transcripts(root.path(), 1).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("real.jsonl"));
    }
}
