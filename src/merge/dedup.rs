use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::models::Record;

/// Characters of flattened content that identify a record without a uuid
pub const DEDUP_PREFIX_CHARS: usize = 100;

/// Identity used to collapse the same message seen in overlapping session files
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    /// The record's unique message id
    Id(String),
    /// Timestamp plus the first [`DEDUP_PREFIX_CHARS`] characters of content
    Composite { timestamp: DateTime<Utc>, prefix: String },
}

impl DedupKey {
    pub fn for_record(record: &Record) -> Self {
        match record.uuid.as_deref() {
            Some(id) if !id.is_empty() => DedupKey::Id(id.to_string()),
            _ => DedupKey::Composite {
                timestamp: record.timestamp,
                prefix: record.content_text().chars().take(DEDUP_PREFIX_CHARS).collect(),
            },
        }
    }
}

/// Keep the first record for every [`DedupKey`], preserving order
///
/// Returns the surviving records and how many were dropped. Running it again on its own
/// output drops nothing.
pub fn dedup_records(records: Vec<Record>) -> (Vec<Record>, usize) {
    let before = records.len();
    let mut seen: HashSet<DedupKey> = HashSet::with_capacity(before);

    let kept: Vec<Record> =
        records.into_iter().filter(|record| seen.insert(DedupKey::for_record(record))).collect();

    let removed = before - kept.len();
    (kept, removed)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::models::{ContentBlock, RecordOrigin, Role, SourceFormat};

    fn record(uuid: Option<&str>, secs: i64, text: &str, file: &str) -> Record {
        Record {
            session_id: "s".to_string(),
            timestamp: DateTime::from_timestamp(secs, 0).unwrap(),
            role: Role::User,
            content: vec![ContentBlock::text(text)],
            uuid: uuid.map(str::to_string),
            project: None,
            format: SourceFormat::Claude,
            origin: RecordOrigin { file: PathBuf::from(file), line: 1 },
        }
    }

    #[test]
    fn test_same_uuid_keeps_first() {
        let records = vec![
            record(Some("u1"), 10, "original", "a.jsonl"),
            record(Some("u1"), 20, "edited copy", "b.jsonl"),
        ];
        let (kept, removed) = dedup_records(records);
        assert_eq!(removed, 1);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].origin.file, PathBuf::from("a.jsonl"));
    }

    #[test]
    fn test_composite_key_matches_on_timestamp_and_prefix() {
        let long_a = format!("{}{}", "x".repeat(DEDUP_PREFIX_CHARS), "tail one");
        let long_b = format!("{}{}", "x".repeat(DEDUP_PREFIX_CHARS), "tail two");
        let records = vec![
            record(None, 10, &long_a, "a.jsonl"),
            record(None, 10, &long_b, "b.jsonl"),
            record(None, 11, &long_a, "c.jsonl"),
            record(None, 10, "different", "d.jsonl"),
        ];
        let (kept, removed) = dedup_records(records);
        assert_eq!(removed, 1);
        let files: Vec<_> =
            kept.iter().map(|r| r.origin.file.to_string_lossy().to_string()).collect();
        assert_eq!(files, vec!["a.jsonl", "c.jsonl", "d.jsonl"]);
    }

    #[test]
    fn test_uuid_and_composite_keys_never_collide() {
        let records =
            vec![record(Some("u1"), 10, "same", "a.jsonl"), record(None, 10, "same", "b.jsonl")];
        let (kept, removed) = dedup_records(records);
        assert_eq!(removed, 0);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_empty_uuid_falls_back_to_composite() {
        let r = record(Some(""), 10, "hi", "a.jsonl");
        assert!(matches!(DedupKey::for_record(&r), DedupKey::Composite { .. }));
    }

    #[test]
    fn test_prefix_counts_characters_not_bytes() {
        let text = "é".repeat(DEDUP_PREFIX_CHARS + 5);
        match DedupKey::for_record(&record(None, 1, &text, "a.jsonl")) {
            DedupKey::Composite { prefix, .. } => {
                assert_eq!(prefix.chars().count(), DEDUP_PREFIX_CHARS)
            }
            other => panic!("unexpected key {:?}", other),
        }
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let records = vec![
            record(Some("u1"), 1, "a", "a.jsonl"),
            record(Some("u1"), 1, "a", "b.jsonl"),
            record(None, 2, "b", "a.jsonl"),
            record(None, 2, "b", "b.jsonl"),
            record(None, 3, "c", "a.jsonl"),
        ];
        let (once, removed_once) = dedup_records(records);
        let (twice, removed_twice) = dedup_records(once.clone());
        assert_eq!(removed_once, 2);
        assert_eq!(removed_twice, 0);
        assert_eq!(once, twice);
    }
}
