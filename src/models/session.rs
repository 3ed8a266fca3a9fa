use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use super::record::Record;

/// One conversation, summarized from the records that carry its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub project: Option<PathBuf>,
    pub record_count: usize,
    pub first: DateTime<Utc>,
    pub last: DateTime<Utc>,
}

impl Session {
    /// Group records by session id, in order of first appearance
    pub fn group(records: &[Record]) -> Vec<Session> {
        let mut sessions: Vec<Session> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for record in records {
            match positions.get(record.session_id.as_str()) {
                Some(&idx) => {
                    let session = &mut sessions[idx];
                    session.record_count += 1;
                    session.first = session.first.min(record.timestamp);
                    session.last = session.last.max(record.timestamp);
                    if session.project.is_none() {
                        session.project = record.project.clone();
                    }
                }
                None => {
                    positions.insert(&record.session_id, sessions.len());
                    sessions.push(Session {
                        id: record.session_id.clone(),
                        project: record.project.clone(),
                        record_count: 1,
                        first: record.timestamp,
                        last: record.timestamp,
                    });
                }
            }
        }

        sessions
    }
}
