//! Persistent chat history.
//!
//! Every completed chat turn is appended to the `chat_history` table. Each
//! operation opens its own connection and releases it when the call returns,
//! so a `ChatLog` is just a path and can be shared freely between requests.

use crate::error::Result;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS chat_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        user_query TEXT NOT NULL,
        result TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_chat_history_timestamp ON chat_history(timestamp);
"#;

/// One logged chat turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub query: String,
    pub response: String,
}

/// Append-only chat log backed by SQLite.
#[derive(Debug, Clone)]
pub struct ChatLog {
    path: PathBuf,
}

impl ChatLog {
    /// Open the chat log at `path`, creating the file and table if needed.
    #[instrument(skip_all)]
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let log = Self {
            path: path.to_path_buf(),
        };
        log.connect()?.execute_batch(SCHEMA)?;

        info!("Initialized chat log at {:?}", path);
        Ok(log)
    }

    /// Location of the underlying database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.path)?)
    }

    /// Record a completed chat turn and return the stored record.
    #[instrument(skip(self, query, response))]
    pub fn append(&self, query: &str, response: &str) -> Result<LogRecord> {
        let conn = self.connect()?;
        let timestamp = Utc::now().trunc_subsecs(6);

        conn.execute(
            "INSERT INTO chat_history (timestamp, user_query, result) VALUES (?1, ?2, ?3)",
            params![
                timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
                query,
                response
            ],
        )?;
        let id = conn.last_insert_rowid();

        debug!("Logged chat turn {}", id);
        Ok(LogRecord {
            id,
            timestamp,
            query: query.to_string(),
            response: response.to_string(),
        })
    }

    /// All records, newest first.
    #[instrument(skip(self))]
    pub fn fetch_all(&self) -> Result<Vec<LogRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, timestamp, user_query, result
            FROM chat_history
            ORDER BY timestamp DESC, id DESC
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            let timestamp: String = row.get(1)?;
            Ok(LogRecord {
                id: row.get(0)?,
                timestamp: parse_timestamp(&timestamp),
                query: row.get(2)?,
                response: row.get(3)?,
            })
        })?;

        let records = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        debug!("Fetched {} chat records", records.len());
        Ok(records)
    }

    /// Number of logged turns.
    pub fn count(&self) -> Result<usize> {
        let conn = self.connect()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM chat_history", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Parse either an RFC 3339 timestamp or SQLite's `CURRENT_TIMESTAMP` format.
///
/// Anything else is logged and maps to the Unix epoch.
fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").map(|dt| dt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Unparseable chat log timestamp {:?}: {}", value, e);
            DateTime::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log() -> (tempfile::TempDir, ChatLog) {
        let dir = tempfile::tempdir().unwrap();
        let log = ChatLog::open(&dir.path().join("rag_chat.db")).unwrap();
        (dir, log)
    }

    #[test]
    fn test_append_then_fetch_returns_newest_first() {
        let (_dir, log) = temp_log();

        log.append("What is autism?", "A developmental condition.").unwrap();
        let latest = log.append("Is ADHD real?", "Yes.").unwrap();

        let records = log.fetch_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], latest);
        assert_eq!(records[1].query, "What is autism?");
        assert!(records[0].id > records[1].id);
    }

    #[test]
    fn test_newest_first_with_identical_timestamps() {
        let (_dir, log) = temp_log();
        let conn = Connection::open(log.path()).unwrap();
        for query in ["first", "second", "third"] {
            conn.execute(
                "INSERT INTO chat_history (timestamp, user_query, result) VALUES ('2025-01-01T00:00:00.000000Z', ?1, 'r')",
                params![query],
            )
            .unwrap();
        }

        let queries: Vec<_> = log
            .fetch_all()
            .unwrap()
            .into_iter()
            .map(|r| r.query)
            .collect();
        assert_eq!(queries, vec!["third", "second", "first"]);
    }

    #[test]
    fn test_default_timestamp_is_parsed() {
        let (_dir, log) = temp_log();
        let conn = Connection::open(log.path()).unwrap();
        conn.execute(
            "INSERT INTO chat_history (user_query, result) VALUES ('legacy', 'row')",
            [],
        )
        .unwrap();

        let records = log.fetch_all().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].timestamp.timestamp() > 0);
    }

    #[test]
    fn test_unparseable_timestamp_falls_back_to_epoch() {
        let (_dir, log) = temp_log();
        let conn = Connection::open(log.path()).unwrap();
        conn.execute(
            "INSERT INTO chat_history (timestamp, user_query, result) VALUES ('yesterday', 'q', 'r')",
            [],
        )
        .unwrap();

        let records = log.fetch_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].timestamp, DateTime::<Utc>::default());
        assert_eq!(records[0].timestamp.timestamp(), 0);
    }

    #[test]
    fn test_open_is_idempotent() {
        let (dir, log) = temp_log();
        log.append("q", "r").unwrap();

        let reopened = ChatLog::open(&dir.path().join("rag_chat.db")).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
    }

    #[test]
    fn test_empty_log() {
        let (_dir, log) = temp_log();
        assert!(log.fetch_all().unwrap().is_empty());
        assert_eq!(log.count().unwrap(), 0);
    }

    #[test]
    fn test_unreachable_store_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let log = ChatLog::open(&dir.path().join("rag_chat.db")).unwrap();
        std::fs::remove_dir_all(dir.path()).unwrap();

        assert!(log.fetch_all().is_err());
        assert!(log.append("q", "r").is_err());
    }
}
