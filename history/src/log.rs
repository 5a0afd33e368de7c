use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};

use crate::keys::{turn_key, user_prefix};
use crate::types::{Turn, now_nano};
use crate::{HistoryError, HistoryResult};

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("turns");

/// Persistent log of identified conversation turns.
pub struct HistoryLog {
    db: Database,
}

impl HistoryLog {
    /// Open or create a history log at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> HistoryResult<Self> {
        let db = Database::create(path).map_err(|e| HistoryError::Storage(e.to_string()))?;

        // Create the table if it doesn't exist
        let tx = db
            .begin_write()
            .map_err(|e| HistoryError::Storage(e.to_string()))?;
        {
            let _ = tx
                .open_table(TABLE)
                .map_err(|e| HistoryError::Storage(e.to_string()))?;
        }
        tx.commit().map_err(|e| HistoryError::Storage(e.to_string()))?;

        Ok(Self { db })
    }

    /// Store a turn. Auto-fills the timestamp if zero.
    pub fn append(&self, mut turn: Turn) -> HistoryResult<()> {
        if turn.ts == 0 {
            turn.ts = now_nano();
        }

        let data = rmp_serde::to_vec_named(&turn)
            .map_err(|e| HistoryError::Serialization(e.to_string()))?;
        let key = turn_key(&turn.user_id, turn.ts);

        let tx = self
            .db
            .begin_write()
            .map_err(|e| HistoryError::Storage(e.to_string()))?;
        {
            let mut table = tx
                .open_table(TABLE)
                .map_err(|e| HistoryError::Storage(e.to_string()))?;
            table
                .insert(key.as_str(), data.as_slice())
                .map_err(|e| HistoryError::Storage(e.to_string()))?;
        }
        tx.commit().map_err(|e| HistoryError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Return the user's `n` most recent turns in chronological order
    /// (oldest first).
    pub fn recent(&self, user_id: &str, n: usize) -> HistoryResult<Vec<Turn>> {
        if n == 0 {
            return Ok(vec![]);
        }

        let all = self.scan_user(user_id)?;
        let start = if all.len() > n { all.len() - n } else { 0 };
        Ok(all[start..].to_vec())
    }

    /// Total stored turns for a user.
    pub fn count(&self, user_id: &str) -> HistoryResult<usize> {
        Ok(self.scan_user(user_id)?.len())
    }

    fn scan_user(&self, user_id: &str) -> HistoryResult<Vec<Turn>> {
        let prefix = user_prefix(user_id);

        let tx = self
            .db
            .begin_read()
            .map_err(|e| HistoryError::Storage(e.to_string()))?;
        let table = tx
            .open_table(TABLE)
            .map_err(|e| HistoryError::Storage(e.to_string()))?;

        let mut entries = Vec::new();
        for item in table
            .iter()
            .map_err(|e| HistoryError::Storage(e.to_string()))?
        {
            let (key, value) = item.map_err(|e| HistoryError::Storage(e.to_string()))?;
            if key.value().starts_with(&prefix) {
                entries.push((key.value().to_string(), value.value().to_vec()));
            }
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut turns = Vec::with_capacity(entries.len());
        for (_, data) in entries {
            let turn: Turn = rmp_serde::from_slice(&data)
                .map_err(|e| HistoryError::Serialization(e.to_string()))?;
            turns.push(turn);
        }
        Ok(turns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn turn(user_id: &str, heard: &str, reply: &str) -> Turn {
        Turn {
            user_id: user_id.to_string(),
            heard: heard.to_string(),
            reply: reply.to_string(),
            ts: 0,
        }
    }

    #[test]
    fn test_append_and_recent_oldest_first() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::open(dir.path().join("history.redb")).unwrap();

        log.append(turn("alice", "hello", "hi there")).unwrap();
        log.append(turn("alice", "how are you", "fine")).unwrap();
        log.append(turn("alice", "bye", "goodbye")).unwrap();

        let recent = log.recent("alice", 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].heard, "how are you");
        assert_eq!(recent[1].heard, "bye");
        assert!(recent[0].ts < recent[1].ts);
    }

    #[test]
    fn test_users_are_isolated() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::open(dir.path().join("history.redb")).unwrap();

        log.append(turn("alice", "ping", "pong")).unwrap();
        log.append(turn("bob", "marco", "polo")).unwrap();

        let alice = log.recent("alice", 10).unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].heard, "ping");
        assert_eq!(log.count("bob").unwrap(), 1);
        assert_eq!(log.count("carol").unwrap(), 0);
    }

    #[test]
    fn test_recent_zero_and_unknown_user() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::open(dir.path().join("history.redb")).unwrap();

        log.append(turn("alice", "hello", "hi")).unwrap();
        assert!(log.recent("alice", 0).unwrap().is_empty());
        assert!(log.recent("nobody", 5).unwrap().is_empty());
    }

    #[test]
    fn test_explicit_timestamp_is_kept() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::open(dir.path().join("history.redb")).unwrap();

        let mut t = turn("alice", "hello", "hi");
        t.ts = 42;
        log.append(t).unwrap();

        let recent = log.recent("alice", 1).unwrap();
        assert_eq!(recent[0].ts, 42);
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.redb");
        {
            let log = HistoryLog::open(&path).unwrap();
            log.append(turn("alice", "hello", "hi")).unwrap();
        }

        let log = HistoryLog::open(&path).unwrap();
        let recent = log.recent("alice", 5).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].reply, "hi");
    }
}
