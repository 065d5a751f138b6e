//! Persisted pipeline state

use rusqlite::{OptionalExtension, Result as SqliteResult};

use super::super::Database;
use crate::models::MentionId;

const SINCE_MENTION_ID_KEY: &str = "since_mention_id";

impl Database {
    fn get_state(&self, key: &str) -> SqliteResult<Option<String>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT value FROM bot_state WHERE key = ?1",
            [key],
            |row| row.get(0),
        )
        .optional()
    }

    fn set_state(&self, key: &str, value: &str) -> SqliteResult<()> {
        let conn = self.conn();
        let now = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO bot_state (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE
             SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value, now],
        )?;
        Ok(())
    }

    /// Resume point for the next run. A stored value that no longer parses
    /// as an id is ignored so the run starts from the feed's beginning.
    pub fn get_since_mention_id(&self) -> SqliteResult<Option<MentionId>> {
        let value = self.get_state(SINCE_MENTION_ID_KEY)?;
        Ok(value.and_then(|v| match v.parse() {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("Mentions: ignoring stored since_mention_id: {}", e);
                None
            }
        }))
    }

    pub fn save_since_mention_id(&self, id: &MentionId) -> SqliteResult<()> {
        self.set_state(SINCE_MENTION_ID_KEY, id.significant())
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;

    #[test]
    fn test_since_mention_id_roundtrip() {
        let db = Database::new(":memory:").expect("in-memory db");
        assert!(db.get_since_mention_id().unwrap().is_none());

        db.save_since_mention_id(&"1600000000000000000".parse().unwrap()).unwrap();
        db.save_since_mention_id(&"1600000000000000005".parse().unwrap()).unwrap();

        let stored = db.get_since_mention_id().unwrap().unwrap();
        assert_eq!(stored.as_str(), "1600000000000000005");
    }

    #[test]
    fn test_garbage_state_is_ignored() {
        let db = Database::new(":memory:").expect("in-memory db");
        db.set_state("since_mention_id", "not-an-id").unwrap();
        assert!(db.get_since_mention_id().unwrap().is_none());
    }
}
