//! Processed mention tracking

use rusqlite::{OptionalExtension, Result as SqliteResult};

use super::super::Database;
use crate::models::MentionId;

impl Database {
    pub fn is_mention_processed(&self, tweet_id: &MentionId) -> SqliteResult<bool> {
        let conn = self.conn();
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM processed_mentions WHERE tweet_id = ?1",
                [tweet_id.significant()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Record a mention as answered. Re-marking an id is a no-op.
    pub fn mark_mention_processed(
        &self,
        tweet_id: &MentionId,
        author_id: Option<&str>,
        prompt: Option<&str>,
    ) -> SqliteResult<()> {
        let conn = self.conn();
        let now = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "INSERT OR IGNORE INTO processed_mentions (tweet_id, author_id, prompt, processed_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![tweet_id.significant(), author_id, prompt, now],
        )?;
        Ok(())
    }
}
