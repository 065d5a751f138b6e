use rusqlite::{Connection, Result as SqliteResult};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn new(database_url: &str) -> SqliteResult<Self> {
        let conn = if database_url == ":memory:" {
            Connection::open_in_memory()?
        } else {
            // Create parent directory if it doesn't exist
            if let Some(parent) = Path::new(database_url).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).ok();
                }
            }
            let conn = Connection::open(database_url)?;
            conn.execute_batch("PRAGMA journal_mode=WAL;")?;
            conn
        };

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init()?;
        Ok(db)
    }

    pub(super) fn conn(&self) -> MutexGuard<'_, Connection> {
        // A poisoned lock only means another thread panicked mid-query;
        // the connection itself is still usable.
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn init(&self) -> SqliteResult<()> {
        let conn = self.conn();

        // Mentions the bot has already answered
        conn.execute(
            "CREATE TABLE IF NOT EXISTS processed_mentions (
                tweet_id TEXT PRIMARY KEY,
                author_id TEXT,
                prompt TEXT,
                processed_at TEXT NOT NULL
            )",
            [],
        )?;

        // Small key/value state (resume watermark)
        conn.execute(
            "CREATE TABLE IF NOT EXISTS bot_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }
}
