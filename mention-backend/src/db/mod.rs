mod sqlite;
mod tables;

pub use sqlite::Database;

use crate::error::Result;
use crate::models::MentionId;
use async_trait::async_trait;

/// Existence lookups against the record of mentions already answered.
#[async_trait]
pub trait ProcessedMentionStore: Send + Sync {
    async fn has_record(&self, id: &MentionId) -> Result<bool>;
}

#[async_trait]
impl ProcessedMentionStore for Database {
    async fn has_record(&self, id: &MentionId) -> Result<bool> {
        Ok(self.is_mention_processed(id)?)
    }
}
