//! Error kinds surfaced by the mention pipeline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MentionsError {
    /// Network, auth, rate-limit or decoding failure from the feed client.
    #[error("Feed fetch failed: {message}")]
    FeedFetch { message: String },

    /// Lookup or write against the processed-mention record store failed.
    #[error("Record store error: {message}")]
    RecordStore { message: String },

    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl MentionsError {
    pub fn feed(message: impl Into<String>) -> Self {
        MentionsError::FeedFetch {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        MentionsError::MalformedInput {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        MentionsError::Config {
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for MentionsError {
    fn from(e: rusqlite::Error) -> Self {
        MentionsError::RecordStore {
            message: e.to_string(),
        }
    }
}

impl From<reqwest::Error> for MentionsError {
    fn from(e: reqwest::Error) -> Self {
        MentionsError::FeedFetch {
            message: format!("Request failed: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, MentionsError>;
