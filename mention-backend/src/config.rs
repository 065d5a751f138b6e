use crate::error::{MentionsError, Result};
use crate::models::MentionId;
use crate::twitter::TwitterCredentials;
use std::collections::HashSet;
use std::env;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const BOT_USER_ID: &str = "TWITTER_BOT_USER_ID";
    pub const BOT_HANDLE: &str = "TWITTER_BOT_HANDLE";
    pub const CONSUMER_KEY: &str = "TWITTER_CONSUMER_KEY";
    pub const CONSUMER_SECRET: &str = "TWITTER_CONSUMER_SECRET";
    pub const ACCESS_TOKEN: &str = "TWITTER_ACCESS_TOKEN";
    pub const ACCESS_TOKEN_SECRET: &str = "TWITTER_ACCESS_TOKEN_SECRET";
    pub const DATABASE_URL: &str = "MENTIONS_DATABASE_URL";
    pub const MAX_BATCH_SIZE: &str = "MENTIONS_MAX_BATCH_SIZE";
    pub const RESOLVE_ALL: &str = "MENTIONS_RESOLVE_ALL";
    pub const FORCE_REPLY: &str = "MENTIONS_FORCE_REPLY";
    pub const DEBUG_IDS: &str = "MENTIONS_DEBUG_IDS";
    pub const IGNORE_IDS: &str = "MENTIONS_IGNORE_IDS";
    pub const PRIORITY_USER_IDS: &str = "MENTIONS_PRIORITY_USER_IDS";
}

/// Default values
pub mod defaults {
    pub const DATABASE_URL: &str = "./.db/mentions.db";
    pub const MAX_BATCH_SIZE: usize = 10;
}

/// Read-only settings every validation and scoring step consults.
#[derive(Debug, Clone)]
pub struct MentionRules {
    pub bot_user_id: String,
    /// Bot handle with a leading `@`, as cased in the account name.
    pub bot_handle: String,
    /// Lower-cased `bot_handle`.
    pub bot_handle_lower: String,
    pub ignored_mention_ids: HashSet<MentionId>,
    pub priority_user_ids: HashSet<String>,
}

impl MentionRules {
    pub fn new(bot_user_id: impl Into<String>, bot_handle: &str) -> Self {
        let bot_handle = format!("@{}", bot_handle.trim().trim_start_matches('@'));
        let bot_handle_lower = bot_handle.to_lowercase();
        Self {
            bot_user_id: bot_user_id.into(),
            bot_handle,
            bot_handle_lower,
            ignored_mention_ids: HashSet::new(),
            priority_user_ids: HashSet::new(),
        }
    }

    pub fn with_ignored_mention_ids(mut self, ids: impl IntoIterator<Item = MentionId>) -> Self {
        self.ignored_mention_ids.extend(ids);
        self
    }

    pub fn with_priority_user_ids<S: Into<String>>(
        mut self,
        ids: impl IntoIterator<Item = S>,
    ) -> Self {
        self.priority_user_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn is_ignored(&self, id: &MentionId) -> bool {
        self.ignored_mention_ids.contains(id)
    }

    pub fn is_priority_user(&self, author_id: Option<&str>) -> bool {
        author_id
            .map(|id| self.priority_user_ids.contains(id))
            .unwrap_or(false)
    }
}

#[derive(Clone)]
pub struct Config {
    pub rules: MentionRules,
    pub credentials: TwitterCredentials,
    pub database_url: String,
    pub max_batch_size: usize,
    pub resolve_all: bool,
    pub force_reply: bool,
    pub debug_ids: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let bot_user_id = required(env_vars::BOT_USER_ID)?;
        let bot_handle = required(env_vars::BOT_HANDLE)?;

        let ignored = parse_id_list(&env::var(env_vars::IGNORE_IDS).unwrap_or_default())?;
        let priority = split_list(&env::var(env_vars::PRIORITY_USER_IDS).unwrap_or_default());

        let rules = MentionRules::new(bot_user_id, &bot_handle)
            .with_ignored_mention_ids(ignored)
            .with_priority_user_ids(priority);

        let credentials = TwitterCredentials::new(
            required(env_vars::CONSUMER_KEY)?,
            required(env_vars::CONSUMER_SECRET)?,
            required(env_vars::ACCESS_TOKEN)?,
            required(env_vars::ACCESS_TOKEN_SECRET)?,
        );

        let max_batch_size = match env::var(env_vars::MAX_BATCH_SIZE) {
            Ok(v) => v.trim().parse().map_err(|_| {
                MentionsError::config(format!(
                    "{} must be a number, got '{}'",
                    env_vars::MAX_BATCH_SIZE,
                    v
                ))
            })?,
            Err(_) => defaults::MAX_BATCH_SIZE,
        };

        Ok(Self {
            rules,
            credentials,
            database_url: env::var(env_vars::DATABASE_URL)
                .unwrap_or_else(|_| defaults::DATABASE_URL.to_string()),
            max_batch_size,
            resolve_all: env_flag(env_vars::RESOLVE_ALL),
            force_reply: env_flag(env_vars::FORCE_REPLY),
            debug_ids: env::var(env_vars::DEBUG_IDS)
                .ok()
                .filter(|s| !s.trim().is_empty()),
        })
    }
}

fn required(var: &str) -> Result<String> {
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| MentionsError::config(format!("{} not configured", var)))
}

fn env_flag(var: &str) -> bool {
    env::var(var)
        .map(|v| parse_flag(&v))
        .unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Split a comma-separated list, dropping blanks.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Parse a comma-separated list of tweet ids.
pub fn parse_id_list(value: &str) -> Result<Vec<MentionId>> {
    split_list(value).iter().map(|s| s.parse()).collect()
}
