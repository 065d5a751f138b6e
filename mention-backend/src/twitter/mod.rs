//! Feed client seam for Twitter mentions.
//!
//! [`MentionFeed`] is what the pipeline talks to; [`TwitterClient`] is the
//! HTTP implementation against API v2. Tests substitute in-memory feeds.

mod client;
mod oauth;

pub use client::{TwitterClient, TWITTER_API_BASE};
pub use oauth::{generate_oauth_header, percent_encode, TwitterCredentials};

use crate::error::Result;
use crate::models::{MentionId, TweetPage};
use async_trait::async_trait;

/// Largest page the mentions timeline will return.
pub const MENTIONS_PAGE_SIZE: usize = 100;

/// Pull-based cursor over one mentions query.
///
/// A cursor walks forward until the feed's live head and cannot be rewound;
/// a new sweep needs a new cursor from [`MentionFeed::user_mentions`].
#[async_trait]
pub trait MentionPages: Send {
    fn has_more(&self) -> bool;

    async fn next_page(&mut self) -> Result<TweetPage>;
}

#[async_trait]
pub trait MentionFeed: Send + Sync {
    /// Fetch exactly the given tweets, with author and referenced-tweet expansions.
    async fn tweets_by_ids(&self, ids: &[MentionId]) -> Result<TweetPage>;

    /// Mentions of `user_id` newer than `since_id` (everything when `None`).
    fn user_mentions<'a>(
        &'a self,
        user_id: &str,
        since_id: Option<&MentionId>,
    ) -> Box<dyn MentionPages + 'a>;
}
