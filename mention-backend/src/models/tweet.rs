//! Tweets, users and feed pages as returned by Twitter API v2.
//!
//! The same [`Tweet`] shape is used for mentions and for the parent tweets
//! pulled in through `referenced_tweets.id` expansions. Fields after the raw
//! API ones are filled in by the pipeline and are never present on the wire.

use super::MentionId;
use serde::{Deserialize, Serialize};

/// Relation kind marking a tweet as a reply to its target.
pub const REPLIED_TO: &str = "replied_to";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    pub id: MentionId,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_tweets: Option<Vec<TweetReference>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default)]
    pub is_reply: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_mentions: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_followers: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_url: Option<String>,
}

/// A mention is a tweet addressed to the bot account.
pub type Mention = Tweet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweetReference {
    #[serde(rename = "type")]
    pub ref_type: String,
    pub id: MentionId,
}

impl Tweet {
    pub fn new(id: MentionId, text: impl Into<String>, author_id: impl Into<String>) -> Self {
        Tweet {
            id,
            text: Some(text.into()),
            author_id: Some(author_id.into()),
            conversation_id: None,
            in_reply_to_user_id: None,
            created_at: None,
            referenced_tweets: None,
            prompt: None,
            is_reply: false,
            num_mentions: None,
            priority_score: None,
            num_followers: None,
            prompt_url: None,
        }
    }

    /// Mark this tweet as a reply to `parent`.
    pub fn replying_to(mut self, parent: MentionId) -> Self {
        self.referenced_tweets
            .get_or_insert_with(Vec::new)
            .push(TweetReference {
                ref_type: REPLIED_TO.to_string(),
                id: parent,
            });
        self
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Id of the tweet this one replies to, if any.
    pub fn replied_to_id(&self) -> Option<&MentionId> {
        self.referenced_tweets
            .as_ref()?
            .iter()
            .find(|r| r.ref_type == REPLIED_TO)
            .map(|r| &r.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_metrics: Option<PublicMetrics>,
}

impl User {
    pub fn followers_count(&self) -> Option<u64> {
        self.public_metrics.as_ref().map(|m| m.followers_count)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublicMetrics {
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub following_count: u64,
    #[serde(default)]
    pub tweet_count: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct Includes {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub tweets: Vec<Tweet>,
}

/// Only the cursor is read; counts and id bounds are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct PageMeta {
    pub next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
}

impl ApiError {
    pub fn describe(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.detail.clone())
            .or_else(|| self.error_type.clone())
            .unwrap_or_else(|| "unknown error".to_string())
    }
}

/// One response page from a tweet lookup or the mentions timeline.
#[derive(Debug, Default, Deserialize)]
pub struct TweetPage {
    #[serde(default)]
    pub data: Option<Vec<Tweet>>,
    #[serde(default)]
    pub includes: Option<Includes>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
    #[serde(default)]
    pub errors: Option<Vec<ApiError>>,
}

impl TweetPage {
    pub fn next_token(&self) -> Option<&str> {
        self.meta.as_ref().and_then(|m| m.next_token.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mentions_page() {
        let body = r#"{
            "data": [
                {"id": "1600000000000000002", "text": "@bot hi", "author_id": "42",
                 "referenced_tweets": [{"type": "replied_to", "id": "1600000000000000001"}]}
            ],
            "includes": {
                "users": [{"id": "42", "username": "alice", "name": "Alice",
                           "public_metrics": {"followers_count": 1500,
                                              "following_count": 3, "tweet_count": 9}}],
                "tweets": [{"id": "1600000000000000001", "text": "@bot first", "author_id": "7"}]
            },
            "meta": {"result_count": 1, "newest_id": "1600000000000000002", "next_token": "abc"}
        }"#;

        let page: TweetPage = serde_json::from_str(body).unwrap();
        let tweets = page.data.as_ref().unwrap();
        assert_eq!(tweets.len(), 1);
        assert_eq!(tweets[0].replied_to_id().unwrap().as_str(), "1600000000000000001");
        assert!(tweets[0].prompt.is_none());
        assert!(!tweets[0].is_reply);

        let includes = page.includes.as_ref().unwrap();
        assert_eq!(includes.users[0].followers_count(), Some(1500));
        assert_eq!(includes.tweets[0].text(), "@bot first");
        assert_eq!(page.next_token(), Some("abc"));
    }

    #[test]
    fn test_missing_text_reads_as_empty() {
        let tweet: Tweet = serde_json::from_str(r#"{"id": "5"}"#).unwrap();
        assert_eq!(tweet.text(), "");
        assert!(tweet.replied_to_id().is_none());
    }

    #[test]
    fn test_quote_is_not_reply() {
        let tweet: Tweet = serde_json::from_str(
            r#"{"id": "5", "text": "x", "referenced_tweets": [{"type": "quoted", "id": "4"}]}"#,
        )
        .unwrap();
        assert!(tweet.replied_to_id().is_none());
    }
}
