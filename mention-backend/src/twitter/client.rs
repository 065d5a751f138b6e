//! Twitter API v2 implementation of [`MentionFeed`].

use super::oauth::{generate_oauth_header, percent_encode, TwitterCredentials};
use super::{MentionFeed, MentionPages, MENTIONS_PAGE_SIZE};
use crate::error::{MentionsError, Result};
use crate::models::{MentionId, TweetPage};
use async_trait::async_trait;

/// Twitter API v2 base URL
pub const TWITTER_API_BASE: &str = "https://api.twitter.com/2";

const EXPANSIONS: &str =
    "author_id,in_reply_to_user_id,referenced_tweets.id,referenced_tweets.id.author_id";
const TWEET_FIELDS: &str =
    "created_at,public_metrics,conversation_id,in_reply_to_user_id,referenced_tweets,text";
const USER_FIELDS: &str = "profile_image_url,public_metrics";

/// Remaining-request count at which we start warning.
const RATE_LIMIT_WARN_THRESHOLD: u64 = 3;

pub struct TwitterClient {
    http: reqwest::Client,
    credentials: TwitterCredentials,
}

impl TwitterClient {
    pub fn new(credentials: TwitterCredentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials,
        }
    }

    fn expansion_params() -> Vec<(&'static str, String)> {
        vec![
            ("expansions", EXPANSIONS.to_string()),
            ("tweet.fields", TWEET_FIELDS.to_string()),
            ("user.fields", USER_FIELDS.to_string()),
        ]
    }

    /// Signed GET returning one decoded page.
    async fn get_page(&self, path: &str, params: &[(&str, String)]) -> Result<TweetPage> {
        let url = format!("{}{}", TWITTER_API_BASE, path);
        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let full_url = if query_string.is_empty() {
            url.clone()
        } else {
            format!("{}?{}", url, query_string)
        };

        let auth_header = generate_oauth_header("GET", &url, &self.credentials, params);

        let response = self
            .http
            .get(&full_url)
            .header("Authorization", auth_header)
            .send()
            .await?;

        warn_if_rate_limit_low(&response);

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        log::debug!("Twitter: GET {} ({})", path, status);

        if !status.is_success() {
            return Err(MentionsError::feed(format!("API error ({}): {}", status, body)));
        }

        parse_page(&body)
    }
}

/// Decode a response body, treating an `errors` payload without data as a failure.
///
/// Lookups report per-item problems (deleted or protected tweets) in
/// `errors` next to the data that did resolve; those are only logged.
fn parse_page(body: &str) -> Result<TweetPage> {
    let page: TweetPage = serde_json::from_str(body)
        .map_err(|e| MentionsError::feed(format!("Failed to parse response: {}", e)))?;

    if let Some(errors) = &page.errors {
        let error_msg = errors
            .iter()
            .map(|e| e.describe())
            .collect::<Vec<_>>()
            .join("; ");

        if page.data.is_none() && page.meta.is_none() {
            return Err(MentionsError::feed(format!("Twitter API errors: {}", error_msg)));
        }
        log::warn!("Twitter: partial errors in response: {}", error_msg);
    }

    Ok(page)
}

fn warn_if_rate_limit_low(response: &reqwest::Response) {
    let header = |name: &str| -> Option<u64> {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    };

    if let Some(remaining) = header("x-rate-limit-remaining") {
        if remaining <= RATE_LIMIT_WARN_THRESHOLD {
            log::warn!(
                "Twitter: Rate limit low ({} remaining), resets at {:?}",
                remaining,
                header("x-rate-limit-reset")
            );
        }
    }
}

#[async_trait]
impl MentionFeed for TwitterClient {
    async fn tweets_by_ids(&self, ids: &[MentionId]) -> Result<TweetPage> {
        let ids = ids.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(",");
        let mut params = vec![("ids", ids)];
        params.extend(Self::expansion_params());
        self.get_page("/tweets", &params).await
    }

    fn user_mentions<'a>(
        &'a self,
        user_id: &str,
        since_id: Option<&MentionId>,
    ) -> Box<dyn MentionPages + 'a> {
        Box::new(TimelinePages {
            client: self,
            user_id: user_id.to_string(),
            since_id: since_id.cloned(),
            next_token: None,
            exhausted: false,
        })
    }
}

/// Cursor over `GET /users/:id/mentions`, following `next_token`.
struct TimelinePages<'a> {
    client: &'a TwitterClient,
    user_id: String,
    since_id: Option<MentionId>,
    next_token: Option<String>,
    exhausted: bool,
}

impl TimelinePages<'_> {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("max_results", MENTIONS_PAGE_SIZE.to_string())];
        params.extend(TwitterClient::expansion_params());
        if let Some(since_id) = &self.since_id {
            params.push(("since_id", since_id.to_string()));
        }
        if let Some(token) = &self.next_token {
            params.push(("pagination_token", token.clone()));
        }
        params
    }
}

#[async_trait]
impl<'a> MentionPages for TimelinePages<'a> {
    fn has_more(&self) -> bool {
        !self.exhausted
    }

    async fn next_page(&mut self) -> Result<TweetPage> {
        if self.exhausted {
            return Ok(TweetPage::default());
        }

        let path = format!("/users/{}/mentions", self.user_id);
        let page = self.client.get_page(&path, &self.params()).await?;

        self.next_token = page.next_token().map(|t| t.to_string());
        self.exhausted = self.next_token.is_none();

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TwitterClient {
        TwitterClient::new(TwitterCredentials::new(
            "ck".to_string(),
            "cs".to_string(),
            "at".to_string(),
            "ats".to_string(),
        ))
    }

    #[test]
    fn test_timeline_params_carry_cursor_state() {
        let client = client();
        let mut pages = TimelinePages {
            client: &client,
            user_id: "42".to_string(),
            since_id: Some("1000".parse().unwrap()),
            next_token: None,
            exhausted: false,
        };

        let params = pages.params();
        assert!(params.contains(&("max_results", "100".to_string())));
        assert!(params.contains(&("since_id", "1000".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "pagination_token"));

        pages.next_token = Some("tok".to_string());
        assert!(pages.params().contains(&("pagination_token", "tok".to_string())));
    }

    #[test]
    fn test_fresh_cursor_has_more() {
        let client = client();
        let pages = client.user_mentions("42", None);
        assert!(pages.has_more());
    }

    #[test]
    fn test_parse_page_errors_without_data_fail() {
        let err = parse_page(r#"{"errors": [{"message": "Rate limit exceeded"}]}"#).unwrap_err();
        assert!(matches!(err, MentionsError::FeedFetch { .. }));
        assert!(err.to_string().contains("Rate limit exceeded"));
    }

    #[test]
    fn test_parse_page_partial_errors_are_tolerated() {
        let page = parse_page(
            r#"{"data": [{"id": "1", "text": "@bot hi"}],
                "errors": [{"detail": "Could not find tweet with ids: [2]."}]}"#,
        )
        .unwrap();
        assert_eq!(page.data.unwrap().len(), 1);
    }

    #[test]
    fn test_parse_page_empty_timeline() {
        let page = parse_page(r#"{"meta": {"result_count": 0}}"#).unwrap();
        assert!(page.data.is_none());
        assert!(page.next_token().is_none());
    }
}
