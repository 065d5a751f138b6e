//! Pull raw mentions from the feed into a batch.

use crate::config::parse_id_list;
use crate::error::Result;
use crate::models::{Batch, MentionId, TweetPage};
use crate::twitter::MentionFeed;
use std::time::Duration;

/// Pause between resolve-all sweeps (upstream rate limits).
pub const RESOLVE_ALL_SWEEP_DELAY: Duration = Duration::from_secs(6);

#[derive(Debug, Clone, Default)]
pub struct CollectOptions {
    /// Comma-separated tweet ids to fetch instead of paginating.
    pub debug_ids: Option<String>,
    /// Keep sweeping until the high-watermark reaches the live head.
    pub resolve_all: bool,
}

pub struct BatchCollector<'a, F: MentionFeed + ?Sized> {
    feed: &'a F,
    bot_user_id: &'a str,
    sweep_delay: Duration,
}

impl<'a, F: MentionFeed + ?Sized> BatchCollector<'a, F> {
    pub fn new(feed: &'a F, bot_user_id: &'a str) -> Self {
        Self {
            feed,
            bot_user_id,
            sweep_delay: RESOLVE_ALL_SWEEP_DELAY,
        }
    }

    pub fn with_sweep_delay(mut self, sweep_delay: Duration) -> Self {
        self.sweep_delay = sweep_delay;
        self
    }

    pub async fn collect(&self, batch: &mut Batch, options: &CollectOptions) -> Result<()> {
        match options.debug_ids.as_deref() {
            Some(ids) => self.collect_debug(batch, ids).await,
            None => self.collect_sweeps(batch, options.resolve_all).await,
        }
    }

    /// Fetch exactly the named tweets. No pagination, no watermark movement.
    async fn collect_debug(&self, batch: &mut Batch, ids: &str) -> Result<()> {
        let ids: Vec<MentionId> = parse_id_list(ids)?;
        if ids.is_empty() {
            return Ok(());
        }

        log::info!("Mentions: fetching {} debug tweet(s)", ids.len());
        let mut page = self.feed.tweets_by_ids(&ids).await?;

        if let Some(includes) = page.includes.take() {
            batch.merge_includes(includes);
        }
        batch.mentions.extend(page.data.take().unwrap_or_default());
        Ok(())
    }

    async fn collect_sweeps(&self, batch: &mut Batch, resolve_all: bool) -> Result<()> {
        let mut sweep = 0usize;

        loop {
            sweep += 1;
            let sweep_start = batch.since_mention_id.clone();
            let mut found = 0usize;
            let mut pages_read = 0usize;

            let mut pages = self.feed.user_mentions(self.bot_user_id, sweep_start.as_ref());
            while pages.has_more() {
                let page = pages.next_page().await?;
                pages_read += 1;
                found += absorb_page(batch, page);
            }

            log::info!(
                "Mentions: sweep {} read {} page(s), {} mention(s), since_mention_id={:?}",
                sweep,
                pages_read,
                found,
                batch.since_mention_id.as_ref().map(|id| id.as_str())
            );

            let advanced = match (&batch.since_mention_id, &sweep_start) {
                (Some(now), Some(start)) => now > start,
                (Some(_), None) => true,
                _ => false,
            };

            if resolve_all && found > 0 && advanced {
                log::debug!("Mentions: waiting {:?} before next sweep", self.sweep_delay);
                tokio::time::sleep(self.sweep_delay).await;
                continue;
            }

            return Ok(());
        }
    }
}

/// Append a page's mentions to the batch and raise the high-watermark.
fn absorb_page(batch: &mut Batch, mut page: TweetPage) -> usize {
    if let Some(includes) = page.includes.take() {
        batch.merge_includes(includes);
    }

    let mentions = page.data.take().unwrap_or_default();
    let count = mentions.len();
    for mention in mentions {
        batch.advance_since_mention_id(&mention.id);
        batch.mentions.push(mention);
    }
    count
}
