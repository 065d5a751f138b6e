//! Mention acquisition, validation, deduplication and prioritization.
//!
//! [`get_mentions_batch`] runs one pass of the pipeline:
//! collect → validate → drop already-answered → score → cap.

mod collect;
mod dedupe;
mod priority;
mod text;
mod validate;
mod window;

pub use collect::{BatchCollector, CollectOptions, RESOLVE_ALL_SWEEP_DELAY};
pub use dedupe::{filter_processed_mentions, DUPLICATE_CHECK_CONCURRENCY};
pub use priority::{prioritize_mentions, score_mention};
pub use text::{MentionCount, TextNormalizer};
pub use validate::MentionValidator;
pub use window::window_mentions;

use crate::config::{defaults, MentionRules};
use crate::db::ProcessedMentionStore;
use crate::error::Result;
use crate::models::{Batch, MentionId};
use crate::twitter::MentionFeed;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub debug_ids: Option<String>,
    pub resolve_all: bool,
    /// Skip the reply-chain redundancy check and the duplicate filter.
    pub force_reply: bool,
    pub max_batch_size: usize,
    pub sweep_delay: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            debug_ids: None,
            resolve_all: false,
            force_reply: false,
            max_batch_size: defaults::MAX_BATCH_SIZE,
            sweep_delay: RESOLVE_ALL_SWEEP_DELAY,
        }
    }
}

/// Build the next batch of mentions to answer, highest priority first.
///
/// Any feed or record-store failure aborts the run; no partial batch is
/// returned.
pub async fn get_mentions_batch<F, S>(
    feed: &F,
    store: &S,
    rules: &MentionRules,
    since_mention_id: Option<MentionId>,
    options: &BatchOptions,
) -> Result<Batch>
where
    F: MentionFeed + ?Sized,
    S: ProcessedMentionStore + ?Sized,
{
    let mut batch = Batch::resuming_from(since_mention_id);

    let collect_options = CollectOptions {
        debug_ids: options.debug_ids.clone(),
        resolve_all: options.resolve_all,
    };
    BatchCollector::new(feed, &rules.bot_user_id)
        .with_sweep_delay(options.sweep_delay)
        .collect(&mut batch, &collect_options)
        .await?;

    log::info!(
        "Mentions: collected {} raw mention(s), {} user(s), {} referenced tweet(s)",
        batch.mentions.len(),
        batch.users.len(),
        batch.tweets.len()
    );

    MentionValidator::new(rules, options.force_reply).validate_batch(&mut batch);

    if !options.force_reply {
        let mentions = std::mem::take(&mut batch.mentions);
        batch.mentions = filter_processed_mentions(mentions, store).await?;
    }

    prioritize_mentions(&mut batch, rules);
    window_mentions(&mut batch, options.max_batch_size);

    log::info!(
        "Mentions: batch ready with {} mention(s), {} postponed, since_mention_id={:?}",
        batch.mentions.len(),
        batch.num_mentions_postponed,
        batch.since_mention_id.as_ref().map(|id| id.as_str())
    );

    Ok(batch)
}
