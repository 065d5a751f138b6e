//! Drop mentions the bot has already answered.

use crate::db::ProcessedMentionStore;
use crate::error::Result;
use crate::models::Mention;
use futures_util::{stream, StreamExt, TryStreamExt};

/// Concurrent record-store lookups during the duplicate check.
pub const DUPLICATE_CHECK_CONCURRENCY: usize = 8;

/// Keep mentions with no processed record, preserving input order.
///
/// A failed lookup fails the whole check rather than letting the mention
/// through as if it were new.
pub async fn filter_processed_mentions<S>(
    mentions: Vec<Mention>,
    store: &S,
) -> Result<Vec<Mention>>
where
    S: ProcessedMentionStore + ?Sized,
{
    let total = mentions.len();

    let lookups = mentions.into_iter().map(|mention| async move {
        let seen = store.has_record(&mention.id).await?;
        Ok::<_, crate::error::MentionsError>((mention, seen))
    });

    let checked: Vec<(Mention, bool)> = stream::iter(lookups)
        .buffered(DUPLICATE_CHECK_CONCURRENCY)
        .try_collect()
        .await?;

    let kept: Vec<Mention> = checked
        .into_iter()
        .filter_map(|(mention, seen)| {
            if seen {
                log::debug!("Mentions: skipping already processed tweet {}", mention.id);
                None
            } else {
                Some(mention)
            }
        })
        .collect();

    log::info!(
        "Mentions: {} of {} mention(s) not yet answered",
        kept.len(),
        total
    );

    Ok(kept)
}
