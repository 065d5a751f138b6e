//! Cap a prioritized batch and remember what was pushed to a later run.

use crate::models::{Batch, MentionId};

/// Keep the first `max_batch_size` mentions. Everything past the cap is
/// postponed and pulls the low-watermark down to its id.
pub fn window_mentions(batch: &mut Batch, max_batch_size: usize) {
    let total = batch.mentions.len();

    if total > max_batch_size {
        let postponed: Vec<MentionId> = batch
            .mentions
            .drain(max_batch_size..)
            .map(|m| m.id)
            .collect();

        for id in &postponed {
            batch.lower_min_since_mention_id(id);
        }
    }

    batch.num_mentions_postponed = total.saturating_sub(max_batch_size);

    if batch.num_mentions_postponed > 0 {
        log::info!(
            "Mentions: postponing {} mention(s), min_since_mention_id={:?}",
            batch.num_mentions_postponed,
            batch.min_since_mention_id.as_ref().map(|id| id.as_str())
        );
    }
}
