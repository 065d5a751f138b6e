//! Priority scoring for validated mentions.

use crate::config::MentionRules;
use crate::models::{Batch, Mention, User};
use std::collections::HashMap;

/// Top-level mentions are preferred over replies.
pub const REPLY_PENALTY: f64 = 5.0;

/// Priority-set authors outrank everyone else.
pub const PRIORITY_USER_BONUS: f64 = 10_000.0;

/// Followers per point of score.
pub const FOLLOWERS_PER_POINT: f64 = 1000.0;

/// Score of the mention at `index` among `total` candidates sorted oldest-first.
pub fn score_mention(index: usize, total: usize, mention: &Mention, rules: &MentionRules) -> f64 {
    let mut score = if total == 0 {
        0.0
    } else {
        (total - index) as f64 / total as f64
    };

    if mention.is_reply {
        score -= REPLY_PENALTY;
    }

    if rules.is_priority_user(mention.author_id.as_deref()) {
        score += PRIORITY_USER_BONUS;
    }

    if let Some(followers) = mention.num_followers {
        score += followers as f64 / FOLLOWERS_PER_POINT;
    }

    score
}

/// Attach follower count and a link to the original tweet from the user map.
fn enrich_from_author(mention: &mut Mention, users: &HashMap<String, User>) {
    let author = match mention.author_id.as_deref().and_then(|id| users.get(id)) {
        Some(user) => user,
        None => return,
    };

    mention.num_followers = author.followers_count();
    mention.prompt_url = Some(format!(
        "https://twitter.com/{}/status/{}",
        author.username, mention.id
    ));
}

/// Score every mention and order the batch highest score first.
///
/// Mentions are put in id order (oldest first) before scoring so older
/// ones win ties; the final sort is stable.
pub fn prioritize_mentions(batch: &mut Batch, rules: &MentionRules) {
    batch.mentions.sort_by(|a, b| a.id.cmp(&b.id));

    let total = batch.mentions.len();
    for (index, mention) in batch.mentions.iter_mut().enumerate() {
        enrich_from_author(mention, &batch.users);
        mention.priority_score = Some(score_mention(index, total, mention, rules));
    }

    let score = |m: &Mention| m.priority_score.unwrap_or(f64::MIN);
    batch.mentions.sort_by(|a, b| score(b).total_cmp(&score(a)));
}
