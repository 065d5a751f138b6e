//! The per-run aggregate threaded through every pipeline stage.

use super::mention_id::{max_id, min_id};
use super::{Includes, Mention, MentionId, Tweet, User};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Default, Serialize)]
pub struct Batch {
    pub mentions: Vec<Mention>,
    pub users: HashMap<String, User>,
    pub tweets: HashMap<MentionId, Tweet>,
    /// Largest mention id seen so far. Only ever moves up.
    pub since_mention_id: Option<MentionId>,
    /// Smallest id among mentions postponed this run. Only ever moves down.
    pub min_since_mention_id: Option<MentionId>,
    pub num_mentions_postponed: usize,
}

impl Batch {
    /// Start a run that resumes after `since_mention_id`.
    pub fn resuming_from(since_mention_id: Option<MentionId>) -> Self {
        Batch {
            since_mention_id,
            ..Default::default()
        }
    }

    pub fn advance_since_mention_id(&mut self, id: &MentionId) {
        self.since_mention_id = Some(max_id(self.since_mention_id.as_ref(), id));
    }

    pub fn lower_min_since_mention_id(&mut self, id: &MentionId) {
        self.min_since_mention_id = Some(min_id(self.min_since_mention_id.as_ref(), id));
    }

    /// Fold a page's expansions into the batch maps. Last write wins per id.
    pub fn merge_includes(&mut self, includes: Includes) {
        for user in includes.users {
            self.users.insert(user.id.clone(), user);
        }
        for tweet in includes.tweets {
            self.tweets.insert(tweet.id.clone(), tweet);
        }
    }

    /// Exclusive `since_id` the next run should start from.
    ///
    /// When mentions were postponed the next run has to fetch them again, so
    /// the bound drops to just below the low-watermark.
    pub fn next_since_mention_id(&self) -> Option<MentionId> {
        match &self.min_since_mention_id {
            Some(min) => min.predecessor(),
            None => self.since_mention_id.clone(),
        }
    }
}
