//! Per-mention eligibility checks, including one level of reply-chain context.

use super::text::TextNormalizer;
use crate::config::MentionRules;
use crate::models::{Batch, Mention, MentionId, Tweet};
use std::collections::HashMap;

pub struct MentionValidator<'a> {
    rules: &'a MentionRules,
    normalizer: TextNormalizer,
    force_reply: bool,
}

/// What the parent of a reply looks like from the bot's point of view.
struct ParentContext {
    num_mentions: usize,
    is_reply: bool,
}

impl<'a> MentionValidator<'a> {
    pub fn new(rules: &'a MentionRules, force_reply: bool) -> Self {
        Self {
            rules,
            normalizer: TextNormalizer::new(rules),
            force_reply,
        }
    }

    /// Decide whether `mention` deserves a reply.
    ///
    /// Sets `prompt`, `is_reply` and `num_mentions` on the mention and, for
    /// replies, on the parent found in `tweets`. `on_skip` receives the id of
    /// every mention rejected as ignored, not addressed to the bot, or
    /// redundant within its thread, so the high-watermark can move past it.
    pub fn is_valid_mention(
        &self,
        mention: Option<&mut Mention>,
        tweets: &mut HashMap<MentionId, Tweet>,
        on_skip: &mut dyn FnMut(&MentionId),
    ) -> bool {
        let mention = match mention {
            Some(m) => m,
            None => return false,
        };

        if self.rules.is_ignored(&mention.id) {
            log::debug!("Mentions: ignoring {} (in ignore list)", mention.id);
            on_skip(&mention.id);
            return false;
        }

        let prompt = self.normalizer.get_prompt(mention.text());
        let has_prompt = !prompt.is_empty();
        mention.prompt = Some(prompt);
        if !has_prompt {
            log::debug!("Mentions: ignoring {} (empty prompt)", mention.id);
            return false;
        }

        let parent = match mention.replied_to_id().cloned() {
            Some(parent_id) => {
                mention.is_reply = true;
                tweets
                    .get_mut(&parent_id)
                    .map(|parent| self.enrich_parent(parent))
            }
            None => {
                mention.is_reply = false;
                None
            }
        };

        let count = self
            .normalizer
            .num_mentions_in_text(mention.text(), mention.is_reply);
        mention.num_mentions = Some(count.num_mentions);

        let addressed_last = count
            .last_username()
            .map(|u| self.normalizer.is_bot_handle(u))
            .unwrap_or(false);
        let single_direct = count.num_mentions == 1 && !mention.is_reply;

        if count.num_mentions == 0 || !(addressed_last || single_direct) {
            log::debug!(
                "Mentions: ignoring {} (not addressed to bot, mentions={:?})",
                mention.id,
                count.usernames
            );
            on_skip(&mention.id);
            return false;
        }

        if mention.is_reply && !self.force_reply {
            if let Some(parent) = parent {
                let redundant = parent.num_mentions > count.num_mentions
                    || (parent.num_mentions == count.num_mentions && parent.is_reply);
                if redundant {
                    log::debug!(
                        "Mentions: ignoring {} (parent has {} bot mention(s), reply has {})",
                        mention.id,
                        parent.num_mentions,
                        count.num_mentions
                    );
                    on_skip(&mention.id);
                    return false;
                }
            }
        }

        true
    }

    fn enrich_parent(&self, parent: &mut Tweet) -> ParentContext {
        parent.prompt = Some(self.normalizer.get_prompt(parent.text()));
        parent.is_reply = parent.replied_to_id().is_some();

        let count = self
            .normalizer
            .num_mentions_in_text(parent.text(), parent.is_reply);
        parent.num_mentions = Some(count.num_mentions);

        ParentContext {
            num_mentions: count.num_mentions,
            is_reply: parent.is_reply,
        }
    }

    /// Keep only valid mentions, advancing the high-watermark past skipped ones.
    pub fn validate_batch(&self, batch: &mut Batch) {
        let mut mentions = std::mem::take(&mut batch.mentions);
        let mut skipped: Vec<MentionId> = Vec::new();

        mentions.retain_mut(|mention| {
            self.is_valid_mention(Some(mention), &mut batch.tweets, &mut |id: &MentionId| {
                skipped.push(id.clone())
            })
        });

        for id in &skipped {
            batch.advance_since_mention_id(id);
        }

        log::info!(
            "Mentions: {} valid mention(s), {} skipped",
            mentions.len(),
            skipped.len()
        );
        batch.mentions = mentions;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> MentionId {
        s.parse().unwrap()
    }

    fn rules() -> MentionRules {
        MentionRules::new("1", "bot").with_ignored_mention_ids([id("666")])
    }

    fn check(
        rules: &MentionRules,
        force_reply: bool,
        mention: &mut Mention,
        tweets: &mut HashMap<MentionId, Tweet>,
    ) -> (bool, Vec<MentionId>) {
        let validator = MentionValidator::new(rules, force_reply);
        let mut skipped = Vec::new();
        let valid = validator.is_valid_mention(Some(mention), tweets, &mut |id: &MentionId| {
            skipped.push(id.clone())
        });
        (valid, skipped)
    }

    #[test]
    fn test_absent_mention_is_invalid_without_skip() {
        let rules = rules();
        let validator = MentionValidator::new(&rules, false);
        let mut called = false;
        let mut tweets = HashMap::new();
        let mut on_skip = |_: &MentionId| called = true;
        let valid = validator.is_valid_mention(None, &mut tweets, &mut on_skip);
        assert!(!valid);
        assert!(!called);
    }

    #[test]
    fn test_direct_mention_accepted() {
        let rules = rules();
        let mut mention = Tweet::new(id("10"), "@bot hello", "42");
        let (valid, skipped) = check(&rules, false, &mut mention, &mut HashMap::new());
        assert!(valid);
        assert!(skipped.is_empty());
        assert_eq!(mention.prompt.as_deref(), Some("hello"));
        assert!(!mention.is_reply);
        assert_eq!(mention.num_mentions, Some(1));
    }

    #[test]
    fn test_trailing_handle_in_other_casing_leaves_clean_prompt() {
        let rules = MentionRules::new("1", "ChatBot");
        let mut mention = Tweet::new(id("16"), "what do you think @CHATBOT", "42");
        let (valid, _) = check(&rules, false, &mut mention, &mut HashMap::new());
        assert!(valid);
        assert_eq!(mention.num_mentions, Some(1));
        assert_eq!(mention.prompt.as_deref(), Some("what do you think"));
    }

    #[test]
    fn test_ignored_id_rejected_and_skipped() {
        let rules = rules();
        let mut mention = Tweet::new(id("666"), "@bot a perfectly fine question", "42");
        let (valid, skipped) = check(&rules, true, &mut mention, &mut HashMap::new());
        assert!(!valid);
        assert_eq!(skipped, vec![id("666")]);
    }

    #[test]
    fn test_empty_prompt_rejected_without_skip() {
        let rules = rules();
        let mut mention = Tweet::new(id("11"), "@bot https://t.co/xyz", "42");
        let (valid, skipped) = check(&rules, false, &mut mention, &mut HashMap::new());
        assert!(!valid);
        assert!(skipped.is_empty());
        assert_eq!(mention.prompt.as_deref(), Some(""));
    }

    #[test]
    fn test_missing_text_rejected() {
        let rules = rules();
        let mut mention = Tweet::new(id("12"), "", "42");
        mention.text = None;
        let (valid, _) = check(&rules, false, &mut mention, &mut HashMap::new());
        assert!(!valid);
    }

    #[test]
    fn test_bot_not_last_addressee_rejected() {
        let rules = rules();
        // Two bot mentions with someone else addressed last
        let mut mention = Tweet::new(id("13"), "@bot what does @bot think of @alice", "42");
        let (valid, skipped) = check(&rules, false, &mut mention, &mut HashMap::new());
        assert!(!valid);
        assert_eq!(skipped, vec![id("13")]);
    }

    #[test]
    fn test_reply_addressing_someone_else_rejected() {
        let rules = rules();
        let mut mention =
            Tweet::new(id("14"), "@bot @alice you are right", "42").replying_to(id("5"));
        let (valid, skipped) = check(&rules, false, &mut mention, &mut HashMap::new());
        assert!(!valid);
        assert_eq!(skipped, vec![id("14")]);
        assert!(mention.is_reply);
    }

    #[test]
    fn test_reply_with_bot_last_and_unknown_parent_accepted() {
        let rules = rules();
        let mut mention =
            Tweet::new(id("15"), "@alice @bot explain please", "42").replying_to(id("5"));
        let (valid, _) = check(&rules, false, &mut mention, &mut HashMap::new());
        assert!(valid);
        assert!(mention.is_reply);
    }

    #[test]
    fn test_double_mention_reply_to_single_mention_parent_accepted() {
        let rules = rules();
        let mut tweets = HashMap::new();
        tweets.insert(id("20"), Tweet::new(id("20"), "@bot what is love", "7"));

        let mut mention = Tweet::new(id("21"), "@bot @bot thanks", "42").replying_to(id("20"));
        let (valid, skipped) = check(&rules, false, &mut mention, &mut tweets);
        assert!(valid);
        assert!(skipped.is_empty());
        assert_eq!(mention.num_mentions, Some(2));

        let parent = &tweets[&id("20")];
        assert_eq!(parent.num_mentions, Some(1));
        assert_eq!(parent.prompt.as_deref(), Some("what is love"));
        assert!(!parent.is_reply);
    }

    #[test]
    fn test_parent_with_more_mentions_rejects_reply() {
        let rules = rules();
        let mut tweets = HashMap::new();
        tweets.insert(id("30"), Tweet::new(id("30"), "@bot @bot question", "7"));

        let mut mention = Tweet::new(id("31"), "@bot follow-up", "42").replying_to(id("30"));
        let (valid, skipped) = check(&rules, false, &mut mention, &mut tweets);
        assert!(!valid);
        assert_eq!(skipped, vec![id("31")]);
        assert_eq!(tweets[&id("30")].num_mentions, Some(2));
    }

    #[test]
    fn test_equal_mentions_with_reply_parent_rejects() {
        let rules = rules();
        let mut tweets = HashMap::new();
        tweets.insert(
            id("40"),
            Tweet::new(id("40"), "@bot earlier question", "7").replying_to(id("39")),
        );

        let mut mention = Tweet::new(id("41"), "@bot later", "42").replying_to(id("40"));
        let (valid, _) = check(&rules, false, &mut mention, &mut tweets);
        assert!(!valid);
        assert!(tweets[&id("40")].is_reply);
    }

    #[test]
    fn test_force_reply_overrides_chain_check() {
        let rules = rules();
        let mut tweets = HashMap::new();
        tweets.insert(id("30"), Tweet::new(id("30"), "@bot @bot question", "7"));

        let mut mention = Tweet::new(id("31"), "@bot follow-up", "42").replying_to(id("30"));
        let (valid, skipped) = check(&rules, true, &mut mention, &mut tweets);
        assert!(valid);
        assert!(skipped.is_empty());
    }

    #[test]
    fn test_validate_batch_advances_watermark_past_skipped() {
        let rules = rules();
        let mut batch = Batch::resuming_from(Some(id("1")));
        batch.mentions = vec![
            Tweet::new(id("50"), "@bot hi", "42"),
            Tweet::new(id("999"), "@bot then @bot and @alice", "43"),
            Tweet::new(id("51"), "@bot", "44"),
        ];

        MentionValidator::new(&rules, false).validate_batch(&mut batch);

        let ids: Vec<_> = batch.mentions.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["50"]);
        assert_eq!(batch.since_mention_id, Some(id("999")));
    }
}
