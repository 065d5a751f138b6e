//! Prompt extraction and leading-mention analysis.

use crate::config::MentionRules;
use once_cell::sync::Lazy;
use regex::Regex;

/// Leading mentions stripped from a prompt. Longer chains keep their tail.
const MAX_LEADING_MENTIONS_STRIPPED: usize = 4;

static LEADING_MENTION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*@[a-zA-Z0-9_]+").unwrap());

static LEADING_COMMA_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*,\s*").unwrap());

/// Scheme links and bare `www.` links. Schemeless domains are left alone.
static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)\S+").unwrap());

/// Run of `@handle` tokens at the very start of a tweet (reply auto-prefix).
static MENTION_PREFIX_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(@[a-zA-Z0-9_]+\b\s*)+").unwrap());

static USERNAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"@[a-zA-Z0-9_]+\b").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentionCount {
    /// How many of `usernames` are the bot.
    pub num_mentions: usize,
    /// Lower-cased `@handle` tokens in the order they appear.
    pub usernames: Vec<String>,
}

impl MentionCount {
    pub fn last_username(&self) -> Option<&str> {
        self.usernames.last().map(|s| s.as_str())
    }
}

pub struct TextNormalizer {
    bot_handle_lower: String,
    bot_handle_pattern: Regex,
}

impl TextNormalizer {
    pub fn new(rules: &MentionRules) -> Self {
        // Matched in any casing, the same way mentions are counted
        let pattern = format!(r"(?i){}\b", regex::escape(&rules.bot_handle));
        let bot_handle_pattern = Regex::new(&pattern).expect("escaped handle is a valid pattern");

        Self {
            bot_handle_lower: rules.bot_handle_lower.clone(),
            bot_handle_pattern,
        }
    }

    /// Text worth answering: bot handles, leading @mentions and links removed.
    pub fn get_prompt(&self, text: &str) -> String {
        let mut prompt = self.bot_handle_pattern.replace_all(text, "").trim().to_string();

        for _ in 0..MAX_LEADING_MENTIONS_STRIPPED {
            prompt = LEADING_MENTION_PATTERN.replace(&prompt, "").trim().to_string();
        }

        prompt = URL_PATTERN.replace_all(&prompt, "").trim().to_string();
        LEADING_COMMA_PATTERN.replace(&prompt, "").trim().to_string()
    }

    /// Count bot mentions, either in the leading `@handle` run (replies,
    /// where Twitter prefixes the thread participants) or in the whole text.
    pub fn num_mentions_in_text(&self, text: &str, is_reply: bool) -> MentionCount {
        let prefix = if is_reply {
            MENTION_PREFIX_PATTERN.find(text).map(|m| m.as_str())
        } else {
            Some(text)
        };

        let prefix = match prefix {
            Some(p) if !p.is_empty() => p,
            _ => return MentionCount::default(),
        };

        let usernames: Vec<String> = USERNAME_PATTERN
            .find_iter(prefix)
            .map(|m| m.as_str().trim().to_lowercase().replace(',', ""))
            .collect();

        let num_mentions = usernames
            .iter()
            .filter(|u| **u == self.bot_handle_lower)
            .count();

        MentionCount {
            num_mentions,
            usernames,
        }
    }

    pub fn is_bot_handle(&self, username: &str) -> bool {
        username == self.bot_handle_lower
    }
}
