//! Tweet ids as opaque decimal strings with a numeric total order.
//!
//! Twitter ids are 64-bit snowflakes and other feeds hand out even larger
//! ones, so ids never go through a native integer. Ordering compares the
//! significant digits by length first and then lexicographically, which is
//! exactly numeric order for unbounded non-negative integers.

use crate::error::MentionsError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MentionId(String);

impl MentionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Digits without leading zeros ("0" stays "0"). Equal ids share this
    /// form, so it is the key used for storage.
    pub fn significant(&self) -> &str {
        let trimmed = self.0.trim_start_matches('0');
        if trimmed.is_empty() {
            "0"
        } else {
            trimmed
        }
    }

    /// The id immediately below this one, or `None` for zero.
    ///
    /// Used to turn an inclusive resume point into the feed's exclusive
    /// `since_id` bound.
    pub fn predecessor(&self) -> Option<MentionId> {
        let digits = self.significant();
        if digits == "0" {
            return None;
        }

        let mut bytes = digits.as_bytes().to_vec();
        for b in bytes.iter_mut().rev() {
            if *b == b'0' {
                *b = b'9';
            } else {
                *b -= 1;
                break;
            }
        }

        let s = String::from_utf8(bytes).unwrap_or_default();
        let s = s.trim_start_matches('0');
        Some(MentionId(if s.is_empty() { "0".to_string() } else { s.to_string() }))
    }
}

/// Larger of the current watermark and a candidate id.
pub fn max_id(current: Option<&MentionId>, candidate: &MentionId) -> MentionId {
    match current {
        Some(c) if c >= candidate => c.clone(),
        _ => candidate.clone(),
    }
}

/// Smaller of the current watermark and a candidate id.
pub fn min_id(current: Option<&MentionId>, candidate: &MentionId) -> MentionId {
    match current {
        Some(c) if c <= candidate => c.clone(),
        _ => candidate.clone(),
    }
}

impl PartialEq for MentionId {
    fn eq(&self, other: &Self) -> bool {
        self.significant() == other.significant()
    }
}

impl Eq for MentionId {}

impl Hash for MentionId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl Ord for MentionId {
    fn cmp(&self, other: &Self) -> Ordering {
        let a = self.significant();
        let b = other.significant();
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    }
}

impl PartialOrd for MentionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for MentionId {
    type Err = MentionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MentionsError::malformed(format!("invalid tweet id '{}'", s)));
        }
        Ok(MentionId(s.to_string()))
    }
}

impl TryFrom<String> for MentionId {
    type Error = MentionsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MentionId> for String {
    fn from(id: MentionId) -> Self {
        id.0
    }
}

impl fmt::Display for MentionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
