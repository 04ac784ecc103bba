use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identity of a conversation thread - the unit of list isolation.
///
/// A forum chat hosts many topics; messages outside any topic carry no
/// thread id, which is normalized to 0 here so every topic has exactly
/// one canonical key. Serialized as `"<chat_id>#<thread_id>"` so it can
/// key JSON objects in the persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TopicKey {
    pub chat_id: i64,
    pub thread_id: i32,
}

impl TopicKey {
    pub fn new(chat_id: i64, thread_id: Option<i32>) -> Self {
        Self {
            chat_id,
            thread_id: thread_id.unwrap_or(0),
        }
    }

    /// Thread id to attach to outbound messages; `None` for the default
    /// thread, where Telegram rejects an explicit id.
    pub fn thread(&self) -> Option<i32> {
        (self.thread_id != 0).then_some(self.thread_id)
    }
}

impl fmt::Display for TopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.chat_id, self.thread_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTopicKeyError(String);

impl fmt::Display for ParseTopicKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed topic key: {:?}", self.0)
    }
}

impl std::error::Error for ParseTopicKeyError {}

impl FromStr for TopicKey {
    type Err = ParseTopicKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (chat, thread) = s
            .split_once('#')
            .ok_or_else(|| ParseTopicKeyError(s.to_string()))?;
        let chat_id = chat
            .parse::<i64>()
            .map_err(|_| ParseTopicKeyError(s.to_string()))?;
        let thread_id = thread
            .parse::<i32>()
            .map_err(|_| ParseTopicKeyError(s.to_string()))?;
        Ok(Self { chat_id, thread_id })
    }
}

impl Serialize for TopicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TopicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}
