//! Edit-wizard state machine.
//!
//! A wizard session collects one intended mutation across several
//! interaction turns (action choice, index pick, optional destination or
//! free text) before anything touches the list. Sessions are ephemeral:
//! memory-only, one per topic, overwritten by a new wizard start, and
//! lapsing after an idle TTL.

use std::collections::HashMap;

use crate::topic::TopicKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Replace,
    Delete,
    Insert,
    Move,
}

impl EditAction {
    /// Stable short code used in callback payloads.
    pub fn code(&self) -> &'static str {
        match self {
            EditAction::Replace => "set",
            EditAction::Delete => "del",
            EditAction::Insert => "ins",
            EditAction::Move => "move",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "set" => Some(EditAction::Replace),
            "del" => Some(EditAction::Delete),
            "ins" => Some(EditAction::Insert),
            "move" => Some(EditAction::Move),
            _ => None,
        }
    }

    /// Replace, delete and move need something to operate on; insert is
    /// the only action valid on an empty list.
    pub fn needs_existing_items(&self) -> bool {
        !matches!(self, EditAction::Insert)
    }

    /// Number of index choices to offer for a list of `len` items. Insert
    /// accepts one position past the end, meaning "append".
    pub fn index_choices(&self, len: usize) -> usize {
        match self {
            EditAction::Insert => len + 1,
            _ => len,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardState {
    /// Action chosen, waiting for a bounded index pick.
    ChoosingIndex { action: EditAction },
    /// Replace/insert: index chosen, the next plain message is the payload.
    AwaitingText { action: EditAction, index: usize },
    /// Move: source chosen, waiting for the destination pick.
    AwaitingDestination { from: usize },
}

#[derive(Debug, Clone)]
struct WizardSession {
    state: WizardState,
    expires_at: u64,
}

/// Topic-keyed table of in-progress wizard sessions. Absence means Idle.
#[derive(Debug)]
pub struct WizardTable {
    sessions: HashMap<TopicKey, WizardSession>,
    ttl_secs: u64,
}

impl WizardTable {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: HashMap::new(),
            ttl_secs,
        }
    }

    /// Start a session for `action`, silently abandoning any prior
    /// incomplete session for the topic.
    pub fn start(&mut self, topic: TopicKey, action: EditAction) {
        self.set(topic, WizardState::ChoosingIndex { action });
    }

    pub fn set(&mut self, topic: TopicKey, state: WizardState) {
        self.sessions.insert(
            topic,
            WizardSession {
                state,
                expires_at: now_ts() + self.ttl_secs,
            },
        );
    }

    /// Remove and return the session state; an expired session counts
    /// as absent.
    pub fn take(&mut self, topic: TopicKey) -> Option<WizardState> {
        let session = self.sessions.remove(&topic)?;
        (session.expires_at > now_ts()).then_some(session.state)
    }

    /// Consume the session only if it awaits free text, returning the
    /// pending (action, index). Any other state is left in place so a
    /// plain message during an index pick is treated as a normal append.
    pub fn take_awaiting_text(&mut self, topic: TopicKey) -> Option<(EditAction, usize)> {
        match self.peek(topic) {
            Some(WizardState::AwaitingText { .. }) => {}
            _ => return None,
        }
        match self.sessions.remove(&topic)?.state {
            WizardState::AwaitingText { action, index } => Some((action, index)),
            _ => None,
        }
    }

    pub fn cancel(&mut self, topic: TopicKey) {
        self.sessions.remove(&topic);
    }

    fn peek(&mut self, topic: TopicKey) -> Option<&WizardState> {
        if let Some(session) = self.sessions.get(&topic) {
            if session.expires_at <= now_ts() {
                self.sessions.remove(&topic);
                return None;
            }
        }
        self.sessions.get(&topic).map(|s| &s.state)
    }
}

fn now_ts() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
