use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::intent::{Entities, Intent};

/// One message recorded in a session. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Populated for user turns; `None` for assistant turns.
    #[serde(default)]
    pub intent: Option<Intent>,
    /// Populated for user turns; `None` for assistant turns.
    #[serde(default)]
    pub entities: Option<Entities>,
    /// Populated for assistant turns; empty for user turns.
    #[serde(default)]
    pub source_tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Assistant,
}

/// The conversation-scoped state keyed by an opaque session id. Holds a
/// bounded FIFO of turns and a last-activity timestamp for TTL eviction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub turns: VecDeque<Turn>,
    pub last_activity: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: String) -> Session {
        let now = Utc::now();
        Session {
            id,
            turns: VecDeque::new(),
            last_activity: now,
            created_at: now,
        }
    }

    /// Append a turn, discarding the oldest turn first once `max_turns` is
    /// exceeded. Updates `last_activity`.
    pub fn append(&mut self, turn: Turn, max_turns: usize) {
        self.turns.push_back(turn);
        while self.turns.len() > max_turns {
            self.turns.pop_front();
        }
        self.last_activity = Utc::now();
    }

    pub fn is_expired(&self, ttl: chrono::Duration, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.last_activity) > ttl
    }

    /// The most recent `limit` turns, oldest-first.
    pub fn recent(&self, limit: usize) -> Vec<&Turn> {
        let skip = self.turns.len().saturating_sub(limit);
        self.turns.iter().skip(skip).collect()
    }

    /// The most recent assistant turn, used for cache-key fingerprinting.
    pub fn last_assistant_turn(&self) -> Option<&Turn> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == TurnRole::Assistant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(role: TurnRole) -> Turn {
        Turn {
            role,
            content: "x".into(),
            timestamp: Utc::now(),
            intent: None,
            entities: None,
            source_tags: vec![],
        }
    }

    #[test]
    fn append_discards_oldest_first() {
        let mut s = Session::new("s1".into());
        for _ in 0..5 {
            s.append(turn(TurnRole::User), 3);
        }
        assert_eq!(s.turns.len(), 3);
    }

    #[test]
    fn recent_returns_oldest_first_within_window() {
        let mut s = Session::new("s1".into());
        for _ in 0..5 {
            s.append(turn(TurnRole::User), 20);
        }
        assert_eq!(s.recent(2).len(), 2);
    }
}
