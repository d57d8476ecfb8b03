//! Process-local conversation session store.
//!
//! Keyed by the opaque `session_id` carried on every request. Each session
//! holds a bounded FIFO of turns; TTL eviction is evaluated lazily on
//! access rather than via a background sweep, the same opportunistic
//! pattern the response cache uses for its own size-bounded eviction.

use std::collections::HashMap;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use parking_lot::RwLock;

use qo_domain::session::{Session, Turn};
use qo_domain::trace::TraceEvent;

pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    max_turns: usize,
    idle_ttl: ChronoDuration,
}

impl SessionStore {
    pub fn new(max_turns: usize, idle_ttl_secs: u64) -> Self {
        SessionStore {
            sessions: RwLock::new(HashMap::new()),
            max_turns,
            idle_ttl: ChronoDuration::seconds(idle_ttl_secs as i64),
        }
    }

    /// Resolve an existing, non-expired session or create a fresh one.
    /// Returns `(session, is_new)`.
    pub fn resolve_or_create(&self, session_id: &str) -> (Session, bool) {
        {
            let sessions = self.sessions.read();
            if let Some(existing) = sessions.get(session_id) {
                if !existing.is_expired(self.idle_ttl, Utc::now()) {
                    return (existing.clone(), false);
                }
            }
        }

        // Either missing or expired: evict (if present) and mint fresh.
        let mut sessions = self.sessions.write();
        if let Some(stale) = sessions.remove(session_id) {
            if stale.is_expired(self.idle_ttl, Utc::now()) {
                TraceEvent::SessionEvicted {
                    session_id: session_id.to_string(),
                    reason: "idle_ttl_exceeded".to_string(),
                }
                .emit();
            }
        }
        let fresh = Session::new(session_id.to_string());
        sessions.insert(session_id.to_string(), fresh.clone());
        (fresh, true)
    }

    /// Append a turn to a session, creating it first if needed.
    pub fn append_turn(&self, session_id: &str, turn: Turn) {
        let mut sessions = self.sessions.write();
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(session_id.to_string()));
        session.append(turn, self.max_turns);
    }

    pub fn get(&self, session_id: &str) -> Option<Session> {
        let sessions = self.sessions.read();
        let session = sessions.get(session_id)?;
        if session.is_expired(self.idle_ttl, Utc::now()) {
            return None;
        }
        Some(session.clone())
    }

    pub fn touch(&self, session_id: &str, now: DateTime<Utc>) {
        let mut sessions = self.sessions.write();
        if let Some(session) = sessions.get_mut(session_id) {
            session.last_activity = now;
        }
    }

    /// List all non-expired sessions, most-recently-active first.
    pub fn list(&self, limit: usize) -> Vec<Session> {
        let now = Utc::now();
        let mut sessions: Vec<Session> = self
            .sessions
            .read()
            .values()
            .filter(|s| !s.is_expired(self.idle_ttl, now))
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        sessions.truncate(limit);
        sessions
    }

    /// Evict every session past its idle TTL. Returns the number evicted.
    pub fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|id, session| {
            let expired = session.is_expired(self.idle_ttl, now);
            if expired {
                TraceEvent::SessionEvicted {
                    session_id: id.clone(),
                    reason: "idle_ttl_exceeded".to_string(),
                }
                .emit();
            }
            !expired
        });
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qo_domain::session::TurnRole;

    fn turn() -> Turn {
        Turn {
            role: TurnRole::User,
            content: "hello".into(),
            timestamp: Utc::now(),
            intent: None,
            entities: None,
            source_tags: vec![],
        }
    }

    #[test]
    fn resolve_or_create_creates_once() {
        let store = SessionStore::new(20, 3600);
        let (_, is_new_first) = store.resolve_or_create("s1");
        let (_, is_new_second) = store.resolve_or_create("s1");
        assert!(is_new_first);
        assert!(!is_new_second);
    }

    #[test]
    fn expired_session_is_recreated() {
        let store = SessionStore::new(20, 0);
        let (first, _) = store.resolve_or_create("s1");
        std::thread::sleep(std::time::Duration::from_millis(5));
        let (second, is_new) = store.resolve_or_create("s1");
        assert!(is_new);
        assert_ne!(first.created_at, second.created_at);
    }

    #[test]
    fn append_turn_respects_max_turns() {
        let store = SessionStore::new(2, 3600);
        for _ in 0..5 {
            store.append_turn("s1", turn());
        }
        let session = store.get("s1").unwrap();
        assert_eq!(session.turns.len(), 2);
    }

    #[test]
    fn list_orders_most_recently_active_first() {
        let store = SessionStore::new(20, 3600);
        store.resolve_or_create("older");
        std::thread::sleep(std::time::Duration::from_millis(5));
        store.resolve_or_create("newer");
        let listed = store.list(10);
        assert_eq!(listed[0].id, "newer");
    }
}
