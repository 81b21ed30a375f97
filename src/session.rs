//! Per-session memory of the last surfaced match.

use crate::resource::{Resource, ResourceId};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;

/// Identity of the most recent best match, enough to delete it by key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSlot {
    pub resource_id: ResourceId,
    pub category: String,
    pub link: String,
}

impl From<&Resource> for SessionSlot {
    fn from(resource: &Resource) -> Self {
        SessionSlot {
            resource_id: resource.id.clone(),
            category: resource.category.clone(),
            link: resource.link.clone(),
        }
    }
}

/// Slots keyed by session. Nothing here is persisted.
#[derive(Default)]
pub struct SessionState {
    slots: Mutex<HashMap<String, SessionSlot>>,
}

impl SessionState {
    pub fn new() -> SessionState {
        SessionState::default()
    }

    pub fn get(&self, session: &str) -> Option<SessionSlot> {
        self.slots.lock().get(session).cloned()
    }

    /// Overwrites whatever the session held.
    pub fn set(&self, session: &str, slot: SessionSlot) {
        self.slots.lock().insert(session.to_string(), slot);
    }

    /// Fills the slot only when the session has none yet.
    ///
    /// Returns whether the slot was written.
    pub fn set_if_absent(&self, session: &str, slot: SessionSlot) -> bool {
        let mut slots = self.slots.lock();
        if slots.contains_key(session) {
            return false;
        }
        slots.insert(session.to_string(), slot);
        true
    }

    /// Hands out the slot only if it points at `link`, leaving it in place.
    pub fn matching(&self, session: &str, link: &str) -> Option<SessionSlot> {
        self.slots
            .lock()
            .get(session)
            .filter(|slot| slot.link == link)
            .cloned()
    }

    /// Clears the slot if it still refers to `slot.resource_id`.
    pub fn clear_if(&self, session: &str, slot: &SessionSlot) {
        let mut slots = self.slots.lock();
        if slots.get(session).is_some_and(|s| s.resource_id == slot.resource_id) {
            slots.remove(session);
        }
    }
}

#[cfg(test)]
mod session_test {
    use super::*;

    fn slot(link: &str) -> SessionSlot {
        SessionSlot::from(&Resource::new("general", link, "x"))
    }

    #[test]
    fn test_set_overwrites() {
        let state = SessionState::new();
        state.set("alice", slot("http://a.com"));
        state.set("alice", slot("http://b.com"));

        assert_eq!(state.get("alice").unwrap().link, "http://b.com");
    }

    #[test]
    fn test_set_if_absent_keeps_existing() {
        let state = SessionState::new();
        assert!(state.set_if_absent("alice", slot("http://a.com")));
        assert!(!state.set_if_absent("alice", slot("http://b.com")));

        assert_eq!(state.get("alice").unwrap().link, "http://a.com");
    }

    #[test]
    fn test_sessions_are_isolated() {
        let state = SessionState::new();
        state.set("alice", slot("http://a.com"));

        assert!(state.get("bob").is_none());
        assert!(state.matching("bob", "http://a.com").is_none());
    }

    #[test]
    fn test_matching_requires_exact_link() {
        let state = SessionState::new();
        state.set("alice", slot("http://a.com"));

        assert!(state.matching("alice", "http://a.com").is_some());
        assert!(state.matching("alice", "http://a.com/").is_none());
    }

    #[test]
    fn test_clear_if_ignores_replaced_slot() {
        let state = SessionState::new();
        let old = slot("http://a.com");
        state.set("alice", old.clone());
        state.set("alice", slot("http://b.com"));

        state.clear_if("alice", &old);
        assert_eq!(state.get("alice").unwrap().link, "http://b.com");
    }
}
