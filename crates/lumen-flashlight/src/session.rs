//! Per-player flashlight sessions keyed by stable player identity.
//!
//! A session is created the first time a player toggles or is observed by
//! the tick, and erased on death, disconnect or shutdown. Removal hands the
//! session back so the caller can release its light.

use std::collections::HashMap;
use std::time::Instant;

use crate::host::PlayerId;
use crate::light::AttachedLight;

/// Flashlight state for one connected player.
#[derive(Debug, Default)]
pub struct PlayerSession {
    /// The light entity, `None` while the flashlight is off.
    pub light: Option<AttachedLight>,
    /// Time of the last successful toggle, `None` if never toggled.
    pub last_toggle: Option<Instant>,
    /// Activation button was held on the previous tick (edge detector).
    pub was_activation_held: bool,
}

impl PlayerSession {
    /// Whether the flashlight is currently on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.light.is_some()
    }
}

/// Owns every live [`PlayerSession`].
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<PlayerId, PlayerSession>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session for `player`, inserting a default one on first use.
    pub fn get_or_create(&mut self, player: PlayerId) -> &mut PlayerSession {
        self.sessions.entry(player).or_default()
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&PlayerSession> {
        self.sessions.get(&player)
    }

    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut PlayerSession> {
        self.sessions.get_mut(&player)
    }

    /// Erase and return the session for `player`.
    pub fn remove(&mut self, player: PlayerId) -> Option<PlayerSession> {
        self.sessions.remove(&player)
    }

    /// Erase and return every session.
    pub fn remove_all(&mut self) -> Vec<(PlayerId, PlayerSession)> {
        self.sessions.drain().collect()
    }

    /// Iterate sessions (unordered).
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &PlayerSession)> {
        self.sessions.iter().map(|(id, s)| (*id, s))
    }

    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        self.sessions.contains_key(&player)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Number of sessions with a light attached.
    #[must_use]
    pub fn lights_on(&self) -> usize {
        self.sessions.values().filter(|s| s.is_on()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut registry = SessionRegistry::new();
        registry.get_or_create(PlayerId(7)).was_activation_held = true;
        assert!(registry.get_or_create(PlayerId(7)).was_activation_held);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_new_session_is_off() {
        let mut registry = SessionRegistry::new();
        let session = registry.get_or_create(PlayerId(1));
        assert!(!session.is_on());
        assert!(session.last_toggle.is_none());
        assert!(!session.was_activation_held);
    }

    #[test]
    fn test_remove_returns_state() {
        let mut registry = SessionRegistry::new();
        registry.get_or_create(PlayerId(1)).was_activation_held = true;
        let removed = registry.remove(PlayerId(1)).unwrap();
        assert!(removed.was_activation_held);
        assert!(!registry.contains(PlayerId(1)));
        assert!(registry.remove(PlayerId(1)).is_none());
    }

    #[test]
    fn test_remove_all_empties_registry() {
        let mut registry = SessionRegistry::new();
        for id in 1..=3 {
            registry.get_or_create(PlayerId(id));
        }
        let drained = registry.remove_all();
        assert_eq!(drained.len(), 3);
        assert!(registry.is_empty());
    }
}
