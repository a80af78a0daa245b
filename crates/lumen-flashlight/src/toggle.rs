//! Debounce logic deciding whether an input should flip a flashlight.
//!
//! Two sources can toggle: an explicit command, and the rising edge of the
//! configured activation button. Button edges are gated by
//! [`TOGGLE_COOLDOWN`]; commands are gated only if configured to be.

use std::time::{Duration, Instant};

use crate::session::PlayerSession;

/// Minimum spacing between two toggles of the same flashlight.
pub const TOGGLE_COOLDOWN: Duration = Duration::from_millis(250);

/// What asked for the toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleSource {
    Command,
    Activation,
}

/// Per-session toggle decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleStateMachine {
    pub cooldown: Duration,
    /// Apply [`Self::cooldown`] to explicit commands too.
    pub gate_commands: bool,
}

impl Default for ToggleStateMachine {
    fn default() -> Self {
        Self {
            cooldown: TOGGLE_COOLDOWN,
            gate_commands: false,
        }
    }
}

impl ToggleStateMachine {
    #[must_use]
    pub fn new(gate_commands: bool) -> Self {
        Self {
            gate_commands,
            ..Self::default()
        }
    }

    /// Explicit command. Returns `true` if the flashlight should flip.
    pub fn on_command(&self, session: &mut PlayerSession, now: Instant) -> bool {
        if self.gate_commands && self.cooling_down(session, now) {
            return false;
        }
        Self::record(session, now);
        true
    }

    /// Activation button state for this tick. Returns `true` on an accepted
    /// rising edge.
    ///
    /// A press that lands inside the cooldown stays pending while the button
    /// is held, and fires on the first tick after the cooldown expires.
    pub fn on_input(&self, session: &mut PlayerSession, held: bool, now: Instant) -> bool {
        if !held {
            session.was_activation_held = false;
            return false;
        }
        if session.was_activation_held || self.cooling_down(session, now) {
            return false;
        }
        Self::record(session, now);
        true
    }

    /// Dispatch on source. `held` is ignored for commands.
    pub fn on_event(
        &self,
        source: ToggleSource,
        session: &mut PlayerSession,
        held: bool,
        now: Instant,
    ) -> bool {
        match source {
            ToggleSource::Command => self.on_command(session, now),
            ToggleSource::Activation => self.on_input(session, held, now),
        }
    }

    fn cooling_down(&self, session: &PlayerSession, now: Instant) -> bool {
        session
            .last_toggle
            .is_some_and(|last| now.saturating_duration_since(last) < self.cooldown)
    }

    fn record(session: &mut PlayerSession, now: Instant) {
        session.last_toggle = Some(now);
        session.was_activation_held = true;
    }
}
