//! Per-frame driver: input edge detection and light placement for every
//! valid player.

use tracing::trace;

use crate::attachment::AttachmentLifecycle;
use crate::buttons::ActivationInput;
use crate::host::{Host, PlayerSource};
use crate::session::SessionRegistry;
use crate::toggle::ToggleStateMachine;

/// Counters from one [`TickDriver::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Valid players processed.
    pub players: usize,
    /// Players skipped as bots, observers, dead or unspawned.
    pub skipped: usize,
    /// Accepted activation edges.
    pub toggles: usize,
}

/// Runs once per simulation frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickDriver {
    pub activation: ActivationInput,
    pub toggle: ToggleStateMachine,
    pub lifecycle: AttachmentLifecycle,
}

impl TickDriver {
    #[must_use]
    pub fn new(
        activation: ActivationInput,
        toggle: ToggleStateMachine,
        lifecycle: AttachmentLifecycle,
    ) -> Self {
        Self {
            activation,
            toggle,
            lifecycle,
        }
    }

    /// Process every connected player.
    ///
    /// Invalid players never acquire a session. Unreadable input skips edge
    /// detection for that player this tick; placement still runs.
    pub fn run(&self, registry: &mut SessionRegistry, host: &mut impl Host) -> TickReport {
        let now = host.now();
        let mut report = TickReport::default();

        for player in host.connected_players() {
            if !host.is_valid_player(player) {
                trace!(%player, "skipping invalid player");
                report.skipped += 1;
                continue;
            }
            report.players += 1;
            let session = registry.get_or_create(player);

            if self.activation != ActivationInput::Disabled
                && let Some(buttons) = host.buttons(player)
            {
                let held = self.activation.is_held(buttons);
                if self.toggle.on_input(session, held, now) {
                    self.lifecycle.toggle(player, session, host);
                    report.toggles += 1;
                }
            }

            self.lifecycle.update_pose(player, session, host);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::buttons::Buttons;
    use crate::host::PlayerId;
    use crate::sim::SimHost;

    fn driver(activation: ActivationInput) -> TickDriver {
        TickDriver::new(
            activation,
            ToggleStateMachine::default(),
            AttachmentLifecycle::default(),
        )
    }

    fn cleanup(registry: &mut SessionRegistry, host: &mut SimHost) {
        for (_, mut session) in registry.remove_all() {
            AttachmentLifecycle::destroy(&mut session, host);
        }
    }

    #[test]
    fn test_invalid_players_get_no_session() {
        let mut host = SimHost::new();
        let human = host.add_player(1);
        let bot = host.add_bot(2);
        let dead = host.add_player(3);
        host.kill(dead);
        let mut registry = SessionRegistry::new();

        let report = driver(ActivationInput::Button(Buttons::INSPECT)).run(&mut registry, &mut host);
        assert_eq!(report.players, 1);
        assert_eq!(report.skipped, 2);
        assert!(registry.contains(human));
        assert!(!registry.contains(bot));
        assert!(!registry.contains(dead));
    }

    #[test]
    fn test_held_button_toggles_once_across_ticks() {
        let mut host = SimHost::new();
        let player = host.add_player(1);
        host.set_buttons(player, Buttons::INSPECT);
        let mut registry = SessionRegistry::new();
        let driver = driver(ActivationInput::Button(Buttons::INSPECT));

        let mut toggles = 0;
        for _ in 0..64 {
            toggles += driver.run(&mut registry, &mut host).toggles;
            host.advance(Duration::from_millis(16));
        }
        assert_eq!(toggles, 1);
        assert_eq!(host.live_lights(), 1);

        cleanup(&mut registry, &mut host);
    }

    #[test]
    fn test_disabled_activation_ignores_buttons() {
        let mut host = SimHost::new();
        let player = host.add_player(1);
        host.set_buttons(player, Buttons(u64::MAX));
        let mut registry = SessionRegistry::new();

        let report = driver(ActivationInput::Disabled).run(&mut registry, &mut host);
        assert_eq!(report.toggles, 0);
        assert!(!registry.get(player).unwrap().is_on());
    }

    #[test]
    fn test_light_tracks_player_every_tick() {
        let mut host = SimHost::new();
        let player = host.add_player(1);
        host.set_buttons(player, Buttons::INSPECT);
        let mut registry = SessionRegistry::new();
        let driver = driver(ActivationInput::Button(Buttons::INSPECT));
        driver.run(&mut registry, &mut host);

        host.set_origin(player, glam::Vec3::new(0.0, 100.0, 0.0));
        host.set_body_yaw(player, 90.0);
        driver.run(&mut registry, &mut host);

        let handle = registry.get(PlayerId(1)).unwrap().light.as_ref().unwrap().handle();
        let pos = host.light(handle).unwrap().position.unwrap();
        assert!((pos - glam::Vec3::new(0.0, 125.0, 64.0)).length() < 1e-3);

        cleanup(&mut registry, &mut host);
    }
}
