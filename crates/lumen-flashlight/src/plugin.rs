//! Plugin shell: wires settings, commands, host events and shutdown to the
//! session registry.
//!
//! Every path that ends a session (toggle off, death, disconnect, shutdown)
//! goes through [`AttachmentLifecycle::destroy`], so no light outlives the
//! session that owns it.

use lumen_config::{CommandConfig, Config};
use tracing::{debug, info};

use crate::attachment::AttachmentLifecycle;
use crate::buttons::ActivationInput;
use crate::host::{Host, LightWorld, PlayerId, PlayerSource};
use crate::light::LightParams;
use crate::session::{PlayerSession, SessionRegistry};
use crate::tick::{TickDriver, TickReport};
use crate::toggle::ToggleStateMachine;
use crate::transform::{OffsetPolicy, TransformResolver};
use crate::visibility::{TransmitInfo, VisibilityFilter};

/// Settings resolved once from [`Config`].
#[derive(Debug, Clone, PartialEq)]
pub struct FlashlightSettings {
    pub activation: ActivationInput,
    pub toggle: ToggleStateMachine,
    pub lifecycle: AttachmentLifecycle,
    pub hide_other_flashlights: bool,
    /// Fully prefixed command names.
    pub commands: Vec<String>,
}

impl FlashlightSettings {
    /// Resolve from config. Never fails: bad values fall back with a warning.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let activation = ActivationInput::resolve(
            config.activation.detect_button_press,
            &config.activation.button,
        );
        let resolver = TransformResolver::new(
            OffsetPolicy::from_config(&config.light.offset),
            config.light.inherit_velocity,
        );

        Self {
            activation,
            toggle: ToggleStateMachine::new(config.activation.command_cooldown),
            lifecycle: AttachmentLifecycle::new(LightParams::from_config(&config.light), resolver),
            hide_other_flashlights: config.activation.hide_other_flashlights,
            commands: command_names(&config.commands),
        }
    }

    fn tick_driver(&self) -> TickDriver {
        TickDriver::new(self.activation, self.toggle, self.lifecycle)
    }
}

/// Prefix each alias (unless already prefixed), dropping blanks and duplicates.
#[must_use]
pub fn command_names(config: &CommandConfig) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(config.aliases.len());
    for alias in &config.aliases {
        let alias = alias.trim();
        if alias.is_empty() {
            continue;
        }
        let name = if alias.starts_with(&config.prefix) {
            alias.to_string()
        } else {
            format!("{}{alias}", config.prefix)
        };
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Result of a toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// A light now exists for the player.
    On,
    /// No light exists for the player (including refused allocation).
    Off,
    /// Rejected by the command cooldown; nothing changed.
    CoolingDown,
}

/// Why a command could not run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// Invoked from the server console.
    #[error("command must be run by a player")]
    NoCaller,

    /// Caller is a bot, observer, dead or not spawned.
    #[error("player {0} cannot use a flashlight right now")]
    InvalidPlayer(PlayerId),

    /// Name is not one of the registered aliases.
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
}

/// The flashlight plugin.
#[derive(Debug)]
pub struct FlashlightPlugin {
    settings: FlashlightSettings,
    registry: SessionRegistry,
    visibility: VisibilityFilter,
}

impl FlashlightPlugin {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let settings = FlashlightSettings::from_config(config);
        info!(
            commands = ?settings.commands,
            activation = ?settings.activation,
            hide_others = settings.hide_other_flashlights,
            "flashlight plugin loaded"
        );
        Self {
            settings,
            registry: SessionRegistry::new(),
            visibility: VisibilityFilter,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &FlashlightSettings {
        &self.settings
    }

    #[must_use]
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Command names the host should register.
    #[must_use]
    pub fn command_names(&self) -> &[String] {
        &self.settings.commands
    }

    /// Whether `player` currently has a light.
    #[must_use]
    pub fn is_on(&self, player: PlayerId) -> bool {
        self.registry.get(player).is_some_and(PlayerSession::is_on)
    }

    /// Per-frame callback.
    pub fn on_tick(&mut self, host: &mut impl Host) -> TickReport {
        self.settings.tick_driver().run(&mut self.registry, host)
    }

    /// Explicit toggle from a command.
    pub fn toggle_command(
        &mut self,
        caller: Option<PlayerId>,
        host: &mut impl Host,
    ) -> Result<ToggleOutcome, CommandError> {
        let player = caller.ok_or(CommandError::NoCaller)?;
        if !host.is_valid_player(player) {
            return Err(CommandError::InvalidPlayer(player));
        }

        let now = host.now();
        let session = self.registry.get_or_create(player);
        if !self.settings.toggle.on_command(session, now) {
            debug!(%player, "command toggle suppressed by cooldown");
            return Ok(ToggleOutcome::CoolingDown);
        }

        Ok(if self.settings.lifecycle.toggle(player, session, host) {
            ToggleOutcome::On
        } else {
            ToggleOutcome::Off
        })
    }

    /// Route a named command. Names are matched case-insensitively.
    pub fn dispatch_command(
        &mut self,
        name: &str,
        caller: Option<PlayerId>,
        host: &mut impl Host,
    ) -> Result<ToggleOutcome, CommandError> {
        let known = self
            .settings
            .commands
            .iter()
            .any(|c| c.eq_ignore_ascii_case(name.trim()));
        if !known {
            return Err(CommandError::UnknownCommand(name.to_string()));
        }
        self.toggle_command(caller, host)
    }

    /// Player died: remove the light and erase the session.
    pub fn on_player_death(&mut self, player: PlayerId, world: &mut impl LightWorld) {
        self.end_session(player, world, "death");
    }

    /// Player left: remove the light and erase the session.
    pub fn on_player_disconnect(&mut self, player: PlayerId, world: &mut impl LightWorld) {
        self.end_session(player, world, "disconnect");
    }

    /// Snapshot build callback. No-op unless hiding is enabled.
    pub fn on_check_transmit(&self, infos: &mut [TransmitInfo], world: &impl LightWorld) -> usize {
        if !self.settings.hide_other_flashlights {
            return 0;
        }
        self.visibility.redact_all(&self.registry, infos, world)
    }

    /// Shutdown/unload: remove every light and erase every session.
    /// Returns the number of sessions ended.
    pub fn cleanup_all(&mut self, world: &mut impl LightWorld) -> usize {
        let sessions = self.registry.remove_all();
        let count = sessions.len();
        for (_, mut session) in sessions {
            AttachmentLifecycle::destroy(&mut session, world);
        }
        info!(sessions = count, "flashlight sessions cleaned up");
        count
    }

    /// Apply a reloaded config. Lights already in the world keep the
    /// parameters they were created with.
    pub fn reload(&mut self, config: &Config) {
        self.settings = FlashlightSettings::from_config(config);
        info!("flashlight settings reloaded");
    }

    fn end_session(&mut self, player: PlayerId, world: &mut impl LightWorld, reason: &str) {
        if let Some(mut session) = self.registry.remove(player) {
            AttachmentLifecycle::destroy(&mut session, world);
            debug!(%player, reason, "flashlight session ended");
        }
    }
}
