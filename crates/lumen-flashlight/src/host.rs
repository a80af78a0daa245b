//! Seams to the game engine hosting the plugin.
//!
//! The plugin never owns engine objects directly. Everything it needs from
//! the world (player poses and input, light entity primitives) goes through
//! [`PlayerSource`] and [`LightWorld`], which the host shell implements.

use std::fmt;
use std::time::Instant;

use glam::Vec3;

use crate::buttons::Buttons;
use crate::light::LightParams;

/// Stable player identity (account id). Survives round transitions,
/// unlike per-round slot indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque reference to an engine entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle(pub u32);

/// Facts the host knows about a connected player's controller and pawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerInfo {
    /// Controller is connected and valid.
    pub connected: bool,
    /// Controlled by the engine's bot logic.
    pub is_bot: bool,
    /// Source TV / observer-only client.
    pub is_hltv: bool,
    /// The player has a valid spawned pawn.
    pub pawn_spawned: bool,
    /// The pawn is alive.
    pub alive: bool,
}

impl PlayerInfo {
    /// A connected human with a live spawned pawn.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.connected && !self.is_bot && !self.is_hltv && self.pawn_spawned && self.alive
    }
}

/// Player transform sampled for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPose {
    /// Absolute origin of the pawn (feet).
    pub origin: Vec3,
    /// Height of the eyes above [`Self::origin`].
    pub view_offset_z: f32,
    /// Body yaw in degrees.
    pub body_yaw: f32,
    /// View angles in degrees: x = pitch, y = yaw, z = roll.
    pub eye_angles: Vec3,
    /// Pawn velocity in world units per second.
    pub velocity: Vec3,
    /// The pawn is ducking.
    pub crouched: bool,
}

impl PlayerPose {
    /// World position of the eyes.
    #[must_use]
    pub fn eye_position(&self) -> Vec3 {
        self.origin + Vec3::new(0.0, 0.0, self.view_offset_z)
    }
}

/// Read access to players.
pub trait PlayerSource {
    /// All connected player identities, in host order.
    fn connected_players(&self) -> Vec<PlayerId>;

    /// Validity facts, or `None` if the player is unknown.
    fn player_info(&self, player: PlayerId) -> Option<PlayerInfo>;

    /// Current pose, or `None` if the pawn is absent.
    fn pose(&self, player: PlayerId) -> Option<PlayerPose>;

    /// Currently held buttons, or `None` if unreadable this tick.
    fn buttons(&self, player: PlayerId) -> Option<Buttons>;

    /// Monotonic clock.
    fn now(&self) -> Instant;

    /// Shorthand for a connected human with a live pawn.
    fn is_valid_player(&self, player: PlayerId) -> bool {
        self.player_info(player).is_some_and(|info| info.is_valid())
    }
}

/// Light entity primitives.
pub trait LightWorld {
    /// Allocate an entity of the given class. `None` if the engine refused.
    fn create_light(&mut self, class: &str) -> Option<EntityHandle>;

    /// Whether the handle still refers to a live entity.
    fn is_light_valid(&self, handle: EntityHandle) -> bool;

    /// Write the static visual parameters.
    fn set_light_params(&mut self, handle: EntityHandle, params: &LightParams);

    /// Enable or disable emission.
    fn set_light_enabled(&mut self, handle: EntityHandle, enabled: bool);

    /// Move the entity. `velocity` is left untouched when `None`.
    fn teleport_light(
        &mut self,
        handle: EntityHandle,
        position: Vec3,
        angles: Vec3,
        velocity: Option<Vec3>,
    );

    /// Remove the entity from the world.
    fn remove_light(&mut self, handle: EntityHandle);

    /// Finalize creation and spawn the entity into the world.
    fn spawn_light(&mut self, handle: EntityHandle);
}

/// Everything the plugin needs from the engine.
pub trait Host: PlayerSource + LightWorld {}

impl<T: PlayerSource + LightWorld> Host for T {}
