//! In-memory [`Host`](crate::host::Host) for tests and the demo binary.
//!
//! Players are plain records with a pose, held buttons and validity flags.
//! Light entities record every parameter and transform written to them.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use glam::Vec3;

use crate::buttons::Buttons;
use crate::host::{EntityHandle, LightWorld, PlayerId, PlayerInfo, PlayerPose, PlayerSource};
use crate::light::LightParams;

/// Eye height above the origin while standing.
pub const STANDING_VIEW_OFFSET: f32 = 64.0;
/// Eye height above the origin while crouched.
pub const CROUCHED_VIEW_OFFSET: f32 = 46.0;

/// A simulated player.
#[derive(Debug, Clone, PartialEq)]
pub struct SimPlayer {
    pub info: PlayerInfo,
    pub pose: PlayerPose,
    pub buttons: Buttons,
}

impl SimPlayer {
    fn human() -> Self {
        Self {
            info: PlayerInfo {
                connected: true,
                is_bot: false,
                is_hltv: false,
                pawn_spawned: true,
                alive: true,
            },
            pose: PlayerPose {
                origin: Vec3::ZERO,
                view_offset_z: STANDING_VIEW_OFFSET,
                body_yaw: 0.0,
                eye_angles: Vec3::ZERO,
                velocity: Vec3::ZERO,
                crouched: false,
            },
            buttons: Buttons::NONE,
        }
    }
}

/// A simulated light entity.
#[derive(Debug, Clone, PartialEq)]
pub struct SimLight {
    pub class: String,
    pub params: Option<LightParams>,
    pub enabled: bool,
    pub spawned: bool,
    pub position: Option<Vec3>,
    pub angles: Vec3,
    pub velocity: Option<Vec3>,
    /// A teleport happened before `spawn_light`.
    pub teleported_before_spawn: bool,
}

/// Simulated engine.
#[derive(Debug)]
pub struct SimHost {
    players: BTreeMap<PlayerId, SimPlayer>,
    lights: HashMap<EntityHandle, SimLight>,
    next_entity: u32,
    now: Instant,
    fail_next_create: bool,
    invalid_next_create: bool,
    removals: usize,
    spawn_calls: usize,
}

impl Default for SimHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SimHost {
    #[must_use]
    pub fn new() -> Self {
        Self {
            players: BTreeMap::new(),
            lights: HashMap::new(),
            next_entity: 1,
            now: Instant::now(),
            fail_next_create: false,
            invalid_next_create: false,
            removals: 0,
            spawn_calls: 0,
        }
    }

    // --- players ---

    /// Connect a human player with a live pawn at the origin.
    pub fn add_player(&mut self, id: u64) -> PlayerId {
        let player = PlayerId(id);
        self.players.insert(player, SimPlayer::human());
        player
    }

    /// Connect a bot.
    pub fn add_bot(&mut self, id: u64) -> PlayerId {
        let player = self.add_player(id);
        self.with_player(player, |p| p.info.is_bot = true);
        player
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> Option<&SimPlayer> {
        self.players.get(&player)
    }

    pub fn set_buttons(&mut self, player: PlayerId, buttons: Buttons) {
        self.with_player(player, |p| p.buttons = buttons);
    }

    pub fn set_origin(&mut self, player: PlayerId, origin: Vec3) {
        self.with_player(player, |p| p.pose.origin = origin);
    }

    /// Sets body yaw and view yaw together.
    pub fn set_body_yaw(&mut self, player: PlayerId, yaw: f32) {
        self.with_player(player, |p| {
            p.pose.body_yaw = yaw;
            p.pose.eye_angles.y = yaw;
        });
    }

    pub fn set_velocity(&mut self, player: PlayerId, velocity: Vec3) {
        self.with_player(player, |p| p.pose.velocity = velocity);
    }

    /// Duck or stand; the eye height follows.
    pub fn set_crouched(&mut self, player: PlayerId, crouched: bool) {
        self.with_player(player, |p| {
            p.pose.crouched = crouched;
            p.pose.view_offset_z = if crouched {
                CROUCHED_VIEW_OFFSET
            } else {
                STANDING_VIEW_OFFSET
            };
        });
    }

    pub fn kill(&mut self, player: PlayerId) {
        self.with_player(player, |p| p.info.alive = false);
    }

    pub fn respawn(&mut self, player: PlayerId) {
        self.with_player(player, |p| {
            p.info.alive = true;
            p.info.pawn_spawned = true;
        });
    }

    /// Keep the controller but drop its pawn.
    pub fn despawn_pawn(&mut self, player: PlayerId) {
        self.with_player(player, |p| p.info.pawn_spawned = false);
    }

    pub fn disconnect(&mut self, player: PlayerId) {
        self.players.remove(&player);
    }

    // --- clock ---

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    // --- lights ---

    /// Make the next `create_light` fail.
    pub fn fail_next_create(&mut self) {
        self.fail_next_create = true;
    }

    /// Make the next `create_light` return a handle that is already invalid.
    pub fn invalid_next_create(&mut self) {
        self.invalid_next_create = true;
    }

    /// Delete an entity behind the plugin's back.
    pub fn remove_externally(&mut self, handle: EntityHandle) {
        self.lights.remove(&handle);
    }

    #[must_use]
    pub fn light(&self, handle: EntityHandle) -> Option<&SimLight> {
        self.lights.get(&handle)
    }

    /// Handles of every live light.
    #[must_use]
    pub fn light_handles(&self) -> Vec<EntityHandle> {
        self.lights.keys().copied().collect()
    }

    #[must_use]
    pub fn live_lights(&self) -> usize {
        self.lights.len()
    }

    /// Number of `remove_light` calls that removed an entity.
    #[must_use]
    pub fn removals(&self) -> usize {
        self.removals
    }

    /// Number of `spawn_light` calls, valid handle or not.
    #[must_use]
    pub fn spawn_calls(&self) -> usize {
        self.spawn_calls
    }

    fn with_player(&mut self, player: PlayerId, f: impl FnOnce(&mut SimPlayer)) {
        if let Some(p) = self.players.get_mut(&player) {
            f(p);
        }
    }
}

impl PlayerSource for SimHost {
    fn connected_players(&self) -> Vec<PlayerId> {
        self.players.keys().copied().collect()
    }

    fn player_info(&self, player: PlayerId) -> Option<PlayerInfo> {
        self.players.get(&player).map(|p| p.info)
    }

    fn pose(&self, player: PlayerId) -> Option<PlayerPose> {
        self.players
            .get(&player)
            .filter(|p| p.info.pawn_spawned)
            .map(|p| p.pose)
    }

    fn buttons(&self, player: PlayerId) -> Option<Buttons> {
        self.players
            .get(&player)
            .filter(|p| p.info.pawn_spawned)
            .map(|p| p.buttons)
    }

    fn now(&self) -> Instant {
        self.now
    }
}

impl LightWorld for SimHost {
    fn create_light(&mut self, class: &str) -> Option<EntityHandle> {
        if std::mem::take(&mut self.fail_next_create) {
            return None;
        }
        let handle = EntityHandle(self.next_entity);
        self.next_entity += 1;
        if std::mem::take(&mut self.invalid_next_create) {
            return Some(handle);
        }
        self.lights.insert(
            handle,
            SimLight {
                class: class.to_string(),
                params: None,
                enabled: false,
                spawned: false,
                position: None,
                angles: Vec3::ZERO,
                velocity: None,
                teleported_before_spawn: false,
            },
        );
        Some(handle)
    }

    fn is_light_valid(&self, handle: EntityHandle) -> bool {
        self.lights.contains_key(&handle)
    }

    fn set_light_params(&mut self, handle: EntityHandle, params: &LightParams) {
        if let Some(light) = self.lights.get_mut(&handle) {
            light.params = Some(*params);
        }
    }

    fn set_light_enabled(&mut self, handle: EntityHandle, enabled: bool) {
        if let Some(light) = self.lights.get_mut(&handle) {
            light.enabled = enabled;
        }
    }

    fn teleport_light(
        &mut self,
        handle: EntityHandle,
        position: Vec3,
        angles: Vec3,
        velocity: Option<Vec3>,
    ) {
        if let Some(light) = self.lights.get_mut(&handle) {
            light.position = Some(position);
            light.angles = angles;
            if velocity.is_some() {
                light.velocity = velocity;
            }
            if !light.spawned {
                light.teleported_before_spawn = true;
            }
        }
    }

    fn remove_light(&mut self, handle: EntityHandle) {
        if self.lights.remove(&handle).is_some() {
            self.removals += 1;
        }
    }

    fn spawn_light(&mut self, handle: EntityHandle) {
        self.spawn_calls += 1;
        if let Some(light) = self.lights.get_mut(&handle) {
            light.spawned = true;
        }
    }
}
