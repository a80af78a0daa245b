//! Creation, per-tick placement and removal of a session's light entity.

use tracing::{debug, trace};

use crate::host::{Host, LightWorld, PlayerId, PlayerSource};
use crate::light::{AttachedLight, LIGHT_CLASS, LightParams};
use crate::session::PlayerSession;
use crate::transform::TransformResolver;

/// Applies light parameters and transforms through the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttachmentLifecycle {
    pub params: LightParams,
    pub resolver: TransformResolver,
}

impl AttachmentLifecycle {
    #[must_use]
    pub fn new(params: LightParams, resolver: TransformResolver) -> Self {
        Self { params, resolver }
    }

    /// Allocate, configure, place and spawn a light for `player`.
    ///
    /// Returns `true` if the session now owns a light. A refused or invalid
    /// allocation leaves the session off. Any light the session already
    /// owned is released first.
    pub fn create(&self, player: PlayerId, session: &mut PlayerSession, host: &mut impl Host) -> bool {
        Self::destroy(session, host);

        let Some(handle) = host.create_light(LIGHT_CLASS) else {
            debug!(%player, "light allocation refused");
            return false;
        };
        if !host.is_light_valid(handle) {
            debug!(%player, entity = handle.0, "allocated light is invalid");
            return false;
        }

        host.set_light_params(handle, &self.params);
        host.set_light_enabled(handle, true);
        session.light = Some(AttachedLight::new(handle));
        self.update_pose(player, session, host);
        host.spawn_light(handle);

        debug!(%player, entity = handle.0, "flashlight on");
        true
    }

    /// Move the session's light to its owner's current pose.
    ///
    /// No-op when the session has no light or the pose is unavailable. A
    /// stale handle is cleared.
    pub fn update_pose(&self, player: PlayerId, session: &mut PlayerSession, host: &mut impl Host) {
        let Some(light) = &session.light else {
            return;
        };
        let handle = light.handle();
        if !host.is_light_valid(handle) {
            debug!(%player, entity = handle.0, "stale light handle cleared");
            Self::destroy(session, host);
            return;
        }
        let Some(pose) = host.pose(player) else {
            trace!(%player, "pose unavailable, skipping light update");
            return;
        };

        let transform = self.resolver.resolve(&pose);
        host.teleport_light(handle, transform.position, transform.angles, transform.velocity);
    }

    /// Remove the session's light, if any. Idempotent.
    pub fn destroy(session: &mut PlayerSession, world: &mut impl LightWorld) {
        if let Some(light) = session.light.take() {
            light.release(world);
        }
    }

    /// Flip the session's light. Returns the resulting on/off state.
    ///
    /// A light removed behind the plugin's back counts as off, so the
    /// toggle creates a new one.
    pub fn toggle(&self, player: PlayerId, session: &mut PlayerSession, host: &mut impl Host) -> bool {
        if session.light.as_ref().is_some_and(|l| !l.is_valid(&*host)) {
            debug!(%player, "stale light handle cleared before toggle");
            Self::destroy(session, host);
        }
        if session.is_on() {
            Self::destroy(session, host);
            debug!(%player, "flashlight off");
            false
        } else {
            self.create(player, session, host)
        }
    }
}
