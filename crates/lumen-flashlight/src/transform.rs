//! Target pose of a player's light, recomputed every tick.

use glam::Vec3;
use lumen_config::{OffsetConfig, OffsetMode};

use crate::host::PlayerPose;

/// Where the light sits relative to its owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OffsetPolicy {
    /// Eye height, pushed `distance` units out along the body yaw.
    DistanceFromBody { distance: f32 },
    /// Directly above the body origin at a posture-dependent height.
    Posture {
        standing_height: f32,
        crouched_height: f32,
    },
}

impl OffsetPolicy {
    #[must_use]
    pub fn from_config(config: &OffsetConfig) -> Self {
        match config.mode {
            OffsetMode::DistanceFromBody => Self::DistanceFromBody {
                distance: config.distance_from_body,
            },
            OffsetMode::Posture => Self::Posture {
                standing_height: config.standing_height,
                crouched_height: config.crouched_height,
            },
        }
    }
}

impl Default for OffsetPolicy {
    fn default() -> Self {
        Self::from_config(&OffsetConfig::default())
    }
}

/// Resolved world transform for a light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightTransform {
    pub position: Vec3,
    /// Degrees: pitch, yaw, roll. Always the owner's view angles.
    pub angles: Vec3,
    /// Owner velocity, forwarded only when configured.
    pub velocity: Option<Vec3>,
}

/// Horizontal displacement of `distance` along `yaw_degrees`.
#[must_use]
pub fn direction_offset(yaw_degrees: f32, distance: f32) -> Vec3 {
    let yaw = yaw_degrees.to_radians();
    Vec3::new(distance * yaw.cos(), distance * yaw.sin(), 0.0)
}

/// Computes light transforms from player poses.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformResolver {
    pub policy: OffsetPolicy,
    pub inherit_velocity: bool,
}

impl TransformResolver {
    #[must_use]
    pub fn new(policy: OffsetPolicy, inherit_velocity: bool) -> Self {
        Self {
            policy,
            inherit_velocity,
        }
    }

    /// Target transform for the given pose.
    #[must_use]
    pub fn resolve(&self, pose: &PlayerPose) -> LightTransform {
        let position = match self.policy {
            OffsetPolicy::DistanceFromBody { distance } if distance > 0.0 => {
                pose.eye_position() + direction_offset(pose.body_yaw, distance)
            }
            OffsetPolicy::DistanceFromBody { .. } => pose.eye_position(),
            OffsetPolicy::Posture {
                standing_height,
                crouched_height,
            } => {
                let height = if pose.crouched {
                    crouched_height
                } else {
                    standing_height
                };
                pose.origin + Vec3::new(0.0, 0.0, height)
            }
        };

        LightTransform {
            position,
            angles: pose.eye_angles,
            velocity: self.inherit_velocity.then_some(pose.velocity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn held_out(distance: f32) -> TransformResolver {
        TransformResolver::new(OffsetPolicy::DistanceFromBody { distance }, false)
    }

    fn pose(body_yaw: f32, crouched: bool) -> PlayerPose {
        PlayerPose {
            origin: Vec3::new(100.0, 200.0, 0.0),
            view_offset_z: 64.0,
            body_yaw,
            eye_angles: Vec3::new(10.0, body_yaw, 0.0),
            velocity: Vec3::new(250.0, 0.0, 0.0),
            crouched,
        }
    }

    #[test]
    fn test_distance_offset_along_yaw() {
        let resolver = held_out(25.0);

        let east = resolver.resolve(&pose(0.0, false));
        assert!((east.position - Vec3::new(125.0, 200.0, 64.0)).length() < EPSILON);

        let north = resolver.resolve(&pose(90.0, false));
        assert!((north.position - Vec3::new(100.0, 225.0, 64.0)).length() < EPSILON);
    }

    #[test]
    fn test_distance_keeps_eye_height_when_crouched() {
        let resolver = held_out(25.0);
        let mut crouched = pose(0.0, true);
        crouched.view_offset_z = 46.0;
        assert!((resolver.resolve(&crouched).position.z - 46.0).abs() < EPSILON);
    }

    #[test]
    fn test_zero_distance_sits_at_eyes() {
        let resolver = held_out(0.0);
        let p = pose(45.0, false);
        assert_eq!(resolver.resolve(&p).position, p.eye_position());
    }

    #[test]
    fn test_posture_heights() {
        let resolver = TransformResolver::new(
            OffsetPolicy::Posture {
                standing_height: 64.0,
                crouched_height: 46.0,
            },
            false,
        );
        let standing = resolver.resolve(&pose(30.0, false));
        let crouched = resolver.resolve(&pose(30.0, true));
        assert_eq!(standing.position, Vec3::new(100.0, 200.0, 64.0));
        assert_eq!(crouched.position, Vec3::new(100.0, 200.0, 46.0));
    }

    #[test]
    fn test_orientation_follows_view_angles() {
        let resolver = TransformResolver::default();
        let p = pose(135.0, false);
        assert_eq!(resolver.resolve(&p).angles, p.eye_angles);
    }

    #[test]
    fn test_velocity_only_when_inherited() {
        let p = pose(0.0, false);
        assert_eq!(TransformResolver::default().resolve(&p).velocity, None);
        let inheriting = TransformResolver::new(OffsetPolicy::default(), true);
        assert_eq!(inheriting.resolve(&p).velocity, Some(p.velocity));
    }
}
