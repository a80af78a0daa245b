//! Static light parameters and the owned light handle.

use lumen_config::{ColorMode, LightConfig};
use tracing::{debug, warn};

use crate::host::{EntityHandle, LightWorld};

/// Engine entity class allocated for every flashlight.
pub const LIGHT_CLASS: &str = "light_omni2";

/// 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl LightColor {
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`, `RRGGBB` or `#RGB`.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return None;
        }
        match digits.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
                Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
            }
            3 => {
                let channel = |i: usize| {
                    u8::from_str_radix(&digits[i..=i], 16)
                        .ok()
                        .map(|v| v * 17)
                };
                Some(Self::new(channel(0)?, channel(1)?, channel(2)?))
            }
            _ => None,
        }
    }
}

/// How the light is tinted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightTint {
    Rgb(LightColor),
    /// Color temperature in Kelvin.
    Temperature(u32),
}

/// Parameters written once when a light entity is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightParams {
    /// Outer cone angle in degrees.
    pub outer_angle: f32,
    pub tint: LightTint,
    /// 0.0 - 1.0.
    pub brightness: f32,
    /// World units.
    pub range: f32,
    /// Engine direct-light mode.
    pub direct_light: u8,
}

impl LightParams {
    /// Resolve from config. An unparsable RGB string falls back to white.
    #[must_use]
    pub fn from_config(config: &LightConfig) -> Self {
        let tint = match config.color_mode {
            ColorMode::Temperature => LightTint::Temperature(config.color_temperature),
            ColorMode::Rgb => match LightColor::from_hex(&config.color_rgb) {
                Some(color) => LightTint::Rgb(color),
                None => {
                    warn!("Invalid color '{}', falling back to white", config.color_rgb);
                    LightTint::Rgb(LightColor::WHITE)
                }
            },
        };

        Self {
            outer_angle: config.outer_angle,
            tint,
            brightness: config.brightness,
            range: config.range,
            direct_light: config.direct_light,
        }
    }
}

impl Default for LightParams {
    fn default() -> Self {
        Self::from_config(&LightConfig::default())
    }
}

// ── AttachedLight ───────────────────────────────────────────────────

/// Exclusive ownership of one light entity in the world.
///
/// The entity is removed by [`AttachedLight::release`], which consumes the
/// value so removal happens at most once. Dropping without releasing leaves
/// the entity in the world and is reported as a warning.
#[derive(Debug)]
pub struct AttachedLight {
    handle: EntityHandle,
    released: bool,
}

impl AttachedLight {
    pub(crate) fn new(handle: EntityHandle) -> Self {
        Self {
            handle,
            released: false,
        }
    }

    /// The owned entity.
    #[must_use]
    pub fn handle(&self) -> EntityHandle {
        self.handle
    }

    /// Whether the host still knows the entity.
    pub fn is_valid(&self, world: &impl LightWorld) -> bool {
        world.is_light_valid(self.handle)
    }

    /// Remove the entity from the world if it is still valid.
    pub fn release(mut self, world: &mut impl LightWorld) {
        self.released = true;
        if world.is_light_valid(self.handle) {
            world.remove_light(self.handle);
            debug!(entity = self.handle.0, "light removed");
        } else {
            debug!(entity = self.handle.0, "light already gone");
        }
    }
}

impl Drop for AttachedLight {
    fn drop(&mut self) {
        if !self.released {
            warn!(entity = self.handle.0, "light dropped without release");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(LightColor::from_hex("#FFFFFF"), Some(LightColor::WHITE));
        assert_eq!(
            LightColor::from_hex("ff8000"),
            Some(LightColor::new(255, 128, 0))
        );
        assert_eq!(LightColor::from_hex("#f00"), Some(LightColor::new(255, 0, 0)));
        assert_eq!(LightColor::from_hex("#GGGGGG"), None);
        assert_eq!(LightColor::from_hex("#12345"), None);
    }

    #[test]
    fn test_params_from_default_config() {
        let params = LightParams::default();
        assert_eq!(params.outer_angle, 35.0);
        assert_eq!(params.tint, LightTint::Rgb(LightColor::WHITE));
        assert_eq!(params.brightness, 0.75);
        assert_eq!(params.range, 750.0);
        assert_eq!(params.direct_light, 3);
    }

    #[test]
    fn test_temperature_mode_ignores_rgb() {
        let config = LightConfig {
            color_mode: ColorMode::Temperature,
            color_rgb: "garbage".to_string(),
            color_temperature: 3200,
            ..LightConfig::default()
        };
        assert_eq!(
            LightParams::from_config(&config).tint,
            LightTint::Temperature(3200)
        );
    }

    #[test]
    fn test_invalid_rgb_falls_back_to_white() {
        let config = LightConfig {
            color_rgb: "not a color".to_string(),
            ..LightConfig::default()
        };
        assert_eq!(
            LightParams::from_config(&config).tint,
            LightTint::Rgb(LightColor::WHITE)
        );
    }
}
