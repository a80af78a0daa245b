//! Configuration structs with sensible defaults, RON persistence and
//! schema-version migration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Current configuration schema version. Files carrying any other value are
/// rewritten on load by [`Config::migrate`].
pub const CONFIG_VERSION: u32 = 3;

/// File name of the persisted configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "flashlight.ron";

/// Top-level plugin configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Schema version of the file this config was read from.
    pub config_version: u32,
    /// Static visual parameters and placement of the light.
    pub light: LightConfig,
    /// How toggling is triggered and who sees the light.
    pub activation: ActivationConfig,
    /// Chat/console command aliases.
    pub commands: CommandConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Selects whether the light is tinted by an RGB color or a color temperature.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Use [`LightConfig::color_rgb`].
    #[default]
    Rgb,
    /// Use [`LightConfig::color_temperature`].
    Temperature,
}

/// Visual parameters applied once when a light is created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightConfig {
    /// Outer cone angle in degrees.
    pub outer_angle: f32,
    /// Which of the two color settings is applied.
    pub color_mode: ColorMode,
    /// Hex color, e.g. `"#FFFFFF"`.
    pub color_rgb: String,
    /// Color temperature in Kelvin.
    pub color_temperature: u32,
    /// Brightness on a 0.0 - 1.0 scale.
    pub brightness: f32,
    /// Range in world units.
    pub range: f32,
    /// Engine direct-light mode written to the light entity.
    pub direct_light: u8,
    /// Where the light sits relative to the player.
    pub offset: OffsetConfig,
    /// Forward the player's velocity when teleporting the light.
    pub inherit_velocity: bool,
}

/// Light placement policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum OffsetMode {
    /// Held out in front of the eyes along the body yaw.
    #[default]
    DistanceFromBody,
    /// Mounted above the body origin at a posture-dependent height.
    Posture,
}

/// Light placement settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OffsetConfig {
    /// Active placement policy.
    pub mode: OffsetMode,
    /// Horizontal distance from the eyes in world units (`DistanceFromBody`).
    pub distance_from_body: f32,
    /// Height above the body origin while standing (`Posture`).
    pub standing_height: f32,
    /// Height above the body origin while crouched (`Posture`).
    pub crouched_height: f32,
}

/// Activation input and visibility settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ActivationConfig {
    /// Toggle automatically on the rising edge of [`Self::button`].
    pub detect_button_press: bool,
    /// Button name, e.g. `"Inspect"`, `"Scoreboard"`, `"Use"`, or `"none"`.
    pub button: String,
    /// Redact other players' lights from each player's snapshot.
    pub hide_other_flashlights: bool,
    /// Apply the toggle cooldown to explicit commands as well.
    pub command_cooldown: bool,
}

/// Command registration settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CommandConfig {
    /// Command names that toggle the flashlight.
    pub aliases: Vec<String>,
    /// Prefix prepended to aliases that lack it.
    pub prefix: String,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for Config {
    fn default() -> Self {
        Self {
            config_version: CONFIG_VERSION,
            light: LightConfig::default(),
            activation: ActivationConfig::default(),
            commands: CommandConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            outer_angle: 35.0,
            color_mode: ColorMode::Rgb,
            color_rgb: "#FFFFFF".to_string(),
            color_temperature: 6500,
            brightness: 0.75,
            range: 750.0,
            direct_light: 3,
            offset: OffsetConfig::default(),
            inherit_velocity: false,
        }
    }
}

impl Default for OffsetConfig {
    fn default() -> Self {
        Self {
            mode: OffsetMode::DistanceFromBody,
            distance_from_body: 25.0,
            standing_height: 64.0,
            crouched_height: 46.0,
        }
    }
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            detect_button_press: true,
            button: "Inspect".to_string(),
            hide_other_flashlights: true,
            command_cooldown: false,
        }
    }
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            aliases: vec!["flashlight".to_string(), "fl".to_string()],
            prefix: "css_".to_string(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload / Migrate ---

impl Config {
    /// Platform config directory for the plugin, e.g. `~/.config/lumen`.
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("lumen"))
    }

    /// `explicit` if given, otherwise [`Config::default_dir`].
    pub fn resolve_dir(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
        match explicit {
            Some(dir) => Ok(dir.to_path_buf()),
            None => Self::default_dir().ok_or(ConfigError::NoConfigDir),
        }
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as [`CONFIG_FILE_NAME`].
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let write_err = |source| ConfigError::Write {
            path: config_path.clone(),
            source,
        };

        std::fs::create_dir_all(config_dir).map_err(write_err)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(write_err)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE_NAME))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Bring an older (or newer) file up to [`CONFIG_VERSION`].
    ///
    /// Missing fields were already filled with defaults during parsing, so
    /// migration only stamps the new version and rewrites the file. Returns
    /// `true` if the version changed. A failed write is logged and the
    /// in-memory config stays migrated.
    pub fn migrate(&mut self, config_dir: &Path) -> bool {
        if self.config_version == CONFIG_VERSION {
            log::debug!("Config already at version {CONFIG_VERSION}");
            return false;
        }

        log::info!(
            "Updating config from version {} to {CONFIG_VERSION}",
            self.config_version
        );
        self.config_version = CONFIG_VERSION;

        match self.save(config_dir) {
            Ok(()) => log::info!("Config updated to version {CONFIG_VERSION}"),
            Err(e) => log::error!("Failed to write migrated config: {e}"),
        }
        true
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Clamp out-of-range values in place. Returns one message per fix.
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();
        let light = &mut self.light;

        if !(0.0..=1.0).contains(&light.brightness) {
            let clamped = light.brightness.clamp(0.0, 1.0);
            warnings.push(format!(
                "brightness {} out of range, clamped to {clamped}",
                light.brightness
            ));
            light.brightness = clamped;
        }
        if !(0.0..=180.0).contains(&light.outer_angle) {
            let clamped = light.outer_angle.clamp(0.0, 180.0);
            warnings.push(format!(
                "outer_angle {} out of range, clamped to {clamped}",
                light.outer_angle
            ));
            light.outer_angle = clamped;
        }

        for (name, value) in [
            ("range", &mut light.range),
            ("distance_from_body", &mut light.offset.distance_from_body),
            ("standing_height", &mut light.offset.standing_height),
            ("crouched_height", &mut light.offset.crouched_height),
        ] {
            if *value < 0.0 {
                warnings.push(format!("{name} {value} is negative, using 0"));
                *value = 0.0;
            }
        }

        let before = self.commands.aliases.len();
        self.commands.aliases.retain(|a| !a.trim().is_empty());
        if self.commands.aliases.len() != before {
            warnings.push("empty command aliases removed".to_string());
        }

        for warning in &warnings {
            log::warn!("{warning}");
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("outer_angle: 35.0"));
        assert!(ron_str.contains("button: \"Inspect\""));
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(light: (brightness: 0.5))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.light.brightness, 0.5);
        assert_eq!(config.light.range, 750.0);
        assert_eq!(config.activation, ActivationConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_enum_fields_parse() {
        let ron_str = "(light: (color_mode: Temperature, offset: (mode: Posture)))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.light.color_mode, ColorMode::Temperature);
        assert_eq!(config.light.offset.mode, OffsetMode::Posture);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.light.range = 1200.0;
        config.activation.button = "Scoreboard".to_string();

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());

        let mut modified = config.clone();
        modified.activation.hide_other_flashlights = false;
        modified.save(dir.path()).unwrap();

        let reloaded = config.reload(dir.path()).unwrap().unwrap();
        assert!(!reloaded.activation.hide_other_flashlights);
    }

    #[test]
    fn test_migrate_old_version_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "(config_version: 1, light: (range: 900.0))",
        )
        .unwrap();

        let mut config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config.config_version, 1);
        assert!(config.migrate(dir.path()));
        assert_eq!(config.config_version, CONFIG_VERSION);

        let on_disk = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(on_disk.config_version, CONFIG_VERSION);
        assert_eq!(on_disk.light.range, 900.0);
    }

    #[test]
    fn test_migrate_current_version_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        assert!(!config.migrate(dir.path()));
        assert!(!dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_sanitize_clamps_values() {
        let mut config = Config::default();
        config.light.brightness = 3.0;
        config.light.outer_angle = -10.0;
        config.light.range = -1.0;
        config.commands.aliases.push("  ".to_string());

        let warnings = config.sanitize();
        assert_eq!(warnings.len(), 4);
        assert_eq!(config.light.brightness, 1.0);
        assert_eq!(config.light.outer_angle, 0.0);
        assert_eq!(config.light.range, 0.0);
        assert_eq!(config.commands.aliases, vec!["flashlight", "fl"]);
    }

    #[test]
    fn test_sanitize_default_is_clean() {
        assert!(Config::default().sanitize().is_empty());
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{{not valid}}").unwrap();

        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_resolve_dir_prefers_explicit() {
        let dir = Path::new("/srv/lumen");
        assert_eq!(Config::resolve_dir(Some(dir)).unwrap(), dir);
    }
}
