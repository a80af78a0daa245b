//! Command-line argument parsing for the flashlight plugin host.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Lumen command-line arguments.
///
/// CLI values override settings loaded from `flashlight.ron`.
#[derive(Parser, Debug, Clone, Default)]
pub struct CliArgs {
    /// Activation button name ("Inspect", "Scoreboard", "Use", ... or "none").
    #[arg(long)]
    pub button: Option<String>,

    /// Light brightness (0.0 - 1.0).
    #[arg(long)]
    pub brightness: Option<f32>,

    /// Light range in world units.
    #[arg(long)]
    pub range: Option<f32>,

    /// Hide other players' flashlights.
    #[arg(long)]
    pub hide_others: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref button) = args.button {
            self.activation.button = button.clone();
        }
        if let Some(b) = args.brightness {
            self.light.brightness = b;
        }
        if let Some(r) = args.range {
            self.light.range = r;
        }
        if let Some(hide) = args.hide_others {
            self.activation.hide_other_flashlights = hide;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            button: Some("Use".to_string()),
            range: Some(300.0),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.activation.button, "Use");
        assert_eq!(config.light.range, 300.0);
        // Non-overridden fields retain defaults
        assert_eq!(config.light.brightness, 0.75);
        assert!(config.activation.hide_other_flashlights);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from(["lumen", "--hide-others", "false", "--log-level", "debug"]);
        assert_eq!(args.hide_others, Some(false));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }
}
