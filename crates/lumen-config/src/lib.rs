//! Configuration for the Lumen flashlight plugin.
//!
//! Settings persist to disk as a RON file with forward/backward compatible
//! serialization, carry a schema version that is migrated on load, and can
//! be overridden from the command line via clap.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    ActivationConfig, CONFIG_FILE_NAME, CONFIG_VERSION, ColorMode, CommandConfig, Config,
    DebugConfig, LightConfig, OffsetConfig, OffsetMode,
};
pub use error::ConfigError;
