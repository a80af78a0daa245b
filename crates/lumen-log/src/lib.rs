//! Structured logging for the Lumen flashlight plugin.
//!
//! The plugin runs inside a host process that may already own the global
//! `tracing` subscriber, so installation is fallible instead of panicking.
//! A bare level from `debug.log_level` applies to the plugin's own crates
//! only; everything else stays at `warn`. `RUST_LOG` overrides both.

use std::path::{Path, PathBuf};

use lumen_config::Config;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose events follow the configured level.
pub const PLUGIN_TARGETS: &[&str] = &["lumen_flashlight", "lumen_config", "lumen_demo"];

/// Level used when the config does not provide one.
pub const DEFAULT_LEVEL: &str = "info";

/// File written inside the log directory in debug builds.
pub const LOG_FILE_NAME: &str = "lumen.log";

/// What [`init_logging`] installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSetup {
    /// Filter directives in effect, unless `RUST_LOG` replaced them.
    pub filter: String,
    /// JSON log file, if one was opened.
    pub log_file: Option<PathBuf>,
}

/// Install the global tracing subscriber.
///
/// * `log_dir` - Directory for the JSON log file (debug builds only)
/// * `debug_build` - Whether to also write [`LOG_FILE_NAME`]
/// * `config` - Supplies `debug.log_level`
///
/// Fails if the host already installed a subscriber.
///
/// # Examples
///
/// ```no_run
/// use lumen_config::Config;
/// use lumen_log::init_logging;
///
/// let config = Config::default();
/// let setup = init_logging(Some(std::path::Path::new("./logs")), true, Some(&config));
/// assert!(setup.is_ok());
/// ```
pub fn init_logging(
    log_dir: Option<&Path>,
    debug_build: bool,
    config: Option<&Config>,
) -> Result<LogSetup, TryInitError> {
    let filter = plugin_filter(config.map(|c| c.debug.log_level.as_str()));

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    let log_path = log_dir.map(|dir| dir.join(LOG_FILE_NAME));
    if debug_build
        && let Some(log_dir) = log_dir
        && let Some(path) = &log_path
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(path)
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).try_init()?;
        return Ok(LogSetup {
            filter,
            log_file: log_path,
        });
    }

    subscriber.try_init()?;
    Ok(LogSetup {
        filter,
        log_file: None,
    })
}

/// Filter for the plugin's crates at [`DEFAULT_LEVEL`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(plugin_filter(None))
}

/// Expand a bare level into per-target directives. Anything containing a
/// directive (`=` or `,`) is used verbatim.
fn plugin_filter(level: Option<&str>) -> String {
    let level = level.map(str::trim).filter(|l| !l.is_empty());
    match level {
        Some(directives) if directives.contains(['=', ',']) => directives.to_string(),
        level => {
            let level = level.unwrap_or(DEFAULT_LEVEL);
            let mut filter = String::from("warn");
            for target in PLUGIN_TARGETS {
                filter.push_str(&format!(",{target}={level}"));
            }
            filter
        }
    }
}
