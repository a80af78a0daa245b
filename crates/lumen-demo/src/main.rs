//! Demo binary that drives the flashlight plugin against a simulated server.
//!
//! Loads `flashlight.ron` (created with defaults if missing), applies CLI
//! overrides, then runs a scripted session: players walk in circles, duck,
//! tap the activation button, use the command and die.
//!
//! Run with `cargo run -p lumen-demo -- --ticks 1280 --players 6`.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use glam::Vec3;
use lumen_config::{CliArgs, Config};
use lumen_flashlight::{
    Buttons, FlashlightPlugin, PlayerId, SimHost, TickReport, ToggleOutcome, TransmitInfo,
};
use tracing::{info, warn};

/// Simulation rate of the demo server.
const TICK_RATE: u32 = 64;

/// CLI arguments for the demo binary.
#[derive(Parser, Debug)]
#[command(name = "lumen-demo", about = "Flashlight plugin demo on a simulated server")]
struct DemoArgs {
    #[command(flatten)]
    overrides: CliArgs,

    /// Number of simulation ticks to run.
    #[arg(long, default_value_t = 640)]
    ticks: u32,

    /// Number of human players to connect.
    #[arg(long, default_value_t = 4)]
    players: u64,

    /// Do not connect a bot alongside the humans.
    #[arg(long)]
    no_bot: bool,
}

fn main() {
    let args = DemoArgs::parse();

    let config_dir = Config::resolve_dir(args.overrides.config.as_deref())
        .unwrap_or_else(|_| PathBuf::from("."));

    let (mut config, load_error) = match Config::load_or_create(&config_dir) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    config.apply_cli_overrides(&args.overrides);

    match lumen_log::init_logging(
        Some(&config_dir.join("logs")),
        cfg!(debug_assertions),
        Some(&config),
    ) {
        Ok(setup) => {
            if let Some(path) = &setup.log_file {
                info!(filter = %setup.filter, "Logging to {}", path.display());
            }
        }
        Err(e) => eprintln!("lumen-demo: logging not initialized: {e}"),
    }

    if let Some(e) = load_error {
        warn!("Using default config: {e}");
    } else {
        config.migrate(&config_dir);
    }
    for fix in config.sanitize() {
        warn!("Config: {fix}");
    }

    info!("Lumen flashlight demo");
    info!(
        "Config dir: {} | ticks={} players={}",
        config_dir.display(),
        args.ticks,
        args.players
    );

    let mut plugin = FlashlightPlugin::new(&config);
    let mut host = SimHost::new();
    let humans: Vec<PlayerId> = (1..=args.players).map(|id| host.add_player(id)).collect();
    if !args.no_bot {
        host.add_bot(1000);
    }

    let tick = Duration::from_secs(1) / TICK_RATE;
    let mut totals = TickReport::default();
    let mut redactions = 0;

    for frame in 0..args.ticks {
        script_players(&mut host, &mut plugin, &humans, frame);

        let report = plugin.on_tick(&mut host);
        totals.players += report.players;
        totals.skipped += report.skipped;
        totals.toggles += report.toggles;

        let mut infos: Vec<TransmitInfo> = humans
            .iter()
            .map(|&p| TransmitInfo::new(p, host.light_handles()))
            .collect();
        redactions += plugin.on_check_transmit(&mut infos, &host);

        if frame % TICK_RATE == 0 {
            info!(
                frame,
                sessions = plugin.registry().len(),
                lights = plugin.registry().lights_on(),
                "status"
            );
        }
        host.advance(tick);
    }

    info!(
        toggles = totals.toggles,
        skipped = totals.skipped,
        redactions, "simulation finished"
    );

    let ended = plugin.cleanup_all(&mut host);
    info!(
        "Cleaned up {ended} sessions, {} lights left in world",
        host.live_lights()
    );
}

/// Drive each simulated player for one frame.
fn script_players(host: &mut SimHost, plugin: &mut FlashlightPlugin, humans: &[PlayerId], frame: u32) {
    for (i, &player) in humans.iter().enumerate() {
        let phase = i as u32 * 24;

        // Walk a circle of radius 200 around a per-player center.
        let yaw = (frame as f32 * 2.0 + i as f32 * 90.0) % 360.0;
        let center = Vec3::new(i as f32 * 500.0, 0.0, 0.0);
        let heading = yaw.to_radians();
        host.set_origin(
            player,
            center + Vec3::new(heading.cos(), heading.sin(), 0.0) * 200.0,
        );
        host.set_body_yaw(player, yaw);
        host.set_velocity(player, Vec3::new(-heading.sin(), heading.cos(), 0.0) * 250.0);

        host.set_crouched(player, (frame + phase) % 256 >= 128);

        // Hold the activation button for 8 frames every 96.
        let pressing = (frame + phase) % 96 < 8;
        host.set_buttons(player, if pressing { Buttons::INSPECT } else { Buttons::NONE });
    }

    let Some(&first) = humans.first() else {
        return;
    };
    if frame == 200 {
        match plugin.toggle_command(Some(first), host) {
            Ok(ToggleOutcome::On) => info!(%first, "command: flashlight on"),
            Ok(outcome) => info!(%first, ?outcome, "command handled"),
            Err(e) => warn!("command failed: {e}"),
        }
    }
    if frame == 400 {
        host.kill(first);
        plugin.on_player_death(first, host);
        info!(%first, "player died");
    }
    if frame == 460 {
        host.respawn(first);
        info!(%first, "player respawned");
    }
}
