//! Ring Runner entry point
//!
//! Runs the game headless under the autopilot. Settings are read from the
//! path given as the first argument, or `ring_runner.toml`, falling back to
//! defaults when the file does not exist.

use flight_engine::config::Config;
use flight_engine::foundation::logging;
use flight_engine::render::{HeadlessDevice, ShaderSources};
use flight_engine::{Application, Engine};
use ring_runner::{Autopilot, GameSettings, HeadlessHost, RingRunner};

const SETTINGS_FILE: &str = "ring_runner.toml";
const DISPLAY_SIZE: (u32, u32) = (1280, 720);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    log::info!("Starting Ring Runner...");

    let path = std::env::args().nth(1).unwrap_or_else(|| SETTINGS_FILE.to_string());
    let settings = GameSettings::load_or_default(&path)?;
    settings.validate()?;

    let device = HeadlessDevice::new(DISPLAY_SIZE.0, DISPLAY_SIZE.1);
    let mut engine = Engine::new(settings.engine_config(), Box::new(device))?;
    engine.initialize(&ShaderSources::default())?;

    let mut game = RingRunner::new(settings.clone()).with_autopilot(Autopilot::default());
    game.initialize(&mut engine)?;

    let mut host = HeadlessHost::realtime(&settings);
    let frames = host.run(&mut engine, &mut game, settings.run_seconds * 1000.0)?;

    let stats = game.stats().borrow();
    log::info!(
        "Run finished: {} frames over {} host ticks, score {}, health {:.0}%",
        frames,
        host.ticks(),
        stats.score_display(),
        stats.health
    );
    if let Some(device) = engine.device_as::<HeadlessDevice>() {
        let totals = device.stats();
        log::info!(
            "Device totals: {} frames, {} draws, {} bytes uploaded",
            totals.frames,
            totals.draw_calls,
            totals.bytes_uploaded
        );
    }
    Ok(())
}
