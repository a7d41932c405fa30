//! Terminal Pet: the pet state machine on the actor engine.
//!
//! Usage: `cargo run --example terminal_pet [config.json]`
//!
//! Set `PETCLIP_LOG=petclip.log` (and `RUST_LOG=debug`) to log to a file;
//! logging to the terminal would tear the alternate screen.
//!
//! Click or press space to tap, hold the mouse button to nuzzle, `f` to
//! feed, `w` to wake, `t` to toggle day/night, `q` or Escape to quit.

use crossbeam_channel::select;
use petclip::{Engine, EngineConfig, PetConfig, PetError, PetStage, StageControl};
use std::fs::File;
use std::time::Instant;

fn init_logging() -> Result<(), PetError> {
    let Ok(path) = std::env::var("PETCLIP_LOG") else {
        return Ok(());
    };
    let file = File::create(path)?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn load_config() -> Result<PetConfig, PetError> {
    match std::env::args().nth(1) {
        Some(path) => PetConfig::from_path(path),
        None => Ok(PetConfig::default()),
    }
}

fn main() -> Result<(), PetError> {
    init_logging()?;
    let config = load_config()?;

    let mut stage = PetStage::new(config, Instant::now())?;
    let mut engine = Engine::with_config(EngineConfig::default())?;
    stage.resize(engine.width(), engine.height());

    let input = engine.input_receiver().clone();
    let Some(ticks) = engine.tick_receiver().cloned() else {
        return Ok(());
    };

    stage.compose(engine.buffer_mut());
    engine.request_redraw();

    while engine.is_running() {
        select! {
            recv(input) -> event => {
                let Ok(event) = event else {
                    engine.stop();
                    continue;
                };
                if let petclip::InputEvent::Resize { width, height } = event {
                    engine.handle_resize(width, height);
                }
                if stage.handle_input(&event, Instant::now()) == StageControl::Quit {
                    engine.stop();
                }
            }
            recv(ticks) -> tick => {
                let Ok(tick) = tick else {
                    engine.stop();
                    continue;
                };
                stage.advance(tick.at);
                stage.compose(engine.buffer_mut());
                engine.request_update();
            }
        }
    }

    Ok(())
}
