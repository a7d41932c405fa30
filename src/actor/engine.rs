//! Engine: the terminal session the stage runs in.
//!
//! Puts the terminal into raw mode, spawns the input, render and ticker
//! actors, and hands the main loop a cell buffer to compose into. Dropping
//! it stops the actors and gives the terminal back.

use super::messages::{InputEvent, RenderCommand};
use super::ticker::{Tick, TickerActor};
use super::{InputActor, RendererActor};
use crate::buffer::Buffer;
use crossbeam_channel::{bounded, Receiver, Sender};
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn};
use std::io;
use std::time::Duration;

/// Terminal session settings.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Frames per second the ticker aims for.
    pub target_fps: u32,
    /// How long the input thread blocks before re-checking for shutdown.
    pub input_poll_timeout: Duration,
    /// Capture mouse buttons (needed for press-and-hold).
    pub enable_mouse: bool,
    /// Draw on the alternate screen.
    pub alternate_screen: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_fps: 30,
            input_poll_timeout: Duration::from_millis(10),
            enable_mouse: true,
            alternate_screen: true,
        }
    }
}

impl EngineConfig {
    /// Interval between ticks. A target of 0 fps is treated as 1.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.target_fps.max(1)
    }
}

struct Actors {
    input: InputActor,
    render: RendererActor,
    ticker: TickerActor,
}

/// A running terminal session.
pub struct Engine {
    config: EngineConfig,
    input_rx: Receiver<InputEvent>,
    render_tx: Sender<RenderCommand>,
    actors: Option<Actors>,
    buffer: Buffer,
    running: bool,
}

impl Engine {
    /// Take over the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup or spawning an actor fails. The
    /// terminal is restored before returning.
    pub fn with_config(config: EngineConfig) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;

        terminal::enable_raw_mode()?;
        let (input_tx, input_rx) = bounded::<InputEvent>(64);
        let (render_tx, render_rx) = bounded::<RenderCommand>(4);
        let actors = Self::enter(&config).and_then(|()| {
            Ok(Actors {
                input: InputActor::spawn(input_tx, config.input_poll_timeout)?,
                render: RendererActor::spawn(render_rx)?,
                ticker: TickerActor::spawn(config.frame_interval())?,
            })
        });
        let actors = match actors {
            Ok(actors) => actors,
            Err(e) => {
                restore_terminal(&config);
                return Err(e);
            }
        };

        info!("engine: {cols}x{rows} at {} fps", config.target_fps);
        Ok(Self {
            config,
            input_rx,
            render_tx,
            actors: Some(actors),
            // At least one pixel row above the status line.
            buffer: Buffer::new(cols.max(1), rows.max(2)),
            running: true,
        })
    }

    fn enter(config: &EngineConfig) -> io::Result<()> {
        let mut stdout = io::stdout();
        if config.alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        if config.enable_mouse {
            execute!(stdout, EnableMouseCapture)?;
        }
        execute!(stdout, cursor::Hide)
    }

    /// Columns.
    pub const fn width(&self) -> u16 {
        self.buffer.width()
    }

    /// Rows, status line included.
    pub const fn height(&self) -> u16 {
        self.buffer.height()
    }

    /// The buffer to compose the next frame into.
    pub const fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    /// Input events, for use with `select!`.
    pub const fn input_receiver(&self) -> &Receiver<InputEvent> {
        &self.input_rx
    }

    /// Ticks, for use with `select!`. `None` once the session is torn down.
    pub fn tick_receiver(&self) -> Option<&Receiver<Tick>> {
        self.actors.as_ref().map(|actors| actors.ticker.receiver())
    }

    /// Whether the main loop should keep going.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// End the main loop.
    pub const fn stop(&mut self) {
        self.running = false;
    }

    /// Send the buffer to be drawn in full.
    pub fn request_redraw(&self) {
        self.send(RenderCommand::FullRedraw(Box::new(self.buffer.clone())));
    }

    /// Send the buffer to be drawn as a diff against the last frame.
    pub fn request_update(&self) {
        self.send(RenderCommand::Update(Box::new(self.buffer.clone())));
    }

    /// Follow a terminal resize.
    pub fn handle_resize(&mut self, cols: u16, rows: u16) {
        let (width, height) = (cols.max(1), rows.max(2));
        self.buffer.resize(width, height);
        self.send(RenderCommand::Resize { width, height });
    }

    fn send(&self, command: RenderCommand) {
        if self.render_tx.send(command).is_err() {
            warn!("engine: render thread is gone");
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Some(actors) = self.actors.take() {
            actors.input.join();
            actors.ticker.join();
            // Let the renderer flush its last frame before the screen is restored.
            let _ = self.render_tx.send(RenderCommand::Shutdown);
            actors.render.join();
        }
        restore_terminal(&self.config);
    }
}

fn restore_terminal(config: &EngineConfig) {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::Show);
    if config.enable_mouse {
        let _ = execute!(stdout, DisableMouseCapture);
    }
    if config.alternate_screen {
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
    let _ = terminal::disable_raw_mode();
}
