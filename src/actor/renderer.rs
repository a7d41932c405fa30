//! Renderer Actor: the only thread that writes to the terminal.
//!
//! The main loop composes a whole frame and ships it over the channel. The
//! render thread remembers what is on screen, diffs the new frame against
//! it and flushes the ANSI in one write. When the screen contents are
//! unknown (first frame, resize, explicit redraw) the frame goes out whole.

use super::messages::RenderCommand;
use crate::buffer::diff::{render_diff, render_full, DiffState};
use crate::buffer::Buffer;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::{debug, error};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const HIDE_CURSOR: &[u8] = b"\x1b[?25l";

/// Handle to the render thread.
pub struct RendererActor {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

#[derive(Debug, Clone, Default)]
struct RenderStats {
    frames: u64,
    cells_changed: u64,
    bytes_written: u64,
    /// Exponentially smoothed, microseconds.
    avg_render_us: u64,
}

/// Frame presenter, generic over the sink so it can be tested.
struct Renderer<W: Write> {
    /// What the terminal shows; `None` when unknown.
    shown: Option<Buffer>,
    state: DiffState,
    output: Vec<u8>,
    sink: W,
    stats: RenderStats,
}

impl<W: Write> Renderer<W> {
    fn new(sink: W) -> Self {
        Self {
            shown: None,
            state: DiffState::new(),
            output: Vec::with_capacity(64 * 1024),
            sink,
            stats: RenderStats::default(),
        }
    }

    /// Put `frame` on screen. A frame whose size differs from what is shown
    /// (a resize racing a compose) is drawn in full.
    fn present(&mut self, frame: Buffer) -> io::Result<()> {
        let start = Instant::now();
        self.output.clear();

        match self.shown.as_ref().filter(|shown| shown.area() == frame.area()) {
            Some(shown) => {
                let result = render_diff(shown, &frame, &[], &mut self.output, &mut self.state);
                self.stats.cells_changed += result.cells_changed as u64;
            }
            None => {
                render_full(&frame, &mut self.output);
                self.state.reset();
                self.stats.cells_changed += frame.cells().len() as u64;
            }
        }
        self.output.extend_from_slice(HIDE_CURSOR);

        self.sink.write_all(&self.output)?;
        self.sink.flush()?;
        self.shown = Some(frame);

        let took = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        self.stats.frames += 1;
        self.stats.bytes_written += self.output.len() as u64;
        self.stats.avg_render_us = if self.stats.frames == 1 {
            took
        } else {
            (self.stats.avg_render_us * 15 + took) / 16
        };
        Ok(())
    }

    /// Apply one command. Returns false on shutdown.
    fn handle(&mut self, command: RenderCommand) -> io::Result<bool> {
        match command {
            RenderCommand::FullRedraw(frame) => {
                self.shown = None;
                self.present(*frame)?;
            }
            RenderCommand::Update(frame) => self.present(*frame)?,
            RenderCommand::Resize { .. } => self.shown = None,
            RenderCommand::Shutdown => return Ok(false),
        }
        Ok(true)
    }
}

impl RendererActor {
    /// Spawn the render thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn(receiver: Receiver<RenderCommand>) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);

        let handle = thread::Builder::new()
            .name("petclip-render".to_string())
            .spawn(move || {
                if let Err(e) = Self::run_loop(&receiver, &flag) {
                    error!("render thread failed: {e}");
                }
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Ask the thread to stop after the command in hand.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the thread. Send [`RenderCommand::Shutdown`] first to have
    /// queued frames flushed.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn run_loop(receiver: &Receiver<RenderCommand>, shutdown: &AtomicBool) -> io::Result<()> {
        let mut renderer = Renderer::new(io::stdout());

        while !shutdown.load(Ordering::Relaxed) {
            match receiver.recv_timeout(Duration::from_millis(16)) {
                Ok(command) => {
                    if !renderer.handle(command)? {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        let stats = &renderer.stats;
        debug!(
            "render: {} frames, {} cells, {} bytes, avg {}us",
            stats.frames, stats.cells_changed, stats.bytes_written, stats.avg_render_us
        );
        Ok(())
    }
}

impl Drop for RendererActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{Cell, Rgb};

    fn update(renderer: &mut Renderer<Vec<u8>>, frame: Buffer) {
        assert!(renderer.handle(RenderCommand::Update(Box::new(frame))).unwrap());
    }

    #[test]
    fn test_first_frame_is_full() {
        let mut renderer = Renderer::new(Vec::new());
        let mut frame = Buffer::new(4, 2);
        frame.set(0, 0, Cell::pixels(Rgb::WHITE, Rgb::BLACK));
        update(&mut renderer, frame);

        assert_eq!(renderer.stats.frames, 1);
        assert_eq!(renderer.stats.cells_changed, 8);
        assert!(renderer.sink.starts_with(b"\x1b[?25l\x1b[H"));
    }

    #[test]
    fn test_unchanged_frame_writes_little() {
        let mut renderer = Renderer::new(Vec::new());
        update(&mut renderer, Buffer::new(4, 2));
        let after_first = renderer.sink.len();

        update(&mut renderer, Buffer::new(4, 2));
        assert_eq!(renderer.stats.cells_changed, 8, "second frame changed nothing");
        assert_eq!(&renderer.sink[after_first..], HIDE_CURSOR);
    }

    #[test]
    fn test_resized_frame_is_drawn_whole() {
        let mut renderer = Renderer::new(Vec::new());
        update(&mut renderer, Buffer::new(4, 2));
        update(&mut renderer, Buffer::new(6, 3));
        assert_eq!(renderer.stats.cells_changed, 8 + 18);
        assert_eq!(renderer.shown.as_ref().map(Buffer::width), Some(6));
    }

    #[test]
    fn test_resize_and_redraw_forget_the_screen() {
        let mut renderer = Renderer::new(Vec::new());
        update(&mut renderer, Buffer::new(4, 2));
        renderer.handle(RenderCommand::Resize { width: 4, height: 2 }).unwrap();
        assert!(renderer.shown.is_none());

        update(&mut renderer, Buffer::new(4, 2));
        assert_eq!(renderer.stats.cells_changed, 16);

        renderer.handle(RenderCommand::FullRedraw(Box::new(Buffer::new(4, 2)))).unwrap();
        assert_eq!(renderer.stats.cells_changed, 24);
        assert_eq!(renderer.stats.frames, 3);
    }

    #[test]
    fn test_shutdown_command() {
        let mut renderer = Renderer::new(Vec::new());
        assert!(!renderer.handle(RenderCommand::Shutdown).unwrap());
    }
}
