//! Ticker Actor: Dedicated thread for frame pacing.
//!
//! The pet itself never reads the clock; the main loop does, once per
//! tick, and hands that instant to the stage. This thread only decides
//! when a tick happens.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// A tick event sent at regular intervals.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    /// Frame number (monotonically increasing).
    pub frame: u64,
    /// When the tick was generated.
    pub at: Instant,
    /// Time since the previous tick (or since start for the first).
    pub dt: Duration,
}

/// Ticker actor that generates regular timing events.
pub struct TickerActor {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
    tick_rx: Receiver<Tick>,
}

impl TickerActor {
    /// Spawn a ticker firing every `interval`.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn(interval: Duration) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = Arc::clone(&shutdown);

        // Small buffer: a slow main loop skips ticks instead of queueing them.
        let (tick_tx, tick_rx) = bounded(2);

        let handle = thread::Builder::new()
            .name("petclip-ticker".to_string())
            .spawn(move || {
                Self::run_loop(&tick_tx, &shutdown_clone, interval);
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
            tick_rx,
        })
    }

    /// Tick receiver, for use with `select!`.
    #[inline]
    pub const fn receiver(&self) -> &Receiver<Tick> {
        &self.tick_rx
    }

    /// Signal the ticker to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the ticker thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn run_loop(tick_tx: &Sender<Tick>, shutdown: &AtomicBool, interval: Duration) {
        let start = Instant::now();
        let mut last = start;
        let mut frame = 0u64;
        let mut next_tick = start + interval;

        while !shutdown.load(Ordering::Relaxed) {
            let now = Instant::now();
            if now < next_tick {
                thread::sleep((next_tick - now).min(Duration::from_millis(1)));
                continue;
            }

            let tick = Tick {
                frame,
                at: now,
                dt: now - last,
            };
            // Full buffer: skip this tick.
            if tick_tx.try_send(tick).is_ok() {
                last = now;
                frame += 1;
            }

            next_tick += interval;
            if next_tick < now {
                next_tick = now + interval;
            }
        }
    }
}

impl Drop for TickerActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_basic() {
        let ticker = TickerActor::spawn(Duration::from_millis(10)).unwrap();

        let first = ticker.receiver().recv_timeout(Duration::from_millis(200)).unwrap();
        assert_eq!(first.frame, 0);

        let second = ticker.receiver().recv_timeout(Duration::from_millis(200)).unwrap();
        assert_eq!(second.frame, 1);
        assert!(second.at >= first.at);

        ticker.join();
    }

    #[test]
    fn test_ticker_shutdown() {
        let ticker = TickerActor::spawn(Duration::from_millis(100)).unwrap();
        ticker.shutdown();
        thread::sleep(Duration::from_millis(20));
        ticker.join();
    }
}
