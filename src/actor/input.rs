//! Input Actor: Dedicated thread for polling terminal events.
//!
//! This actor runs in its own thread and uses crossterm's event polling
//! to capture keys, mouse buttons and resizes without blocking the pet's
//! main loop. Only the events the front-end reacts to are forwarded.

use super::messages::{InputEvent, KeyCode, MouseButton, MouseEvent};
use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyEventKind};
use log::debug;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Input actor that polls terminal events.
pub struct InputActor {
    /// Handle to the input thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl InputActor {
    /// Spawn the input actor thread.
    ///
    /// `poll_timeout` bounds how long the thread waits for an event before
    /// checking the shutdown flag again.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn(sender: Sender<InputEvent>, poll_timeout: Duration) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = Arc::clone(&shutdown);

        let handle = thread::Builder::new()
            .name("petclip-input".to_string())
            .spawn(move || {
                Self::run_loop(&sender, &shutdown_clone, poll_timeout);
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the input thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the input thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn run_loop(sender: &Sender<InputEvent>, shutdown: &AtomicBool, poll_timeout: Duration) {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                let _ = sender.try_send(InputEvent::Shutdown);
                break;
            }

            match event::poll(poll_timeout) {
                Ok(true) => match event::read() {
                    Ok(event) => {
                        if let Some(input_event) = convert_event(event)
                            && sender.send(input_event).is_err()
                        {
                            debug!("input: receiver dropped, stopping");
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = sender.send(InputEvent::Error(e.to_string()));
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    let _ = sender.send(InputEvent::Error(e.to_string()));
                }
            }
        }
    }
}

impl Drop for InputActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Convert a crossterm event to an [`InputEvent`].
fn convert_event(event: Event) -> Option<InputEvent> {
    match event {
        Event::Key(key_event) => {
            // Only presses; releases and repeats would double-tap.
            if key_event.kind != KeyEventKind::Press {
                return None;
            }
            let code = convert_key_code(key_event.code)?;
            let ctrl = key_event.modifiers.contains(event::KeyModifiers::CONTROL);
            Some(InputEvent::Key { code, ctrl })
        }
        Event::Mouse(mouse) => {
            let (down, button) = match mouse.kind {
                event::MouseEventKind::Down(button) => (true, button),
                event::MouseEventKind::Up(button) => (false, button),
                _ => return None,
            };
            let event = MouseEvent {
                x: mouse.column,
                y: mouse.row,
                button: if button == event::MouseButton::Left {
                    MouseButton::Left
                } else {
                    MouseButton::Other
                },
            };
            Some(if down {
                InputEvent::MouseDown(event)
            } else {
                InputEvent::MouseUp(event)
            })
        }
        Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
        _ => None,
    }
}

fn convert_key_code(code: event::KeyCode) -> Option<KeyCode> {
    Some(match code {
        event::KeyCode::Char(c) => KeyCode::Char(c),
        event::KeyCode::Enter => KeyCode::Enter,
        event::KeyCode::Esc => KeyCode::Esc,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyEventState, MouseEventKind};

    fn key(code: event::KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: event::KeyModifiers::CONTROL,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_key_press_converted() {
        let converted = convert_event(key(event::KeyCode::Char('f'), KeyEventKind::Press));
        assert_eq!(converted, Some(InputEvent::ctrl(KeyCode::Char('f'))));
    }

    #[test]
    fn test_key_release_dropped() {
        assert!(convert_event(key(event::KeyCode::Enter, KeyEventKind::Release)).is_none());
        assert!(convert_event(key(event::KeyCode::F(1), KeyEventKind::Press)).is_none());
        assert!(convert_event(key(event::KeyCode::Tab, KeyEventKind::Press)).is_none());
    }

    #[test]
    fn test_mouse_buttons_converted() {
        let down = Event::Mouse(event::MouseEvent {
            kind: MouseEventKind::Down(event::MouseButton::Left),
            column: 3,
            row: 4,
            modifiers: event::KeyModifiers::NONE,
        });
        assert_eq!(convert_event(down), Some(InputEvent::MouseDown(MouseEvent::left(3, 4))));

        let right_up = Event::Mouse(event::MouseEvent {
            kind: MouseEventKind::Up(event::MouseButton::Right),
            column: 0,
            row: 1,
            modifiers: event::KeyModifiers::NONE,
        });
        assert_eq!(
            convert_event(right_up),
            Some(InputEvent::MouseUp(MouseEvent {
                x: 0,
                y: 1,
                button: MouseButton::Other,
            }))
        );

        let moved = Event::Mouse(event::MouseEvent {
            kind: MouseEventKind::Moved,
            column: 3,
            row: 4,
            modifiers: event::KeyModifiers::NONE,
        });
        assert!(convert_event(moved).is_none());
    }

    #[test]
    fn test_resize_converted() {
        assert_eq!(
            convert_event(Event::Resize(80, 24)),
            Some(InputEvent::Resize { width: 80, height: 24 })
        );
    }
}
