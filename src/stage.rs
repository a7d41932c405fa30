//! PetStage: the pet in a terminal.
//!
//! Glues a [`Pet`] over [`SyntheticClip`]s to the actor engine: terminal
//! input becomes pet signals, each tick advances the clips and feeds their
//! media events back in, and every frame is composed into a cell buffer.
//! The bottom row is a status line; the rest shows the pet as half-block
//! pixels, two pixel rows per terminal row.

use crate::actor::{InputEvent, KeyCode, MouseButton};
use crate::buffer::{cover_crop, Buffer, Cell, Frame, Modifiers, Rgb, Style};
use crate::clip::{ClipMedia, MediaEvent, MediaEventKind, SyntheticClip, Theme};
use crate::config::PetConfig;
use crate::error::PetResult;
use crate::layout::Rect;
use crate::pet::{Pet, PetEvent, Signal};
use log::{debug, info};
use std::fmt::Write as _;
use std::time::Instant;

const STATUS_BG: Rgb = Rgb::new(30, 30, 30);
const STATUS: Style = Style::new(Rgb::new(200, 200, 200), STATUS_BG);
const NOTICE: Style = Style::new(Rgb::new(255, 230, 120), Rgb::BLACK).with_modifiers(Modifiers::BOLD);
const HELP: &str = "[space] tap  [hold] nuzzle  [f] feed  [w] wake  [t] theme  [q] quit";

/// What the main loop should do after an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageControl {
    /// Keep running.
    Continue,
    /// Leave the main loop.
    Quit,
}

/// A pet on a terminal stage.
#[derive(Debug)]
pub struct PetStage {
    pet: Pet<SyntheticClip>,
    requested: Theme,
    canvas: Frame,
    picture: Rect,
    last_advance: Instant,
    last_event: Option<PetEvent>,
}

impl PetStage {
    /// Build the stage and start loading the day theme. The viewport
    /// follows the configuration until [`PetStage::resize`] is called.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn new(config: PetConfig, now: Instant) -> PetResult<Self> {
        let viewport = (config.viewport_width, config.viewport_height);
        let mut pet = Pet::new(config)?;
        pet.load_theme(Theme::Day, SyntheticClip::theme_set(Theme::Day), now);
        Ok(Self {
            pet,
            requested: Theme::Day,
            canvas: Frame::new(viewport.0, viewport.1),
            picture: Rect::ZERO,
            last_advance: now,
            last_event: None,
        })
    }

    /// The pet.
    pub const fn pet(&self) -> &Pet<SyntheticClip> {
        &self.pet
    }

    /// Theme most recently asked for (may still be loading).
    pub const fn requested_theme(&self) -> Theme {
        self.requested
    }

    /// Fit the viewport to a terminal of `cols` x `rows` cells.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        let (width, height) = pixel_size(cols, rows);
        self.picture = Rect::from_size(cols, rows.saturating_sub(1));
        self.pet.set_viewport(width, height);
        self.canvas.resize(width, height);
    }

    /// React to terminal input.
    pub fn handle_input(&mut self, event: &InputEvent, now: Instant) -> StageControl {
        match event {
            InputEvent::Key { code, ctrl } => match code {
                KeyCode::Char('q') | KeyCode::Esc => return StageControl::Quit,
                KeyCode::Char('c') if *ctrl => return StageControl::Quit,
                KeyCode::Char(' ') | KeyCode::Enter => self.pet.signal(Signal::Tap, now),
                KeyCode::Char('f') => self.pet.signal(Signal::Feed, now),
                KeyCode::Char('w') => self.pet.signal(Signal::Wake, now),
                KeyCode::Char('t') => self.toggle_theme(now),
                _ => {}
            },
            InputEvent::MouseDown(mouse)
                if mouse.button == MouseButton::Left && self.picture.contains(mouse.x, mouse.y) =>
            {
                self.pet.signal(Signal::PressStart, now);
            }
            // A release always ends the press; only a release on the pet taps.
            InputEvent::MouseUp(mouse) if mouse.button == MouseButton::Left => {
                self.pet.signal(Signal::PressEnd, now);
                if self.picture.contains(mouse.x, mouse.y) {
                    self.pet.signal(Signal::Tap, now);
                }
            }
            InputEvent::Resize { width, height } => self.resize(*width, *height),
            InputEvent::Shutdown => return StageControl::Quit,
            InputEvent::Error(message) => debug!("stage: input error: {message}"),
            InputEvent::MouseDown(_) | InputEvent::MouseUp(_) => {}
        }
        self.record_events();
        StageControl::Continue
    }

    /// Ask for the other theme. Clips are swapped once the new set loads.
    pub fn toggle_theme(&mut self, now: Instant) {
        self.requested = self.requested.opposite();
        info!("stage: switching to {:?}", self.requested);
        self.pet
            .load_theme(self.requested, SyntheticClip::theme_set(self.requested), now);
        self.record_events();
    }

    /// Advance every clip to `now`, feed their events to the pet and fire
    /// due timers.
    pub fn advance(&mut self, now: Instant) {
        let dt = now.saturating_duration_since(self.last_advance);
        self.last_advance = now;

        let mut media = Vec::new();
        for (name, clip) in self.pet.clips_mut() {
            // Late Ready signals from a set committed by the fallback.
            match clip.advance(dt) {
                Some(MediaEventKind::Ready) | None => {}
                Some(kind) => media.push(MediaEvent { clip: name, kind }),
            }
        }
        for (name, clip) in self.pet.staged_clips_mut() {
            if let Some(MediaEventKind::Ready) = clip.advance(dt) {
                media.push(MediaEvent::ready(name));
            }
        }
        for event in media {
            self.pet.media_event(event, now);
        }

        self.pet.poll(now);
        self.record_events();
    }

    /// Compose the current frame into `buffer`.
    pub fn compose(&mut self, buffer: &mut Buffer) {
        buffer.clear();
        let area = Rect::from_size(buffer.width(), buffer.height());
        let (picture, status) = area.split_vertical(area.height.saturating_sub(1));

        let (width, height) = pixel_size(buffer.width(), buffer.height());
        self.canvas.resize(width, height);
        self.paint_canvas();
        self.canvas.paint_half_blocks(buffer, picture);

        if self.pet.loading_notice_active() {
            let text = "Still loading... please wait";
            let x = picture.width.saturating_sub(text_width(text)) / 2;
            buffer.draw_text(x, picture.height / 2, text, NOTICE);
        }

        self.draw_status(buffer, status);
    }

    fn paint_canvas(&mut self) {
        if let Some(still) = self.pet.freeze_frame().visible_canvas() {
            if let Some(crop) = cover_crop(still.size(), self.canvas.size()) {
                self.canvas.blit_crop_nearest(still, crop);
                return;
            }
        }
        let live = self
            .pet
            .visible_clip()
            .and_then(|name| self.pet.registry().get(name))
            .and_then(ClipMedia::frame);
        match live.and_then(|frame| cover_crop(frame.size(), self.canvas.size()).map(|crop| (frame, crop))) {
            Some((frame, crop)) => self.canvas.blit_crop_nearest(frame, crop),
            None => self.canvas.fill(Rgb::BLACK),
        }
    }

    fn draw_status(&self, buffer: &mut Buffer, status: Rect) {
        if status.is_empty() {
            return;
        }
        buffer.fill(status, Cell::new(' ').with_bg(STATUS_BG));

        let mut state = match self.pet.theme() {
            Some(theme) => format!("{theme:?}"),
            None => "loading".to_string(),
        };
        if let Some(clip) = self.pet.visible_clip() {
            let _ = write!(state, " | {clip}");
        }
        if self.pet.is_sleeping() {
            state.push_str(" | asleep");
        } else if self.pet.is_locked() {
            state.push_str(" | busy");
        }
        if self.pet.burst_count() > 0 {
            let _ = write!(state, " | taps {}", self.pet.burst_count());
        }
        if let Some(loading) = self.pet.loading_theme() {
            let _ = write!(state, " | loading {loading:?}");
        }
        if let Some(event) = &self.last_event {
            let _ = write!(state, " | {}", describe(event));
        }

        let used = buffer.draw_text(status.x + 1, status.y, &state, STATUS);
        let help_x = status.right().saturating_sub(text_width(HELP) + 1);
        if help_x > status.x + used + 2 {
            buffer.draw_text(help_x, status.y, HELP, STATUS.with_modifiers(Modifiers::DIM));
        }
    }

    fn record_events(&mut self) {
        for event in self.pet.drain_events() {
            debug!("stage: {event:?}");
            self.last_event = Some(event);
        }
    }
}

/// Pixel size of a viewport covering `cols` x `rows` cells minus the status
/// line. Never zero.
fn pixel_size(cols: u16, rows: u16) -> (u32, u32) {
    let width = u32::from(cols.max(1));
    let height = u32::from(rows.saturating_sub(1).max(1)) * 2;
    (width, height)
}

fn text_width(text: &str) -> u16 {
    u16::try_from(unicode_width::UnicodeWidthStr::width(text)).unwrap_or(u16::MAX)
}

fn describe(event: &PetEvent) -> String {
    match event {
        PetEvent::TransitionStarted { clip, .. } => format!("-> {clip}"),
        PetEvent::ClipRendering(clip) => format!("{clip} playing"),
        PetEvent::TransitionFinished(clip) => format!("{clip} done"),
        PetEvent::PlaybackFailed { clip, error } => format!("{clip} failed: {error}"),
        PetEvent::IntentResolved(intent) => intent.to_string(),
        PetEvent::IntentDropped(intent) => format!("{intent} dropped"),
        PetEvent::SleepEntered => "zzz".to_string(),
        PetEvent::Woke => "woke up".to_string(),
        PetEvent::ThemeInstalled(theme) => format!("{theme:?} theme"),
        PetEvent::LoadingNotice(shown) => if *shown { "loading..." } else { "ready soon" }.to_string(),
    }
}
