//! A procedural clip: draws a small creature instead of decoding video.
//!
//! It behaves like real media as far as the pet can tell. It reports
//! `Ready` after a load delay, takes a moment between `play()` and actually
//! rendering, advances at a fixed frame rate and either wraps around or
//! reports `Ended`. The driver calls [`SyntheticClip::advance`] with the
//! elapsed time and forwards whatever event comes back.

use super::{ClipMedia, ClipName, ClipSet, MediaEventKind, Theme};
use crate::buffer::{Frame, Rgb};
use crate::error::PlaybackError;
use std::f32::consts::TAU;
use std::time::Duration;

const DEFAULT_SIZE: (u32, u32) = (64, 48);
const DEFAULT_FPS: u32 = 12;
const DEFAULT_STARTUP: Duration = Duration::from_millis(40);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Loading(Duration),
    Paused,
    Starting(Duration),
    Running,
}

/// Procedural [`ClipMedia`] implementation.
#[derive(Debug)]
pub struct SyntheticClip {
    name: ClipName,
    theme: Theme,
    frame_interval: Duration,
    frame_count: u32,
    startup: Duration,
    phase: Phase,
    looping: bool,
    visible: bool,
    position: u32,
    elapsed: Duration,
    frame: Frame,
    decoded: bool,
}

impl SyntheticClip {
    /// A clip of `name` drawn in `theme`'s palette.
    pub fn new(name: ClipName, theme: Theme) -> Self {
        let index = ClipName::ALL.iter().position(|c| *c == name).unwrap_or(0);
        let load_delay = Duration::from_millis(150 + 60 * index as u64);
        Self {
            name,
            theme,
            frame_interval: Duration::from_secs(1) / DEFAULT_FPS,
            frame_count: frame_count(name),
            startup: DEFAULT_STARTUP,
            phase: Phase::Loading(load_delay),
            looping: name.loops_by_default(),
            visible: false,
            position: 0,
            elapsed: Duration::ZERO,
            frame: Frame::new(DEFAULT_SIZE.0, DEFAULT_SIZE.1),
            decoded: false,
        }
    }

    /// Every clip `theme` ships. Night does not include feeding.
    pub fn theme_set(theme: Theme) -> ClipSet<Self> {
        ClipName::ALL
            .into_iter()
            .filter(|name| theme == Theme::Day || *name != ClipName::Eat)
            .map(|name| (name, Self::new(name, theme)))
            .collect()
    }

    /// Override the load delay.
    #[must_use]
    pub const fn with_load_delay(mut self, delay: Duration) -> Self {
        if matches!(self.phase, Phase::Loading(_)) {
            self.phase = Phase::Loading(delay);
        }
        self
    }

    /// Override the delay between `play()` and rendering.
    #[must_use]
    pub const fn with_startup(mut self, startup: Duration) -> Self {
        self.startup = startup;
        self
    }

    /// Override the pixel size.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.frame = Frame::new(width, height);
        self
    }

    /// Override the frame rate. A rate of 0 is treated as 1.
    #[must_use]
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.frame_interval = Duration::from_secs(1) / fps.max(1);
        self
    }

    /// Clip this instance draws.
    #[inline]
    pub const fn name(&self) -> ClipName {
        self.name
    }

    /// Whether the clip is shown.
    #[inline]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the clip has rendered at least one frame.
    #[inline]
    pub const fn is_decoded(&self) -> bool {
        self.decoded
    }

    /// Whether playback is running (rendering frames).
    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Current frame index.
    #[inline]
    pub const fn position(&self) -> u32 {
        self.position
    }

    /// Advance by `dt`. Returns the media event this produced, if any.
    pub fn advance(&mut self, dt: Duration) -> Option<MediaEventKind> {
        match self.phase {
            Phase::Loading(remaining) => {
                if dt < remaining {
                    self.phase = Phase::Loading(remaining - dt);
                    return None;
                }
                self.phase = Phase::Paused;
                self.decoded = true;
                self.draw();
                Some(MediaEventKind::Ready)
            }
            Phase::Paused => None,
            Phase::Starting(remaining) => {
                if dt < remaining {
                    self.phase = Phase::Starting(remaining - dt);
                    return None;
                }
                self.phase = Phase::Running;
                self.elapsed = dt - remaining;
                self.draw();
                Some(MediaEventKind::Playing)
            }
            Phase::Running => {
                self.elapsed += dt;
                let mut ended = false;
                while self.elapsed >= self.frame_interval {
                    self.elapsed -= self.frame_interval;
                    self.position += 1;
                    if self.position < self.frame_count {
                        continue;
                    }
                    if self.looping {
                        self.position = 0;
                    } else {
                        self.position = self.frame_count - 1;
                        self.phase = Phase::Paused;
                        ended = true;
                        break;
                    }
                }
                self.draw();
                ended.then_some(MediaEventKind::Ended)
            }
        }
    }

    /// Progress through the clip in `0.0..1.0`.
    #[allow(clippy::cast_precision_loss)]
    fn progress(&self) -> f32 {
        self.position as f32 / self.frame_count as f32
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn draw(&mut self) {
        let (w, h) = self.frame.size();
        let (wf, hf) = (w as f32, h as f32);
        let t = self.progress();
        let wave = (t * TAU).sin();

        let (sky, ground, body, belly) = match self.theme {
            Theme::Day => (
                Rgb::from_u32(0x9f_d3_f0),
                Rgb::from_u32(0x6a_b0_4c),
                Rgb::from_u32(0x3f_8f_5a),
                Rgb::from_u32(0xc8_e6_a0),
            ),
            Theme::Night => (
                Rgb::from_u32(0x10_18_30),
                Rgb::from_u32(0x22_33_2a),
                Rgb::from_u32(0x2c_5e_6e),
                Rgb::from_u32(0x8f_b8_c0),
            ),
        };
        let body = if self.name == ClipName::Rage {
            body.mix(Rgb::from_u32(0xd0_20_20), 0.4 + 0.4 * wave.abs())
        } else {
            body
        };

        self.frame.fill(sky);
        let horizon = (hf * 0.78) as i32;
        self.frame.fill_rect(0, horizon, w as i32, h as i32 - horizon, ground);

        let shake = if self.name == ClipName::Rage {
            if self.position % 2 == 0 { 2.0 } else { -2.0 }
        } else {
            0.0
        };
        let breathe = match self.name {
            ClipName::Idle | ClipName::SleepLoop => wave * hf * 0.015,
            _ => 0.0,
        };
        let cx = wf * 0.5 + shake;
        let body_cy = hf * 0.62;
        let body_rx = wf * 0.22;
        let body_ry = hf * 0.2 + breathe;
        self.frame.fill_ellipse(cx, body_cy, body_rx, body_ry, body);
        self.frame.fill_ellipse(cx, body_cy + body_ry * 0.3, body_rx * 0.6, body_ry * 0.55, belly);

        let head_cy = hf * 0.36;
        let head_r = hf * 0.16;
        self.frame.fill_ellipse(cx, head_cy, head_r * 1.1, head_r, body);

        // Eyes: openness 1.0 is wide open, 0.0 closed.
        let openness = match self.name {
            ClipName::SleepStart => 1.0 - t,
            ClipName::SleepLoop => 0.0,
            ClipName::SleepWake => t,
            _ => 1.0,
        };
        let eye_dx = head_r * 0.45;
        let eye_cy = head_cy - head_r * 0.2;
        let eye_r = head_r * 0.18;
        for side in [-1.0, 1.0] {
            let ex = cx + side * eye_dx;
            if openness > 0.1 {
                self.frame.fill_ellipse(ex, eye_cy, eye_r, eye_r * openness, Rgb::WHITE);
                self.frame.fill_ellipse(ex, eye_cy, eye_r * 0.5, eye_r * 0.5 * openness, Rgb::BLACK);
            } else {
                self.frame.fill_rect((ex - eye_r) as i32, eye_cy as i32, (eye_r * 2.0) as i32, 1, Rgb::BLACK);
            }
        }

        let mouth_cy = head_cy + head_r * 0.45;
        let mouth_open = match self.name {
            ClipName::Roar | ClipName::Rage => 0.3 + 0.7 * (t * TAU * 2.0).sin().abs(),
            ClipName::Eat => (t * TAU * 3.0).sin().abs() * 0.6,
            _ => 0.0,
        };
        if mouth_open > 0.05 {
            self.frame
                .fill_ellipse(cx, mouth_cy, head_r * 0.45, head_r * 0.35 * mouth_open, Rgb::from_u32(0x40_10_10));
        } else {
            self.frame
                .fill_rect((cx - head_r * 0.3) as i32, mouth_cy as i32, (head_r * 0.6) as i32, 1, Rgb::BLACK);
        }

        match self.name {
            ClipName::Nuzzle => {
                for i in 0..3 {
                    let phase = (t + i as f32 / 3.0).fract();
                    let hx = cx + (i as f32 - 1.0) * wf * 0.15;
                    let hy = head_cy - phase * hf * 0.3;
                    self.draw_heart(hx, hy, hf * 0.03);
                }
            }
            ClipName::SleepLoop => {
                for i in 0..3 {
                    let phase = (t + i as f32 / 3.0).fract();
                    let zx = cx + head_r + phase * wf * 0.15;
                    let zy = head_cy - head_r - phase * hf * 0.25;
                    self.draw_z(zx as i32, zy as i32, 2 + i);
                }
            }
            ClipName::Eat => {
                // The pellet travels towards the mouth and is gone halfway in.
                if t < 0.5 {
                    let px = wf * 0.9 - (wf * 0.9 - cx) * (t * 2.0);
                    self.frame.fill_ellipse(px, mouth_cy, hf * 0.04, hf * 0.04, Rgb::from_u32(0xc0_80_30));
                }
            }
            _ => {}
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn draw_heart(&mut self, x: f32, y: f32, r: f32) {
        let red = Rgb::from_u32(0xe0_30_60);
        self.frame.fill_ellipse(x - r, y, r, r, red);
        self.frame.fill_ellipse(x + r, y, r, r, red);
        self.frame.fill_rect((x - r * 1.6) as i32, y as i32, (r * 3.2) as i32, (r * 1.2) as i32, red);
        self.frame.fill_rect((x - r * 0.6) as i32, (y + r * 1.2) as i32, (r * 1.2) as i32, (r * 0.8).max(1.0) as i32, red);
    }

    #[allow(clippy::cast_possible_wrap)]
    fn draw_z(&mut self, x: i32, y: i32, size: u32) {
        let white = Rgb::WHITE;
        let s = size as i32;
        self.frame.fill_rect(x, y, s + 1, 1, white);
        for i in 0..=s {
            self.frame.fill_rect(x + s - i, y + i, 1, 1, white);
        }
        self.frame.fill_rect(x, y + s, s + 1, 1, white);
    }
}

const fn frame_count(name: ClipName) -> u32 {
    match name {
        ClipName::Idle | ClipName::SleepLoop | ClipName::Rage | ClipName::Nuzzle | ClipName::Eat => 24,
        ClipName::Roar | ClipName::SleepStart | ClipName::SleepWake => 18,
    }
}

impl ClipMedia for SyntheticClip {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn seek_to_start(&mut self) {
        self.position = 0;
        self.elapsed = Duration::ZERO;
        if self.decoded {
            self.draw();
        }
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        match self.phase {
            Phase::Loading(_) => Err(PlaybackError::NotReady),
            Phase::Paused => {
                self.phase = Phase::Starting(self.startup);
                Ok(())
            }
            Phase::Starting(_) | Phase::Running => Ok(()),
        }
    }

    fn pause(&mut self) {
        if matches!(self.phase, Phase::Starting(_) | Phase::Running) {
            self.phase = Phase::Paused;
        }
    }

    fn frame(&self) -> Option<&Frame> {
        self.decoded.then_some(&self.frame)
    }

    fn release(&mut self) {
        self.pause();
        self.visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn loaded(name: ClipName) -> SyntheticClip {
        let mut clip = SyntheticClip::new(name, Theme::Day)
            .with_load_delay(ms(100))
            .with_startup(ms(40));
        assert_eq!(clip.advance(ms(100)), Some(MediaEventKind::Ready));
        clip
    }

    #[test]
    fn test_ready_after_load_delay() {
        let mut clip = SyntheticClip::new(ClipName::Idle, Theme::Night).with_load_delay(ms(100));
        assert!(clip.frame().is_none());
        assert_eq!(clip.advance(ms(60)), None);
        assert_eq!(clip.advance(ms(60)), Some(MediaEventKind::Ready));
        assert_eq!(clip.advance(ms(60)), None, "ready is reported once");
        assert!(clip.frame().is_some());
    }

    #[test]
    fn test_play_before_ready_rejected() {
        let mut clip = SyntheticClip::new(ClipName::Roar, Theme::Day);
        assert_eq!(clip.play(), Err(PlaybackError::NotReady));
    }

    #[test]
    fn test_playing_after_startup() {
        let mut clip = loaded(ClipName::Idle);
        clip.play().unwrap();
        assert_eq!(clip.advance(ms(20)), None);
        assert_eq!(clip.advance(ms(20)), Some(MediaEventKind::Playing));
        assert!(clip.is_running());
    }

    #[test]
    fn test_one_shot_ends() {
        let mut clip = loaded(ClipName::Roar).with_fps(10);
        clip.set_looping(false);
        clip.play().unwrap();
        clip.advance(ms(40));
        // 18 frames at 10 fps.
        assert_eq!(clip.advance(ms(1_000)), None);
        assert_eq!(clip.advance(ms(800)), Some(MediaEventKind::Ended));
        assert_eq!(clip.position(), 17);
        assert!(!clip.is_running());
        assert_eq!(clip.advance(ms(1_000)), None);
    }

    #[test]
    fn test_looping_wraps() {
        let mut clip = loaded(ClipName::Idle).with_fps(10);
        clip.set_looping(true);
        clip.play().unwrap();
        clip.advance(ms(40));
        assert_eq!(clip.advance(ms(2_500)), None);
        assert_eq!(clip.position(), 1);
    }

    #[test]
    fn test_pause_freezes_position() {
        let mut clip = loaded(ClipName::Idle).with_fps(10);
        clip.play().unwrap();
        clip.advance(ms(40));
        clip.advance(ms(300));
        clip.pause();
        clip.advance(ms(1_000));
        assert_eq!(clip.position(), 3);

        clip.seek_to_start();
        assert_eq!(clip.position(), 0);
    }

    #[test]
    fn test_poses_differ() {
        let idle = loaded(ClipName::Idle);
        let rage = loaded(ClipName::Rage);
        assert_ne!(idle.frame().unwrap().pixels(), rage.frame().unwrap().pixels());
    }

    #[test]
    fn test_night_set_has_no_eat() {
        let night = SyntheticClip::theme_set(Theme::Night);
        assert_eq!(night.len(), 7);
        assert!(!night.contains_key(&ClipName::Eat));
        assert_eq!(SyntheticClip::theme_set(Theme::Day).len(), 8);
    }
}
