//! Test double for [`ClipMedia`].

use super::{ClipMedia, ClipName, ClipSet};
use crate::buffer::{Frame, Rgb};
use crate::error::PlaybackError;
use std::cell::RefCell;
use std::rc::Rc;

/// Everything a test may want to assert about a fake clip.
#[derive(Debug, Default)]
pub(crate) struct FakeState {
    pub visible: bool,
    pub looping: bool,
    pub playing: bool,
    pub seeks: u32,
    pub plays: u32,
    pub pauses: u32,
    pub released: bool,
    pub reject: Option<PlaybackError>,
}

/// Records every call; state is shared through [`FakeClip::probe`] so it
/// stays observable after the clip moves into a registry.
#[derive(Debug)]
pub(crate) struct FakeClip {
    state: Rc<RefCell<FakeState>>,
    frame: Option<Frame>,
}

impl FakeClip {
    /// A decoded clip whose frames are a solid `color`.
    pub fn new(color: Rgb) -> Self {
        Self {
            state: Rc::default(),
            frame: Some(Frame::filled(8, 6, color)),
        }
    }

    /// A clip that has not decoded a frame yet.
    pub fn undecoded() -> Self {
        Self {
            state: Rc::default(),
            frame: None,
        }
    }

    pub fn probe(&self) -> Rc<RefCell<FakeState>> {
        Rc::clone(&self.state)
    }
}

impl ClipMedia for FakeClip {
    fn set_visible(&mut self, visible: bool) {
        self.state.borrow_mut().visible = visible;
    }

    fn set_looping(&mut self, looping: bool) {
        self.state.borrow_mut().looping = looping;
    }

    fn seek_to_start(&mut self) {
        self.state.borrow_mut().seeks += 1;
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        let mut state = self.state.borrow_mut();
        state.plays += 1;
        if let Some(err) = state.reject.clone() {
            return Err(err);
        }
        state.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        let mut state = self.state.borrow_mut();
        state.pauses += 1;
        state.playing = false;
    }

    fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    fn release(&mut self) {
        self.state.borrow_mut().released = true;
    }
}

/// Solid colour used for `name`'s frames, distinct per clip.
pub(crate) fn fake_color(name: ClipName) -> Rgb {
    let index = ClipName::ALL.iter().position(|c| *c == name).unwrap_or(0);
    let step = u8::try_from(index * 30).unwrap_or(u8::MAX);
    Rgb::new(step, 255 - step, 100)
}

pub(crate) fn fake_set(names: &[ClipName]) -> ClipSet<FakeClip> {
    names.iter().map(|&name| (name, FakeClip::new(fake_color(name)))).collect()
}

/// Every clip except `Eat`, like a theme that does not ship feeding.
pub(crate) fn fake_set_without_eat() -> ClipSet<FakeClip> {
    let names: Vec<ClipName> = ClipName::ALL.into_iter().filter(|c| *c != ClipName::Eat).collect();
    fake_set(&names)
}

pub(crate) fn full_fake_set() -> ClipSet<FakeClip> {
    fake_set(&ClipName::ALL)
}
