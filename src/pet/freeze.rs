//! Freeze-Frame Compositor.
//!
//! Between pausing the outgoing clip and the incoming clip actually
//! rendering there is a gap where the viewport would show a blank frame.
//! The compositor covers it with a still of the outgoing clip's last frame,
//! cropped exactly like the live clip is (cover-fit), scaled without
//! smoothing.

use crate::buffer::{cover_crop, Frame};
use crate::clip::ClipMedia;
use log::debug;

/// A viewport-sized canvas that can hold a still and be shown or hidden.
#[derive(Debug, Default)]
pub struct FreezeFrame {
    canvas: Option<Frame>,
    visible: bool,
}

impl FreezeFrame {
    /// A hidden, empty compositor.
    pub const fn new() -> Self {
        Self {
            canvas: None,
            visible: false,
        }
    }

    /// Capture `source`'s last frame into a `viewport`-sized canvas and show
    /// it. Best effort: when the source has not decoded a frame yet or the
    /// viewport is empty nothing changes. Returns whether a capture happened.
    pub fn capture<M: ClipMedia>(&mut self, source: &M, viewport: (u32, u32)) -> bool {
        let Some(frame) = source.frame() else {
            debug!("freeze: source has no decoded frame, skipping capture");
            return false;
        };
        let Some(crop) = cover_crop(frame.size(), viewport) else {
            debug!("freeze: empty viewport or source, skipping capture");
            return false;
        };

        let canvas = self.canvas.get_or_insert_with(|| Frame::new(viewport.0, viewport.1));
        canvas.resize(viewport.0, viewport.1);
        canvas.blit_crop_nearest(frame, crop);
        self.visible = true;
        true
    }

    /// Hide the canvas.
    #[inline]
    pub const fn release(&mut self) {
        self.visible = false;
    }

    /// Whether the still is currently shown over the clips.
    #[inline]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// The captured still, while it is visible.
    #[inline]
    pub fn visible_canvas(&self) -> Option<&Frame> {
        self.canvas.as_ref().filter(|_| self.visible)
    }
}
