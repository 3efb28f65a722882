//! Expression animation (smile, wink): one solid hue at a fixed opening,
//! held for a fixed number of frames.

use super::{FrameTarget, Paint};
use crate::color::Hsv;

pub struct ExpressionAnimation {
    hue: f32,
    opening: f32,
    total_frames: u32,
}

impl ExpressionAnimation {
    pub fn new(hue: f32, opening: f32, total_frames: u32) -> Self {
        Self {
            hue,
            opening,
            total_frames,
        }
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    pub fn render(&self, frame: u32) -> FrameTarget {
        FrameTarget {
            opening: self.opening,
            paint: Paint::Solid(Hsv::new(self.hue, 1.0, 1.0)),
            complete: frame >= self.total_frames,
        }
    }
}
