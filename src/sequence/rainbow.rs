//! Rainbow animation, shown while faces are being tracked.
//!
//! Every LED holds one hue; the whole wheel rotates by one LED per frame.

use super::{FrameTarget, Paint};
use crate::color::{Hsv, LedFrame, MAX_LEDS};

pub struct RainbowAnimation {
    opening: f32,
}

impl RainbowAnimation {
    pub fn new(opening: f32) -> Self {
        Self { opening }
    }

    pub fn render(&self, frame: u32, led_count: usize) -> FrameTarget {
        FrameTarget {
            opening: self.opening,
            paint: Paint::Pixels(wheel(frame, led_count)),
            complete: false,
        }
    }
}

/// Hue of LED `i` is `360 * ((i + frame) mod n) / n`.
pub fn wheel(frame: u32, led_count: usize) -> LedFrame {
    let n = led_count.min(MAX_LEDS);
    if n == 0 {
        return LedFrame::new();
    }
    let shift = frame as usize % n;
    (0..n)
        .map(|i| {
            let hue = 360.0 * ((i + shift) % n) as f32 / n as f32;
            Hsv::new(hue, 1.0, 1.0).to_rgb()
        })
        .collect()
}
