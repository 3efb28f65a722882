//! Colour helpers for the LED array.
//!
//! The strip takes packed 8-bit RGB triples; animations think in HSV
//! (hue in degrees, saturation and value in 0.0–1.0).  Conversion goes
//! through `palette`'s sRGB and HSV types.

use palette::{FromColor, Srgb};

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

/// Maximum number of LEDs a single frame can address.
pub const MAX_LEDS: usize = 64;

/// One full frame of LED colours.  Stack-allocated, no heap.
pub type LedFrame = heapless::Vec<Rgb, MAX_LEDS>;

/// Hue / saturation / value triple.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsv {
    /// Hue in degrees, 0.0–360.0.
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

impl Hsv {
    pub const fn new(hue: f32, saturation: f32, value: f32) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }

    pub fn to_rgb(self) -> Rgb {
        hsv_to_rgb(self.hue, self.saturation, self.value)
    }
}

/// Convert HSV to 8-bit RGB.  Hue wraps modulo 360; saturation and value
/// are clamped to 0.0–1.0.
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Rgb {
    let hsv = palette::Hsv::new(hue.rem_euclid(360.0), saturation.clamp(0.0, 1.0), value.clamp(0.0, 1.0));
    let rgb: Srgb<u8> = Srgb::from_color(hsv).into_format();
    (rgb.red, rgb.green, rgb.blue)
}

/// Convert 8-bit RGB back to HSV.  Greys report hue 0.
pub fn rgb_to_hsv((r, g, b): Rgb) -> Hsv {
    let rgb: Srgb<f32> = Srgb::new(r, g, b).into_format();
    let hsv = palette::Hsv::from_color(rgb);
    let hue = hsv.hue.into_positive_degrees();
    // Rounding can land a hair under zero and wrap to exactly 360.
    let hue = if hue >= 360.0 { 0.0 } else { hue };
    Hsv::new(hue, hsv.saturation.clamp(0.0, 1.0), hsv.value.clamp(0.0, 1.0))
}

/// A frame of `len` LEDs all set to `colour`.  `len` is capped at
/// [`MAX_LEDS`].
pub fn solid_frame(colour: Rgb, len: usize) -> LedFrame {
    let mut frame = LedFrame::new();
    for _ in 0..len.min(MAX_LEDS) {
        // Capacity is checked by the bound above.
        let _ = frame.push(colour);
    }
    frame
}
