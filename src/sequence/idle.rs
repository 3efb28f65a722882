//! Idle animation: the perpetual ambient breathing of the flower.
//!
//! ```text
//!  opening
//!   0.75 ┤   ╱╲      ╱╲╱╲
//!        │  ╱  ╲    ╱    ╲      ← reverses at the band edges,
//!   0.50 ┤ ╱    ╲╱╲╱      ╲╱      or early at random
//!        └────────────────────▶ frame
//! ```
//!
//! LEDs show a two-band vertical rainbow: the top few LEDs run a fixed
//! number of frames ahead of the rest.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::{FrameTarget, Paint};
use crate::color::{Hsv, LedFrame, MAX_LEDS};
use crate::config::FlowerConfig;

pub struct IdleAnimation {
    step: f32,
    band_low: f32,
    band_high: f32,
    reverse_percent: u8,
    hue_period: u32,
    top_leds: usize,
    top_offset: u32,
    rng: SmallRng,
}

impl IdleAnimation {
    pub fn new(config: &FlowerConfig) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    /// Deterministic jitter, for tests and replays.
    pub fn with_seed(config: &FlowerConfig, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: &FlowerConfig, rng: SmallRng) -> Self {
        Self {
            step: config.idle_step,
            band_low: config.idle_band_low,
            band_high: config.idle_band_high,
            reverse_percent: config.idle_reverse_percent,
            hue_period: config.idle_hue_period.max(1),
            top_leds: config.idle_top_leds,
            top_offset: config.idle_top_offset,
            rng,
        }
    }

    /// Signed opening change applied on the next frame.
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Render one frame.  While `held_open` the petals stay fully open and
    /// the breathing direction is left as it was.
    pub fn render(&mut self, frame: u32, opening: f32, led_count: usize, held_open: bool) -> FrameTarget {
        let opening = if held_open {
            1.0
        } else {
            let roll: u8 = self.rng.gen_range(1..=100);
            let jitter = roll > 100 - self.reverse_percent.min(100);
            let below = opening <= self.band_low && self.step < 0.0;
            let above = opening >= self.band_high && self.step > 0.0;
            if below || above || jitter {
                self.step = -self.step;
            }
            opening + self.step
        };

        FrameTarget {
            opening,
            paint: Paint::Pixels(self.gradient(frame, led_count)),
            complete: false,
        }
    }

    fn gradient(&self, frame: u32, led_count: usize) -> LedFrame {
        let hue_at = |f: u32| 360.0 * (f % self.hue_period) as f32 / self.hue_period as f32;
        let top = Hsv::new(hue_at(frame.wrapping_add(self.top_offset)), 1.0, 1.0).to_rgb();
        let rest = Hsv::new(hue_at(frame), 1.0, 1.0).to_rgb();

        (0..led_count.min(MAX_LEDS))
            .map(|i| if i < self.top_leds { top } else { rest })
            .collect()
    }
}
