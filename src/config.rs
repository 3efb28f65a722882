//! System configuration parameters
//!
//! All tunable parameters for the expression flower.  Defaults match the
//! reference device (26-LED APA102 ring, DS3218 servo, 320x240 camera).
//! Values can be overridden from a JSON file via [`ConfigPort`].
//!
//! [`ConfigPort`]: crate::app::ports::ConfigPort

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::color::MAX_LEDS;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowerConfig {
    // --- Device ---
    /// Hard ceiling on the petal servo angle (degrees).  Opening 1.0 maps here.
    pub max_angle_deg: f32,
    /// Number of LEDs on the strip.
    pub led_count: usize,
    /// APA102 global brightness (0-31).
    pub led_brightness: u8,

    // --- Timing ---
    /// Target interval between animation frames (milliseconds).
    pub frame_interval_ms: u64,
    /// How long the final frame of a finished sequence lingers (milliseconds).
    pub completion_delay_ms: u64,

    // --- Expressions ---
    /// Frame index at which an expression sequence is complete.
    pub expression_frames: u32,
    /// Hue shown for a smile (yellow).
    pub happy_hue: f32,
    /// Hue shown for a wink (pink).
    pub surprised_hue: f32,
    pub smile_opening: f32,
    pub wink_opening: f32,
    /// Opening held while faces are being tracked.
    pub rainbow_opening: f32,

    // --- Idle animation ---
    /// Opening change per idle frame.
    pub idle_step: f32,
    pub idle_band_low: f32,
    pub idle_band_high: f32,
    /// Chance (percent) per frame of reversing direction early.
    pub idle_reverse_percent: u8,
    /// Frames per full hue cycle of the idle gradient.
    pub idle_hue_period: u32,
    /// LEDs in the top band of the idle gradient.
    pub idle_top_leds: usize,
    /// Frame offset of the top band's hue.
    pub idle_top_offset: u32,

    // --- Classification ---
    pub smile_threshold: f32,
    pub eye_closed_threshold: f32,

    // --- Priority face selection ---
    pub frame_width: u32,
    pub frame_height: u32,
    /// Smallest bounding-box area (px^2) a priority face may have.
    pub min_face_area: f32,
    /// Padding (px) added on both sides of the central third of the frame.
    pub band_padding_px: f32,
    /// Weight of the horizontal term in the centre distance (0-1).
    pub horizontal_weight: f32,

    // --- Tracking ---
    /// Frames a vanished face is remembered before it is reaped.
    pub retain_frames: u64,
}

impl Default for FlowerConfig {
    fn default() -> Self {
        Self {
            // Device
            max_angle_deg: 50.0,
            led_count: 26,
            led_brightness: 31,

            // Timing
            frame_interval_ms: 80,     // 12.5 fps
            completion_delay_ms: 1000, // let the last frame linger

            // Expressions
            expression_frames: 35,
            happy_hue: 40.0,
            surprised_hue: 314.0,
            smile_opening: 1.0,
            wink_opening: 0.25,
            rainbow_opening: 0.75,

            // Idle
            idle_step: 0.0075,
            idle_band_low: 0.5,
            idle_band_high: 0.75,
            idle_reverse_percent: 15,
            idle_hue_period: 150,
            idle_top_leds: 6,
            idle_top_offset: 10,

            // Classification
            smile_threshold: 0.5,
            eye_closed_threshold: 0.2,

            // Priority
            frame_width: 320,
            frame_height: 240,
            min_face_area: 3000.0,
            band_padding_px: 20.0,
            horizontal_weight: 0.6,

            // Tracking
            retain_frames: 30,
        }
    }
}

impl FlowerConfig {
    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn unit(x: f32) -> bool {
            (0.0..=1.0).contains(&x)
        }

        if !(self.max_angle_deg > 0.0 && self.max_angle_deg <= 180.0) {
            return Err(ConfigError::ValidationFailed("max_angle_deg must be in (0, 180]"));
        }
        if self.led_count == 0 || self.led_count > MAX_LEDS {
            return Err(ConfigError::ValidationFailed("led_count must be between 1 and color::MAX_LEDS"));
        }
        if self.led_brightness > 31 {
            return Err(ConfigError::ValidationFailed("led_brightness must be <= 31"));
        }
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("frame_interval_ms must be > 0"));
        }
        if self.expression_frames == 0 {
            return Err(ConfigError::ValidationFailed("expression_frames must be > 0"));
        }
        if !(unit(self.smile_opening) && unit(self.wink_opening) && unit(self.rainbow_opening)) {
            return Err(ConfigError::ValidationFailed("openings must be in [0, 1]"));
        }
        if !(self.idle_step > 0.0 && self.idle_step < 0.5) {
            return Err(ConfigError::ValidationFailed("idle_step must be in (0, 0.5)"));
        }
        if !(unit(self.idle_band_low) && unit(self.idle_band_high))
            || self.idle_band_low >= self.idle_band_high
        {
            return Err(ConfigError::ValidationFailed("idle band must satisfy 0 <= low < high <= 1"));
        }
        if self.idle_reverse_percent > 100 {
            return Err(ConfigError::ValidationFailed("idle_reverse_percent must be <= 100"));
        }
        if self.idle_hue_period == 0 {
            return Err(ConfigError::ValidationFailed("idle_hue_period must be > 0"));
        }
        if !(unit(self.smile_threshold) && unit(self.eye_closed_threshold)) {
            return Err(ConfigError::ValidationFailed("thresholds must be in [0, 1]"));
        }
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(ConfigError::ValidationFailed("frame dimensions must be > 0"));
        }
        if self.min_face_area < 0.0 || self.band_padding_px < 0.0 {
            return Err(ConfigError::ValidationFailed("face area and padding must be >= 0"));
        }
        if !unit(self.horizontal_weight) {
            return Err(ConfigError::ValidationFailed("horizontal_weight must be in [0, 1]"));
        }
        Ok(())
    }
}
