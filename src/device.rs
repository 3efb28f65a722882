//! The physical flower: petal opening, LED colour, and config mode.
//!
//! Each actuator sits behind its own writer lock so a sequence worker and
//! the ingestion thread can never interleave partial LED-array updates or
//! motor writes.  Logical state (opening, colour) is only updated after
//! the hardware write succeeds, leaving the device in its last-known
//! state when an actuator fails.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::info;

use crate::app::ports::{LedPort, MotorPort};
use crate::color::{Hsv, Rgb, rgb_to_hsv};
use crate::error::ActuatorError;

/// Current logical appearance of the flower.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Appearance {
    /// Petal aperture, 0.0 (closed) to 1.0 (fully open).
    pub opening: f32,
    /// Colour of the first LED (the whole strip for solid colours).
    pub colour: Hsv,
}

pub struct FlowerDevice {
    motor: Mutex<Box<dyn MotorPort>>,
    leds: Mutex<Box<dyn LedPort>>,
    appearance: Mutex<Appearance>,
    max_angle_deg: f32,
    config_mode: AtomicBool,
}

impl FlowerDevice {
    pub fn new(motor: Box<dyn MotorPort>, leds: Box<dyn LedPort>, max_angle_deg: f32) -> Self {
        Self {
            motor: Mutex::new(motor),
            leds: Mutex::new(leds),
            appearance: Mutex::new(Appearance::default()),
            max_angle_deg,
            config_mode: AtomicBool::new(false),
        }
    }

    // ── Opening ───────────────────────────────────────────────

    /// Set how open the petals are.  Clamped to [0, 1]; a value equal to
    /// the current opening issues no motor write.
    pub fn set_opening(&self, opening: f32) -> Result<(), ActuatorError> {
        self.write_opening(opening, false)
    }

    /// Drive the petals to `opening` even if it equals the current value.
    pub fn force_opening(&self, opening: f32) -> Result<(), ActuatorError> {
        self.write_opening(opening, true)
    }

    pub fn opening(&self) -> f32 {
        lock(&self.appearance).opening
    }

    pub fn max_angle_deg(&self) -> f32 {
        self.max_angle_deg
    }

    fn write_opening(&self, opening: f32, force: bool) -> Result<(), ActuatorError> {
        let opening = opening.clamp(0.0, 1.0);
        // Hold the motor lock across the compare so two writers cannot race
        // the skip check.
        let mut motor = lock(&self.motor);
        if !force && lock(&self.appearance).opening.total_cmp(&opening).is_eq() {
            return Ok(());
        }
        let degrees = (self.max_angle_deg * opening).clamp(0.0, self.max_angle_deg);
        motor.set_angle(degrees)?;
        lock(&self.appearance).opening = opening;
        Ok(())
    }

    // ── LEDs ──────────────────────────────────────────────────

    /// Fill the strip with one colour.  Hue is clamped to [0, 359],
    /// saturation to [0.5, 1], brightness to [0, 1].
    pub fn set_hsv(&self, hue: f32, saturation: f32, brightness: f32) -> Result<(), ActuatorError> {
        let colour = Hsv::new(
            hue.clamp(0.0, 359.0),
            saturation.clamp(0.5, 1.0),
            brightness.clamp(0.0, 1.0),
        );
        lock(&self.leds).set_solid_color(colour.hue, colour.saturation, colour.value)?;
        lock(&self.appearance).colour = colour;
        Ok(())
    }

    /// Write one colour per LED.
    pub fn set_leds(&self, colors: &[Rgb]) -> Result<(), ActuatorError> {
        lock(&self.leds).set_colors(colors)?;
        if let Some(first) = colors.first() {
            lock(&self.appearance).colour = rgb_to_hsv(*first);
        }
        Ok(())
    }

    pub fn led_count(&self) -> usize {
        lock(&self.leds).led_count()
    }

    pub fn appearance(&self) -> Appearance {
        *lock(&self.appearance)
    }

    // ── Config mode ───────────────────────────────────────────

    /// Config mode holds the petals fully open on every frame, whatever
    /// the running sequence wants.
    pub fn set_config_mode(&self, on: bool) {
        let was = self.config_mode.swap(on, Ordering::SeqCst);
        if was != on {
            info!("Flower: config mode {}", if on { "on" } else { "off" });
        }
    }

    pub fn config_mode(&self) -> bool {
        self.config_mode.load(Ordering::SeqCst)
    }
}

/// Lock, recovering from poisoning: a panicked writer cannot leave the
/// plain-data state behind these locks inconsistent.
pub(crate) fn lock<T: ?Sized>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
