//! Petal servo driver (DS3218 hobby servo).
//!
//! Position is set by pulse width on a 50 Hz PWM channel: 0.5 ms at 0°
//! up to 2.5 ms at 180°, linear in between.  Works over any PWM channel
//! that implements `embedded_hal::pwm::SetDutyCycle`.
//!
//! ## Safety contract
//!
//! This driver only clamps to the servo's mechanical range.  The petal
//! ceiling (`max_angle_deg`) is enforced by [`FlowerDevice`]; this driver
//! is a dumb actuator.
//!
//! [`FlowerDevice`]: crate::device::FlowerDevice

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::MotorPort;
use crate::error::ActuatorError;

/// PWM period at 50 Hz.
pub const PERIOD_MS: f32 = 20.0;

/// Pulse-width and angle range of the servo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServoRange {
    pub min_pulse_ms: f32,
    pub max_pulse_ms: f32,
    pub min_angle_deg: f32,
    pub max_angle_deg: f32,
}

impl Default for ServoRange {
    fn default() -> Self {
        // DS3218 datasheet values.
        Self {
            min_pulse_ms: 0.5,
            max_pulse_ms: 2.5,
            min_angle_deg: 0.0,
            max_angle_deg: 180.0,
        }
    }
}

pub struct ServoDriver<P> {
    pwm: P,
    range: ServoRange,
    angle_deg: Option<f32>,
}

impl<P: SetDutyCycle> ServoDriver<P> {
    pub fn new(pwm: P, range: ServoRange) -> Self {
        Self {
            pwm,
            range,
            angle_deg: None,
        }
    }

    /// Pulse width (ms) for `degrees`, clamped to the servo range.
    pub fn pulse_ms(&self, degrees: f32) -> f32 {
        let r = &self.range;
        let deg = degrees.clamp(r.min_angle_deg, r.max_angle_deg);
        let span = r.max_angle_deg - r.min_angle_deg;
        let frac = if span > 0.0 {
            (deg - r.min_angle_deg) / span
        } else {
            0.0
        };
        r.min_pulse_ms + frac * (r.max_pulse_ms - r.min_pulse_ms)
    }

    /// Duty value for `degrees` relative to the channel's maximum duty.
    pub fn duty_for(&self, degrees: f32) -> u16 {
        let max = self.pwm.max_duty_cycle() as f32;
        (max * self.pulse_ms(degrees) / PERIOD_MS).round() as u16
    }

    /// Last successfully commanded angle.
    pub fn angle_deg(&self) -> Option<f32> {
        self.angle_deg
    }

    pub fn release(self) -> P {
        self.pwm
    }
}

impl<P: SetDutyCycle + Send> MotorPort for ServoDriver<P> {
    fn set_angle(&mut self, degrees: f32) -> Result<(), ActuatorError> {
        let duty = self.duty_for(degrees);
        self.pwm.set_duty_cycle(duty).map_err(|e| {
            warn!("Servo: duty write failed: {:?}", e);
            ActuatorError::PwmWriteFailed
        })?;
        self.angle_deg = Some(degrees.clamp(self.range.min_angle_deg, self.range.max_angle_deg));
        Ok(())
    }
}
