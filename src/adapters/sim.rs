//! In-memory actuators for host runs.
//!
//! Both adapters keep what the hardware would show and log each write at
//! `trace` level, so a simulator run at `FLOWER_LOG=trace` doubles as an
//! actuator timeline.

use log::trace;

use crate::app::ports::{LedPort, MotorPort};
use crate::color::{Rgb, rgb_to_hsv};
use crate::error::ActuatorError;

#[derive(Debug, Default)]
pub struct SimMotor {
    angle_deg: Option<f32>,
    writes: u64,
}

impl SimMotor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn angle_deg(&self) -> Option<f32> {
        self.angle_deg
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl MotorPort for SimMotor {
    fn set_angle(&mut self, degrees: f32) -> Result<(), ActuatorError> {
        self.angle_deg = Some(degrees);
        self.writes += 1;
        trace!("SimMotor: {:.2} deg", degrees);
        Ok(())
    }
}

#[derive(Debug)]
pub struct SimLeds {
    colors: Vec<Rgb>,
    writes: u64,
}

impl SimLeds {
    pub fn new(led_count: usize) -> Self {
        Self {
            colors: vec![(0, 0, 0); led_count],
            writes: 0,
        }
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl LedPort for SimLeds {
    fn led_count(&self) -> usize {
        self.colors.len()
    }

    fn set_colors(&mut self, colors: &[Rgb]) -> Result<(), ActuatorError> {
        if colors.len() != self.colors.len() {
            return Err(ActuatorError::LedCountMismatch {
                expected: self.colors.len(),
                got: colors.len(),
            });
        }
        self.colors.copy_from_slice(colors);
        self.writes += 1;
        if let Some(first) = colors.first() {
            trace!("SimLeds: first LED hue {:.0}", rgb_to_hsv(*first).hue);
        }
        Ok(())
    }
}
