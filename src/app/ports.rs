//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ FlowerService (domain)
//! ```
//!
//! Driven adapters (servo, LED strip, event sinks, config storage)
//! implement these traits.  The [`FlowerDevice`](crate::device::FlowerDevice)
//! owns the actuator ports behind one writer lock each, so the domain core
//! never touches hardware directly and concurrent writers never interleave.

use crate::color::{LedFrame, Rgb, hsv_to_rgb, solid_frame};
use crate::config::FlowerConfig;
use crate::error::ActuatorError;

// ───────────────────────────────────────────────────────────────
// Motor port (driven adapter: domain → servo)
// ───────────────────────────────────────────────────────────────

/// Petal motor.  Implementations must tolerate rapid successive calls.
pub trait MotorPort: Send {
    /// Drive the petals to `degrees`.  The device clamps to its own
    /// maximum angle before calling.
    fn set_angle(&mut self, degrees: f32) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// LED port (driven adapter: domain → LED strip)
// ───────────────────────────────────────────────────────────────

/// LED array.  A call writes the whole strip or nothing.
pub trait LedPort: Send {
    /// Number of LEDs on the strip (fixed per device).
    fn led_count(&self) -> usize;

    /// Write one colour per LED.  `colors.len()` must equal [`led_count`].
    ///
    /// [`led_count`]: LedPort::led_count
    fn set_colors(&mut self, colors: &[Rgb]) -> Result<(), ActuatorError>;

    /// Fill the strip with a single HSV colour.
    fn set_solid_color(
        &mut self,
        hue: f32,
        saturation: f32,
        brightness: f32,
    ) -> Result<(), ActuatorError> {
        let frame: LedFrame = solid_frame(hsv_to_rgb(hue, saturation, brightness), self.led_count());
        self.set_colors(&frame)
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / overlay)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Called from the ingestion thread and from sequence
/// worker threads, hence `Send`.
pub trait EventSink: Send {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate before persisting and reject invalid
/// ranges with [`ConfigError::ValidationFailed`] instead of clamping.
pub trait ConfigPort {
    /// Load configuration.  Returns [`FlowerConfig::default()`] if no
    /// stored config exists.
    fn load(&self) -> Result<FlowerConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &FlowerConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage.
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
