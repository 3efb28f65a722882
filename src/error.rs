//! Unified error types for the flower control engine.
//!
//! A single `Error` enum that every subsystem can convert into, keeping
//! the transition and frame-loop error handling uniform.  All variants
//! are `Copy` so they can be logged, emitted as events, and carried
//! across the worker threads without allocation.

use core::fmt;

use crate::app::ports::ConfigError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the engine funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A motor or LED write failed.
    Actuator(ActuatorError),
    /// A sequence could not be built or started.
    Sequence(SequenceError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Sequence(e) => write!(f, "sequence: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// Servo PWM duty-cycle write failed.
    PwmWriteFailed,
    /// LED strip SPI transfer failed.
    SpiWriteFailed,
    /// Colour array length does not match the strip length.
    LedCountMismatch { expected: usize, got: usize },
    /// The actuator is no longer reachable.
    Disconnected,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::SpiWriteFailed => write!(f, "SPI write failed"),
            Self::LedCountMismatch { expected, got } => {
                write!(f, "LED count mismatch (expected {expected}, got {got})")
            }
            Self::Disconnected => write!(f, "actuator disconnected"),
        }
    }
}

impl std::error::Error for ActuatorError {}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Sequence construction errors
// ---------------------------------------------------------------------------

/// Failures while building or starting a sequence.  A transition that hits
/// one of these is rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceError {
    /// The frame worker thread could not be spawned.
    Spawn,
    /// The sequence was already stopped; a fresh instance is required.
    Stopped,
    /// `start()` was called twice on the same instance.
    AlreadyStarted,
    /// The configured LED count exceeds the frame buffer capacity.
    FrameCapacity { requested: usize, capacity: usize },
}

impl fmt::Display for SequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn => write!(f, "frame worker spawn failed"),
            Self::Stopped => write!(f, "sequence already stopped"),
            Self::AlreadyStarted => write!(f, "sequence already started"),
            Self::FrameCapacity {
                requested,
                capacity,
            } => write!(f, "{requested} LEDs exceed frame capacity {capacity}"),
        }
    }
}

impl std::error::Error for SequenceError {}

impl From<SequenceError> for Error {
    fn from(e: SequenceError) -> Self {
        Self::Sequence(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
