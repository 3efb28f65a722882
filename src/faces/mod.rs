//! Face observations as delivered by the external face detector.
//!
//! Probabilities the detector could not compute arrive as a negative
//! sentinel; they are stored as `None` and never used for classification.

pub mod classify;
pub mod priority;

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Persistent per-face identifier assigned by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingId(pub i32);

impl fmt::Display for TrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Axis-aligned box in camera pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub center_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(center_x: f32, center_y: f32, width: f32, height: f32) -> Self {
        Self {
            center_x,
            center_y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceObservation {
    pub id: TrackingId,
    pub bounds: BoundingBox,
    #[serde(default, deserialize_with = "de_probability")]
    pub smiling: Option<f32>,
    #[serde(default, deserialize_with = "de_probability")]
    pub left_eye_open: Option<f32>,
    #[serde(default, deserialize_with = "de_probability")]
    pub right_eye_open: Option<f32>,
}

impl FaceObservation {
    /// Observation without classification data.
    pub fn new(id: TrackingId, bounds: BoundingBox) -> Self {
        Self {
            id,
            bounds,
            smiling: None,
            left_eye_open: None,
            right_eye_open: None,
        }
    }

    /// Build from raw detector output, where `-1` means "unknown".
    pub fn from_raw(id: i32, bounds: BoundingBox, smiling: f32, left_eye_open: f32, right_eye_open: f32) -> Self {
        Self {
            id: TrackingId(id),
            bounds,
            smiling: probability(smiling),
            left_eye_open: probability(left_eye_open),
            right_eye_open: probability(right_eye_open),
        }
    }

    pub fn with_smiling(mut self, p: f32) -> Self {
        self.smiling = probability(p);
        self
    }

    pub fn with_eyes(mut self, left_open: f32, right_open: f32) -> Self {
        self.left_eye_open = probability(left_open);
        self.right_eye_open = probability(right_open);
        self
    }
}

/// A raw probability, or `None` for the sentinel and anything outside [0, 1].
pub fn probability(raw: f32) -> Option<f32> {
    (raw.is_finite() && (0.0..=1.0).contains(&raw)).then_some(raw)
}

fn de_probability<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f32>, D::Error> {
    Ok(Option::<f32>::deserialize(d)?.and_then(probability))
}
