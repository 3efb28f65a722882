//! Expression classification for the priority face.

use super::FaceObservation;
use crate::config::FlowerConfig;
use crate::fsm::ExpressionState;

/// Expressions a face can show, in the order they are requested.
pub type Expressions = heapless::Vec<ExpressionState, 2>;

pub struct Classifier {
    smile_threshold: f32,
    eye_closed_threshold: f32,
}

impl Classifier {
    pub fn new(config: &FlowerConfig) -> Self {
        Self {
            smile_threshold: config.smile_threshold,
            eye_closed_threshold: config.eye_closed_threshold,
        }
    }

    pub fn is_smiling(&self, face: &FaceObservation) -> bool {
        face.smiling.is_some_and(|p| p > self.smile_threshold)
    }

    /// One eye known closed while the other is known open.
    pub fn is_winking(&self, face: &FaceObservation) -> bool {
        let closed = |p: Option<f32>| p.is_some_and(|p| p < self.eye_closed_threshold);
        let open = |p: Option<f32>| p.is_some_and(|p| p > self.eye_closed_threshold);
        (closed(face.right_eye_open) && open(face.left_eye_open))
            || (closed(face.left_eye_open) && open(face.right_eye_open))
    }

    /// Smile first, then wink.
    pub fn classify(&self, face: &FaceObservation) -> Expressions {
        let mut out = Expressions::new();
        if self.is_smiling(face) {
            let _ = out.push(ExpressionState::Smile);
        }
        if self.is_winking(face) {
            let _ = out.push(ExpressionState::Wink);
        }
        out
    }
}
