//! Priority-face selection with hysteresis.
//!
//! ```text
//!   0        86        160        232       320   (default 320 px frame)
//!   ├─────────┼─────────┼──────────┼─────────┤
//!   │  edge   │   priority band    │  edge   │
//!   │ never   │   (centre third    │ never   │
//!   │ chosen  │    ± padding)      │ chosen  │
//! ```
//!
//! A face is *valid* when its box area exceeds the minimum and its
//! horizontal centre lies strictly inside the band.  Once a face is
//! priority it is kept for as long as it stays visible and valid, even
//! if another face moves closer to the centre.

use std::collections::BTreeMap;

use super::{BoundingBox, FaceObservation, TrackingId};
use crate::config::FlowerConfig;

/// Chosen face and the weighted distance it was chosen at.  `distance`
/// is `None` when no distance was computed (single face, or none).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PriorityTarget {
    pub id: Option<TrackingId>,
    pub distance: Option<f32>,
}

pub struct PrioritySelector {
    center_x: f32,
    center_y: f32,
    band_left: f32,
    band_right: f32,
    min_area: f32,
    horizontal_weight: f32,
    target: PriorityTarget,
}

impl PrioritySelector {
    pub fn new(config: &FlowerConfig) -> Self {
        // Integer pixel bounds, as the camera reports them.
        let third = (config.frame_width / 3) as f32;
        Self {
            center_x: (config.frame_width / 2) as f32,
            center_y: (config.frame_height / 2) as f32,
            band_left: third - config.band_padding_px,
            band_right: third * 2.0 + config.band_padding_px,
            min_area: config.min_face_area,
            horizontal_weight: config.horizontal_weight,
            target: PriorityTarget::default(),
        }
    }

    pub fn target(&self) -> PriorityTarget {
        self.target
    }

    pub fn priority(&self) -> Option<TrackingId> {
        self.target.id
    }

    /// Exclusive bounds of the priority band.
    pub fn band(&self) -> (f32, f32) {
        (self.band_left, self.band_right)
    }

    pub fn is_valid(&self, bounds: &BoundingBox) -> bool {
        bounds.area() > self.min_area
            && bounds.center_x > self.band_left
            && bounds.center_x < self.band_right
    }

    /// `sqrt(w·dx² + (1−w)·dy²)` from the frame centre.
    pub fn weighted_distance(&self, bounds: &BoundingBox) -> f32 {
        let dx = bounds.center_x - self.center_x;
        let dy = bounds.center_y - self.center_y;
        let w = self.horizontal_weight;
        (w * dx * dx + (1.0 - w) * dy * dy).sqrt()
    }

    pub fn clear(&mut self) {
        self.target = PriorityTarget::default();
    }

    /// Choose the priority face for this frame.
    ///
    /// `current` holds the faces visible now, `known` the last-known
    /// geometry of every recently seen face.
    pub fn update(
        &mut self,
        current: &BTreeMap<TrackingId, FaceObservation>,
        known: &BTreeMap<TrackingId, FaceObservation>,
    ) -> Option<TrackingId> {
        match current.len() {
            0 => self.clear(),
            1 => {
                // A lone face is priority regardless of size or position.
                let id = current.keys().next().copied();
                self.target = PriorityTarget { id, distance: None };
            }
            _ => {
                if !self.is_stable(current, known) {
                    self.reselect(current, known);
                }
            }
        }
        self.target.id
    }

    fn is_stable(
        &self,
        current: &BTreeMap<TrackingId, FaceObservation>,
        known: &BTreeMap<TrackingId, FaceObservation>,
    ) -> bool {
        let Some(id) = self.target.id else {
            return false;
        };
        if !current.contains_key(&id) {
            return false;
        }
        known.get(&id).is_some_and(|face| self.is_valid(&face.bounds))
    }

    fn reselect(
        &mut self,
        current: &BTreeMap<TrackingId, FaceObservation>,
        known: &BTreeMap<TrackingId, FaceObservation>,
    ) {
        let mut best: Option<(TrackingId, f32)> = None;
        for (id, face) in known {
            if !current.contains_key(id) || !self.is_valid(&face.bounds) {
                continue;
            }
            let d = self.weighted_distance(&face.bounds);
            if best.is_none_or(|(_, best_d)| d < best_d) {
                best = Some((*id, d));
            }
        }
        self.target = match best {
            Some((id, d)) => PriorityTarget {
                id: Some(id),
                distance: Some(d),
            },
            None => PriorityTarget::default(),
        };
    }
}
