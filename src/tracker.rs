//! Per-camera-frame face ingestion.
//!
//! [`FaceTracker`] turns each batch of detector output into requests on
//! the [`FlowerService`]:
//!
//! ```text
//!  faces ──▶ current / known maps ──▶ stimulus ──▶ request(Idle|Detecting)
//!                    │
//!                    └──▶ PrioritySelector ──▶ priority face
//!                                                  │
//!                         Classifier ◀─────────────┘
//!                             │
//!                             └──▶ request(Smile), request(Wink)
//! ```
//!
//! Known faces are reaped only after the frame's selection work is done,
//! so every visible id is also known while the selector reads the maps.

use std::collections::BTreeMap;

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::service::FlowerService;
use crate::config::FlowerConfig;
use crate::faces::classify::Classifier;
use crate::faces::priority::PrioritySelector;
use crate::faces::{FaceObservation, TrackingId};
use crate::fsm::{ExpressionState, TransitionOutcome};

/// Coarse classification of a frame by number of visible faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stimulus {
    NoFace,
    OneFace,
    MultipleFaces,
}

impl Stimulus {
    pub fn of(visible: usize) -> Self {
        match visible {
            0 => Self::NoFace,
            1 => Self::OneFace,
            _ => Self::MultipleFaces,
        }
    }

    /// The ambient state this stimulus asks for.
    pub fn ambient(self) -> ExpressionState {
        match self {
            Self::NoFace => ExpressionState::Idle,
            Self::OneFace | Self::MultipleFaces => ExpressionState::Detecting,
        }
    }
}

/// What happened during one frame, for the caller's overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub stimulus: Stimulus,
    /// Outcome of the ambient request.
    pub ambient: TransitionOutcome,
    pub priority: Option<TrackingId>,
    /// Expression requests made for the priority face, in order.
    pub expressions: heapless::Vec<(ExpressionState, TransitionOutcome), 2>,
    /// Ids forgotten at the end of this frame.
    pub reaped: Vec<TrackingId>,
}

pub struct FaceTracker {
    selector: PrioritySelector,
    classifier: Classifier,
    current: BTreeMap<TrackingId, FaceObservation>,
    known: BTreeMap<TrackingId, FaceObservation>,
    last_seen: BTreeMap<TrackingId, u64>,
    retain_frames: u64,
    frame: u64,
}

impl FaceTracker {
    pub fn new(config: &FlowerConfig) -> Self {
        Self {
            selector: PrioritySelector::new(config),
            classifier: Classifier::new(config),
            current: BTreeMap::new(),
            known: BTreeMap::new(),
            last_seen: BTreeMap::new(),
            retain_frames: config.retain_frames,
            frame: 0,
        }
    }

    /// Ingest one frame of detector output.
    pub fn process_frame(&mut self, faces: &[FaceObservation], service: &FlowerService) -> FrameReport {
        self.frame += 1;

        self.current.clear();
        for face in faces {
            self.current.insert(face.id, *face);
            self.known.insert(face.id, *face);
            self.last_seen.insert(face.id, self.frame);
        }

        let stimulus = Stimulus::of(self.current.len());
        let ambient = service.request(stimulus.ambient());

        let previous = self.selector.priority();
        let priority = self.selector.update(&self.current, &self.known);
        if previous != priority {
            info!(
                "Tracker: priority {} -> {}",
                fmt_id(previous),
                fmt_id(priority)
            );
            service.emit(&AppEvent::PriorityChanged {
                from: previous,
                to: priority,
            });
        }

        let mut expressions = heapless::Vec::new();
        if let Some(face) = priority.and_then(|id| self.current.get(&id)) {
            for state in self.classifier.classify(face) {
                let outcome = service.request(state);
                debug!("Tracker: {} shows {} ({:?})", face.id, state, outcome);
                let _ = expressions.push((state, outcome));
            }
        }

        let reaped = self.reap_stale();

        FrameReport {
            frame: self.frame,
            stimulus,
            ambient,
            priority,
            expressions,
            reaped,
        }
    }

    /// Forget `id`.  Returns whether it was known.
    pub fn reap(&mut self, id: TrackingId) -> bool {
        self.last_seen.remove(&id);
        self.known.remove(&id).is_some()
    }

    pub fn priority(&self) -> Option<TrackingId> {
        self.selector.priority()
    }

    pub fn selector(&self) -> &PrioritySelector {
        &self.selector
    }

    pub fn is_known(&self, id: TrackingId) -> bool {
        self.known.contains_key(&id)
    }

    pub fn current_ids(&self) -> impl Iterator<Item = TrackingId> + '_ {
        self.current.keys().copied()
    }

    pub fn known_ids(&self) -> impl Iterator<Item = TrackingId> + '_ {
        self.known.keys().copied()
    }

    fn reap_stale(&mut self) -> Vec<TrackingId> {
        let frame = self.frame;
        let retain = self.retain_frames;
        let stale: Vec<TrackingId> = self
            .last_seen
            .iter()
            .filter(|&(_, &seen)| frame - seen > retain)
            .map(|(&id, _)| id)
            .collect();
        for id in &stale {
            self.reap(*id);
        }
        stale
    }
}

fn fmt_id(id: Option<TrackingId>) -> String {
    id.map_or_else(|| "none".into(), |id| id.to_string())
}
