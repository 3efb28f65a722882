//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade.  An overlay renderer would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={}", state);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {} -> {}", from, to);
            }
            AppEvent::TransitionRefused { requested, current } => {
                info!("STATE | {} refused, {} still running", requested, current);
            }
            AppEvent::SequenceFailed { state, error } => {
                warn!("SEQ   | {} failed to start: {}", state, error);
            }
            AppEvent::SequenceCompleted(state) => {
                info!("SEQ   | {} complete", state);
            }
            AppEvent::ConfigModeChanged(on) => {
                info!("CONFIG| mode {}", if *on { "on" } else { "off" });
            }
            AppEvent::PriorityChanged { from, to } => {
                info!("FACE  | priority {:?} -> {:?}", from.map(|id| id.0), to.map(|id| id.0));
            }
            AppEvent::ShutDown => {
                info!("STOP  | shut down");
            }
        }
    }
}
