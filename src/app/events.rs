//! Outbound application events.
//!
//! The [`FlowerService`](super::service::FlowerService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them: log to the console, drive
//! an overlay, record them in a test.

use crate::error::SequenceError;
use crate::faces::TrackingId;
use crate::fsm::ExpressionState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries the initial state).
    Started(ExpressionState),

    /// A new sequence is running.
    StateChanged {
        from: ExpressionState,
        to: ExpressionState,
    },

    /// A request hit a sequence that may not be interrupted.
    TransitionRefused {
        requested: ExpressionState,
        current: ExpressionState,
    },

    /// The sequence for `state` could not be built or started.
    SequenceFailed {
        state: ExpressionState,
        error: SequenceError,
    },

    /// A transient sequence ran to completion.
    SequenceCompleted(ExpressionState),

    ConfigModeChanged(bool),

    /// The priority face changed (`None`: no face prioritised).
    PriorityChanged {
        from: Option<TrackingId>,
        to: Option<TrackingId>,
    },

    ShutDown,
}
