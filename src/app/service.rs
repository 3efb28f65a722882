//! Application service: the hexagonal core.
//!
//! [`FlowerService`] owns the device and the expression state machine.
//! Every transition, whether requested by the face-ingestion thread or
//! fired by a sequence worker on completion, runs under one mutex, so
//! state reads/writes and the sequence swap are serialised.
//!
//! ```text
//!  FaceTracker ──request()──▶ ┌────────────────────────┐ ──▶ EventSink
//!                             │     FlowerService      │
//!  seq worker ──completion──▶ │  Mutex<ExpressionFsm>  │
//!                             └───────────┬────────────┘
//!                                         ▼
//!                          FlowerDevice (MotorPort, LedPort)
//! ```
//!
//! Cloning the service is cheap and yields a handle to the same flower.

use std::sync::{Arc, Mutex, Weak};

use log::{debug, info, warn};

use crate::config::FlowerConfig;
use crate::device::{FlowerDevice, lock};
use crate::fsm::{AmbientState, CompletionNotifier, ExpressionFsm, ExpressionState, TransitionOutcome};

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{EventSink, LedPort, MotorPort};

// ───────────────────────────────────────────────────────────────
// FlowerService
// ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct FlowerService {
    inner: Arc<Inner>,
}

struct Inner {
    device: Arc<FlowerDevice>,
    fsm: Mutex<ExpressionFsm>,
    /// Locked after `fsm` when both are held.  Sinks must not call back
    /// into the service.
    sink: Mutex<Box<dyn EventSink>>,
    config: FlowerConfig,
}

impl FlowerService {
    /// Build the service and drive the petals fully open once.
    ///
    /// Does **not** start a sequence: call [`start`](Self::start) next.
    pub fn new(
        motor: Box<dyn MotorPort>,
        leds: Box<dyn LedPort>,
        config: FlowerConfig,
        sink: Box<dyn EventSink>,
    ) -> Self {
        let device = Arc::new(FlowerDevice::new(motor, leds, config.max_angle_deg));
        if let Err(e) = device.force_opening(1.0) {
            warn!("Flower: initial opening failed: {}", e);
        }

        let inner = Arc::new_cyclic(|weak: &Weak<Inner>| {
            let weak = weak.clone();
            let notifier: CompletionNotifier = Arc::new(move |generation| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_sequence_completed(generation);
                }
            });
            let fsm = ExpressionFsm::new(device.clone(), config.clone(), notifier);
            Inner {
                device,
                fsm: Mutex::new(fsm),
                sink: Mutex::new(sink),
                config,
            }
        });
        Self { inner }
    }

    /// Enter the idle state.
    pub fn start(&self) -> TransitionOutcome {
        let outcome = self.request(ExpressionState::Idle);
        let state = self.current_state();
        info!("FlowerService started in {}", state);
        self.emit(&AppEvent::Started(state));
        outcome
    }

    // ── Transitions ───────────────────────────────────────────

    pub fn request(&self, state: ExpressionState) -> TransitionOutcome {
        self.inner.transition(state, false)
    }

    /// Re-enter `state` even when it is already current.
    pub fn request_forced(&self, state: ExpressionState) -> TransitionOutcome {
        self.inner.transition(state, true)
    }

    /// Stop the active sequence; every later request is a no-op.
    pub fn shutdown(&self) {
        let mut fsm = lock(&self.inner.fsm);
        if fsm.is_shut_down() {
            return;
        }
        fsm.shutdown();
        self.inner.emit(&AppEvent::ShutDown);
    }

    // ── Config mode ───────────────────────────────────────────

    pub fn set_config_mode(&self, on: bool) {
        let was = self.inner.device.config_mode();
        self.inner.device.set_config_mode(on);
        if was != on {
            self.emit(&AppEvent::ConfigModeChanged(on));
        }
    }

    pub fn config_mode(&self) -> bool {
        self.inner.device.config_mode()
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command.  Returns the transition outcome for
    /// state requests.
    pub fn handle_command(&self, cmd: AppCommand) -> Option<TransitionOutcome> {
        match cmd {
            AppCommand::RequestState(state) => Some(self.request(state)),
            AppCommand::SetConfigMode(on) => {
                self.set_config_mode(on);
                None
            }
            AppCommand::ToggleConfigMode => {
                self.set_config_mode(!self.config_mode());
                None
            }
            AppCommand::Shutdown => {
                self.shutdown();
                None
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn opening(&self) -> f32 {
        self.inner.device.opening()
    }

    pub fn current_state(&self) -> ExpressionState {
        lock(&self.inner.fsm).current_state()
    }

    pub fn underlying_state(&self) -> AmbientState {
        lock(&self.inner.fsm).underlying_state()
    }

    /// Frame counter of the live sequence, `None` when there is none.
    pub fn active_frame(&self) -> Option<u32> {
        lock(&self.inner.fsm).active().map(|seq| seq.frame())
    }

    /// Whether the live sequence has reached its final frame.
    pub fn active_complete(&self) -> Option<bool> {
        lock(&self.inner.fsm).active().map(|seq| seq.is_complete())
    }

    pub fn is_shut_down(&self) -> bool {
        lock(&self.inner.fsm).is_shut_down()
    }

    pub fn config(&self) -> &FlowerConfig {
        &self.inner.config
    }

    pub fn device(&self) -> &FlowerDevice {
        &self.inner.device
    }

    /// Forward an event from a collaborator (e.g. the face tracker).
    pub fn emit(&self, event: &AppEvent) {
        self.inner.emit(event);
    }
}

impl Inner {
    fn transition(&self, state: ExpressionState, force: bool) -> TransitionOutcome {
        let mut fsm = lock(&self.fsm);
        let from = fsm.current_state();
        let outcome = if force {
            fsm.request_forced(state)
        } else {
            fsm.request(state)
        };
        self.report(from, state, outcome);
        outcome
    }

    /// Completion path, on the finished sequence's worker thread.
    fn on_sequence_completed(&self, generation: u64) {
        let mut fsm = lock(&self.fsm);
        let finished = fsm.current_state();
        let resume: ExpressionState = fsm.underlying_state().into();
        match fsm.on_sequence_completed(generation) {
            Some(outcome) => {
                self.emit(&AppEvent::SequenceCompleted(finished));
                self.report(finished, resume, outcome);
            }
            None => debug!("FlowerService: stale completion (generation {})", generation),
        }
    }

    fn report(&self, from: ExpressionState, requested: ExpressionState, outcome: TransitionOutcome) {
        match outcome {
            TransitionOutcome::Started => self.emit(&AppEvent::StateChanged { from, to: requested }),
            TransitionOutcome::Refused => self.emit(&AppEvent::TransitionRefused {
                requested,
                current: from,
            }),
            TransitionOutcome::Failed(error) => self.emit(&AppEvent::SequenceFailed {
                state: requested,
                error,
            }),
            TransitionOutcome::Unchanged | TransitionOutcome::ShutDown => {}
        }
    }

    fn emit(&self, event: &AppEvent) {
        lock(&self.sink).emit(event);
    }
}
