//! Expression state machine.
//!
//! Table-driven: every [`ExpressionState`] has one [`StateDescriptor`]
//! row naming the sequence it runs.  The engine owns the single live
//! [`Sequence`] and decides, per request, whether to keep it, interrupt
//! it, or refuse the request.
//!
//! ```text
//!  request(s) ─┬─ shut down? ──────────────────────────▶ ShutDown
//!              ├─ s ambient? → underlying := s
//!              ├─ s == current && live sequence ───────▶ Unchanged
//!              ├─ live sequence not interruptible
//!              │  and not complete ────────────────────▶ Refused
//!              └─ stop old, build + start new ─┬─ ok ──▶ Started
//!                                              └─ err ─▶ Failed
//! ```
//!
//! Completion of a sequence comes back as
//! [`on_sequence_completed`](ExpressionFsm::on_sequence_completed), which
//! forces a transition back to the underlying ambient state.

pub mod states;

use std::fmt;
use std::sync::Arc;

use log::{error, info};

use crate::config::FlowerConfig;
use crate::device::FlowerDevice;
use crate::error::SequenceError;
use crate::sequence::{Animation, Sequence, SequenceTiming};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all expression states.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum ExpressionState {
    Undefined = 0,
    Idle = 1,
    Detecting = 2,
    Indifference = 3,
    Smile = 4,
    Wink = 5,
}

impl ExpressionState {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 6;
}

impl fmt::Display for ExpressionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Baseline behaviour resumed after a transient expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmbientState {
    Idle,
    Detecting,
}

impl AmbientState {
    pub fn of(state: ExpressionState) -> Option<Self> {
        match state {
            ExpressionState::Idle => Some(Self::Idle),
            ExpressionState::Detecting => Some(Self::Detecting),
            _ => None,
        }
    }
}

impl From<AmbientState> for ExpressionState {
    fn from(a: AmbientState) -> Self {
        match a {
            AmbientState::Idle => Self::Idle,
            AmbientState::Detecting => Self::Detecting,
        }
    }
}

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Builds the animation a state runs.
pub type SequenceRecipe = fn(&FlowerConfig) -> Animation;

pub struct StateDescriptor {
    pub id: ExpressionState,
    pub name: &'static str,
    pub recipe: SequenceRecipe,
}

// ---------------------------------------------------------------------------
// Transition results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// A new sequence is running for the requested state.
    Started,
    /// Already in the requested state; live sequence kept as is.
    Unchanged,
    /// The live sequence may not be interrupted.
    Refused,
    /// Building or starting the new sequence failed.  The old sequence
    /// is gone and the current state is unchanged.
    Failed(SequenceError),
    /// The machine has been shut down.
    ShutDown,
}

/// Called with a sequence's generation when it completes.
pub type CompletionNotifier = Arc<dyn Fn(u64) + Send + Sync>;

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct ExpressionFsm {
    table: [StateDescriptor; ExpressionState::COUNT],
    device: Arc<FlowerDevice>,
    config: FlowerConfig,
    timing: SequenceTiming,
    notifier: CompletionNotifier,
    current: ExpressionState,
    underlying: AmbientState,
    active: Option<Sequence>,
    /// Bumped for every sequence built; identifies completions.
    generation: u64,
    running: bool,
}

impl ExpressionFsm {
    pub fn new(device: Arc<FlowerDevice>, config: FlowerConfig, notifier: CompletionNotifier) -> Self {
        Self {
            table: states::build_state_table(),
            timing: SequenceTiming::from_config(&config),
            device,
            config,
            notifier,
            current: ExpressionState::Undefined,
            underlying: AmbientState::Idle,
            active: None,
            generation: 0,
            running: true,
        }
    }

    pub fn request(&mut self, state: ExpressionState) -> TransitionOutcome {
        self.transition(state, false)
    }

    /// Like [`request`](Self::request) but re-enters `state` even when it
    /// equals the current state.
    pub fn request_forced(&mut self, state: ExpressionState) -> TransitionOutcome {
        self.transition(state, true)
    }

    /// Handle completion of the sequence built as `generation`.  Stale
    /// generations (an already replaced sequence) are ignored and return
    /// `None`.
    pub fn on_sequence_completed(&mut self, generation: u64) -> Option<TransitionOutcome> {
        if !self.running || generation != self.generation || self.active.is_none() {
            return None;
        }
        info!("Flower: {} finished", self.name(self.current));
        self.teardown();
        Some(self.request_forced(self.underlying.into()))
    }

    pub fn shutdown(&mut self) {
        if self.running {
            self.running = false;
            self.teardown();
            info!("Flower: shut down");
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn current_state(&self) -> ExpressionState {
        self.current
    }

    pub fn underlying_state(&self) -> AmbientState {
        self.underlying
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_shut_down(&self) -> bool {
        !self.running
    }

    pub fn active(&self) -> Option<&Sequence> {
        self.active.as_ref()
    }

    pub fn state_name(&self, state: ExpressionState) -> &'static str {
        self.name(state)
    }

    // ── Internals ─────────────────────────────────────────────

    fn name(&self, state: ExpressionState) -> &'static str {
        self.table[state as usize].name
    }

    fn teardown(&mut self) {
        if let Some(mut seq) = self.active.take() {
            seq.stop();
        }
    }

    fn transition(&mut self, state: ExpressionState, force: bool) -> TransitionOutcome {
        if !self.running {
            return TransitionOutcome::ShutDown;
        }
        if let Some(ambient) = AmbientState::of(state) {
            self.underlying = ambient;
        }
        if !force && state == self.current && self.active.is_some() {
            return TransitionOutcome::Unchanged;
        }

        if let Some(seq) = &self.active {
            if seq.is_interruptible() || seq.is_complete() {
                seq.pause();
            } else {
                info!(
                    "Flower: {} -> {} refused, {} is not interruptible",
                    self.name(self.current),
                    self.name(state),
                    seq.name()
                );
                return TransitionOutcome::Refused;
            }
        }
        self.teardown();

        match self.start_sequence(state) {
            Ok(seq) => {
                info!("Flower: {} -> {}", self.name(self.current), self.name(state));
                self.current = state;
                self.active = Some(seq);
                TransitionOutcome::Started
            }
            Err(e) => {
                error!("Flower: cannot start {}: {}", self.name(state), e);
                TransitionOutcome::Failed(e)
            }
        }
    }

    fn start_sequence(&mut self, state: ExpressionState) -> Result<Sequence, SequenceError> {
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;

        let animation = (self.table[state as usize].recipe)(&self.config);
        let mut seq = Sequence::new(animation, self.device.clone(), self.timing)?;
        let notifier = self.notifier.clone();
        seq.start(Box::new(move || notifier(generation)))?;
        Ok(seq)
    }
}
