//! State descriptor table: which sequence each state runs.
//!
//! ```text
//!              ┌──────── face(s) ───────┐
//!              │                        ▼
//!   ┌──────────┴┐                 ┌───────────┐
//!   │   IDLE    │◀── no face ─────│ DETECTING │   ambient states
//!   └──────────┬┘                 └─────┬─────┘
//!      ▲       │  smile / wink          │  smile / wink
//!      │       ▼                        ▼
//!      │   ┌───────────────────────────────────┐
//!      └───│  SMILE / WINK  (run to completion) │──▶ back to the
//!          └───────────────────────────────────┘     ambient state
//! ```

use super::{ExpressionState, StateDescriptor};
use crate::config::FlowerConfig;
use crate::sequence::{Animation, ExpressionAnimation, IdleAnimation, RainbowAnimation};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the state table.  Called once per state machine.
pub fn build_state_table() -> [StateDescriptor; ExpressionState::COUNT] {
    [
        // 0: Undefined
        StateDescriptor {
            id: ExpressionState::Undefined,
            name: "Undefined",
            recipe: idle_sequence,
        },
        // 1: Idle
        StateDescriptor {
            id: ExpressionState::Idle,
            name: "Idle",
            recipe: idle_sequence,
        },
        // 2: Detecting
        StateDescriptor {
            id: ExpressionState::Detecting,
            name: "Detecting",
            recipe: rainbow_sequence,
        },
        // 3: Indifference
        StateDescriptor {
            id: ExpressionState::Indifference,
            name: "Indifference",
            recipe: rainbow_sequence,
        },
        // 4: Smile
        StateDescriptor {
            id: ExpressionState::Smile,
            name: "Smile",
            recipe: smile_sequence,
        },
        // 5: Wink
        StateDescriptor {
            id: ExpressionState::Wink,
            name: "Wink",
            recipe: wink_sequence,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Recipes
// ═══════════════════════════════════════════════════════════════════════════

/// Idle breathes from wherever the petals currently are.
fn idle_sequence(config: &FlowerConfig) -> Animation {
    Animation::Idle(IdleAnimation::new(config))
}

fn rainbow_sequence(config: &FlowerConfig) -> Animation {
    Animation::Rainbow(RainbowAnimation::new(config.rainbow_opening))
}

fn smile_sequence(config: &FlowerConfig) -> Animation {
    Animation::Expression(ExpressionAnimation::new(
        config.happy_hue,
        config.smile_opening,
        config.expression_frames,
    ))
}

fn wink_sequence(config: &FlowerConfig) -> Animation {
    Animation::Expression(ExpressionAnimation::new(
        config.surprised_hue,
        config.wink_opening,
        config.expression_frames,
    ))
}
