//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (a console,
//! a config button, the simulator script) that the
//! [`FlowerService`](super::service::FlowerService) interprets and acts upon.

use serde::{Deserialize, Serialize};

use crate::fsm::ExpressionState;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppCommand {
    /// Request a state transition (subject to interruption rules).
    RequestState(ExpressionState),

    /// Enter or leave config mode (petals held fully open).
    SetConfigMode(bool),

    /// Flip config mode, e.g. from a physical button.
    ToggleConfigMode,

    /// Stop the active sequence and ignore all further requests.
    Shutdown,
}
