//! Expression flower control engine.
//!
//! Reacts to a stream of detected faces by opening and closing the
//! flower's petals and animating its LED ring.  Exposes the domain core
//! plus the drivers and adapters for integration testing and for the
//! `flower-sim` host binary.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod color;
pub mod config;
pub mod device;
pub mod drivers;
pub mod error;
pub mod faces;
pub mod fsm;
pub mod sequence;
pub mod tracker;

pub use app::service::FlowerService;
pub use error::{Error, Result};
pub use fsm::{ExpressionState, TransitionOutcome};
