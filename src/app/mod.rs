//! Application core: domain logic behind port traits.
//!
//! This module holds the business rules of the expression flower: the
//! [`FlowerService`](service::FlowerService) actor that serialises state
//! machine requests and sequence completions.  All interaction with
//! hardware happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
