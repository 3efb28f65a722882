//! Actuator drivers and worker-thread helpers.

pub mod apa102;
pub mod servo;
pub mod task;
