//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to              |
//! |----------------|--------------------|--------------------------|
//! | `log_sink`     | EventSink          | `log` facade             |
//! | `config_file`  | ConfigPort         | JSON file on disk        |
//! | `sim`          | MotorPort, LedPort | In-memory actuators      |
//! | `console_log`  | fmt subscriber     | stderr (host runs)       |
//!
//! The real actuators live in [`drivers`](crate::drivers).

pub mod config_file;
pub mod console_log;
pub mod log_sink;
pub mod sim;
