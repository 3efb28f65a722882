//! Named worker-thread spawning.
//!
//! Every animation sequence owns one dedicated thread that only it
//! drives.  Threads are named after the sequence they run so a stuck
//! frame loop is identifiable in a debugger or `top -H`.

use std::io;
use std::thread::{Builder, JoinHandle};

/// Default worker stack.  Frame ticks are shallow; this leaves headroom
/// for actuator drivers that format into stack buffers.
pub const DEFAULT_STACK_KB: usize = 64;

/// Spawn a named worker thread with an explicit stack size.
///
/// Returns the spawn error instead of panicking so the caller can roll
/// back whatever it was constructing.
pub fn spawn_worker(
    name: &str,
    stack_kb: usize,
    f: impl FnOnce() + Send + 'static,
) -> io::Result<JoinHandle<()>> {
    log::debug!("Spawning '{}' (stack={}KB)", name, stack_kb);

    Builder::new()
        .name(name.into())
        .stack_size(stack_kb * 1024)
        .spawn(f)
}
