//! Frame-paced animation runtime.
//!
//! ```text
//!  ┌──────────────────────────── worker thread "seq-<name>" ───────────┐
//!  │                                                                   │
//!  │   tick ──▶ Animation::render(frame) ──▶ FlowerDevice (locked)     │
//!  │    │                                                              │
//!  │    ├─ running == false ──────────────▶ halt                       │
//!  │    ├─ just completed ──▶ wait completion_delay ──▶ on_complete()  │
//!  │    └─ otherwise ──▶ wait max(0, interval - elapsed) ──▶ tick      │
//!  │                                                                   │
//!  │   every wait races the stop signal; stop() ends the loop at once  │
//!  └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The animation variants only compute a [`FrameTarget`] per frame.
//! Pacing, completion and teardown live here, in one place.
//!
//! Each [`Sequence`] owns exactly one worker thread.  The thread is
//! detached: [`Sequence::stop`] signals it and returns without joining,
//! so the stop path is safe to call while holding locks that a
//! completion callback might be waiting on.

pub mod expression;
pub mod idle;
pub mod rainbow;

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
// Links the std time driver read by `async_io_mini::Timer`.
use embassy_time as _;
use log::{debug, info, warn};

use crate::color::{Hsv, LedFrame, MAX_LEDS};
use crate::config::FlowerConfig;
use crate::device::{FlowerDevice, lock};
use crate::drivers::task::{DEFAULT_STACK_KB, spawn_worker};
use crate::error::{ActuatorError, SequenceError};

pub use expression::ExpressionAnimation;
pub use idle::IdleAnimation;
pub use rainbow::RainbowAnimation;

// ───────────────────────────────────────────────────────────────
// Per-frame output
// ───────────────────────────────────────────────────────────────

/// LED output of one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// Fill the strip with one colour.
    Solid(Hsv),
    /// One colour per LED.
    Pixels(LedFrame),
}

/// What one frame of an animation wants the device to show.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameTarget {
    pub opening: f32,
    pub paint: Paint,
    /// This frame is the animation's last.
    pub complete: bool,
}

// ───────────────────────────────────────────────────────────────
// Animation variants
// ───────────────────────────────────────────────────────────────

pub enum Animation {
    Idle(IdleAnimation),
    Rainbow(RainbowAnimation),
    Expression(ExpressionAnimation),
}

impl Animation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle(_) => "idle",
            Self::Rainbow(_) => "rainbow",
            Self::Expression(_) => "expression",
        }
    }

    /// Fixed per variant: expressions always run to completion.
    pub fn is_interruptible(&self) -> bool {
        !matches!(self, Self::Expression(_))
    }

    /// Compute frame `frame` against the device's current state.  Config
    /// mode overrides the variant's opening with fully open.
    pub fn target(&mut self, frame: u32, device: &FlowerDevice) -> FrameTarget {
        let led_count = device.led_count();
        let mut target = match self {
            Self::Idle(a) => a.render(frame, device.opening(), led_count, device.config_mode()),
            Self::Rainbow(a) => a.render(frame, led_count),
            Self::Expression(a) => a.render(frame),
        };
        if device.config_mode() {
            debug!("Sequence: config mode, holding petals open");
            target.opening = 1.0;
        }
        target
    }

    /// Render frame `frame` and apply it.  Returns whether this was the
    /// animation's final frame.
    pub fn advance(&mut self, frame: u32, device: &FlowerDevice) -> Result<bool, ActuatorError> {
        let target = self.target(frame, device);
        device.set_opening(target.opening)?;
        match &target.paint {
            Paint::Solid(c) => device.set_hsv(c.hue, c.saturation, c.value)?,
            Paint::Pixels(leds) => device.set_leds(leds)?,
        }
        Ok(target.complete)
    }
}

// ───────────────────────────────────────────────────────────────
// Timing
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceTiming {
    pub frame_interval: Duration,
    pub completion_delay: Duration,
}

impl SequenceTiming {
    pub fn from_config(config: &FlowerConfig) -> Self {
        Self {
            frame_interval: Duration::from_millis(config.frame_interval_ms),
            completion_delay: Duration::from_millis(config.completion_delay_ms),
        }
    }
}

impl Default for SequenceTiming {
    fn default() -> Self {
        Self::from_config(&FlowerConfig::default())
    }
}

/// Delay before the next frame: the interval minus the time the tick took.
pub fn next_frame_delay(interval: Duration, tick_elapsed: Duration) -> Duration {
    interval.saturating_sub(tick_elapsed)
}

// ───────────────────────────────────────────────────────────────
// Runtime
// ───────────────────────────────────────────────────────────────

/// Invoked once, on the worker thread, after the animation's final frame
/// has lingered for the completion delay.
pub type OnComplete = Box<dyn FnOnce() + Send + 'static>;

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Continue,
    /// First tick that reported completion.
    Completed,
}

struct Shared {
    frame: AtomicU32,
    running: AtomicBool,
    complete: AtomicBool,
    stopped: AtomicBool,
    animation: Mutex<Animation>,
    stop_signal: Signal<CriticalSectionRawMutex, ()>,
}

impl Shared {
    fn tick(&self, device: &FlowerDevice) -> Tick {
        let frame = self.frame.load(Ordering::SeqCst);
        let done = match lock(&self.animation).advance(frame, device) {
            Ok(done) => done,
            Err(e) => {
                warn!("Sequence: frame {} failed: {}", frame, e);
                false
            }
        };
        // A concurrent stop() resets the counter; don't overwrite that.
        let _ = self.frame.compare_exchange(
            frame,
            frame.wrapping_add(1),
            Ordering::SeqCst,
            Ordering::SeqCst,
        );

        if done && !self.complete.swap(true, Ordering::SeqCst) {
            Tick::Completed
        } else {
            Tick::Continue
        }
    }

    /// Wait for `delay`.  Returns `false` if stopped in the meantime.
    async fn sleep(&self, delay: Duration) -> bool {
        let elapsed = futures_lite::future::or(
            async {
                async_io_mini::Timer::after(delay).await;
                true
            },
            async {
                self.stop_signal.wait().await;
                false
            },
        )
        .await;
        elapsed && !self.stopped.load(Ordering::SeqCst)
    }

    async fn frame_loop(&self, device: &FlowerDevice, timing: SequenceTiming, on_complete: OnComplete) {
        loop {
            if self.stopped.load(Ordering::SeqCst) {
                return;
            }
            let tick_start = Instant::now();
            let tick = self.tick(device);
            if !self.running.load(Ordering::SeqCst) {
                debug!("Sequence: paused, frame loop halted");
                return;
            }
            match tick {
                Tick::Completed => {
                    if self.sleep(timing.completion_delay).await {
                        on_complete();
                    }
                    return;
                }
                Tick::Continue => {
                    let delay = next_frame_delay(timing.frame_interval, tick_start.elapsed());
                    if !self.sleep(delay).await {
                        return;
                    }
                }
            }
        }
    }
}

/// One live animation plus its frame loop.
///
/// Lifecycle: `new` → `start` → (`pause`) → `stop`.  A stopped sequence
/// cannot be restarted; build a fresh one.
pub struct Sequence {
    shared: Arc<Shared>,
    device: Arc<FlowerDevice>,
    timing: SequenceTiming,
    name: &'static str,
    interruptible: bool,
    started: bool,
}

impl Sequence {
    pub fn new(
        animation: Animation,
        device: Arc<FlowerDevice>,
        timing: SequenceTiming,
    ) -> Result<Self, SequenceError> {
        let led_count = device.led_count();
        if led_count > MAX_LEDS {
            return Err(SequenceError::FrameCapacity {
                requested: led_count,
                capacity: MAX_LEDS,
            });
        }
        Ok(Self {
            name: animation.name(),
            interruptible: animation.is_interruptible(),
            shared: Arc::new(Shared {
                frame: AtomicU32::new(0),
                running: AtomicBool::new(false),
                complete: AtomicBool::new(false),
                stopped: AtomicBool::new(false),
                animation: Mutex::new(animation),
                stop_signal: Signal::new(),
            }),
            device,
            timing,
            started: false,
        })
    }

    /// Spawn the frame loop.  `on_complete` runs on the worker thread.
    pub fn start(&mut self, on_complete: OnComplete) -> Result<(), SequenceError> {
        if self.shared.stopped.load(Ordering::SeqCst) {
            return Err(SequenceError::Stopped);
        }
        if self.started {
            return Err(SequenceError::AlreadyStarted);
        }

        self.shared.running.store(true, Ordering::SeqCst);
        let shared = self.shared.clone();
        let device = self.device.clone();
        let timing = self.timing;
        let thread_name = format!("seq-{}", self.name);

        let spawned = spawn_worker(&thread_name, DEFAULT_STACK_KB, move || {
            futures_lite::future::block_on(shared.frame_loop(&device, timing, on_complete));
        });
        match spawned {
            // Detached; stop() never joins.
            Ok(_handle) => {
                self.started = true;
                info!("Sequence: {} started", self.name);
                Ok(())
            }
            Err(e) => {
                self.shared.running.store(false, Ordering::SeqCst);
                warn!("Sequence: failed to spawn {}: {}", thread_name, e);
                Err(SequenceError::Spawn)
            }
        }
    }

    /// Run one tick on the caller's thread.  For stepping a sequence that
    /// has not been started.
    pub fn advance_frame(&self) -> Tick {
        self.shared.tick(&self.device)
    }

    /// Let the pending frame fire once more, then halt the loop.
    pub fn pause(&self) {
        self.shared.running.store(false, Ordering::SeqCst);
    }

    /// Halt the loop immediately and reset the frame counter.  Does not
    /// revert actuator writes of a tick already in flight.
    pub fn stop(&mut self) {
        self.pause();
        self.shared.frame.store(0, Ordering::SeqCst);
        if !self.shared.stopped.swap(true, Ordering::SeqCst) {
            self.shared.stop_signal.signal(());
            debug!("Sequence: {} stopped", self.name);
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_interruptible(&self) -> bool {
        self.interruptible
    }

    /// Sticky once set.
    pub fn is_complete(&self) -> bool {
        self.shared.complete.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.stopped.load(Ordering::SeqCst)
    }

    /// Index of the next frame to render.
    pub fn frame(&self) -> u32 {
        self.shared.frame.load(Ordering::SeqCst)
    }
}

impl Drop for Sequence {
    fn drop(&mut self) {
        self.stop();
    }
}
