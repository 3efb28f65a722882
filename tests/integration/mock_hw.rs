//! Mock hardware adapters for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real PWM/SPI peripherals.  The recorders are
//! shared handles: the service owns the boxed ports, the test keeps a
//! clone to inspect.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use exprflower::FlowerService;
use exprflower::app::events::AppEvent;
use exprflower::app::ports::{EventSink, LedPort, MotorPort};
use exprflower::color::Rgb;
use exprflower::config::FlowerConfig;
use exprflower::error::ActuatorError;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    Angle(f32),
    Leds(Vec<Rgb>),
}

#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<ActuatorCall>>>,
    fail: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl Recorder {
    pub fn calls(&self) -> Vec<ActuatorCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn angles(&self) -> Vec<f32> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ActuatorCall::Angle(a) => Some(a),
                ActuatorCall::Leds(_) => None,
            })
            .collect()
    }

    pub fn last_angle(&self) -> Option<f32> {
        self.angles().last().copied()
    }

    pub fn last_leds(&self) -> Option<Vec<Rgb>> {
        self.calls().into_iter().rev().find_map(|c| match c {
            ActuatorCall::Leds(l) => Some(l),
            ActuatorCall::Angle(_) => None,
        })
    }

    /// Make every following actuator write fail.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn record(&self, call: ActuatorCall) -> Result<(), ActuatorError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ActuatorError::Disconnected);
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

pub struct MockMotor(pub Recorder);

impl MotorPort for MockMotor {
    fn set_angle(&mut self, degrees: f32) -> Result<(), ActuatorError> {
        self.0.record(ActuatorCall::Angle(degrees))
    }
}

pub struct MockLeds {
    pub recorder: Recorder,
    pub count: usize,
}

impl LedPort for MockLeds {
    fn led_count(&self) -> usize {
        self.count
    }

    fn set_colors(&mut self, colors: &[Rgb]) -> Result<(), ActuatorError> {
        if colors.len() != self.count {
            return Err(ActuatorError::LedCountMismatch {
                expected: self.count,
                got: colors.len(),
            });
        }
        self.recorder.record(ActuatorCall::Leds(colors.to_vec()))
    }
}

// ── Event log ─────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<AppEvent>>>);

#[allow(dead_code)]
impl EventLog {
    pub fn events(&self) -> Vec<AppEvent> {
        self.0.lock().unwrap().clone()
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.0.lock().unwrap().contains(event)
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.0.lock().unwrap().iter().filter(|e| pred(e)).count()
    }
}

pub struct RecordingSink(pub EventLog);

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        (self.0).0.lock().unwrap().push(event.clone());
    }
}

// ── Builders ──────────────────────────────────────────────────

/// Fast pacing so threaded tests finish quickly.
#[allow(dead_code)]
pub fn fast_config() -> FlowerConfig {
    FlowerConfig {
        frame_interval_ms: 5,
        completion_delay_ms: 30,
        expression_frames: 6,
        ..FlowerConfig::default()
    }
}

/// Slow pacing: sequences render their first frame and then sit still,
/// and expressions never complete within a test.
#[allow(dead_code)]
pub fn frozen_config() -> FlowerConfig {
    FlowerConfig {
        frame_interval_ms: 60_000,
        completion_delay_ms: 60_000,
        ..FlowerConfig::default()
    }
}

pub fn make_service(config: FlowerConfig) -> (FlowerService, Recorder, EventLog) {
    let recorder = Recorder::default();
    let events = EventLog::default();
    let leds = MockLeds {
        recorder: recorder.clone(),
        count: config.led_count,
    };
    let service = FlowerService::new(
        Box::new(MockMotor(recorder.clone())),
        Box::new(leds),
        config,
        Box::new(RecordingSink(events.clone())),
    );
    (service, recorder, events)
}

/// Poll `cond` every millisecond until it holds or `timeout` passes.
#[allow(dead_code)]
pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    cond()
}
