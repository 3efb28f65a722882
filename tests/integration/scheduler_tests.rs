//! Integration tests for the sequence frame loop: pacing, pause, stop and
//! the completion hand-off, against a recording device.

use std::sync::Arc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use super::mock_hw::{MockLeds, MockMotor, Recorder, wait_until};

use exprflower::config::FlowerConfig;
use exprflower::device::FlowerDevice;
use exprflower::sequence::{
    Animation, ExpressionAnimation, IdleAnimation, RainbowAnimation, Sequence, SequenceTiming,
};

const WAIT: Duration = Duration::from_secs(3);

fn device() -> (Arc<FlowerDevice>, Recorder) {
    let rec = Recorder::default();
    let leds = MockLeds {
        recorder: rec.clone(),
        count: 26,
    };
    let dev = FlowerDevice::new(Box::new(MockMotor(rec.clone())), Box::new(leds), 50.0);
    (Arc::new(dev), rec)
}

fn timing(frame_ms: u64, completion_ms: u64) -> SequenceTiming {
    SequenceTiming {
        frame_interval: Duration::from_millis(frame_ms),
        completion_delay: Duration::from_millis(completion_ms),
    }
}

#[test]
fn frames_are_paced_at_the_interval() {
    let (dev, _) = device();
    let mut seq = Sequence::new(Animation::Rainbow(RainbowAnimation::new(0.75)), dev, timing(20, 0)).unwrap();
    seq.start(Box::new(|| {})).unwrap();
    std::thread::sleep(Duration::from_millis(210));
    let frames = seq.frame();
    seq.stop();
    // ~11 ticks in 210 ms at 20 ms; generous bounds for loaded CI hosts.
    assert!((5..=14).contains(&frames), "got {frames} frames");
}

#[test]
fn frame_counter_only_grows_while_running() {
    let (dev, _) = device();
    let mut seq = Sequence::new(Animation::Rainbow(RainbowAnimation::new(0.75)), dev, timing(2, 0)).unwrap();
    seq.start(Box::new(|| {})).unwrap();
    let mut last = 0;
    for _ in 0..20 {
        let now = seq.frame();
        assert!(now >= last);
        last = now;
        std::thread::sleep(Duration::from_millis(2));
    }
    assert!(last > 0);
    seq.stop();
    assert_eq!(seq.frame(), 0);
}

#[test]
fn pause_lets_one_more_frame_through() {
    let (dev, rec) = device();
    let mut seq = Sequence::new(Animation::Rainbow(RainbowAnimation::new(0.75)), dev, timing(30, 0)).unwrap();
    seq.start(Box::new(|| {})).unwrap();
    assert!(wait_until(WAIT, || seq.frame() >= 2));
    seq.pause();
    let paused_at = seq.frame();
    std::thread::sleep(Duration::from_millis(150));
    let after = seq.frame();
    assert!(after <= paused_at + 1, "paused at {paused_at}, now {after}");
    let writes = rec.len();
    std::thread::sleep(Duration::from_millis(60));
    assert_eq!(rec.len(), writes);
    assert!(!seq.is_running());
}

#[test]
fn completion_fires_after_the_linger_delay() {
    let (dev, _) = device();
    let (tx, rx) = mpsc::channel();
    let anim = Animation::Expression(ExpressionAnimation::new(40.0, 1.0, 3));
    let mut seq = Sequence::new(anim, dev.clone(), timing(5, 120)).unwrap();
    let started = Instant::now();
    seq.start(Box::new(move || {
        let _ = tx.send(Instant::now());
    }))
    .unwrap();
    let fired = rx.recv_timeout(WAIT).unwrap();
    // 3 full frames plus the linger delay.
    assert!(fired.duration_since(started) >= Duration::from_millis(130));
    assert!(seq.is_complete());
    assert_eq!(dev.opening(), 1.0);
}

#[test]
fn config_mode_mid_sequence_opens_fully_on_next_tick() {
    let (dev, rec) = device();
    let anim = Animation::Rainbow(RainbowAnimation::new(0.75));
    let mut seq = Sequence::new(anim, dev.clone(), timing(5, 0)).unwrap();
    seq.start(Box::new(|| {})).unwrap();
    assert!(wait_until(WAIT, || dev.opening() == 0.75));
    dev.set_config_mode(true);
    assert!(wait_until(WAIT, || rec.last_angle() == Some(50.0)));
    assert_eq!(dev.opening(), 1.0);
    seq.stop();
}

#[test]
fn idle_breathes_inside_the_band() {
    let (dev, _) = device();
    dev.set_opening(0.6).unwrap();
    let config = FlowerConfig {
        idle_reverse_percent: 0,
        ..FlowerConfig::default()
    };
    let anim = Animation::Idle(IdleAnimation::with_seed(&config, 1));
    let seq = Sequence::new(anim, dev.clone(), timing(1, 0)).unwrap();
    for _ in 0..200 {
        seq.advance_frame();
        let o = dev.opening();
        assert!((0.5 - 0.0075 - 1e-4..=0.75 + 0.0075 + 1e-4).contains(&o), "opening {o}");
    }
    assert!(!seq.is_complete());
}
