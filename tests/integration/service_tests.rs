//! Integration tests for the FlowerService → FSM → sequence → actuator
//! pipeline, with real sequence worker threads.

use std::time::Duration;

use super::mock_hw::{fast_config, frozen_config, make_service, wait_until};

use exprflower::app::commands::AppCommand;
use exprflower::app::events::AppEvent;
use exprflower::config::FlowerConfig;
use exprflower::fsm::{AmbientState, ExpressionState, TransitionOutcome};

const WAIT: Duration = Duration::from_secs(3);

// ── Construction ──────────────────────────────────────────────

#[test]
fn construction_drives_petals_fully_open() {
    let (svc, hw, _) = make_service(frozen_config());
    assert_eq!(hw.angles(), vec![50.0]);
    assert_eq!(svc.opening(), 1.0);
}

#[test]
fn start_runs_idle_breathing() {
    let (svc, hw, events) = make_service(fast_config());
    assert_eq!(svc.start(), TransitionOutcome::Started);
    assert_eq!(svc.current_state(), ExpressionState::Idle);
    assert!(wait_until(WAIT, || svc.active_frame().unwrap_or(0) >= 5));
    assert!(hw.last_leds().is_some_and(|l| l.len() == 26));
    assert!(events.contains(&AppEvent::Started(ExpressionState::Idle)));
}

// ── Interruption contract ─────────────────────────────────────

#[test]
fn smile_interrupts_rainbow() {
    let (svc, _, _) = make_service(frozen_config());
    svc.request(ExpressionState::Detecting);
    assert_eq!(svc.request(ExpressionState::Smile), TransitionOutcome::Started);
    assert_eq!(svc.current_state(), ExpressionState::Smile);
}

#[test]
fn incomplete_smile_refuses_idle() {
    let (svc, _, events) = make_service(frozen_config());
    svc.request(ExpressionState::Smile);
    assert_eq!(svc.request(ExpressionState::Idle), TransitionOutcome::Refused);
    assert_eq!(svc.current_state(), ExpressionState::Smile);
    assert!(events.contains(&AppEvent::TransitionRefused {
        requested: ExpressionState::Idle,
        current: ExpressionState::Smile,
    }));
}

#[test]
fn same_state_request_does_not_restart() {
    let (svc, _, _) = make_service(fast_config());
    svc.request(ExpressionState::Detecting);
    assert!(wait_until(WAIT, || svc.active_frame().unwrap_or(0) >= 5));
    assert_eq!(svc.request(ExpressionState::Detecting), TransitionOutcome::Unchanged);
    assert!(svc.active_frame().unwrap_or(0) >= 5, "frame counter must not reset");
}

// ── Completion hand-back ──────────────────────────────────────

#[test]
fn smile_hands_back_to_detecting_after_refusal() {
    let (svc, _, events) = make_service(fast_config());
    svc.request(ExpressionState::Detecting);
    svc.request(ExpressionState::Smile);
    assert_eq!(svc.request(ExpressionState::Detecting), TransitionOutcome::Refused);
    assert_eq!(svc.underlying_state(), AmbientState::Detecting);

    assert!(wait_until(WAIT, || svc.current_state() == ExpressionState::Detecting));
    assert!(events.contains(&AppEvent::SequenceCompleted(ExpressionState::Smile)));
    assert!(events.contains(&AppEvent::StateChanged {
        from: ExpressionState::Smile,
        to: ExpressionState::Detecting,
    }));
}

#[test]
fn wink_hands_back_to_idle_by_default() {
    let (svc, _, _) = make_service(fast_config());
    svc.request(ExpressionState::Wink);
    assert!(wait_until(WAIT, || svc.current_state() == ExpressionState::Idle));
}

#[test]
fn expression_holds_its_last_frame_before_hand_back() {
    let config = FlowerConfig {
        completion_delay_ms: 300,
        ..fast_config()
    };
    let (svc, _, _) = make_service(config);
    svc.request(ExpressionState::Smile);
    assert!(wait_until(WAIT, || svc.active_complete() == Some(true)));
    assert_eq!(svc.current_state(), ExpressionState::Smile);
    // Complete but lingering: interruptible again.
    assert_eq!(svc.request(ExpressionState::Wink), TransitionOutcome::Started);
}

#[test]
fn replaced_sequence_never_completes_late() {
    let config = FlowerConfig {
        completion_delay_ms: 100,
        ..fast_config()
    };
    let (svc, _, events) = make_service(config);
    svc.request(ExpressionState::Smile);
    assert!(wait_until(WAIT, || svc.active_complete() == Some(true)));
    svc.request(ExpressionState::Detecting);
    std::thread::sleep(Duration::from_millis(250));
    assert_eq!(svc.current_state(), ExpressionState::Detecting);
    assert_eq!(
        events.count(|e| matches!(e, AppEvent::SequenceCompleted(_))),
        0
    );
}

// ── Config mode ───────────────────────────────────────────────

#[test]
fn config_mode_overrides_expression_opening() {
    let config = FlowerConfig {
        expression_frames: 10_000,
        ..fast_config()
    };
    let (svc, hw, _) = make_service(config);
    svc.request(ExpressionState::Wink);
    assert!(wait_until(WAIT, || svc.opening() == 0.25));
    assert_eq!(hw.last_angle(), Some(12.5));

    svc.handle_command(AppCommand::SetConfigMode(true));
    assert!(wait_until(WAIT, || svc.opening() == 1.0));
    assert_eq!(hw.last_angle(), Some(50.0));

    svc.handle_command(AppCommand::ToggleConfigMode);
    assert!(wait_until(WAIT, || svc.opening() == 0.25));
}

// ── Failure containment ───────────────────────────────────────

#[test]
fn actuator_failure_does_not_stop_frames() {
    let (svc, hw, _) = make_service(fast_config());
    svc.request(ExpressionState::Detecting);
    assert!(wait_until(WAIT, || svc.opening() == 0.75));
    hw.set_failing(true);
    let before = svc.active_frame().unwrap_or(0);
    assert!(wait_until(WAIT, || svc.active_frame().unwrap_or(0) >= before + 5));
    // Last-known state survives the failed writes.
    assert_eq!(svc.opening(), 0.75);
    hw.set_failing(false);
    assert_eq!(svc.request(ExpressionState::Smile), TransitionOutcome::Started);
    assert!(wait_until(WAIT, || svc.opening() == 1.0));
}

#[test]
fn oversized_strip_fails_without_changing_state() {
    let config = FlowerConfig {
        led_count: 65,
        ..frozen_config()
    };
    let (svc, _, events) = make_service(config);
    let outcome = svc.request(ExpressionState::Detecting);
    assert!(matches!(outcome, TransitionOutcome::Failed(_)));
    assert_eq!(svc.current_state(), ExpressionState::Undefined);
    assert_eq!(svc.active_frame(), None);
    assert_eq!(events.count(|e| matches!(e, AppEvent::SequenceFailed { .. })), 1);
}

// ── Shutdown ──────────────────────────────────────────────────

#[test]
fn shutdown_stops_all_actuator_traffic() {
    let (svc, hw, _) = make_service(fast_config());
    svc.start();
    assert!(wait_until(WAIT, || hw.len() > 10));
    svc.shutdown();
    std::thread::sleep(Duration::from_millis(30));
    let settled = hw.len();
    std::thread::sleep(Duration::from_millis(60));
    assert_eq!(hw.len(), settled);
    assert_eq!(svc.request(ExpressionState::Smile), TransitionOutcome::ShutDown);
}

#[test]
fn clones_share_one_flower() {
    let (svc, _, _) = make_service(frozen_config());
    let other = svc.clone();
    other.request(ExpressionState::Wink);
    assert_eq!(svc.current_state(), ExpressionState::Wink);
}
