//! Integration tests for FaceTracker → FlowerService: stimulus mapping,
//! priority selection, classification and reaping.

use super::mock_hw::{frozen_config, make_service};

use exprflower::app::events::AppEvent;
use exprflower::config::FlowerConfig;
use exprflower::faces::{BoundingBox, FaceObservation, TrackingId};
use exprflower::fsm::{ExpressionState, TransitionOutcome};
use exprflower::tracker::{FaceTracker, Stimulus};

fn face(id: i32, cx: f32, size: f32) -> FaceObservation {
    FaceObservation::new(TrackingId(id), BoundingBox::new(cx, 120.0, size, size))
}

fn setup() -> (FaceTracker, exprflower::FlowerService, super::mock_hw::EventLog) {
    let config = frozen_config();
    let (svc, _, events) = make_service(config.clone());
    (FaceTracker::new(&config), svc, events)
}

#[test]
fn empty_frame_requests_idle() {
    let (mut tracker, svc, _) = setup();
    let report = tracker.process_frame(&[], &svc);
    assert_eq!(report.stimulus, Stimulus::NoFace);
    assert_eq!(report.ambient, TransitionOutcome::Started);
    assert_eq!(report.priority, None);
    assert_eq!(svc.current_state(), ExpressionState::Idle);
}

#[test]
fn single_face_is_priority_and_detecting() {
    let (mut tracker, svc, events) = setup();
    // Too small and off-centre, but alone.
    let report = tracker.process_frame(&[face(4, 10.0, 10.0)], &svc);
    assert_eq!(report.stimulus, Stimulus::OneFace);
    assert_eq!(report.priority, Some(TrackingId(4)));
    assert_eq!(svc.current_state(), ExpressionState::Detecting);
    assert!(events.contains(&AppEvent::PriorityChanged {
        from: None,
        to: Some(TrackingId(4)),
    }));
}

#[test]
fn closest_face_wins_then_sticks() {
    let (mut tracker, svc, _) = setup();
    let report = tracker.process_frame(&[face(1, 200.0, 70.0), face(2, 175.0, 70.0)], &svc);
    assert_eq!(report.stimulus, Stimulus::MultipleFaces);
    assert_eq!(report.priority, Some(TrackingId(2)));

    // A face dead centre appears; the valid priority is kept.
    let report = tracker.process_frame(
        &[face(1, 200.0, 70.0), face(2, 175.0, 70.0), face(3, 160.0, 70.0)],
        &svc,
    );
    assert_eq!(report.priority, Some(TrackingId(2)));

    // Priority drifts to the edge: re-selection picks the centre face.
    let report = tracker.process_frame(
        &[face(1, 200.0, 70.0), face(2, 300.0, 70.0), face(3, 160.0, 70.0)],
        &svc,
    );
    assert_eq!(report.priority, Some(TrackingId(3)));
}

#[test]
fn small_faces_are_never_priority_in_a_crowd() {
    let (mut tracker, svc, _) = setup();
    let report = tracker.process_frame(&[face(1, 160.0, 20.0), face(2, 10.0, 80.0)], &svc);
    assert_eq!(report.priority, None);
    assert!(report.expressions.is_empty());
}

#[test]
fn smiling_priority_face_requests_smile_then_wink_is_refused() {
    let (mut tracker, svc, _) = setup();
    let happy = face(1, 160.0, 70.0).with_smiling(0.9).with_eyes(0.9, 0.1);
    let report = tracker.process_frame(&[happy], &svc);
    assert_eq!(
        report.expressions.as_slice(),
        &[
            (ExpressionState::Smile, TransitionOutcome::Started),
            (ExpressionState::Wink, TransitionOutcome::Refused),
        ]
    );
    assert_eq!(svc.current_state(), ExpressionState::Smile);

    // Later frames cannot pre-empt the running smile.
    let report = tracker.process_frame(&[], &svc);
    assert_eq!(report.ambient, TransitionOutcome::Refused);
    assert_eq!(svc.current_state(), ExpressionState::Smile);
}

#[test]
fn only_priority_face_is_classified() {
    let (mut tracker, svc, _) = setup();
    let winker = face(1, 230.0, 70.0).with_eyes(0.05, 0.9);
    let report = tracker.process_frame(&[winker, face(2, 160.0, 70.0)], &svc);
    assert_eq!(report.priority, Some(TrackingId(2)));
    assert!(report.expressions.is_empty());
    assert_eq!(svc.current_state(), ExpressionState::Detecting);
}

#[test]
fn unknown_probabilities_never_classify() {
    let (mut tracker, svc, _) = setup();
    let blank = FaceObservation::from_raw(1, BoundingBox::new(160.0, 120.0, 70.0, 70.0), -1.0, -1.0, 0.05);
    let report = tracker.process_frame(&[blank], &svc);
    assert!(report.expressions.is_empty());
}

#[test]
fn vanished_faces_are_reaped_after_retention() {
    let config = FlowerConfig {
        retain_frames: 2,
        ..frozen_config()
    };
    let (svc, _, _) = make_service(config.clone());
    let mut tracker = FaceTracker::new(&config);

    tracker.process_frame(&[face(1, 160.0, 70.0), face(2, 120.0, 70.0)], &svc);
    tracker.process_frame(&[face(2, 120.0, 70.0)], &svc);
    assert!(tracker.is_known(TrackingId(1)));
    assert_eq!(tracker.current_ids().collect::<Vec<_>>(), vec![TrackingId(2)]);

    tracker.process_frame(&[face(2, 120.0, 70.0)], &svc);
    assert!(tracker.is_known(TrackingId(1)));
    let report = tracker.process_frame(&[face(2, 120.0, 70.0)], &svc);
    assert_eq!(report.reaped, vec![TrackingId(1)]);
    assert!(!tracker.is_known(TrackingId(1)));
}

#[test]
fn explicit_reap() {
    let (mut tracker, svc, _) = setup();
    tracker.process_frame(&[face(9, 160.0, 70.0)], &svc);
    assert!(tracker.reap(TrackingId(9)));
    assert!(!tracker.reap(TrackingId(9)));
    assert_eq!(tracker.known_ids().count(), 0);
}

#[test]
fn priority_cleared_when_faces_leave() {
    let (mut tracker, svc, events) = setup();
    tracker.process_frame(&[face(5, 160.0, 70.0)], &svc);
    tracker.process_frame(&[], &svc);
    assert_eq!(tracker.priority(), None);
    assert!(events.contains(&AppEvent::PriorityChanged {
        from: Some(TrackingId(5)),
        to: None,
    }));
}
