//! Integration tests for ring rotation tracks

use stargate::core::{generate_rotation, RotationProfile};
use stargate::types::{RotationDirection, RotationTrack};
use stargate::{ACCEL_STEP, ANGULAR_MAX_SPEED, TIMESCALE};

fn assert_well_formed(track: &RotationTrack) {
    assert!(!track.is_empty());
    assert_eq!(track.keyframes[0].time, 0.0);

    for (i, pair) in track.keyframes.windows(2).enumerate() {
        let dt = pair[1].time - pair[0].time;
        assert!((dt - 1.0 / TIMESCALE).abs() < 1e-9, "uneven tick at keyframe {}", i);

        let step = (pair[1].angle - pair[0].angle).abs();
        assert!(step <= ANGULAR_MAX_SPEED + 1e-9, "speed cap exceeded at keyframe {}", i);
    }
}

#[test]
fn test_every_direction_ends_on_target() {
    let cases = [
        (0.0, 240.0, RotationDirection::CounterClockwise),
        (240.0, 0.0, RotationDirection::CounterClockwise),
        (240.0, 0.0, RotationDirection::Clockwise),
        (10.0, 350.0, RotationDirection::Clockwise),
        (129.23, 9.23, RotationDirection::Clockwise),
    ];

    for (source, target, direction) in cases {
        let track = generate_rotation(source, target, direction);
        assert_well_formed(&track);
        assert_eq!(track.direction, direction);

        let landed = track.keyframes.last().unwrap().bearing();
        assert!((landed - target).abs() < 1e-9, "{} -> {} {}", source, target, direction);
    }
}

#[test]
fn test_wrapping_takes_the_requested_way_round() {
    let ccw = generate_rotation(350.0, 10.0, RotationDirection::CounterClockwise);
    let cw = generate_rotation(350.0, 10.0, RotationDirection::Clockwise);

    assert!((ccw.distance() - 20.0).abs() < 1e-9);
    assert!((cw.distance() - 340.0).abs() < 1e-9);
    assert!(cw.duration() > ccw.duration());
    assert!(ccw.resolved_target() > ccw.source());
    assert!(cw.resolved_target() < cw.source());
}

#[test]
fn test_speed_starts_at_one_step_then_cruises() {
    let track = generate_rotation(0.0, 300.0, RotationDirection::CounterClockwise);
    let steps: Vec<f64> = track
        .keyframes
        .windows(2)
        .map(|p| p[1].angle - p[0].angle)
        .collect();

    assert!((steps[0] - ACCEL_STEP).abs() < 1e-9);
    let cruise = steps.iter().cloned().fold(0.0, f64::max);
    assert!(cruise > ACCEL_STEP);
    assert!(cruise < ANGULAR_MAX_SPEED + 1e-9);
}

#[test]
fn test_slower_profile_takes_longer() {
    let slow = RotationProfile {
        max_speed: ANGULAR_MAX_SPEED / 2.0,
        ..RotationProfile::default()
    };
    let fast = RotationProfile::default();

    let a = slow.generate(0.0, 180.0, RotationDirection::CounterClockwise);
    let b = fast.generate(0.0, 180.0, RotationDirection::CounterClockwise);
    assert!(a.duration() > b.duration());
}

#[test]
fn test_track_serializes_for_clients() {
    let track = generate_rotation(0.0, 40.0, RotationDirection::Clockwise);
    let json = serde_json::to_value(&track).unwrap();

    assert_eq!(json["direction"], serde_json::to_value(RotationDirection::Clockwise).unwrap());
    assert_eq!(json["keyframes"].as_array().unwrap().len(), track.len());
}
