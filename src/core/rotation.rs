//! Rotation profile generator
//!
//! Turns (source, target, direction) into a time-stamped keyframe track with a
//! trapezoidal speed profile: accelerate by a fixed step per tick, cruise,
//! then brake over the same distance it took to speed up. The angle is the
//! integral of the speed, one keyframe per tick, plus a final keyframe pinned
//! on the exact target to absorb integration drift.

use crate::types::{normalize_angle, RotationDirection, RotationKeyframe, RotationTrack};
use crate::{ACCEL_STEP, ANGULAR_MAX_SPEED, TIMESCALE};

/// Speed profile parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationProfile {
    /// Ticks per second
    pub timescale: f64,
    /// Degrees per tick at cruise
    pub max_speed: f64,
    /// Speed change per tick
    pub accel_step: f64,
}

impl Default for RotationProfile {
    fn default() -> Self {
        Self {
            timescale: TIMESCALE,
            max_speed: ANGULAR_MAX_SPEED,
            accel_step: ACCEL_STEP,
        }
    }
}

impl RotationProfile {
    /// Generate the keyframe track.
    ///
    /// Both angles are normalized into [0, 360). The target is then shifted by
    /// a full turn if needed so travel is monotonic in `direction`.
    pub fn generate(
        &self,
        source: f64,
        target: f64,
        direction: RotationDirection,
    ) -> RotationTrack {
        let source = normalize_angle(source);
        let mut target = normalize_angle(target);

        match direction {
            RotationDirection::CounterClockwise if target < source => target += 360.0,
            RotationDirection::Clockwise if target > source => target -= 360.0,
            _ => {}
        }

        let distance = (target - source).abs();
        let sign = direction.sign();

        let mut keyframes = Vec::new();
        let mut speed = 0.0;
        let mut accel_distance = 0.0;
        let mut travelled = 0.0;
        let mut tick: u32 = 0;

        // Strict bound: landing exactly on the target must not add a stationary tick
        while travelled < distance {
            // Braking is checked first so short hops never reach cruise speed
            if travelled + accel_distance >= distance {
                speed -= self.accel_step;
                if speed <= self.accel_step {
                    speed = self.accel_step;
                }
            } else if speed + self.accel_step < self.max_speed {
                speed += self.accel_step;
                accel_distance = travelled;
            }

            keyframes.push(RotationKeyframe::new(
                tick as f64 / self.timescale,
                source + travelled * sign,
            ));
            tick += 1;
            travelled += speed;
        }

        keyframes.push(RotationKeyframe::new(tick as f64 / self.timescale, target));

        tracing::debug!(
            source,
            target,
            %direction,
            keyframes = keyframes.len(),
            "rotation track generated"
        );

        RotationTrack { direction, keyframes }
    }
}

/// Generate a track with the default profile
pub fn generate_rotation(source: f64, target: f64, direction: RotationDirection) -> RotationTrack {
    RotationProfile::default().generate(source, target, direction)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const CCW: RotationDirection = RotationDirection::CounterClockwise;
    const CW: RotationDirection = RotationDirection::Clockwise;

    fn assert_track_shape(track: &RotationTrack, source: f64, target: f64) {
        assert!(!track.is_empty());
        assert_eq!(track.keyframes[0].angle, source);
        assert_eq!(track.keyframes[0].time, 0.0);
        assert_eq!(track.resolved_target(), target);
        for pair in track.keyframes.windows(2) {
            assert!(pair[1].time > pair[0].time, "time must increase: {:?}", pair);
        }
    }

    #[test]
    fn test_ccw_simple() {
        let track = generate_rotation(0.0, 240.0, CCW);
        assert_track_shape(&track, 0.0, 240.0);
        assert_eq!(track.distance(), 240.0);
    }

    #[test]
    fn test_ccw_wraps_through_zero() {
        let track = generate_rotation(350.0, 10.0, CCW);
        assert_track_shape(&track, 350.0, 370.0);
        assert_eq!(track.keyframes.last().unwrap().bearing(), 10.0);
        for pair in track.keyframes.windows(2) {
            assert!(pair[1].angle >= pair[0].angle);
        }
    }

    #[test]
    fn test_cw_wraps_backwards() {
        let track = generate_rotation(10.0, 350.0, CW);
        assert_track_shape(&track, 10.0, -10.0);
        for pair in track.keyframes.windows(2) {
            assert!(pair[1].angle <= pair[0].angle);
        }
    }

    #[test]
    fn test_inputs_are_normalized() {
        let track = generate_rotation(720.0, -120.0, CCW);
        assert_track_shape(&track, 0.0, 240.0);
    }

    #[test]
    fn test_zero_distance_still_pins_target() {
        let track = generate_rotation(120.0, 120.0, CCW);
        assert_track_shape(&track, 120.0, 120.0);
        assert_eq!(track.len(), 1);
        assert_eq!(track.duration(), 0.0);
    }

    #[test]
    fn test_full_speed_sweep_timing() {
        // 240 degrees: one second of ramp, cruise, brake; 19 ticks plus the pin
        let track = generate_rotation(0.0, 240.0, CCW);
        assert_eq!(track.len(), 20);
        assert!((track.duration() - 19.0 / TIMESCALE).abs() < 1e-9);
    }

    #[test]
    fn test_step_never_exceeds_max_speed() {
        for &(s, t, d) in &[(0.0, 359.0, CCW), (0.0, 1.0, CW), (200.0, 40.0, CCW), (45.0, 44.0, CW)] {
            let track = generate_rotation(s, t, d);
            for pair in track.keyframes.windows(2) {
                let delta = (pair[1].angle - pair[0].angle).abs();
                assert!(
                    delta <= ANGULAR_MAX_SPEED + 1e-9,
                    "delta {} exceeds max speed for {:?}",
                    delta,
                    (s, t, d)
                );
            }
        }
    }

    #[test]
    fn test_duration_grows_with_distance() {
        let mut last = 0.0;
        for target in [0.0, 5.0, 30.0, 90.0, 180.0, 270.0, 359.0] {
            let duration = generate_rotation(0.0, target, CCW).duration();
            assert!(duration >= last, "{} shorter than {} at target {}", duration, last, target);
            last = duration;
        }
    }

    #[test]
    fn test_short_hop() {
        let track = generate_rotation(0.0, 10.0, CCW);
        let angles: Vec<f64> = track.keyframes.iter().map(|k| k.angle).collect();
        assert_eq!(angles.len(), 3);
        assert_eq!(angles[0], 0.0);
        assert!((angles[1] - ACCEL_STEP).abs() < 1e-9);
        assert_eq!(angles[2], 10.0);
    }

    #[test]
    fn test_custom_profile_time_base() {
        let profile = RotationProfile {
            timescale: 10.0,
            max_speed: 5.0,
            accel_step: 1.0,
        };
        let track = profile.generate(0.0, 90.0, CCW);
        assert_eq!(track.keyframes[1].time, 0.1);
        assert_eq!(track.resolved_target(), 90.0);
    }
}
