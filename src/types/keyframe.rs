//! Ring rotation samples
//!
//! A track is the ordered list of keyframes the host animates the ring with.
//! Angles follow the unwrapped travel path: a counter-clockwise move from 350
//! to 10 ends at 370, never jumps back through 0.

use serde::{Deserialize, Serialize};

/// Rotational sense of the ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationDirection {
    /// Increasing angle
    CounterClockwise,
    /// Decreasing angle
    Clockwise,
}

impl RotationDirection {
    /// Map the classic boolean flag (`true` = counter-clockwise)
    pub fn from_flag(ccw: bool) -> Self {
        if ccw {
            RotationDirection::CounterClockwise
        } else {
            RotationDirection::Clockwise
        }
    }

    /// +1.0 or -1.0
    pub fn sign(&self) -> f64 {
        match self {
            RotationDirection::CounterClockwise => 1.0,
            RotationDirection::Clockwise => -1.0,
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            RotationDirection::CounterClockwise => RotationDirection::Clockwise,
            RotationDirection::Clockwise => RotationDirection::CounterClockwise,
        }
    }
}

impl std::fmt::Display for RotationDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RotationDirection::CounterClockwise => write!(f, "ccw"),
            RotationDirection::Clockwise => write!(f, "cw"),
        }
    }
}

/// Normalize an angle into [0, 360)
pub fn normalize_angle(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// One sample of the ring rotation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationKeyframe {
    /// Seconds since the start of the track
    pub time: f64,
    /// Degrees along the travel path
    pub angle: f64,
}

impl RotationKeyframe {
    pub fn new(time: f64, angle: f64) -> Self {
        Self { time, angle }
    }

    /// Angle folded back into [0, 360)
    pub fn bearing(&self) -> f64 {
        normalize_angle(self.angle)
    }

    /// Angle in radians, for hosts that build quaternions about the forward axis
    pub fn rotation_radians(&self) -> f64 {
        self.angle.to_radians()
    }
}

/// Complete rotation from one ring position to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationTrack {
    pub direction: RotationDirection,
    pub keyframes: Vec<RotationKeyframe>,
}

impl RotationTrack {
    /// Normalized angle the track starts from
    pub fn source(&self) -> f64 {
        self.keyframes.first().map(|k| k.angle).unwrap_or_default()
    }

    /// Target on the unwrapped path (may lie outside [0, 360))
    pub fn resolved_target(&self) -> f64 {
        self.keyframes.last().map(|k| k.angle).unwrap_or_default()
    }

    /// Degrees travelled
    pub fn distance(&self) -> f64 {
        (self.resolved_target() - self.source()).abs()
    }

    /// Time of the last keyframe in seconds
    pub fn duration(&self) -> f64 {
        self.keyframes.last().map(|k| k.time).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }
}
