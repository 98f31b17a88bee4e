//! Core types for the gate

mod state;
mod keyframe;
mod variant;
mod dial;
mod output;
mod location;

pub use state::{GateStatus, ConnectionDirection, GateSnapshot};
pub use keyframe::{RotationDirection, RotationKeyframe, RotationTrack, normalize_angle};
pub use variant::GateVariant;
pub use dial::{DialStep, DialPlan, parse_symbols};
pub use output::StatusReport;
pub use location::{LocationData, DirectoryEntry};
