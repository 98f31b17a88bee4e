//! Core modules for the gate

pub mod rotation;
pub mod host;
pub mod audio;
pub mod chevrons;
pub mod gate;
pub mod sequencer;
pub mod resolver;
pub mod api;

pub use rotation::{RotationProfile, generate_rotation};
pub use host::{ActorHost, ActorId, SoundId, SoundCommand, PlaybackState, SimulatedHost, HostEvent};
pub use audio::{AudioCueController, Cue};
pub use chevrons::{ChevronLockController, ChevronSlot, ResetHandle};
pub use gate::GateStateMachine;
pub use sequencer::{DialSequencer, LockOutcome, ROTATION_ANIMATION};
pub use resolver::{AddressResolver, StaticDirectory};
pub use api::{create_router, run_server};
