//! Audio cues for the ring and the chevrons

use std::sync::{Arc, Mutex};

use crate::core::host::{ActorHost, ActorId, PlaybackState, SoundCommand, SoundId};
use crate::error::HostError;
use crate::types::GateVariant;

/// The two sounds a gate plays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Looping grind while the ring turns
    Turning,
    /// One-shot clunk when a chevron locks
    Lock,
}

/// A host sound plus the state we last asked it to be in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CueHandle {
    pub sound: SoundId,
    pub state: PlaybackState,
}

impl CueHandle {
    fn new(sound: SoundId) -> Self {
        Self {
            sound,
            state: PlaybackState::Stopped,
        }
    }
}

/// Start/stop/resume primitives tied to animation phases.
///
/// Commands are scheduling hints: a stop issued right before a play is not
/// guaranteed to be processed first by the host.
pub struct AudioCueController {
    host: Arc<dyn ActorHost>,
    turning: Mutex<CueHandle>,
    lock: Mutex<CueHandle>,
}

impl AudioCueController {
    /// Create both cues on the ring actor
    pub async fn create(
        host: Arc<dyn ActorHost>,
        ring: ActorId,
        variant: &GateVariant,
    ) -> Result<Self, HostError> {
        let turning = host.create_sound(ring, &variant.ring_turning_url(), true).await?;
        let lock = host.create_sound(ring, &variant.chevron_lock_url(), false).await?;
        Ok(Self {
            host,
            turning: Mutex::new(CueHandle::new(turning)),
            lock: Mutex::new(CueHandle::new(lock)),
        })
    }

    /// Stop if playing, then play from the start
    pub fn restart(&self, cue: Cue) {
        self.update(cue, |host, handle| {
            if handle.state == PlaybackState::Playing {
                host.command_sound(handle.sound, SoundCommand::Stop);
            }
            host.command_sound(handle.sound, SoundCommand::Play);
            PlaybackState::Playing
        });
    }

    /// Continue a paused or stopped cue
    pub fn resume(&self, cue: Cue) {
        self.update(cue, |host, handle| {
            host.command_sound(handle.sound, SoundCommand::Resume);
            PlaybackState::Playing
        });
    }

    /// Suspend, keeping the playback position
    pub fn pause(&self, cue: Cue) {
        self.update(cue, |host, handle| {
            host.command_sound(handle.sound, SoundCommand::Pause);
            PlaybackState::Paused
        });
    }

    pub fn state(&self, cue: Cue) -> PlaybackState {
        self.snapshot(cue).state
    }

    pub fn sound(&self, cue: Cue) -> SoundId {
        self.snapshot(cue).sound
    }

    fn snapshot(&self, cue: Cue) -> CueHandle {
        *self
            .handle(cue)
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn handle(&self, cue: Cue) -> &Mutex<CueHandle> {
        match cue {
            Cue::Turning => &self.turning,
            Cue::Lock => &self.lock,
        }
    }

    fn update<F>(&self, cue: Cue, apply: F)
    where
        F: FnOnce(&dyn ActorHost, &CueHandle) -> PlaybackState,
    {
        let mut handle = self
            .handle(cue)
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        handle.state = apply(self.host.as_ref(), &*handle);
        tracing::trace!(?cue, state = ?handle.state, "cue updated");
    }
}
