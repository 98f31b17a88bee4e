//! Dial sequencer
//!
//! Drives one "turn the ring, lock a chevron" step at a time:
//! rotation track → ring animation with the turning cue → commit ring angle,
//! then lit chevron → lock cue → settle delay → status report.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::core::audio::{AudioCueController, Cue};
use crate::core::chevrons::{ChevronLockController, ResetHandle};
use crate::core::gate::GateStateMachine;
use crate::core::host::{ActorHost, ActorId};
use crate::core::rotation::RotationProfile;
use crate::error::GateError;
use crate::types::{DialPlan, DialStep, GateSnapshot, GateVariant, StatusReport};
use crate::{ROTATION_BUFFER_MS, SETTLE_DELAY_MS};

/// Animation channel the ring rotation plays on
pub const ROTATION_ANIMATION: &str = "rotation";

/// Capacity of the status feed
const STATUS_FEED_CAPACITY: usize = 64;

/// Result of a lock request
#[derive(Debug, Clone, PartialEq)]
pub enum LockOutcome {
    /// Gate was not dialing; nothing happened
    Ignored,
    /// Chevron lit; `report` is `None` for silent locks
    Locked { report: Option<StatusReport> },
}

impl LockOutcome {
    pub fn is_locked(&self) -> bool {
        matches!(self, LockOutcome::Locked { .. })
    }
}

/// Orchestrates ring rotation, chevron locks and audio for one gate
pub struct DialSequencer {
    host: Arc<dyn ActorHost>,
    variant: Arc<GateVariant>,
    profile: RotationProfile,
    frame: ActorId,
    ring: ActorId,
    /// Where the ring physically rests, in [0, 360)
    ring_angle: f64,
    chevrons: ChevronLockController,
    audio: AudioCueController,
    status_tx: broadcast::Sender<StatusReport>,
    settle_delay: Duration,
    rotation_buffer: Duration,
}

impl DialSequencer {
    /// Build frame, ring, cues and chevrons, then switch every chevron off.
    ///
    /// Resolves once the initial reset has settled, so the gate starts dark.
    pub async fn init(host: Arc<dyn ActorHost>, variant: GateVariant) -> Result<Self, GateError> {
        let variant = Arc::new(variant);

        let frame = host
            .create_from_library(&variant.frame_resource, "Gate Frame", None)
            .await?;
        let ring = host
            .create_from_library(&variant.ring_resource, "Gate Ring", None)
            .await?;
        let audio = AudioCueController::create(host.clone(), ring, &variant).await?;
        let chevrons = ChevronLockController::new(host.clone(), variant.clone());
        let (status_tx, _) = broadcast::channel(STATUS_FEED_CAPACITY);

        let sequencer = Self {
            host,
            variant,
            profile: RotationProfile::default(),
            frame,
            ring,
            ring_angle: 0.0,
            chevrons,
            audio,
            status_tx,
            settle_delay: Duration::from_millis(SETTLE_DELAY_MS),
            rotation_buffer: Duration::from_millis(ROTATION_BUFFER_MS),
        };

        sequencer.reset_gate().settled().await?;
        tracing::info!(variant = %sequencer.variant.name, %frame, %ring, "gate initialized");
        Ok(sequencer)
    }

    /// Override the speed profile
    pub fn with_profile(mut self, profile: RotationProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Override settle delay and rotation buffer
    pub fn with_timing(mut self, settle_delay: Duration, rotation_buffer: Duration) -> Self {
        self.settle_delay = settle_delay;
        self.rotation_buffer = rotation_buffer;
        self
    }

    /// Lock in a chevron.
    ///
    /// A no-op unless `gate` says dialing: stray calls racing a dial abort are
    /// absorbed, not reported as errors.
    pub async fn lock_chevron(
        &self,
        gate: GateSnapshot,
        index: usize,
        silent: bool,
    ) -> Result<LockOutcome, GateError> {
        if !gate.accepts_locks() {
            tracing::warn!(index, status = %gate.status, "chevron lock ignored, gate is not dialing");
            return Ok(LockOutcome::Ignored);
        }

        self.chevrons.set_chevron(index, true).await?;
        self.audio.restart(Cue::Lock);
        tokio::time::sleep(self.settle_delay).await;

        if silent {
            return Ok(LockOutcome::Locked { report: None });
        }

        let report = StatusReport::chevron_locked(index, gate.direction);
        tracing::info!(chevron = index + 1, message = %report.message, "chevron locked");
        // No subscribers is fine
        let _ = self.status_tx.send(report.clone());

        Ok(LockOutcome::Locked {
            report: Some(report),
        })
    }

    /// Turn the ring so `step.symbol` sits under `step.chevron`.
    ///
    /// Returns the committed ring angle. Concurrent calls are not supported.
    pub async fn dial_chevron(&mut self, step: DialStep) -> Result<f64, GateError> {
        let target = self.variant.symbol_angle(step.chevron, step.symbol)?;
        let track = self.profile.generate(self.ring_angle, target, step.direction);

        tracing::debug!(
            chevron = step.chevron,
            symbol = step.symbol,
            from = self.ring_angle,
            to = target,
            seconds = track.duration(),
            "ring rotation started"
        );

        self.host
            .create_animation(self.ring, ROTATION_ANIMATION, &track.keyframes)
            .await?;
        self.host.enable_animation(self.ring, ROTATION_ANIMATION).await?;
        self.audio.resume(Cue::Turning);

        let playback = Duration::from_secs_f64(track.duration()) + self.rotation_buffer;
        tokio::time::sleep(playback).await;

        self.audio.pause(Cue::Turning);
        self.host.disable_animation(self.ring, ROTATION_ANIMATION).await?;

        self.ring_angle = target;
        Ok(target)
    }

    /// Dial a whole plan: rotate, then lock, for every step.
    ///
    /// The gate is re-read before each step; once it stops dialing the run
    /// ends early. Returns how many chevrons were locked.
    pub async fn dial_address(
        &mut self,
        gate: &GateStateMachine,
        plan: &DialPlan,
    ) -> Result<usize, GateError> {
        let mut locked = 0;

        for step in plan.steps() {
            if !gate.snapshot().accepts_locks() {
                tracing::info!(locked, remaining = plan.len() - locked, "dial interrupted");
                break;
            }

            self.dial_chevron(*step).await?;

            match self.lock_chevron(gate.snapshot(), step.chevron, false).await? {
                LockOutcome::Locked { .. } => locked += 1,
                LockOutcome::Ignored => break,
            }
        }

        Ok(locked)
    }

    /// Switch every chevron off; see [`ResetHandle`] for completion tracking
    pub fn reset_gate(&self) -> ResetHandle {
        tracing::debug!("gate reset requested");
        self.chevrons.reset_all()
    }

    /// Live status lines
    pub fn subscribe_status(&self) -> broadcast::Receiver<StatusReport> {
        self.status_tx.subscribe()
    }

    pub fn ring_angle(&self) -> f64 {
        self.ring_angle
    }

    pub fn ring(&self) -> ActorId {
        self.ring
    }

    pub fn frame(&self) -> ActorId {
        self.frame
    }

    pub fn chevrons(&self) -> &ChevronLockController {
        &self.chevrons
    }

    pub fn audio(&self) -> &AudioCueController {
        &self.audio
    }

    pub fn variant(&self) -> &GateVariant {
        &self.variant
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::host::{HostEvent, PlaybackState, SimulatedHost, SoundCommand, SoundId};
    use crate::error::HostError;
    use crate::types::{ConnectionDirection, GateStatus, RotationDirection, RotationKeyframe};
    use tokio::time::Instant;

    async fn setup() -> (Arc<SimulatedHost>, DialSequencer) {
        let host = Arc::new(SimulatedHost::new());
        let sequencer = DialSequencer::init(host.clone(), GateVariant::sg1()).await.unwrap();
        (host, sequencer)
    }

    #[tokio::test(start_paused = true)]
    async fn test_init_builds_dark_gate() {
        let (host, sequencer) = setup().await;

        assert_eq!(host.actor(sequencer.frame()).unwrap().name, "Gate Frame");
        assert_eq!(host.actor(sequencer.ring()).unwrap().name, "Gate Ring");
        assert_eq!(host.actors_named("Gate Chevron").len(), 9);
        assert_eq!(sequencer.chevrons().locked_count().await, 0);
        assert_eq!(sequencer.ring_angle(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lock_ignored_unless_dialing() {
        let (host, sequencer) = setup().await;
        let mut status = sequencer.subscribe_status();
        let before = host.events().len();

        for state in [GateStatus::Idle, GateStatus::Incoming, GateStatus::Connected] {
            let gate = GateSnapshot::new(state, ConnectionDirection::Outgoing);
            let outcome = sequencer.lock_chevron(gate, 0, false).await.unwrap();
            assert_eq!(outcome, LockOutcome::Ignored);
        }

        assert_eq!(host.events().len(), before);
        assert!(status.try_recv().is_err());
        assert!(!sequencer.chevrons().is_locked(0).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_lock_plays_cue_without_report() {
        let (host, sequencer) = setup().await;
        let mut status = sequencer.subscribe_status();

        let outcome = sequencer.lock_chevron(GateSnapshot::dialing(), 5, true).await.unwrap();

        assert_eq!(outcome, LockOutcome::Locked { report: None });
        assert!(sequencer.chevrons().is_locked(5).await.unwrap());
        let lock_sound = sequencer.audio().sound(Cue::Lock);
        assert_eq!(host.sound_state(lock_sound), Some(PlaybackState::Playing));
        assert!(status.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_lock_reports_after_settle_delay() {
        let (_host, sequencer) = setup().await;
        let mut status = sequencer.subscribe_status();

        let start = Instant::now();
        let outcome = sequencer.lock_chevron(GateSnapshot::dialing(), 2, false).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(SETTLE_DELAY_MS));

        let LockOutcome::Locked { report: Some(report) } = outcome else {
            panic!("expected a report");
        };
        assert_eq!(report.message, "Chevron 3 locked in.");
        assert_eq!(status.try_recv().unwrap().message, "Chevron 3 locked in.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_incoming_lock_is_prefixed() {
        let (_host, sequencer) = setup().await;
        let gate = GateSnapshot::new(GateStatus::Dialing, ConnectionDirection::Incoming);

        let outcome = sequencer.lock_chevron(gate, 0, false).await.unwrap();
        let LockOutcome::Locked { report: Some(report) } = outcome else {
            panic!("expected a report");
        };
        assert_eq!(report.message, "Incoming! Chevron 1 locked in.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dial_first_chevron_commits_240() {
        let (host, mut sequencer) = setup().await;
        let step = DialStep::new(0, 0, RotationDirection::CounterClockwise).unwrap();

        let start = Instant::now();
        let angle = sequencer.dial_chevron(step).await.unwrap();
        let elapsed = start.elapsed();

        assert_eq!(angle, 240.0);
        assert_eq!(sequencer.ring_angle(), 240.0);
        assert_eq!(host.actor(sequencer.ring()).unwrap().rotation_deg, 240.0);

        // 19 ticks at 1/3 s plus the playback buffer
        let expected = Duration::from_secs_f64(19.0 / 3.0) + Duration::from_millis(ROTATION_BUFFER_MS);
        assert!(elapsed >= expected, "{:?} < {:?}", elapsed, expected);
        assert!(elapsed < expected + Duration::from_millis(5));

        let turning = sequencer.audio().sound(Cue::Turning);
        assert_eq!(host.sound_state(turning), Some(PlaybackState::Paused));
        assert!(!host.animation_enabled(sequencer.ring(), ROTATION_ANIMATION));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dial_event_order() {
        let (host, mut sequencer) = setup().await;
        let ring = sequencer.ring();
        let turning = sequencer.audio().sound(Cue::Turning);
        let before = host.events().len();

        let step = DialStep::new(3, 13, RotationDirection::Clockwise).unwrap();
        sequencer.dial_chevron(step).await.unwrap();

        let events: Vec<HostEvent> = host.events().split_off(before);
        assert!(matches!(&events[0], HostEvent::AnimationCreated { actor, .. } if *actor == ring));
        assert!(matches!(&events[1], HostEvent::AnimationEnabled { .. }));
        assert_eq!(
            events[2],
            HostEvent::SoundCommanded { id: turning, command: SoundCommand::Resume }
        );
        assert_eq!(
            events[3],
            HostEvent::SoundCommanded { id: turning, command: SoundCommand::Pause }
        );
        assert!(matches!(&events[4], HostEvent::AnimationDisabled { .. }));
        assert!((sequencer.ring_angle() - 120.0).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotation_failure_keeps_ring_angle() {
        struct NoAnimations(SimulatedHost);

        #[async_trait::async_trait]
        impl ActorHost for NoAnimations {
            async fn create_empty(&self, name: &str, rotation_deg: f64) -> Result<ActorId, HostError> {
                self.0.create_empty(name, rotation_deg).await
            }
            async fn create_from_library(&self, resource_id: &str, name: &str, parent: Option<ActorId>) -> Result<ActorId, HostError> {
                self.0.create_from_library(resource_id, name, parent).await
            }
            async fn create_animation(&self, _actor: ActorId, _name: &str, _keyframes: &[RotationKeyframe]) -> Result<(), HostError> {
                Err(HostError::Rejected("animations disabled".into()))
            }
            async fn enable_animation(&self, actor: ActorId, name: &str) -> Result<(), HostError> {
                self.0.enable_animation(actor, name).await
            }
            async fn disable_animation(&self, actor: ActorId, name: &str) -> Result<(), HostError> {
                self.0.disable_animation(actor, name).await
            }
            async fn destroy_actor(&self, actor: ActorId) -> Result<(), HostError> {
                self.0.destroy_actor(actor).await
            }
            async fn create_sound(&self, parent: ActorId, url: &str, looping: bool) -> Result<SoundId, HostError> {
                self.0.create_sound(parent, url, looping).await
            }
            fn command_sound(&self, sound: SoundId, command: SoundCommand) {
                self.0.command_sound(sound, command)
            }
        }

        let host = Arc::new(NoAnimations(SimulatedHost::new()));
        let mut sequencer = DialSequencer::init(host, GateVariant::sg1()).await.unwrap();

        let step = DialStep::new(0, 0, RotationDirection::CounterClockwise).unwrap();
        let err = sequencer.dial_chevron(step).await.unwrap_err();

        assert!(matches!(err, GateError::Host(HostError::Rejected(_))));
        assert_eq!(sequencer.ring_angle(), 0.0);
        assert_eq!(sequencer.audio().state(Cue::Turning), PlaybackState::Stopped);
    }
}
