//! Actor host contract
//!
//! The gate never renders anything itself. It asks a host to create actors,
//! attach rotation animations and play sounds, and awaits the host's
//! confirmation. [`SimulatedHost`] is an in-memory host that records every
//! request; the CLI demo and the tests run against it.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::types::RotationKeyframe;

/// Opaque handle to a host actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

/// Opaque handle to a host sound instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoundId(pub u64);

impl std::fmt::Display for SoundId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sound#{}", self.0)
    }
}

/// Playback state of a sound instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Scheduling hint sent to a sound instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCommand {
    /// Start from the beginning
    Play,
    Stop,
    Pause,
    /// Continue from the current position
    Resume,
}

/// Rendering/actor host used by the gate
#[async_trait]
pub trait ActorHost: Send + Sync {
    /// Create an empty actor rotated about the forward axis
    async fn create_empty(&self, name: &str, rotation_deg: f64) -> Result<ActorId, HostError>;

    /// Instantiate a library resource, resolving once the model exists
    async fn create_from_library(
        &self,
        resource_id: &str,
        name: &str,
        parent: Option<ActorId>,
    ) -> Result<ActorId, HostError>;

    async fn create_animation(
        &self,
        actor: ActorId,
        name: &str,
        keyframes: &[RotationKeyframe],
    ) -> Result<(), HostError>;

    async fn enable_animation(&self, actor: ActorId, name: &str) -> Result<(), HostError>;

    async fn disable_animation(&self, actor: ActorId, name: &str) -> Result<(), HostError>;

    /// Destroy an actor and everything parented to it
    async fn destroy_actor(&self, actor: ActorId) -> Result<(), HostError>;

    async fn create_sound(
        &self,
        parent: ActorId,
        url: &str,
        looping: bool,
    ) -> Result<SoundId, HostError>;

    /// Fire-and-forget; there is no ordering guarantee between commands
    fn command_sound(&self, sound: SoundId, command: SoundCommand);
}

// =============================================================================
// SIMULATED HOST
// =============================================================================

/// Everything the simulated host was asked to do, in order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    ActorCreated {
        id: ActorId,
        name: String,
        resource: Option<String>,
        parent: Option<ActorId>,
    },
    ActorDestroyed {
        id: ActorId,
    },
    AnimationCreated {
        actor: ActorId,
        name: String,
        keyframes: usize,
    },
    AnimationEnabled {
        actor: ActorId,
        name: String,
    },
    AnimationDisabled {
        actor: ActorId,
        name: String,
    },
    SoundCreated {
        id: SoundId,
        url: String,
        looping: bool,
    },
    SoundCommanded {
        id: SoundId,
        command: SoundCommand,
    },
}

/// A live actor in the simulated scene
#[derive(Debug, Clone, PartialEq)]
pub struct ActorRecord {
    pub id: ActorId,
    pub name: String,
    pub resource: Option<String>,
    pub parent: Option<ActorId>,
    /// Degrees about the forward axis
    pub rotation_deg: f64,
    animations: HashMap<String, AnimationRecord>,
}

#[derive(Debug, Clone, PartialEq)]
struct AnimationRecord {
    keyframes: Vec<RotationKeyframe>,
    enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct SoundRecord {
    url: String,
    looping: bool,
    state: PlaybackState,
}

#[derive(Debug, Default)]
struct World {
    next_id: u64,
    actors: HashMap<ActorId, ActorRecord>,
    sounds: HashMap<SoundId, SoundRecord>,
    events: Vec<HostEvent>,
}

impl World {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn animation_mut(&mut self, actor: ActorId, name: &str) -> Result<&mut AnimationRecord, HostError> {
        self.actors
            .get_mut(&actor)
            .ok_or(HostError::UnknownActor(actor))?
            .animations
            .get_mut(name)
            .ok_or_else(|| HostError::UnknownAnimation { actor, name: name.to_string() })
    }
}

/// In-memory host with optional instantiation latency and failure injection
#[derive(Debug, Default)]
pub struct SimulatedHost {
    world: Mutex<World>,
    failing: Mutex<HashSet<String>>,
    latency: Duration,
}

impl SimulatedHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Library instantiation takes `latency` to confirm
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    /// Make every future instantiation of `resource_id` fail
    pub fn fail_resource(&self, resource_id: &str) {
        lock(&self.failing).insert(resource_id.to_string());
    }

    /// Let `resource_id` instantiate again
    pub fn heal_resource(&self, resource_id: &str) {
        lock(&self.failing).remove(resource_id);
    }

    pub fn events(&self) -> Vec<HostEvent> {
        lock(&self.world).events.clone()
    }

    pub fn actor(&self, id: ActorId) -> Option<ActorRecord> {
        lock(&self.world).actors.get(&id).cloned()
    }

    pub fn live_actor_count(&self) -> usize {
        lock(&self.world).actors.len()
    }

    /// Live actors whose name starts with `prefix`
    pub fn actors_named(&self, prefix: &str) -> Vec<ActorRecord> {
        let world = lock(&self.world);
        let mut found: Vec<ActorRecord> = world
            .actors
            .values()
            .filter(|a| a.name.starts_with(prefix))
            .cloned()
            .collect();
        found.sort_by_key(|a| a.id.0);
        found
    }

    /// Live actors parented to `parent`
    pub fn children_of(&self, parent: ActorId) -> Vec<ActorRecord> {
        let world = lock(&self.world);
        let mut found: Vec<ActorRecord> = world
            .actors
            .values()
            .filter(|a| a.parent == Some(parent))
            .cloned()
            .collect();
        found.sort_by_key(|a| a.id.0);
        found
    }

    pub fn sound_state(&self, id: SoundId) -> Option<PlaybackState> {
        lock(&self.world).sounds.get(&id).map(|s| s.state)
    }

    /// Whether the named animation is currently running on `actor`
    pub fn animation_enabled(&self, actor: ActorId, name: &str) -> bool {
        lock(&self.world)
            .actors
            .get(&actor)
            .and_then(|a| a.animations.get(name))
            .map(|anim| anim.enabled)
            .unwrap_or(false)
    }

    async fn settle(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl ActorHost for SimulatedHost {
    async fn create_empty(&self, name: &str, rotation_deg: f64) -> Result<ActorId, HostError> {
        let mut world = lock(&self.world);
        let id = ActorId(world.next_id());
        world.actors.insert(
            id,
            ActorRecord {
                id,
                name: name.to_string(),
                resource: None,
                parent: None,
                rotation_deg,
                animations: HashMap::new(),
            },
        );
        world.events.push(HostEvent::ActorCreated {
            id,
            name: name.to_string(),
            resource: None,
            parent: None,
        });
        Ok(id)
    }

    async fn create_from_library(
        &self,
        resource_id: &str,
        name: &str,
        parent: Option<ActorId>,
    ) -> Result<ActorId, HostError> {
        self.settle().await;

        if lock(&self.failing).contains(resource_id) {
            return Err(HostError::ResourceUnavailable(resource_id.to_string()));
        }

        let mut world = lock(&self.world);
        if let Some(p) = parent {
            if !world.actors.contains_key(&p) {
                return Err(HostError::UnknownActor(p));
            }
        }

        let id = ActorId(world.next_id());
        world.actors.insert(
            id,
            ActorRecord {
                id,
                name: name.to_string(),
                resource: Some(resource_id.to_string()),
                parent,
                rotation_deg: 0.0,
                animations: HashMap::new(),
            },
        );
        world.events.push(HostEvent::ActorCreated {
            id,
            name: name.to_string(),
            resource: Some(resource_id.to_string()),
            parent,
        });
        Ok(id)
    }

    async fn create_animation(
        &self,
        actor: ActorId,
        name: &str,
        keyframes: &[RotationKeyframe],
    ) -> Result<(), HostError> {
        let mut world = lock(&self.world);
        let record = world.actors.get_mut(&actor).ok_or(HostError::UnknownActor(actor))?;
        record.animations.insert(
            name.to_string(),
            AnimationRecord {
                keyframes: keyframes.to_vec(),
                enabled: false,
            },
        );
        world.events.push(HostEvent::AnimationCreated {
            actor,
            name: name.to_string(),
            keyframes: keyframes.len(),
        });
        Ok(())
    }

    async fn enable_animation(&self, actor: ActorId, name: &str) -> Result<(), HostError> {
        let mut world = lock(&self.world);
        world.animation_mut(actor, name)?.enabled = true;
        world.events.push(HostEvent::AnimationEnabled {
            actor,
            name: name.to_string(),
        });
        Ok(())
    }

    async fn disable_animation(&self, actor: ActorId, name: &str) -> Result<(), HostError> {
        let mut world = lock(&self.world);
        let anim = world.animation_mut(actor, name)?;
        anim.enabled = false;
        // The actor rests where the last applied keyframe left it
        let last = anim.keyframes.last().map(|k| k.angle);
        if let (Some(angle), Some(record)) = (last, world.actors.get_mut(&actor)) {
            record.rotation_deg = angle;
        }
        world.events.push(HostEvent::AnimationDisabled {
            actor,
            name: name.to_string(),
        });
        Ok(())
    }

    async fn destroy_actor(&self, actor: ActorId) -> Result<(), HostError> {
        let mut world = lock(&self.world);
        if !world.actors.contains_key(&actor) {
            return Err(HostError::UnknownActor(actor));
        }

        let mut doomed = vec![actor];
        let mut i = 0;
        while i < doomed.len() {
            let current = doomed[i];
            doomed.extend(
                world
                    .actors
                    .values()
                    .filter(|a| a.parent == Some(current))
                    .map(|a| a.id),
            );
            i += 1;
        }

        for id in doomed {
            world.actors.remove(&id);
            world.events.push(HostEvent::ActorDestroyed { id });
        }
        Ok(())
    }

    async fn create_sound(
        &self,
        parent: ActorId,
        url: &str,
        looping: bool,
    ) -> Result<SoundId, HostError> {
        let mut world = lock(&self.world);
        if !world.actors.contains_key(&parent) {
            return Err(HostError::UnknownActor(parent));
        }
        let id = SoundId(world.next_id());
        world.sounds.insert(
            id,
            SoundRecord {
                url: url.to_string(),
                looping,
                state: PlaybackState::Stopped,
            },
        );
        world.events.push(HostEvent::SoundCreated {
            id,
            url: url.to_string(),
            looping,
        });
        Ok(id)
    }

    fn command_sound(&self, sound: SoundId, command: SoundCommand) {
        let mut world = lock(&self.world);
        let Some(record) = world.sounds.get_mut(&sound) else {
            tracing::warn!(%sound, ?command, "command for unknown sound dropped");
            return;
        };
        record.state = match command {
            SoundCommand::Play | SoundCommand::Resume => PlaybackState::Playing,
            SoundCommand::Stop => PlaybackState::Stopped,
            SoundCommand::Pause => PlaybackState::Paused,
        };
        world.events.push(HostEvent::SoundCommanded { id: sound, command });
    }
}

/// Lock a mutex, recovering the data if a panicking holder poisoned it
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
