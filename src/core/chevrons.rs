//! Chevron lock controller
//!
//! Nine slots, each owning the host actor that currently shows the chevron.
//! A swap creates the new visual, waits for the host to confirm the model,
//! and only then destroys the old one, so there is never a visible gap.

use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::core::host::{ActorHost, ActorId};
use crate::error::GateError;
use crate::types::GateVariant;
use crate::CHEVRON_COUNT;

/// One fixed latch position
#[derive(Debug, Clone, PartialEq)]
pub struct ChevronSlot {
    pub index: usize,
    /// Degrees, fixed per index
    pub base_angle: f64,
    locked: bool,
    visual: Option<ActorId>,
}

impl ChevronSlot {
    fn new(index: usize, base_angle: f64) -> Self {
        Self {
            index,
            base_angle,
            locked: false,
            visual: None,
        }
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    pub fn visual(&self) -> Option<ActorId> {
        self.visual
    }
}

/// Owns the chevron arena and swaps lit/unlit visuals
#[derive(Clone)]
pub struct ChevronLockController {
    host: Arc<dyn ActorHost>,
    variant: Arc<GateVariant>,
    slots: Arc<Vec<Mutex<ChevronSlot>>>,
}

impl ChevronLockController {
    pub fn new(host: Arc<dyn ActorHost>, variant: Arc<GateVariant>) -> Self {
        let slots = variant
            .chevron_angles
            .iter()
            .enumerate()
            .map(|(i, &angle)| Mutex::new(ChevronSlot::new(i, angle)))
            .collect();
        Self {
            host,
            variant,
            slots: Arc::new(slots),
        }
    }

    /// Light up or switch off a chevron.
    ///
    /// The slot stays locked for the whole create/confirm/destroy sequence, so
    /// overlapping calls for the same index run one after the other. On a host
    /// failure the slot keeps its previous visual and flag.
    pub async fn set_chevron(&self, index: usize, lit: bool) -> Result<ActorId, GateError> {
        let slot_lock = self
            .slots
            .get(index)
            .ok_or(GateError::ChevronOutOfRange(index))?;
        let mut slot = slot_lock.lock().await;

        let holder = self
            .host
            .create_empty(&format!("Gate Chevron {}", index), slot.base_angle)
            .await?;

        let resource = self.variant.chevron_resource(lit);
        if let Err(err) = self
            .host
            .create_from_library(resource, &format!("Chevron Model {}", index), Some(holder))
            .await
        {
            tracing::warn!(index, lit, error = %err, "chevron model failed to instantiate");
            if let Err(cleanup) = self.host.destroy_actor(holder).await {
                tracing::warn!(index, error = %cleanup, "orphaned chevron holder left behind");
            }
            return Err(err.into());
        }

        let previous = slot.visual.replace(holder);
        slot.locked = lit;

        if let Some(old) = previous {
            self.host.destroy_actor(old).await?;
        }

        tracing::debug!(index, lit, %holder, "chevron visual swapped");
        Ok(holder)
    }

    /// Switch every chevron off without waiting.
    ///
    /// Each slot resets in its own task. Drop the handle to fire and forget,
    /// or await [`ResetHandle::settled`] to know when the gate is dark.
    pub fn reset_all(&self) -> ResetHandle {
        let tasks = (0..CHEVRON_COUNT)
            .map(|index| {
                let controller = self.clone();
                tokio::spawn(async move {
                    let result = controller.set_chevron(index, false).await;
                    if let Err(err) = &result {
                        tracing::warn!(index, error = %err, "chevron reset failed");
                    }
                    result
                })
            })
            .collect();
        ResetHandle { tasks }
    }

    /// Locked flag of a slot, once any in-flight swap on it has finished
    pub async fn is_locked(&self, index: usize) -> Result<bool, GateError> {
        Ok(self.slot(index).await?.locked)
    }

    /// Current visual of a slot, once any in-flight swap on it has finished
    pub async fn visual(&self, index: usize) -> Result<Option<ActorId>, GateError> {
        Ok(self.slot(index).await?.visual)
    }

    pub async fn slot(&self, index: usize) -> Result<ChevronSlot, GateError> {
        let slot_lock = self
            .slots
            .get(index)
            .ok_or(GateError::ChevronOutOfRange(index))?;
        let slot = slot_lock.lock().await;
        Ok(slot.clone())
    }

    pub async fn locked_count(&self) -> usize {
        let mut count = 0;
        for slot in self.slots.iter() {
            if slot.lock().await.locked {
                count += 1;
            }
        }
        count
    }
}

/// In-flight chevron resets
#[derive(Debug)]
pub struct ResetHandle {
    tasks: Vec<JoinHandle<Result<ActorId, GateError>>>,
}

impl ResetHandle {
    /// Resets that have not finished yet
    pub fn in_flight(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_finished()).count()
    }

    /// Wait for all resets, returning the first failure
    pub async fn settled(self) -> Result<(), GateError> {
        let mut first_error = None;
        for outcome in join_all(self.tasks).await {
            let failure = match outcome {
                Ok(Ok(_)) => continue,
                Ok(Err(err)) => err,
                Err(join) => GateError::ResetTask(join.to_string()),
            };
            first_error.get_or_insert(failure);
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
