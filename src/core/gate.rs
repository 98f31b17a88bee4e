//! Gate state machine
//!
//! State transitions:
//! - IDLE → DIALING: start_dialing (outgoing)
//! - IDLE → INCOMING: announce_incoming
//! - INCOMING → DIALING: accept_incoming (direction becomes incoming)
//! - DIALING → CONNECTED: connect
//! - any → IDLE: abort / disconnect
//!
//! The session owns the transitions. The dial sequencer only ever reads a
//! snapshot, once per chevron lock.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::GateError;
use crate::types::{ConnectionDirection, GateSnapshot, GateStatus};

/// Shared gate status, cheap to read from any task
#[derive(Debug, Clone)]
pub struct GateStateMachine {
    tx: Arc<watch::Sender<GateSnapshot>>,
}

impl Default for GateStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl GateStateMachine {
    /// Create machine in IDLE
    pub fn new() -> Self {
        let (tx, _) = watch::channel(GateSnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    /// Current status and direction
    pub fn snapshot(&self) -> GateSnapshot {
        *self.tx.borrow()
    }

    pub fn status(&self) -> GateStatus {
        self.snapshot().status
    }

    pub fn direction(&self) -> ConnectionDirection {
        self.snapshot().direction
    }

    /// Watch for changes
    pub fn subscribe(&self) -> watch::Receiver<GateSnapshot> {
        self.tx.subscribe()
    }

    /// Begin dialing out
    pub fn start_dialing(&self) -> Result<GateSnapshot, GateError> {
        self.transition(GateStatus::Idle, GateStatus::Dialing, ConnectionDirection::Outgoing)
    }

    /// A remote gate has started dialing this one
    pub fn announce_incoming(&self) -> Result<GateSnapshot, GateError> {
        self.transition(GateStatus::Idle, GateStatus::Incoming, ConnectionDirection::Incoming)
    }

    /// Play back the remote dial sequence locally
    pub fn accept_incoming(&self) -> Result<GateSnapshot, GateError> {
        self.transition(GateStatus::Incoming, GateStatus::Dialing, ConnectionDirection::Incoming)
    }

    /// All chevrons locked, wormhole open
    pub fn connect(&self) -> Result<GateSnapshot, GateError> {
        let direction = self.direction();
        self.transition(GateStatus::Dialing, GateStatus::Connected, direction)
    }

    /// Cancel whatever is going on
    pub fn abort(&self) -> GateSnapshot {
        self.force(GateSnapshot::default())
    }

    /// Close an established connection
    pub fn disconnect(&self) -> GateSnapshot {
        self.force(GateSnapshot::default())
    }

    fn transition(
        &self,
        from: GateStatus,
        to: GateStatus,
        direction: ConnectionDirection,
    ) -> Result<GateSnapshot, GateError> {
        let mut outcome = Err(GateError::InvalidTransition { from, to });
        self.tx.send_if_modified(|current| {
            if current.status != from {
                outcome = Err(GateError::InvalidTransition {
                    from: current.status,
                    to,
                });
                return false;
            }
            *current = GateSnapshot::new(to, direction);
            outcome = Ok(*current);
            true
        });
        if let Ok(next) = &outcome {
            tracing::info!(from = %from, to = %next.status, direction = ?next.direction, "gate status changed");
        }
        outcome
    }

    fn force(&self, next: GateSnapshot) -> GateSnapshot {
        let previous = self.tx.send_replace(next);
        if previous != next {
            tracing::info!(from = %previous.status, to = %next.status, "gate status reset");
        }
        next
    }
}

// =============================================================================
// TESTS
// =============================================================================
