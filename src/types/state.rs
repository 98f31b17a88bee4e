//! Gate status definitions

use serde::{Deserialize, Serialize};

/// The four possible states of a gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateStatus {
    /// Nothing going on, chevrons dark
    #[default]
    Idle,
    /// Ring is turning and chevrons lock one by one
    Dialing,
    /// A remote gate has started dialing this one
    Incoming,
    /// Wormhole established
    Connected,
}

impl GateStatus {
    /// Get ANSI color code for terminal display
    pub fn color_code(&self) -> &'static str {
        match self {
            GateStatus::Idle => "\x1b[90m",       // Gray
            GateStatus::Dialing => "\x1b[33m",    // Orange/Yellow
            GateStatus::Incoming => "\x1b[35m",   // Magenta
            GateStatus::Connected => "\x1b[36m",  // Cyan
        }
    }

    /// Reset ANSI color
    pub fn color_reset() -> &'static str {
        "\x1b[0m"
    }
}

impl std::fmt::Display for GateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GateStatus::Idle => "IDLE",
            GateStatus::Dialing => "DIALING",
            GateStatus::Incoming => "INCOMING",
            GateStatus::Connected => "CONNECTED",
        };
        write!(f, "{}", name)
    }
}

/// Which side started the connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionDirection {
    #[default]
    Outgoing,
    Incoming,
}

impl ConnectionDirection {
    pub fn is_incoming(&self) -> bool {
        matches!(self, ConnectionDirection::Incoming)
    }
}

/// Point-in-time view of the gate, handed to the sequencer for every lock step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GateSnapshot {
    pub status: GateStatus,
    pub direction: ConnectionDirection,
}

impl GateSnapshot {
    pub fn new(status: GateStatus, direction: ConnectionDirection) -> Self {
        Self { status, direction }
    }

    /// Shorthand for an outgoing dial in progress
    pub fn dialing() -> Self {
        Self::new(GateStatus::Dialing, ConnectionDirection::Outgoing)
    }

    /// Chevrons may only lock while dialing
    pub fn accepts_locks(&self) -> bool {
        self.status == GateStatus::Dialing
    }
}
