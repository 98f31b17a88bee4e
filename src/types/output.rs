//! Status reports emitted while dialing

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ConnectionDirection, GateStatus};

/// Human-readable status line produced after a chevron locks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Chevron that locked (0-8)
    pub chevron: usize,
    pub direction: ConnectionDirection,
    /// Display text
    pub message: String,
}

impl StatusReport {
    /// Report for a freshly locked chevron
    pub fn chevron_locked(chevron: usize, direction: ConnectionDirection) -> Self {
        let prefix = if direction.is_incoming() { "Incoming! " } else { "" };
        Self {
            timestamp: Utc::now(),
            chevron,
            direction,
            message: format!("{}Chevron {} locked in.", prefix, chevron + 1),
        }
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let status = GateStatus::Dialing;
        format!(
            "{}[{}] {}{}",
            status.color_code(),
            self.timestamp.format("%H:%M:%S"),
            self.message,
            GateStatus::color_reset()
        )
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "chevron={} | direction={:?} | message={}",
            self.chevron + 1,
            self.direction,
            self.message
        )
    }
}

impl std::fmt::Display for StatusReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outgoing_message() {
        let report = StatusReport::chevron_locked(0, ConnectionDirection::Outgoing);
        assert_eq!(report.message, "Chevron 1 locked in.");
    }

    #[test]
    fn test_incoming_prefix() {
        let report = StatusReport::chevron_locked(6, ConnectionDirection::Incoming);
        assert_eq!(report.message, "Incoming! Chevron 7 locked in.");
    }
}
