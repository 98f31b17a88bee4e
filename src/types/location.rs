//! Lookup payloads for the address facade

use serde::{Deserialize, Serialize};

/// Where a gate address leads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationData {
    pub galaxy: String,
    /// Symbol base the address is written in
    pub base: u32,
    pub gate_address: String,
    /// Opaque location id (world, space, session) of the target gate
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Directory record as written in the configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub galaxy: String,
    pub base: u32,
    pub gate_address: String,
    pub location: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl From<&DirectoryEntry> for LocationData {
    fn from(entry: &DirectoryEntry) -> Self {
        Self {
            galaxy: entry.galaxy.clone(),
            base: entry.base,
            gate_address: entry.gate_address.clone(),
            location: entry.location.clone(),
            label: entry.label.clone(),
        }
    }
}
