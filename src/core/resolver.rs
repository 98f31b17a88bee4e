//! Address-resolution contract
//!
//! Maps a dialed address to the location of the gate it reaches, and back.
//! [`StaticDirectory`] answers from a fixed table loaded from configuration.

use async_trait::async_trait;

use crate::error::LookupError;
use crate::types::{DirectoryEntry, LocationData};

/// Lookups the dialing controller and the HTTP facade rely on
#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Where does `address` lead?
    async fn lookup_dialed_target(
        &self,
        address: &str,
        base: u32,
        galaxy: &str,
    ) -> Result<LocationData, LookupError>;

    /// Which address reaches the gate at `location`?
    async fn lookup_gate_address(
        &self,
        location: &str,
        base: u32,
        galaxy: &str,
    ) -> Result<LocationData, LookupError>;
}

/// Table-backed resolver
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    entries: Vec<DirectoryEntry>,
}

impl StaticDirectory {
    pub fn new(entries: Vec<DirectoryEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find<F>(&self, base: u32, galaxy: &str, matches: F) -> Option<&DirectoryEntry>
    where
        F: Fn(&DirectoryEntry) -> bool,
    {
        self.entries
            .iter()
            .find(|e| e.base == base && e.galaxy.eq_ignore_ascii_case(galaxy) && matches(e))
    }
}

#[async_trait]
impl AddressResolver for StaticDirectory {
    async fn lookup_dialed_target(
        &self,
        address: &str,
        base: u32,
        galaxy: &str,
    ) -> Result<LocationData, LookupError> {
        let wanted = canonical_address(address);
        self.find(base, galaxy, |e| canonical_address(&e.gate_address) == wanted)
            .map(LocationData::from)
            .ok_or_else(|| {
                LookupError::NotFound(format!("address {} in {}/{}", address, galaxy, base))
            })
    }

    async fn lookup_gate_address(
        &self,
        location: &str,
        base: u32,
        galaxy: &str,
    ) -> Result<LocationData, LookupError> {
        self.find(base, galaxy, |e| e.location == location)
            .map(LocationData::from)
            .ok_or_else(|| {
                LookupError::NotFound(format!("location {} in {}/{}", location, galaxy, base))
            })
    }
}

/// Addresses compare symbol by symbol, ignoring separators and padding
fn canonical_address(address: &str) -> Vec<String> {
    address
        .split(|c: char| c == ',' || c == '-' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_start_matches('0'))
        .map(|s| if s.is_empty() { "0".to_string() } else { s.to_string() })
        .collect()
}
