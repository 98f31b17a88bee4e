//! Error types

use thiserror::Error;

use crate::core::host::{ActorId, SoundId};
use crate::types::GateStatus;

/// Failures reported by the actor host
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("actor {0} does not exist")]
    UnknownActor(ActorId),
    #[error("sound {0} does not exist")]
    UnknownSound(SoundId),
    #[error("animation `{name}` not found on actor {actor}")]
    UnknownAnimation { actor: ActorId, name: String },
    #[error("resource `{0}` could not be instantiated")]
    ResourceUnavailable(String),
    #[error("host rejected request: {0}")]
    Rejected(String),
}

/// Failures of dial and lock operations
#[derive(Debug, Error)]
pub enum GateError {
    #[error("chevron index {0} out of range (0-8)")]
    ChevronOutOfRange(usize),
    #[error("symbol {0} out of range (0-38)")]
    SymbolOutOfRange(u32),
    #[error("`{0}` is not a symbol number")]
    InvalidSymbol(String),
    #[error("address has {0} symbols, expected 7 to 9")]
    AddressLength(usize),
    #[error("gate cannot go from {from} to {to}")]
    InvalidTransition { from: GateStatus, to: GateStatus },
    #[error("chevron reset task failed: {0}")]
    ResetTask(String),
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Failures of the address-resolution contract
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no gate matches {0}")]
    NotFound(String),
    #[error("lookup failed: {0}")]
    Internal(String),
}

/// Failures while loading settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown gate variant `{0}`")]
    UnknownVariant(String),
}
