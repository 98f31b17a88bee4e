//! Settings: defaults, then an optional TOML file, then environment overrides

use std::{
    collections::HashMap,
    fs,
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{DirectoryEntry, GateVariant};

/// File read when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "stargate.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_bind: String,
    /// Name of the gate variant to build
    pub variant: String,
    /// Known gates for the lookup facade
    pub directory: Vec<DirectoryEntry>,
    /// Extra variants declared in the file
    pub variants: HashMap<String, GateVariant>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:3000".into(),
            variant: "sg1".into(),
            directory: Vec::new(),
            variants: HashMap::new(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Resolve the selected variant, configured ones first
    pub fn gate_variant(&self) -> Result<GateVariant, ConfigError> {
        if let Some(variant) = self.variants.get(&self.variant) {
            return Ok(variant.clone());
        }
        GateVariant::preset(&self.variant).ok_or_else(|| ConfigError::UnknownVariant(self.variant.clone()))
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("STARGATE_BIND") {
            self.server_bind = v;
        }
        if let Some(v) = lookup("STARGATE_VARIANT") {
            self.variant = v;
        }
    }
}

/// Load settings from `path`, or from `stargate.toml` if present
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    let mut settings = match path {
        Some(path) => read_file(path)?,
        None if default_path.exists() => read_file(default_path)?,
        None => Settings::default(),
    };

    settings.apply_overrides(|key| std::env::var(key).ok());
    tracing::debug!(bind = %settings.server_bind, variant = %settings.variant, gates = settings.directory.len(), "settings loaded");
    Ok(settings)
}

fn read_file(path: &Path) -> Result<Settings, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Settings::from_toml(&raw)
}
