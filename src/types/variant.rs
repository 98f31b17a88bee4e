//! Gate variant records
//!
//! Every gate model shares the same sequencer and profile generator; what
//! differs is captured here as data (assets, chevron placement, sounds).

use serde::{Deserialize, Serialize};

use crate::error::GateError;
use crate::{CHEVRON_COUNT, SYMBOL_COUNT};

/// Asset ids, chevron geometry and sound locations for one gate model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateVariant {
    pub name: String,
    pub frame_resource: String,
    pub ring_resource: String,
    pub chevron_lit_resource: String,
    pub chevron_unlit_resource: String,
    /// Base angle of each chevron slot in degrees
    pub chevron_angles: [f64; CHEVRON_COUNT],
    /// Topmost chevron, locked by the final symbol of an address
    pub master_chevron: usize,
    pub sound_base_url: String,
    pub chevron_lock_sound: String,
    pub ring_turning_sound: String,
}

impl GateVariant {
    /// The classic SG-1 gate
    pub fn sg1() -> Self {
        Self {
            name: "sg1".to_string(),
            frame_resource: "artifact:1144171771746845684".to_string(),
            ring_resource: "artifact:1144171766839510003".to_string(),
            chevron_lit_resource: "artifact:1144171760086680562".to_string(),
            chevron_unlit_resource: "artifact:1144171776629015542".to_string(),
            chevron_angles: [240.0, 280.0, 320.0, 0.0, 40.0, 80.0, 120.0, 160.0, 200.0],
            master_chevron: 3,
            sound_base_url:
                "https://raw.githubusercontent.com/willneedit/willneedit.github.io/master/MRE/stargate"
                    .to_string(),
            chevron_lock_sound: "SG_Chevron_lock.wav".to_string(),
            ring_turning_sound: "SG_Turn_Grind.wav".to_string(),
        }
    }

    /// Look up a built-in variant by name
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sg1" => Some(Self::sg1()),
            _ => None,
        }
    }

    pub fn chevron_lock_url(&self) -> String {
        join_url(&self.sound_base_url, &self.chevron_lock_sound)
    }

    pub fn ring_turning_url(&self) -> String {
        join_url(&self.sound_base_url, &self.ring_turning_sound)
    }

    /// Resource id for a chevron in the given lit state
    pub fn chevron_resource(&self, lit: bool) -> &str {
        if lit {
            &self.chevron_lit_resource
        } else {
            &self.chevron_unlit_resource
        }
    }

    /// Base angle of a chevron slot
    pub fn chevron_angle(&self, chevron: usize) -> Result<f64, GateError> {
        self.chevron_angles
            .get(chevron)
            .copied()
            .ok_or(GateError::ChevronOutOfRange(chevron))
    }

    /// Ring angle that brings `symbol` under `chevron`, in [0, 360)
    pub fn symbol_angle(&self, chevron: usize, symbol: u32) -> Result<f64, GateError> {
        if symbol >= SYMBOL_COUNT {
            return Err(GateError::SymbolOutOfRange(symbol));
        }
        let base = self.chevron_angle(chevron)?;
        Ok((base + symbol as f64 * 360.0 / SYMBOL_COUNT as f64) % 360.0)
    }

    /// Chevrons available to the leading symbols, in index order
    pub fn leading_chevrons(&self) -> Vec<usize> {
        (0..CHEVRON_COUNT).filter(|&i| i != self.master_chevron).collect()
    }
}

impl Default for GateVariant {
    fn default() -> Self {
        Self::sg1()
    }
}

fn join_url(base: &str, file: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_chevron_symbol_zero() {
        let variant = GateVariant::sg1();
        assert_eq!(variant.symbol_angle(0, 0).unwrap(), 240.0);
    }

    #[test]
    fn test_symbol_offset_wraps() {
        let variant = GateVariant::sg1();
        // 13 symbols are a third of the ring
        let angle = variant.symbol_angle(3, 13).unwrap();
        assert!((angle - 120.0).abs() < 1e-9, "got {}", angle);

        // 240 + 26 * 360/39 = 480 -> 120
        let wrapped = variant.symbol_angle(0, 26).unwrap();
        assert!((wrapped - 120.0).abs() < 1e-9, "got {}", wrapped);
    }

    #[test]
    fn test_out_of_range_inputs() {
        let variant = GateVariant::sg1();
        assert!(matches!(variant.symbol_angle(9, 0), Err(GateError::ChevronOutOfRange(9))));
        assert!(matches!(variant.symbol_angle(0, 39), Err(GateError::SymbolOutOfRange(39))));
    }

    #[test]
    fn test_sound_urls() {
        let variant = GateVariant::sg1();
        assert!(variant.chevron_lock_url().ends_with("/MRE/stargate/SG_Chevron_lock.wav"));
        assert!(variant.ring_turning_url().ends_with("/SG_Turn_Grind.wav"));
    }

    #[test]
    fn test_leading_chevrons_skip_master() {
        let variant = GateVariant::sg1();
        assert_eq!(variant.leading_chevrons(), vec![0, 1, 2, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_preset_lookup() {
        assert!(GateVariant::preset("SG1").is_some());
        assert!(GateVariant::preset("atlantis").is_none());
    }
}
