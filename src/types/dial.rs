//! Dial steps and address plans

use serde::{Deserialize, Serialize};

use crate::error::GateError;
use crate::types::{GateVariant, RotationDirection};
use crate::{CHEVRON_COUNT, MAX_ADDRESS_LEN, MIN_ADDRESS_LEN, SYMBOL_COUNT};

/// One "turn the ring, lock a chevron" iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialStep {
    /// Chevron slot (0-8)
    pub chevron: usize,
    /// Ring symbol (0-38)
    pub symbol: u32,
    pub direction: RotationDirection,
}

impl DialStep {
    /// Create a validated step
    pub fn new(chevron: usize, symbol: u32, direction: RotationDirection) -> Result<Self, GateError> {
        if chevron >= CHEVRON_COUNT {
            return Err(GateError::ChevronOutOfRange(chevron));
        }
        if symbol >= SYMBOL_COUNT {
            return Err(GateError::SymbolOutOfRange(symbol));
        }
        Ok(Self { chevron, symbol, direction })
    }
}

/// Ordered steps for dialing a full address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialPlan {
    steps: Vec<DialStep>,
}

impl DialPlan {
    /// Build the plan for an address.
    ///
    /// Leading symbols take the non-master chevrons in index order, the final
    /// symbol locks the master chevron. The ring alternates direction, starting
    /// counter-clockwise.
    pub fn for_address(symbols: &[u32], variant: &GateVariant) -> Result<Self, GateError> {
        if !(MIN_ADDRESS_LEN..=MAX_ADDRESS_LEN).contains(&symbols.len()) {
            return Err(GateError::AddressLength(symbols.len()));
        }
        if variant.master_chevron >= CHEVRON_COUNT {
            return Err(GateError::ChevronOutOfRange(variant.master_chevron));
        }

        let leading = variant.leading_chevrons();
        let last = symbols.len() - 1;
        let mut direction = RotationDirection::CounterClockwise;
        let mut steps = Vec::with_capacity(symbols.len());

        for (i, &symbol) in symbols.iter().enumerate() {
            let chevron = if i == last { variant.master_chevron } else { leading[i] };
            steps.push(DialStep::new(chevron, symbol, direction)?);
            direction = direction.reversed();
        }

        Ok(Self { steps })
    }

    /// Plan from explicit steps, no address rules applied
    pub fn from_steps(steps: Vec<DialStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[DialStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Parse a comma separated symbol list such as `"27,7,15,32,12,30,1"`
pub fn parse_symbols(raw: &str) -> Result<Vec<u32>, GateError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .map_err(|_| GateError::InvalidSymbol(s.to_string()))
        })
        .collect()
}
