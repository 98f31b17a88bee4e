//! Stargate: ring-and-chevron gate dialing core
//!
//! Rotation profile generation for the symbol ring, chevron lock sequencing,
//! the gate status machine and a small lookup facade over HTTP.

pub mod config;
pub mod core;
pub mod error;
pub mod types;

// =============================================================================
// RING MOTION
// =============================================================================

/// Simulation ticks per second
pub const TIMESCALE: f64 = 3.0;

/// Seconds for one full revolution at top speed
pub const SECONDS_PER_REVOLUTION: f64 = 6.0;

/// Top angular speed in degrees per tick
pub const ANGULAR_MAX_SPEED: f64 = 360.0 / (SECONDS_PER_REVOLUTION * TIMESCALE);

/// Speed change per tick; one second to reach top speed
pub const ACCEL_STEP: f64 = ANGULAR_MAX_SPEED / TIMESCALE;

// =============================================================================
// GATE GEOMETRY
// =============================================================================

/// Number of chevron slots around the ring
pub const CHEVRON_COUNT: usize = 9;

/// Number of symbols engraved on the ring
pub const SYMBOL_COUNT: u32 = 39;

/// Shortest dialable address
pub const MIN_ADDRESS_LEN: usize = 7;

/// Longest dialable address (one symbol per chevron)
pub const MAX_ADDRESS_LEN: usize = CHEVRON_COUNT;

// =============================================================================
// SEQUENCER TIMING
// =============================================================================

/// Pause after a chevron locks (milliseconds)
pub const SETTLE_DELAY_MS: u64 = 1000;

/// Extra wait after the last keyframe before the turning sound stops (milliseconds)
pub const ROTATION_BUFFER_MS: u64 = 200;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
