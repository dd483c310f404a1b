//! Board support package
//!
//! Geometry of the Keychron Q6 ISO (knob) PCB: key matrix, RGB matrix and encoders.
//! Everything electrical (scanning, debouncing, LED driver) is done by the host firmware.

pub mod layout;

pub const MATRIX_ROWS: usize = 6;
pub const MATRIX_COLS: usize = 21;
/// One RGB LED per key
pub const NLEDS: usize = 110;
pub const NENCODERS: usize = 1;

pub use layout::{iso_110, led_index, KEY_POSITIONS, LED_MAP};
