#![cfg_attr(not(test), no_std)]

pub mod hal;
pub mod housing;
pub mod matrix;
pub mod mode;
pub mod phase;
pub mod tasks;

#[cfg(feature = "esp32c3")]
pub mod drivers;

pub use mode::{MODE, Mode, ModeFlag};
pub use tasks::{audio_cue, color_indicator, display, matrix_animator, mode_switch, update_button};

/// How long each day-mode phase (red, yellow, green) is held, in milliseconds
pub const DAY_PHASE_MS: u32 = 2000;

/// Half period of the night-mode blink in milliseconds
pub const NIGHT_BLINK_MS: u32 = 500;

/// The mode button is sampled at this interval in milliseconds
pub const BUTTON_POLL_MS: u32 = 100;

/// Minimum time between two accepted mode toggles in milliseconds
pub const DEBOUNCE_MS: u64 = 500;

/// Poll interval while waiting for a held mode button to be released
pub const RELEASE_POLL_MS: u32 = 10;

/// Number of LEDs along one side of the square matrix
pub const MATRIX_SIDE: usize = 5;

/// The number of LEDs in the matrix chain we are driving
pub const MATRIX_PIXELS: usize = MATRIX_SIDE * MATRIX_SIDE;

/// Draw the housing dark on a lit background instead of lit on dark
pub const DISPLAY_INVERTED: bool = false;
