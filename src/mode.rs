//! The day/night mode shared by every task.
//!
//! [`ModeFlag`] is the only state the tasks have in common. The mode switch task is its single
//! writer, every other task reads it once per loop iteration and never waits on it.

use core::sync::atomic::{AtomicBool, Ordering};

/// Operating mode of the whole controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Normal red → yellow → green cycle
    #[default]
    Day,
    /// Blinking yellow caution mode
    Night,
}

impl Mode {
    /// The other mode
    pub const fn toggled(self) -> Self {
        match self {
            Mode::Day => Mode::Night,
            Mode::Night => Mode::Day,
        }
    }
}

/// Single-writer, multi-reader mode cell.
///
/// Only plain loads and stores are used. The ESP32-C3 has no atomic read-modify-write
/// instructions and with one writer there is nothing to race against.
#[derive(Debug, Default)]
pub struct ModeFlag {
    night: AtomicBool,
}

impl ModeFlag {
    /// A flag starting in day mode
    pub const fn new() -> Self {
        Self {
            night: AtomicBool::new(false),
        }
    }

    /// Current mode. Never blocks.
    pub fn read(&self) -> Mode {
        if self.night.load(Ordering::Relaxed) {
            Mode::Night
        } else {
            Mode::Day
        }
    }

    /// Overwrites the mode. For start-up and tests only: at runtime the mode switch task is the
    /// single writer and changes the mode through [`toggle`](Self::toggle).
    pub fn set(&self, mode: Mode) {
        self.night.store(mode == Mode::Night, Ordering::Relaxed);
    }

    /// Flips the mode and returns the new value. Only the writer task may call this.
    pub fn toggle(&self) -> Mode {
        let next = self.read().toggled();
        self.set(next);
        next
    }
}

/// The process-wide mode flag used by the firmware
pub static MODE: ModeFlag = ModeFlag::new();
