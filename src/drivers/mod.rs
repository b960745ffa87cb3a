//! ESP32-C3 adapters from esp-hal and friends to the [`hal`](crate::hal) traits.

pub mod display;
pub mod neopixel;

pub use display::Oled;
pub use neopixel::MatrixStream;

use embassy_time::Instant;

use crate::hal::{Clock, SystemReset};

/// The embassy time driver as a [`Clock`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Restarts the chip into the ROM serial download mode, where a new image can be flashed over
/// USB. The forced-download strap is set first, otherwise the boot ROM starts the app again.
#[derive(Debug, Default)]
pub struct RomLoader;

impl SystemReset for RomLoader {
    fn enter_update_mode(&mut self) {
        esp_hal::peripherals::LPWR::regs()
            .option1()
            .modify(|_, w| w.force_download_boot().set_bit());
        esp_hal::system::software_reset()
    }
}
