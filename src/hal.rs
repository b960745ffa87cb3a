//! The peripheral boundary the tasks are written against.
//!
//! Digital lines use the `embedded_hal` [`InputPin`](embedded_hal::digital::InputPin) and
//! [`OutputPin`] traits and sleeping uses `embedded_hal_async`'s
//! [`DelayNs`](embedded_hal_async::delay::DelayNs). The traits below cover the peripherals that
//! have no standard trait. All of them are infallible from the caller's point of view: a
//! peripheral that misbehaves simply stalls or ignores its owning task.

use embassy_time::Instant;
use embedded_graphics::{draw_target::DrawTarget, pixelcolor::BinaryColor};
use embedded_hal::digital::OutputPin;

use crate::matrix::PixelWord;

/// Monotonic time source
pub trait Clock {
    fn now(&self) -> Instant;
}

/// A fixed-frequency tone that can be switched on and off
pub trait ToneGenerator {
    fn enable(&mut self);
    fn disable(&mut self);
}

/// Bit-serial output towards an addressable LED chain.
#[allow(async_fn_in_trait)]
pub trait PixelStream {
    /// Transmits one packed pixel word. Waits for as long as the channel is busy, it never drops
    /// a word.
    async fn send(&mut self, word: PixelWord);
}

/// A monochrome frame buffer that is pushed to the panel with [`GraphicDisplay::flush`].
///
/// Drawing happens through `embedded_graphics` on the buffer, nothing reaches the panel until the
/// flush.
#[allow(async_fn_in_trait)]
pub trait GraphicDisplay: DrawTarget<Color = BinaryColor> {
    async fn flush(&mut self);
}

/// Leaves the application and enters the firmware update mode
pub trait SystemReset {
    fn enter_update_mode(&mut self);
}

/// Active buzzer on a digital output: driving the line high makes it sound.
pub struct Buzzer<P> {
    pin: P,
}

impl<P: OutputPin> Buzzer<P> {
    /// Takes ownership of the line and makes sure the buzzer starts silent
    pub fn new(pin: P) -> Self {
        let mut buzzer = Self { pin };
        buzzer.disable();
        buzzer
    }
}

impl<P: OutputPin> ToneGenerator for Buzzer<P> {
    fn enable(&mut self) {
        let _ = self.pin.set_high();
    }

    fn disable(&mut self) {
        let _ = self.pin.set_low();
    }
}
