use crate::{MATRIX_PIXELS, hal::PixelStream, matrix::PixelWord};
use esp_hal::{
    Async,
    gpio::interconnect::PeripheralOutput,
    rmt::{ConstChannelAccess, Rmt, Tx},
};
use esp_hal_smartled::{SmartLedsAdapterAsync, buffer_size_async};
use smart_leds::{RGB8, SmartLedsWriteAsync};

/// We must know what the LED TX buffer size is as a constant for the types involved here
const LED_INTERNAL_BUF_LEN: usize = buffer_size_async(MATRIX_PIXELS);

/// Pixel stream towards the LED matrix chain on RMT channel 0.
///
/// The RMT peripheral has to see a whole chain in one transmission, otherwise the gap between
/// words latches the LEDs early. Words are therefore collected in chain order and the frame goes
/// out when its last word arrives. That transmission is where [`PixelStream::send`] waits.
pub struct MatrixStream {
    /// Driver for the led chain. We have to size it here to exactly what we will get back from
    /// the `SmartLedsAdapterAsync::new()` function when we set up the driver below
    led: SmartLedsAdapterAsync<ConstChannelAccess<Tx, 0>, LED_INTERNAL_BUF_LEN>,
    /// Words received so far for the frame in progress
    pending: [RGB8; MATRIX_PIXELS],
    filled: usize,
}

impl MatrixStream {
    /// Create a new stream for the LED matrix.
    ///
    /// # Parameters
    /// * `rmt` - The RMT peripheral device to use for driving the LED chain
    /// * `pin` - The GPIO pin to which the LED chain is connected
    pub fn new<'a>(rmt: Rmt<Async>, pin: impl PeripheralOutput<'a>) -> Self {
        let channel = rmt.channel0;
        let buffer = [0_u32; buffer_size_async(MATRIX_PIXELS)];
        let led = SmartLedsAdapterAsync::new(channel, pin, buffer);
        Self {
            led,
            pending: [RGB8::default(); MATRIX_PIXELS],
            filled: 0,
        }
    }
}

impl PixelStream for MatrixStream {
    async fn send(&mut self, word: PixelWord) {
        self.pending[self.filled] = RGB8::from(word);
        self.filled += 1;
        if self.filled < MATRIX_PIXELS {
            return;
        }
        self.filled = 0;
        if self.led.write(self.pending).await.is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("MATRIX: Failed to write frame to LED chain");
        }
    }
}
