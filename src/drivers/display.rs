use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};
use esp_hal::{Async, i2c::master::I2c};
use ssd1306::{
    I2CDisplayInterface, Ssd1306Async,
    mode::{BufferedGraphicsModeAsync, DisplayConfigAsync},
    prelude::{DisplayRotation, I2CInterface},
    size::DisplaySize128x64,
};

use crate::hal::GraphicDisplay;

type Panel = Ssd1306Async<
    I2CInterface<I2c<'static, Async>>,
    DisplaySize128x64,
    BufferedGraphicsModeAsync<DisplaySize128x64>,
>;

/// SSD1306 128×64 OLED on I2C, in buffered graphics mode
pub struct Oled {
    panel: Panel,
}

impl Oled {
    /// Brings the panel up, `None` if it does not answer. It stays dark until the first flush.
    pub async fn new(i2c: I2c<'static, Async>) -> Option<Self> {
        let interface = I2CDisplayInterface::new(i2c);
        let mut panel = Ssd1306Async::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        panel.init().await.ok()?;
        Some(Self { panel })
    }
}

impl OriginDimensions for Oled {
    fn size(&self) -> Size {
        OriginDimensions::size(&self.panel)
    }
}

impl DrawTarget for Oled {
    type Color = BinaryColor;
    type Error = <Panel as DrawTarget>::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        DrawTarget::draw_iter(&mut self.panel, pixels)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        DrawTarget::clear(&mut self.panel, color)
    }
}

impl GraphicDisplay for Oled {
    async fn flush(&mut self) {
        if self.panel.flush().await.is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("DISPLAY: Flush to panel failed");
        }
    }
}
