use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal_async::delay::DelayNs;

use crate::{
    DAY_PHASE_MS, NIGHT_BLINK_MS,
    mode::ModeFlag,
    phase::{DayNightCycle, DayPhase, Step},
};

/// Colour shown on the RGB indicator. Yellow is red and green together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Light {
    Off,
    Red,
    Yellow,
    Green,
}

impl Light {
    /// Levels of the red, green and blue lines
    pub const fn levels(self) -> [bool; 3] {
        match self {
            Light::Off => [false, false, false],
            Light::Red => [true, false, false],
            Light::Yellow => [true, true, false],
            Light::Green => [false, true, false],
        }
    }

    /// Decodes line levels back into a light, `None` for combinations never shown
    pub const fn from_levels(levels: [bool; 3]) -> Option<Light> {
        match levels {
            [false, false, false] => Some(Light::Off),
            [true, false, false] => Some(Light::Red),
            [true, true, false] => Some(Light::Yellow),
            [false, true, false] => Some(Light::Green),
            _ => None,
        }
    }

    pub const fn for_phase(phase: DayPhase) -> Light {
        match phase {
            DayPhase::Red => Light::Red,
            DayPhase::Yellow => Light::Yellow,
            DayPhase::Green => Light::Green,
        }
    }
}

/// The three colour lines of the indicator
pub struct Indicator<R, G, B> {
    red: R,
    green: G,
    blue: B,
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> Indicator<R, G, B> {
    pub fn new(red: R, green: G, blue: B) -> Self {
        let mut indicator = Self { red, green, blue };
        indicator.show(Light::Off);
        indicator
    }

    pub fn show(&mut self, light: Light) {
        let [r, g, b] = light.levels();
        let _ = self.red.set_state(PinState::from(r));
        let _ = self.green.set_state(PinState::from(g));
        let _ = self.blue.set_state(PinState::from(b));
    }
}

static DAY_STEPS: [Step<Light>; 3] = [
    Step::new(Light::for_phase(DayPhase::Red), DAY_PHASE_MS),
    Step::new(Light::for_phase(DayPhase::Yellow), DAY_PHASE_MS),
    Step::new(Light::for_phase(DayPhase::Green), DAY_PHASE_MS),
];

static NIGHT_STEPS: [Step<Light>; 2] = [
    Step::new(Light::Yellow, NIGHT_BLINK_MS),
    Step::new(Light::Off, NIGHT_BLINK_MS),
];

/// One phase per day iteration, one full yellow blink per night iteration
pub fn indicator_cycle() -> DayNightCycle<Light> {
    DayNightCycle::new(&DAY_STEPS, &NIGHT_STEPS)
}

/// Indicator task: day cycle red → yellow → green, [`DAY_PHASE_MS`] each, or the night blink.
pub async fn color_indicator<R, G, B, D>(
    mode: &ModeFlag,
    indicator: &mut Indicator<R, G, B>,
    delay: &mut D,
) -> !
where
    R: OutputPin,
    G: OutputPin,
    B: OutputPin,
    D: DelayNs,
{
    let mut cycle = indicator_cycle();
    #[cfg(feature = "defmt")]
    defmt::info!("INDICATOR_TASK: Task started");
    loop {
        for step in cycle.next_steps(mode.read()) {
            #[cfg(feature = "defmt")]
            defmt::debug!("INDICATOR_TASK: {} for {}ms", step.output, step.hold_ms);
            indicator.show(step.output);
            delay.delay_ms(step.hold_ms).await;
        }
    }
}
