//! Audible cues that accompany the colour phases.
//!
//! The day pattern mirrors the colour phases but is only 3.7 s long against the 6 s colour cycle.
//! Both run on their own timers, so the beeps slowly walk across the colour phases. Nothing here
//! tries to realign them.

use embedded_hal_async::delay::DelayNs;

use crate::{
    hal::ToneGenerator,
    mode::{Mode, ModeFlag},
    phase::Step,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tone {
    On,
    Off,
}

/// Red: short beep then a long pause. Yellow: quick beep. Green: steady tone.
pub static DAY_TONE_PATTERN: [Step<Tone>; 5] = [
    Step::new(Tone::On, 500),
    Step::new(Tone::Off, 1500),
    Step::new(Tone::On, 200),
    Step::new(Tone::Off, 500),
    Step::new(Tone::On, 1000),
];

/// A 500ms beep every 2.5s
pub static NIGHT_TONE_PATTERN: [Step<Tone>; 2] = [Step::new(Tone::On, 500), Step::new(Tone::Off, 2000)];

pub fn tone_pattern(mode: Mode) -> &'static [Step<Tone>] {
    match mode {
        Mode::Day => &DAY_TONE_PATTERN,
        Mode::Night => &NIGHT_TONE_PATTERN,
    }
}

/// Audio cue task. The mode is read once per pattern, a toggle takes effect when the running
/// pattern finishes.
pub async fn audio_cue<T, D>(mode: &ModeFlag, tone: &mut T, delay: &mut D) -> !
where
    T: ToneGenerator,
    D: DelayNs,
{
    #[cfg(feature = "defmt")]
    defmt::info!("AUDIO_TASK: Task started");
    loop {
        for step in tone_pattern(mode.read()) {
            match step.output {
                Tone::On => tone.enable(),
                Tone::Off => tone.disable(),
            }
            delay.delay_ms(step.hold_ms).await;
        }
    }
}
