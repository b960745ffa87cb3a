use embassy_time::{Duration, Instant};
use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;

use crate::{BUTTON_POLL_MS, DEBOUNCE_MS, RELEASE_POLL_MS, hal::Clock, mode::ModeFlag};

/// Where the mode button is in its press cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwitchState {
    /// Armed, waiting for a press
    Idle,
    /// A press was accepted and the button has not been released yet
    Debouncing,
}

/// Accepts button presses no closer together than [`DEBOUNCE_MS`]
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    last_toggle: Option<Instant>,
    state: SwitchState,
}

impl Debouncer {
    pub const fn new() -> Self {
        Self {
            last_toggle: None,
            state: SwitchState::Idle,
        }
    }

    pub const fn state(&self) -> SwitchState {
        self.state
    }

    /// A press was seen at `now`. Returns true if it counts as a toggle.
    pub fn press(&mut self, now: Instant) -> bool {
        if self.state == SwitchState::Debouncing {
            return false;
        }
        let window = Duration::from_millis(DEBOUNCE_MS);
        let accepted = match self.last_toggle {
            None => true,
            Some(last) => now.checked_duration_since(last).is_some_and(|since| since >= window),
        };
        if accepted {
            self.last_toggle = Some(now);
            self.state = SwitchState::Debouncing;
        }
        accepted
    }

    /// The button is back at its released level; re-arm
    pub fn release(&mut self) {
        self.state = SwitchState::Idle;
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

/// The button is active low. A failed read counts as released.
fn is_pressed<B: InputPin>(button: &mut B) -> bool {
    button.is_low().unwrap_or(false)
}

/// Mode switch task, the only writer of `mode`.
///
/// Samples `button` every [`BUTTON_POLL_MS`]. An accepted press flips the mode, then the task
/// polls every [`RELEASE_POLL_MS`] until the button is released so a held button toggles once.
pub async fn mode_switch<B, C, D>(mode: &ModeFlag, button: &mut B, clock: &C, delay: &mut D) -> !
where
    B: InputPin,
    C: Clock,
    D: DelayNs,
{
    let mut debouncer = Debouncer::new();
    #[cfg(feature = "defmt")]
    defmt::info!("MODE_TASK: Task started in {} mode", mode.read());
    loop {
        if is_pressed(button) && debouncer.press(clock.now()) {
            let _now = mode.toggle();
            #[cfg(feature = "defmt")]
            defmt::info!("MODE_TASK: Switched to {} mode", _now);
            while is_pressed(button) {
                delay.delay_ms(RELEASE_POLL_MS).await;
            }
            debouncer.release();
        }
        delay.delay_ms(BUTTON_POLL_MS).await;
    }
}
