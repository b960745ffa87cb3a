use embedded_hal_async::{delay::DelayNs, digital::Wait};

use crate::{BUTTON_POLL_MS, hal::SystemReset};

/// Watches the update button and hands over to the firmware update mode on its falling edge.
///
/// Runs beside the five controller tasks and shares nothing with them. A failed edge wait is
/// retried after [`BUTTON_POLL_MS`].
pub async fn update_button<B, R, D>(button: &mut B, reset: &mut R, delay: &mut D) -> !
where
    B: Wait,
    R: SystemReset,
    D: DelayNs,
{
    loop {
        match button.wait_for_falling_edge().await {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                defmt::info!("UPDATE: Entering firmware update mode");
                reset.enter_update_mode();
            }
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("UPDATE: Waiting for the update button failed");
                delay.delay_ms(BUTTON_POLL_MS).await;
            }
        }
    }
}
