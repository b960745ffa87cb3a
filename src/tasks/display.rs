use embedded_graphics::pixelcolor::BinaryColor;
use embedded_hal_async::delay::DelayNs;

use crate::{
    DAY_PHASE_MS, DISPLAY_INVERTED, NIGHT_BLINK_MS,
    hal::GraphicDisplay,
    housing::draw_housing,
    mode::ModeFlag,
    phase::{DayNightCycle, DayPhase, Step},
};

static DAY_STEPS: [Step<DayPhase>; 3] = [
    Step::new(DayPhase::Red, DAY_PHASE_MS),
    Step::new(DayPhase::Yellow, DAY_PHASE_MS),
    Step::new(DayPhase::Green, DAY_PHASE_MS),
];

/// Night mode keeps showing the yellow letter, redrawn every half second
static NIGHT_STEPS: [Step<DayPhase>; 1] = [Step::new(DayPhase::Yellow, NIGHT_BLINK_MS)];

pub fn display_cycle() -> DayNightCycle<DayPhase> {
    DayNightCycle::new(&DAY_STEPS, &NIGHT_STEPS)
}

/// Display task.
/// The display is fully managed from this task. It is blanked once at start, after that every
/// step redraws the whole housing with the phase letter and pushes it to the panel.
pub async fn display<P, D>(mode: &ModeFlag, panel: &mut P, delay: &mut D) -> !
where
    P: GraphicDisplay,
    D: DelayNs,
{
    let blank = if DISPLAY_INVERTED {
        BinaryColor::On
    } else {
        BinaryColor::Off
    };
    let _ = panel.clear(blank);
    panel.flush().await;

    let mut cycle = display_cycle();
    #[cfg(feature = "defmt")]
    defmt::info!("DISPLAY_TASK: Task started");
    loop {
        for step in cycle.next_steps(mode.read()) {
            #[cfg(feature = "defmt")]
            defmt::debug!("DISPLAY_TASK: Showing {}", step.output.letter());
            let _ = draw_housing(panel, step.output, DISPLAY_INVERTED);
            panel.flush().await;
            delay.delay_ms(step.hold_ms).await;
        }
    }
}
