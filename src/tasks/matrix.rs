use embedded_hal_async::delay::DelayNs;

use crate::{
    DAY_PHASE_MS, NIGHT_BLINK_MS,
    hal::PixelStream,
    matrix::{FrameId, render_frame},
    mode::ModeFlag,
    phase::{DayNightCycle, Step},
};

static DAY_STEPS: [Step<FrameId>; 3] = [
    Step::new(FrameId::DotTop, DAY_PHASE_MS),
    Step::new(FrameId::DotCenter, DAY_PHASE_MS),
    Step::new(FrameId::DotBottom, DAY_PHASE_MS),
];

static NIGHT_STEPS: [Step<FrameId>; 2] = [
    Step::new(FrameId::DotCenter, NIGHT_BLINK_MS),
    Step::new(FrameId::Blank, NIGHT_BLINK_MS),
];

/// Frames of the matrix task. Night mode rewinds the day cycle to the top dot.
pub fn matrix_cycle() -> DayNightCycle<FrameId> {
    DayNightCycle::new(&DAY_STEPS, &NIGHT_STEPS)
}

/// Matrix task. Each frame is streamed completely before its hold time starts.
pub async fn matrix_animator<S, D>(mode: &ModeFlag, stream: &mut S, delay: &mut D) -> !
where
    S: PixelStream,
    D: DelayNs,
{
    let mut cycle = matrix_cycle();
    #[cfg(feature = "defmt")]
    defmt::info!("MATRIX_TASK: Task started");
    loop {
        for step in cycle.next_steps(mode.read()) {
            #[cfg(feature = "defmt")]
            defmt::debug!("MATRIX_TASK: Frame {}", step.output);
            render_frame(stream, step.output.frame()).await;
            delay.delay_ms(step.hold_ms).await;
        }
    }
}
