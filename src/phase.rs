//! Per-task phase bookkeeping.
//!
//! Every output task owns its own [`PhaseCounter`] and its own timer. Nothing here is shared, so
//! the tasks only line up because they use the same literal durations. Over time they are free to
//! drift apart.

use crate::mode::Mode;

/// The three day-mode phases, in the order they are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DayPhase {
    Red,
    Yellow,
    Green,
}

impl DayPhase {
    /// All phases in cycle order
    pub const ALL: [DayPhase; 3] = [DayPhase::Red, DayPhase::Yellow, DayPhase::Green];

    /// Letter used for this phase on the graphic display
    pub const fn letter(self) -> char {
        match self {
            DayPhase::Red => 'R',
            DayPhase::Yellow => 'Y',
            DayPhase::Green => 'G',
        }
    }

    /// Position of the phase inside the cycle, 0 being the first
    pub const fn index(self) -> usize {
        match self {
            DayPhase::Red => 0,
            DayPhase::Yellow => 1,
            DayPhase::Green => 2,
        }
    }
}

/// Cyclic index over `N` phases. The value is always in `0..N` and wraps after the last phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhaseCounter<const N: usize> {
    index: usize,
}

impl<const N: usize> PhaseCounter<N> {
    pub const fn new() -> Self {
        const { assert!(N > 0, "a phase counter needs at least one phase") };
        Self { index: 0 }
    }

    pub const fn get(&self) -> usize {
        self.index
    }

    /// Moves to the next phase, wrapping to the first one after the last
    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % N;
        self.index
    }

    /// Back to the first phase
    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// The entry of `table` for the current phase
    pub fn pick<'a, T>(&self, table: &'a [T; N]) -> &'a T {
        &table[self.index]
    }
}

/// One timed step of a task's state machine: show `output`, then hold it for `hold_ms`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step<T> {
    pub output: T,
    pub hold_ms: u32,
}

impl<T> Step<T> {
    pub const fn new(output: T, hold_ms: u32) -> Self {
        Self { output, hold_ms }
    }
}

/// Step selection shared by the colour, matrix and display tasks.
///
/// A day iteration is the single step of the current phase, after which the phase advances. A
/// night iteration is the whole night table and rewinds the day phase, so day mode always restarts
/// at red.
#[derive(Debug)]
pub struct DayNightCycle<T: 'static> {
    day: &'static [Step<T>; 3],
    night: &'static [Step<T>],
    phase: PhaseCounter<3>,
}

impl<T: 'static> DayNightCycle<T> {
    /// `day` holds one step per [`DayPhase`], in cycle order
    pub const fn new(day: &'static [Step<T>; 3], night: &'static [Step<T>]) -> Self {
        Self {
            day,
            night,
            phase: PhaseCounter::new(),
        }
    }

    /// The steps of the next loop iteration in `mode`
    pub fn next_steps(&mut self, mode: Mode) -> &'static [Step<T>] {
        match mode {
            Mode::Day => {
                let step = self.phase.pick(self.day);
                self.phase.advance();
                core::slice::from_ref(step)
            }
            Mode::Night => {
                self.phase.reset();
                self.night
            }
        }
    }
}

/// Total time taken by a sequence of steps
pub fn cycle_ms<T>(steps: &[Step<T>]) -> u32 {
    steps.iter().map(|step| step.hold_ms).sum()
}
