//! Deterministic discrete-event simulation of the controller's peripherals.
//!
//! All tasks share one virtual millisecond clock. [`Sim::run_for`] polls every task until each is
//! parked on a delay, then jumps the clock to the earliest pending deadline. Peripherals record
//! what they were told and when, so tests sample that history afterwards.
#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::BTreeSet,
    convert::Infallible,
    future::{Future, poll_fn},
    pin::Pin,
    rc::Rc,
    task::{Context, Poll, Waker},
};

use embassy_time::Instant;
use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PointsIter, Rectangle},
};
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal_async::{delay::DelayNs, digital::Wait};
use traffic_light_rtos::{
    hal::{Clock, GraphicDisplay, PixelStream, SystemReset, ToneGenerator},
    housing::cell_interior,
    matrix::PixelWord,
    phase::DayPhase,
    tasks::indicator::{Indicator, Light},
};

#[derive(Default)]
struct Timeline {
    now: Cell<u64>,
    deadlines: RefCell<BTreeSet<u64>>,
}

impl Timeline {
    fn wake_at(&self, deadline: u64) {
        self.deadlines.borrow_mut().insert(deadline);
    }

    async fn sleep_until(&self, deadline: u64) {
        self.wake_at(deadline);
        poll_fn(|_| {
            if self.now.get() >= deadline {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        })
        .await
    }
}

pub type SimTask<'a> = Pin<Box<dyn Future<Output = ()> + 'a>>;

/// Wraps a never-ending task future for [`Sim::run_for`]
pub fn task<'a, F: Future + 'a>(fut: F) -> SimTask<'a> {
    Box::pin(async move {
        fut.await;
        core::future::pending::<()>().await;
    })
}

#[derive(Clone, Default)]
pub struct Sim {
    time: Rc<Timeline>,
}

impl Sim {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.time.now.get()
    }

    pub fn clock(&self) -> SimClock {
        SimClock(self.time.clone())
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay(self.time.clone())
    }

    /// Runs `tasks` for `duration_ms` of virtual time. Tasks due at the same instant are polled in
    /// the order given.
    pub fn run_for(&self, duration_ms: u64, mut tasks: Vec<SimTask<'_>>) {
        let end = self.now_ms() + duration_ms;
        let mut cx = Context::from_waker(Waker::noop());
        loop {
            for task in tasks.iter_mut() {
                let _ = task.as_mut().poll(&mut cx);
            }
            let now = self.now_ms();
            let next = {
                let mut deadlines = self.time.deadlines.borrow_mut();
                deadlines.retain(|&d| d > now);
                deadlines.first().copied()
            };
            match next {
                Some(deadline) if deadline <= end => self.time.now.set(deadline),
                _ => {
                    self.time.now.set(end);
                    for task in tasks.iter_mut() {
                        let _ = task.as_mut().poll(&mut cx);
                    }
                    return;
                }
            }
        }
    }
}

#[derive(Clone)]
pub struct SimClock(Rc<Timeline>);

impl Clock for SimClock {
    fn now(&self) -> Instant {
        Instant::from_millis(self.0.now.get())
    }
}

pub struct SimDelay(Rc<Timeline>);

impl SimDelay {
    pub async fn sleep_ms(&mut self, ms: u64) {
        let deadline = self.0.now.get() + ms;
        self.0.sleep_until(deadline).await
    }
}

impl DelayNs for SimDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.sleep_ms(u64::from(ns).div_ceil(1_000_000)).await
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.sleep_ms(u64::from(ms)).await
    }
}

/// Level history of a digital output: `(time, level)` for every write
#[derive(Clone, Default)]
pub struct Trace(Rc<RefCell<Vec<(u64, bool)>>>);

impl Trace {
    pub fn push(&self, at: u64, level: bool) {
        self.0.borrow_mut().push((at, level));
    }

    /// Level in effect at `at`, the last write at or before it. Low before the first write.
    pub fn level_at(&self, at: u64) -> bool {
        self.0
            .borrow()
            .iter()
            .take_while(|(t, _)| *t <= at)
            .last()
            .is_some_and(|(_, level)| *level)
    }

    /// Times at which the level changed to `level`
    pub fn edges(&self, level: bool) -> Vec<u64> {
        let mut edges = Vec::new();
        let mut current = false;
        let history = self.0.borrow();
        for (i, (t, l)) in history.iter().enumerate() {
            // several writes at the same instant only count once, with the last value
            if history.get(i + 1).is_some_and(|(next, _)| next == t) {
                continue;
            }
            if *l != current {
                current = *l;
                if current == level {
                    edges.push(*t);
                }
            }
        }
        edges
    }
}

/// Recording output line
pub struct SimPin {
    time: Rc<Timeline>,
    trace: Trace,
}

impl SimPin {
    pub fn new(sim: &Sim) -> (Self, Trace) {
        let trace = Trace::default();
        (
            Self {
                time: sim.time.clone(),
                trace: trace.clone(),
            },
            trace,
        )
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.trace.push(self.time.now.get(), false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.trace.push(self.time.now.get(), true);
        Ok(())
    }
}

pub type SimIndicator = Indicator<SimPin, SimPin, SimPin>;

/// Traces of the red, green and blue lines
#[derive(Clone)]
pub struct IndicatorTraces {
    pub red: Trace,
    pub green: Trace,
    pub blue: Trace,
}

impl IndicatorTraces {
    pub fn light_at(&self, at: u64) -> Option<Light> {
        Light::from_levels([
            self.red.level_at(at),
            self.green.level_at(at),
            self.blue.level_at(at),
        ])
    }
}

pub fn sim_indicator(sim: &Sim) -> (SimIndicator, IndicatorTraces) {
    let (red, red_trace) = SimPin::new(sim);
    let (green, green_trace) = SimPin::new(sim);
    let (blue, blue_trace) = SimPin::new(sim);
    (
        Indicator::new(red, green, blue),
        IndicatorTraces {
            red: red_trace,
            green: green_trace,
            blue: blue_trace,
        },
    )
}

/// Mode button held down (active low) during each `[start, end)` interval
pub struct SimButton {
    time: Rc<Timeline>,
    presses: Vec<(u64, u64)>,
}

impl SimButton {
    pub fn new(sim: &Sim, presses: &[(u64, u64)]) -> Self {
        Self {
            time: sim.time.clone(),
            presses: presses.to_vec(),
        }
    }

    fn held(&self) -> bool {
        let now = self.time.now.get();
        self.presses
            .iter()
            .any(|&(start, end)| (start..end).contains(&now))
    }

    fn next_press_after(&self, now: u64) -> Option<u64> {
        self.presses
            .iter()
            .map(|&(start, _)| start)
            .filter(|&start| start > now)
            .min()
    }
}

impl ErrorType for SimButton {
    type Error = Infallible;
}

impl InputPin for SimButton {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.held())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.held())
    }
}

impl Wait for SimButton {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        if self.held() {
            self.wait_for_rising_edge().await?;
        }
        Ok(())
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        if !self.held() {
            self.wait_for_falling_edge().await?;
        }
        Ok(())
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        let release = self
            .presses
            .iter()
            .map(|&(_, end)| end)
            .filter(|&end| end > self.time.now.get())
            .min();
        match release {
            Some(end) => self.time.sleep_until(end).await,
            None => core::future::pending::<()>().await,
        }
        Ok(())
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        match self.next_press_after(self.time.now.get()) {
            Some(start) => self.time.sleep_until(start).await,
            None => core::future::pending::<()>().await,
        }
        Ok(())
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        if self.held() {
            self.wait_for_rising_edge().await
        } else {
            self.wait_for_falling_edge().await
        }
    }
}

/// Recording tone generator
pub struct SimTone {
    time: Rc<Timeline>,
    trace: Trace,
}

impl SimTone {
    pub fn new(sim: &Sim) -> (Self, Trace) {
        let trace = Trace::default();
        (
            Self {
                time: sim.time.clone(),
                trace: trace.clone(),
            },
            trace,
        )
    }
}

impl ToneGenerator for SimTone {
    fn enable(&mut self) {
        self.trace.push(self.time.now.get(), true);
    }

    fn disable(&mut self) {
        self.trace.push(self.time.now.get(), false);
    }
}

/// Pixel stream that records every word. With a `busy_ms` set, each word keeps the channel busy
/// for that long, like a full transmit queue.
pub struct SimStream {
    time: Rc<Timeline>,
    busy_ms: u64,
    sent: Rc<RefCell<Vec<(u64, PixelWord)>>>,
}

#[derive(Clone)]
pub struct StreamLog(Rc<RefCell<Vec<(u64, PixelWord)>>>);

impl StreamLog {
    pub fn words(&self) -> Vec<PixelWord> {
        self.0.borrow().iter().map(|(_, w)| *w).collect()
    }

    pub fn timed(&self) -> Vec<(u64, PixelWord)> {
        self.0.borrow().clone()
    }
}

impl SimStream {
    pub fn new(sim: &Sim, busy_ms: u64) -> (Self, StreamLog) {
        let sent = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                time: sim.time.clone(),
                busy_ms,
                sent: sent.clone(),
            },
            StreamLog(sent),
        )
    }
}

impl PixelStream for SimStream {
    async fn send(&mut self, word: PixelWord) {
        if self.busy_ms > 0 {
            let deadline = self.time.now.get() + self.busy_ms;
            self.time.sleep_until(deadline).await;
        }
        self.sent.borrow_mut().push((self.time.now.get(), word));
    }
}

pub const SCREEN_WIDTH: usize = 128;
pub const SCREEN_HEIGHT: usize = 64;

/// A 128×64 monochrome frame buffer
#[derive(Clone, PartialEq, Eq)]
pub struct Screen {
    pixels: Vec<bool>,
}

impl Screen {
    fn new() -> Self {
        Self {
            pixels: vec![false; SCREEN_WIDTH * SCREEN_HEIGHT],
        }
    }

    pub fn lit(&self, x: i32, y: i32) -> bool {
        self.pixels[y as usize * SCREEN_WIDTH + x as usize]
    }

    pub fn lit_count(&self, area: &Rectangle) -> usize {
        area.points().filter(|p| self.lit(p.x, p.y)).count()
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| !p)
    }

    /// Letter of the cell holding lit pixels, `None` if no cell (or more than one) does
    pub fn shown_letter(&self) -> Option<char> {
        let mut lit = DayPhase::ALL
            .into_iter()
            .filter(|phase| self.lit_count(&cell_interior(*phase)) > 0);
        match (lit.next(), lit.next()) {
            (Some(phase), None) => Some(phase.letter()),
            _ => None,
        }
    }
}

/// Display that snapshots its buffer on every flush
pub struct SimDisplay {
    time: Rc<Timeline>,
    buffer: Screen,
    flushes: Rc<RefCell<Vec<(u64, Screen)>>>,
}

#[derive(Clone)]
pub struct FlushLog(Rc<RefCell<Vec<(u64, Screen)>>>);

impl FlushLog {
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn get(&self, index: usize) -> (u64, Screen) {
        self.0.borrow()[index].clone()
    }

    /// `(time, letter)` for every flush
    pub fn letters(&self) -> Vec<(u64, Option<char>)> {
        self.0
            .borrow()
            .iter()
            .map(|(t, screen)| (*t, screen.shown_letter()))
            .collect()
    }
}

impl SimDisplay {
    pub fn new(sim: &Sim) -> (Self, FlushLog) {
        let flushes = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                time: sim.time.clone(),
                buffer: Screen::new(),
                flushes: flushes.clone(),
            },
            FlushLog(flushes),
        )
    }
}

impl OriginDimensions for SimDisplay {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32)
    }
}

impl DrawTarget for SimDisplay {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, colour) in pixels {
            if (0..SCREEN_WIDTH as i32).contains(&point.x)
                && (0..SCREEN_HEIGHT as i32).contains(&point.y)
            {
                self.buffer.pixels[point.y as usize * SCREEN_WIDTH + point.x as usize] =
                    colour.is_on();
            }
        }
        Ok(())
    }
}

impl GraphicDisplay for SimDisplay {
    async fn flush(&mut self) {
        self.flushes
            .borrow_mut()
            .push((self.time.now.get(), self.buffer.clone()));
    }
}

/// Counts update-mode requests
#[derive(Clone, Default)]
pub struct SimReset(Rc<RefCell<Vec<u64>>>);

pub struct SimResetHandle {
    time: Rc<Timeline>,
    log: SimReset,
}

impl SimReset {
    pub fn handle(&self, sim: &Sim) -> SimResetHandle {
        SimResetHandle {
            time: sim.time.clone(),
            log: self.clone(),
        }
    }

    pub fn requests(&self) -> Vec<u64> {
        self.0.borrow().clone()
    }
}

impl SystemReset for SimResetHandle {
    fn enter_update_mode(&mut self) {
        self.log.0.borrow_mut().push(self.time.now.get());
    }
}

/// A fresh mode flag that outlives the tasks borrowing it
pub fn mode_flag() -> &'static traffic_light_rtos::ModeFlag {
    Box::leak(Box::new(traffic_light_rtos::ModeFlag::new()))
}
